//! Field constraints checked before input reaches the store
//!
//! Lengths are counted in characters, not bytes.

use thiserror::Error;

use todo_core::{NewTodo, TodoPatch};

/// Maximum title length
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },

    #[error("description must be at most {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },
}

/// Check create/replace input
pub fn validate_new(fields: &NewTodo) -> Result<(), ValidationError> {
    validate_title(&fields.title)?;
    validate_description(fields.description.as_deref())
}

/// Check only the fields a patch supplies
pub fn validate_patch(patch: &TodoPatch) -> Result<(), ValidationError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description.as_deref())?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyTitle);
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            len,
            max: TITLE_MAX_CHARS,
        });
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    let len = description.map_or(0, |d| d.chars().count());
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: DESCRIPTION_MAX_CHARS,
        });
    }
    Ok(())
}
