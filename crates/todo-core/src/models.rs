//! Data models for the todo store
//!
//! - [`Todo`]: the persisted record
//! - [`NewTodo`]: input for create and full replace
//! - [`TodoPatch`]: input for partial update
//!
//! Field constraints (title and description lengths) are checked by the
//! HTTP layer before these reach the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A todo item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Store-assigned identifier, never reused
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// When this item was created
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// When this item was last changed
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh record from create input
    pub fn new(id: u64, fields: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite everything except `id` and `created_at`
    ///
    /// Omitted input fields have already taken their defaults, so this
    /// resets them exactly as `create` would.
    pub fn replace_with(&mut self, fields: NewTodo, now: DateTime<Utc>) {
        self.title = fields.title;
        self.description = fields.description;
        self.completed = fields.completed;
        self.touch(now);
    }

    /// Apply only the fields present in the patch
    pub fn apply(&mut self, patch: TodoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        // Never earlier than creation, even if the wall clock went backwards
        self.updated_at = now.max(self.created_at);
    }
}

/// Fields accepted by create and full replace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Fields accepted by partial update
///
/// `description` distinguishes "not supplied" (`None`) from "supplied as
/// null" (`Some(None)`), which clears it. A null `title` or `completed`
/// leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "supplied",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Marks a field as supplied whenever its key is present, even when null
fn supplied<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Timestamp parsing that also accepts offset-less values as UTC
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    /// Parse RFC 3339, falling back to naive formats read as UTC
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}
