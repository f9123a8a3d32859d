//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use todo_core::Config;

use crate::output::Output;

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = Config::load_with_cli_override(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    output.config(&config, &config_file(config_path));
    Ok(())
}

/// Print the config file path
pub fn path(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    output.path(&config_file(config_path));
    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = Config::load_with_cli_override(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_file(config_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.config_set(&key, &value, &save_path);
    Ok(())
}

fn config_file(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "bind_addr" => {
            let valid = value
                .rsplit_once(':')
                .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
            if !valid {
                bail!("Invalid bind_addr '{}'. Use host:port.", value);
            }
            config.bind_addr = value.to_string();
        }
        "log_level" => {
            config.log_level = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, bind_addr, log_level",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::with_data_dir("/tmp/a");

        apply(&mut config, "data_dir", "/tmp/b").unwrap();
        apply(&mut config, "bind_addr", "0.0.0.0:9000").unwrap();
        apply(&mut config, "log_level", "debug").unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/b"));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        apply(&mut config, "log_level", "none").unwrap();
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::with_data_dir("/tmp/a");

        assert!(apply(&mut config, "bind_addr", "not an address").is_err());
        assert!(apply(&mut config, "data_dir", "").is_err());
        assert!(apply(&mut config, "colour", "blue").is_err());
        assert_eq!(config.bind_addr, todo_core::config::DEFAULT_BIND_ADDR);
    }
}
