//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/todo-server/config.toml)
//! 3. Environment variables (TODO_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "TODO";

/// Directory name used under the platform config and data dirs
const APP_DIR: &str = "todo-server";

/// Name of the persisted store file inside `data_dir`
pub const DATA_FILE_NAME: &str = "todos.json";

/// Address the HTTP server binds to when nothing else is configured
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the store file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Socket address for the HTTP server
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Log filter directive (e.g. "info", "todo_core=debug")
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_addr: default_bind_addr(),
            log_level: None,
        }
    }
}

impl Config {
    /// Config rooted at the given data directory, other values default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (TODO_DATA_DIR, TODO_BIND_ADDR, TODO_LOG_LEVEL)
    /// 2. Config file (~/.config/todo-server/config.toml or TODO_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path given on the command line
    pub fn load_with_cli_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_dir = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var(format!("{}_BIND_ADDR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.bind_addr = val;
            }
        }

        // Empty string clears a level set in the file
        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.log_level = if val.is_empty() { None } else { Some(val) };
        }
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with TODO_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Get the path to the persisted store file
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["TODO_DATA_DIR", "TODO_BIND_ADDR", "TODO_LOG_LEVEL"];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert!(config.log_level.is_none());
        assert!(config.data_dir.ends_with("todo-server"));
    }

    #[test]
    fn test_data_file_path() {
        let config = Config::with_data_dir("/srv/todos");
        assert_eq!(config.data_file(), PathBuf::from("/srv/todos/todos.json"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TODO_DATA_DIR", "/tmp/todo-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/todo-test"));
    }

    #[test]
    fn test_env_override_bind_addr() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TODO_BIND_ADDR", "0.0.0.0:9000");
        config.apply_env_overrides();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");

        // Empty value keeps the current address
        env::set_var("TODO_BIND_ADDR", "");
        config.apply_env_overrides();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
    }

    #[test]
    fn test_env_override_log_level() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TODO_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        env::set_var("TODO_LOG_LEVEL", "");
        config.apply_env_overrides();
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_load_from_path_reads_all_keys() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            data_dir = "/custom/data"
            bind_addr = "0.0.0.0:8080"
            log_level = "warn"
        "#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_from_path_partial_uses_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, r#"data_dir = "/only/data""#).unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/only/data"));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: PathBuf::from("/data/todos"),
            bind_addr: "127.0.0.1:3000".to_string(),
            log_level: Some("debug".to_string()),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.bind_addr, config.bind_addr);
        assert_eq!(loaded.log_level, config.log_level);
    }

    #[test]
    fn test_load_from_path_invalid_toml() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = [").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }
}
