//! Output formatting for the config commands
//!
//! `--json` prints one JSON object per command, `--quiet` prints only the
//! value a script would want, and the default is a readable listing.

use std::path::Path;

use serde_json::json;

use todo_core::Config;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl OutputFormat {
    /// Quiet wins over JSON when both flags are given
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the effective configuration and where it came from
    pub fn config(&self, config: &Config, config_file: &Path) {
        println!("{}", self.render_config(config, config_file));
    }

    /// Print the config file location
    pub fn path(&self, config_file: &Path) {
        match self.format {
            OutputFormat::Json => println!("{}", json!({ "config_file": config_file })),
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", config_file.display()),
        }
    }

    /// Report a saved config change
    pub fn config_set(&self, key: &str, value: &str, config_file: &Path) {
        match self.format {
            OutputFormat::Human => println!(
                "✓ Set {} = {} in {}",
                key,
                value,
                config_file.display()
            ),
            OutputFormat::Json => println!(
                "{}",
                json!({ "status": "success", "key": key, "value": value, "config_file": config_file })
            ),
            OutputFormat::Quiet => {}
        }
    }

    fn render_config(&self, config: &Config, config_file: &Path) -> String {
        match self.format {
            OutputFormat::Json => json!({
                "data_dir": config.data_dir,
                "data_file": config.data_file(),
                "bind_addr": config.bind_addr,
                "log_level": config.log_level,
                "config_file": config_file,
            })
            .to_string(),
            OutputFormat::Quiet => config.data_dir.display().to_string(),
            OutputFormat::Human => format!(
                "Configuration:\n  \
                 data_dir:  {}\n  \
                 bind_addr: {}\n  \
                 log_level: {}\n\n\
                 Data file:   {}\n\
                 Config file: {}",
                config.data_dir.display(),
                config.bind_addr,
                config.log_level.as_deref().unwrap_or("(not set)"),
                config.data_file().display(),
                config_file.display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_render_config_formats() {
        let config = Config::with_data_dir("/srv/todos");
        let config_file = PathBuf::from("/etc/todo-server/config.toml");

        let quiet = Output::new(OutputFormat::Quiet).render_config(&config, &config_file);
        assert_eq!(quiet, "/srv/todos");

        let json: serde_json::Value = serde_json::from_str(
            &Output::new(OutputFormat::Json).render_config(&config, &config_file),
        )
        .unwrap();
        assert_eq!(json["data_file"], "/srv/todos/todos.json");
        assert_eq!(json["bind_addr"], config.bind_addr);
        assert!(json["log_level"].is_null());
        assert_eq!(json["config_file"], "/etc/todo-server/config.toml");

        let human = Output::new(OutputFormat::Human).render_config(&config, &config_file);
        assert!(human.contains("log_level: (not set)"));
        assert!(human.contains("Config file: /etc/todo-server/config.toml"));
    }
}
