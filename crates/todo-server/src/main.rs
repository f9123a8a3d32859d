//! Todo server CLI
//!
//! Runs the todo HTTP API and manages its configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::serve::ServeOverrides;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "todo-server")]
#[command(about = "Todo service - CRUD over a file-backed todo store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8000
        #[arg(short, long)]
        bind: Option<String>,
        /// Directory holding todos.json
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, bind_addr, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    match cli.command {
        None => commands::serve::run(config_path, ServeOverrides::default()).await,
        Some(Commands::Serve { bind, data_dir }) => {
            commands::serve::run(config_path, ServeOverrides { bind, data_dir }).await
        }
        Some(Commands::Config { command }) => match command.unwrap_or(ConfigCommands::Show) {
            ConfigCommands::Show => commands::config::show(config_path, &output),
            ConfigCommands::Path => commands::config::path(config_path, &output),
            ConfigCommands::Set { key, value } => {
                commands::config::set(key, value, config_path, &output)
            }
        },
    }
}
