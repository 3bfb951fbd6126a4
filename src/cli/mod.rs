//! CLI interface and argument parsing

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use crate::logging::effective_settings;
use clap::{Parser, Subcommand};

/// Ledgerline - verified invoice batching and line-item datasets
#[derive(Parser, Debug)]
#[command(name = "ledgerline")]
#[command(version, about, long_about = None)]
#[command(author = "Ledgerline Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ledgerline.toml", env = "LEDGERLINE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEDGERLINE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging settings for this invocation
    ///
    /// Reads the config file when the command uses one. A config that fails
    /// to load falls back to console logging; the command reports the error.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = match &self.command {
            Commands::Init(_) => None,
            _ => load_config(&self.config).ok(),
        };
        effective_settings(self.log_level.as_deref(), config.as_ref())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (trigger and push endpoints)
    Serve(commands::serve::ServeArgs),

    /// Distribute one company's verified invoices to the bus
    Distribute(commands::distribute::DistributeArgs),

    /// Process one batch message into a dataset
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show distribution checkpoints
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["ledgerline", "serve"]);
        assert_eq!(cli.config, "ledgerline.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_distribute() {
        let cli = Cli::parse_from([
            "ledgerline",
            "distribute",
            "--company-id",
            "ACME",
            "--position",
            "in",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Distribute(args) => {
                assert_eq!(args.company_id, "ACME");
                assert_eq!(args.position, crate::domain::Direction::In);
                assert!(args.dry_run);
                assert!(args.path.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_position() {
        let result = Cli::try_parse_from([
            "ledgerline",
            "distribute",
            "--company-id",
            "ACME",
            "--position",
            "up",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ledgerline", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ledgerline", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_process_stdin() {
        let cli = Cli::parse_from(["ledgerline", "process", "--message", "-"]);
        assert!(matches!(cli.command, Commands::Process(ref a) if a.message == "-"));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ledgerline", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
