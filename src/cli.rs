//! CLI argument parsing using clap v4
//!
//! Running the binary without a subcommand runs the checks.

use clap::{Parser, Subcommand, ValueEnum};

/// Portal configuration validator
///
/// Checks the secret key, debug flag, allowed hosts and database settings of
/// the portal, then verifies the database answers a trivial query.
#[derive(Parser, Debug)]
#[command(name = "portal-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file
    #[arg(short, long, env = "PORTAL_SETTINGS", global = true)]
    pub settings: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run all configuration checks (default)
    Check {
        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Settings file management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Report formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, streamed while checks run
    Text,
    /// One JSON document at the end
    Json,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective settings with secrets masked
    Show,

    /// Write a settings template
    Init {
        /// Path where to create the settings file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the settings file
    Validate,
}

impl Cli {
    /// The command to run, defaulting to a text check
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Check { format }) => Commands::Check { format: *format },
            Some(Commands::Config { subcommand }) => Commands::Config {
                subcommand: subcommand.clone(),
            },
            None => Commands::Check {
                format: OutputFormat::Text,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_runs_checks() {
        let cli = Cli::parse_from(["portal-check"]);
        assert!(cli.command.is_none());
        match cli.command_or_default() {
            Commands::Check { format } => assert_eq!(format, OutputFormat::Text),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_check_json() {
        let cli = Cli::parse_from(["portal-check", "check", "--format", "json"]);
        match cli.command_or_default() {
            Commands::Check { format } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_settings_flag() {
        let cli = Cli::parse_from(["portal-check", "config", "validate", "-s", "/etc/portal.toml"]);
        assert_eq!(cli.settings.as_deref(), Some("/etc/portal.toml"));
        match cli.command_or_default() {
            Commands::Config {
                subcommand: ConfigSubcommand::Validate,
            } => {}
            _ => panic!("Expected Config Validate command"),
        }
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["portal-check", "config", "init", "--force"]);
        match cli.command_or_default() {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_verbose_flags() {
        let cli = Cli::parse_from(["portal-check", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::parse_from(["portal-check", "check", "--quiet"]);
        assert!(cli.quiet);
    }
}
