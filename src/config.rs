//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{desks::DeskType, hours::Hours};

/// Bukola Workspaces desk booking
#[derive(Debug, Parser)]
#[command(name = "bukola", about = "Bukola Workspaces desk booking", long_about = None)]
pub struct Config {
    /// Logging options
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// What to run; an interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Logging options shared by every subcommand
#[derive(Debug, Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book desks interactively
    Shell(ShellArgs),

    /// Print the price of a booking
    Quote(QuoteArgs),
}

/// Options for the interactive shell
#[derive(Debug, Default, Args)]
pub struct ShellArgs {
    /// Layout file
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

/// Options for a one-off price quote
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Layout file
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Desk type (individual, team)
    #[arg(short, long)]
    pub desk_type: DeskType,

    /// Membership tier; unknown tiers are charged the basic rate
    #[arg(short, long, default_value = "basic")]
    pub tier: String,

    /// Booking duration in hours (1-8)
    #[arg(short = 'H', long, default_value = "1")]
    pub hours: Hours,
}

/// Layout file selection
#[derive(Debug, Default, Args)]
pub struct LayoutArgs {
    /// YAML file overriding desk counts, rates and discount
    #[arg(long, env = "BUKOLA_LAYOUT")]
    pub layout: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The subcommand to run, defaulting to the shell.
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Shell(ShellArgs::default()))
    }
}
