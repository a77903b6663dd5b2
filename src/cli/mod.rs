//! Command-line interface

pub mod commands;
pub mod logging;
pub mod output;

use clap::{Parser, Subcommand};
use commands::PlanCommand;
use std::ffi::OsString;
use std::path::PathBuf;

/// Bootstraps the development or production container stack
#[derive(Debug, Parser, Clone)]
#[command(name = "stackup")]
#[command(version)]
#[command(about = "Bring up the application's container stack for development or production", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Path to configuration file (defaults to stackup.yml in the project directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for JSON log files
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Don't write log files
    #[arg(long, global = true)]
    pub no_log_files: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Start the development environment (attached)
    Dev,

    /// Start the production environment (detached) and migrate
    Prod,

    /// Show what a mode would run
    Plan(PlanCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
