//! CLI command definitions

use crate::core::Mode;
use clap::Args;

/// Print the resolved steps and parameters without running anything
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Mode to plan
    #[arg(value_enum)]
    pub mode: ModeArg,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Mode argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    #[value(alias = "development")]
    Dev,
    #[value(alias = "production")]
    Prod,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Dev => Mode::Development,
            ModeArg::Prod => Mode::Production,
        }
    }
}
