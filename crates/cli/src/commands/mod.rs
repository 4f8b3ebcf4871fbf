// CLI subcommand dispatch.

use clap::Subcommand;

use crate::output::OutputFormat;
use crate::session::Session;

pub mod get;
pub mod holidays;
pub mod list;
pub mod rollup;
pub mod set;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a scrum, or every scrum of the day
    Get(get::GetArgs),
    /// Write a scrum for one or more business days
    Set(set::SetArgs),
    /// List who scrummed
    #[command(visible_alias = "ls")]
    List(list::ListArgs),
    /// Combine the day's scrums into one digest
    Rollup(rollup::RollupArgs),
    /// Show the holidays observed by the country
    Holidays(holidays::HolidaysArgs),
}

impl Command {
    /// Format used when reporting a failure of this command.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Self::List(args) => OutputFormat::from_json_flag(args.json),
            Self::Holidays(args) => OutputFormat::from_json_flag(args.json),
            _ => OutputFormat::Human,
        }
    }
}

pub fn run(cmd: Command, session: &Session) -> anyhow::Result<()> {
    match cmd {
        Command::Get(args) => get::run(args, session),
        Command::Set(args) => set::run(args, session),
        Command::List(args) => list::run(args, session),
        Command::Rollup(args) => rollup::run(args, session),
        Command::Holidays(args) => holidays::run(args, session),
    }
}
