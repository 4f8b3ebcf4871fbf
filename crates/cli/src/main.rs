// scrum CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod board;
mod commands;
mod config;
mod exit_code;
mod logging;
mod output;
mod pager;
mod session;
mod store;

use config::Config;
use exit_code::ExitCode;
use session::{GlobalArgs, Session};

#[derive(Parser)]
#[command(name = "scrum", version, about = "Daily scrums kept in an object store")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let format = cli.command.output_format();
    match run(cli) {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            output::print_anyhow_error(format, &err);
            ExitCode::from_error(&err).into()
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, path) = Config::load(cli.global.config.as_deref())?;

    let filter = logging::filter(cli.global.log_level.as_deref(), &config.log.level);
    logging::init(filter, cli.global.log_format.unwrap_or(config.log.format));
    match &path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }

    let session = Session::new(&cli.global, config)?;
    commands::run(cli.command, &session)
}
