// `scrum rollup`: combine a day's scrums into one digest.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use scrum_common::path::scrum_object;
use tracing::info;

use crate::board;
use crate::session::{DateArgs, Session};

const ROLLUP_OBJECT: &str = "rollup";

#[derive(Debug, Args)]
pub struct RollupArgs {
    #[command(flatten)]
    date: DateArgs,

    /// Also store the digest as the day's `rollup` object
    #[arg(long)]
    publish: bool,
}

pub fn run(args: RollupArgs, session: &Session) -> Result<()> {
    let date = session.resolve_date(&args.date)?;
    let day = session.block_on(board::fetch_all(session.store(), date))??;
    let digest = board::rollup_digest(date, &day.scrums);

    if args.publish {
        let object = scrum_object(date, ROLLUP_OBJECT)?;
        session
            .block_on(session.store().put(&object, digest.as_bytes(), true))?
            .context("unable to publish rollup")?;
        info!(path = %object, users = day.scrums.len(), "published rollup");
    }

    let mut sink = session.sink();
    sink.write_all(digest.as_bytes()).context("unable to write rollup")?;
    sink.finish().context("unable to close output")?;

    day.into_result()
}
