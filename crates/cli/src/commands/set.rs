// `scrum set`: write a scrum for one or more business days.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use scrum_common::holiday::{BusinessDays, DATE_INPUT_FORMAT, MAX_RUN_DAYS};
use scrum_common::path::scrum_object;
use tracing::{debug, info, warn};

use crate::session::{DateArgs, Session};
use crate::store::{FsStore, StoreError};

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(flatten)]
    date: DateArgs,

    /// File to read the scrum from, `-` for stdin
    #[arg(
        short = 'i',
        long = "file",
        value_name = "FILE",
        required_unless_present_any = ["sick", "vacation"],
        conflicts_with_all = ["sick", "vacation"]
    )]
    input: Option<PathBuf>,

    /// Recycle the scrum for N business days
    #[arg(short, long, value_name = "N", value_parser = day_count)]
    days: Option<u32>,

    /// Sick leave for N business days
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = day_count,
        conflicts_with_all = ["days", "vacation"]
    )]
    sick: Option<u32>,

    /// Vacation for N business days
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = day_count,
        conflicts_with = "days"
    )]
    vacation: Option<u32>,

    /// Replace scrums that already exist
    #[arg(short, long)]
    force: bool,
}

/// Parse a business-day count for `-d`, `-s` and `-v`.
fn day_count(value: &str) -> Result<u32, String> {
    let count: u32 = value.trim().parse().map_err(|err| format!("expected a number: {err}"))?;
    if count == 0 || count as usize > MAX_RUN_DAYS {
        return Err(format!("expected 1 to {MAX_RUN_DAYS} days, got {count}"));
    }
    Ok(count)
}

/// What to write, and on which days.
#[derive(Debug, PartialEq, Eq)]
struct Plan {
    dates: Vec<NaiveDate>,
    body: String,
}

#[derive(Debug, Clone, Copy)]
enum Leave {
    Sick(u32),
    Vacation(u32),
}

impl Leave {
    fn label(self) -> &'static str {
        match self {
            Self::Sick(_) => "Sick leave",
            Self::Vacation(_) => "Vacation",
        }
    }

    fn days(self) -> u32 {
        match self {
            Self::Sick(days) | Self::Vacation(days) => days,
        }
    }
}

impl SetArgs {
    fn leave(&self) -> Option<Leave> {
        self.sick.map(Leave::Sick).or(self.vacation.map(Leave::Vacation))
    }
}

/// Leave covers N business days from `start`; the note names the first
/// business day back.
fn leave_plan(days: &BusinessDays<'_>, start: NaiveDate, leave: Leave) -> Result<Plan> {
    let dates = days.run(start, leave.days() as usize)?;
    let last = dates.last().copied().unwrap_or(start);
    let back = days.next(last)?;
    let body = format!("{} until {}\n", leave.label(), back.format(DATE_INPUT_FORMAT));
    Ok(Plan { dates, body })
}

/// A single day is written as given; `-d N` spreads the text over N
/// business days.
fn text_plan(
    days: &BusinessDays<'_>,
    start: NaiveDate,
    recycle: Option<u32>,
    body: String,
) -> Result<Plan> {
    if body.trim().is_empty() {
        bail!("refusing to set an empty scrum");
    }
    let dates = match recycle {
        Some(count) => days.run(start, count as usize)?,
        None => vec![start],
    };
    Ok(Plan { dates, body })
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body).context("unable to read scrum from stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(path).with_context(|| format!("unable to open `{}`", path.display()))
}

pub fn run(args: SetArgs, session: &Session) -> Result<()> {
    let start = session.resolve_date(&args.date)?;
    let username = session.username()?;
    let days = session.business_days();

    let plan = match (args.leave(), args.input.as_deref()) {
        (Some(leave), _) => leave_plan(&days, start, leave)?,
        (None, Some(path)) => text_plan(&days, start, args.days, read_input(path)?)?,
        (None, None) => bail!("nothing to set; pass -i FILE, -s N or -v N"),
    };
    debug!(username, days = plan.dates.len(), force = args.force, "scrum plan ready");

    session.block_on(write_plan(session.store(), &plan, username, args.force))?
}

async fn write_plan(store: &FsStore, plan: &Plan, username: &str, force: bool) -> Result<()> {
    let single = plan.dates.len() == 1;
    let mut skipped: Vec<String> = Vec::new();

    for date in &plan.dates {
        let object = scrum_object(*date, username)?;

        if store.exists(&object).await? {
            if !force {
                if single {
                    return Err(StoreError::AlreadyExists(object))
                        .context("scrum exists, not replacing scrum without -f to override");
                }
                warn!(path = %object, "scrum already exists, specify -f to override");
                skipped.push(object);
                continue;
            }
            if single {
                debug!(path = %object, "replacing scrum");
            } else {
                info!(path = %object, "replacing scrum");
            }
        }

        store.put(&object, plan.body.as_bytes(), force).await.context("unable to put scrum")?;
        info!(path = %object, "scrummed");
    }

    match skipped.into_iter().next() {
        Some(first) => Err(StoreError::AlreadyExists(first))
            .context("some days already had a scrum and were skipped"),
        None => Ok(()),
    }
}
