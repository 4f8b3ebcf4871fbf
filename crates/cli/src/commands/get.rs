// `scrum get`: print one user's scrum, or everyone's with `-a`.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use scrum_common::highlight::{HighlightRule, Highlighter, Style};
use scrum_common::types::{Scrum, TimeBasis};

use crate::board::{self, Day};
use crate::session::{DateArgs, Session};

const DEFAULT_TERMINAL_WIDTH: usize = 80;

#[derive(Debug, Args)]
pub struct GetArgs {
    #[command(flatten)]
    date: DateArgs,

    /// Get the scrum of every user
    #[arg(short, long)]
    all: bool,

    /// Extra highlight rule, e.g. `-H 'block~=red bold'` (repeatable)
    #[arg(
        short = 'H',
        long = "highlight",
        value_name = "KEY=STYLE",
        value_parser = parse_highlight
    )]
    highlight: Vec<HighlightRule>,
}

fn parse_highlight(value: &str) -> Result<HighlightRule, String> {
    let (key, style) =
        value.split_once('=').ok_or_else(|| format!("expected KEY=STYLE, got {value:?}"))?;
    HighlightRule::parse(key.trim(), style).map_err(|err| err.to_string())
}

pub fn run(args: GetArgs, session: &Session) -> Result<()> {
    let date = session.resolve_date(&args.date)?;
    let rules = if session.color { session.highlight_rules(&args.highlight)? } else { Vec::new() };

    let day = if args.all {
        session.block_on(board::fetch_all(session.store(), date))??
    } else {
        let username = session.username()?;
        let scrum = session.block_on(board::fetch(session.store(), date, username))??;
        Day { scrums: vec![scrum], first_error: None }
    };

    let layout = Layout {
        headers: args.all,
        width: terminal_width(),
        basis: session.basis,
        color: session.color,
    };

    let mut sink = session.sink();
    layout.write(&mut sink, &day.scrums, &rules).context("unable to write scrum")?;
    sink.finish().context("unable to close output")?;

    day.into_result()
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse().ok())
        .filter(|width| *width > 0)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

struct Layout {
    headers: bool,
    width: usize,
    basis: TimeBasis,
    color: bool,
}

impl Layout {
    /// Headers go straight to `out`; only scrum bodies are highlighted.
    fn write<W: Write>(
        &self,
        out: &mut W,
        scrums: &[Scrum],
        rules: &[HighlightRule],
    ) -> io::Result<()> {
        for scrum in scrums {
            if self.headers {
                writeln!(out, "{}", "-".repeat(self.width))?;
                self.write_header(out, scrum)?;
            }
            if rules.is_empty() {
                writeln!(out, "{}", scrum.body.trim())?;
            } else {
                let mut body = Highlighter::new(&mut *out, rules.to_vec());
                writeln!(body, "{}", scrum.body.trim())?;
                body.finish()?;
            }
        }
        Ok(())
    }

    fn write_header<W: Write>(&self, out: &mut W, scrum: &Scrum) -> io::Result<()> {
        let (key, user) = if self.color {
            (Style::parse("white bold"), Style::parse("white underline"))
        } else {
            (Style::new(), Style::new())
        };
        let mtime = self.basis.format_mtime(scrum.mtime, true);
        writeln!(out, "{} | {}", key.paint("user "), user.paint(&scrum.username))?;
        writeln!(out, "{} | {mtime}", key.paint("mtime"))?;
        writeln!(out)
    }
}
