// `scrum list`: who scrummed on a given day.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use scrum_common::highlight::Style;
use scrum_common::types::{ObjectEntry, TimeBasis};
use serde::Serialize;

use crate::board;
use crate::output::{self, OutputFormat};
use crate::session::{DateArgs, Session};

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    date: DateArgs,

    /// Print usernames only, one per line
    #[arg(short = '1', long = "one")]
    one: bool,

    /// Force JSON output.
    #[arg(long, conflicts_with = "one")]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub date: NaiveDate,
    pub scrums: Vec<ObjectEntry>,
    pub total: usize,
}

pub fn run(args: ListArgs, session: &Session) -> Result<()> {
    let date = session.resolve_date(&args.date)?;
    let scrums = session.block_on(board::scrummers(session.store(), date))??;
    if scrums.is_empty() {
        tracing::warn!(%date, "no users have scrummed yet");
    }

    let result = ListResult { date, total: scrums.len(), scrums };
    let format = OutputFormat::from_json_flag(args.json);
    if args.one {
        output::print_output(format, &result, format_names)?;
    } else {
        output::print_output(format, &result, |r| format_table(r, session.basis, session.color))?;
    }
    Ok(())
}

fn format_names(result: &ListResult) -> String {
    result.scrums.iter().map(|entry| entry.name.as_str()).collect::<Vec<_>>().join("\n")
}

fn format_table(result: &ListResult, basis: TimeBasis, color: bool) -> String {
    let header =
        ["name".to_string(), "size".to_string(), format!("mtime ({})", basis.zone_label())];
    let rows: Vec<[String; 3]> = result
        .scrums
        .iter()
        .map(|entry| {
            [entry.name.clone(), entry.size.to_string(), basis.format_mtime(entry.mtime, false)]
        })
        .collect();
    let footer = ["Total".to_string(), result.total.to_string(), String::new()];

    let mut widths = [0usize; 3];
    for row in std::iter::once(&header).chain(&rows).chain(std::iter::once(&footer)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let [name_width, size_width, mtime_width] = widths;
    let render = |row: &[String; 3]| {
        let [name, size, mtime] = row;
        format!("  {name:<name_width$}  {size:>size_width$}  {mtime:>mtime_width$}")
            .trim_end()
            .to_string()
    };

    let header_style = if color { Style::parse("white bold") } else { Style::new() };
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_style.paint(&render(&header)));
    lines.extend(rows.iter().map(render));
    lines.push(render(&footer));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn result() -> ListResult {
        let scrums = vec![
            ObjectEntry {
                name: "alice".into(),
                size: 120,
                mtime: Utc.with_ymd_and_hms(2018, 1, 2, 9, 27, 5).unwrap(),
            },
            ObjectEntry {
                name: "bob".into(),
                size: 8,
                mtime: Utc.with_ymd_and_hms(2018, 1, 2, 17, 0, 0).unwrap(),
            },
        ];
        ListResult { date: NaiveDate::from_ymd_opt(2018, 1, 2).unwrap(), total: 2, scrums }
    }

    #[test]
    fn names_one_per_line() {
        assert_eq!(format_names(&result()), "alice\nbob");
    }

    #[test]
    fn table_aligns_columns_and_totals() {
        let table = format_table(&result(), TimeBasis::Utc, false);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(
            lines,
            vec![
                "  name   size          mtime (UTC)",
                "  alice   120  2018-01-02 09:27:05",
                "  bob       8  2018-01-02 17:00:00",
                "  Total     2",
            ]
        );
    }

    #[test]
    fn json_shape() {
        let mut buf = Vec::new();
        output::write_output(&mut buf, OutputFormat::Json, &result(), |_| String::new()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["date"], "2018-01-02");
        assert_eq!(parsed["total"], 2);
        assert_eq!(parsed["scrums"][1]["name"], "bob");
        assert_eq!(parsed["scrums"][1]["size"], 8);
    }
}
