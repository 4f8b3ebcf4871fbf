// `scrum holidays`: holidays observed by the configured country.

use anyhow::Result;
use chrono::Datelike;
use clap::Args;
use scrum_common::holiday::{ObservedHoliday, DATE_INPUT_FORMAT};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use crate::session::Session;

#[derive(Debug, Args)]
pub struct HolidaysArgs {
    /// Only this year
    #[arg(long)]
    year: Option<i32>,

    /// Force JSON output.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolidaysResult {
    pub country: String,
    pub holidays: Vec<ObservedHoliday>,
}

pub fn run(args: HolidaysArgs, session: &Session) -> Result<()> {
    let holidays = session.holidays().observed_in(&session.country, args.year);
    let result = HolidaysResult { country: session.country.clone(), holidays };
    output::print_output(OutputFormat::from_json_flag(args.json), &result, format_human)?;
    Ok(())
}

fn format_human(result: &HolidaysResult) -> String {
    if result.holidays.is_empty() {
        return format!("No holidays observed by {:?}.", result.country);
    }
    result
        .holidays
        .iter()
        .map(|holiday| {
            format!(
                "{}  {}  {}",
                holiday.date.format(DATE_INPUT_FORMAT),
                holiday.date.weekday(),
                holiday.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn holiday(date: &str, name: &str) -> ObservedHoliday {
        ObservedHoliday {
            date: NaiveDate::parse_from_str(date, DATE_INPUT_FORMAT).unwrap(),
            name: name.into(),
        }
    }

    #[test]
    fn human_lists_date_weekday_and_name() {
        let result = HolidaysResult {
            country: "us".into(),
            holidays: vec![
                holiday("2018-01-01", "New Year's Day"),
                holiday("2018-02-19", "President's Day"),
            ],
        };
        assert_eq!(
            format_human(&result),
            "2018-01-01  Mon  New Year's Day\n2018-02-19  Mon  President's Day"
        );
    }

    #[test]
    fn human_empty() {
        let result = HolidaysResult { country: "zz".into(), holidays: Vec::new() };
        assert_eq!(format_human(&result), "No holidays observed by \"zz\".");
    }

    #[test]
    fn json_shape() {
        let result = HolidaysResult {
            country: "ca".into(),
            holidays: vec![holiday("2018-07-02", "Canada Day, observed")],
        };
        let mut buf = Vec::new();
        output::write_output(&mut buf, OutputFormat::Json, &result, |_| String::new()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["country"], "ca");
        assert_eq!(parsed["holidays"][0]["date"], "2018-07-02");
        assert_eq!(parsed["holidays"][0]["name"], "Canada Day, observed");
    }
}
