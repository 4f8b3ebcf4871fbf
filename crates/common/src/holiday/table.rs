use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use super::directive::Directive;

/// Input format for holiday dates.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Calendar dates mapped to the holiday observed on them.
///
/// Keys are naive calendar dates. Whoever builds the table and whoever looks
/// dates up must agree on the time basis that produced those dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    entries: BTreeMap<NaiveDate, Directive>,
}

/// A holiday as seen by one country.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ObservedHoliday {
    pub date: NaiveDate,
    pub name: String,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration pairs of `YYYY-MM-DD` → directive.
    ///
    /// Unparseable dates and directives are logged and skipped.
    pub fn from_config<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (date_str, raw) in pairs {
            let date_str = date_str.as_ref();
            let raw = raw.into();

            let date = match NaiveDate::parse_from_str(date_str.trim(), DATE_INPUT_FORMAT) {
                Ok(date) => date,
                Err(error) => {
                    warn!(%error, date = date_str, holiday = %raw, "unable to parse holiday date");
                    continue;
                }
            };

            match Directive::parse(raw) {
                Ok(directive) => {
                    table.insert(date, directive);
                }
                Err(error) => {
                    warn!(%error, date = date_str, "skipping invalid holiday");
                }
            }
        }
        table
    }

    pub fn insert(&mut self, date: NaiveDate, directive: Directive) -> Option<Directive> {
        self.entries.insert(date, directive)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Directive> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Directive)> {
        self.entries.iter().map(|(date, directive)| (*date, directive))
    }

    /// True when `country` observes a holiday on `date`.
    pub fn is_observed(&self, date: NaiveDate, country: &str) -> bool {
        self.get(date)
            .and_then(|directive| directive.observed_by(country).ok())
            .unwrap_or(false)
    }

    /// The holiday `country` observes on `date`, with its per-country name.
    pub fn observed(&self, date: NaiveDate, country: &str) -> Option<ObservedHoliday> {
        let directive = self.get(date)?;
        if !directive.observed_by(country).ok()? {
            return None;
        }
        let name = directive.holiday_name(country).ok()?;
        Some(ObservedHoliday { date, name })
    }

    /// Every holiday `country` observes, in date order, optionally limited to
    /// one year.
    pub fn observed_in(&self, country: &str, year: Option<i32>) -> Vec<ObservedHoliday> {
        self.entries
            .keys()
            .filter(|date| year.map_or(true, |year| date.year() == year))
            .filter_map(|date| self.observed(*date, country))
            .collect()
    }
}
