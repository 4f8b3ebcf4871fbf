// Core domain types shared by the scrum crates.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One object in a scrum day directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectEntry {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub mtime: DateTime<Utc>,
}

/// A scrum body together with the metadata of the object it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scrum {
    pub username: String,
    pub date: NaiveDate,
    pub mtime: DateTime<Utc>,
    pub body: String,
}

/// Which clock decides the calendar day and how times are shown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeBasis {
    #[default]
    Local,
    Utc,
}

/// Timestamp layout used when showing object mtimes.
pub const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl TimeBasis {
    pub fn from_utc_flag(utc: bool) -> Self {
        if utc {
            Self::Utc
        } else {
            Self::Local
        }
    }

    /// Today's calendar date on this basis.
    pub fn today(self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => instant.date_naive(),
            Self::Local => instant.with_timezone(&Local).date_naive(),
        }
    }

    /// `YYYY-MM-DD HH:MM:SS`, optionally followed by the zone abbreviation.
    pub fn format_mtime(self, instant: DateTime<Utc>, with_zone: bool) -> String {
        let layout = if with_zone { "%Y-%m-%d %H:%M:%S %Z" } else { MTIME_FORMAT };
        match self {
            Self::Utc => instant.format(layout).to_string(),
            Self::Local => instant.with_timezone(&Local).format(layout).to_string(),
        }
    }

    /// Short zone label for table headers.
    pub fn zone_label(self) -> String {
        match self {
            Self::Utc => "UTC".to_string(),
            Self::Local => Local::now().format("%Z").to_string(),
        }
    }
}
