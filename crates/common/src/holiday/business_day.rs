// Holiday-aware weekday arithmetic.

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

use super::table::{HolidayTable, ObservedHoliday};

/// Upper bound on consecutive non-business days scanned in one step.
pub const MAX_SCAN_DAYS: u32 = 366;

/// Upper bound on the number of business days collected by [`BusinessDays::run`].
pub const MAX_RUN_DAYS: usize = 366;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("no business day within {MAX_SCAN_DAYS} days of {from} for country {country:?}")]
    ScanLimit { from: NaiveDate, country: String },

    #[error("date out of range stepping from {0}")]
    OutOfRange(NaiveDate),

    #[error("cannot span {0} business days, the limit is {MAX_RUN_DAYS}")]
    RunTooLong(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Forward => date.succ_opt(),
            Self::Backward => date.pred_opt(),
        }
    }
}

/// Business days for one country against one holiday table.
#[derive(Debug, Clone, Copy)]
pub struct BusinessDays<'a> {
    holidays: &'a HolidayTable,
    country: &'a str,
}

impl<'a> BusinessDays<'a> {
    pub fn new(holidays: &'a HolidayTable, country: &'a str) -> Self {
        Self { holidays, country }
    }

    pub fn country(&self) -> &str {
        self.country
    }

    /// Monday–Friday and not a holiday observed by this country.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.is_observed(date, self.country)
    }

    pub fn holiday(&self, date: NaiveDate) -> Option<ObservedHoliday> {
        self.holidays.observed(date, self.country)
    }

    /// The first business day strictly after or before `date`.
    pub fn step(&self, date: NaiveDate, direction: Direction) -> Result<NaiveDate, CalendarError> {
        let mut current = date;
        for _ in 0..MAX_SCAN_DAYS {
            current = direction.step(current).ok_or(CalendarError::OutOfRange(current))?;
            if self.is_business_day(current) {
                return Ok(current);
            }
        }
        Err(CalendarError::ScanLimit { from: date, country: self.country.to_string() })
    }

    pub fn next(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.step(date, Direction::Forward)
    }

    pub fn previous(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.step(date, Direction::Backward)
    }

    /// Move `days` business days; negative values move backward.
    pub fn add(&self, date: NaiveDate, days: i32) -> Result<NaiveDate, CalendarError> {
        let direction = if days < 0 { Direction::Backward } else { Direction::Forward };
        let mut current = date;
        for _ in 0..days.unsigned_abs() {
            current = self.step(current, direction)?;
        }
        Ok(current)
    }

    /// `count` consecutive business days starting at `start` (inclusive when
    /// `start` is itself a business day). At most [`MAX_RUN_DAYS`].
    pub fn run(&self, start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, CalendarError> {
        if count > MAX_RUN_DAYS {
            return Err(CalendarError::RunTooLong(count));
        }
        let mut days = Vec::with_capacity(count);
        if count == 0 {
            return Ok(days);
        }

        let mut current =
            if self.is_business_day(start) { start } else { self.next(start)? };
        days.push(current);
        while days.len() < count {
            current = self.next(current)?;
            days.push(current);
        }
        Ok(days)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
