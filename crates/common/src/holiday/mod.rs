// Holiday directives, the holiday table, and business-day arithmetic.

pub mod business_day;
pub mod directive;
pub mod table;

pub use business_day::{
    is_weekend, BusinessDays, CalendarError, Direction, MAX_RUN_DAYS, MAX_SCAN_DAYS,
};
pub use directive::{CountryNames, Directive, DirectiveError, Malformed};
pub use table::{HolidayTable, ObservedHoliday, DATE_INPUT_FORMAT};
