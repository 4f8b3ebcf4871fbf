// scrum-common: holiday calendars, keyword highlighting, and the scrum
// object layout shared by the scrum crates.

pub mod highlight;
pub mod holiday;
pub mod path;
pub mod types;
