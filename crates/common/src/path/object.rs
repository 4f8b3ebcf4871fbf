// Object-store layout for scrums: `stor/scrum/YYYY/MM/DD/<username>`.

use chrono::NaiveDate;
use thiserror::Error;

/// Directory under an account that holds every scrum.
pub const SCRUM_ROOT: &str = "stor/scrum";

/// Date layout of the per-day directory.
pub const SCRUM_DATE_LAYOUT: &str = "%Y/%m/%d";

/// Names inside a day directory that are not users.
pub const RESERVED_NAMES: [&str; 3] = ["all", "all1999.html", "rollup"];

/// Maximum username length in characters.
const MAX_USERNAME_CHARS: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("name is empty")]
    Empty,

    #[error("name exceeds maximum length of {MAX_USERNAME_CHARS} characters")]
    TooLong,

    #[error("name contains a path separator: {0:?}")]
    Separator(String),

    #[error("name contains null byte")]
    NullByte,

    #[error("name is a directory traversal component: {0}")]
    Traversal(String),

    #[error("username {0:?} is reserved")]
    Reserved(String),
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Check that `name` is a single, non-traversing path component.
pub fn validate_component(name: &str) -> Result<&str, PathError> {
    if name.trim().is_empty() {
        return Err(PathError::Empty);
    }
    if name.contains('\0') {
        return Err(PathError::NullByte);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(PathError::Separator(name.to_string()));
    }
    if name == "." || name == ".." {
        return Err(PathError::Traversal(name.to_string()));
    }
    if name.chars().count() > MAX_USERNAME_CHARS {
        return Err(PathError::TooLong);
    }
    Ok(name)
}

/// Check that `name` can be used as the last component of a scrum path.
pub fn validate_username(name: &str) -> Result<&str, PathError> {
    validate_component(name)?;
    if is_reserved(name) {
        return Err(PathError::Reserved(name.to_string()));
    }
    Ok(name)
}

/// `stor/scrum/YYYY/MM/DD`
pub fn scrum_dir(date: NaiveDate) -> String {
    format!("{SCRUM_ROOT}/{}", date.format(SCRUM_DATE_LAYOUT))
}

/// `stor/scrum/YYYY/MM/DD/<name>`; `name` may be a reserved name.
pub fn scrum_object(date: NaiveDate, name: &str) -> Result<String, PathError> {
    if !is_reserved(name) {
        validate_username(name)?;
    }
    Ok(format!("{}/{name}", scrum_dir(date)))
}
