// Consistent exit codes for the scrum CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/argument error
//   10 = scrum not found
//   11 = scrum already exists
//   12 = storage unreachable or timed out
//   13 = configuration error

use std::process;

use scrum_common::highlight::RuleError;
use scrum_common::path::PathError;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    NotFound = 10,
    Exists = 11,
    Storage = 12,
    Config = 13,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(store_err) = cause.downcast_ref::<StoreError>() {
                return Self::from_store_error(store_err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Self::Config;
            }
            if cause.downcast_ref::<RuleError>().is_some()
                || cause.downcast_ref::<PathError>().is_some()
            {
                return Self::Usage;
            }
        }
        Self::Error
    }

    pub fn from_store_error(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::AlreadyExists(_) => Self::Exists,
            StoreError::Timeout { .. } | StoreError::Io { .. } => Self::Storage,
            StoreError::InvalidAccount(_) => Self::Usage,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
