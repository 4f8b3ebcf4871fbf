// Tracing setup. Logs go to stderr so stdout stays clean for scrums.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human when stderr is a terminal, JSON otherwise.
    #[default]
    Auto,
    Json,
    Human,
}

impl LogFormat {
    pub fn resolve(self, is_tty: bool) -> Self {
        match self {
            Self::Auto if is_tty => Self::Human,
            Self::Auto => Self::Json,
            other => other,
        }
    }
}

/// Pick the filter: an explicit level wins, then `RUST_LOG`, then the
/// configured level.
pub fn filter(flag_level: Option<&str>, config_level: &str) -> EnvFilter {
    if let Some(level) = flag_level {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
}

pub fn init(filter: EnvFilter, format: LogFormat) {
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    match format.resolve(io::stderr().is_terminal()) {
        LogFormat::Json => builder.json().init(),
        _ => builder.with_target(false).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_terminal() {
        assert_eq!(LogFormat::Auto.resolve(true), LogFormat::Human);
        assert_eq!(LogFormat::Auto.resolve(false), LogFormat::Json);
        assert_eq!(LogFormat::Human.resolve(false), LogFormat::Human);
        assert_eq!(LogFormat::Json.resolve(true), LogFormat::Json);
    }

    #[test]
    fn explicit_level_wins() {
        assert_eq!(filter(Some("debug"), "warn").to_string(), "debug");
    }
}
