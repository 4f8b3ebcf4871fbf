// Configuration file for the scrum CLI.
//
// Search order: `--config PATH`, `./scrum.toml`, `~/.config/scrum/scrum.toml`.

use std::path::{Path, PathBuf};

use scrum_common::highlight::{HighlightRule, RuleError};
use scrum_common::holiday::HolidayTable;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::logging::LogFormat;
use crate::store::DEFAULT_TIMEOUT_SECS;

pub const LOCAL_CONFIG_FILE: &str = "scrum.toml";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_ACCOUNT: &str = "scrum";

/// `~/.config/scrum/scrum.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("scrum").join(LOCAL_CONFIG_FILE))
}

/// Holidays used when the config has no `[holidays]` table.
pub const BUILTIN_HOLIDAYS: &[(&str, &str)] = &[
    ("2018-01-01", "ca,uk,us: New Year's Day"),
    ("2018-01-15", "us: Martin Luther King Day"),
    ("2018-02-12", "ca: Family Day (BC)"),
    ("2018-02-19", r#"ca,us: ca:"Family Day (AB, MB, ON, PE, SK)" us:"President's Day""#),
    ("2018-03-30", "ca,uk: Good Friday"),
    ("2018-04-02", "uk: Easter Monday"),
    ("2018-04-13", "us: Wellbeing Day"),
    ("2018-05-07", "uk: Early May bank holiday"),
    ("2018-05-21", "ca: Victoria Day"),
    ("2018-05-28", "uk: Spring bank holiday"),
    ("2018-05-29", "us: Memorial Day"),
    ("2018-06-25", "ca: National Holiday (QC)"),
    ("2018-07-02", "ca: Canada Day, observed"),
    ("2018-07-04", "us: Independence Day"),
    ("2018-08-06", "ca: Civic Day (AB, BC, ON, NS, MB)"),
    ("2018-08-27", "uk: Summer bank holiday"),
    ("2018-09-03", "ca, us: Labor Day"),
    ("2018-10-08", "ca: Thanksgiving Day"),
    ("2018-11-12", "ca: Remembrance Day, observed (AB, BC, NS)"),
    ("2018-11-22", "us: Thanksgiving Day"),
    ("2018-11-23", "us: Day After Thanksgiving"),
    ("2018-12-24", "us: Christmas Eve"),
    ("2018-12-25", "ca,uk,us: Christmas Day"),
    ("2018-12-26", "ca,uk: Boxing Day"),
];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub general: GeneralConfig,
    pub scrum: ScrumConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    /// Rule key → style names, in file order.
    pub highlight: toml::Table,
    /// `YYYY-MM-DD` → holiday directive. Absent means the built-in table.
    pub holidays: Option<toml::Table>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneralConfig {
    pub country: String,
    pub use_pager: bool,
    pub utc: bool,
    pub use_color: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { country: DEFAULT_COUNTRY.into(), use_pager: true, utc: false, use_color: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrumConfig {
    pub username: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Directory holding one subdirectory per account.
    pub root: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { root: None, timeout_secs: DEFAULT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".into(), format: LogFormat::Auto }
    }
}

impl Config {
    /// The first config file that exists, honoring an explicit path.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        user_config_path().filter(|path| path.is_file())
    }

    /// Load the located config, or defaults when there is none. An explicit
    /// path that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(explicit) {
            Some(path) => Ok((Self::load_from(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Highlight rules in file order. Non-string values are skipped with a
    /// warning; a malformed key is an error.
    pub fn highlight_rules(&self) -> Result<Vec<HighlightRule>, ConfigError> {
        let mut rules = Vec::with_capacity(self.highlight.len());
        for (key, value) in &self.highlight {
            let Some(style) = value.as_str() else {
                warn!(key, value = %value, "skipping highlight rule, input is not a string");
                continue;
            };
            rules.push(HighlightRule::parse(key, style).map_err(ConfigError::Highlight)?);
        }
        debug!(count = rules.len(), "loaded highlight rules");
        Ok(rules)
    }

    /// Build the holiday table from `[holidays]`, or the built-in table.
    pub fn holiday_table(&self) -> HolidayTable {
        let Some(holidays) = &self.holidays else {
            return HolidayTable::from_config(BUILTIN_HOLIDAYS.iter().copied());
        };

        let pairs = holidays.iter().filter_map(|(date, value)| match value.as_str() {
            Some(directive) => Some((date.as_str(), directive)),
            None => {
                warn!(date, value = %value, "skipping holiday, directive is not a string");
                None
            }
        });
        HolidayTable::from_config(pairs)
    }
}

/// Errors from loading or interpreting the config file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Highlight(RuleError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "config I/O error on `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "config parse error in `{}`: {source}", path.display())
            }
            Self::Highlight(e) => write!(f, "config highlight error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Highlight(source) => Some(source),
        }
    }
}
