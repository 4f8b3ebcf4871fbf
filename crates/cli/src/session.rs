// Per-invocation state: global flags merged over the config file.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use scrum_common::highlight::HighlightRule;
use scrum_common::holiday::{BusinessDays, HolidayTable, DATE_INPUT_FORMAT};
use scrum_common::path::validate_username;
use scrum_common::types::TimeBasis;
use tracing::debug;

use crate::config::{Config, DEFAULT_ACCOUNT};
use crate::logging::LogFormat;
use crate::pager::Sink;
use crate::store::FsStore;

pub const ACCOUNT_ENV: &str = "SCRUM_ACCOUNT";
pub const STORE_ENV: &str = "SCRUM_STORE";
pub const USER_ENV: &str = "USER";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Options accepted by every subcommand.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Config file (default: ./scrum.toml, then ~/.config/scrum/scrum.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Country code used for holidays
    #[arg(short = 'C', long, global = true)]
    pub country: Option<String>,

    /// Scrum as, or for, this user (default: $USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Use UTC for dates and times
    #[arg(short = 'Z', long, global = true)]
    pub utc: bool,

    /// Write directly to stdout
    #[arg(long, global = true)]
    pub no_pager: bool,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(short = 'l', long, global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(short = 'F', long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Store root directory
    #[arg(long, global = true, env = STORE_ENV, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Account that owns the scrum board
    #[arg(short = 'A', long, global = true, env = ACCOUNT_ENV)]
    pub account: Option<String>,

    /// Storage timeout in seconds
    #[arg(short = 'T', long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Date selection shared by the scrum commands.
#[derive(Debug, Clone, Default, Args)]
pub struct DateArgs {
    /// Scrum date, YYYY-MM-DD (default: today)
    #[arg(short = 'D', long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// The next business day after the date
    #[arg(short, long, conflicts_with = "yesterday")]
    pub tomorrow: bool,

    /// The business day before the date
    #[arg(short, long)]
    pub yesterday: bool,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT)
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub country: String,
    pub basis: TimeBasis,
    pub use_pager: bool,
    pub color: bool,
    username: Option<String>,
    store: FsStore,
    holidays: OnceLock<HolidayTable>,
}

impl Session {
    pub fn new(args: &GlobalArgs, config: Config) -> Result<Self> {
        let country = args.country.clone().unwrap_or_else(|| config.general.country.clone());
        let basis = TimeBasis::from_utc_flag(args.utc || config.general.utc);
        let stdout_tty = io::stdout().is_terminal();
        let use_pager = !args.no_pager && config.general.use_pager && stdout_tty;
        let color = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => config.general.use_color && stdout_tty,
        };

        let username = args
            .user
            .clone()
            .or_else(|| config.scrum.username.clone())
            .or_else(|| std::env::var(USER_ENV).ok());

        let root = args
            .store
            .clone()
            .or_else(|| config.storage.root.clone())
            .or_else(|| dirs::data_dir().map(|dir| dir.join("scrum")))
            .context("unable to determine the store directory; pass --store")?;
        let account = args
            .account
            .clone()
            .or_else(|| config.scrum.account.clone())
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());
        let timeout = Duration::from_secs(args.timeout.unwrap_or(config.storage.timeout_secs));
        let store = FsStore::new(&root, &account)
            .with_context(|| format!("unable to open store for account {account:?}"))?
            .with_timeout(timeout);

        debug!(
            country,
            ?basis,
            use_pager,
            color,
            store = %store.base().display(),
            timeout_secs = timeout.as_secs(),
            "session ready"
        );

        Ok(Self {
            config,
            country,
            basis,
            use_pager,
            color,
            username,
            store,
            holidays: OnceLock::new(),
        })
    }

    pub fn store(&self) -> &FsStore {
        &self.store
    }

    /// The validated username to scrum as.
    pub fn username(&self) -> Result<&str> {
        let name = self
            .username
            .as_deref()
            .context("no username; pass --user or set scrum.username")?;
        validate_username(name).with_context(|| format!("invalid username {name:?}"))
    }

    /// The holiday table, built on first use.
    pub fn holidays(&self) -> &HolidayTable {
        self.holidays.get_or_init(|| {
            let table = self.config.holiday_table();
            debug!(count = table.len(), "built holiday table");
            table
        })
    }

    pub fn business_days(&self) -> BusinessDays<'_> {
        BusinessDays::new(self.holidays(), &self.country)
    }

    /// Resolve `-D/-t/-y` to a calendar date.
    pub fn resolve_date(&self, args: &DateArgs) -> Result<NaiveDate> {
        let base = args.date.unwrap_or_else(|| self.basis.today());
        let days = self.business_days();
        let date = if args.tomorrow {
            days.next(base)?
        } else if args.yesterday {
            days.previous(base)?
        } else {
            base
        };
        debug!(%base, %date, country = %self.country, "resolved scrum date");
        Ok(date)
    }

    /// Config highlight rules followed by `extra` rules.
    pub fn highlight_rules(&self, extra: &[HighlightRule]) -> Result<Vec<HighlightRule>> {
        let mut rules = self.config.highlight_rules()?;
        rules.extend_from_slice(extra);
        Ok(rules)
    }

    pub fn sink(&self) -> Sink {
        Sink::open(self.use_pager)
    }

    /// Run a store future on a fresh current-thread runtime.
    pub fn block_on<F: Future>(&self, fut: F) -> Result<F::Output> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        Ok(runtime.block_on(fut))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(dir: &TempDir, config: Config) -> Session {
        let args = GlobalArgs {
            store: Some(dir.path().to_path_buf()),
            user: Some("alice".into()),
            ..GlobalArgs::default()
        };
        Session::new(&args, config).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn parse_date_accepts_input_format_only() {
        assert_eq!(parse_date("2018-07-04").unwrap(), NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        assert!(parse_date("07/04/2018").is_err());
    }

    #[test]
    fn flags_override_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.country = "uk".into();
        config.general.utc = false;
        let args = GlobalArgs {
            store: Some(dir.path().to_path_buf()),
            country: Some("ca".into()),
            utc: true,
            color: ColorChoice::Never,
            account: Some("Team".into()),
            ..GlobalArgs::default()
        };
        let session = Session::new(&args, config).unwrap();
        assert_eq!(session.country, "ca");
        assert_eq!(session.basis, TimeBasis::Utc);
        assert!(!session.color);
        assert_eq!(session.store().base(), dir.path().join("Team"));
    }

    #[test]
    fn tomorrow_and_yesterday_are_business_days() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, Config::default());

        let friday = DateArgs { date: Some(date("2018-12-21")), tomorrow: true, yesterday: false };
        assert_eq!(session.resolve_date(&friday).unwrap(), date("2018-12-26"));

        let wednesday =
            DateArgs { date: Some(date("2018-12-26")), tomorrow: false, yesterday: true };
        assert_eq!(session.resolve_date(&wednesday).unwrap(), date("2018-12-21"));

        let plain = DateArgs { date: Some(date("2018-12-25")), ..DateArgs::default() };
        assert_eq!(session.resolve_date(&plain).unwrap(), date("2018-12-25"));
    }

    #[test]
    fn country_changes_business_days() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.country = "uk".into();
        let session = session(&dir, config);
        let args = DateArgs { date: Some(date("2018-12-21")), tomorrow: true, yesterday: false };
        assert_eq!(session.resolve_date(&args).unwrap(), date("2018-12-24"));
    }

    #[test]
    fn username_is_validated() {
        let dir = TempDir::new().unwrap();
        let args = GlobalArgs {
            store: Some(dir.path().to_path_buf()),
            user: Some("rollup".into()),
            ..GlobalArgs::default()
        };
        let session = Session::new(&args, Config::default()).unwrap();
        assert!(session.username().is_err());
    }

    #[test]
    fn extra_highlight_rules_follow_config() {
        let dir = TempDir::new().unwrap();
        let config: Config = toml::from_str("[highlight]\nblocked = \"red\"\n").unwrap();
        let session = session(&dir, config);
        let extra = vec![HighlightRule::parse("todo~", "bold").unwrap()];
        let rules = session.highlight_rules(&extra).unwrap();
        let tokens: Vec<_> = rules.iter().map(|rule| rule.token()).collect();
        assert_eq!(tokens, vec!["blocked", "todo"]);
    }
}
