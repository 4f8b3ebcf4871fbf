// Output formatting for the CLI.
//
// Human text by default; `--json` switches the listing commands to JSON.
// Errors always go to stderr.

use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::config::ConfigError;
use crate::store::StoreError;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (tables, colors, etc.).
    Human,
    /// Machine-readable JSON (one object per response).
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Write a value to a writer in the selected format.
///
/// - `Human`: calls `human_fn` to produce a human-readable string.
/// - `Json`: serializes `value` as JSON.
pub fn write_output<W, T, F>(
    writer: &mut W,
    format: OutputFormat,
    value: &T,
    human_fn: F,
) -> io::Result<()>
where
    W: Write,
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", human_fn(value))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, value).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Write a value to stdout in the selected format.
pub fn print_output<T, F>(format: OutputFormat, value: &T, human_fn: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    write_output(&mut io::stdout().lock(), format, value, human_fn)
}

/// Write an error to stderr in the selected format.
pub fn print_error(format: OutputFormat, code: &str, message: &str) {
    let mut err = io::stderr().lock();
    match format {
        OutputFormat::Human => {
            let line =
                render_human_stderr_line("error", message, io::stderr().is_terminal(), ANSI_RED);
            let _ = writeln!(err, "{line}");
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            });
            let _ = serde_json::to_writer(&mut err, &obj);
            let _ = writeln!(err);
        }
    }
}

/// Print a mapped, actionable error for a command failure.
pub fn print_anyhow_error(format: OutputFormat, error: &anyhow::Error) {
    let (code, message) = actionable_error(error);
    print_error(format, code, &message);
}

fn actionable_error(error: &anyhow::Error) -> (&'static str, String) {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return match store_err {
                StoreError::NotFound(path) => (
                    "NOT_FOUND",
                    format!("No scrum at {path}. Run: scrum list to see who has scrummed"),
                ),
                StoreError::AlreadyExists(_) => {
                    ("ALREADY_EXISTS", format!("{message}. Re-run with -f to replace it"))
                }
                StoreError::Timeout { .. } => (
                    "STORAGE_TIMEOUT",
                    format!("{message}. Check the store or raise --timeout"),
                ),
                StoreError::Io { .. } | StoreError::InvalidAccount(_) => ("STORAGE_ERROR", message),
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ("CONFIG_ERROR", message);
        }
    }

    ("ERROR", message)
}

fn render_human_stderr_line(label: &str, message: &str, is_tty: bool, color: &str) -> String {
    if is_tty {
        format!("{color}{label}:{ANSI_RESET} {message}")
    } else {
        format!("{label}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::time::Duration;

    #[test]
    fn json_flag_selects_format() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Human);
    }

    #[test]
    fn write_output_human_format() {
        #[derive(Serialize)]
        struct Info {
            name: String,
        }
        let info = Info { name: "alice".into() };
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Human, &info, |i| format!("Name: {}", i.name))
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Name: alice\n");
    }

    #[test]
    fn write_output_json_format() {
        #[derive(Serialize)]
        struct Info {
            name: String,
            size: u64,
        }
        let info = Info { name: "bob".into(), size: 42 };
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Json, &info, |_| {
            unreachable!("human_fn should not be called in JSON mode")
        })
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["name"], "bob");
        assert_eq!(parsed["size"], 42);
    }

    #[test]
    fn render_human_error_uses_color_for_tty() {
        let line = render_human_stderr_line("error", "boom", true, ANSI_RED);
        assert!(line.contains(ANSI_RED));
        assert!(line.contains(ANSI_RESET));
        assert!(line.contains("boom"));
    }

    #[test]
    fn render_human_error_without_tty_is_plain() {
        let line = render_human_stderr_line("error", "careful", false, ANSI_RED);
        assert_eq!(line, "error: careful");
    }

    #[test]
    fn actionable_not_found() {
        let err = anyhow::Error::new(StoreError::NotFound("stor/scrum/2018/01/02/bob".into()))
            .context("unable to get scrum");
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "NOT_FOUND");
        assert!(message.contains("stor/scrum/2018/01/02/bob"));
        assert!(message.contains("scrum list"));
    }

    #[test]
    fn actionable_already_exists_suggests_force() {
        let err = anyhow::Error::new(StoreError::AlreadyExists("x".into()));
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "ALREADY_EXISTS");
        assert!(message.contains("-f"));
    }

    #[test]
    fn actionable_timeout_suggests_timeout_flag() {
        let err = anyhow::Error::new(StoreError::Timeout {
            op: "list",
            path: "stor/scrum".into(),
            after: Duration::from_secs(3),
        });
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "STORAGE_TIMEOUT");
        assert!(message.contains("--timeout"));
    }

    #[test]
    fn actionable_generic_keeps_message() {
        let err = anyhow::anyhow!("something went wrong");
        assert_eq!(actionable_error(&err), ("ERROR", "something went wrong".to_string()));
    }
}
