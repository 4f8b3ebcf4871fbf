// Output sink: stdout, or a pager reading from our pipe.
//
// The pager is `$PAGER` (split on whitespace) or the first of `less`, `more`
// found on `PATH`.

use std::env;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, warn};

pub const PAGER_ENV: &str = "PAGER";
const FALLBACK_PAGERS: [&str; 2] = ["less", "more"];
const LESS_ARGS: [&str; 3] = ["-X", "-F", "-R"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl PagerCommand {
    /// Resolve from an optional `$PAGER` value and a `PATH` value.
    pub fn resolve(pager_env: Option<&str>, search_path: Option<&OsStr>) -> Option<Self> {
        if let Some(value) = pager_env {
            let mut words = value.split_whitespace();
            if let Some(program) = words.next() {
                return Some(Self::new(program.into(), words.map(String::from).collect()));
            }
        }

        let search_path = search_path?;
        FALLBACK_PAGERS.iter().find_map(|name| {
            env::split_paths(search_path)
                .map(|dir| dir.join(name))
                .find(|candidate| candidate.is_file())
                .map(|program| Self::new(program, Vec::new()))
        })
    }

    pub fn from_env() -> Option<Self> {
        let pager_env = env::var(PAGER_ENV).ok();
        Self::resolve(pager_env.as_deref(), env::var_os("PATH").as_deref())
    }

    fn new(program: PathBuf, mut args: Vec<String>) -> Self {
        if is_less(&program) && args.is_empty() {
            args = LESS_ARGS.iter().map(|arg| arg.to_string()).collect();
        }
        Self { program, args }
    }

    pub fn is_less(&self) -> bool {
        is_less(&self.program)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::piped());
        if self.is_less() {
            command.env("LESSSECURE", "1");
        }
        command
    }
}

fn is_less(program: &Path) -> bool {
    program.file_name().is_some_and(|name| name == "less")
}

/// Where command output is written.
#[derive(Debug)]
pub enum Sink {
    Stdout(io::Stdout),
    Pager { child: Child, stdin: Option<ChildStdin> },
}

impl Sink {
    /// A pager when `use_pager` is set and one can be started, stdout
    /// otherwise.
    pub fn open(use_pager: bool) -> Self {
        if !use_pager {
            return Self::Stdout(io::stdout());
        }
        let Some(pager) = PagerCommand::from_env() else {
            debug!("no pager found, writing to stdout");
            return Self::Stdout(io::stdout());
        };

        match pager.command().spawn() {
            Ok(mut child) => {
                debug!(program = %pager.program.display(), args = ?pager.args, "started pager");
                let stdin = child.stdin.take();
                Self::Pager { child, stdin }
            }
            Err(error) => {
                warn!(%error, program = %pager.program.display(), "unable to start pager");
                Self::Stdout(io::stdout())
            }
        }
    }

    /// Flush, close the pager's input, and wait for it to exit.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Stdout(mut stdout) => stdout.flush(),
            Self::Pager { mut child, stdin } => {
                drop(stdin);
                let status = child.wait()?;
                if !status.success() {
                    debug!(%status, "pager exited");
                }
                Ok(())
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::Pager { stdin: Some(stdin), .. } => stdin.write(buf),
            Self::Pager { stdin: None, .. } => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::Pager { stdin: Some(stdin), .. } => stdin.flush(),
            Self::Pager { stdin: None, .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn pager_env_is_split_on_whitespace() {
        let pager = PagerCommand::resolve(Some("most -s  -w"), None).unwrap();
        assert_eq!(pager.program, PathBuf::from("most"));
        assert_eq!(pager.args, vec!["-s", "-w"]);
    }

    #[test]
    fn bare_less_gets_default_flags() {
        let pager = PagerCommand::resolve(Some("less"), None).unwrap();
        assert!(pager.is_less());
        assert_eq!(pager.args, vec!["-X", "-F", "-R"]);
        let less = pager.command();
        let vars: Vec<_> = less.get_envs().collect();
        assert!(vars.contains(&(OsStr::new("LESSSECURE"), Some(OsStr::new("1")))));
    }

    #[test]
    fn less_with_user_flags_keeps_them() {
        let pager = PagerCommand::resolve(Some("/usr/bin/less -S"), None).unwrap();
        assert_eq!(pager.args, vec!["-S"]);
    }

    #[test]
    fn blank_pager_env_falls_back_to_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("more"), b"").unwrap();
        let pager = PagerCommand::resolve(Some("  "), Some(dir.path().as_os_str())).unwrap();
        assert_eq!(pager.program, dir.path().join("more"));
        assert!(pager.args.is_empty());
    }

    #[test]
    fn less_is_preferred_over_more() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("more"), b"").unwrap();
        std::fs::write(dir.path().join("less"), b"").unwrap();
        let pager = PagerCommand::resolve(None, Some(dir.path().as_os_str())).unwrap();
        assert_eq!(pager.program, dir.path().join("less"));
    }

    #[test]
    fn nothing_found() {
        let dir = TempDir::new().unwrap();
        assert!(PagerCommand::resolve(None, Some(dir.path().as_os_str())).is_none());
        assert!(PagerCommand::resolve(None, None).is_none());
    }
}
