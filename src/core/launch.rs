use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Placeholder replaced by the title's absolute path.
pub const PATH_PLACEHOLDER: &str = "%s";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{}: no launch command defined", .0.display())]
    NoCommand(PathBuf),
    #[error("failed to spawn `{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// How a launched title ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Terminating signal on Unix.
    pub signal: Option<i32>,
    pub elapsed: Duration,
}

impl LaunchOutcome {
    #[inline(always)]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    fn from_status(status: ExitStatus, elapsed: Duration) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;
        Self {
            code: status.code(),
            signal,
            elapsed,
        }
    }
}

/// Runs a title and blocks until it exits.
pub trait Launcher {
    fn launch(&mut self, command: &str, title_path: &Path) -> Result<LaunchOutcome, LaunchError>;
}

/// Quotes `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Substitutes every placeholder in `template` with the quoted title path.
pub fn expand_command(template: &str, title_path: &Path) -> String {
    template.replace(
        PATH_PLACEHOLDER,
        &shell_quote(&title_path.to_string_lossy()),
    )
}

pub struct ShellLauncher {
    shell: PathBuf,
}

impl ShellLauncher {
    pub fn new<P: Into<PathBuf>>(shell: P) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Launcher for ShellLauncher {
    fn launch(&mut self, command: &str, title_path: &Path) -> Result<LaunchOutcome, LaunchError> {
        let title_path = std::path::absolute(title_path).unwrap_or_else(|_| title_path.to_path_buf());
        let command = expand_command(command, &title_path);
        info!("Launching `{command}' in {}", title_path.display());

        let started = Instant::now();
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&command);
        if title_path.is_dir() {
            cmd.current_dir(&title_path);
        } else {
            warn!(
                "{}: not a directory; launching from the current directory",
                title_path.display()
            );
        }
        let status = cmd.status().map_err(|source| LaunchError::Spawn {
            command: command.clone(),
            source,
        })?;

        let outcome = LaunchOutcome::from_status(status, started.elapsed());
        info!(
            "`{command}' exited after {:.1?} (code {:?}, signal {:?})",
            outcome.elapsed, outcome.code, outcome.signal
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{LaunchError, Launcher, ShellLauncher, expand_command};
    use std::path::Path;

    #[test]
    fn placeholder_is_replaced_with_quoted_path() {
        assert_eq!(
            expand_command("snes9x %s/rom.sfc", Path::new("/games/smw")),
            "snes9x '/games/smw'/rom.sfc"
        );
        assert_eq!(
            expand_command("run %s %s", Path::new("/a/it's")),
            r"run '/a/it'\''s' '/a/it'\''s'"
        );
        assert_eq!(expand_command("true", Path::new("/x")), "true");
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_code_and_runs_in_title_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut launcher = ShellLauncher::new("/bin/sh");
        let ok = launcher
            .launch("test \"$(pwd -P)\" = \"$(cd %s && pwd -P)\"", dir.path())
            .expect("sh should spawn");
        assert!(ok.success(), "got {ok:?}");

        let failed = launcher.launch("exit 3", dir.path()).expect("sh should spawn");
        assert_eq!(failed.code, Some(3));
        assert!(!failed.success());
    }

    #[test]
    fn missing_shell_is_a_spawn_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut launcher = ShellLauncher::new(dir.path().join("no-such-shell"));
        let err = launcher.launch("true", dir.path()).expect_err("spawn must fail");
        assert!(matches!(err, LaunchError::Spawn { .. }), "got {err:?}");
    }
}
