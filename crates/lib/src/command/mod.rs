//! External command execution.
//!
//! Converter targets never spawn processes themselves; they hand a
//! [`CommandLine`] to a [`CommandRunner`]. The stock [`ProcessRunner`] runs
//! the program directly (no shell), with stdin closed and a wall-clock
//! timeout. Tests and hosts can substitute their own runner.

mod template;

pub use template::CommandTemplate;

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::consts::DEFAULT_COMMAND_TIMEOUT;
use crate::execute::BuildError;

/// A fully rendered program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
  /// Program name, resolved through `PATH` when it has no separator.
  pub program: String,
  /// Arguments, passed verbatim.
  pub args: Vec<String>,
  /// Working directory; inherits the caller's when `None`.
  pub cwd: Option<PathBuf>,
}

impl CommandLine {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }
}

impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " {arg:?}")?;
      } else {
        write!(f, " {arg}")?;
      }
    }
    Ok(())
  }
}

/// Runs external commands on behalf of converter targets.
pub trait CommandRunner {
  /// Run `command` to completion.
  ///
  /// Succeeds only if the program exits with status 0.
  fn run(&self, command: &CommandLine) -> Result<(), BuildError>;
}

/// Runs commands as child processes with a timeout.
///
/// The runner owns a current-thread tokio runtime and blocks on it for each
/// command, so it must not be used from inside another async runtime.
pub struct ProcessRunner {
  timeout: Duration,
  runtime: tokio::runtime::Runtime,
}

impl fmt::Debug for ProcessRunner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProcessRunner").field("timeout", &self.timeout).finish_non_exhaustive()
  }
}

impl ProcessRunner {
  /// Create a runner that kills commands running longer than `timeout`.
  pub fn new(timeout: Duration) -> std::io::Result<Self> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok(Self { timeout, runtime })
  }

  /// Create a runner with [`DEFAULT_COMMAND_TIMEOUT`].
  pub fn with_default_timeout() -> std::io::Result<Self> {
    Self::new(DEFAULT_COMMAND_TIMEOUT)
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl CommandRunner for ProcessRunner {
  fn run(&self, command: &CommandLine) -> Result<(), BuildError> {
    let line = command.to_string();
    info!(cmd = %line, "running command");

    let mut process = Command::new(&command.program);
    process
      .args(&command.args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      // Dropping the wait future on timeout kills the child.
      .kill_on_drop(true);

    if let Some(cwd) = &command.cwd {
      process.current_dir(cwd);
    }

    self.runtime.block_on(async {
      let child = process.spawn().map_err(|source| BuildError::CommandSpawn {
        cmd: line.clone(),
        source,
      })?;

      let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| BuildError::CommandSpawn {
          cmd: line.clone(),
          source,
        })?,
        Err(_) => {
          warn!(cmd = %line, timeout = ?self.timeout, "command timed out");
          return Err(BuildError::CommandFailed {
            cmd: line,
            code: None,
            timed_out: true,
          });
        }
      };

      let stdout = String::from_utf8_lossy(&output.stdout);
      let stderr = String::from_utf8_lossy(&output.stderr);

      if !output.status.success() {
        if !stderr.trim().is_empty() {
          debug!(stderr = %stderr.trim(), "command stderr");
        }
        if !stdout.trim().is_empty() {
          debug!(stdout = %stdout.trim(), "command stdout");
        }

        return Err(BuildError::CommandFailed {
          cmd: line,
          code: output.status.code(),
          timed_out: false,
        });
      }

      if !stdout.trim().is_empty() {
        debug!(stdout = %stdout.trim(), "command output");
      }

      Ok(())
    })
  }
}
