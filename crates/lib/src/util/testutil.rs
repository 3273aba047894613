//! Test utilities for ndmake-lib.
//!
//! This module provides a recording command runner, fixed timestamps, and
//! cross-platform helpers for tests that run real programs.

use std::cell::RefCell;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::command::{CommandLine, CommandRunner, CommandTemplate};
use crate::execute::BuildError;
use crate::target::{Commands, ConvertJob};

/// What a [`RecordingRunner`] does besides recording.
#[derive(Debug, Clone, Copy)]
enum Behavior {
  Record,
  Touch,
  Fail(i32),
}

/// A command runner that records every command instead of spawning it.
#[derive(Debug)]
pub struct RecordingRunner {
  behavior: Behavior,
  commands: RefCell<Vec<CommandLine>>,
}

impl RecordingRunner {
  /// Record commands and report success.
  pub fn new() -> Self {
    Self::with_behavior(Behavior::Record)
  }

  /// Record commands and create (or refresh) the file named by the last argument.
  pub fn touching() -> Self {
    Self::with_behavior(Behavior::Touch)
  }

  /// Record commands and fail each one with `code`.
  pub fn failing(code: i32) -> Self {
    Self::with_behavior(Behavior::Fail(code))
  }

  fn with_behavior(behavior: Behavior) -> Self {
    Self {
      behavior,
      commands: RefCell::new(Vec::new()),
    }
  }

  pub fn commands(&self) -> Vec<CommandLine> {
    self.commands.borrow().clone()
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&self, command: &CommandLine) -> Result<(), BuildError> {
    self.commands.borrow_mut().push(command.clone());

    match self.behavior {
      Behavior::Record => Ok(()),
      Behavior::Touch => {
        if let Some(path) = command.args.last() {
          std::fs::write(path, command.to_string()).unwrap();
        }
        Ok(())
      }
      Behavior::Fail(code) => Err(BuildError::CommandFailed {
        cmd: command.to_string(),
        code: Some(code),
        timed_out: false,
      }),
    }
  }
}

/// A recipe with a single `touch $${out}` command.
pub fn touch_commands() -> Commands {
  Commands::new(vec![CommandTemplate::new("touch").arg("$${out}")])
}

/// A recipe that writes the output directly, without any command.
pub fn write_output(job: &ConvertJob, _runner: &dyn CommandRunner) -> Result<(), BuildError> {
  std::fs::write(&job.output, "converted").unwrap();
  Ok(())
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}

/// A fixed instant, `secs` seconds after an arbitrary base well in the past.
pub fn at(secs: u64) -> SystemTime {
  SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs)
}

/// Set the modification time of `path`.
pub fn set_mtime(path: &Path, time: SystemTime) {
  File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}
