//! Shared test helpers for library integration tests.

use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use ndmake_lib::{
  BuildError, CommandLine, CommandRunner, CommandTemplate, Commands, ConvertTarget, ProcessRunner, SourceTarget,
  TargetRef,
};
use tempfile::TempDir;

/// A [`ProcessRunner`] that also records every command it runs.
pub struct SpyRunner {
  inner: ProcessRunner,
  commands: RefCell<Vec<CommandLine>>,
}

impl SpyRunner {
  pub fn new() -> Self {
    Self::with_timeout(Duration::from_secs(30))
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self {
      inner: ProcessRunner::new(timeout).unwrap(),
      commands: RefCell::new(Vec::new()),
    }
  }

  pub fn count(&self) -> usize {
    self.commands.borrow().len()
  }

  pub fn commands(&self) -> Vec<CommandLine> {
    self.commands.borrow().clone()
  }
}

impl CommandRunner for SpyRunner {
  fn run(&self, command: &CommandLine) -> Result<(), BuildError> {
    self.commands.borrow_mut().push(command.clone());
    self.inner.run(command)
  }
}

/// Isolated project directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Absolute path of `relative` inside the project.
  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file relative to the project, creating parent directories.
  pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Write a file and wrap it in a source target.
  pub fn source(&self, relative: &str, content: &str) -> TargetRef {
    Arc::new(SourceTarget::new(self.write_file(relative, content)))
  }
}

/// A converter that copies its first input with `cp`.
pub fn copy_of(output: &Path, deps: Vec<TargetRef>) -> TargetRef {
  Arc::new(ConvertTarget::new(output, deps, copy_commands()))
}

pub fn copy_commands() -> Commands {
  Commands::new(vec![CommandTemplate::new("cp").arg("$${in}").arg("$${out}")])
}

/// A converter that runs `script` through `/bin/sh -c`.
pub fn scripted(output: &Path, deps: Vec<TargetRef>, script: &str) -> TargetRef {
  let template = CommandTemplate::new("/bin/sh").arg("-c").arg(script).arg("sh").arg("$${out}");
  Arc::new(ConvertTarget::new(output, deps, Commands::new(vec![template])))
}

/// A fixed instant well in the past, offset by `secs`.
pub fn at(secs: u64) -> SystemTime {
  SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs)
}

pub fn set_mtime(path: &Path, time: SystemTime) {
  File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
  std::fs::metadata(path).unwrap().modified().unwrap()
}
