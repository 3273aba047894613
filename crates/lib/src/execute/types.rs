//! Types for build execution.
//!
//! This module defines the error types, the build report, and the
//! configuration shared by every run.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::command::CommandRunner;
use crate::placeholder::PlaceholderError;
use crate::target::TargetId;

/// Errors that can occur while checking or updating a target.
///
/// Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A source file does not exist.
  #[error("source file missing: {}", .path.display())]
  MissingSource { path: PathBuf },

  /// The output directory could not be created, or is not a directory.
  #[error("directory could not be created: {}", .path.display())]
  DirectoryCreateFailed {
    path: PathBuf,
    #[source]
    source: Option<std::io::Error>,
  },

  /// A command exited non-zero or ran past its timeout.
  #[error("command {}: {cmd}", describe_failure(.code, .timed_out))]
  CommandFailed {
    cmd: String,
    code: Option<i32>,
    timed_out: bool,
  },

  /// A command could not be started or waited on.
  #[error("could not run command: {cmd}")]
  CommandSpawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// A hard link could not be created.
  #[error("could not link {} to {}", .src.display(), .dest.display())]
  LinkFailed {
    src: PathBuf,
    dest: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A command template could not be rendered.
  #[error("placeholder error: {0}")]
  Placeholder(#[from] PlaceholderError),

  /// An output staging file could not be created, moved, or removed.
  #[error("could not stage output {}", .path.display())]
  Stage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The dependency graph contains a cycle through this target.
  #[error("dependency cycle detected at {target}")]
  CycleDetected { target: String },

  /// Two different target objects share this identity but declare
  /// different dependencies.
  #[error("conflicting definitions of target {target}")]
  ConflictingTarget { target: String },
}

fn describe_failure(code: &Option<i32>, timed_out: &bool) -> String {
  match (code, *timed_out) {
    (_, true) => "timed out".to_string(),
    (Some(code), false) => format!("failed with exit code {code}"),
    (None, false) => "terminated by signal".to_string(),
  }
}

/// A fatal build error and the dependency chain that led to it.
///
/// `chain` starts at the target passed to the entry point and ends at the
/// target whose check or update failed.
#[derive(Debug, Error)]
#[error("failed to build {}: {error}", describe_target(.chain.last()))]
pub struct BuildFailure {
  pub chain: Vec<TargetId>,
  #[source]
  pub error: BuildError,
}

impl BuildFailure {
  pub(crate) fn at(target: &TargetId, error: BuildError) -> Self {
    Self {
      chain: vec![target.clone()],
      error,
    }
  }

  /// Prepend a dependent as the failure propagates up the graph.
  pub(crate) fn within(mut self, dependent: &TargetId) -> Self {
    self.chain.insert(0, dependent.clone());
    self
  }

  /// The target whose check or update failed.
  pub fn failed_target(&self) -> Option<&TargetId> {
    self.chain.last()
  }
}

fn describe_target(id: Option<&TargetId>) -> String {
  id.map_or_else(|| "<unknown>".to_string(), ToString::to_string)
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
  /// File-backed targets whose update action ran (or would run, for a
  /// plan), in execution order.
  pub updated: Vec<TargetId>,

  /// Number of targets found up to date.
  pub up_to_date: usize,

  /// Whether this report comes from a dry run.
  pub dry_run: bool,
}

impl BuildReport {
  /// Returns true if nothing had to be rebuilt.
  pub fn is_noop(&self) -> bool {
    self.updated.is_empty()
  }
}

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  /// Write converter outputs to a staging file and rename on success.
  pub atomic_outputs: bool,

  /// Reject cyclic graphs, and targets defined twice with different
  /// dependencies, before visiting any target.
  pub detect_cycles: bool,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      atomic_outputs: true,
      detect_cycles: true,
    }
  }
}

/// What a target's update action can use.
pub struct BuildContext<'a> {
  runner: &'a dyn CommandRunner,
  config: &'a BuildConfig,
}

impl<'a> BuildContext<'a> {
  pub fn new(runner: &'a dyn CommandRunner, config: &'a BuildConfig) -> Self {
    Self { runner, config }
  }

  pub fn runner(&self) -> &'a dyn CommandRunner {
    self.runner
  }

  pub fn config(&self) -> &'a BuildConfig {
    self.config
  }
}
