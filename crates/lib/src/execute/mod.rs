//! Build execution module.
//!
//! This module provides the entry points for bringing a target up to date.
//! It handles:
//! - Cycle detection before the walk starts
//! - The depth-first, bottom-up update traversal
//! - A per-run memo so shared dependencies are updated once
//! - Dependency chains on failure
//!
//! The traversal is the same for every target kind: if the target is dirty,
//! update its dependencies in order, ensure its output directory exists,
//! then run its update action. A clean target is not descended into.

mod dag;
pub mod types;

use std::collections::HashSet;

use tracing::{debug, info, info_span};

use crate::command::{CommandLine, CommandRunner};
use self::dag::TargetGraph;
use crate::target::{Target, TargetId, ensure_output_dir};

pub use types::{BuildConfig, BuildContext, BuildError, BuildFailure, BuildReport};

/// Bring `root` and everything it depends on up to date.
///
/// This is the main entry point for a build. Every dirty target in the
/// subgraph is updated after its dependencies; clean targets are skipped
/// without visiting their dependencies.
///
/// # Errors
///
/// The first fatal error aborts the run and is returned together with the
/// chain of targets from `root` down to the one that failed. Outputs updated
/// before the failure stay in place.
pub fn update(
  root: &dyn Target,
  runner: &dyn CommandRunner,
  config: &BuildConfig,
) -> Result<BuildReport, BuildFailure> {
  Builder::new(runner, config).run(root, Mode::Update)
}

/// Report which targets [`update`] would rebuild, without writing anything.
pub fn plan(root: &dyn Target, config: &BuildConfig) -> Result<BuildReport, BuildFailure> {
  Builder::new(&DryRunner, config).run(root, Mode::Plan)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Update,
  Plan,
}

/// State of one run.
struct Builder<'a> {
  ctx: BuildContext<'a>,
  /// Targets already brought up to date in this run.
  completed: HashSet<TargetId>,
  report: BuildReport,
}

impl<'a> Builder<'a> {
  fn new(runner: &'a dyn CommandRunner, config: &'a BuildConfig) -> Self {
    Self {
      ctx: BuildContext::new(runner, config),
      completed: HashSet::new(),
      report: BuildReport::default(),
    }
  }

  fn run(mut self, root: &dyn Target, mode: Mode) -> Result<BuildReport, BuildFailure> {
    let span = info_span!("build", root = %root.id(), dry_run = mode == Mode::Plan);
    let _guard = span.enter();

    if self.ctx.config().detect_cycles {
      let graph = TargetGraph::from_root(root).map_err(|err| BuildFailure::at(root.id(), err))?;
      debug!(targets = graph.len(), "checking dependency graph");
      graph.verify_acyclic().map_err(|err| BuildFailure::at(root.id(), err))?;
    }

    self.visit(root, mode)?;
    self.report.dry_run = mode == Mode::Plan;

    info!(
      updated = self.report.updated.len(),
      up_to_date = self.report.up_to_date,
      "build complete"
    );

    Ok(self.report)
  }

  fn visit(&mut self, target: &dyn Target, mode: Mode) -> Result<(), BuildFailure> {
    let id = target.id();
    if self.completed.contains(id) {
      return Ok(());
    }

    if !target.dirty().map_err(|err| BuildFailure::at(id, err))? {
      debug!(target = %id, "up to date");
      self.report.up_to_date += 1;
      self.completed.insert(id.clone());
      return Ok(());
    }

    for dep in target.dependencies() {
      self.visit(dep.as_ref(), mode).map_err(|failure| failure.within(id))?;
    }

    if mode == Mode::Update {
      ensure_output_dir(id).map_err(|err| BuildFailure::at(id, err))?;
      if !id.is_virtual() {
        info!(target = %id, "updating");
      }
      target.do_update(&self.ctx).map_err(|err| BuildFailure::at(id, err))?;
    } else if !id.is_virtual() {
      info!(target = %id, "would update");
    }

    if !id.is_virtual() {
      self.report.updated.push(id.clone());
    }
    self.completed.insert(id.clone());

    Ok(())
  }
}

/// Runner for plans, which never reach an update action.
struct DryRunner;

impl CommandRunner for DryRunner {
  fn run(&self, command: &CommandLine) -> Result<(), BuildError> {
    debug!(cmd = %command, "dry run: skipping command");
    Ok(())
  }
}
