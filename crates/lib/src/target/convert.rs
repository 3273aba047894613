use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::stage::{StagedOutput, discard_partial};
use super::{Target, TargetId, TargetRef, default_dirty};
use crate::command::{CommandRunner, CommandTemplate};
use crate::execute::{BuildContext, BuildError};

/// Paths handed to a [`Recipe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
  /// Output paths of the file-backed dependencies, in declared order.
  pub inputs: Vec<PathBuf>,
  /// Where the recipe must write. A staging file when outputs are atomic.
  pub output: PathBuf,
  /// The target's final output path.
  pub target: PathBuf,
}

/// How a [`ConvertTarget`] produces its output from its inputs.
pub trait Recipe {
  fn run(&self, job: &ConvertJob, runner: &dyn CommandRunner) -> Result<(), BuildError>;
}

impl<F> Recipe for F
where
  F: Fn(&ConvertJob, &dyn CommandRunner) -> Result<(), BuildError>,
{
  fn run(&self, job: &ConvertJob, runner: &dyn CommandRunner) -> Result<(), BuildError> {
    self(job, runner)
  }
}

/// A recipe that runs a fixed list of command templates in order.
#[derive(Debug, Clone, Default)]
pub struct Commands {
  templates: Vec<CommandTemplate>,
}

impl Commands {
  pub fn new(templates: Vec<CommandTemplate>) -> Self {
    Self { templates }
  }

  pub fn then(mut self, template: CommandTemplate) -> Self {
    self.templates.push(template);
    self
  }
}

impl Recipe for Commands {
  fn run(&self, job: &ConvertJob, runner: &dyn CommandRunner) -> Result<(), BuildError> {
    for template in &self.templates {
      runner.run(&template.render(job)?)?;
    }
    Ok(())
  }
}

type Validator = Box<dyn Fn(&Path) -> bool>;

/// A file produced by running a recipe against its dependencies.
pub struct ConvertTarget {
  id: TargetId,
  path: PathBuf,
  deps: Vec<TargetRef>,
  recipe: Box<dyn Recipe>,
  validator: Option<Validator>,
}

impl fmt::Debug for ConvertTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConvertTarget")
      .field("path", &self.path)
      .field("deps", &self.deps)
      .finish_non_exhaustive()
  }
}

impl ConvertTarget {
  pub fn new(path: impl Into<PathBuf>, deps: Vec<TargetRef>, recipe: impl Recipe + 'static) -> Self {
    let path = path.into();
    Self {
      id: TargetId::File(path.clone()),
      path,
      deps,
      recipe: Box::new(recipe),
      validator: None,
    }
  }

  /// Also treat the target as dirty when `is_valid` rejects the existing output.
  ///
  /// The check only runs when the output exists and the timestamp check
  /// found it fresh.
  pub fn with_validator(mut self, is_valid: impl Fn(&Path) -> bool + 'static) -> Self {
    self.validator = Some(Box::new(is_valid));
    self
  }

  fn job(&self, output: PathBuf) -> ConvertJob {
    ConvertJob {
      inputs: self
        .deps
        .iter()
        .filter_map(|dep| dep.path().map(Path::to_path_buf))
        .collect(),
      output,
      target: self.path.clone(),
    }
  }
}

impl Target for ConvertTarget {
  fn id(&self) -> &TargetId {
    &self.id
  }

  fn dependencies(&self) -> &[TargetRef] {
    &self.deps
  }

  fn dirty(&self) -> Result<bool, BuildError> {
    if default_dirty(self)? {
      return Ok(true);
    }

    match &self.validator {
      Some(is_valid) if !is_valid(&self.path) => {
        debug!(target = %self.id, "existing output failed validation");
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  fn do_update(&self, ctx: &BuildContext<'_>) -> Result<(), BuildError> {
    if ctx.config().atomic_outputs {
      let staged = StagedOutput::create(&self.path)?;
      let job = self.job(staged.path().to_path_buf());
      self.recipe.run(&job, ctx.runner())?;
      return staged.commit(&self.path);
    }

    let job = self.job(self.path.clone());
    self.recipe.run(&job, ctx.runner()).inspect_err(|_| discard_partial(&self.path))
  }
}
