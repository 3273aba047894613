use std::path::PathBuf;

use super::CommandLine;
use crate::placeholder::{self, PlaceholderError, Resolver};
use crate::target::ConvertJob;

/// A command whose program and arguments may contain placeholders.
///
/// Rendering against a [`ConvertJob`] produces the [`CommandLine`] that is
/// actually run. See [`crate::placeholder`] for the syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
  program: String,
  args: Vec<String>,
  cwd: Option<PathBuf>,
}

impl CommandTemplate {
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

  /// Substitute the job's paths into the program and arguments.
  pub fn render(&self, job: &ConvertJob) -> Result<CommandLine, PlaceholderError> {
    let resolver = JobResolver::new(job);

    let mut command = CommandLine::new(placeholder::substitute(&self.program, &resolver)?);
    for arg in &self.args {
      let segments = placeholder::parse(arg)?;
      if placeholder::is_whole_inputs(&segments) {
        command.args.extend(resolver.inputs.iter().cloned());
      } else {
        command.args.push(placeholder::substitute_segments(&segments, &resolver)?);
      }
    }
    command.cwd = self.cwd.clone();

    Ok(command)
  }
}

struct JobResolver {
  out: String,
  inputs: Vec<String>,
}

impl JobResolver {
  fn new(job: &ConvertJob) -> Self {
    Self {
      out: job.output.to_string_lossy().into_owned(),
      inputs: job
        .inputs
        .iter()
        .map(|input| input.to_string_lossy().into_owned())
        .collect(),
    }
  }
}

impl Resolver for JobResolver {
  fn resolve_out(&self) -> Result<&str, PlaceholderError> {
    Ok(&self.out)
  }

  fn resolve_input(&self, index: usize) -> Result<&str, PlaceholderError> {
    self
      .inputs
      .get(index)
      .map(|s| s.as_str())
      .ok_or(PlaceholderError::UnresolvedInput {
        index,
        count: self.inputs.len(),
      })
  }
}
