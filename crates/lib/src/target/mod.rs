//! Build targets.
//!
//! A target is a node in the dependency graph. Every kind implements three
//! primitives, [`Target::id`], [`Target::dependencies`] and
//! [`Target::do_update`]; the staleness check defaults to
//! [`default_dirty`] and the traversal itself lives in [`crate::execute`],
//! where no kind can override it.
//!
//! # Kinds
//!
//! - [`SourceTarget`] - an externally authored file that must exist
//! - [`ConvertTarget`] - produced by a [`Recipe`] from its dependencies
//! - [`HardlinkTarget`] - a hard link to a single dependency
//! - [`AggregateTarget`] - a virtual group that forces its members up to date

mod aggregate;
mod convert;
mod hardlink;
mod source;
mod stage;
mod types;

pub use aggregate::AggregateTarget;
pub use convert::{Commands, ConvertJob, ConvertTarget, Recipe};
pub use hardlink::HardlinkTarget;
pub use source::SourceTarget;
pub use types::{TargetId, Timestamp};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::execute::{BuildContext, BuildError};

/// Shared handle to a target; a target may be a dependency of several others.
pub type TargetRef = Arc<dyn Target>;

/// A node in the build dependency graph.
pub trait Target: fmt::Debug {
  /// Identity of this target: its file path, or a virtual label.
  ///
  /// Objects sharing an identity are treated as one target; see [`TargetId`].
  fn id(&self) -> &TargetId;

  /// Targets that must be up to date before this one is built, in order.
  fn dependencies(&self) -> &[TargetRef];

  /// Whether this target must be rebuilt.
  ///
  /// Kinds that add content checks must OR them with [`default_dirty`]
  /// rather than replace it.
  fn dirty(&self) -> Result<bool, BuildError> {
    default_dirty(self)
  }

  /// Unconditionally produce this target's output.
  ///
  /// Called only after every dependency is up to date and the output
  /// directory exists.
  fn do_update(&self, ctx: &BuildContext<'_>) -> Result<(), BuildError>;

  fn timestamp(&self) -> Timestamp {
    self.id().timestamp()
  }

  fn path(&self) -> Option<&Path> {
    self.id().path()
  }
}

/// The staleness check shared by every file-backed target.
///
/// A target is dirty if its file is missing, if any dependency is itself
/// dirty, or if any dependency is strictly newer than it.
pub fn default_dirty<T: Target + ?Sized>(target: &T) -> Result<bool, BuildError> {
  let id = target.id();
  if !id.exists() {
    debug!(target = %id, "output missing");
    return Ok(true);
  }

  let own = target.timestamp();
  for dep in target.dependencies() {
    if dep.dirty()? {
      debug!(target = %id, dependency = %dep.id(), "dependency is dirty");
      return Ok(true);
    }
    if dep.timestamp() > own {
      debug!(target = %id, dependency = %dep.id(), "dependency is newer");
      return Ok(true);
    }
  }

  Ok(false)
}

/// Create the parent directory of a file-backed target.
///
/// Virtual targets and bare file names have no directory to create.
pub fn ensure_output_dir(id: &TargetId) -> Result<(), BuildError> {
  let Some(dir) = id.path().and_then(Path::parent).filter(|dir| !dir.as_os_str().is_empty()) else {
    return Ok(());
  };

  std::fs::create_dir_all(dir).map_err(|source| BuildError::DirectoryCreateFailed {
    path: dir.to_path_buf(),
    source: Some(source),
  })?;

  if !dir.is_dir() {
    return Err(BuildError::DirectoryCreateFailed {
      path: dir.to_path_buf(),
      source: None,
    });
  }

  Ok(())
}
