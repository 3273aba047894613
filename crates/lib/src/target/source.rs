use std::path::PathBuf;

use super::{Target, TargetId, TargetRef};
use crate::execute::{BuildContext, BuildError};

/// An externally authored file the build only reads.
///
/// A source is never stale and never produced: a missing source is a
/// configuration error, reported as [`BuildError::MissingSource`] from both
/// `dirty` and `do_update`.
#[derive(Debug, Clone)]
pub struct SourceTarget {
  id: TargetId,
}

impl SourceTarget {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      id: TargetId::File(path.into()),
    }
  }

  fn check_exists(&self) -> Result<(), BuildError> {
    if self.id.exists() {
      Ok(())
    } else {
      Err(BuildError::MissingSource {
        path: self.id.path().map(PathBuf::from).unwrap_or_default(),
      })
    }
  }
}

impl Target for SourceTarget {
  fn id(&self) -> &TargetId {
    &self.id
  }

  fn dependencies(&self) -> &[TargetRef] {
    &[]
  }

  fn dirty(&self) -> Result<bool, BuildError> {
    self.check_exists()?;
    Ok(false)
  }

  fn do_update(&self, _ctx: &BuildContext<'_>) -> Result<(), BuildError> {
    self.check_exists()
  }
}
