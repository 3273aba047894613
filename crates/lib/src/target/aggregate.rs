use super::{Target, TargetId, TargetRef};
use crate::execute::{BuildContext, BuildError};

/// A virtual target that brings a group of targets up to date.
///
/// Like make's `.PHONY`, it has no file of its own: it is always dirty, so
/// updating it always cascades into its dependencies, and its own update
/// action does nothing.
#[derive(Debug)]
pub struct AggregateTarget {
  id: TargetId,
  deps: Vec<TargetRef>,
}

impl AggregateTarget {
  pub fn new(deps: Vec<TargetRef>) -> Self {
    Self {
      id: TargetId::new_virtual(),
      deps,
    }
  }
}

impl Target for AggregateTarget {
  fn id(&self) -> &TargetId {
    &self.id
  }

  fn dependencies(&self) -> &[TargetRef] {
    &self.deps
  }

  fn dirty(&self) -> Result<bool, BuildError> {
    Ok(true)
  }

  fn do_update(&self, _ctx: &BuildContext<'_>) -> Result<(), BuildError> {
    Ok(())
  }
}
