use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Target, TargetId, TargetRef};
use crate::execute::{BuildContext, BuildError};

/// An output that is a hard link to its single dependency.
///
/// Staleness follows the default timestamp check; since both names share an
/// inode, a freshly linked output carries its source's modification time.
#[derive(Debug)]
pub struct HardlinkTarget {
  id: TargetId,
  path: PathBuf,
  src: TargetRef,
}

impl HardlinkTarget {
  pub fn new(path: impl Into<PathBuf>, src: TargetRef) -> Self {
    let path = path.into();
    Self {
      id: TargetId::File(path.clone()),
      path,
      src,
    }
  }

  fn link_failed(&self, src: &Path, source: io::Error) -> BuildError {
    BuildError::LinkFailed {
      src: src.to_path_buf(),
      dest: self.path.clone(),
      source,
    }
  }
}

impl Target for HardlinkTarget {
  fn id(&self) -> &TargetId {
    &self.id
  }

  fn dependencies(&self) -> &[TargetRef] {
    std::slice::from_ref(&self.src)
  }

  fn do_update(&self, _ctx: &BuildContext<'_>) -> Result<(), BuildError> {
    let Some(src) = self.src.path() else {
      return Err(BuildError::LinkFailed {
        src: PathBuf::from(self.src.id().to_string()),
        dest: self.path.clone(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "cannot link to a virtual target"),
      });
    };

    // symlink_metadata so a dangling symlink at the destination is replaced too.
    if self.path.symlink_metadata().is_ok() {
      debug!(dest = %self.path.display(), "removing existing output");
      std::fs::remove_file(&self.path).map_err(|err| self.link_failed(src, err))?;
    }

    debug!(src = %src.display(), dest = %self.path.display(), "creating hard link");
    link_no_follow(src, &self.path).map_err(|err| self.link_failed(src, err))
  }
}

/// Hard-link `src` to `dest`, linking a symlink itself rather than its target.
#[cfg(unix)]
fn link_no_follow(src: &Path, dest: &Path) -> io::Result<()> {
  use rustix::fs::{AtFlags, CWD, linkat};

  linkat(CWD, src, CWD, dest, AtFlags::empty()).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn link_no_follow(src: &Path, dest: &Path) -> io::Result<()> {
  std::fs::hard_link(src, dest)
}
