//! Identity and timestamp types shared by every target kind.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::{Serialize, Serializer};

use crate::consts::VIRTUAL_TARGET_PREFIX;

static NEXT_VIRTUAL_ID: AtomicU64 = AtomicU64::new(1);

/// What a target represents on disk.
///
/// File-backed targets are identified by their path. Virtual targets have no
/// file; their id is a synthesized label that is never handed to the
/// filesystem.
///
/// A run updates each identity at most once. Several objects may share a
/// path (two `SourceTarget`s for one input, say) only if they declare the
/// same dependencies; otherwise a run with `BuildConfig::detect_cycles`
/// fails with `ConflictingTarget` before anything is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
  /// A real file at this path.
  File(PathBuf),
  /// A grouping with no artifact of its own.
  Virtual(String),
}

impl TargetId {
  pub fn file(path: impl Into<PathBuf>) -> Self {
    TargetId::File(path.into())
  }

  /// Synthesize a fresh virtual id, unique within this process.
  pub fn new_virtual() -> Self {
    let n = NEXT_VIRTUAL_ID.fetch_add(1, Ordering::Relaxed);
    TargetId::Virtual(format!("{VIRTUAL_TARGET_PREFIX}-{:x}-{n:x}", std::process::id()))
  }

  /// The file path, if this target is file-backed.
  pub fn path(&self) -> Option<&Path> {
    match self {
      TargetId::File(path) => Some(path),
      TargetId::Virtual(_) => None,
    }
  }

  pub fn is_virtual(&self) -> bool {
    matches!(self, TargetId::Virtual(_))
  }

  /// Whether the file exists. Always false for virtual targets.
  pub fn exists(&self) -> bool {
    self.path().is_some_and(Path::exists)
  }

  pub fn timestamp(&self) -> Timestamp {
    match self {
      TargetId::File(path) => Timestamp::of(path),
      TargetId::Virtual(_) => Timestamp::Missing,
    }
  }
}

impl fmt::Display for TargetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetId::File(path) => write!(f, "{}", path.display()),
      TargetId::Virtual(id) => write!(f, "{id}"),
    }
  }
}

impl Serialize for TargetId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Last modification time of a target's file.
///
/// `Missing` orders before every real instant, so a missing file always
/// compares as older than any existing dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timestamp {
  Missing,
  Modified(SystemTime),
}

impl Timestamp {
  /// Read the modification time of `path`, following symlinks.
  ///
  /// Any error reading the metadata counts as missing; the caller then
  /// treats the target as stale and the real error surfaces on rebuild.
  pub fn of(path: &Path) -> Self {
    match std::fs::metadata(path).and_then(|meta| meta.modified()) {
      Ok(time) => Timestamp::Modified(time),
      Err(_) => Timestamp::Missing,
    }
  }

  pub fn is_missing(&self) -> bool {
    matches!(self, Timestamp::Missing)
  }
}
