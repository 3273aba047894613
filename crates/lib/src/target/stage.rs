//! Staging files for atomic outputs.
//!
//! A recipe writes into a temporary sibling of its output; the sibling is
//! renamed over the output only once the recipe succeeds. Dropping a
//! [`StagedOutput`] without committing it removes the staging file.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::consts::STAGING_MARKER;
use crate::execute::BuildError;

pub(crate) struct StagedOutput {
  path: TempPath,
}

impl StagedOutput {
  /// Reserve a staging file next to `output`.
  ///
  /// The staging name keeps the output's extension, since converters often
  /// pick the file format from it.
  pub(crate) fn create(output: &Path) -> Result<Self, BuildError> {
    let dir = match output.parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir,
      _ => Path::new("."),
    };
    let name = output
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    let suffix = output
      .extension()
      .map(|ext| format!(".{}", ext.to_string_lossy()))
      .unwrap_or_default();

    let prefix = format!(".{name}.{STAGING_MARKER}-");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(&suffix);
    // tempfile defaults to 0600; request 0666 so the umask decides, as for a
    // file the recipe would have created itself.
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let file = builder
      .tempfile_in(dir)
      .map_err(|source| BuildError::Stage {
        path: output.to_path_buf(),
        source,
      })?;

    let path = file.into_temp_path();
    debug!(output = %output.display(), staging = %path.display(), "staging output");

    Ok(Self { path })
  }

  pub(crate) fn path(&self) -> &Path {
    &self.path
  }

  /// Move the staging file over `output`.
  pub(crate) fn commit(self, output: &Path) -> Result<(), BuildError> {
    if !self.path.exists() {
      return Err(BuildError::Stage {
        path: output.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "recipe removed its output without writing it"),
      });
    }

    self.path.persist(output).map_err(|err| BuildError::Stage {
      path: output.to_path_buf(),
      source: err.error,
    })
  }
}

/// Remove a partially written output after a failed non-atomic update.
pub(crate) fn discard_partial(output: &Path) {
  match std::fs::remove_file(output) {
    Ok(()) => warn!(output = %output.display(), "removed partial output"),
    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
    Err(err) => warn!(output = %output.display(), error = %err, "could not remove partial output"),
  }
}
