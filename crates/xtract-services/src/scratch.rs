//! Per-conversion scratch space.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xtract_core::ArchiveFormat;

const CONTENT_DIR: &str = "content";

/// Uniquely named directory owned by a single conversion.
///
/// Holds the staged upload and the `content/` directory that receives extracted
/// entries. The whole tree is removed when the guard is dropped, whichever way
/// the conversion ends.
pub struct ScratchDirectory {
    dir: Option<TempDir>,
    path: PathBuf,
    content_dir: PathBuf,
}

impl ScratchDirectory {
    /// Create a fresh scratch directory below `root`.
    pub fn create_in(root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("xtract-").tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        let content_dir = path.join(CONTENT_DIR);
        fs::create_dir(&content_dir)?;

        tracing::debug!(path = %path.display(), "Created scratch directory");

        Ok(Self {
            dir: Some(dir),
            path,
            content_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that extracted entries are written to.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Location of the staged upload for `format`; sits beside `content/`, never inside it.
    pub fn upload_path(&self, format: ArchiveFormat) -> PathBuf {
        self.path.join(format!("upload.{}", format.extension()))
    }

    /// Copy the uploaded bytes to disk so seek-based decoders can open them by path.
    pub fn stage_upload(&self, source: &mut dyn Read, format: ArchiveFormat) -> io::Result<PathBuf> {
        let upload_path = self.upload_path(format);
        let mut writer = BufWriter::new(File::create(&upload_path)?);
        let bytes = io::copy(source, &mut writer)?;
        writer.flush()?;

        tracing::debug!(path = %upload_path.display(), bytes, "Staged upload");
        Ok(upload_path)
    }
}

impl Drop for ScratchDirectory {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "Removed scratch directory"),
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove scratch directory"
                ),
            }
        }
    }
}
