use super::{encoder_for, ArchiveEncoder, ArchiveError, ArchiveResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use xtract_core::ArchiveFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackEntryKind {
    File,
    Directory,
}

/// One item to place in an output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Name inside the archive, `/`-separated and relative to the packaged root
    pub name: String,
    /// Location on disk
    pub path: PathBuf,
    pub kind: PackEntryKind,
}

/// List everything below `root` that belongs in an archive.
///
/// Regular files are always listed. Directories are only listed when empty,
/// since non-empty ones are implied by their files. Symlinks and other special
/// files are skipped. Entries are sorted by name.
pub fn collect_entries(root: &Path) -> io::Result<Vec<PackEntry>> {
    let mut entries = Vec::new();
    walk(root, root, &mut entries)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn walk(root: &Path, dir: &Path, entries: &mut Vec<PackEntry>) -> io::Result<()> {
    for item in fs::read_dir(dir)? {
        let item = item?;
        let path = item.path();
        let file_type = fs::symlink_metadata(&path)?.file_type();

        if file_type.is_dir() {
            let before = entries.len();
            walk(root, &path, entries)?;
            if entries.len() == before {
                entries.push(PackEntry {
                    name: entry_name(root, &path),
                    path,
                    kind: PackEntryKind::Directory,
                });
            }
        } else if file_type.is_file() {
            entries.push(PackEntry {
                name: entry_name(root, &path),
                path,
                kind: PackEntryKind::File,
            });
        } else {
            tracing::warn!(path = %path.display(), "Skipping non-regular file");
        }
    }
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Packages a directory tree into the configured output format.
pub struct ArchiveWriter {
    format: ArchiveFormat,
    encoder: Box<dyn ArchiveEncoder>,
}

impl ArchiveWriter {
    pub fn new(format: ArchiveFormat) -> ArchiveResult<Self> {
        let encoder =
            encoder_for(format).ok_or_else(|| ArchiveError::UnsupportedFormat(format.to_string()))?;
        Ok(Self { format, encoder })
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Build an archive of everything below `root`. Entry names are relative to `root`.
    #[tracing::instrument(skip(self), fields(format = %self.format))]
    pub fn package_directory(&self, root: &Path) -> ArchiveResult<Vec<u8>> {
        let entries = collect_entries(root)?;
        let bytes = self.encoder.encode(&entries)?;

        tracing::debug!(entries = entries.len(), size = bytes.len(), "Directory packaged");
        Ok(bytes)
    }
}
