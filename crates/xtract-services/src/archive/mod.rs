//! Archive reading and writing.
//!
//! Decompression and compression are delegated to format libraries behind the
//! [`ArchiveDecoder`] and [`ArchiveEncoder`] traits; [`ArchiveReader`] and
//! [`ArchiveWriter`] pick the implementation for a format.

mod paths;
mod rar_codec;
mod reader;
mod tar_codec;
mod writer;
mod zip_codec;

pub use paths::safe_relative_path;
pub use reader::ArchiveReader;
pub use writer::{collect_entries, ArchiveWriter, PackEntry, PackEntryKind};

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;
use xtract_core::ArchiveFormat;

/// Archive operation errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("No archive codec for {0}")]
    UnsupportedFormat(String),

    #[error("Archive is protected by a password")]
    PasswordRequired,

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Counts collected while extracting an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Extracts every entry of an archive file into a destination directory.
pub trait ArchiveDecoder: Send + Sync {
    fn format(&self) -> ArchiveFormat;

    /// Write all entries of the archive at `archive_path` below `destination`,
    /// keeping their relative paths.
    fn decode(&self, archive_path: &Path, destination: &Path) -> ArchiveResult<ExtractStats>;
}

/// Builds an in-memory archive from a list of files and directories.
pub trait ArchiveEncoder: Send + Sync {
    fn format(&self) -> ArchiveFormat;

    fn encode(&self, entries: &[PackEntry]) -> ArchiveResult<Vec<u8>>;
}

/// Decoder for `format`. Every format can be read.
pub fn decoder_for(format: ArchiveFormat) -> Box<dyn ArchiveDecoder> {
    match format {
        ArchiveFormat::Rar => Box::new(rar_codec::RarCodec),
        ArchiveFormat::Zip => Box::new(zip_codec::ZipCodec),
        ArchiveFormat::Tar => Box::new(tar_codec::TarCodec::plain()),
        ArchiveFormat::TarGz => Box::new(tar_codec::TarCodec::gzip()),
    }
}

/// Encoder for `format`, if it can be written.
pub fn encoder_for(format: ArchiveFormat) -> Option<Box<dyn ArchiveEncoder>> {
    match format {
        ArchiveFormat::Rar => None,
        ArchiveFormat::Zip => Some(Box::new(zip_codec::ZipCodec)),
        ArchiveFormat::Tar => Some(Box::new(tar_codec::TarCodec::plain())),
        ArchiveFormat::TarGz => Some(Box::new(tar_codec::TarCodec::gzip())),
    }
}

/// Copy one entry's bytes into a new file at `target`, creating parent directories.
///
/// Read failures come from the archive and are reported as corruption; write
/// failures are filesystem errors.
pub(crate) fn write_entry(target: &Path, entry: &mut dyn Read) -> ArchiveResult<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(target)?;

    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ArchiveError::CorruptArchive(format!(
                    "Failed to read entry {}: {}",
                    target.display(),
                    e
                )))
            }
        };
        file.write_all(&buf[..n])?;
        written += n as u64;
    }
    file.flush()?;
    Ok(written)
}
