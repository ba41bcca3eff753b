use super::{safe_relative_path, ArchiveDecoder, ArchiveError, ArchiveResult, ExtractStats};
use std::fs;
use std::io;
use std::path::Path;
use unrar::error::{Code, UnrarError};
use unrar::Archive;
use xtract_core::ArchiveFormat;

/// RAR decoder backed by the `unrar` crate. RAR is read-only.
pub struct RarCodec;

fn map_unrar_error(err: UnrarError) -> ArchiveError {
    match err.code {
        Code::MissingPassword | Code::BadPassword => ArchiveError::PasswordRequired,
        Code::EOpen | Code::ECreate | Code::EClose | Code::ERead | Code::EWrite => {
            ArchiveError::Io(io::Error::other(err.to_string()))
        }
        _ => ArchiveError::CorruptArchive(err.to_string()),
    }
}

impl ArchiveDecoder for RarCodec {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Rar
    }

    fn decode(&self, archive_path: &Path, destination: &Path) -> ArchiveResult<ExtractStats> {
        let mut archive = Archive::new(archive_path)
            .open_for_processing()
            .map_err(map_unrar_error)?;
        let mut stats = ExtractStats::default();

        while let Some(header) = archive.read_header().map_err(map_unrar_error)? {
            let entry = header.entry();
            // No credential is ever supplied, so any encrypted entry ends the conversion.
            if entry.is_encrypted() {
                return Err(ArchiveError::PasswordRequired);
            }
            let is_directory = entry.is_directory();
            let size = entry.unpacked_size;
            let relative = safe_relative_path(&entry.filename)?;

            archive = match relative {
                None => header.skip().map_err(map_unrar_error)?,
                Some(relative) if is_directory => {
                    fs::create_dir_all(destination.join(&relative))?;
                    stats.directories += 1;
                    header.skip().map_err(map_unrar_error)?
                }
                Some(relative) => {
                    let target = destination.join(&relative);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let next = header.extract_to(&target).map_err(map_unrar_error)?;
                    stats.files += 1;
                    stats.bytes += size;
                    next
                }
            };
        }

        Ok(stats)
    }
}
