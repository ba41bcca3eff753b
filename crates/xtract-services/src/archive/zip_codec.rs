use super::{
    safe_relative_path, write_entry, ArchiveDecoder, ArchiveEncoder, ArchiveError,
    ArchiveResult, ExtractStats, PackEntry, PackEntryKind,
};
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor};
use std::path::Path;
use xtract_core::ArchiveFormat;
use zip::result::ZipError;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// ZIP codec backed by the `zip` crate.
pub struct ZipCodec;

fn map_zip_error(err: ZipError) -> ArchiveError {
    match err {
        ZipError::UnsupportedArchive(msg) if msg == ZipError::PASSWORD_REQUIRED => {
            ArchiveError::PasswordRequired
        }
        ZipError::Io(e) => ArchiveError::Io(e),
        other => ArchiveError::CorruptArchive(other.to_string()),
    }
}

fn map_zip_write_error(err: ZipError) -> ArchiveError {
    match err {
        ZipError::Io(e) => ArchiveError::Io(e),
        other => ArchiveError::Io(io::Error::other(other.to_string())),
    }
}

impl ArchiveDecoder for ZipCodec {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn decode(&self, archive_path: &Path, destination: &Path) -> ArchiveResult<ExtractStats> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(map_zip_error)?;
        let mut stats = ExtractStats::default();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(map_zip_error)?;
            let Some(relative) = safe_relative_path(Path::new(entry.name()))? else {
                continue;
            };
            let target = destination.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                stats.directories += 1;
                continue;
            }

            stats.bytes += write_entry(&target, &mut entry)?;
            stats.files += 1;
        }

        Ok(stats)
    }
}

impl ArchiveEncoder for ZipCodec {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn encode(&self, entries: &[PackEntry]) -> ArchiveResult<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let file_options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);
            let dir_options = FileOptions::default().unix_permissions(0o755);

            for entry in entries {
                match entry.kind {
                    PackEntryKind::Directory => {
                        zip.add_directory(entry.name.as_str(), dir_options)
                            .map_err(map_zip_write_error)?;
                    }
                    PackEntryKind::File => {
                        zip.start_file(entry.name.as_str(), file_options)
                            .map_err(map_zip_write_error)?;
                        let mut file = File::open(&entry.path)?;
                        io::copy(&mut file, &mut zip)?;
                    }
                }
            }

            zip.finish().map_err(map_zip_write_error)?;
        }

        Ok(buffer)
    }
}
