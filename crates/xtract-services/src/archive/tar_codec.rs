use super::{
    safe_relative_path, write_entry, ArchiveDecoder, ArchiveEncoder, ArchiveError,
    ArchiveResult, ExtractStats, PackEntry, PackEntryKind,
};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use tar::{Archive, Builder, EntryType, Header};
use xtract_core::ArchiveFormat;

/// TAR codec backed by the `tar` crate, optionally gzip-compressed through `flate2`.
pub struct TarCodec {
    gzip: bool,
}

impl TarCodec {
    pub fn plain() -> Self {
        Self { gzip: false }
    }

    pub fn gzip() -> Self {
        Self { gzip: true }
    }
}

fn corrupt(err: io::Error) -> ArchiveError {
    ArchiveError::CorruptArchive(err.to_string())
}

fn append_entries<W: Write>(writer: W, entries: &[PackEntry]) -> ArchiveResult<W> {
    let mut tar = Builder::new(writer);

    for entry in entries {
        let mut header = Header::new_gnu();
        match entry.kind {
            PackEntryKind::Directory => {
                header.set_entry_type(EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                tar.append_data(&mut header, &entry.name, io::empty())?;
            }
            PackEntryKind::File => {
                let file = File::open(&entry.path)?;
                header.set_entry_type(EntryType::Regular);
                header.set_size(file.metadata()?.len());
                header.set_mode(0o644);
                header.set_cksum();
                tar.append_data(&mut header, &entry.name, file)?;
            }
        }
    }

    Ok(tar.into_inner()?)
}

impl ArchiveDecoder for TarCodec {
    fn format(&self) -> ArchiveFormat {
        if self.gzip {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Tar
        }
    }

    fn decode(&self, archive_path: &Path, destination: &Path) -> ArchiveResult<ExtractStats> {
        let file = BufReader::new(File::open(archive_path)?);
        let reader: Box<dyn Read> = if self.gzip {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut archive = Archive::new(reader);
        let mut stats = ExtractStats::default();

        for entry in archive.entries().map_err(corrupt)? {
            let mut entry = entry.map_err(corrupt)?;
            let name = entry.path().map_err(corrupt)?.into_owned();
            let Some(relative) = safe_relative_path(&name)? else {
                continue;
            };
            let target = destination.join(&relative);
            let entry_type = entry.header().entry_type();

            if entry_type.is_dir() {
                fs::create_dir_all(&target)?;
                stats.directories += 1;
            } else if entry_type.is_file() || entry_type == EntryType::Continuous {
                stats.bytes += write_entry(&target, &mut entry)?;
                stats.files += 1;
            } else {
                tracing::warn!(
                    entry = %name.display(),
                    entry_type = ?entry_type,
                    "Skipping unsupported tar entry"
                );
            }
        }

        Ok(stats)
    }
}

impl ArchiveEncoder for TarCodec {
    fn format(&self) -> ArchiveFormat {
        ArchiveDecoder::format(self)
    }

    fn encode(&self, entries: &[PackEntry]) -> ArchiveResult<Vec<u8>> {
        if self.gzip {
            let encoder = GzEncoder::new(Vec::new(), Compression::default());
            let encoder = append_entries(encoder, entries)?;
            Ok(encoder.finish()?)
        } else {
            append_entries(Vec::new(), entries)
        }
    }
}
