//! Archive conversion: read an upload in any accepted format, repackage it in
//! the configured output format.

use crate::archive::{ArchiveError, ArchiveReader, ArchiveResult, ArchiveWriter, ExtractStats};
use crate::scratch::ScratchDirectory;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use xtract_core::{ArchiveFormat, Config, SupportedTypes};

const FALLBACK_STEM: &str = "archive";

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedArchive {
    pub bytes: Vec<u8>,
    /// Download name: the upload's base name with the output extension
    pub file_name: String,
    pub content_type: &'static str,
    pub stats: ExtractStats,
}

/// Converts uploaded archives to a single output format.
///
/// Each call works in its own scratch directory, so concurrent conversions
/// never see each other's files. The service holds no per-request state and is
/// shared between handlers behind an `Arc`.
pub struct ConversionService {
    supported: Arc<SupportedTypes>,
    reader: ArchiveReader,
    writer: ArchiveWriter,
    scratch_root: PathBuf,
}

impl ConversionService {
    pub fn new(
        supported: SupportedTypes,
        output_format: ArchiveFormat,
        scratch_root: PathBuf,
    ) -> ArchiveResult<Self> {
        let supported = Arc::new(supported);
        Ok(Self {
            reader: ArchiveReader::new(supported.clone()),
            writer: ArchiveWriter::new(output_format)?,
            supported,
            scratch_root,
        })
    }

    pub fn from_config(config: &Config) -> ArchiveResult<Self> {
        Self::new(
            config.supported_types(),
            config.output_format,
            config.scratch_root(),
        )
    }

    pub fn supports(&self, media_type: &str) -> bool {
        self.supported.contains(media_type)
    }

    pub fn supported_types(&self) -> &SupportedTypes {
        &self.supported
    }

    pub fn output_format(&self) -> ArchiveFormat {
        self.writer.format()
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Convert one uploaded archive.
    ///
    /// Unsupported media types are rejected before anything touches the
    /// filesystem. The scratch directory is removed on every exit path.
    pub fn convert(
        &self,
        media_type: &str,
        file_name: &str,
        source: &mut dyn Read,
    ) -> ArchiveResult<ConvertedArchive> {
        if !self.supports(media_type) {
            return Err(ArchiveError::UnsupportedMediaType(media_type.to_string()));
        }

        let scratch = ScratchDirectory::create_in(&self.scratch_root)?;
        let stats = self.reader.extract(media_type, source, &scratch)?;
        let bytes = self.writer.package_directory(scratch.content_dir())?;
        drop(scratch);

        let output_format = self.output_format();
        let converted = ConvertedArchive {
            file_name: output_file_name(file_name, output_format),
            content_type: output_format.content_type(),
            bytes,
            stats,
        };

        tracing::info!(
            input = %file_name,
            output = %converted.file_name,
            files = stats.files,
            size = converted.bytes.len(),
            "Archive converted"
        );

        Ok(converted)
    }
}

/// Download name for a converted upload.
///
/// Directory components and the original extension are dropped (`.tar.gz`
/// counts as one extension); an empty stem becomes `archive`.
pub fn output_file_name(original: &str, format: ArchiveFormat) -> String {
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original)
        .trim();

    let stem = strip_suffix_ignore_case(base, ".tar.gz")
        .or_else(|| base.rfind('.').map(|idx| &base[..idx]))
        .unwrap_or(base)
        .trim();

    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{}.{}", stem, format.extension())
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
