use super::{decoder_for, ArchiveError, ArchiveResult, ExtractStats};
use crate::scratch::ScratchDirectory;
use std::io::Read;
use std::sync::Arc;
use xtract_core::SupportedTypes;

/// Extracts uploaded archives into a scratch directory.
#[derive(Clone)]
pub struct ArchiveReader {
    supported: Arc<SupportedTypes>,
}

impl ArchiveReader {
    pub fn new(supported: Arc<SupportedTypes>) -> Self {
        Self { supported }
    }

    /// Stage `source` in `scratch` and extract every entry into its content
    /// directory, preserving relative paths.
    #[tracing::instrument(skip(self, source, scratch), fields(scratch = %scratch.path().display()))]
    pub fn extract(
        &self,
        media_type: &str,
        source: &mut dyn Read,
        scratch: &ScratchDirectory,
    ) -> ArchiveResult<ExtractStats> {
        let format = self
            .supported
            .resolve(media_type)
            .ok_or_else(|| ArchiveError::UnsupportedMediaType(media_type.to_string()))?;

        let staged = scratch.stage_upload(source, format)?;
        let stats = decoder_for(format).decode(&staged, scratch.content_dir())?;

        tracing::debug!(
            format = %format,
            files = stats.files,
            directories = stats.directories,
            bytes = stats.bytes,
            "Archive extracted"
        );

        Ok(stats)
    }
}
