//! Archive formats and the set of media types accepted for conversion.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Archive format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveFormat {
    Rar,
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 4] = [
        ArchiveFormat::Rar,
        ArchiveFormat::Zip,
        ArchiveFormat::Tar,
        ArchiveFormat::TarGz,
    ];

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Rar => "rar",
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }

    /// Media types a client may declare for an upload of this format.
    pub fn input_media_types(&self) -> &'static [&'static str] {
        match self {
            ArchiveFormat::Rar => &[
                "application/vnd.rar",
                "application/x-rar-compressed",
                "application/x-rar",
            ],
            ArchiveFormat::Zip => &["application/zip", "application/x-zip-compressed"],
            ArchiveFormat::Tar => &["application/x-tar"],
            ArchiveFormat::TarGz => &[
                "application/gzip",
                "application/x-gzip",
                "application/x-compressed-tar",
            ],
        }
    }

    /// Content type sent with a converted archive of this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArchiveFormat::Rar => "application/vnd.rar",
            ArchiveFormat::Zip => "application/x-zip-compressed",
            ArchiveFormat::Tar => "application/x-tar",
            ArchiveFormat::TarGz => "application/gzip",
        }
    }

    /// RAR is read-only: there is no encoder for it.
    pub fn is_writable(&self) -> bool {
        !matches!(self, ArchiveFormat::Rar)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rar" => Ok(ArchiveFormat::Rar),
            "zip" => Ok(ArchiveFormat::Zip),
            "tar" => Ok(ArchiveFormat::Tar),
            "tar.gz" | "tgz" | "targz" => Ok(ArchiveFormat::TarGz),
            _ => Err(anyhow::anyhow!("Unsupported archive format: {}", s)),
        }
    }
}

/// Normalize MIME type by stripping parameters (e.g. "application/zip; charset=binary" -> "application/zip").
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_lowercase()
}

/// Immutable mapping from accepted media types to the format they select.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTypes {
    by_media_type: HashMap<&'static str, ArchiveFormat>,
}

impl SupportedTypes {
    pub fn new(formats: &[ArchiveFormat]) -> Self {
        let by_media_type = formats
            .iter()
            .flat_map(|format| {
                format
                    .input_media_types()
                    .iter()
                    .map(move |media_type| (*media_type, *format))
            })
            .collect();
        Self { by_media_type }
    }

    /// Resolve a declared media type to its archive format, if accepted.
    pub fn resolve(&self, media_type: &str) -> Option<ArchiveFormat> {
        self.by_media_type
            .get(normalize_media_type(media_type).as_str())
            .copied()
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.resolve(media_type).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.by_media_type.is_empty()
    }

    /// Accepted media types in sorted order.
    pub fn media_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.by_media_type.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for SupportedTypes {
    fn default() -> Self {
        Self::new(&ArchiveFormat::ALL)
    }
}
