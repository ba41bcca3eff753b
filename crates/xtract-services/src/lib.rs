//! Xtract Services Layer
//!
//! This crate hosts the archive conversion pipeline: reading an uploaded archive
//! into a scratch directory, packaging that directory as the output format, and
//! the [`ConversionService`] that ties both together. HTTP concerns stay in
//! xtract-api.

pub mod archive;
pub mod conversion;
pub mod scratch;

pub use archive::{
    ArchiveDecoder, ArchiveEncoder, ArchiveError, ArchiveReader, ArchiveWriter, ExtractStats,
    PackEntry, PackEntryKind,
};
pub use conversion::{output_file_name, ConversionService, ConvertedArchive};
pub use scratch::ScratchDirectory;
