//! Xtract Core Library
//!
//! This crate provides the archive format model, the supported media type set,
//! error types and configuration shared by the services and API crates.

pub mod config;
pub mod error;
pub mod format;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::{normalize_media_type, ArchiveFormat, SupportedTypes};
