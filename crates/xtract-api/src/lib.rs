//! Xtract API Library
//!
//! This crate provides the HTTP handlers and application setup for the
//! archive conversion service.

mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
