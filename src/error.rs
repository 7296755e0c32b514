//! # Error Types
//!
//! This module defines the error type used throughout the mapprint library.
//!
//! Failures of an individual print job are not errors at this level: they are
//! recorded on that job's history entry (see [`crate::history`]). `PrintError`
//! covers the things a caller can act on directly.

use thiserror::Error;

/// Main error type for mapprint operations
#[derive(Debug, Error)]
pub enum PrintError {
    /// Loading layout/format choices from the service failed
    #[error("Capability error: {0}")]
    Capability(String),

    /// The print service rejected or failed a job
    #[error("Submission error: {0}")]
    Submission(String),

    /// The map view is not available, so nothing can be printed
    #[error("Print unavailable: no map view")]
    NoView,

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
