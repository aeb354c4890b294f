//! Error types for the Galaxy3D TRAA pass
//!
//! This module defines the error types used throughout the crate,
//! including pass configuration, backend and resource errors.

use std::fmt;

/// Result type for Galaxy3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (CPU reference backend, GPU plugin, etc.)
    BackendError(String),

    /// Invalid resource (render target, texture, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (pass construction, resource allocation)
    InitializationFailed(String),

    /// The pass was constructed without a multi-channel output configuration
    MissingMrtConfig,

    /// The multi-channel output configuration has no velocity channel
    MissingVelocityChannel,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::MissingMrtConfig => write!(f, "Missing MRT configuration"),
            Error::MissingVelocityChannel => {
                write!(f, "Missing velocity output in MRT configuration")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
