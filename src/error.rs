//! Error types for the Nebula VR engine
//!
//! This module defines the error taxonomy used throughout the render-target
//! core. Errors surface synchronously from the call that caused them; there
//! is no background or deferred error reporting.

use std::fmt;

use crate::graphics::TextureFormat;

/// Result type for Nebula engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nebula engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pixel format rejected by the capability table.
    /// Not retryable without changing parameters.
    UnsupportedFormat(TextureFormat),

    /// Out of GPU memory. Retryable only after reducing resource
    /// demand (lower sample count or resolution); callers decide.
    OutOfMemory,

    /// Backend-specific driver error (OpenGL, Vulkan, etc.)
    BackendError(String),

    /// Programmer error: operating on a destroyed canvas, zero
    /// sample count, zero dimensions. Never undefined behavior.
    InvalidState(String),

    /// Filesystem collaborator failure
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFormat(format) => {
                write!(f, "Unsupported render target format: {:?}", format)
            }
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
