//! Error types for design-patterns-rs.
//!
//! A single `thiserror`-derived enum covers every failure the singletons can
//! report.  I/O errors are captured by message so that [`Error`] stays
//! `Clone + PartialEq` and can be compared directly in tests.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type used throughout design-patterns-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An external resource (e.g. the log file) could not be opened.
    #[error("resource unavailable: {}: {reason}", .path.display())]
    ResourceUnavailable {
        /// Path of the resource that failed to open.
        path: PathBuf,
        /// Underlying operating-system reason.
        reason: String,
    },

    /// A write to an already-open resource failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Build a [`Error::ResourceUnavailable`] from an I/O error raised while
    /// opening `path`.
    pub fn unavailable(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::ResourceUnavailable {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Shorthand `Result` type used throughout design-patterns-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;
