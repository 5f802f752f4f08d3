use std::{error::Error, fmt, io};

use snafu::{Backtrace, prelude::*};

/// Errors produced by a storage backend.
///
/// Backend-specific failures are wrapped in this enum so that
/// [`StorageError`] variants can carry them as a source together with the
/// path that was being accessed.
#[derive(Debug)]
pub enum BackendError {
    /// A local filesystem I/O error.
    Local(io::Error),
    /// The in-memory directory holds no object under the requested name.
    MissingObject,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Local(e) => write!(f, "local I/O error: {e}"),
            BackendError::MissingObject => write!(f, "no such object in memory directory"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::Local(e) => Some(e),
            BackendError::MissingObject => None,
        }
    }
}

/// Errors that can occur while accessing a store source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    /// The specified path or object was not found.
    #[snafu(display("Path not found: {path}"))]
    NotFound {
        /// The path that was not found.
        path: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// An I/O error occurred on the local filesystem.
    #[snafu(display("Local I/O error at {path}: {source}"))]
    OtherIo {
        /// The path where the I/O error occurred.
        path: String,
        /// Underlying backend I/O error with platform-specific details.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

impl StorageError {
    /// The path or object name the failed operation was addressing.
    pub fn path(&self) -> &str {
        match self {
            StorageError::NotFound { path, .. } | StorageError::OtherIo { path, .. } => path,
        }
    }
}
