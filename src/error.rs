//! Error types for filesystem operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FsError>;

/// Error opening or reading a file from an embedded filesystem.
///
/// # Example
///
/// ```ignore
/// match fs.read_file("css/site.css") {
///     Ok(bytes) => serve(bytes),
///     Err(FsError::NotFound { .. }) => not_found(),
///     Err(e) => internal_error(e),
/// }
/// ```
#[derive(Debug, Error)]
pub enum FsError {
    /// Logical path is not in the payload store (or the override directory).
    #[error("file not found: {path}")]
    NotFound {
        /// Normalized logical path.
        path: String,
    },

    /// Embedded payload could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Normalized logical path.
        path: String,
        /// What went wrong while decoding.
        #[source]
        source: DecodeError,
    },

    /// OS error while accessing a real file behind an override.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Real path on disk.
        path: PathBuf,
        /// The underlying error, unchanged.
        #[source]
        source: io::Error,
    },

    /// Override directory could not be inspected.
    #[error("override path {} is not accessible: {source}", path.display())]
    OverrideRoot {
        /// Requested override directory.
        path: PathBuf,
        /// Error returned by `stat`.
        #[source]
        source: io::Error,
    },

    /// Override path exists but is not a directory.
    #[error("override path {} is not a directory", path.display())]
    NotADirectory {
        /// Requested override directory.
        path: PathBuf,
    },
}

impl FsError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn decode(path: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Check whether this error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        let kind = match &err {
            FsError::Io { source, .. } | FsError::OverrideRoot { source, .. } => source.kind(),
            FsError::NotFound { .. } => io::ErrorKind::NotFound,
            FsError::Decode { .. } => io::ErrorKind::InvalidData,
            FsError::NotADirectory { .. } => io::ErrorKind::NotADirectory,
        };
        match err {
            FsError::Io { source, .. } => source,
            other => io::Error::new(kind, other),
        }
    }
}

/// Failure decoding one embedded payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Text payload is not valid standard base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Gzip stream is truncated or corrupt.
    #[error("invalid gzip stream: {0}")]
    Gzip(#[from] io::Error),
}
