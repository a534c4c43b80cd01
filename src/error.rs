//! Domain error types for the artifact store.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// Result alias for operations that may return a [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by cache, directory, and extraction operations.
///
/// Configuration failures (directory creation, archive moves) and extraction
/// conflicts are fatal for the current request and always name the offending
/// path. Availability-probe failures travel through [`StoreError::Io`]
/// unmodified so callers can tell "absent" apart from "cannot determine".
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required directory could not be created.
    #[error("could not create directory {path}")]
    CreateDirectory {
        /// Path of the directory that failed to appear.
        path: Utf8PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },
    /// A required path exists but does not denote a directory.
    #[error("{path} exists but is not a directory")]
    NotADirectory {
        /// The conflicting path.
        path: Utf8PathBuf,
    },
    /// Moving a downloaded archive into the store failed for a reason other
    /// than the destination already existing.
    #[error("could not move {from} to {to}")]
    StoreArtifact {
        /// Source file of the failed move.
        from: Utf8PathBuf,
        /// Intended destination inside the store.
        to: Utf8PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },
    /// The extraction engine rejected the canonical directory as occupied by
    /// incompatible content. Never retried automatically.
    #[error("extraction to {dir} has failed")]
    ExtractionConflict {
        /// Canonical extraction directory that could not be populated.
        dir: Utf8PathBuf,
    },
    /// Copying a file set into its private staging directory failed.
    #[error("staging copy into {dir} failed")]
    Staging {
        /// Staging directory that received the partial copy.
        dir: Utf8PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },
    /// A version string that cannot form a filesystem path segment.
    #[error("invalid version string {value:?}")]
    InvalidVersion {
        /// The rejected value.
        value: String,
    },
    /// An availability probe failed; forwarded unmodified.
    #[error(transparent)]
    Io(#[from] io::Error),
}
