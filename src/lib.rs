//! Local archive cache and extraction staging for versioned binary
//! distributions.
//!
//! The crate serves consumers that repeatedly launch versioned native
//! binaries, such as process-launching test frameworks, without
//! re-downloading or re-extracting on every run. A [`LocalArtifactStore`]
//! keeps each downloaded archive at a deterministic path derived from the
//! distribution identity; an [`ExtractedArtifactStore`] unpacks a
//! distribution into a shared canonical directory at most once and hands
//! every caller a private, disposable staged copy of the extracted files.
//!
//! Concurrent callers need no coordination: directory creation and archive
//! publication are idempotent, races resolve benignly through filesystem
//! presence checks and atomic moves, and the occasional redundant unpack is
//! accepted instead of any locking.
//!
//! # Examples
//!
//! ```
//! use embedded_artifact_store::{Architecture, Distribution, Platform, Version};
//!
//! let distribution =
//!     Distribution::new(Platform::Linux, Architecture::B64, Version::new("3.6.0")?);
//! assert_eq!(distribution.as_path(), "LINUX-B64--3.6.0");
//! # Ok::<(), embedded_artifact_store::StoreError>(())
//! ```

mod config;
mod directories;
mod distribution;
mod error;
mod file_set;
mod fs;
mod naming;
mod store;

pub use config::{
    ArchivePathResolver, DownloadConfig, StandardArchivePathResolver, resolve_store_dir,
};
pub use directories::{BaseDirectory, DirectoryHandle, DirectoryResolver};
pub use distribution::{Architecture, Distribution, Platform, Version};
pub use error::{Result, StoreError};
pub use file_set::{ExtractedFileSet, ExtractedFileSetBuilder, FileSetEntry, FileType};
pub use naming::{ExecutableNaming, OriginNaming, UniqueNaming};
pub use store::{
    DirectoryAndNaming, Downloader, ExtractedArtifactStore, Extractor, FileSetManifest,
    LocalArtifactStore, staging,
};
