//! Deterministic local cache for downloaded distribution archives.
//!
//! A cache record is nothing more than a regular, readable file at the
//! deterministic path for a distribution; no metadata is kept beside it.
//! Publishing tolerates concurrent writers: the same identity implies
//! equivalent bytes, so losing the publish race is success.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::config::DownloadConfig;
use crate::directories::DirectoryResolver;
use crate::distribution::Distribution;
use crate::error::Result;
use crate::fs;

/// Observability target for cache operations.
const LOG_TARGET: &str = "artifact_store::cache";

/// Persists and retrieves downloaded archives at deterministic per-distribution paths.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    config: DownloadConfig,
}

impl LocalArtifactStore {
    /// Store over the given download configuration.
    #[must_use]
    pub const fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Whether a regular, readable archive exists for `distribution`.
    ///
    /// # Errors
    ///
    /// Probe failures other than absence propagate unmodified so callers can
    /// distinguish "not cached" from "cannot determine".
    pub fn check_artifact(&self, distribution: &Distribution) -> Result<bool> {
        Ok(self.artifact(distribution)?.is_some())
    }

    /// Deterministic archive path for `distribution`, when it denotes an
    /// existing regular file.
    ///
    /// Ensures the store base directory exists before probing.
    ///
    /// # Errors
    ///
    /// Returns directory-creation failures for the base, or propagated probe
    /// failures.
    pub fn artifact(&self, distribution: &Distribution) -> Result<Option<Utf8PathBuf>> {
        let artifact = self.artifact_path(distribution)?;
        if fs::is_readable_file(&artifact)? {
            Ok(Some(artifact))
        } else {
            Ok(None)
        }
    }

    /// Publishes a freshly downloaded archive for `distribution`.
    ///
    /// The move is atomic. A destination that already exists is a silent
    /// no-op success: it names the same distribution, so the bytes are
    /// assumed equivalent. The return value re-probes destination
    /// existence and readability rather than trusting which writer won.
    ///
    /// # Errors
    ///
    /// Any move failure other than "already exists" is fatal and names both
    /// paths.
    pub fn store(&self, distribution: &Distribution, download: &Utf8Path) -> Result<bool> {
        let destination = self.artifact_path(distribution)?;
        if let Some(parent) = destination.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        if fs::probe_exists(&destination)? {
            debug!(
                target: LOG_TARGET,
                distribution = %distribution,
                destination = %destination,
                "archive already cached, keeping existing file"
            );
        } else {
            fs::move_file(download, &destination)?;
            debug!(
                target: LOG_TARGET,
                distribution = %distribution,
                from = %download,
                to = %destination,
                "archive stored"
            );
        }

        fs::is_readable_file(&destination)
    }

    /// Deterministic path of the archive, ensuring the store base exists.
    fn artifact_path(&self, distribution: &Distribution) -> Result<Utf8PathBuf> {
        let base = DirectoryResolver::flat(self.config.artifact_store().clone()).resolve()?;
        Ok(base.path().join(self.config.archive_path(distribution)))
    }
}
