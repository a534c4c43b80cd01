//! Download-store configuration and archive path resolution.
//!
//! The artifact store root is resolved in the following order:
//!
//! 1. `ARTIFACT_STORE_DIR` environment variable if set
//! 2. `$XDG_CACHE_HOME/embedded-artifacts/archives` if `XDG_CACHE_HOME` is set
//! 3. `~/.cache/embedded-artifacts/archives` as fallback
//! 4. `/tmp/embedded-artifacts/archives` as last resort

use camino::Utf8PathBuf;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::directories::BaseDirectory;
use crate::distribution::Distribution;

/// Environment variable overriding the artifact store root.
const STORE_DIR_ENV: &str = "ARTIFACT_STORE_DIR";

/// Subdirectory path within the XDG cache home.
const STORE_SUBDIR: &str = "embedded-artifacts/archives";

/// Maps a distribution to its relative archive path within the store.
pub trait ArchivePathResolver: fmt::Debug + Send + Sync {
    /// Relative path of the archive for `distribution`.
    fn archive_path(&self, distribution: &Distribution) -> Utf8PathBuf;
}

/// Places each archive under the canonical distribution segment.
#[derive(Debug, Clone)]
pub struct StandardArchivePathResolver {
    archive_name: String,
}

impl StandardArchivePathResolver {
    /// Resolver producing `<platform>-<architecture>--<version>/<archive_name>`.
    #[must_use]
    pub fn new(archive_name: impl Into<String>) -> Self {
        Self {
            archive_name: archive_name.into(),
        }
    }
}

impl ArchivePathResolver for StandardArchivePathResolver {
    fn archive_path(&self, distribution: &Distribution) -> Utf8PathBuf {
        Utf8PathBuf::from(distribution.as_path()).join(&self.archive_name)
    }
}

/// Configuration shared by the archive cache and the extraction orchestrator.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    artifact_store: BaseDirectory,
    resolver: Arc<dyn ArchivePathResolver>,
}

impl DownloadConfig {
    /// Configuration over an explicit store root and path resolver.
    #[must_use]
    pub fn new(artifact_store: BaseDirectory, resolver: Arc<dyn ArchivePathResolver>) -> Self {
        Self {
            artifact_store,
            resolver,
        }
    }

    /// Base directory holding cached archives.
    #[must_use]
    pub const fn artifact_store(&self) -> &BaseDirectory {
        &self.artifact_store
    }

    /// Relative archive path for `distribution`.
    #[must_use]
    pub fn archive_path(&self, distribution: &Distribution) -> Utf8PathBuf {
        self.resolver.archive_path(distribution)
    }
}

/// Resolves the artifact store root from environment and XDG conventions.
///
/// # Examples
///
/// ```
/// use embedded_artifact_store::resolve_store_dir;
///
/// let store_dir = resolve_store_dir();
/// assert!(!store_dir.as_str().is_empty());
/// ```
#[must_use]
pub fn resolve_store_dir() -> Utf8PathBuf {
    if let Some(dir) = resolve_from_env() {
        return dir;
    }

    if let Some(dir) = resolve_from_xdg_cache() {
        return dir;
    }

    if let Some(dir) = resolve_from_home() {
        return dir;
    }

    Utf8PathBuf::from("/tmp").join(STORE_SUBDIR)
}

/// Attempts to resolve the store root from `ARTIFACT_STORE_DIR`.
fn resolve_from_env() -> Option<Utf8PathBuf> {
    let raw = std::env::var(STORE_DIR_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Utf8PathBuf::from_path_buf(PathBuf::from(trimmed)).ok()
}

/// Attempts to resolve the store root from `XDG_CACHE_HOME`.
fn resolve_from_xdg_cache() -> Option<Utf8PathBuf> {
    let raw = std::env::var("XDG_CACHE_HOME").ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = Utf8PathBuf::from_path_buf(PathBuf::from(trimmed)).ok()?;
    Some(path.join(STORE_SUBDIR))
}

/// Attempts to resolve the store root from the home directory.
fn resolve_from_home() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    let path = Utf8PathBuf::from_path_buf(home).ok()?;
    Some(path.join(".cache").join(STORE_SUBDIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Architecture, Platform, Version};
    use temp_env::with_vars;

    #[test]
    fn resolve_store_dir_respects_explicit_env_var() {
        let expected = "/custom/store/path";
        let result = with_vars(
            [
                (STORE_DIR_ENV, Some(expected)),
                ("XDG_CACHE_HOME", None::<&str>),
            ],
            resolve_store_dir,
        );
        assert_eq!(result.as_str(), expected);
    }

    #[test]
    fn resolve_store_dir_uses_xdg_cache_home_when_env_var_unset() {
        let xdg_cache = "/home/testuser/.cache";
        let result = with_vars(
            [
                (STORE_DIR_ENV, None::<&str>),
                ("XDG_CACHE_HOME", Some(xdg_cache)),
            ],
            resolve_store_dir,
        );
        assert_eq!(
            result.as_str(),
            format!("{xdg_cache}/{STORE_SUBDIR}").as_str()
        );
    }

    #[test]
    fn resolve_store_dir_ignores_empty_env_var() {
        let xdg_cache = "/home/testuser/.cache";
        let result = with_vars(
            [(STORE_DIR_ENV, Some("")), ("XDG_CACHE_HOME", Some(xdg_cache))],
            resolve_store_dir,
        );
        assert_eq!(
            result.as_str(),
            format!("{xdg_cache}/{STORE_SUBDIR}").as_str()
        );
    }

    #[test]
    fn resolve_store_dir_ignores_whitespace_only_env_var() {
        let xdg_cache = "/home/testuser/.cache";
        let result = with_vars(
            [
                (STORE_DIR_ENV, Some("   ")),
                ("XDG_CACHE_HOME", Some(xdg_cache)),
            ],
            resolve_store_dir,
        );
        assert_eq!(
            result.as_str(),
            format!("{xdg_cache}/{STORE_SUBDIR}").as_str()
        );
    }

    #[test]
    fn standard_resolver_places_archives_under_the_canonical_segment() {
        let resolver = StandardArchivePathResolver::new("dist.tar.gz");
        let distribution = Distribution::new(
            Platform::Linux,
            Architecture::B64,
            Version::new("3.6.0").expect("valid version"),
        );

        assert_eq!(
            resolver.archive_path(&distribution),
            Utf8PathBuf::from("LINUX-B64--3.6.0/dist.tar.gz")
        );
    }
}
