//! Lazily created directory handles tagged by ownership.
//!
//! A [`BaseDirectory`] records whether this crate created ("generated") or
//! merely borrowed ("fixed") a directory tree; only generated trees may be
//! removed with the staged content inside them. A [`DirectoryResolver`]
//! composes a base with an optional canonical suffix segment as a plain
//! value, so the per-distribution directory is rebuildable and comparable
//! rather than hidden inside a closure.

use camino::{Utf8Path, Utf8PathBuf};

use crate::distribution::Distribution;
use crate::error::Result;
use crate::fs;

/// Base directory source, tagged by ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectory {
    path: Utf8PathBuf,
    generated: bool,
}

impl BaseDirectory {
    /// A directory owned by this crate; content staged beneath it may be removed.
    #[must_use]
    pub fn generated(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            generated: true,
        }
    }

    /// A caller-owned directory this crate must never delete.
    #[must_use]
    pub fn fixed(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            generated: false,
        }
    }

    /// Base path before any per-distribution suffix.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the directory tree is owned by this crate.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }
}

/// Composes a base directory with an optional canonical path segment.
///
/// Resolution is idempotent: repeated calls return the same path, and a
/// concurrent creator winning the creation race counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResolver {
    base: BaseDirectory,
    suffix: Option<String>,
}

impl DirectoryResolver {
    /// Resolver over the bare base directory.
    #[must_use]
    pub const fn flat(base: BaseDirectory) -> Self {
        Self { base, suffix: None }
    }

    /// Resolver appending an explicit suffix segment to the base.
    #[must_use]
    pub fn suffixed(base: BaseDirectory, segment: impl Into<String>) -> Self {
        Self {
            base,
            suffix: Some(segment.into()),
        }
    }

    /// Resolver scoped to the canonical segment of `distribution`.
    #[must_use]
    pub fn scoped(base: BaseDirectory, distribution: &Distribution) -> Self {
        Self::suffixed(base, distribution.as_path())
    }

    /// Whether the underlying base is owned by this crate.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.base.generated
    }

    /// Full path this resolver denotes, without touching the filesystem.
    #[must_use]
    pub fn target_path(&self) -> Utf8PathBuf {
        self.suffix
            .as_ref()
            .map_or_else(|| self.base.path.clone(), |segment| self.base.path.join(segment))
    }

    /// Creates missing components and returns the resolved handle.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotADirectory`] when an existing entry
    /// conflicts with the target, or [`crate::StoreError::CreateDirectory`]
    /// for any other creation failure.
    pub fn resolve(&self) -> Result<DirectoryHandle> {
        let path = self.target_path();
        fs::ensure_dir_exists(&path)?;
        Ok(DirectoryHandle {
            path,
            generated: self.base.generated,
        })
    }
}

/// An existing directory produced by [`DirectoryResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHandle {
    path: Utf8PathBuf,
    generated: bool,
}

impl DirectoryHandle {
    /// Path of the directory; it existed when the handle was produced.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the directory tree is owned by this crate.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Architecture, Platform, Version};
    use crate::error::StoreError;
    use camino::Utf8Path;
    use std::fs as stdfs;
    use tempfile::tempdir;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).expect("utf8 path")
    }

    fn linux_dist() -> Distribution {
        Distribution::new(
            Platform::Linux,
            Architecture::B64,
            Version::new("3.6.0").expect("valid version"),
        )
    }

    #[test]
    fn scoped_resolver_appends_the_canonical_segment() {
        let temp = tempdir().expect("tempdir");
        let base = BaseDirectory::generated(utf8(temp.path()));

        let resolver = DirectoryResolver::scoped(base, &linux_dist());
        assert_eq!(
            resolver.target_path(),
            utf8(temp.path()).join("LINUX-B64--3.6.0")
        );
    }

    #[test]
    fn resolve_creates_the_directory_and_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let base = BaseDirectory::generated(utf8(temp.path()));
        let resolver = DirectoryResolver::scoped(base, &linux_dist());

        let first = resolver.resolve().expect("first resolve");
        let second = resolver.resolve().expect("second resolve");

        assert!(first.path().is_dir());
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_inherits_the_generated_flag() {
        let temp = tempdir().expect("tempdir");

        let generated = DirectoryResolver::flat(BaseDirectory::generated(utf8(temp.path())))
            .resolve()
            .expect("resolve generated");
        let fixed = DirectoryResolver::flat(BaseDirectory::fixed(utf8(temp.path())))
            .resolve()
            .expect("resolve fixed");

        assert!(generated.is_generated());
        assert!(!fixed.is_generated());
    }

    #[test]
    fn resolve_fails_when_a_file_occupies_the_target() {
        let temp = tempdir().expect("tempdir");
        let blocker = utf8(temp.path()).join("LINUX-B64--3.6.0");
        stdfs::write(&blocker, b"in the way").expect("write blocker");

        let resolver =
            DirectoryResolver::scoped(BaseDirectory::generated(utf8(temp.path())), &linux_dist());
        let err = resolver.resolve().expect_err("conflict is fatal");
        assert!(matches!(err, StoreError::NotADirectory { path } if path == blocker));
    }
}
