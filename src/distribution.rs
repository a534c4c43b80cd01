//! Distribution identity and canonical path naming.
//!
//! A [`Distribution`] names exactly one binary release by platform,
//! architecture, and version. The triple is the sole identity key for both
//! the archive cache and the canonical extraction directory, so its path
//! rendering must be deterministic and collision free.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StoreError};

/// Operating system a distribution targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Linux builds.
    Linux,
    /// macOS builds.
    Osx,
    /// Windows builds.
    Windows,
    /// FreeBSD builds.
    FreeBsd,
    /// Solaris builds.
    Solaris,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "LINUX",
            Self::Osx => "OSX",
            Self::Windows => "WINDOWS",
            Self::FreeBsd => "FREEBSD",
            Self::Solaris => "SOLARIS",
        })
    }
}

/// Word size of a distribution's binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    /// 32-bit builds.
    B32,
    /// 64-bit builds.
    B64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::B32 => "B32",
            Self::B64 => "B64",
        })
    }
}

/// Version identifier in its download-path form.
///
/// Construction validates that the value can serve as part of a single path
/// segment on every target filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Creates a version from its download-path form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVersion`] when the value is empty or
    /// contains a path separator.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.contains(['/', '\\']) {
            return Err(StoreError::InvalidVersion { value });
        }
        Ok(Self(value))
    }

    /// The download-path form of the version.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable identity of one binary release.
///
/// Equality and hashing cover all three fields; two distributions are the
/// same cache entry exactly when all three match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distribution {
    platform: Platform,
    architecture: Architecture,
    version: Version,
}

impl Distribution {
    /// Bundles a platform, architecture, and version into an identity.
    #[must_use]
    pub const fn new(platform: Platform, architecture: Architecture, version: Version) -> Self {
        Self {
            platform,
            architecture,
            version,
        }
    }

    /// Platform this distribution targets.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Word size of this distribution's binaries.
    #[must_use]
    pub const fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Version of this distribution.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Canonical path segment `<platform>-<architecture>--<version>`.
    ///
    /// Injective over distinct identities and free of path separators, so it
    /// is safe as a directory name on every target filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedded_artifact_store::{Architecture, Distribution, Platform, Version};
    ///
    /// let distribution =
    ///     Distribution::new(Platform::Linux, Architecture::B64, Version::new("3.6.0")?);
    /// assert_eq!(distribution.as_path(), "LINUX-B64--3.6.0");
    /// # Ok::<(), embedded_artifact_store::StoreError>(())
    /// ```
    #[must_use]
    pub fn as_path(&self) -> String {
        format!("{}-{}--{}", self.platform, self.architecture, self.version)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}--{}", self.platform, self.architecture, self.version)
    }
}
