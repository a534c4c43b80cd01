//! File-set classification and the resolved extraction result.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of an archive entry, driving naming and handling rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// The binary a consumer will launch; passes through a naming transform.
    Executable,
    /// Shared or static libraries shipped alongside the executable.
    Library,
    /// Manuals, licences, and other documentation.
    Documentation,
    /// Anything the manifest does not classify further.
    Other,
}

/// One expected entry of a distribution archive, as reported by the external
/// manifest resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSetEntry {
    file_type: FileType,
    name: String,
}

impl FileSetEntry {
    /// Pairs a classification with the entry's relative name.
    #[must_use]
    pub fn new(file_type: FileType, name: impl Into<String>) -> Self {
        Self {
            file_type,
            name: name.into(),
        }
    }

    /// Classification of this entry.
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Relative name of this entry below the extraction root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A fully resolved, ready-to-use set of extracted files.
///
/// Owned exclusively by the consumer that received it from
/// `extract_file_set`, until released via `remove_file_set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFileSet {
    base_dir: Utf8PathBuf,
    base_dir_generated: bool,
    files: BTreeMap<FileType, Vec<Utf8PathBuf>>,
}

impl ExtractedFileSet {
    /// Starts building a file set rooted at `base_dir`.
    #[must_use]
    pub fn builder(
        base_dir: impl Into<Utf8PathBuf>,
        base_dir_generated: bool,
    ) -> ExtractedFileSetBuilder {
        ExtractedFileSetBuilder {
            base_dir: base_dir.into(),
            base_dir_generated,
            files: BTreeMap::new(),
        }
    }

    /// Root directory the resolved paths live under.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Whether the root directory was created by this crate and may be removed
    /// together with the set.
    #[must_use]
    pub const fn base_dir_is_generated(&self) -> bool {
        self.base_dir_generated
    }

    /// All resolved paths registered under `file_type`, in registration order.
    #[must_use]
    pub fn files(&self, file_type: FileType) -> &[Utf8PathBuf] {
        self.files.get(&file_type).map_or(&[], Vec::as_slice)
    }

    /// First executable, when the manifest declared one.
    #[must_use]
    pub fn executable(&self) -> Option<&Utf8Path> {
        self.files(FileType::Executable)
            .first()
            .map(Utf8PathBuf::as_path)
    }

    /// Iterates every `(type, path)` pair in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (FileType, &Utf8Path)> {
        self.files.iter().flat_map(|(file_type, paths)| {
            paths
                .iter()
                .map(move |path| (*file_type, path.as_path()))
        })
    }
}

/// Builder for [`ExtractedFileSet`]; relative names resolve against the root.
#[derive(Debug)]
pub struct ExtractedFileSetBuilder {
    base_dir: Utf8PathBuf,
    base_dir_generated: bool,
    files: BTreeMap<FileType, Vec<Utf8PathBuf>>,
}

impl ExtractedFileSetBuilder {
    /// Registers `relative_name` under `file_type`, resolved against the root.
    #[must_use]
    pub fn file(mut self, file_type: FileType, relative_name: &str) -> Self {
        let resolved = self.base_dir.join(relative_name);
        self.files.entry(file_type).or_default().push(resolved);
        self
    }

    /// Completes the file set.
    #[must_use]
    pub fn build(self) -> ExtractedFileSet {
        ExtractedFileSet {
            base_dir: self.base_dir,
            base_dir_generated: self.base_dir_generated,
            files: self.files,
        }
    }
}
