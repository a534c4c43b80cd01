//! Extraction orchestration: canonical per-distribution unpack plus per-call staging.
//!
//! The canonical extraction directory is shared across callers and unpacked
//! at most once per distribution; every call then receives a private staged
//! copy it owns until `remove_file_set`. Correctness under uncoordinated
//! concurrent callers relies only on idempotent directory creation and
//! filesystem presence probes; redundant extraction work is tolerated rather
//! than serialised.

use std::fmt;
use std::io;
use std::io::ErrorKind;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DownloadConfig;
use crate::directories::{BaseDirectory, DirectoryHandle, DirectoryResolver};
use crate::distribution::Distribution;
use crate::error::{Result, StoreError};
use crate::file_set::{ExtractedFileSet, FileSetEntry, FileType};
use crate::naming::ExecutableNaming;
use crate::store::local::LocalArtifactStore;
use crate::store::staging;

/// Observability target for extraction orchestration.
const LOG_TARGET: &str = "artifact_store::extract";

/// Resolves the expected entries of a distribution archive.
///
/// Implementations must not touch filesystem state; the orchestrator probes
/// presence separately.
#[cfg_attr(test, mockall::automock)]
pub trait FileSetManifest: Send + Sync {
    /// Ordered entries expected inside the archive for `distribution`.
    ///
    /// # Errors
    ///
    /// Propagates any failure to resolve the manifest.
    fn files_to_extract(&self, distribution: &Distribution) -> Result<Vec<FileSetEntry>>;
}

/// Unpacks a distribution archive into a destination directory.
pub trait Extractor: Send + Sync {
    /// Fully unpacks `archive` into `destination`, naming executables via `naming`.
    ///
    /// # Errors
    ///
    /// Reports a destination occupied by incompatible content as an
    /// already-exists failure; the orchestrator surfaces it as an
    /// unrecoverable conflict naming the directory.
    fn extract(
        &self,
        distribution: &Distribution,
        archive: &Utf8Path,
        destination: &DirectoryHandle,
        naming: &dyn ExecutableNaming,
    ) -> Result<ExtractedFileSet>;
}

/// Produces a local temporary file containing the archive bytes for a distribution.
#[cfg_attr(test, mockall::automock)]
pub trait Downloader: Send + Sync {
    /// Downloads the archive, returning the temporary file it was written to.
    ///
    /// # Errors
    ///
    /// Propagates any download failure.
    fn download(&self, distribution: &Distribution) -> Result<Utf8PathBuf>;
}

/// Pairs a directory scope with the executable naming used inside it.
#[derive(Debug, Clone)]
pub struct DirectoryAndNaming {
    /// Directory scope.
    pub directory: BaseDirectory,
    /// Naming applied to executables placed in this scope.
    pub naming: Arc<dyn ExecutableNaming>,
}

impl DirectoryAndNaming {
    /// Pairs `directory` with `naming`.
    #[must_use]
    pub fn new(directory: BaseDirectory, naming: Arc<dyn ExecutableNaming>) -> Self {
        Self { directory, naming }
    }
}

/// Orchestrates archive caching, canonical extraction, and per-call staging.
pub struct ExtractedArtifactStore {
    config: DownloadConfig,
    manifest: Arc<dyn FileSetManifest>,
    downloader: Arc<dyn Downloader>,
    extractor: Arc<dyn Extractor>,
    extraction: DirectoryAndNaming,
    temp: DirectoryAndNaming,
}

impl fmt::Debug for ExtractedArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractedArtifactStore")
            .field("config", &self.config)
            .field("extraction", &self.extraction)
            .field("temp", &self.temp)
            .finish_non_exhaustive()
    }
}

impl ExtractedArtifactStore {
    /// Orchestrator over injected collaborators.
    #[must_use]
    pub fn new(
        config: DownloadConfig,
        manifest: Arc<dyn FileSetManifest>,
        downloader: Arc<dyn Downloader>,
        extractor: Arc<dyn Extractor>,
        extraction: DirectoryAndNaming,
        temp: DirectoryAndNaming,
    ) -> Self {
        Self {
            config,
            manifest,
            downloader,
            extractor,
            extraction,
            temp,
        }
    }

    /// Whether the source archive for `distribution` is already cached.
    ///
    /// # Errors
    ///
    /// Probe failures propagate unmodified.
    pub fn check_distribution(&self, distribution: &Distribution) -> Result<bool> {
        LocalArtifactStore::new(self.config.clone()).check_artifact(distribution)
    }

    /// Produces an isolated, ready-to-run file set for `distribution`.
    ///
    /// Reuses the canonical extraction when at least one expected executable
    /// is already present under it; otherwise the extraction engine unpacks
    /// the archive first. Either way the caller receives a private staged
    /// copy, and the canonical extraction is never deleted by this call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ExtractionConflict`] when the engine rejects the
    /// canonical directory, and propagates directory, manifest, download, and
    /// staging failures.
    pub fn extract_file_set(&self, distribution: &Distribution) -> Result<ExtractedFileSet> {
        let canonical =
            DirectoryResolver::scoped(self.extraction.directory.clone(), distribution).resolve()?;
        let entries = self.manifest.files_to_extract(distribution)?;
        let resolved = resolve_entry_names(&entries, self.extraction.naming.as_ref());

        let canonical_set = if any_executable_present(canonical.path(), &resolved) {
            debug!(
                target: LOG_TARGET,
                distribution = %distribution,
                dir = %canonical.path(),
                "reusing canonical extraction"
            );
            manifest_file_set(&canonical, &resolved)
        } else {
            self.extract_canonical(distribution, &canonical)?
        };

        self.stage(distribution, &canonical_set)
    }

    /// Removes the staged copy produced by a prior [`Self::extract_file_set`] call.
    ///
    /// Only the staged copy is deleted; the canonical extraction stays
    /// available for future reuse. Removing an already-removed set is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Propagates removal failures other than absence.
    pub fn remove_file_set(
        &self,
        distribution: &Distribution,
        file_set: &ExtractedFileSet,
    ) -> Result<()> {
        debug!(
            target: LOG_TARGET,
            distribution = %distribution,
            dir = %file_set.base_dir(),
            "removing staged file set"
        );
        staging::delete(file_set)
    }

    /// Unpacks the distribution into the canonical directory.
    fn extract_canonical(
        &self,
        distribution: &Distribution,
        canonical: &DirectoryHandle,
    ) -> Result<ExtractedFileSet> {
        let archive = self.ensure_archive(distribution)?;
        debug!(
            target: LOG_TARGET,
            distribution = %distribution,
            archive = %archive,
            dir = %canonical.path(),
            "invoking extraction engine"
        );
        self.extractor
            .extract(
                distribution,
                &archive,
                canonical,
                self.extraction.naming.as_ref(),
            )
            .map_err(|err| classify_extraction_failure(err, canonical))
    }

    /// Returns the cached archive path, downloading and publishing it first
    /// when absent.
    fn ensure_archive(&self, distribution: &Distribution) -> Result<Utf8PathBuf> {
        let local = LocalArtifactStore::new(self.config.clone());
        if let Some(artifact) = local.artifact(distribution)? {
            return Ok(artifact);
        }

        let download = self.downloader.download(distribution)?;
        if !local.store(distribution, &download)? {
            warn!(
                target: LOG_TARGET,
                distribution = %distribution,
                "archive publish could not be confirmed"
            );
        }

        local.artifact(distribution)?.ok_or_else(|| {
            StoreError::Io(io::Error::new(
                ErrorKind::NotFound,
                format!("archive for {distribution} unavailable after download"),
            ))
        })
    }

    /// Copies `canonical_set` into a fresh private staging directory.
    fn stage(
        &self,
        distribution: &Distribution,
        canonical_set: &ExtractedFileSet,
    ) -> Result<ExtractedFileSet> {
        let unique = format!("{}-{}", distribution.as_path(), Uuid::new_v4());
        let staged_dir =
            DirectoryResolver::suffixed(self.temp.directory.clone(), unique).resolve()?;
        staging::copy(canonical_set, &staged_dir, self.temp.naming.as_ref())
    }
}

/// Pure manifest interpretation: the final on-disk name of every entry.
///
/// Executable entries pass through the canonical naming transform exactly
/// once; all other entries keep their manifest name.
pub(crate) fn resolve_entry_names(
    entries: &[FileSetEntry],
    naming: &dyn ExecutableNaming,
) -> Vec<(FileType, String)> {
    entries
        .iter()
        .map(|entry| {
            let name = match entry.file_type() {
                FileType::Executable => naming.name_for(entry.name()),
                FileType::Library | FileType::Documentation | FileType::Other => {
                    entry.name().to_owned()
                }
            };
            (entry.file_type(), name)
        })
        .collect()
}

/// Presence probe: whether any expected executable already exists under `dir`.
///
/// Only Executable entries are inspected, so a manifest without any can
/// never report an existing extraction and every call re-extracts.
pub(crate) fn any_executable_present(dir: &Utf8Path, resolved: &[(FileType, String)]) -> bool {
    resolved
        .iter()
        .any(|(file_type, name)| *file_type == FileType::Executable && dir.join(name).is_file())
}

/// Builds the file-set description purely from the resolved manifest names.
fn manifest_file_set(
    canonical: &DirectoryHandle,
    resolved: &[(FileType, String)],
) -> ExtractedFileSet {
    let mut builder = ExtractedFileSet::builder(canonical.path(), canonical.is_generated());
    for (file_type, name) in resolved {
        builder = builder.file(*file_type, name);
    }
    builder.build()
}

/// Maps an engine rejection of occupied state to an unrecoverable conflict
/// naming the canonical directory.
fn classify_extraction_failure(err: StoreError, canonical: &DirectoryHandle) -> StoreError {
    match err {
        StoreError::ExtractionConflict { .. } => StoreError::ExtractionConflict {
            dir: canonical.path().to_path_buf(),
        },
        StoreError::Io(source) if source.kind() == ErrorKind::AlreadyExists => {
            StoreError::ExtractionConflict {
                dir: canonical.path().to_path_buf(),
            }
        }
        other => other,
    }
}
