//! Copies resolved file sets into private staging directories and deletes them.
//!
//! Staging gives every caller an isolated, disposable copy of a canonical
//! extraction. Executables are renamed through the staging naming strategy so
//! a copy that is currently running never blocks another caller, and deletion
//! only ever touches the staged tree.

use camino::Utf8Path;
use std::fs as stdfs;
use std::io;
use std::io::ErrorKind;
use tracing::debug;

use crate::directories::DirectoryHandle;
use crate::error::{Result, StoreError};
use crate::file_set::{ExtractedFileSet, FileType};
use crate::naming::ExecutableNaming;

/// Observability target for staging operations.
const LOG_TARGET: &str = "artifact_store::staging";

/// Copies `file_set` into `destination`, renaming executables via `naming`.
///
/// The relative layout below the source root is preserved and file
/// permissions are carried over where possible.
///
/// # Errors
///
/// Returns [`StoreError::Staging`] naming the staging directory when any
/// copy fails; a failed call never yields a usable result value.
pub fn copy(
    file_set: &ExtractedFileSet,
    destination: &DirectoryHandle,
    naming: &dyn ExecutableNaming,
) -> Result<ExtractedFileSet> {
    debug!(
        target: LOG_TARGET,
        from = %file_set.base_dir(),
        to = %destination.path(),
        "staging file set copy"
    );

    let mut builder = ExtractedFileSet::builder(destination.path(), destination.is_generated());
    for (file_type, file) in file_set.iter() {
        let relative = relative_name(file_set.base_dir(), file);
        let target_name = if file_type == FileType::Executable {
            rename_final_component(&relative, naming)
        } else {
            relative
        };
        let target_path = destination.path().join(&target_name);
        copy_entry(file, &target_path).map_err(|err| StoreError::Staging {
            dir: destination.path().to_path_buf(),
            source: err,
        })?;
        builder = builder.file(file_type, &target_name);
    }

    Ok(builder.build())
}

/// Deletes the staged copy: every file, then the generated root directory.
///
/// Entries that are already gone are tolerated, so deletion is idempotent.
/// A fixed (caller-owned) root is left in place with only the staged files
/// removed.
///
/// # Errors
///
/// Propagates any removal failure other than absence.
pub fn delete(file_set: &ExtractedFileSet) -> Result<()> {
    for (_, file) in file_set.iter() {
        remove_file_if_present(file)?;
    }

    if file_set.base_dir_is_generated() {
        match stdfs::remove_dir_all(file_set.base_dir()) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(StoreError::Io(err)),
        }
    }

    debug!(
        target: LOG_TARGET,
        dir = %file_set.base_dir(),
        "staged file set removed"
    );
    Ok(())
}

/// Path of `file` relative to `base_dir`, falling back to its file name.
fn relative_name(base_dir: &Utf8Path, file: &Utf8Path) -> String {
    file.strip_prefix(base_dir).map_or_else(
        |_| file.file_name().unwrap_or_default().to_owned(),
        |relative| relative.as_str().to_owned(),
    )
}

/// Applies `naming` to the final path component only, keeping parent segments.
fn rename_final_component(relative: &str, naming: &dyn ExecutableNaming) -> String {
    let path = Utf8Path::new(relative);
    let file_name = path.file_name().unwrap_or(relative);
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .map_or_else(
            || naming.name_for(file_name),
            |parent| parent.join(naming.name_for(file_name)).into_string(),
        )
}

/// Copies one file, creating parents and carrying permissions over.
fn copy_entry(file: &Utf8Path, target_path: &Utf8Path) -> io::Result<()> {
    if let Some(parent) = target_path.parent() {
        stdfs::create_dir_all(parent)?;
    }
    stdfs::copy(file, target_path)?;
    copy_permissions(file, target_path);
    Ok(())
}

/// Best-effort permission copy from source to destination.
fn copy_permissions(file: &Utf8Path, target_path: &Utf8Path) {
    let Ok(metadata) = stdfs::metadata(file) else {
        return;
    };
    if let Err(err) = stdfs::set_permissions(target_path, metadata.permissions()) {
        debug!(
            target: LOG_TARGET,
            src = %file,
            dst = %target_path,
            error = %err,
            "failed to copy permissions (best effort)"
        );
    }
}

/// Removes a file, treating absence as success.
fn remove_file_if_present(file: &Utf8Path) -> Result<()> {
    match stdfs::remove_file(file) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StoreError::Io(err)),
    }
}
