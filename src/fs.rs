//! Shared filesystem helpers that operate within the capability sandbox.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use std::io::ErrorKind;

use crate::error::{Result, StoreError};

/// Resolves a path to an ambient directory handle paired with the relative path component.
///
/// Absolute paths are opened relative to the ambient root; relative paths reuse the current
/// working directory.
pub(crate) fn ambient_dir_and_path(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf)> {
    if path.has_root() {
        let stripped = path
            .strip_prefix("/")
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());
        let dir = Dir::open_ambient_dir("/", ambient_authority())?;
        Ok((dir, stripped))
    } else {
        let dir = Dir::open_ambient_dir(".", ambient_authority())?;
        Ok((dir, path.to_path_buf()))
    }
}

/// Ensures the provided path exists as a directory, creating missing components.
///
/// A concurrent creator winning the race counts as success. A path that exists
/// but is not a directory, or any other creation failure, is fatal.
pub(crate) fn ensure_dir_exists(path: &Utf8Path) -> Result<()> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }

    if let Err(source) = dir.create_dir_all(relative.as_std_path()) {
        if directory_confirmed(&dir, &relative) {
            return Ok(());
        }
        if source.kind() == ErrorKind::AlreadyExists {
            return Err(StoreError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        return Err(StoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Whether the relative path currently denotes a directory.
fn directory_confirmed(dir: &Dir, relative: &Utf8Path) -> bool {
    dir.metadata(relative.as_std_path())
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// Whether a path denotes an existing entry, propagating probe failures.
pub(crate) fn probe_exists(path: &Utf8Path) -> Result<bool> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    match dir.metadata(relative.as_std_path()) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StoreError::Io(err)),
    }
}

/// Whether a path denotes a regular file the current process can open for reading.
///
/// Absence and an unreadable file both report `false`; any other probe failure
/// propagates unmodified.
pub(crate) fn is_readable_file(path: &Utf8Path) -> Result<bool> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let metadata = match dir.metadata(relative.as_std_path()) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(StoreError::Io(err)),
    };
    if !metadata.is_file() {
        return Ok(false);
    }
    match dir.open(relative.as_std_path()) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok(false),
        Err(err) => Err(StoreError::Io(err)),
    }
}

/// Atomically moves a file into its final location.
///
/// A destination that already exists is success; concurrent publishers of the
/// same distribution race benignly. Any other failure is fatal and names both
/// paths.
pub(crate) fn move_file(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    let (from_dir, from_relative) = ambient_dir_and_path(from)?;
    let (to_dir, to_relative) = ambient_dir_and_path(to)?;
    match from_dir.rename(from_relative.as_std_path(), &to_dir, to_relative.as_std_path()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(StoreError::StoreArtifact {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use std::fs;
    use tempfile::tempdir;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).expect("utf8 path")
    }

    #[test]
    fn ensure_dir_exists_creates_nested_components() {
        let temp = tempdir().expect("tempdir");
        let target = utf8(temp.path()).join("a/b/c");

        ensure_dir_exists(&target).expect("create nested dirs");
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_dir_exists_accepts_an_existing_directory() {
        let temp = tempdir().expect("tempdir");
        let target = utf8(temp.path()).to_path_buf();

        ensure_dir_exists(&target).expect("existing dir is success");
        ensure_dir_exists(&target).expect("idempotent");
    }

    #[test]
    fn ensure_dir_exists_rejects_a_file_in_the_way() {
        let temp = tempdir().expect("tempdir");
        let target = utf8(temp.path()).join("occupied");
        fs::write(&target, b"not a directory").expect("write blocker");

        let err = ensure_dir_exists(&target).expect_err("file conflicts with directory");
        assert!(matches!(err, StoreError::NotADirectory { path } if path == target));
    }

    #[test]
    fn move_file_relocates_the_source() {
        let temp = tempdir().expect("tempdir");
        let from = utf8(temp.path()).join("download");
        let to = utf8(temp.path()).join("archive");
        fs::write(&from, b"bytes").expect("write source");

        move_file(&from, &to).expect("move");
        assert!(!from.exists());
        assert_eq!(fs::read(&to).expect("read destination"), b"bytes");
    }

    #[test]
    fn move_file_fails_without_a_source() {
        let temp = tempdir().expect("tempdir");
        let from = utf8(temp.path()).join("missing");
        let to = utf8(temp.path()).join("archive");

        let err = move_file(&from, &to).expect_err("missing source is fatal");
        assert!(matches!(err, StoreError::StoreArtifact { .. }));
    }

    #[test]
    fn is_readable_file_reports_absence_as_false() {
        let temp = tempdir().expect("tempdir");
        let missing = utf8(temp.path()).join("missing");

        assert!(!is_readable_file(&missing).expect("probe"));
    }

    #[test]
    fn is_readable_file_rejects_directories() {
        let temp = tempdir().expect("tempdir");

        assert!(!is_readable_file(utf8(temp.path())).expect("probe"));
    }
}
