//! Concurrency and error-path behaviour of the local archive cache.

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use embedded_artifact_store::{
    Architecture, BaseDirectory, Distribution, DownloadConfig, LocalArtifactStore, Platform,
    StandardArchivePathResolver, StoreError, Version,
};
use tempfile::TempDir;

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

fn store_in(store_dir: Utf8PathBuf) -> LocalArtifactStore {
    LocalArtifactStore::new(DownloadConfig::new(
        BaseDirectory::generated(store_dir),
        Arc::new(StandardArchivePathResolver::new("dist.tar.gz")),
    ))
}

#[test]
fn concurrent_publishers_all_succeed_with_exactly_one_archive() {
    let root = TempDir::new().expect("tempdir");
    let base = utf8(root.path()).to_path_buf();
    let store_dir = base.join("store");
    let downloads_dir = base.join("downloads");
    fs::create_dir_all(&downloads_dir).expect("create downloads dir");

    let writers = 8;
    let barrier = Arc::new(Barrier::new(writers));
    let distribution = linux_dist();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..writers)
            .map(|writer| {
                let barrier = Arc::clone(&barrier);
                let store = store_in(store_dir.clone());
                let distribution = distribution.clone();
                let source = downloads_dir.join(format!("download-{writer}"));
                scope.spawn(move || {
                    fs::write(&source, b"archive bytes").expect("write source");
                    barrier.wait();
                    store.store(&distribution, &source).expect("store")
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().expect("writer thread"));
        }
    });

    let artifact_dir = store_dir.join("LINUX-B64--3.6.0");
    let entries: Vec<_> = fs::read_dir(&artifact_dir)
        .expect("read artifact dir")
        .collect::<Result<_, _>>()
        .expect("list artifact dir");
    assert_eq!(entries.len(), 1);

    let store = store_in(store_dir);
    let artifact = store
        .artifact(&distribution)
        .expect("probe after race")
        .expect("cached archive");
    assert_eq!(fs::read(&artifact).expect("read archive"), b"archive bytes");
}

#[test]
fn sequential_republish_is_a_silent_no_op() {
    let root = TempDir::new().expect("tempdir");
    let base = utf8(root.path()).to_path_buf();
    let store = store_in(base.join("store"));
    let distribution = linux_dist();

    let first = base.join("first");
    fs::write(&first, b"archive bytes").expect("write first");
    assert!(store.store(&distribution, &first).expect("first store"));

    let second = base.join("second");
    fs::write(&second, b"other bytes").expect("write second");
    assert!(store.store(&distribution, &second).expect("second store"));

    // The losing publisher's source file is left for its owner to discard.
    assert!(second.exists());
}

#[test]
fn a_file_occupying_the_store_root_is_a_configuration_error() {
    let root = TempDir::new().expect("tempdir");
    let base = utf8(root.path()).to_path_buf();
    let blocked = base.join("store");
    fs::write(&blocked, b"not a directory").expect("write blocker");

    let store = store_in(blocked.clone());
    let err = store
        .check_artifact(&linux_dist())
        .expect_err("blocked root cannot be probed");
    assert!(matches!(err, StoreError::NotADirectory { path } if path == blocked));
}

#[test]
fn check_artifact_ignores_a_directory_at_the_archive_path() {
    let root = TempDir::new().expect("tempdir");
    let base = utf8(root.path()).to_path_buf();
    let store_dir = base.join("store");
    fs::create_dir_all(store_dir.join("LINUX-B64--3.6.0/dist.tar.gz"))
        .expect("create directory at archive path");

    let store = store_in(store_dir);
    assert!(!store.check_artifact(&linux_dist()).expect("probe"));
}
