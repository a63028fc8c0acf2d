//! Shared setup/teardown for integration tests, mirroring the
//! temp-directory-per-test pattern: each test gets an image path under the
//! crate's own `tests/tmp/` directory, named after the test, created fresh
//! and removed at the end.

use std::path::PathBuf;

use imagefs::FileSystem;

/// Build the path a test's scratch image should live at, creating the
/// enclosing `tests/tmp/` directory if needed.
pub fn disk_prep_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("tmp");
    std::fs::create_dir_all(&p).expect("failed to create tests/tmp");
    p.push(format!("{name}.img"));
    p
}

/// Remove a test's scratch image, ignoring a missing file.
pub fn disk_unprep_path(path: &PathBuf) {
    std::fs::remove_file(path).ok();
}

/// Create a fresh image at a test-specific path with `n` slots.
pub fn disk_setup(name: &str, n: u32) -> (PathBuf, FileSystem) {
    let path = disk_prep_path(name);
    disk_unprep_path(&path);
    let fs = FileSystem::create(&path, n).expect("failed to create test image");
    (path, fs)
}

/// Load the image at `path` back in, for tests that check persistence.
pub fn disk_open(path: &PathBuf) -> FileSystem {
    FileSystem::load(path).expect("failed to load test image")
}

/// Tear down a test's scratch image.
pub fn disk_destruct(path: &PathBuf) {
    disk_unprep_path(path);
}
