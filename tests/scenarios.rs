//! End-to-end namespace scenarios and the cross-cutting invariants they
//! exercise: slot bijection, name uniqueness among siblings, parent
//! integrity, image round-tripping, append/read commutativity, recursive
//! removal, and import/export behavior.

mod common;

use common::{disk_destruct, disk_open, disk_setup};
use imagefs::FsError;

#[test]
fn scenario_build_a_small_tree_and_list_it() {
    let (path, mut fs) = disk_setup("scenario-build-tree", 32);
    fs.mkdir("/a").unwrap();
    fs.mkdir("/a/b").unwrap();
    fs.mkfile("/a/f.txt").unwrap();
    fs.mkfile("/top.txt").unwrap();

    let root_listing = fs.list("/").unwrap();
    assert!(root_listing.contains("DIR a\n"));
    assert!(root_listing.contains("FIL top.txt\n"));

    let a_listing = fs.list("/a").unwrap();
    assert!(a_listing.contains("DIR b\n"));
    assert!(a_listing.contains("FIL f.txt\n"));

    disk_destruct(&path);
}

#[test]
fn scenario_write_read_dump_reload_round_trips() {
    let (path, mut fs) = disk_setup("scenario-roundtrip", 16);
    fs.mkdir("/docs").unwrap();
    fs.mkfile("/docs/readme.txt").unwrap();
    fs.writef("/docs/readme.txt", b"first chunk, ").unwrap();
    fs.writef("/docs/readme.txt", b"second chunk").unwrap();
    fs.dump(&path).unwrap();

    let reloaded = disk_open(&path);
    assert_eq!(
        reloaded.readf("/docs/readme.txt").unwrap(),
        b"first chunk, second chunk"
    );
    assert_eq!(reloaded.list("/docs").unwrap(), fs.list("/docs").unwrap());

    disk_destruct(&path);
}

#[test]
fn scenario_sibling_names_must_be_unique() {
    let (path, mut fs) = disk_setup("scenario-unique-names", 8);
    fs.mkdir("/x").unwrap();
    assert!(matches!(fs.mkfile("/x"), Err(FsError::AlreadyExists(_))));
    assert!(matches!(fs.mkdir("/x"), Err(FsError::AlreadyExists(_))));
    disk_destruct(&path);
}

#[test]
fn scenario_parent_integrity_survives_a_reload() {
    let (path, mut fs) = disk_setup("scenario-parent-integrity", 8);
    fs.mkdir("/a").unwrap();
    fs.mkdir("/a/b").unwrap();
    fs.dump(&path).unwrap();

    let reloaded = disk_open(&path);
    let b = imagefs::resolver::resolve(&reloaded, "/a/b").unwrap();
    let a = imagefs::resolver::resolve(&reloaded, "/a").unwrap();
    assert_eq!(reloaded.inode_parent(b), a as i32);

    disk_destruct(&path);
}

#[test]
fn scenario_recursive_removal_frees_every_descendant() {
    let (path, mut fs) = disk_setup("scenario-recursive-rm", 16);
    fs.mkdir("/a").unwrap();
    fs.mkdir("/a/b").unwrap();
    fs.mkfile("/a/b/f.txt").unwrap();
    fs.writef("/a/b/f.txt", b"some bytes").unwrap();

    fs.rm("/a").unwrap();

    assert!(!fs.exists("/a"));
    assert!(!fs.exists("/a/b"));
    assert!(!fs.exists("/a/b/f.txt"));
    // Everything under /a should be re-allocatable again.
    fs.mkdir("/a").unwrap();
    fs.mkdir("/a/b").unwrap();

    disk_destruct(&path);
}

#[test]
fn scenario_writef_tolerates_running_out_of_capacity() {
    let (path, mut fs) = disk_setup("scenario-partial-write", 4);
    fs.mkfile("/f.bin").unwrap();
    let data = vec![1u8; imagefs::BLOCK_SIZE * 10];
    let written = fs.writef("/f.bin", &data).unwrap();
    assert!(written < data.len());
    assert_eq!(fs.readf("/f.bin").unwrap(), &data[..written]);
    disk_destruct(&path);
}

#[test]
fn scenario_import_and_export_round_trip_through_the_host_filesystem() {
    let (path, mut fs) = disk_setup("scenario-import-export", 16);

    let host_in = path.with_extension("in.txt");
    std::fs::write(&host_in, b"imported content").unwrap();
    fs.mkdir("/incoming").unwrap();
    fs.import(&host_in, "/incoming").unwrap();

    let internal_path = format!("/incoming/{}", host_in.file_name().unwrap().to_str().unwrap());
    assert_eq!(fs.readf(&internal_path).unwrap(), b"imported content");

    let host_out = path.with_extension("out.txt");
    std::fs::remove_file(&host_out).ok();
    fs.export(&internal_path, &host_out).unwrap();
    assert_eq!(std::fs::read(&host_out).unwrap(), b"imported content");

    // Exporting again onto the same host path must refuse to overwrite.
    assert!(matches!(
        fs.export(&internal_path, &host_out),
        Err(FsError::AlreadyExists(_))
    ));

    std::fs::remove_file(&host_in).ok();
    std::fs::remove_file(&host_out).ok();
    disk_destruct(&path);
}
