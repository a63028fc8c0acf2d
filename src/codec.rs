//! Whole-image (de)serialization: turning an [`Arena`] into a single binary
//! file and back.
//!
//! The image is four regions written back to back, in a fixed order:
//! superblock, free-list, inode table, data-block table. Each region is
//! (de)serialized with `bincode` the same way the teacher serialized
//! individual `Buffer`/`Block` values, just applied to a whole region at
//! once rather than to per-block offsets, since there is no on-disk block
//! addressing scheme to preserve here.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, trace};

use crate::arena::Arena;
use crate::error::{FsError, Result};
use crate::fs::FileSystem;
use crate::types::{
    DataBlock, Inode, NType, SuperBlock, DATABLOCK_SIZE, INODE_MIN_SIZE, SUPERBLOCK_SIZE,
};

/// Write `fs`'s entire arena to `path`, overwriting any existing file.
pub fn dump(fs: &FileSystem, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("dumping image to {}", path.display());
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    bincode::serialize_into(&mut w, &fs.arena.sb)?;
    w.write_all(&fs.arena.free_list)?;
    for inode in &fs.arena.inodes {
        bincode::serialize_into(&mut w, inode)?;
    }
    for block in &fs.arena.data_blocks {
        bincode::serialize_into(&mut w, block)?;
    }
    w.flush()?;
    trace!(
        "wrote {} inodes and {} data blocks",
        fs.arena.inodes.len(),
        fs.arena.data_blocks.len()
    );
    Ok(())
}

/// Read an image back from `path`, reconstructing a [`FileSystem`].
///
/// Fails with [`FsError::InvalidImage`] if the file is too short to hold
/// even a superblock and free-list, or if no inode in the loaded table is a
/// directory named `/` (every valid image has exactly one root).
pub fn load(path: impl AsRef<Path>) -> Result<FileSystem> {
    let path = path.as_ref();
    debug!("loading image from {}", path.display());
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut r = BufReader::new(file);

    let sb: SuperBlock = bincode::deserialize_from(&mut r)?;
    let n = sb.num_blocks as usize;

    // Cheap floor before touching the (possibly huge) inode/data-block
    // tables: a well-formed image is at least this many bytes, since real
    // inodes only ever serialize larger than an empty, freshly-initialized
    // one (they carry a name) and every data block is exactly `DATABLOCK_SIZE`.
    let min_len = *SUPERBLOCK_SIZE
        + n as u64
        + n as u64 * *INODE_MIN_SIZE
        + n as u64 * *DATABLOCK_SIZE;
    if file_len < min_len {
        return Err(FsError::InvalidImage(format!(
            "image is {file_len} bytes, too short for {n} slots (need at least {min_len})"
        )));
    }

    let mut free_list = vec![0u8; n];
    r.read_exact(&mut free_list).map_err(|e| {
        FsError::InvalidImage(format!("truncated free-list: {e}"))
    })?;

    let mut inodes = Vec::with_capacity(n);
    for _ in 0..n {
        let inode: Inode = bincode::deserialize_from(&mut r)
            .map_err(|e| FsError::InvalidImage(format!("truncated inode table: {e}")))?;
        inodes.push(inode);
    }

    let mut data_blocks = Vec::with_capacity(n);
    for _ in 0..n {
        let block: DataBlock = bincode::deserialize_from(&mut r)
            .map_err(|e| FsError::InvalidImage(format!("truncated data block table: {e}")))?;
        data_blocks.push(block);
    }

    let root_node = inodes
        .iter()
        .position(|i| i.ntype == NType::Directory && i.name == crate::types::ROOT_NAME)
        .ok_or_else(|| FsError::InvalidImage("no root directory found".to_string()))?;

    trace!("loaded {} inodes, root at index {}", inodes.len(), root_node);

    Ok(FileSystem {
        arena: Arena {
            sb,
            free_list,
            inodes,
            data_blocks,
        },
        root_node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_image_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("imagefs-codec-test-{name}-{}.img", std::process::id()));
        p
    }

    #[test]
    fn round_trips_an_empty_image() {
        let path = tmp_image_path("roundtrip-empty");
        let fs = FileSystem::new_in_memory(4).unwrap();
        dump(&fs, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.root_node, fs.root_node);
        assert_eq!(loaded.arena.sb, fs.arena.sb);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn round_trips_after_writes() {
        let path = tmp_image_path("roundtrip-writes");
        let mut fs = FileSystem::new_in_memory(8).unwrap();
        fs.mkdir("/a").unwrap();
        fs.mkfile("/a/hello.txt").unwrap();
        fs.writef("/a/hello.txt", b"hi there").unwrap();
        dump(&fs, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.readf("/a/hello.txt").unwrap(), b"hi there");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_a_truncated_image() {
        let path = tmp_image_path("truncated");
        std::fs::write(&path, b"\x00\x01").unwrap();
        assert!(load(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
