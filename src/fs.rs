//! The namespace itself: directories, regular files, and the operations
//! that create, read, write and remove them.
//!
//! [`FileSystem`] owns an [`Arena`] plus the index of the root directory's
//! inode. Every operation here works purely against the in-memory arena;
//! nothing touches disk until [`FileSystem::dump`] is called explicitly —
//! there is no flush-on-drop the way the teacher's mmap-backed device had,
//! since persistence here is only ever triggered by an explicit dump.

use log::{debug, info, trace, warn};

use crate::arena::Arena;
use crate::codec;
use crate::error::{FsError, Result};
use crate::resolver::{find_child, resolve, resolve_parent};
use crate::types::{NType, BLOCK_SIZE, NAME_MAX, NO_ENTRY, ROOT_NAME};

/// An in-memory, image-backed filesystem: a fixed-capacity arena plus the
/// inode index of its root directory.
#[derive(Debug)]
pub struct FileSystem {
    pub(crate) arena: Arena,
    pub(crate) root_node: usize,
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() >= NAME_MAX {
        return Err(FsError::BadPath(format!(
            "component name must be 1..{} bytes: {name:?}",
            NAME_MAX
        )));
    }
    Ok(())
}

/// Link child inode `child` into directory `dir`'s first free direct-block
/// slot. Fails with [`FsError::DirFull`] if all `DIRECT_BLOCKS` slots are
/// already in use.
fn link_child(arena: &mut Arena, dir: usize, child: usize) -> Result<()> {
    let slot = arena.inodes[dir]
        .direct_blocks
        .iter()
        .position(|&e| e == NO_ENTRY)
        .ok_or(FsError::DirFull)?;
    arena.inodes[dir].direct_blocks[slot] = child as i32;
    Ok(())
}

/// Remove the first occurrence of `child` from directory `dir`'s direct
/// blocks.
fn unlink_child(arena: &mut Arena, dir: usize, child: usize) {
    if let Some(slot) = arena.inodes[dir]
        .direct_blocks
        .iter()
        .position(|&e| e == child as i32)
    {
        arena.inodes[dir].direct_blocks[slot] = NO_ENTRY;
    }
}

impl FileSystem {
    /// Build a brand new, empty filesystem with `n` inode and data block
    /// slots, containing only the root directory.
    pub fn new_in_memory(n: u32) -> Result<FileSystem> {
        let mut arena = Arena::new(n);
        let root_node = arena.alloc_inode()?;
        arena.inodes[root_node].ntype = NType::Directory;
        arena.inodes[root_node].name = ROOT_NAME.to_string();
        arena.inodes[root_node].parent = NO_ENTRY;
        info!("created filesystem with {n} slots, root at inode {root_node}");
        Ok(FileSystem { arena, root_node })
    }

    /// Create a fresh image at `path` with `n` slots and dump it
    /// immediately, returning the in-memory handle.
    pub fn create(path: impl AsRef<std::path::Path>, n: u32) -> Result<FileSystem> {
        let fs = FileSystem::new_in_memory(n)?;
        codec::dump(&fs, path)?;
        Ok(fs)
    }

    /// Load an existing image from `path`.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<FileSystem> {
        codec::load(path)
    }

    /// Persist the current in-memory state to `path`, overwriting it.
    pub fn dump(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        codec::dump(self, path)
    }

    /// Create a new, empty directory at `path`.
    ///
    /// Fails with [`FsError::AlreadyExists`] if a sibling with the same
    /// name already exists, and [`FsError::DirFull`] if the parent has no
    /// free direct-block slot left.
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let (parent, name) = resolve_parent(self, path)?;
        check_name(&name)?;
        if find_child(self, parent, &name).is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let idx = self.arena.alloc_inode()?;
        self.arena.inodes[idx].ntype = NType::Directory;
        self.arena.inodes[idx].name = name;
        self.arena.inodes[idx].parent = parent as i32;
        if let Err(e) = link_child(&mut self.arena, parent, idx) {
            self.arena.free_inode(idx);
            return Err(e);
        }
        debug!("mkdir {path} -> inode {idx}");
        Ok(())
    }

    /// Create a new, empty regular file at `path`.
    pub fn mkfile(&mut self, path: &str) -> Result<()> {
        let (parent, name) = resolve_parent(self, path)?;
        check_name(&name)?;
        if find_child(self, parent, &name).is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let idx = self.arena.alloc_inode()?;
        self.arena.inodes[idx].ntype = NType::RegFile;
        self.arena.inodes[idx].name = name;
        self.arena.inodes[idx].parent = parent as i32;
        if let Err(e) = link_child(&mut self.arena, parent, idx) {
            self.arena.free_inode(idx);
            return Err(e);
        }
        debug!("mkfile {path} -> inode {idx}");
        Ok(())
    }

    /// List the immediate children of the directory at `path`, one line
    /// per child, in the form `DIR name\n` or `FIL name\n`.
    pub fn list(&self, path: &str) -> Result<String> {
        let dir = resolve(self, path)?;
        if !self.arena.inodes[dir].is_dir() {
            return Err(FsError::IsFile);
        }
        let mut out = String::new();
        for &entry in &self.arena.inodes[dir].direct_blocks {
            if entry == NO_ENTRY {
                continue;
            }
            let child = &self.arena.inodes[entry as usize];
            let tag = if child.is_dir() { "DIR" } else { "FIL" };
            out.push_str(tag);
            out.push(' ');
            out.push_str(&child.name);
            out.push('\n');
        }
        Ok(out)
    }

    /// Append `data` to the regular file at `path`, allocating new data
    /// blocks as needed. Returns the number of bytes actually appended,
    /// which may be fewer than `data.len()` if the file's direct-block
    /// slots or the image's free data blocks run out first — a partial
    /// write is not an error, matching the image's fixed-capacity model.
    pub fn writef(&mut self, path: &str, data: &[u8]) -> Result<usize> {
        let idx = resolve(self, path)?;
        if !self.arena.inodes[idx].is_file() {
            return Err(FsError::IsDirectory);
        }
        let mut written = 0usize;
        let mut remaining = data;

        // Top up the last already-allocated block first, if it has room.
        if let Some(&last) = self.arena.inodes[idx]
            .direct_blocks
            .iter()
            .rev()
            .find(|&&e| e != NO_ENTRY)
        {
            let block = &mut self.arena.data_blocks[last as usize];
            let room = block.remaining();
            if room > 0 && !remaining.is_empty() {
                let n = room.min(remaining.len());
                let start = block.size as usize;
                block.contents[start..start + n].copy_from_slice(&remaining[..n]);
                block.size += n as u32;
                written += n;
                remaining = &remaining[n..];
            }
        }

        while !remaining.is_empty() {
            let slot = match self.arena.inodes[idx]
                .direct_blocks
                .iter()
                .position(|&e| e == NO_ENTRY)
            {
                Some(s) => s,
                None => {
                    warn!("writef {path}: direct blocks exhausted, partial write of {written} bytes");
                    break;
                }
            };
            let block_idx = match self.arena.alloc_data_block() {
                Ok(b) => b,
                Err(_) => {
                    warn!("writef {path}: no free data blocks, partial write of {written} bytes");
                    break;
                }
            };
            self.arena.inodes[idx].direct_blocks[slot] = block_idx as i32;
            let block = &mut self.arena.data_blocks[block_idx];
            let n = BLOCK_SIZE.min(remaining.len());
            block.contents[..n].copy_from_slice(&remaining[..n]);
            block.size = n as u32;
            written += n;
            remaining = &remaining[n..];
        }

        self.arena.inodes[idx].size += written as u32;
        trace!("writef {path}: appended {written}/{} bytes", data.len());
        Ok(written)
    }

    /// Read the full contents of the regular file at `path`.
    pub fn readf(&self, path: &str) -> Result<Vec<u8>> {
        let idx = resolve(self, path)?;
        let inode = &self.arena.inodes[idx];
        if !inode.is_file() {
            return Err(FsError::IsDirectory);
        }
        let mut out = Vec::with_capacity(inode.size as usize);
        for &entry in &inode.direct_blocks {
            if entry == NO_ENTRY {
                break;
            }
            let block = &self.arena.data_blocks[entry as usize];
            out.extend_from_slice(&block.contents[..block.size as usize]);
        }
        Ok(out)
    }

    /// Remove the file or directory at `path`, recursively if it is a
    /// directory. Refuses to remove the root.
    pub fn rm(&mut self, path: &str) -> Result<()> {
        let idx = resolve(self, path)?;
        if idx == self.root_node {
            return Err(FsError::BadPath("cannot remove the root".to_string()));
        }
        let parent = self.arena.inodes[idx].parent as usize;
        self.remove_subtree(idx);
        unlink_child(&mut self.arena, parent, idx);
        debug!("rm {path}");
        Ok(())
    }

    /// Free inode `idx` and, if it is a directory, recursively free every
    /// descendant; if it is a file, free its data blocks. Does not unlink
    /// `idx` from its parent — callers that already know the parent handle
    /// that themselves.
    fn remove_subtree(&mut self, idx: usize) {
        if self.arena.inodes[idx].is_dir() {
            let children: Vec<usize> = self.arena.inodes[idx]
                .direct_blocks
                .iter()
                .filter(|&&e| e != NO_ENTRY)
                .map(|&e| e as usize)
                .collect();
            for child in children {
                self.remove_subtree(child);
            }
        } else {
            let blocks: Vec<usize> = self.arena.inodes[idx]
                .direct_blocks
                .iter()
                .filter(|&&e| e != NO_ENTRY)
                .map(|&e| e as usize)
                .collect();
            for b in blocks {
                self.arena.free_data_block(b);
            }
        }
        self.arena.free_inode(idx);
    }

    /// Import a host file at `host_path` into the directory at
    /// `internal_dir`, naming the new internal file after the host file's
    /// basename.
    pub fn import(&mut self, host_path: &std::path::Path, internal_dir: &str) -> Result<()> {
        let data = std::fs::read(host_path)?;
        let base = host_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FsError::BadPath(format!("{}", host_path.display())))?;
        let internal_path = format!("{}/{}", internal_dir.trim_end_matches('/'), base);
        self.mkfile(&internal_path)?;
        self.writef(&internal_path, &data)?;
        info!("imported {} as {internal_path}", host_path.display());
        Ok(())
    }

    /// Export the internal file at `internal_path` to a new host file at
    /// `host_path`. Refuses to overwrite an existing host file.
    pub fn export(&self, internal_path: &str, host_path: &std::path::Path) -> Result<()> {
        if host_path.exists() {
            return Err(FsError::AlreadyExists(format!("{}", host_path.display())));
        }
        let data = self.readf(internal_path)?;
        std::fs::write(host_path, data)?;
        info!("exported {internal_path} to {}", host_path.display());
        Ok(())
    }

    /// Whether `path` resolves to any inode at all.
    pub fn exists(&self, path: &str) -> bool {
        resolve(self, path).is_ok()
    }

    /// The parent inode index recorded on inode `idx`, or `NO_ENTRY` for
    /// the root. Exposed for callers that need to walk parent links
    /// directly, such as integrity checks.
    pub fn inode_parent(&self, idx: usize) -> i32 {
        self.arena.inodes[idx].parent
    }
}
