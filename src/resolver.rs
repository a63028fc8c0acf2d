//! Path splitting and resolution.
//!
//! Paths are always absolute, `/`-separated, and resolved component by
//! component starting at the root inode. Splitting is done over a borrowed
//! `&str` via the `relative-path` crate's component iterator rather than
//! the destructive `strtok`-style walk the original C implementation used
//! in every operation, which consumed its own path argument one component
//! at a time.

use log::trace;
use relative_path::{Component, RelativePath};

use crate::error::{FsError, Result};
use crate::fs::FileSystem;
use crate::types::NO_ENTRY;

/// Split an absolute path into its non-empty components.
///
/// Returns [`FsError::BadPath`] if `path` does not start with `/`. Repeated
/// or trailing slashes collapse away since empty components are discarded;
/// there is no "." or ".." handling, since this namespace has no notion of
/// a current directory.
pub fn split_path(path: &str) -> Result<Vec<String>> {
    if !path.starts_with('/') {
        return Err(FsError::BadPath(format!("path must be absolute: {path}")));
    }
    let rel = RelativePath::new(path.trim_start_matches('/'));
    let parts = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string()),
            _ => None,
        })
        .collect();
    Ok(parts)
}

/// Find the inode index of directory `dir`'s direct child named `name`, if
/// any.
pub fn find_child(fs: &FileSystem, dir: usize, name: &str) -> Option<usize> {
    fs.arena.inodes[dir]
        .direct_blocks
        .iter()
        .filter(|&&idx| idx != NO_ENTRY)
        .map(|&idx| idx as usize)
        .find(|&idx| fs.arena.inodes[idx].name == name)
}

/// Resolve an absolute path to the inode index it names.
///
/// `/` itself resolves to the root inode. Fails with [`FsError::NotFound`]
/// if any component is missing, or [`FsError::NotDirectory`] if a
/// non-terminal component names a regular file (i.e. there are still
/// components left to descend into once a file is reached).
pub fn resolve(fs: &FileSystem, path: &str) -> Result<usize> {
    let parts = split_path(path)?;
    let mut cur = fs.root_node;
    let mut remaining = parts.len();
    for part in parts {
        remaining -= 1;
        if !fs.arena.inodes[cur].is_dir() {
            return Err(FsError::NotDirectory(path.to_string()));
        }
        cur = find_child(fs, cur, &part)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        if remaining > 0 && !fs.arena.inodes[cur].is_dir() {
            return Err(FsError::NotDirectory(path.to_string()));
        }
    }
    trace!("resolved {path} -> inode {cur}");
    Ok(cur)
}

/// Resolve the parent directory of `path` and return its inode index
/// together with the final path component's name.
///
/// Fails with [`FsError::BadPath`] if `path` is the root itself, since the
/// root has no parent within the namespace.
pub fn resolve_parent(fs: &FileSystem, path: &str) -> Result<(usize, String)> {
    let parts = split_path(path)?;
    let (name, dir_parts) = parts
        .split_last()
        .ok_or_else(|| FsError::BadPath("root has no parent".to_string()))?;
    let mut cur = fs.root_node;
    let mut remaining = dir_parts.len();
    for part in dir_parts {
        remaining -= 1;
        if !fs.arena.inodes[cur].is_dir() {
            return Err(FsError::NotDirectory(path.to_string()));
        }
        cur = find_child(fs, cur, part)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        if remaining > 0 && !fs.arena.inodes[cur].is_dir() {
            return Err(FsError::NotDirectory(path.to_string()));
        }
    }
    if !fs.arena.inodes[cur].is_dir() {
        return Err(FsError::NotDirectory(path.to_string()));
    }
    Ok((cur, name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileSystem;

    #[test]
    fn splits_on_slashes_and_drops_empties() {
        assert_eq!(
            split_path("/a//b/c/").unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(split_path("/").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn rejects_relative_paths() {
        assert!(split_path("a/b").is_err());
    }

    #[test]
    fn resolves_root_and_nested_paths() {
        let mut fs = FileSystem::new_in_memory(8).unwrap();
        fs.mkdir("/a").unwrap();
        fs.mkfile("/a/f.txt").unwrap();
        assert_eq!(resolve(&fs, "/").unwrap(), fs.root_node);
        assert!(resolve(&fs, "/a").is_ok());
        assert!(resolve(&fs, "/a/f.txt").is_ok());
        assert!(matches!(resolve(&fs, "/missing"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn descending_into_a_file_is_not_directory() {
        let mut fs = FileSystem::new_in_memory(8).unwrap();
        fs.mkfile("/f.txt").unwrap();
        assert!(matches!(
            resolve(&fs, "/f.txt/x"),
            Err(FsError::NotDirectory(_))
        ));
    }
}
