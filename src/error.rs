//! Error type shared by every namespace operation.
//!
//! One flat `thiserror` enum, instead of the per-layer chain the original
//! assignment used (`BlockLayerError` wrapped by `InodeLayerError` wrapped
//! by `DirLayerError`, ...) — there is only one layer here, the arena, so
//! chaining error types across layers would just be indirection without a
//! second layer on the other end of it.

use thiserror::Error;

/// Everything that can go wrong operating on a [`crate::fs::FileSystem`].
#[derive(Error, Debug)]
pub enum FsError {
    /// The underlying image file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    /// A loaded image is structurally unusable (truncated, no root).
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A path does not start with `/`, or targets a disallowed root
    /// operation, or has a component that is empty or too long.
    #[error("bad path: {0}")]
    BadPath(String),

    /// A path component was not found while resolving.
    #[error("not found: {0}")]
    NotFound(String),

    /// A non-terminal path component resolved to a regular file.
    #[error("not a directory: {0}")]
    NotDirectory(String),

    /// A sibling with this name already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// No free inode or data block slot remains in the arena.
    #[error("no space left in the image")]
    NoSpace,

    /// A directory's direct-block slots are all in use.
    #[error("directory is full")]
    DirFull,

    /// An operation that requires a directory was given a regular file.
    #[error("path refers to a file, not a directory")]
    IsFile,

    /// An operation that requires a regular file was given a directory.
    #[error("path refers to a directory, not a file")]
    IsDirectory,
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, FsError>;
