//! A fixed-capacity, image-backed toy filesystem.
//!
//! An [`fs::FileSystem`] is a pool of `N` inode slots and `N` data block
//! slots held in memory, addressed by plain integer index, with a
//! POSIX-flavored hierarchical namespace layered on top (directories and
//! regular files rooted at `/`). The whole pool serializes to and loads
//! from a single binary image file; nothing is persisted automatically,
//! so [`fs::FileSystem::dump`] is the only way changes reach disk.
//!
//! ```no_run
//! use imagefs::FileSystem;
//!
//! let mut fs = FileSystem::create("/tmp/example.img", 64).unwrap();
//! fs.mkdir("/docs").unwrap();
//! fs.mkfile("/docs/readme.txt").unwrap();
//! fs.writef("/docs/readme.txt", b"hello").unwrap();
//! fs.dump("/tmp/example.img").unwrap();
//! ```

pub mod arena;
pub mod codec;
pub mod error;
pub mod fs;
pub mod resolver;
pub mod types;

pub use error::{FsError, Result};
pub use fs::FileSystem;
pub use types::{NType, BLOCK_SIZE, DIRECT_BLOCKS, NAME_MAX};
