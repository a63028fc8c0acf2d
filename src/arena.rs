//! The fixed-capacity inode table, data-block table, and the free-list that
//! tracks data-block allocation.
//!
//! Inodes and data blocks are two independent tables, each of length `N`,
//! addressed by plain integer index. An inode's own `ntype` field is the
//! single source of truth for whether that inode slot is free; the
//! free-list exists only to track data-block allocation; it is never
//! consulted when allocating or freeing an inode.

use crate::error::{FsError, Result};
use crate::types::{DataBlock, Inode, SuperBlock};

/// Owner of the inode table, data-block table, free-list and superblock
/// that back a [`crate::fs::FileSystem`].
#[derive(Debug)]
pub struct Arena {
    /// Aggregate image metadata.
    pub sb: SuperBlock,
    /// One byte per data block: `1` if free, `0` if allocated.
    pub free_list: Vec<u8>,
    /// Inode table, length `N`.
    pub inodes: Vec<Inode>,
    /// Data block table, length `N`.
    pub data_blocks: Vec<DataBlock>,
}

impl Arena {
    /// Build a fresh arena with `n` slots in each table, all free.
    pub fn new(n: u32) -> Arena {
        Arena {
            sb: SuperBlock {
                num_blocks: n,
                free_blocks: n,
            },
            free_list: vec![1; n as usize],
            inodes: (0..n).map(|_| Inode::default()).collect(),
            data_blocks: (0..n).map(|_| DataBlock::new_zero()).collect(),
        }
    }

    /// Total slot count `N`.
    pub fn capacity(&self) -> usize {
        self.inodes.len()
    }

    /// Allocate the lowest-indexed free inode slot. Leaves the inode at its
    /// default, freshly initialized state (caller fills in
    /// `ntype`/`name`/`parent`).
    pub fn alloc_inode(&mut self) -> Result<usize> {
        let i = (0..self.capacity())
            .find(|&i| self.inodes[i].is_free())
            .ok_or(FsError::NoSpace)?;
        self.inodes[i].reset();
        Ok(i)
    }

    /// Allocate the lowest-indexed free data block, per the free-list.
    pub fn alloc_data_block(&mut self) -> Result<usize> {
        let i = (0..self.capacity())
            .find(|&i| self.free_list[i] == 1)
            .ok_or(FsError::NoSpace)?;
        self.free_list[i] = 0;
        self.sb.free_blocks -= 1;
        self.data_blocks[i].reset();
        Ok(i)
    }

    /// Free the data block at index `i`: reset its contents and mark it
    /// free in the free-list.
    pub fn free_data_block(&mut self, i: usize) {
        self.data_blocks[i].reset();
        self.free_list[i] = 1;
        self.sb.free_blocks += 1;
    }

    /// Free the inode at index `i`, resetting it to a pristine free inode.
    /// Does not touch the free-list: inode freeness lives entirely in
    /// `ntype`.
    pub fn free_inode(&mut self, i: usize) {
        self.inodes[i].reset();
    }
}
