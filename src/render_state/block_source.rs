//! # Block Source Module
//!
//! The seam between render primitives and world data. Loading chunks from disk
//! happens elsewhere; primitives only ever ask "what block is at this position".

use std::collections::HashMap;

use cgmath::Point3;

use super::block::Block;

/// Read access to the blocks around the voxel being rendered.
pub trait BlockSource {
    /// Returns the block at `position`, or `None` when that position is not loaded.
    fn block_at(&self, position: Point3<i32>) -> Option<Block>;

    /// Returns `true` if a loaded, opaque block sits at `position`.
    ///
    /// Unloaded positions count as transparent.
    fn is_opaque(&self, position: Point3<i32>) -> bool {
        self.block_at(position).is_some_and(|block| block.is_opaque())
    }
}

/// A sparse in-memory block store.
///
/// Only positions that were explicitly set are stored; everything else reads
/// as unloaded.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_rendermodes::render_state::{Block, BlockMap, BlockSource};
///
/// let mut blocks = BlockMap::new();
/// blocks.set_block_at(Point3::new(0, 0, 0), Block::new(1, 0));
/// assert!(blocks.is_opaque(Point3::new(0, 0, 0)));
/// assert!(!blocks.is_opaque(Point3::new(0, 1, 0)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct BlockMap {
    blocks: HashMap<Point3<i32>, Block>,
}

impl BlockMap {
    /// Creates a new, empty block map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `block` at `position`, replacing whatever was there.
    pub fn set_block_at(&mut self, position: Point3<i32>, block: Block) {
        self.blocks.insert(position, block);
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no block has been stored.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockSource for BlockMap {
    fn block_at(&self, position: Point3<i32>) -> Option<Block> {
        self.blocks.get(&position).copied()
    }
}
