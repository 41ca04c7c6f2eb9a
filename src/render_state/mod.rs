//! # Render State
//!
//! The mutable context shared by every primitive of a render mode while a tile
//! is drawn. The per-voxel loop owns it (through an
//! [`StResource`](crate::core::StResource)), moves it from block to block, and
//! the render mode passes it by reference to every primitive hook.
//!
//! ## Data Flow
//!
//! 1. The tile loop creates a `RenderState` around a [`BlockSource`]
//! 2. For each voxel it updates `block_position`, `block` and `image_offset`
//! 3. It asks the render mode whether the voxel is occluded or hidden
//! 4. If not, it asks the render mode to draw the block sprite

use cgmath::Point3;

pub mod block;
pub mod block_source;

pub use block::{Block, BlockId};
pub use block_source::{BlockMap, BlockSource};

/// Shared render context handed to every primitive hook.
pub struct RenderState {
    /// Position of the current voxel, in world block coordinates.
    pub block_position: Point3<i32>,
    /// The current voxel.
    pub block: Block,
    /// Where the top-left corner of the current block sprite lands in the tile image.
    pub image_offset: (i64, i64),
    /// World data around the current voxel.
    pub world: Box<dyn BlockSource>,
}

impl RenderState {
    /// Creates a render state positioned at the origin, reading blocks from `world`.
    pub fn new(world: impl BlockSource + 'static) -> Self {
        Self {
            block_position: Point3::new(0, 0, 0),
            block: Block::AIR,
            image_offset: (0, 0),
            world: Box::new(world),
        }
    }

    /// Moves the state to a new voxel.
    pub fn move_to(&mut self, position: Point3<i32>, block: Block, image_offset: (i64, i64)) {
        self.block_position = position;
        self.block = block;
        self.image_offset = image_offset;
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(BlockMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_replaces_the_current_voxel() {
        let mut state = RenderState::default();
        let torch_on_wall = Block::new(50, 3);

        state.move_to(Point3::new(4, 70, -2), torch_on_wall, (-12, 36));

        assert_eq!(state.block_position, Point3::new(4, 70, -2));
        assert_eq!(state.block.id, 50);
        assert_eq!(state.block.data, 3);
        assert_eq!(state.image_offset, (-12, 36));

        state.move_to(Point3::new(5, 70, -2), Block::AIR, (0, 0));
        assert_eq!(state.block, Block::AIR);
        assert_eq!(state.block.data, 0);
    }
}
