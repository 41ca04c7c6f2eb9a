//! # Block Module
//!
//! The block value primitives see through the render state, and the static
//! table deciding which block ids let light (and the camera) through.

use phf::phf_set;

/// The underlying integer type used to represent block ids.
pub type BlockId = u16;

/// Block ids that do not hide what is behind them.
///
/// Anything not listed here is treated as a full opaque cube when primitives
/// reason about occlusion.
pub static TRANSPARENT_BLOCKS: phf::Set<BlockId> = phf_set! {
    0u16,   // air
    6u16,   // sapling
    8u16,   // flowing water
    9u16,   // water
    18u16,  // leaves
    20u16,  // glass
    31u16,  // tall grass
    37u16,  // dandelion
    38u16,  // rose
    50u16,  // torch
    65u16,  // ladder
    78u16,  // snow layer
    79u16,  // ice
    85u16,  // fence
    102u16, // glass pane
};

/// A single voxel as seen by render primitives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Block id.
    pub id: BlockId,
    /// Per-block data value (orientation, variant, ...).
    pub data: u8,
}

impl Block {
    /// The empty block.
    pub const AIR: Block = Block { id: 0, data: 0 };

    /// Creates a block with the given id and data value.
    pub const fn new(id: BlockId, data: u8) -> Self {
        Self { id, data }
    }

    /// Returns `true` if this block fully hides the blocks behind it.
    pub fn is_opaque(&self) -> bool {
        !TRANSPARENT_BLOCKS.contains(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_and_glass_are_transparent() {
        assert!(!Block::AIR.is_opaque());
        assert!(!Block::new(20, 0).is_opaque());
        assert!(Block::new(1, 0).is_opaque());
    }
}
