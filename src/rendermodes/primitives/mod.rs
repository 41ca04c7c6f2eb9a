//! Reference primitives registered in the built-in catalog.
//!
//! * `depth` - hides voxels outside a vertical slice
//! * `buried` - skips voxels whose camera-facing neighbours are all opaque
//! * `overlay` - tints the block sprite with a flat colour

pub mod buried;
pub mod depth;
pub mod overlay;
