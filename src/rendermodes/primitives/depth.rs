//! Hides every voxel outside a vertical slice of the world.

use cgmath::Point3;

use crate::render_state::RenderState;
use crate::rendermodes::{Hooks, PrimitiveDescriptor, PrimitiveKind, RenderModeError, RenderPrimitive};

/// `depth`: hidden when the block's y lies outside `[min, max]`.
///
/// Options: `min` and `max`, both integers, default to the full range.
pub static DEPTH: PrimitiveKind =
    PrimitiveKind::of::<Depth>("depth", Hooks::START.union(Hooks::HIDDEN));

/// State of a `depth` primitive.
#[derive(Debug)]
pub struct Depth {
    min: i32,
    max: i32,
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }
}

impl RenderPrimitive for Depth {
    fn start(
        &mut self,
        _state: &mut RenderState,
        descriptor: &PrimitiveDescriptor,
    ) -> Result<(), RenderModeError> {
        if let Some(min) = descriptor.option::<i32>("min")? {
            self.min = min;
        }
        if let Some(max) = descriptor.option::<i32>("max")? {
            self.max = max;
        }
        if self.min > self.max {
            return Err(RenderModeError::construction(
                DEPTH.name,
                format!("min ({}) is above max ({})", self.min, self.max),
            ));
        }
        Ok(())
    }

    fn hidden(&self, _state: &RenderState, position: Point3<i32>) -> bool {
        position.y < self.min || position.y > self.max
    }
}
