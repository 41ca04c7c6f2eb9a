//! Skips blocks that cannot be seen because every camera-facing neighbour is opaque.

use cgmath::Point3;

use crate::render_state::RenderState;
use crate::rendermodes::{Hooks, PrimitiveKind, RenderPrimitive};

/// `buried`: occluded when the +y, -x and +z neighbours are all opaque.
pub static BURIED: PrimitiveKind = PrimitiveKind::of::<Buried>("buried", Hooks::OCCLUDED);

/// Offsets of the three neighbours covering the faces the camera sees.
const CAMERA_FACING: [(i32, i32, i32); 3] = [(0, 1, 0), (-1, 0, 0), (0, 0, 1)];

/// The stateless `buried` primitive.
#[derive(Debug, Default)]
pub struct Buried;

impl RenderPrimitive for Buried {
    fn occluded(&self, state: &RenderState, position: Point3<i32>) -> bool {
        CAMERA_FACING.iter().all(|&offset| {
            neighbour(position, offset).is_some_and(|next| state.world.is_opaque(next))
        })
    }
}

/// The block at `offset` from `position`, or `None` past the edge of the coordinate space.
///
/// Nothing is loaded out there, so callers treat it like any other unloaded block.
fn neighbour(position: Point3<i32>, (dx, dy, dz): (i32, i32, i32)) -> Option<Point3<i32>> {
    Some(Point3::new(
        position.x.checked_add(dx)?,
        position.y.checked_add(dy)?,
        position.z.checked_add(dz)?,
    ))
}
