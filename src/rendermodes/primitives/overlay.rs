//! Tints the block sprite with a flat colour.

use image::{GrayImage, Pixel, Rgba, RgbaImage};

use crate::render_state::RenderState;
use crate::rendermodes::options::OptionTypeError;
use crate::rendermodes::{Hooks, PrimitiveDescriptor, PrimitiveKind, RenderModeError, RenderPrimitive};

/// `overlay`: blends `color` into the image wherever the block mask is set.
///
/// Options:
/// - `color`: 3 or 4 integers in 0..=255 (alpha defaults to opaque when omitted)
/// - `use_light_mask`: bool, draw through `mask_light` instead of `mask`
pub static OVERLAY: PrimitiveKind =
    PrimitiveKind::of::<Overlay>("overlay", Hooks::START.union(Hooks::DRAW));

const DEFAULT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 128]);

/// State of an `overlay` primitive.
#[derive(Debug)]
pub struct Overlay {
    color: Rgba<u8>,
    use_light_mask: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            use_light_mask: false,
        }
    }
}

impl RenderPrimitive for Overlay {
    fn start(
        &mut self,
        _state: &mut RenderState,
        descriptor: &PrimitiveDescriptor,
    ) -> Result<(), RenderModeError> {
        self.color = match descriptor.option::<[u8; 4]>("color") {
            Ok(Some(rgba)) => Rgba(rgba),
            Ok(None) => self.color,
            Err(err) => match descriptor.option::<[u8; 3]>("color") {
                Ok(Some([r, g, b])) => Rgba([r, g, b, u8::MAX]),
                _ => {
                    return Err(OptionTypeError {
                        expected: "3 or 4 integers in 0..=255".to_owned(),
                        ..err
                    }
                    .into())
                }
            },
        };
        if let Some(use_light_mask) = descriptor.option::<bool>("use_light_mask")? {
            self.use_light_mask = use_light_mask;
        }
        Ok(())
    }

    fn draw(
        &mut self,
        state: &mut RenderState,
        image: &mut RgbaImage,
        mask: &GrayImage,
        mask_light: &GrayImage,
    ) {
        let coverage = if self.use_light_mask { mask_light } else { mask };
        let (offset_x, offset_y) = state.image_offset;
        let (width, height) = (i64::from(image.width()), i64::from(image.height()));

        for (mask_x, mask_y, luma) in coverage.enumerate_pixels() {
            let alpha = u16::from(luma.0[0]) * u16::from(self.color.0[3]) / 255;
            if alpha == 0 {
                continue;
            }
            let (Some(x), Some(y)) = (
                offset_x.checked_add(i64::from(mask_x)),
                offset_y.checked_add(i64::from(mask_y)),
            ) else {
                continue;
            };
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }

            let mut paint = self.color;
            paint.0[3] = alpha as u8;
            image.get_pixel_mut(x as u32, y as u32).blend(&paint);
        }
    }
}
