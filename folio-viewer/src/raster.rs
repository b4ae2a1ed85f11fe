//! Rendered frames and the pixel operations that produce them.

use crate::transform::{Rect, Transform};
use anyhow::{bail, Result};
use image::{imageops, Rgba, RgbaImage};

/// Default upper bound on either edge of a raster, in pixels.
pub const MAX_RASTER_EDGE: u32 = 16_384;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xee, 0xee, 0xee, 0xff]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// One rasterized page, 8-bit RGBA, row-major, `width * 4` bytes per row.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for RenderedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl RenderedFrame {
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }

    /// A blank page covering `page_size` (in points) after `transform`,
    /// shrunk uniformly when its longest edge would exceed `max_edge`.
    pub fn placeholder(page_size: (f32, f32), transform: &Transform, max_edge: u32) -> Self {
        let bounds = transform.transform_rect(&Rect::from_size(page_size.0, page_size.1));
        let (w, h) = (bounds.width(), bounds.height());
        let longest = w.max(h);
        let fit = if longest > max_edge as f32 {
            max_edge as f32 / longest
        } else {
            1.0
        };
        let (width, height) = pixel_size(w * fit, h * fit);
        let (width, height) = (width.min(max_edge), height.min(max_edge));
        Self::from_image(RgbaImage::from_pixel(width, height, PLACEHOLDER_FILL))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels)
    }
}

/// Whole-pixel size for a device-space extent. Never smaller than 1x1.
pub fn pixel_size(width: f32, height: f32) -> (u32, u32) {
    let clamp = |v: f32| if v.is_finite() { v.round().max(1.0) as u32 } else { 1 };
    (clamp(width), clamp(height))
}

/// [`pixel_size`] for an extent that is about to be allocated.
///
/// Fails instead of rounding when the extent is not finite or either edge
/// is longer than `max_edge`.
pub fn checked_pixel_size(width: f32, height: f32, max_edge: u32) -> Result<(u32, u32)> {
    let limit = max_edge as f32;
    if !(width.is_finite() && height.is_finite()) || width.round() > limit || height.round() > limit
    {
        bail!("raster of {width:.0}x{height:.0} pixels exceeds the {max_edge} pixel limit");
    }
    Ok(pixel_size(width, height))
}

/// Apply the rotation-only part of a render transform to a scaled raster.
///
/// Quarter turns permute pixels exactly. Other angles are resampled by
/// nearest neighbour into the rotated bounds; uncovered pixels stay
/// transparent.
pub fn apply_rotation(image: &RgbaImage, rotation: &Transform) -> RgbaImage {
    if rotation.is_quarter_turn() {
        match (rotation.a.signum_or_zero(), rotation.b.signum_or_zero()) {
            (1, 0) if rotation.d > 0.0 => return image.clone(),
            (0, 1) if rotation.c < 0.0 => return imageops::rotate90(image),
            (-1, 0) if rotation.d < 0.0 => return imageops::rotate180(image),
            (0, -1) if rotation.c > 0.0 => return imageops::rotate270(image),
            _ => {}
        }
    }

    let Some(inverse) = rotation.invert() else {
        return image.clone();
    };
    let (src_w, src_h) = (image.width() as f32, image.height() as f32);
    let bounds = rotation.transform_rect(&Rect::from_size(src_w, src_h));
    let (out_w, out_h) = pixel_size(bounds.width(), bounds.height());

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        let (sx, sy) = inverse.transform_point(
            bounds.x0 + x as f32 + 0.5,
            bounds.y0 + y as f32 + 0.5,
        );
        if sx >= 0.0 && sy >= 0.0 && sx < src_w && sy < src_h {
            *image.get_pixel(sx as u32, sy as u32)
        } else {
            TRANSPARENT
        }
    })
}

trait SignumOrZero {
    fn signum_or_zero(self) -> i8;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> i8 {
        if self > 0.0 {
            1
        } else if self < 0.0 {
            -1
        } else {
            0
        }
    }
}
