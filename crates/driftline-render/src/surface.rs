//! Pixel surface with separate logical and physical sizes.

use tiny_skia::{Color, Pixmap, Transform};
use tracing::warn;

use crate::container::LogicalSize;

/// Lowest scale factor a surface is ever bound to.
pub const MIN_SCALE_FACTOR: f64 = 1.5;

/// Largest backing store, in physical pixels, a surface will allocate.
pub const MAX_SURFACE_PIXELS: usize = 1 << 26;

/// Straight (non-premultiplied) RGBA in unit floats.
pub type Rgba = [f32; 4];

const TRANSPARENT: Rgba = [0.0; 4];

/// Static axis flip applied to everything drawn on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    /// Mirror left to right.
    FlipX,
    /// Mirror top to bottom.
    FlipY,
}

/// RGBA backing store bound to a scale factor.
///
/// The physical size is always `floor(logical * scale)`. A zero-sized or
/// oversized surface has no pixmap and ignores drawing.
#[derive(Debug, Clone)]
pub struct Surface {
    logical: LogicalSize,
    scale: f64,
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
    mirror: Option<Mirror>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create an empty surface at the minimum scale factor.
    pub fn new() -> Self {
        Self {
            logical: LogicalSize::default(),
            scale: MIN_SCALE_FACTOR,
            width: 0,
            height: 0,
            pixmap: None,
            mirror: None,
        }
    }

    /// Rebind to a logical size and device pixel ratio, reallocating the store.
    ///
    /// The ratio is floored at [`MIN_SCALE_FACTOR`]. Contents are cleared.
    /// A store above [`MAX_SURFACE_PIXELS`] is not allocated and the surface
    /// stays empty until the next rebind.
    pub fn scale_to(&mut self, logical: LogicalSize, device_pixel_ratio: f64) {
        let ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio
        } else {
            MIN_SCALE_FACTOR
        };
        self.scale = ratio.max(MIN_SCALE_FACTOR);
        self.logical = LogicalSize {
            width: logical.width.max(0.0),
            height: logical.height.max(0.0),
        };

        let width = (self.logical.width * self.scale).floor();
        let height = (self.logical.height * self.scale).floor();
        let pixels = physical_dimension(width)
            .zip(physical_dimension(height))
            .and_then(|(w, h)| (w as usize).checked_mul(h as usize).map(|n| (w, h, n)));

        match pixels {
            Some((w, h, count)) if count <= MAX_SURFACE_PIXELS => {
                self.width = w;
                self.height = h;
                self.pixmap = Pixmap::new(w, h);
            }
            _ => {
                warn!(
                    width,
                    height,
                    scale = self.scale,
                    "surface too large, leaving it empty"
                );
                self.width = 0;
                self.height = 0;
                self.pixmap = None;
            }
        }
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.logical
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Physical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Physical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mirror(&self) -> Option<Mirror> {
        self.mirror
    }

    pub fn set_mirror(&mut self, mirror: Option<Mirror>) {
        self.mirror = mirror;
    }

    /// Drawing transform with the mirror folded in.
    pub fn transform(&self) -> Transform {
        let (w, h) = (self.width as f32, self.height as f32);
        match self.mirror {
            Some(Mirror::FlipX) => Transform::from_row(-1.0, 0.0, 0.0, 1.0, w, 0.0),
            Some(Mirror::FlipY) => Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, h),
            None => Transform::identity(),
        }
    }

    /// Backing pixmap to draw on, if the surface has any pixels.
    pub fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    /// Read a physical pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let Some(color) = self.pixmap.as_ref().and_then(|pixmap| pixmap.pixel(x, y)) else {
            return TRANSPARENT;
        };
        let color = color.demultiply();
        [
            color.red() as f32 / 255.0,
            color.green() as f32 / 255.0,
            color.blue() as f32 / 255.0,
            color.alpha() as f32 / 255.0,
        ]
    }

    /// Average the physical pixels covered by logical pixel `(x, y)`.
    pub fn sample_logical(&self, x: u32, y: u32) -> Rgba {
        let Some(pixmap) = &self.pixmap else {
            return TRANSPARENT;
        };
        let (x0, x1) = physical_span(x, self.scale, self.width);
        let (y0, y1) = physical_span(y, self.scale, self.height);
        if x0 >= x1 || y0 >= y1 {
            return TRANSPARENT;
        }

        // Pixmap pixels are premultiplied, so transparent ones carry no color
        let mut acc = [0.0f32; 4];
        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(color) = pixmap.pixel(px, py) {
                    acc[0] += color.red() as f32;
                    acc[1] += color.green() as f32;
                    acc[2] += color.blue() as f32;
                    acc[3] += color.alpha() as f32;
                }
            }
        }
        if acc[3] <= 0.0 {
            return TRANSPARENT;
        }
        let count = ((x1 - x0) * (y1 - y0)) as f32;
        [
            (acc[0] / acc[3]).min(1.0),
            (acc[1] / acc[3]).min(1.0),
            (acc[2] / acc[3]).min(1.0),
            acc[3] / (count * 255.0),
        ]
    }
}

fn physical_dimension(value: f64) -> Option<u32> {
    (value <= u32::MAX as f64).then_some(value as u32)
}

/// Physical range `[start, end)` covered by one logical coordinate.
fn physical_span(logical: u32, scale: f64, limit: u32) -> (u32, u32) {
    let start = ((logical as f64 * scale).floor() as u32).min(limit);
    let end = (((logical as f64 + 1.0) * scale).floor() as u32)
        .max(start.saturating_add(1))
        .min(limit);
    (start, end)
}

/// Fill a physical rectangle with a solid color, through the surface transform.
#[cfg(test)]
pub(crate) fn fill_rect(surface: &mut Surface, x: f32, y: f32, w: f32, h: f32, rgba: [u8; 4]) {
    let transform = surface.transform();
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    let rect = tiny_skia::Rect::from_xywh(x, y, w, h).unwrap();
    if let Some(pixmap) = surface.pixmap_mut() {
        pixmap.fill_rect(rect, &paint, transform, None);
    }
}
