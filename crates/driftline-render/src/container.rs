//! Host container capabilities consumed by the renderer.

/// Size in logical (layout) units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The element a renderer is attached to.
pub trait Container {
    /// Current content box size.
    fn content_size(&self) -> LogicalSize;

    /// Device pixel ratio of the display.
    ///
    /// `None` means the host cannot provide a drawing surface.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Resolved visual opacity.
    fn opacity(&self) -> f64 {
        1.0
    }
}
