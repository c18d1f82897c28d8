//! The terminal window as a renderer container.

use driftline_render::{Container, LogicalSize};
use ratatui::layout::Rect;

/// Terminal drawing area seen as a container.
///
/// One cell is one logical pixel wide and two logical pixels tall.
#[derive(Debug, Clone)]
pub struct TerminalContainer {
    area: Rect,
    pixel_ratio: f64,
    opacity: f64,
}

impl TerminalContainer {
    pub fn new(area: Rect, pixel_ratio: f64) -> Self {
        Self {
            area,
            pixel_ratio,
            opacity: 1.0,
        }
    }

    /// Update the area, returning whether its size changed.
    pub fn set_area(&mut self, area: Rect) -> bool {
        let resized = area.width != self.area.width || area.height != self.area.height;
        self.area = area;
        resized
    }

    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Toggle between fully opaque and fully faded.
    pub fn toggle_fade(&mut self) {
        self.opacity = if self.is_faded() { 1.0 } else { 0.0 };
    }
}

impl Container for TerminalContainer {
    fn content_size(&self) -> LogicalSize {
        LogicalSize::new(self.area.width as f64, self.area.height as f64 * 2.0)
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.pixel_ratio)
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }
}
