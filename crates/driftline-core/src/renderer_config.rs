//! Immutable renderer configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of declared line colors.
pub const MAX_DECLARED_COLORS: usize = 4;

/// Direction the lines run in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Lines run left to right, anchored to the bottom edge.
    #[default]
    Horizontal,
    /// Lines run top to bottom, anchored to the right edge.
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }
}

/// Settings fixed for the lifetime of a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub orientation: Orientation,
    /// Amplitude strength; the wave may span this fraction of half the surface.
    pub amplitude: f64,
    /// Spatial frequency coefficient.
    pub frequency: f64,
    /// Exponent of the sine taper applied toward the line ends.
    pub attenuation: f64,
    /// Animation speed coefficient.
    pub speed: f64,
    /// Mirror the surface across the axis the lines run along.
    pub flip: bool,
    /// Also require the container's computed opacity to be above zero.
    pub track_opacity: bool,
    /// Up to [`MAX_DECLARED_COLORS`] CSS color strings.
    pub colors: Vec<String>,
    /// Seed for noise and line jitter; random when `None`.
    pub seed: Option<u64>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            amplitude: 1.0,
            frequency: 1.0,
            attenuation: 2.0,
            speed: 1.0,
            flip: false,
            track_opacity: false,
            colors: Vec::new(),
            seed: None,
        }
    }
}
