//! Linear alpha gradients used as stroke styles.

use driftline_core::Rgb;
use tiny_skia::{Color, GradientStop, LinearGradient, Point, Shader, SpreadMode, Transform};

/// Stops of the symmetric fade: clear ends, faint shoulders, solid middle.
pub const FADE_STOPS: [(f32, f32); 7] = [
    (0.0, 0.0),
    (0.05, 0.0),
    (0.3, 0.2),
    (0.5, 1.0),
    (0.7, 0.2),
    (0.95, 0.0),
    (1.0, 0.0),
];

/// Single-color shader fading along `start` to `end` through [`FADE_STOPS`].
///
/// `None` when the points are not finite.
pub fn fade_gradient(start: (f64, f64), end: (f64, f64), color: Rgb) -> Option<Shader<'static>> {
    let stops = FADE_STOPS
        .iter()
        .map(|&(offset, alpha)| {
            let mut stop_color = Color::from_rgba8(color.r, color.g, color.b, 255);
            stop_color.set_alpha(alpha);
            GradientStop::new(offset, stop_color)
        })
        .collect();

    LinearGradient::new(
        Point::from_xy(start.0 as f32, start.1 as f32),
        Point::from_xy(end.0 as f32, end.1 as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}
