//! Core types shared by the driftline crates.
//!
//! Holds the plain values the renderer is configured with: line orientation,
//! the immutable [`RendererConfig`], CSS color parsing into [`Rgb`], and the
//! rule that spreads up to four declared colors over the fixed set of lines.

mod color;
mod renderer_config;
mod spread;

pub use color::{DEFAULT_LINE_COLOR, ParseColorError, Rgb};
pub use renderer_config::{MAX_DECLARED_COLORS, Orientation, RendererConfig};
pub use spread::{LINE_COUNT, spread_colors};
