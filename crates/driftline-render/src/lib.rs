//! Animated noise line rendering.
//!
//! A [`NoiseLineRenderer`] owns a [`Surface`] sized to a host [`Container`]
//! and repaints six wavy lines each frame from seeded simplex noise. The
//! [`FrameLoop`] drives it until its [`StopSignal`] is raised, and
//! [`render_surface`] shows the result in a terminal.

mod container;
mod frame_loop;
mod gradient;
mod line;
mod noise;
mod present;
mod renderer;
mod surface;

pub use container::{Container, LogicalSize};
pub use frame_loop::{DEFAULT_FPS, FrameLoop, FrameTick, StopSignal};
pub use gradient::{FADE_STOPS, fade_gradient};
pub use line::{LINE_RESOLUTION, LineSpec, attenuation};
pub use noise::Simplex2;
pub use present::{render_surface, surface_lines};
pub use renderer::{NoiseLineRenderer, resolve_colors};
pub use surface::{MAX_SURFACE_PIXELS, MIN_SCALE_FACTOR, Mirror, Rgba, Surface};
