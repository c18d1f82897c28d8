//! The animated noise line renderer.

use driftline_core::{
    DEFAULT_LINE_COLOR, LINE_COUNT, MAX_DECLARED_COLORS, RendererConfig, Rgb, spread_colors,
};
use rand::{SeedableRng, rngs::StdRng};
use tiny_skia::{Paint, Path, PathBuilder, Stroke};
use tracing::{debug, warn};

use crate::container::Container;
use crate::gradient::fade_gradient;
use crate::line::{LINE_RESOLUTION, LineSpec};
use crate::noise::Simplex2;
use crate::surface::{Mirror, Surface};

/// Stroke width in logical units; multiplied by the scale factor.
const LINE_WIDTH: f64 = 1.5;

/// Draws six noise-driven lines onto a surface sized to its container.
///
/// The renderer is driven from a single thread: the host calls
/// [`observe_resize`](Self::observe_resize) and
/// [`observe_intersection`](Self::observe_intersection) as signals arrive and
/// [`frame`](Self::frame) once per display refresh.
#[derive(Debug)]
pub struct NoiseLineRenderer {
    config: RendererConfig,
    surface: Surface,
    lines: Vec<LineSpec>,
    noise: Simplex2,
    /// Source for the per-frame speed jitter.
    frame_rng: StdRng,
    intersecting: bool,
    opaque: bool,
    last_time_ms: f64,
}

impl NoiseLineRenderer {
    /// Attach a renderer to `container`.
    ///
    /// Sizes the surface, creates the lines and applies the initial resize
    /// observation so amplitudes are set before the first frame.
    pub fn new<C: Container + ?Sized>(container: &C, config: RendererConfig) -> Self {
        let (mut setup_rng, frame_rng) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        };

        let mut surface = Surface::new();
        if let Some(ratio) = container.device_pixel_ratio() {
            surface.scale_to(container.content_size(), ratio);
        }

        let noise = Simplex2::new(&mut setup_rng);
        let colors = resolve_colors(&config.colors);
        let lines = spread_colors(&colors, LINE_COUNT)
            .into_iter()
            .map(|color| LineSpec::new(color, config.frequency, surface.scale(), &mut setup_rng))
            .collect();

        let mut renderer = Self {
            config,
            surface,
            lines,
            noise,
            frame_rng,
            intersecting: false,
            opaque: true,
            last_time_ms: 0.0,
        };

        renderer.observe_resize(container);

        if renderer.config.flip {
            let mirror = if renderer.config.orientation.is_vertical() {
                Mirror::FlipX
            } else {
                Mirror::FlipY
            };
            renderer.surface.set_mirror(Some(mirror));
        }

        if renderer.config.track_opacity {
            renderer.opaque = container.opacity() > 0.0;
        }

        debug!(
            width = renderer.surface.width(),
            height = renderer.surface.height(),
            scale = renderer.surface.scale(),
            orientation = ?renderer.config.orientation,
            mirror = ?renderer.surface.mirror(),
            "noise line renderer attached"
        );
        renderer
    }

    /// Handle a container size change.
    ///
    /// Without a drawing surface capability this does nothing.
    pub fn observe_resize<C: Container + ?Sized>(&mut self, container: &C) {
        let Some(ratio) = container.device_pixel_ratio() else {
            return;
        };
        self.surface.scale_to(container.content_size(), ratio);

        let cross_axis = if self.config.orientation.is_vertical() {
            self.surface.width()
        } else {
            self.surface.height()
        };
        let amplitude = 0.5 * self.config.amplitude * cross_axis as f64;
        for line in &mut self.lines {
            line.amplitude = amplitude;
        }

        let logical = self.surface.logical_size();
        debug!(
            logical_width = logical.width,
            logical_height = logical.height,
            width = self.surface.width(),
            height = self.surface.height(),
            amplitude,
            "surface resized"
        );
    }

    /// Record whether the container intersects the viewport.
    pub fn observe_intersection(&mut self, intersecting: bool) {
        self.intersecting = intersecting;
    }

    /// Whether the next frame would paint, given the last known signals.
    pub fn is_visible(&self) -> bool {
        self.opaque && self.intersecting
    }

    /// Run one display frame at `now_ms`.
    ///
    /// Returns `true` when the surface was repainted. While hidden nothing
    /// is drawn and no line time advances; the first visible frame then sees
    /// the whole hidden interval as its delta.
    pub fn frame<C: Container + ?Sized>(&mut self, now_ms: f64, container: &C) -> bool {
        if self.config.track_opacity {
            self.opaque = container.opacity() > 0.0;
        }
        if !self.is_visible() {
            return false;
        }

        let delta_secs = (now_ms - self.last_time_ms) / 1000.0;
        self.last_time_ms = now_ms;
        self.surface.clear();

        let Self {
            config,
            surface,
            lines,
            noise,
            frame_rng,
            ..
        } = self;

        let vertical = config.orientation.is_vertical();
        let width = surface.width() as f64;
        let height = surface.height() as f64;
        let (extent, base) = if vertical {
            (height, width)
        } else {
            (width, height)
        };
        let stroke = Stroke {
            width: (LINE_WIDTH * surface.scale()) as f32,
            ..Stroke::default()
        };
        let transform = surface.transform();
        let mut points = Vec::with_capacity((extent / LINE_RESOLUTION) as usize + 2);

        for line in lines.iter_mut() {
            let gradient = if vertical {
                fade_gradient((0.0, 0.0), (0.0, height), line.color)
            } else {
                fade_gradient((0.0, 0.0), (width, 0.0), line.color)
            };

            points.clear();
            points.push(if vertical { (width, 0.0) } else { (0.0, height) });
            let mut v = 0.0;
            while v < extent {
                let offset = line.offset_at(noise, v, extent, base, config.attenuation);
                points.push(if vertical { (offset, v) } else { (v, offset) });
                v += LINE_RESOLUTION;
            }

            if let (Some(pixmap), Some(shader), Some(path)) =
                (surface.pixmap_mut(), gradient, polyline_path(&points))
            {
                let paint = Paint {
                    shader,
                    anti_alias: true,
                    ..Paint::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
            line.advance(delta_secs, config.speed, frame_rng);
        }

        true
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn lines(&self) -> &[LineSpec] {
        &self.lines
    }
}

/// Connect `points` into an open path.
///
/// `None` with fewer than two points or any non-finite coordinate.
fn polyline_path(points: &[(f64, f64)]) -> Option<Path> {
    if points.iter().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return None;
    }
    let (&(x0, y0), rest) = points.split_first()?;
    let mut builder = PathBuilder::with_capacity(points.len(), points.len());
    builder.move_to(x0 as f32, y0 as f32);
    for &(x, y) in rest {
        builder.line_to(x as f32, y as f32);
    }
    builder.finish()
}

/// Parse declared colors, dropping unrecognized ones.
///
/// Falls back to [`DEFAULT_LINE_COLOR`] when nothing resolves.
pub fn resolve_colors(declared: &[String]) -> Vec<Rgb> {
    if declared.len() > MAX_DECLARED_COLORS {
        warn!(
            count = declared.len(),
            "more than {MAX_DECLARED_COLORS} colors declared, extra colors ignored"
        );
    }

    let mut colors: Vec<Rgb> = declared
        .iter()
        .take(MAX_DECLARED_COLORS)
        .filter(|raw| !raw.trim().is_empty())
        .filter_map(|raw| match Rgb::parse(raw) {
            Ok(color) => Some(color),
            Err(err) => {
                warn!(%err, "ignoring line color");
                None
            }
        })
        .collect();

    if colors.is_empty() {
        colors.push(DEFAULT_LINE_COLOR);
    }
    colors
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use driftline_core::Orientation;

    use super::*;
    use crate::container::LogicalSize;

    struct TestContainer {
        size: Cell<LogicalSize>,
        ratio: Option<f64>,
        opacity: Cell<f64>,
    }

    impl TestContainer {
        fn new(width: f64, height: f64, ratio: f64) -> Self {
            Self {
                size: Cell::new(LogicalSize::new(width, height)),
                ratio: Some(ratio),
                opacity: Cell::new(1.0),
            }
        }
    }

    impl Container for TestContainer {
        fn content_size(&self) -> LogicalSize {
            self.size.get()
        }

        fn device_pixel_ratio(&self) -> Option<f64> {
            self.ratio
        }

        fn opacity(&self) -> f64 {
            self.opacity.get()
        }
    }

    fn seeded(config: RendererConfig) -> RendererConfig {
        RendererConfig {
            seed: Some(1234),
            ..config
        }
    }

    /// Painted pixels as `(x, y, alpha)`.
    fn painted(surface: &Surface) -> Vec<(u32, u32, f32)> {
        let mut pixels = Vec::new();
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                let alpha = surface.pixel(x, y)[3];
                if alpha > 0.0 {
                    pixels.push((x, y, alpha));
                }
            }
        }
        pixels
    }

    fn painted_pixels(surface: &Surface) -> usize {
        painted(surface).len()
    }

    fn max_alpha(surface: &Surface, mut keep: impl FnMut(u32, u32) -> bool) -> f32 {
        painted(surface)
            .into_iter()
            .filter(|&(x, y, _)| keep(x, y))
            .map(|(_, _, alpha)| alpha)
            .fold(0.0, f32::max)
    }

    fn row_sums(surface: &Surface) -> Vec<f32> {
        (0..surface.height())
            .map(|y| (0..surface.width()).map(|x| surface.pixel(x, y)[3]).sum())
            .collect()
    }

    fn painted_frame(container: &TestContainer, config: RendererConfig) -> NoiseLineRenderer {
        let mut renderer = NoiseLineRenderer::new(container, seeded(config));
        renderer.observe_intersection(true);
        assert!(renderer.frame(16.0, container));
        renderer
    }

    #[test]
    fn test_end_to_end_sizing() {
        let container = TestContainer::new(400.0, 200.0, 2.0);
        let renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));

        assert_eq!(renderer.surface().width(), 800);
        assert_eq!(renderer.surface().height(), 400);
        assert_eq!(renderer.lines().len(), LINE_COUNT);
        assert!(renderer.lines().iter().all(|line| line.amplitude == 200.0));
    }

    #[test]
    fn test_vertical_amplitude_uses_width() {
        let container = TestContainer::new(100.0, 50.0, 1.0);
        let config = RendererConfig {
            orientation: Orientation::Vertical,
            amplitude: 0.5,
            ..RendererConfig::default()
        };
        let renderer = NoiseLineRenderer::new(&container, seeded(config));
        // 100 * 1.5 physical width, halved, times 0.5 strength
        assert!(renderer.lines().iter().all(|line| line.amplitude == 37.5));
    }

    #[test]
    fn test_resize_overwrites_amplitude_only() {
        let container = TestContainer::new(400.0, 200.0, 2.0);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        let before: Vec<(f64, f64)> = renderer
            .lines()
            .iter()
            .map(|line| (line.frequency, line.phase_offset))
            .collect();

        container.size.set(LogicalSize::new(300.0, 120.0));
        renderer.observe_resize(&container);

        assert_eq!((renderer.surface().width(), renderer.surface().height()), (600, 240));
        assert!(renderer.lines().iter().all(|line| line.amplitude == 120.0));
        let after: Vec<(f64, f64)> = renderer
            .lines()
            .iter()
            .map(|line| (line.frequency, line.phase_offset))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_surface_capability_is_silent() {
        let container = TestContainer {
            ratio: None,
            ..TestContainer::new(100.0, 100.0, 1.0)
        };
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        assert_eq!(renderer.surface().width(), 0);
        assert!(renderer.lines().iter().all(|line| line.amplitude == 1.0));

        renderer.observe_resize(&container);
        renderer.observe_intersection(true);
        assert!(renderer.frame(16.0, &container));
        assert_eq!(renderer.surface().width(), 0);
    }

    #[test]
    fn test_hidden_frames_freeze_time() {
        let container = TestContainer::new(80.0, 40.0, 1.0);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));

        for k in 0..50 {
            assert!(!renderer.frame(k as f64 * 16.0, &container));
        }
        assert!(renderer.lines().iter().all(|line| line.time == 0.0));
        assert_eq!(painted_pixels(renderer.surface()), 0);
    }

    #[test]
    fn test_visible_frames_paint_and_advance() {
        let container = TestContainer::new(80.0, 40.0, 1.0);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        renderer.observe_intersection(true);

        assert!(renderer.frame(1000.0, &container));
        assert!(painted_pixels(renderer.surface()) > 0);
        // One second at speed 1: 0.05 * [1.0, 1.5)
        for line in renderer.lines() {
            assert!(line.time >= 0.05 - 1e-12 && line.time < 0.075);
        }
    }

    #[test]
    fn test_resume_includes_hidden_interval() {
        let container = TestContainer::new(80.0, 40.0, 1.0);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        renderer.observe_intersection(true);
        renderer.frame(0.0, &container);
        let start: Vec<f64> = renderer.lines().iter().map(|line| line.time).collect();

        renderer.observe_intersection(false);
        for k in 1..100 {
            renderer.frame(k as f64 * 100.0, &container);
        }
        let frozen: Vec<f64> = renderer.lines().iter().map(|line| line.time).collect();
        assert_eq!(start, frozen);

        renderer.observe_intersection(true);
        renderer.frame(10_000.0, &container);
        for (line, before) in renderer.lines().iter().zip(frozen) {
            // Ten seconds of delta in one step
            assert!(line.time - before >= 0.5 - 1e-9);
        }
    }

    #[test]
    fn test_opacity_tracking_gates_painting() {
        let container = TestContainer::new(80.0, 40.0, 1.0);
        let config = RendererConfig {
            track_opacity: true,
            ..RendererConfig::default()
        };
        let mut renderer = NoiseLineRenderer::new(&container, seeded(config));
        renderer.observe_intersection(true);
        assert!(renderer.frame(16.0, &container));

        container.opacity.set(0.0);
        assert!(!renderer.frame(32.0, &container));
        assert!(!renderer.is_visible());

        container.opacity.set(0.4);
        assert!(renderer.frame(48.0, &container));

        renderer.observe_intersection(false);
        assert!(!renderer.frame(64.0, &container));
    }

    #[test]
    fn test_opacity_ignored_without_tracking() {
        let container = TestContainer::new(80.0, 40.0, 1.0);
        container.opacity.set(0.0);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        renderer.observe_intersection(true);
        assert!(renderer.frame(16.0, &container));
    }

    #[test]
    fn test_mirror_follows_orientation() {
        let container = TestContainer::new(20.0, 20.0, 1.0);
        let horizontal = NoiseLineRenderer::new(
            &container,
            seeded(RendererConfig {
                flip: true,
                ..RendererConfig::default()
            }),
        );
        assert_eq!(horizontal.surface().mirror(), Some(Mirror::FlipY));

        let vertical = NoiseLineRenderer::new(
            &container,
            seeded(RendererConfig {
                flip: true,
                orientation: Orientation::Vertical,
                ..RendererConfig::default()
            }),
        );
        assert_eq!(vertical.surface().mirror(), Some(Mirror::FlipX));

        let plain = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        assert_eq!(plain.surface().mirror(), None);
    }

    #[test]
    fn test_line_colors_are_spread() {
        let container = TestContainer::new(20.0, 20.0, 1.0);
        let config = RendererConfig {
            colors: vec!["red".into(), "#00ff00".into(), "blue".into(), "white".into()],
            ..RendererConfig::default()
        };
        let renderer = NoiseLineRenderer::new(&container, seeded(config));
        let colors: Vec<Rgb> = renderer.lines().iter().map(|line| line.color).collect();
        let (r, g, b, w) = (
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 255),
        );
        assert_eq!(colors, vec![r, r, g, g, b, w]);
    }

    #[test]
    fn test_resolve_colors_fallbacks() {
        assert_eq!(resolve_colors(&[]), vec![DEFAULT_LINE_COLOR]);
        assert_eq!(
            resolve_colors(&["nope".into(), " ".into()]),
            vec![DEFAULT_LINE_COLOR]
        );
        assert_eq!(
            resolve_colors(&["nope".into(), "black".into()]),
            vec![Rgb::new(0, 0, 0)]
        );
        let five: Vec<String> = ["red", "red", "red", "red", "blue"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(resolve_colors(&five).len(), 4);
    }

    #[test]
    fn test_same_seed_same_animation() {
        let container = TestContainer::new(60.0, 30.0, 1.0);
        let mut a = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        let mut b = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        a.observe_intersection(true);
        b.observe_intersection(true);
        for k in 1..5 {
            a.frame(k as f64 * 16.0, &container);
            b.frame(k as f64 * 16.0, &container);
        }
        assert_eq!(a.lines(), b.lines());
    }

    #[test]
    fn test_vertical_lines_stay_right() {
        let container = TestContainer::new(80.0, 60.0, 1.0);
        let config = RendererConfig {
            orientation: Orientation::Vertical,
            amplitude: 0.5,
            ..RendererConfig::default()
        };
        let renderer = painted_frame(&container, config);
        let surface = renderer.surface();
        let pixels = painted(surface);
        assert!(!pixels.is_empty());

        // Quarter-width amplitude reaching left from x = width
        let half = surface.width() / 2;
        assert!(pixels.iter().all(|&(x, _, _)| x + 3 >= half));
        // Lines run the full height
        assert!(pixels.iter().any(|&(_, y, _)| y < surface.height() / 4));
        assert!(pixels.iter().any(|&(_, y, _)| y > surface.height() * 3 / 4));
    }

    #[test]
    fn test_horizontal_lines_stay_low() {
        let container = TestContainer::new(80.0, 60.0, 1.0);
        let config = RendererConfig {
            amplitude: 0.5,
            ..RendererConfig::default()
        };
        let renderer = painted_frame(&container, config);
        let surface = renderer.surface();
        let half = surface.height() / 2;
        assert!(painted(surface).iter().all(|&(_, y, _)| y + 3 >= half));
    }

    #[test]
    fn test_vertical_lines_fade_toward_top_and_bottom() {
        let container = TestContainer::new(80.0, 60.0, 1.0);
        let config = RendererConfig {
            orientation: Orientation::Vertical,
            ..RendererConfig::default()
        };
        let renderer = painted_frame(&container, config);
        let surface = renderer.surface();
        let height = surface.height();
        assert_eq!(height, 90);

        // Rows whose centers fall in the clear 5% at either end
        assert!(max_alpha(surface, |_, y| y <= 3) < 0.02);
        assert!(max_alpha(surface, |_, y| y >= height - 4) < 0.02);
        assert!(max_alpha(surface, |_, y| (40..50).contains(&y)) > 0.5);
    }

    #[test]
    fn test_horizontal_lines_fade_toward_left_and_right() {
        let container = TestContainer::new(80.0, 60.0, 1.0);
        let renderer = painted_frame(&container, RendererConfig::default());
        let surface = renderer.surface();
        let width = surface.width();
        assert_eq!(width, 120);

        assert!(max_alpha(surface, |x, _| x <= 5) < 0.02);
        assert!(max_alpha(surface, |x, _| x >= width - 6) < 0.02);
        assert!(max_alpha(surface, |x, _| (55..65).contains(&x)) > 0.5);
    }

    #[test]
    fn test_flip_mirrors_painted_pixels() {
        let container = TestContainer::new(80.0, 60.0, 1.0);
        let config = RendererConfig {
            amplitude: 0.5,
            ..RendererConfig::default()
        };
        let plain = painted_frame(&container, config.clone());
        let flipped = painted_frame(
            &container,
            RendererConfig {
                flip: true,
                ..config
            },
        );

        let height = flipped.surface().height();
        let half = height / 2;
        assert!(!painted(flipped.surface()).is_empty());
        assert!(painted(flipped.surface()).iter().all(|&(_, y, _)| y <= half + 3));

        let plain_rows = row_sums(plain.surface());
        let flipped_rows = row_sums(flipped.surface());
        for y in 0..height as usize {
            let expected = plain_rows[height as usize - 1 - y];
            let actual = flipped_rows[y];
            assert!(
                (expected - actual).abs() <= 0.1 * expected.max(actual) + 1.0,
                "row {y}: {actual} vs mirrored {expected}"
            );
        }
    }

    #[test]
    fn test_huge_pixel_ratio_does_not_allocate() {
        let container = TestContainer::new(80.0, 46.0, 1e9);
        let mut renderer = NoiseLineRenderer::new(&container, seeded(RendererConfig::default()));
        assert_eq!((renderer.surface().width(), renderer.surface().height()), (0, 0));

        renderer.observe_intersection(true);
        assert!(renderer.frame(16.0, &container));
        assert_eq!(painted_pixels(renderer.surface()), 0);
    }

    #[test]
    fn test_polyline_path() {
        assert!(polyline_path(&[]).is_none());
        assert!(polyline_path(&[(1.0, 1.0)]).is_none());
        assert!(polyline_path(&[(0.0, 0.0), (f64::NAN, 1.0)]).is_none());

        let path = polyline_path(&[(0.0, 10.0), (20.0, 10.0), (40.0, 12.0)]).unwrap();
        assert_eq!(path.len(), 3);
    }
}
