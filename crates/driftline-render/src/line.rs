//! Per-line animation state and the wave offset math.

use std::f64::consts::PI;

use driftline_core::Rgb;
use rand::Rng;

use crate::noise::Simplex2;

/// Distance between sampled points along a line, in surface pixels.
pub const LINE_RESOLUTION: f64 = 3.0;

/// Base frequency before the coefficient and scale factor apply.
const BASE_FREQUENCY: f64 = 0.01;
/// Upper bound of the per-line frequency jitter.
const FREQUENCY_JITTER: f64 = 0.001;
/// Upper bound of the per-line noise phase offset.
const PHASE_RANGE: f64 = 1000.0;
/// Time advance per second of frame delta, before the speed terms.
const TIME_RATE: f64 = 0.05;
/// Upper bound of the per-frame speed jitter.
const SPEED_JITTER: f64 = 0.5;

/// State of one animated line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    /// Stroke color.
    pub color: Rgb,
    /// Maximum lateral displacement in surface pixels.
    pub amplitude: f64,
    /// Spatial frequency of the noise walk.
    pub frequency: f64,
    /// Offset into the noise field, fixed per line.
    pub phase_offset: f64,
    /// Elapsed animation time; grows only while visible.
    pub time: f64,
}

impl LineSpec {
    /// Create a line with its jitter drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(color: Rgb, frequency: f64, scale: f64, rng: &mut R) -> Self {
        Self {
            color,
            amplitude: 1.0,
            frequency: BASE_FREQUENCY * frequency / scale
                + rng.random_range(0.0..FREQUENCY_JITTER),
            phase_offset: rng.random_range(0.0..PHASE_RANGE),
            time: 0.0,
        }
    }

    /// Lateral position of the line at `v` along its axis.
    ///
    /// Anchored at `base`, the wave only reaches toward zero since the noise
    /// is shifted down by one.
    pub fn offset_at(
        &self,
        noise: &Simplex2,
        v: f64,
        extent: f64,
        base: f64,
        attenuation_power: f64,
    ) -> f64 {
        let value = noise.sample(v * self.frequency + self.phase_offset, self.time) - 1.0;
        base + value * self.amplitude * attenuation(v, extent, attenuation_power)
    }

    /// Advance the animation clock by one frame.
    pub fn advance<R: Rng + ?Sized>(&mut self, delta_secs: f64, speed: f64, rng: &mut R) {
        self.time += delta_secs * TIME_RATE * (speed + rng.random_range(0.0..SPEED_JITTER));
    }
}

/// Sine taper that reaches zero at both ends of `[0, extent]`.
pub fn attenuation(v: f64, extent: f64, power: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    (v / extent * PI).sin().max(0.0).powf(power)
}
