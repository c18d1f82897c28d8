//! Color values and CSS color string parsing.

use palette::{FromColor, Hsl, Srgb, Srgba};
use thiserror::Error;

/// Color used when no declared color resolves.
pub const DEFAULT_LINE_COLOR: Rgb = Rgb::new(0x39, 0xEE, 0xD8);

/// An opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error returned when a string is not a recognized CSS color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized color `{0}`")]
pub struct ParseColorError(pub String);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any CSS color string this crate understands.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`,
    /// `hsl()`/`hsla()` and the CSS named colors. Alpha is parsed and dropped.
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let normalized = input.trim().to_ascii_lowercase();
        let err = || ParseColorError(input.to_string());

        if let Some(hex) = normalized.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }
        if let Some(args) = function_args(&normalized, &["rgba", "rgb"]) {
            return parse_rgb_args(args).ok_or_else(err);
        }
        if let Some(args) = function_args(&normalized, &["hsla", "hsl"]) {
            return parse_hsl_args(args).ok_or_else(err);
        }
        palette::named::from_str(&normalized)
            .map(Rgb::from)
            .ok_or_else(err)
    }
}

impl From<Srgb<u8>> for Rgb {
    fn from(color: Srgb<u8>) -> Self {
        let (r, g, b) = color.into_components();
        Self::new(r, g, b)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 | 6 => hex.parse::<Srgb<u8>>().ok().map(Rgb::from),
        4 | 8 => hex.parse::<Srgba<u8>>().ok().map(|rgba| Rgb::from(rgba.color)),
        _ => None,
    }
}

/// Return the argument list of `name(...)` for the first matching name.
fn function_args<'a>(input: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        input
            .strip_prefix(name)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
    })
}

/// Split CSS function arguments on commas, whitespace and the alpha slash.
fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    let parts = split_args(args);
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let channel = |part: &str| -> Option<u8> {
        let value = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 2.55,
            None => part.parse::<f32>().ok()?,
        };
        value
            .is_finite()
            .then(|| value.clamp(0.0, 255.0).round() as u8)
    };
    Some(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

fn parse_hsl_args(args: &str) -> Option<Rgb> {
    let parts = split_args(args);
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let hue: f32 = parts[0].trim_end_matches("deg").parse().ok()?;
    let percent = |part: &str| -> Option<f32> {
        let value: f32 = part.strip_suffix('%')?.parse().ok()?;
        Some((value / 100.0).clamp(0.0, 1.0))
    };
    let saturation = percent(parts[1])?;
    let lightness = percent(parts[2])?;
    if !hue.is_finite() {
        return None;
    }
    Some(hsl_to_rgb(hue.rem_euclid(360.0), saturation, lightness))
}

/// Convert HSL (hue in degrees, saturation and lightness in 0..=1) to RGB.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let hsl: Hsl = Hsl::new(h, s, l);
    Rgb::from(Srgb::from_color(hsl).into_format::<u8>())
}
