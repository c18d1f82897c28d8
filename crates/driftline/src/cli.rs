//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use driftline_config::{Attributes, Config};
use driftline_core::{MAX_DECLARED_COLORS, Orientation};

/// Animated noise-driven line graph for the terminal.
#[derive(Debug, Default, Parser)]
#[command(name = "driftline", version, about)]
pub struct Cli {
    /// Draw vertical lines anchored to the right edge
    #[arg(long)]
    pub vertical: bool,

    /// Amplitude strength (fraction of half the surface)
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// Spatial frequency coefficient
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Exponent of the taper toward the line ends
    #[arg(long)]
    pub attenuation: Option<f64>,

    /// Animation speed coefficient
    #[arg(long)]
    pub speed: Option<f64>,

    /// Mirror the lines across their axis
    #[arg(long)]
    pub flip: bool,

    /// Pause drawing while the view is faded out
    #[arg(long)]
    pub track_opacity: bool,

    /// Line color (any CSS color, up to four)
    #[arg(long = "color", value_name = "COLOR")]
    pub colors: Vec<String>,

    /// Device pixel ratio reported for the terminal
    #[arg(long)]
    pub pixel_ratio: Option<f64>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for the noise field and line jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Raw renderer attribute, e.g. `--attr data-color-one=teal`
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Save the effective settings to the config file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Override config values with the flags that were given.
    ///
    /// Values the renderer cannot use fall back to their defaults.
    pub fn apply(&self, config: &mut Config) {
        if self.vertical {
            config.orientation = Orientation::Vertical;
        }
        if let Some(amplitude) = self.amplitude {
            config.amplitude = amplitude;
        }
        if let Some(frequency) = self.frequency {
            config.frequency = frequency;
        }
        if let Some(attenuation) = self.attenuation {
            config.attenuation = attenuation;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.flip {
            config.flip = true;
        }
        if self.track_opacity {
            config.track_opacity = true;
        }
        if !self.colors.is_empty() {
            config.colors = self.colors.iter().take(MAX_DECLARED_COLORS).cloned().collect();
        }
        if let Some(ratio) = self.pixel_ratio {
            config.pixel_ratio = ratio;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.sanitize();
    }

    /// Raw `--attr` values as renderer attributes.
    pub fn attributes(&self) -> Attributes {
        self.attributes.iter().cloned().collect()
    }
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        Some(_) => Err(format!("missing attribute name in `{raw}`")),
        // A bare name is a flag
        None => Ok((raw.trim().to_string(), String::new())),
    }
}
