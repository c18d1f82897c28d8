//! TOML configuration file.

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use driftline_core::{MAX_DECLARED_COLORS, Orientation, RendererConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// File name inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Accepted device pixel ratios for the terminal.
const PIXEL_RATIO_RANGE: RangeInclusive<f64> = 1.0..=8.0;

/// Persisted settings for the terminal app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub orientation: Orientation,
    pub amplitude: f64,
    pub frequency: f64,
    pub attenuation: f64,
    pub speed: f64,
    pub flip: bool,
    pub track_opacity: bool,
    pub colors: Vec<String>,
    /// Device pixel ratio reported for the terminal.
    pub pixel_ratio: f64,
    pub fps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let renderer = RendererConfig::default();
        Self {
            orientation: renderer.orientation,
            amplitude: renderer.amplitude,
            frequency: renderer.frequency,
            attenuation: renderer.attenuation,
            speed: renderer.speed,
            flip: renderer.flip,
            track_opacity: renderer.track_opacity,
            colors: renderer.colors,
            pixel_ratio: 1.0,
            fps: 60,
            seed: None,
        }
    }
}

impl Config {
    /// Platform configuration directory for driftline.
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "driftline").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.sanitize();
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save to the default location, returning the path written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, contents).map_err(write_err)?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Reset non-finite numbers and an out of range pixel ratio to defaults.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for (key, value, default) in [
            ("amplitude", &mut self.amplitude, defaults.amplitude),
            ("frequency", &mut self.frequency, defaults.frequency),
            ("attenuation", &mut self.attenuation, defaults.attenuation),
            ("speed", &mut self.speed, defaults.speed),
        ] {
            if !value.is_finite() {
                warn!(key, value = *value, default, "non-finite setting, using default");
                *value = default;
            }
        }

        if !PIXEL_RATIO_RANGE.contains(&self.pixel_ratio) {
            warn!(
                pixel_ratio = self.pixel_ratio,
                min = PIXEL_RATIO_RANGE.start(),
                max = PIXEL_RATIO_RANGE.end(),
                "pixel ratio out of range, using default"
            );
            self.pixel_ratio = defaults.pixel_ratio;
        }
    }

    /// Renderer settings described by this config.
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            orientation: self.orientation,
            amplitude: self.amplitude,
            frequency: self.frequency,
            attenuation: self.attenuation,
            speed: self.speed,
            flip: self.flip,
            track_opacity: self.track_opacity,
            colors: self
                .colors
                .iter()
                .take(MAX_DECLARED_COLORS)
                .cloned()
                .collect(),
            seed: self.seed,
        }
    }
}
