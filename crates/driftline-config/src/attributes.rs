//! String attributes supplied by the host markup.

use std::collections::HashMap;

use driftline_core::{Orientation, RendererConfig};
use tracing::warn;

/// Named slots for declared colors, in order.
const COLOR_SLOTS: [&str; 4] = ["color-one", "color-two", "color-three", "color-four"];

/// A bag of string-typed attributes describing a renderer.
///
/// Keys may carry a `data-` prefix. Flags are on when present with any value
/// other than `false` or `0`; numbers that fail to parse keep their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values.insert(normalize_key(key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Interpret the attributes on top of `base`.
    pub fn apply_to(&self, base: RendererConfig) -> RendererConfig {
        let mut config = base;

        if let Some(vertical) = self.flag("vertical") {
            config.orientation = if vertical {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
        }
        config.amplitude = self.number("amplitude", config.amplitude);
        config.frequency = self.number("frequency", config.frequency);
        config.attenuation = self.number("attenuation", config.attenuation);
        config.speed = self.number("speed", config.speed);
        if let Some(flip) = self.flag("flip") {
            config.flip = flip;
        }
        if let Some(track) = self.flag("track-opacity") {
            config.track_opacity = track;
        }

        let colors: Vec<String> = COLOR_SLOTS
            .iter()
            .filter_map(|slot| self.get(slot))
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .map(str::to_string)
            .collect();
        if !colors.is_empty() {
            config.colors = colors;
        }

        config
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|value| {
            let value = value.trim();
            !(value.eq_ignore_ascii_case("false") || value == "0")
        })
    }

    fn number(&self, key: &str, default: f64) -> f64 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                warn!(key, value = raw, default, "invalid number attribute, using default");
                default
            }
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_lowercase();
    match key.strip_prefix("data-") {
        Some(rest) => rest.to_string(),
        None => key,
    }
}
