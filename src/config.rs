// Rendering parameters. One `Config` lives in the main loop; the panel
// mutates it between frames and the compositor reads it each frame.

use crate::error::Error;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    // --- shape ---
    pub radius: f64,
    pub variation: f64,
    pub segments: usize,
    /// Background blob is shifted by (offset, offset).
    pub offset: f64,

    // --- colors ---
    pub front_color: Rgb,
    pub back_color: Rgb,
    pub background: Rgb,

    // --- animation ---
    pub animate: bool,
    pub animation_speed: f64,
    pub animation_amount: f64,

    // --- blur ---
    pub blur: bool,
    pub blur_amount: f64,

    // --- grain ---
    pub grain: bool,
    pub grain_animate: bool,
    pub grain_amount: f64,
    pub grain_hardness: f64,
    pub grain_size: f64,
    pub grain_color: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 100.0,
            variation: 40.0,
            segments: 8,
            offset: 100.0,
            front_color: Rgb::new(0xFE, 0x5F, 0x38),
            back_color: Rgb::new(0x61, 0x44, 0xE3),
            background: Rgb::BLACK,
            animate: true,
            animation_speed: 1.0,
            animation_amount: 30.0,
            blur: true,
            blur_amount: 120.0,
            grain: true,
            grain_animate: true,
            grain_amount: 0.5,
            grain_hardness: 0.0,
            grain_size: 1.0,
            grain_color: Rgb::WHITE,
        }
    }
}

impl Config {
    /// Read a YAML file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let config: Config = serde_yaml::from_str(&text)
            .map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })?;
        Ok(config.sanitize())
    }

    /// Enforce the invariants a file can break but the panel never does:
    /// at least 3 segments, alphas in [0,1], finite numbers.
    pub fn sanitize(mut self) -> Self {
        let d = Config::default();
        let finite = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        self.radius = finite(self.radius, d.radius);
        self.variation = finite(self.variation, d.variation);
        self.offset = finite(self.offset, d.offset);
        self.animation_speed = finite(self.animation_speed, d.animation_speed);
        self.animation_amount = finite(self.animation_amount, d.animation_amount);
        self.blur_amount = finite(self.blur_amount, d.blur_amount);
        self.grain_size = finite(self.grain_size, d.grain_size);

        self.segments = self.segments.max(3);
        self.grain_amount = finite(self.grain_amount, d.grain_amount).clamp(0.0, 1.0);
        self.grain_hardness = finite(self.grain_hardness, d.grain_hardness).clamp(0.0, 1.0);
        self
    }
}
