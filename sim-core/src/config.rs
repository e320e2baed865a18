//! Static simulation parameters and live user controls.
//!
//! [`Config`] is fixed for the lifetime of a [`crate::simulation::Simulation`];
//! changing it means building a new one. [`Controls`] are the knobs a host
//! may flip between any two steps.

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_WIND_LEVEL: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Particles per row (W).
    pub columns: usize,
    /// Particles per column (H).
    pub rows: usize,
    pub width: f32,
    pub height: f32,
    pub particle_mass: f32,
    /// Fixed integration step in seconds, independent of wall-clock time.
    pub time_step: f32,
    /// Relaxation passes per step.
    pub constraint_iterations: u32,
    pub gravity: Vec3,
    /// Axis the wind acts along, one of `±X`, `±Y`, `±Z`. Positive wind
    /// levels push against it.
    pub wind_axis: Vec3,
    pub wind_amplitude: f32,
    pub wind_bias: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            width: 10.0,
            height: 10.0,
            particle_mass: 1.0,
            time_step: 5.0 / 60.0,
            constraint_iterations: 500,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            wind_axis: Vec3::Z,
            wind_amplitude: 2.5,
            wind_bias: 1.0,
        }
    }
}

impl Config {
    /// Checks that the lattice can be built and stepped with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 {
            return Err(invalid("columns", "need at least 2 particles per row"));
        }
        if self.rows < 2 {
            return Err(invalid("rows", "need at least 2 particles per column"));
        }
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("particle_mass", self.particle_mass)?;
        positive("time_step", self.time_step)?;
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }
        let axis = self.wind_axis.abs();
        if axis != Vec3::X && axis != Vec3::Y && axis != Vec3::Z {
            return Err(invalid("wind_axis", "must be a unit coordinate axis"));
        }
        if !self.wind_amplitude.is_finite() || !self.wind_bias.is_finite() {
            return Err(invalid("wind_amplitude", "wind constants must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and greater than zero"))
    }
}

/// Live knobs. Always valid; the simulation tolerates any change between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub wind_enabled: bool,
    /// `true` pins only the two top corners, `false` pins the whole top row.
    pub point_attached: bool,
    pub cloth_tear: bool,
    /// 0..=100.
    pub wind_level: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            wind_enabled: true,
            point_attached: true,
            cloth_tear: false,
            wind_level: 50,
        }
    }
}

/// Contents of a settings file: an optional `[config]` table and an
/// optional `[controls]` table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub config: Config,
    pub controls: Controls,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, Some(path))
    }

    /// Parse settings from an in-memory TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;
        // Levels above the slider range are clamped, not rejected.
        settings.controls.wind_level = settings.controls.wind_level.min(MAX_WIND_LEVEL);
        settings.config.validate()?;
        Ok(settings)
    }
}
