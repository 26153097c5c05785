use crate::error::{AcoustRayError, Result};
use crate::math::{OCTAVE_BANDS, Spectrum};
use serde::Deserialize;
use std::path::Path;

/// Ray tracing parameters handed to the simulation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmConfig {
    /// Band center frequencies in Hz
    pub freq: Spectrum,
    /// Number of rays shot per source
    pub n_rays: u32,
    /// Impulse response duration in seconds
    pub ht_length: f32,
    /// Histogram resolution in seconds
    pub dt: f32,
    /// Allow scattering of the rays on the walls
    pub allow_scattering: bool,
    /// Reflection order at which the engine switches to the statistical tail
    pub transition_order: u32,
    /// Receiver initial radius in meters
    pub rec_radius_init: f32,
    /// Allow the receiver radius to grow with travelled distance
    pub allow_growth: bool,
    /// Receiver final radius in meters (only used with `allow_growth`)
    pub rec_radius_final: f32,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            freq: OCTAVE_BANDS,
            n_rays: 100,
            ht_length: 3.0,
            dt: 0.001,
            allow_scattering: true,
            transition_order: 2,
            rec_radius_init: 0.1,
            allow_growth: true,
            rec_radius_final: 1.0,
        }
    }
}

impl AlgorithmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rays(mut self, n_rays: u32) -> Self {
        self.n_rays = n_rays;
        self
    }

    pub fn ht_length(mut self, seconds: f32) -> Self {
        self.ht_length = seconds;
        self
    }

    pub fn dt(mut self, seconds: f32) -> Self {
        self.dt = seconds;
        self
    }

    pub fn allow_scattering(mut self, allow: bool) -> Self {
        self.allow_scattering = allow;
        self
    }

    pub fn transition_order(mut self, order: u32) -> Self {
        self.transition_order = order;
        self
    }

    pub fn receiver_radius(mut self, init: f32, growth: Option<f32>) -> Self {
        self.rec_radius_init = init;
        match growth {
            Some(radius_final) => {
                self.allow_growth = true;
                self.rec_radius_final = radius_final;
            }
            None => self.allow_growth = false,
        }
        self
    }
}

/// Air conditions of the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirProperties {
    /// Temperature in degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub hr: f32,
    /// Atmospheric pressure in Pa
    pub p_atm: f32,
}

impl Default for AirProperties {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            hr: 50.0,
            p_atm: 101325.0,
        }
    }
}

/// Everything the simulation needs besides the scene itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub title: String,
    pub algorithm: AlgorithmConfig,
    pub air: AirProperties,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            title: "noname".to_string(),
            algorithm: AlgorithmConfig::default(),
            air: AirProperties::default(),
        }
    }
}

impl SimulationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn algorithm(mut self, algorithm: AlgorithmConfig) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn air(mut self, air: AirProperties) -> Self {
        self.air = air;
        self
    }

    /// Loads settings from a simulation configuration file in TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded simulation settings '{}' from {}",
            settings.title,
            path.display()
        );
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile =
            toml::from_str(text).map_err(|e| AcoustRayError::Settings(e.to_string()))?;
        Ok(file.into())
    }
}

/// On-disk layout of the settings file.
#[derive(Debug, Deserialize)]
struct SettingsFile {
    title: String,
    controls: ControlsSection,
    air: AirSection,
}

#[derive(Debug, Deserialize)]
struct ControlsSection {
    #[serde(rename = "Nrays")]
    n_rays: u32,
    ht_length: f32,
    #[serde(rename = "Dt")]
    dt: f32,
    allow_scattering: Flag,
    transition_order: u32,
    rec_radius_init: f32,
    allow_growth: Flag,
    rec_radius_final: f32,
}

#[derive(Debug, Deserialize)]
struct AirSection {
    #[serde(rename = "Temperature")]
    temperature: f32,
    hr: f32,
    p_atm: f32,
}

/// Boolean written either as `true`/`false` or as `1`/`0`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Bool(value) => value,
            Flag::Int(value) => value != 0,
        }
    }
}

impl From<SettingsFile> for SimulationSettings {
    fn from(file: SettingsFile) -> Self {
        let controls = file.controls;
        Self {
            title: file.title,
            algorithm: AlgorithmConfig {
                freq: OCTAVE_BANDS,
                n_rays: controls.n_rays,
                ht_length: controls.ht_length,
                dt: controls.dt,
                allow_scattering: controls.allow_scattering.into(),
                transition_order: controls.transition_order,
                rec_radius_init: controls.rec_radius_init,
                allow_growth: controls.allow_growth.into(),
                rec_radius_final: controls.rec_radius_final,
            },
            air: AirProperties {
                temperature: file.air.temperature,
                hr: file.air.hr,
                p_atm: file.air.p_atm,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"
title = "shoebox"

[controls]
Nrays = 500
ht_length = 2.5
Dt = 0.002
allow_scattering = 0
transition_order = 3
rec_radius_init = 0.2
allow_growth = true
rec_radius_final = 1.5

[air]
Temperature = 22
hr = 40.0
p_atm = 101000.0
"#;

    #[test]
    fn test_defaults() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.title, "noname");
        assert_eq!(settings.algorithm.n_rays, 100);
        assert_eq!(settings.algorithm.freq, OCTAVE_BANDS);
        assert_eq!(settings.air.p_atm, 101325.0);
    }

    #[test]
    fn test_parse_settings_file() {
        let settings = SimulationSettings::from_toml_str(SETTINGS).unwrap();
        assert_eq!(settings.title, "shoebox");
        assert_eq!(settings.algorithm.n_rays, 500);
        assert_eq!(settings.algorithm.dt, 0.002);
        assert!(!settings.algorithm.allow_scattering);
        assert!(settings.algorithm.allow_growth);
        assert_eq!(settings.algorithm.transition_order, 3);
        assert_eq!(settings.air.temperature, 22.0);
        assert_eq!(settings.air.hr, 40.0);
    }

    #[test]
    fn test_missing_section_is_reported() {
        let result = SimulationSettings::from_toml_str("title = \"x\"\n");
        assert!(matches!(result, Err(AcoustRayError::Settings(_))));
    }

    #[test]
    fn test_builder() {
        let algorithm = AlgorithmConfig::new()
            .n_rays(1000)
            .receiver_radius(0.05, None);
        assert_eq!(algorithm.n_rays, 1000);
        assert!(!algorithm.allow_growth);
        assert_eq!(algorithm.rec_radius_init, 0.05);
    }
}
