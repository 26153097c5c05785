//! Typed input and output records exchanged with the simulation engine.

use crate::config::{AirProperties, AlgorithmConfig};
use crate::error::{AcoustRayError, Result};
use crate::math::{NUM_BANDS, Spectrum, Vec3, is_unit};

/// Orientation given to every source and receiver.
pub const CANONICAL_ORIENTATION: Vec3 = Vec3::Y;

/// A reflective triangle in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// `<object name>.<triangle index>`
    pub name: String,
    pub bbox: bool,
    pub vertices: [Vec3; 3],
    /// Unit normal
    pub normal: Vec3,
    /// Absorption per band (0.0 - 1.0)
    pub alpha: Spectrum,
    /// Scattering coefficient (0.0 - 1.0)
    pub s: f32,
    /// Area in square meters, computed from the world-space vertices
    pub area: f32,
}

/// An omnidirectional acoustic source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDesc {
    pub coord: Vec3,
    pub orientation: Vec3,
    pub power_db: Spectrum,
    pub eq_db: Spectrum,
    /// Delay in seconds
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverDesc {
    pub coord: Vec3,
    pub orientation: Vec3,
}

/// The path of one traced ray.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ray {
    /// World-space reflection points in bounce order
    pub refpts_hist: Vec<Vec3>,
}

impl Ray {
    pub fn new(refpts_hist: Vec<Vec3>) -> Self {
        Self { refpts_hist }
    }

    /// Number of recorded reflections
    pub fn order(&self) -> usize {
        self.refpts_hist.len()
    }
}

/// Engine output for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRays {
    pub coord: Vec3,
    pub rays: Vec<Ray>,
}

impl SourceRays {
    pub fn new(coord: Vec3, rays: Vec<Ray>) -> Self {
        Self { coord, rays }
    }

    /// Longest history among this source's rays
    pub fn max_order(&self) -> usize {
        self.rays.iter().map(Ray::order).max().unwrap_or(0)
    }
}

fn invalid(what: impl std::fmt::Display, reason: &str) -> AcoustRayError {
    AcoustRayError::InvalidInput(format!("{}: {}", what, reason))
}

fn check_unit_range(what: &str, values: &[f32]) -> Result<()> {
    if values.iter().all(|v| (0.0..=1.0).contains(v)) {
        Ok(())
    } else {
        Err(invalid(what, "values must be between 0.0 and 1.0"))
    }
}

fn check_finite(what: &str, values: &[f32]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(invalid(what, "values must be finite"))
    }
}

impl Plane {
    pub fn validate(&self) -> Result<()> {
        let coords: Vec<f32> = self.vertices.iter().flat_map(|v| v.to_array()).collect();
        check_finite(&self.name, &coords)?;
        if !(self.area.is_finite() && self.area > 0.0) {
            return Err(invalid(&self.name, "area must be positive"));
        }
        if !is_unit(self.normal) {
            return Err(invalid(&self.name, "normal must be a unit vector"));
        }
        check_unit_range(&self.name, &self.alpha)?;
        check_unit_range(&self.name, &[self.s])
    }
}

impl SourceDesc {
    /// A source at `coord` with 80 dB per band, flat equalization and no delay.
    pub fn at(coord: Vec3) -> Self {
        Self {
            coord,
            orientation: CANONICAL_ORIENTATION,
            power_db: [80.0; NUM_BANDS],
            eq_db: [0.0; NUM_BANDS],
            delay: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("source coordinates", &self.coord.to_array())?;
        check_finite("source power", &self.power_db)?;
        check_finite("source equalization", &self.eq_db)?;
        if !(self.delay.is_finite() && self.delay >= 0.0) {
            return Err(invalid("source delay", "must be zero or positive"));
        }
        if !is_unit(self.orientation) {
            return Err(invalid("source orientation", "must be a unit vector"));
        }
        Ok(())
    }
}

impl ReceiverDesc {
    pub fn at(coord: Vec3) -> Self {
        Self {
            coord,
            orientation: CANONICAL_ORIENTATION,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("receiver coordinates", &self.coord.to_array())?;
        if !is_unit(self.orientation) {
            return Err(invalid("receiver orientation", "must be a unit vector"));
        }
        Ok(())
    }
}

pub(crate) fn validate_algorithm(config: &AlgorithmConfig) -> Result<()> {
    if !config.freq.iter().all(|f| f.is_finite() && *f > 0.0) {
        return Err(invalid("freq", "band frequencies must be positive"));
    }
    if !(config.ht_length.is_finite() && config.ht_length > 0.0) {
        return Err(invalid("ht_length", "must be positive"));
    }
    if !(config.dt.is_finite() && config.dt > 0.0) {
        return Err(invalid("dt", "must be positive"));
    }
    if !(config.rec_radius_init.is_finite() && config.rec_radius_init >= 0.0) {
        return Err(invalid("rec_radius_init", "must be zero or positive"));
    }
    if config.allow_growth
        && !(config.rec_radius_final.is_finite() && config.rec_radius_final >= config.rec_radius_init)
    {
        return Err(invalid(
            "rec_radius_final",
            "must not be smaller than rec_radius_init when growth is allowed",
        ));
    }
    Ok(())
}

pub(crate) fn validate_air(air: &AirProperties) -> Result<()> {
    check_finite("air properties", &[air.temperature, air.hr, air.p_atm])?;
    if !(0.0..=100.0).contains(&air.hr) {
        return Err(invalid("hr", "relative humidity must be between 0 and 100"));
    }
    if air.p_atm <= 0.0 {
        return Err(invalid("p_atm", "must be positive"));
    }
    Ok(())
}
