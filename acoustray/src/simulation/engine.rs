//! Interface to the external acoustic simulation engine.
//!
//! The engine itself (ray tracing, statistical reverberation) lives outside this
//! crate. Wrap it in a type implementing [`SimulationEngine`] and hand it to
//! [`SimulationAdapter::run`](super::SimulationAdapter::run).

use super::contract::{Plane, ReceiverDesc, SourceDesc, SourceRays};
use crate::config::{AirProperties, AlgorithmConfig};
use std::fmt;
use thiserror::Error;

/// Failure reported by the simulation engine, kept as the engine worded it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// The steps of a simulation run, in the only order the engine accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStage {
    Configure,
    SetAir,
    SetGeometry,
    DeriveRayDirections,
    SetReceivers,
    AllocateMemory,
    SetSources,
    StatisticalReverberation,
    RayTracing,
}

impl EngineStage {
    pub const SEQUENCE: [EngineStage; 9] = [
        EngineStage::Configure,
        EngineStage::SetAir,
        EngineStage::SetGeometry,
        EngineStage::DeriveRayDirections,
        EngineStage::SetReceivers,
        EngineStage::AllocateMemory,
        EngineStage::SetSources,
        EngineStage::StatisticalReverberation,
        EngineStage::RayTracing,
    ];
}

impl fmt::Display for EngineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configure => "set_configs",
            Self::SetAir => "set_air",
            Self::SetGeometry => "set_geometry",
            Self::DeriveRayDirections => "set_raydir",
            Self::SetReceivers => "set_receivers",
            Self::AllocateMemory => "set_memory_init",
            Self::SetSources => "set_sources",
            Self::StatisticalReverberation => "run_statistical_reverberation",
            Self::RayTracing => "run_raytracing",
        };
        f.write_str(name)
    }
}

/// Trait for driving an acoustic simulation engine.
///
/// Each method maps to one [`EngineStage`]. The engine requires them to be called
/// exactly in [`EngineStage::SEQUENCE`] order; calling them in any other order is
/// undefined on the engine side. Use [`SimulationAdapter`](super::SimulationAdapter)
/// rather than calling these directly.
///
/// # Example
///
/// ```
/// use acoustray::config::{AirProperties, AlgorithmConfig};
/// use acoustray::simulation::*;
///
/// /// Engine that traces nothing.
/// struct Silent {
///     sources: Vec<SourceRays>,
/// }
///
/// impl SimulationEngine for Silent {
///     fn set_configs(&mut self, _config: &AlgorithmConfig) -> EngineResult<()> { Ok(()) }
///     fn set_air(&mut self, _air: &AirProperties) -> EngineResult<()> { Ok(()) }
///     fn set_geometry(&mut self, _planes: &[Plane]) -> EngineResult<()> { Ok(()) }
///     fn set_raydir(&mut self) -> EngineResult<()> { Ok(()) }
///     fn set_receivers(&mut self, _receivers: &[ReceiverDesc]) -> EngineResult<()> { Ok(()) }
///     fn set_memory_init(&mut self) -> EngineResult<()> { Ok(()) }
///     fn set_sources(&mut self, sources: &[SourceDesc]) -> EngineResult<()> {
///         self.sources = sources.iter().map(|s| SourceRays::new(s.coord, Vec::new())).collect();
///         Ok(())
///     }
///     fn run_statistical_reverberation(&mut self) -> EngineResult<()> { Ok(()) }
///     fn run_raytracing(&mut self) -> EngineResult<()> { Ok(()) }
///     fn take_sources(&mut self) -> Vec<SourceRays> { std::mem::take(&mut self.sources) }
/// }
/// ```
pub trait SimulationEngine {
    /// Sets the algorithm parameters.
    fn set_configs(&mut self, config: &AlgorithmConfig) -> EngineResult<()>;

    /// Sets the air conditions used for air absorption and speed of sound.
    fn set_air(&mut self, air: &AirProperties) -> EngineResult<()>;

    /// Sets the reflective triangles of the room.
    fn set_geometry(&mut self, planes: &[Plane]) -> EngineResult<()>;

    /// Derives the initial direction of every ray.
    fn set_raydir(&mut self) -> EngineResult<()>;

    fn set_receivers(&mut self, receivers: &[ReceiverDesc]) -> EngineResult<()>;

    /// Allocates the engine's result storage. Needs configuration, geometry and
    /// receivers to be known.
    fn set_memory_init(&mut self) -> EngineResult<()>;

    fn set_sources(&mut self, sources: &[SourceDesc]) -> EngineResult<()>;

    /// Runs the late (statistical) reverberation stage.
    fn run_statistical_reverberation(&mut self) -> EngineResult<()>;

    /// Runs the deterministic ray tracing stage.
    fn run_raytracing(&mut self) -> EngineResult<()>;

    /// Hands over the per-source ray histories produced by the last run, one
    /// entry per source in the order given to [`set_sources`](Self::set_sources).
    fn take_sources(&mut self) -> Vec<SourceRays>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let names: Vec<String> = EngineStage::SEQUENCE.iter().map(|s| s.to_string()).collect();
        assert_eq!(names.first().map(String::as_str), Some("set_configs"));
        assert_eq!(names.last().map(String::as_str), Some("run_raytracing"));
    }

    #[test]
    fn test_engine_error_is_verbatim() {
        let err = EngineError::new("geometry is not watertight");
        assert_eq!(err.to_string(), "geometry is not watertight");
    }
}
