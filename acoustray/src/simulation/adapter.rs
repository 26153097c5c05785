use super::contract::{SourceRays, validate_air, validate_algorithm};
use super::engine::{EngineResult, EngineStage, SimulationEngine};
use crate::config::SimulationSettings;
use crate::error::{AcoustRayError, Result};
use crate::scene::SceneExtraction;
use std::time::Instant;

/// Drives a [`SimulationEngine`] through a full run.
///
/// The adapter checks the inputs once at the boundary, then calls the engine in
/// the fixed [`EngineStage::SEQUENCE`] order. The first failing stage stops the
/// run and its error is passed on unchanged.
pub struct SimulationAdapter<'a> {
    settings: &'a SimulationSettings,
}

impl<'a> SimulationAdapter<'a> {
    pub fn new(settings: &'a SimulationSettings) -> Self {
        Self { settings }
    }

    /// Checks settings and scene content against the engine's input contract.
    pub fn validate(&self, input: &SceneExtraction) -> Result<()> {
        validate_algorithm(&self.settings.algorithm)?;
        validate_air(&self.settings.air)?;
        for plane in &input.planes {
            plane.validate()?;
        }
        for source in &input.sources {
            source.validate()?;
        }
        for receiver in &input.receivers {
            receiver.validate()?;
        }
        Ok(())
    }

    /// Runs the simulation and returns the ray histories of every source.
    ///
    /// Blocks until the engine is done; there is no cancellation.
    pub fn run<E>(&self, engine: &mut E, input: &SceneExtraction) -> Result<Vec<SourceRays>>
    where
        E: SimulationEngine + ?Sized,
    {
        self.validate(input)?;

        let settings = self.settings;
        let started = Instant::now();
        log::info!(
            "Running simulation '{}': {} triangles, {} sources, {} receivers, {} rays",
            settings.title,
            input.planes.len(),
            input.sources.len(),
            input.receivers.len(),
            settings.algorithm.n_rays
        );

        check_stage(EngineStage::Configure, engine.set_configs(&settings.algorithm))?;
        check_stage(EngineStage::SetAir, engine.set_air(&settings.air))?;
        check_stage(EngineStage::SetGeometry, engine.set_geometry(&input.planes))?;
        check_stage(EngineStage::DeriveRayDirections, engine.set_raydir())?;
        check_stage(EngineStage::SetReceivers, engine.set_receivers(&input.receivers))?;
        check_stage(EngineStage::AllocateMemory, engine.set_memory_init())?;
        check_stage(EngineStage::SetSources, engine.set_sources(&input.sources))?;
        check_stage(
            EngineStage::StatisticalReverberation,
            engine.run_statistical_reverberation(),
        )?;
        check_stage(EngineStage::RayTracing, engine.run_raytracing())?;

        let sources = engine.take_sources();
        log::info!(
            "Simulation '{}' finished in {:.2?} with {} sources",
            settings.title,
            started.elapsed(),
            sources.len()
        );
        Ok(sources)
    }
}

fn check_stage(stage: EngineStage, result: EngineResult<()>) -> Result<()> {
    match result {
        Ok(()) => {
            log::debug!("Engine stage {} done", stage);
            Ok(())
        }
        Err(source) => {
            log::error!("Engine failed during {}: {}", stage, source);
            Err(AcoustRayError::Engine { stage, source })
        }
    }
}
