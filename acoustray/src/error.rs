//! Error types for AcoustRay

use crate::simulation::{EngineError, EngineStage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcoustRayError {
    /// A scene entity is set up in a way the simulation cannot use.
    #[error("Object {entity} has no valid material: {reason}")]
    Configuration { entity: String, reason: String },

    #[error("Material id {0} not found in the materials database")]
    MaterialNotFound(u32),

    #[error("Invalid simulation input: {0}")]
    InvalidInput(String),

    #[error("Simulation engine failed during {stage}: {source}")]
    Engine {
        stage: EngineStage,
        #[source]
        source: EngineError,
    },

    #[error("Materials file error at line {line}: {reason}")]
    MaterialFormat { line: usize, reason: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcoustRayError {
    /// Name of the scene entity the error is about, if any.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::Configuration { entity, .. } => Some(entity),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AcoustRayError>;
