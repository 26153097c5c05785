//! Event types for AcoustRay

use crate::error::AcoustRayError;
use std::path::PathBuf;
use std::time::Duration;

/// User-facing reports emitted by [`AcoustRayWorld`](crate::AcoustRayWorld).
#[derive(Debug, Clone, PartialEq)]
pub enum AcoustRayEvent {
    SimulationStarted {
        title: String,
    },
    SimulationFinished {
        title: String,
        sources: usize,
        rays: usize,
        elapsed: Duration,
    },
    /// Extraction stopped on a badly set up scene entity
    ExtractionFailed {
        entity: Option<String>,
        message: String,
    },
    SimulationFailed {
        message: String,
    },
    RenderStateChanged {
        enabled: bool,
        order: usize,
    },
    MaterialAdded {
        id: u32,
    },
    MaterialRemoved {
        id: u32,
    },
    MaterialsSaved {
        path: PathBuf,
        count: usize,
    },
    MaterialsLoaded {
        path: PathBuf,
        count: usize,
    },
    SettingsLoaded {
        path: PathBuf,
    },
    OperationFailed {
        operation: &'static str,
        message: String,
    },
}

impl AcoustRayEvent {
    /// Builds the error report for a failed simulation run.
    pub fn from_run_error(error: &AcoustRayError) -> Self {
        match error {
            AcoustRayError::Configuration { entity, .. } => Self::ExtractionFailed {
                entity: Some(entity.clone()),
                message: error.to_string(),
            },
            AcoustRayError::MaterialNotFound(_) => Self::ExtractionFailed {
                entity: None,
                message: error.to_string(),
            },
            _ => Self::SimulationFailed {
                message: error.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::ExtractionFailed { .. } | Self::SimulationFailed { .. } | Self::OperationFailed { .. }
        )
    }

    pub fn is_material_event(&self) -> bool {
        matches!(
            self,
            Self::MaterialAdded { .. }
                | Self::MaterialRemoved { .. }
                | Self::MaterialsSaved { .. }
                | Self::MaterialsLoaded { .. }
        )
    }
}
