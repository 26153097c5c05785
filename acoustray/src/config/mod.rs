//! Configuration for AcoustRay

pub mod render;
pub mod simulation;

pub use render::{MIN_RENDER_ORDER, RenderSettings};
pub use simulation::{AirProperties, AlgorithmConfig, SimulationSettings};
