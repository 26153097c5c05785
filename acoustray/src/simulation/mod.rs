//! Bridge between extracted scenes and the external simulation engine.

pub mod adapter;
pub mod contract;
pub mod engine;

pub use adapter::SimulationAdapter;
pub use contract::{CANONICAL_ORIENTATION, Plane, Ray, ReceiverDesc, SourceDesc, SourceRays};
pub use engine::{EngineError, EngineResult, EngineStage, SimulationEngine};
