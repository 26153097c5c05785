//! # AcoustRay
//!
//! Glue between a 3D scene editor and a geometrical room-acoustics ray tracer.
//!
//! AcoustRay reads reflective surfaces, sound sources and receivers out of a host
//! scene, hands them to an external simulation engine, and turns the reflection
//! paths the engine reports back into line lists a viewport can draw, filtered
//! by reflection order.
//!
//! ## Quick Start
//!
//! ```
//! use acoustray::*;
//! use acoustray::render::{CommandRecorder, DrawHandlerRegistry};
//! use acoustray::scene::{SceneEntity, TriMesh};
//! use acoustray::simulation::{Ray, SourceRays};
//! use std::sync::Arc;
//!
//! // Materials table with one entry
//! let mut materials = MaterialDatabase::new();
//! materials.push(MaterialRecord::new(0, [0.05; 8], "concrete"))?;
//!
//! // Scene: a closed room with one speaker and one microphone
//! let scene = vec![
//!     SceneEntity::geometry("room", TriMesh::room_box(Vec3::new(6.0, 4.0, 3.0)))
//!         .with_material(SurfaceMaterial::new(0, 0.1)),
//!     SceneEntity::source("speaker", Vec3::new(1.0, 0.0, 0.2)),
//!     SceneEntity::receiver("mic", Vec3::new(-2.0, 1.0, -0.3)),
//! ];
//! let input = extract_scene(&scene, &materials)?;
//! assert_eq!(input.sources.len(), 1);
//!
//! // Pretend the engine traced one ray bouncing twice
//! let rays = vec![SourceRays::new(
//!     input.sources[0].coord,
//!     vec![Ray::new(vec![Vec3::new(3.0, 0.0, 0.2), Vec3::new(0.0, 2.0, 0.2)])],
//! )];
//!
//! // Draw the paths through a backend
//! let backend = Arc::new(DrawHandlerRegistry::new());
//! let mut session = DrawSession::init(backend.clone(), false);
//! session.set_sources(&rays);
//! session.set_render_state(true, 2);
//!
//! let mut frame = CommandRecorder::new();
//! backend.redraw(&mut frame);
//! assert_eq!(frame.line_count(), 2);
//! # Ok::<(), AcoustRayError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`AcoustRayWorld`]**: Command surface of a host application: run, edit materials, toggle drawing
//! - **[`extract_scene`]**: Turns scene objects into simulation input
//! - **[`SimulationEngine`]**: Trait implemented by the ray tracing engine
//! - **[`SimulationAdapter`]**: Validates input and drives an engine through a run
//! - **[`RayBuffers`]**: Fixed-stride line lists compiled from ray histories
//! - **[`DrawSession`]**: Registers order-filtered draw callbacks with a [`GraphicsBackend`]
//! - **[`MaterialDatabase`]**: Editable materials table with CSV import/export
//! - **[`AcoustRayEvent`]**: Reports emitted by the world (completion, errors, etc.)
//!
//! ## Pipeline
//!
//! 1. **Extraction**: Enabled reflective objects become world-space triangles carrying
//!    their material's absorption and scattering
//! 2. **Simulation**: The engine is configured and run in a fixed call order
//! 3. **Compilation**: Each source's ray histories become a position buffer and an edge
//!    buffer with a constant number of slots per ray
//! 4. **Drawing**: A single callback draws one colored line list per source, cut at the
//!    selected reflection order
//!
//! Everything runs synchronously on the caller's thread.

pub mod config;
pub mod error;
pub mod events;
pub mod materials;
pub mod math;
pub mod render;
pub mod scene;
pub mod simulation;
pub mod world;

pub use config::{AirProperties, AlgorithmConfig, RenderSettings, SimulationSettings};
pub use error::{AcoustRayError, Result};
pub use events::AcoustRayEvent;
pub use materials::{MaterialDatabase, MaterialEntry, MaterialRecord, MoveDirection, SurfaceMaterial};
pub use math::Vec3;
pub use render::{DrawSession, GraphicsBackend, RayBuffers};
pub use scene::{SceneObject, extract_scene};
pub use simulation::{SimulationAdapter, SimulationEngine};
pub use world::AcoustRayWorld;
