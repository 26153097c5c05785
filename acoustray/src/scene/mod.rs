//! Scene access and extraction of simulation inputs.
//!
//! The host application owns the scene graph. This module only reads it through
//! the [`SceneObject`] trait and never changes it.
//!
//! # Overview
//!
//! 1. **SceneObject** - Trait exposing an object's acoustic properties, world
//!    transform, mesh and active material
//! 2. **TriMesh** - Polygon mesh in object space, triangulated on demand
//! 3. **extract_scene** - Turns enabled objects into triangles, sources and
//!    receivers ready for the simulation engine
//!
//! # Example
//!
//! ```
//! use acoustray::materials::{MaterialDatabase, MaterialRecord, SurfaceMaterial};
//! use acoustray::math::Vec3;
//! use acoustray::scene::{SceneEntity, TriMesh, extract_scene};
//!
//! let mut materials = MaterialDatabase::new();
//! materials.push(MaterialRecord::new(0, [0.05; 8], "concrete"))?;
//!
//! let scene = vec![
//!     SceneEntity::geometry("room", TriMesh::room_box(Vec3::new(5.0, 4.0, 3.0)))
//!         .with_material(SurfaceMaterial::new(0, 0.1)),
//!     SceneEntity::source("speaker", Vec3::new(1.0, 0.5, 1.2)),
//!     SceneEntity::receiver("mic", Vec3::new(-1.5, -1.0, 1.2)),
//! ];
//!
//! let extraction = extract_scene(&scene, &materials)?;
//! assert_eq!(extraction.planes.len(), 12);
//! # Ok::<(), acoustray::AcoustRayError>(())
//! ```

pub mod entity;
pub mod extract;
pub mod mesh;

pub use entity::{Nature, ObjectProps, SceneEntity, SceneObject};
pub use extract::{SceneExtraction, extract_scene};
pub use mesh::{LoopTriangle, TriMesh};
