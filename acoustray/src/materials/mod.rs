//! Acoustic materials: the user-edited database, surface lookups and file
//! import/export.

pub mod database;
pub mod files;
pub mod resolver;

pub use database::{MaterialDatabase, MaterialEntry, MaterialRecord, MoveDirection};
pub use files::{CsvMaterialFormat, MaterialSerializer, load_materials, save_materials};
pub use resolver::{ResolvedMaterial, SurfaceMaterial, resolve};
