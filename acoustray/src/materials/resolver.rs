use super::database::MaterialDatabase;
use crate::error::{AcoustRayError, Result};
use crate::math::Spectrum;

/// Acoustic settings attached to a surface material in the host scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    /// Id of the record in the materials database
    pub mat_id: u32,

    /// Probability of a non-absorbed ray being reflected as diffuse (as
    /// opposed to specular)
    pub scattering: f32,
}

impl SurfaceMaterial {
    pub fn new(mat_id: u32, scattering: f32) -> Self {
        Self { mat_id, scattering }
    }
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            mat_id: 0,
            scattering: 0.1,
        }
    }
}

/// Absorption and scattering of a surface after looking up its material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMaterial {
    pub alpha: Spectrum,
    pub scattering: f32,
}

/// Looks up the absorption spectrum of `surface` in `db`.
pub fn resolve(db: &MaterialDatabase, surface: &SurfaceMaterial) -> Result<ResolvedMaterial> {
    let record = db
        .get_by_id(surface.mat_id)
        .ok_or(AcoustRayError::MaterialNotFound(surface.mat_id))?;
    Ok(ResolvedMaterial {
        alpha: record.alpha,
        scattering: surface.scattering,
    })
}
