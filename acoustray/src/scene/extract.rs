use super::entity::{Nature, SceneObject};
use crate::error::{AcoustRayError, Result};
use crate::materials::{MaterialDatabase, resolve};
use crate::math::{triangle_area, world_triangle_normal};
use crate::simulation::{CANONICAL_ORIENTATION, Plane, ReceiverDesc, SourceDesc};

/// Simulation-ready content of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneExtraction {
    pub planes: Vec<Plane>,
    pub sources: Vec<SourceDesc>,
    pub receivers: Vec<ReceiverDesc>,
}

/// Collects reflective triangles, sources and receivers from the enabled
/// objects of a scene.
///
/// # Errors
///
/// Any enabled reflective object without a material, or whose material id is not
/// in `materials`, fails the whole extraction. No partial result is returned.
pub fn extract_scene<I>(objects: I, materials: &MaterialDatabase) -> Result<SceneExtraction>
where
    I: IntoIterator,
    I::Item: SceneObject,
{
    let mut extraction = SceneExtraction::default();

    for obj in objects {
        let props = obj.props();
        if !props.enable {
            continue;
        }
        match props.nature {
            Nature::Geometry => extract_geometry(&obj, materials, &mut extraction.planes)?,
            Nature::Source => extraction.sources.push(SourceDesc {
                coord: obj.location(),
                orientation: CANONICAL_ORIENTATION,
                power_db: props.power_db,
                eq_db: props.eq_db,
                delay: props.delay,
            }),
            Nature::Receiver => extraction.receivers.push(ReceiverDesc {
                coord: obj.location(),
                orientation: CANONICAL_ORIENTATION,
            }),
        }
    }

    log::info!(
        "Extracted {} triangles, {} sources, {} receivers",
        extraction.planes.len(),
        extraction.sources.len(),
        extraction.receivers.len()
    );
    Ok(extraction)
}

fn extract_geometry<O: SceneObject>(
    obj: &O,
    materials: &MaterialDatabase,
    planes: &mut Vec<Plane>,
) -> Result<()> {
    let Some(mesh) = obj.mesh() else {
        log::debug!("Skipping {}: geometry object without mesh data", obj.name());
        return Ok(());
    };

    let surface = obj
        .active_material()
        .ok_or_else(|| AcoustRayError::Configuration {
            entity: obj.name().to_string(),
            reason: "no material assigned".to_string(),
        })?;
    let material = resolve(materials, surface).map_err(|e| AcoustRayError::Configuration {
        entity: obj.name().to_string(),
        reason: e.to_string(),
    })?;

    let transform = obj.world_transform();
    let before = planes.len();
    for (i, tri) in mesh.loop_triangles().iter().enumerate() {
        let vertices = tri
            .vertices
            .map(|v| transform.transform_point3(mesh.vertices()[v as usize]));
        let [a, b, c] = vertices;
        let area = triangle_area(a, b, c);
        if !(area > 0.0) {
            log::warn!("Skipping degenerate triangle {}.{}", obj.name(), i);
            continue;
        }
        planes.push(Plane {
            name: format!("{}.{}", obj.name(), i),
            bbox: false,
            vertices,
            normal: world_triangle_normal(&transform, tri.normal, vertices),
            alpha: material.alpha,
            s: material.scattering,
            area,
        });
    }
    log::debug!(
        "{}: {} triangles with material {}",
        obj.name(),
        planes.len() - before,
        surface.mat_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialRecord, SurfaceMaterial};
    use crate::math::{Affine3A, Quat, Vec3};
    use crate::scene::{SceneEntity, TriMesh};

    fn materials() -> MaterialDatabase {
        MaterialDatabase::from_records(vec![MaterialRecord::new(3, [0.1; 8], "test")]).unwrap()
    }

    fn unit_triangle() -> TriMesh {
        TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_single_triangle_and_source() {
        let scene = vec![
            SceneEntity::geometry("floor", unit_triangle()).with_material(SurfaceMaterial::new(3, 0.2)),
            SceneEntity::source("speaker", Vec3::new(0.0, 0.0, 2.0)),
        ];
        let extraction = extract_scene(&scene, &materials()).unwrap();

        assert_eq!(extraction.planes.len(), 1);
        let plane = &extraction.planes[0];
        assert_eq!(plane.name, "floor.0");
        assert!((plane.area - 0.5).abs() < 1e-6);
        assert!((plane.normal.z.abs() - 1.0).abs() < 1e-6);
        assert_eq!(plane.alpha, [0.1; 8]);
        assert_eq!(plane.s, 0.2);

        assert_eq!(extraction.sources.len(), 1);
        let source = &extraction.sources[0];
        assert_eq!(source.coord, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(source.orientation, Vec3::Y);
        assert_eq!(source.power_db, [80.0; 8]);
        assert_eq!(source.eq_db, [0.0; 8]);
        assert_eq!(source.delay, 0.0);
        assert!(extraction.receivers.is_empty());
    }

    #[test]
    fn test_uniform_scale_scales_area_squared() {
        let s = 3.0;
        let transform = Affine3A::from_scale_rotation_translation(
            Vec3::splat(s),
            Quat::IDENTITY,
            Vec3::new(5.0, -1.0, 2.0),
        );
        let scene = vec![
            SceneEntity::geometry("wall", unit_triangle())
                .with_material(SurfaceMaterial::new(3, 0.2))
                .with_transform(transform),
        ];
        let plane = extract_scene(&scene, &materials()).unwrap().planes.remove(0);

        assert!((plane.area - 0.5 * s * s).abs() < 1e-5);
        assert!((plane.normal - Vec3::Z).length() < 1e-6);
        assert_eq!(plane.vertices[1], Vec3::new(8.0, -1.0, 2.0));
    }

    #[test]
    fn test_flattened_object_keeps_valid_planes() {
        let scene = vec![
            SceneEntity::geometry("flat", unit_triangle())
                .with_material(SurfaceMaterial::new(3, 0.2))
                .with_transform(Affine3A::from_scale(Vec3::new(2.0, 2.0, 0.0))),
        ];
        let plane = extract_scene(&scene, &materials()).unwrap().planes.remove(0);

        assert!((plane.area - 2.0).abs() < 1e-6);
        assert!((plane.normal - Vec3::Z).length() < 1e-6);
        assert!(plane.validate().is_ok());
    }

    #[test]
    fn test_rotation_turns_normal() {
        let transform = Affine3A::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let scene = vec![
            SceneEntity::geometry("wall", unit_triangle())
                .with_material(SurfaceMaterial::new(3, 0.2))
                .with_transform(transform),
        ];
        let plane = extract_scene(&scene, &materials()).unwrap().planes.remove(0);
        assert!((plane.normal - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_missing_material_aborts() {
        let scene = vec![
            SceneEntity::geometry("good", unit_triangle()).with_material(SurfaceMaterial::new(3, 0.2)),
            SceneEntity::geometry("bare", unit_triangle()),
        ];
        let err = extract_scene(&scene, &materials()).unwrap_err();
        assert!(matches!(err, AcoustRayError::Configuration { .. }));
        assert_eq!(err.entity(), Some("bare"));
    }

    #[test]
    fn test_unknown_material_aborts() {
        let scene = vec![
            SceneEntity::geometry("wall", unit_triangle()).with_material(SurfaceMaterial::new(42, 0.2)),
        ];
        let err = extract_scene(&scene, &materials()).unwrap_err();
        assert_eq!(err.entity(), Some("wall"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_disabled_objects_are_skipped() {
        let scene = vec![
            SceneEntity::geometry("bare", unit_triangle()).enabled(false),
            SceneEntity::receiver("mic", Vec3::ONE),
            SceneEntity::source("off", Vec3::ZERO).enabled(false),
        ];
        let extraction = extract_scene(&scene, &materials()).unwrap();
        assert!(extraction.planes.is_empty());
        assert!(extraction.sources.is_empty());
        assert_eq!(extraction.receivers, vec![ReceiverDesc::at(Vec3::ONE)]);
    }

    #[test]
    fn test_degenerate_triangles_are_dropped() {
        let mesh = TriMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(2.0, 0.0, 0.0)],
            vec![vec![0, 1, 2], vec![0, 1, 3]],
        )
        .unwrap();
        let scene = vec![SceneEntity::geometry("mixed", mesh).with_material(SurfaceMaterial::new(3, 0.2))];
        let planes = extract_scene(&scene, &materials()).unwrap().planes;
        assert_eq!(planes.len(), 1);
        assert_eq!(planes[0].name, "mixed.0");
    }
}
