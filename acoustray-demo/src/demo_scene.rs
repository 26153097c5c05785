use acoustray::materials::{MaterialDatabase, SurfaceMaterial};
use acoustray::math::{Affine3A, Vec3};
use acoustray::scene::{SceneEntity, TriMesh};
use anyhow::Result;

pub const ROOM_SIZE: Vec3 = Vec3::new(8.0, 6.0, 3.0);

/// Fills the table with the materials used by [`shoebox`] and returns their
/// ids as (walls, floor, panel).
pub fn add_materials(materials: &mut MaterialDatabase) -> Result<(u32, u32, u32)> {
    let mut add = |description: &str, alpha: [f32; 8]| -> Result<u32> {
        let mut entry = materials.add()?;
        entry.set_description(description).set_alpha(alpha);
        Ok(entry.id())
    };
    let walls = add("painted plaster", [0.01, 0.01, 0.01, 0.02, 0.02, 0.02, 0.03, 0.03])?;
    let floor = add("carpet on concrete", [0.02, 0.06, 0.14, 0.37, 0.60, 0.65, 0.65, 0.65])?;
    let panel = add("glass wool panel", [0.10, 0.30, 0.80, 0.90, 0.95, 0.95, 0.95, 0.95])?;
    Ok((walls, floor, panel))
}

/// Shoebox room with an absorbing panel, two speakers and a microphone.
pub fn shoebox(walls: u32, floor: u32, panel: u32) -> Result<Vec<SceneEntity>> {
    let panel_mesh = TriMesh::new(
        vec![
            Vec3::new(-1.0, 0.0, -0.6),
            Vec3::new(1.0, 0.0, -0.6),
            Vec3::new(1.0, 0.0, 0.6),
            Vec3::new(-1.0, 0.0, 0.6),
        ],
        vec![vec![0, 1, 2, 3]],
    )?;
    let floor_mesh = TriMesh::new(
        vec![
            Vec3::new(-ROOM_SIZE.x / 2.0, -ROOM_SIZE.y / 2.0, 0.0),
            Vec3::new(ROOM_SIZE.x / 2.0, -ROOM_SIZE.y / 2.0, 0.0),
            Vec3::new(ROOM_SIZE.x / 2.0, ROOM_SIZE.y / 2.0, 0.0),
            Vec3::new(-ROOM_SIZE.x / 2.0, ROOM_SIZE.y / 2.0, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )?;

    Ok(vec![
        SceneEntity::geometry("room", TriMesh::room_box(ROOM_SIZE))
            .with_material(SurfaceMaterial::new(walls, 0.1)),
        SceneEntity::geometry("panel", panel_mesh)
            .with_material(SurfaceMaterial::new(panel, 0.3))
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 2.95, 0.2))),
        // Carpet laid just above the room's floor
        SceneEntity::geometry("carpet", floor_mesh)
            .with_material(SurfaceMaterial::new(floor, 0.2))
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, -1.49))),
        SceneEntity::source("speaker L", Vec3::new(-2.0, 2.0, 0.0)),
        SceneEntity::source("speaker R", Vec3::new(2.0, 2.0, 0.0)),
        SceneEntity::receiver("mic", Vec3::new(0.0, -1.5, -0.3)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use acoustray::scene::SceneObject;

    #[test]
    fn test_shoebox_keeps_every_object() {
        let mut materials = MaterialDatabase::new();
        let (walls, floor, panel) = add_materials(&mut materials).unwrap();
        assert_eq!((walls, floor, panel), (0, 1, 2));
        assert_eq!(
            materials.get_by_id(floor).map(|m| m.description.as_str()),
            Some("carpet on concrete")
        );

        let scene = shoebox(walls, floor, panel).unwrap();
        let names: Vec<_> = scene.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            ["room", "panel", "carpet", "speaker L", "speaker R", "mic"]
        );
    }
}
