use crate::error::{AcoustRayError, Result};
use crate::math::{Vec3, triangle_normal};

/// Polygon mesh in object (local) space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriMesh {
    vertices: Vec<Vec3>,
    polygons: Vec<Vec<u32>>,
}

/// One triangle of a triangulated polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTriangle {
    /// Indices into the mesh vertices
    pub vertices: [u32; 3],
    /// Local-space unit normal following the polygon winding
    pub normal: Vec3,
}

impl TriMesh {
    /// Creates a mesh from vertices and polygons given as vertex index loops.
    ///
    /// # Errors
    ///
    /// Returns an error if a polygon has fewer than three corners or refers to a
    /// vertex that does not exist.
    pub fn new(vertices: Vec<Vec3>, polygons: Vec<Vec<u32>>) -> Result<Self> {
        for (i, polygon) in polygons.iter().enumerate() {
            if polygon.len() < 3 {
                return Err(AcoustRayError::InvalidInput(format!(
                    "polygon {} has {} corners",
                    i,
                    polygon.len()
                )));
            }
            if let Some(&bad) = polygon.iter().find(|&&v| v as usize >= vertices.len()) {
                return Err(AcoustRayError::InvalidInput(format!(
                    "polygon {} refers to missing vertex {}",
                    i, bad
                )));
            }
        }
        Ok(Self { vertices, polygons })
    }

    /// Axis aligned box centered on the origin with faces wound to point inwards,
    /// as seen from a listener inside the room.
    pub fn room_box(size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let polygons = vec![
            vec![0, 1, 2, 3], // floor, +Z
            vec![4, 7, 6, 5], // ceiling, -Z
            vec![0, 4, 5, 1], // -Y wall, +Y
            vec![3, 2, 6, 7], // +Y wall, -Y
            vec![0, 3, 7, 4], // -X wall, +X
            vec![1, 5, 6, 2], // +X wall, -X
        ];
        Self { vertices, polygons }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[Vec<u32>] {
        &self.polygons
    }

    /// Triangulates every polygon as a fan around its first corner.
    pub fn loop_triangles(&self) -> Vec<LoopTriangle> {
        let mut triangles = Vec::new();
        for polygon in &self.polygons {
            for k in 1..polygon.len() - 1 {
                let vertices = [polygon[0], polygon[k], polygon[k + 1]];
                let [a, b, c] = vertices.map(|v| self.vertices[v as usize]);
                triangles.push(LoopTriangle {
                    vertices,
                    normal: triangle_normal(a, b, c),
                });
            }
        }
        triangles
    }
}
