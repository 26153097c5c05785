//! Math types for AcoustRay

pub use glam::{Affine3A, Mat3, Quat, Vec3};

/// Number of frequency bands used by absorption, power and equalization spectra.
pub const NUM_BANDS: usize = 8;

/// Octave band center frequencies in Hz.
pub const OCTAVE_BANDS: [f32; NUM_BANDS] =
    [63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0];

/// A value per octave band.
pub type Spectrum = [f32; NUM_BANDS];

/// Area of the triangle `abc`.
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}

/// Unit normal of the triangle `abc` following its winding, or zero when degenerate.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Maps a local-space normal to world space.
///
/// Only the linear part of the transform applies. The inverse transpose keeps the
/// normal perpendicular to the surface under non-uniform scale. Returns zero when
/// the linear part is singular.
pub fn transform_normal(transform: &Affine3A, normal: Vec3) -> Vec3 {
    let linear = Mat3::from(transform.matrix3);
    if linear.determinant() == 0.0 {
        return Vec3::ZERO;
    }
    let normal_matrix = linear.inverse().transpose();
    (normal_matrix * normal).normalize_or_zero()
}

/// World-space normal of a triangle whose local normal is `normal` and whose
/// transformed corners are `world`.
///
/// Falls back to the winding of the world-space corners when the transform
/// flattens the object, negated for mirroring transforms so both paths agree.
pub fn world_triangle_normal(transform: &Affine3A, normal: Vec3, world: [Vec3; 3]) -> Vec3 {
    let mapped = transform_normal(transform, normal);
    if mapped != Vec3::ZERO {
        return mapped;
    }
    let [a, b, c] = world;
    let face = triangle_normal(a, b, c);
    if Mat3::from(transform.matrix3).determinant() < 0.0 {
        -face
    } else {
        face
    }
}

pub fn is_unit(v: Vec3) -> bool {
    (v.length_squared() - 1.0).abs() < 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_area() {
        let area = triangle_area(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!((area - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_transform_normal_ignores_translation() {
        let transform = Affine3A::from_translation(Vec3::new(4.0, -2.0, 9.0));
        let normal = transform_normal(&transform, Vec3::Z);
        assert!((normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        // A 45 degree slope stretched along X stays perpendicular to the stretched surface.
        let transform = Affine3A::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let (a, b, c) = (Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), Vec3::Y);
        let local = triangle_normal(a, b, c);
        let world = transform_normal(&transform, local);
        let expected = triangle_normal(
            transform.transform_point3(a),
            transform.transform_point3(b),
            transform.transform_point3(c),
        );
        assert!((world - expected).length() < 1e-5);
        assert!(is_unit(world));
    }

    #[test]
    fn test_flattening_transform_uses_world_winding() {
        let transform = Affine3A::from_scale(Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(transform_normal(&transform, Vec3::Z), Vec3::ZERO);

        let world = [Vec3::ZERO, Vec3::X, Vec3::Y].map(|p| transform.transform_point3(p));
        let normal = world_triangle_normal(&transform, Vec3::Z, world);
        assert!((normal - Vec3::Z).length() < 1e-6);

        // A slope squashed flat along Y still gets a unit normal
        let squash = Affine3A::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let slope = [Vec3::ZERO, Vec3::X, Vec3::new(0.0, 1.0, 1.0)];
        let local = triangle_normal(slope[0], slope[1], slope[2]);
        let normal = world_triangle_normal(&squash, local, slope.map(|p| squash.transform_point3(p)));
        assert!(is_unit(normal));
        assert!((normal - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_mirroring_keeps_inverse_transpose_result() {
        let mirror = Affine3A::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        let world = [Vec3::ZERO, Vec3::X, Vec3::Y].map(|p| mirror.transform_point3(p));
        let normal = world_triangle_normal(&mirror, Vec3::Z, world);
        assert!((normal - Vec3::Z).length() < 1e-6);
    }
}
