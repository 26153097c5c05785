use super::mesh::TriMesh;
use crate::materials::SurfaceMaterial;
use crate::math::{Affine3A, NUM_BANDS, Spectrum, Vec3};

/// The acoustic role of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nature {
    /// Reflective geometry
    #[default]
    Geometry,
    /// An acoustic source
    Source,
    /// An acoustic receiver
    Receiver,
}

/// Per-object acoustic properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProps {
    /// Whether the object should be considered in the simulation
    pub enable: bool,
    pub nature: Nature,
    /// Source power per band in dB
    pub power_db: Spectrum,
    /// Source equalization per band in dB
    pub eq_db: Spectrum,
    /// Source delay in seconds
    pub delay: f32,
}

impl Default for ObjectProps {
    fn default() -> Self {
        Self {
            enable: true,
            nature: Nature::Geometry,
            power_db: [80.0; NUM_BANDS],
            eq_db: [0.0; NUM_BANDS],
            delay: 0.0,
        }
    }
}

/// Read-only view of an object in the host scene.
///
/// Implement this for the host's object type to feed it to
/// [`extract_scene`](super::extract_scene). [`SceneEntity`] is a plain in-memory
/// implementation.
pub trait SceneObject {
    fn name(&self) -> &str;

    fn props(&self) -> &ObjectProps;

    /// Object to world transform
    fn world_transform(&self) -> Affine3A;

    /// World-space position of the object origin
    fn location(&self) -> Vec3 {
        self.world_transform().translation.into()
    }

    /// Mesh data, `None` for objects that are not meshes
    fn mesh(&self) -> Option<&TriMesh>;

    /// Acoustic settings of the object's active material
    fn active_material(&self) -> Option<&SurfaceMaterial>;
}

impl<T: SceneObject + ?Sized> SceneObject for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn props(&self) -> &ObjectProps {
        (**self).props()
    }

    fn world_transform(&self) -> Affine3A {
        (**self).world_transform()
    }

    fn location(&self) -> Vec3 {
        (**self).location()
    }

    fn mesh(&self) -> Option<&TriMesh> {
        (**self).mesh()
    }

    fn active_material(&self) -> Option<&SurfaceMaterial> {
        (**self).active_material()
    }
}

/// In-memory scene object.
///
/// # Example
///
/// ```
/// use acoustray::math::Vec3;
/// use acoustray::scene::SceneEntity;
///
/// let speaker = SceneEntity::source("speaker", Vec3::new(1.0, 2.0, 1.5));
/// let mic = SceneEntity::receiver("mic", Vec3::new(-1.0, 0.0, 1.2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub name: String,
    pub props: ObjectProps,
    pub transform: Affine3A,
    pub mesh: Option<TriMesh>,
    pub material: Option<SurfaceMaterial>,
}

impl SceneEntity {
    /// Reflective geometry without a material assigned yet
    pub fn geometry(name: impl Into<String>, mesh: TriMesh) -> Self {
        Self {
            name: name.into(),
            props: ObjectProps::default(),
            transform: Affine3A::IDENTITY,
            mesh: Some(mesh),
            material: None,
        }
    }

    pub fn source(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            props: ObjectProps {
                nature: Nature::Source,
                ..Default::default()
            },
            transform: Affine3A::from_translation(position),
            mesh: None,
            material: None,
        }
    }

    pub fn receiver(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            props: ObjectProps {
                nature: Nature::Receiver,
                ..Default::default()
            },
            transform: Affine3A::from_translation(position),
            mesh: None,
            material: None,
        }
    }

    pub fn with_material(mut self, material: SurfaceMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_transform(mut self, transform: Affine3A) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_props(mut self, props: ObjectProps) -> Self {
        self.props = props;
        self
    }

    pub fn enabled(mut self, enable: bool) -> Self {
        self.props.enable = enable;
        self
    }
}

impl SceneObject for SceneEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn props(&self) -> &ObjectProps {
        &self.props
    }

    fn world_transform(&self) -> Affine3A {
        self.transform
    }

    fn mesh(&self) -> Option<&TriMesh> {
        self.mesh.as_ref()
    }

    fn active_material(&self) -> Option<&SurfaceMaterial> {
        self.material.as_ref()
    }
}
