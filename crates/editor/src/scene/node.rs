use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{MaterialDesc, Primitive};
use uuid::Uuid;

/// Typed handle for a node, issued when the node is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First block of the UUID is enough to tell nodes apart in logs
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Local transform of a node: `T * R * S`, rotation as Euler XYZ radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local matrix (parent space ← node space)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<&shared::Transform> for NodeTransform {
    fn from(t: &shared::Transform) -> Self {
        let v = |a: [f64; 3]| Vec3::new(a[0] as f32, a[1] as f32, a[2] as f32);
        Self {
            position: v(t.position),
            rotation: v(t.rotation),
            scale: v(t.scale),
        }
    }
}

/// Surface state of a drawable
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: [u8; 3],
    pub double_sided: bool,
    /// Set by the selection highlighter
    pub highlighted: bool,
}

impl Material {
    pub fn new(color: [u8; 3]) -> Self {
        Self {
            color,
            double_sided: true,
            highlighted: false,
        }
    }

    /// Colour to draw with, given the configured highlight colour
    pub fn display_color(&self, highlight: [u8; 3]) -> [u8; 3] {
        if self.highlighted {
            highlight
        } else {
            self.color
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            color: desc.color,
            double_sided: desc.double_sided,
            highlighted: false,
        }
    }
}

/// Geometry plus material of a mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub primitive: Primitive,
    pub material: Material,
}

impl Drawable {
    pub fn new(primitive: Primitive, material: Material) -> Self {
        Self { primitive, material }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNodeKind {
    Group,
    Mesh(Drawable),
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub transform: NodeTransform,
    pub kind: SceneNodeKind,
    /// Position captured once before the first constrained drag
    pub initial_position: Option<Vec3>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>, transform: NodeTransform, kind: SceneNodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            transform,
            kind,
            initial_position: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, SceneNodeKind::Group)
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            SceneNodeKind::Mesh(d) => Some(d),
            SceneNodeKind::Group => None,
        }
    }

    pub fn drawable_mut(&mut self) -> Option<&mut Drawable> {
        match &mut self.kind {
            SceneNodeKind::Mesh(d) => Some(d),
            SceneNodeKind::Group => None,
        }
    }
}
