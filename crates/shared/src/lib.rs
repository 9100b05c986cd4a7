use serde::{Deserialize, Serialize};

pub mod parameters;

pub use parameters::{recompute, ParameterError, ParameterResult, RoofParameters, RoofSolution};

/// Node transform as stored in asset files.
///
/// Rotation is an Euler XYZ triple in radians, applied as `T * R * S`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Identity transform moved to `position`
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Drawable geometry, always defined in the node's local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Plane in local XY centred on the origin
    Plane { width: f64, height: f64 },
    /// Axis-aligned box centred on the origin
    Box { width: f64, height: f64, depth: f64 },
    Sphere { radius: f64 },
    /// Open polyline through the given points
    Polyline { points: Vec<[f64; 3]> },
}

impl Primitive {
    /// Check that the dimensions describe real geometry
    pub fn validate(&self) -> Result<(), String> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be positive, got {v}"))
            }
        };
        match self {
            Primitive::Plane { width, height } => {
                positive("plane width", *width)?;
                positive("plane height", *height)
            }
            Primitive::Box {
                width,
                height,
                depth,
            } => {
                positive("box width", *width)?;
                positive("box height", *height)?;
                positive("box depth", *depth)
            }
            Primitive::Sphere { radius } => positive("sphere radius", *radius),
            Primitive::Polyline { points } => {
                if points.len() < 2 {
                    return Err(format!("polyline needs 2 points, got {}", points.len()));
                }
                if points.iter().flatten().any(|c| !c.is_finite()) {
                    return Err("polyline contains a non-finite coordinate".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Surface appearance of a drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    /// Base colour RGB
    pub color: [u8; 3],
    #[serde(default = "default_true")]
    pub double_sided: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            double_sided: true,
        }
    }
}

/// What a described node is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Group {
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    Mesh {
        primitive: Primitive,
        #[serde(default)]
        material: MaterialDesc,
    },
}

/// A node tree as produced by the asset loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl NodeDescription {
    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        match &self.kind {
            NodeKind::Group { children } => {
                1 + children.iter().map(NodeDescription::node_count).sum::<usize>()
            }
            NodeKind::Mesh { .. } => 1,
        }
    }

    /// Validate every primitive in the subtree
    pub fn validate(&self) -> Result<(), String> {
        match &self.kind {
            NodeKind::Group { children } => children.iter().try_for_each(|c| c.validate()),
            NodeKind::Mesh { primitive, .. } => primitive
                .validate()
                .map_err(|e| format!("node '{}': {e}", self.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_from_json() {
        let json = r#"{
            "name": "inverter",
            "kind": "group",
            "children": [
                {"name": "body", "kind": "mesh", "primitive": {"type": "box", "width": 2, "height": 1, "depth": 1}},
                {"name": "lid", "kind": "mesh", "transform": {"position": [0, 1, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]},
                 "primitive": {"type": "plane", "width": 2, "height": 1}, "material": {"color": [200, 0, 0]}}
            ]
        }"#;
        let desc: NodeDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.node_count(), 3);
        assert_eq!(desc.transform, Transform::new());
        assert!(desc.validate().is_ok());

        let NodeKind::Group { children } = &desc.kind else {
            panic!("expected group");
        };
        let NodeKind::Mesh { material, .. } = &children[1].kind else {
            panic!("expected mesh");
        };
        assert_eq!(material.color, [200, 0, 0]);
        assert!(material.double_sided);
    }

    #[test]
    fn test_validate_rejects_flat_box() {
        let desc = NodeDescription {
            name: "flat".to_string(),
            transform: Transform::new(),
            kind: NodeKind::Mesh {
                primitive: Primitive::Box {
                    width: 1.0,
                    height: 0.0,
                    depth: 1.0,
                },
                material: MaterialDesc::default(),
            },
        };
        let err = desc.validate().unwrap_err();
        assert!(err.contains("flat"));
        assert!(err.contains("box height"));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let p = Primitive::Polyline {
            points: vec![[0.0, 0.0, 0.0]],
        };
        assert!(p.validate().is_err());
    }
}
