//! Shed roof model driven by a single height handle.
//!
//! Layout (world space, `w` = width, `d` = depth, `h` = height):
//!
//! ```text
//! roof group at (-w/2, 0, 0)
//!   bottom  floor plane w × d lying in XZ, centred at (w/2, 0, 0)
//!   top     rafter plane from (0, 0) up to (w, h), length sqrt(w² + h²)
//!   wall    upright plane h × d at x = w
//! handle group at (w/2, h, 0)
//!   front / back spheres at z = ±d/2 and the ridge line between them
//! ```
//!
//! The handle is the only input: its Y coordinate is the roof height.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use shared::{ParameterError, Primitive, RoofParameters, RoofSolution};

use crate::scene::{Drawable, Material, NodeId, NodeTransform, SceneError, SceneGraph};

/// Errors raised while building or updating the roof
#[derive(Debug, Clone, PartialEq)]
pub enum RoofError {
    Parameter(ParameterError),
    Scene(SceneError),
}

impl std::fmt::Display for RoofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoofError::Parameter(e) => write!(f, "Roof parameters rejected: {}", e),
            RoofError::Scene(e) => write!(f, "Roof scene update failed: {}", e),
        }
    }
}

impl std::error::Error for RoofError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoofError::Parameter(e) => Some(e),
            RoofError::Scene(e) => Some(e),
        }
    }
}

impl From<ParameterError> for RoofError {
    fn from(e: ParameterError) -> Self {
        RoofError::Parameter(e)
    }
}

impl From<SceneError> for RoofError {
    fn from(e: SceneError) -> Self {
        RoofError::Scene(e)
    }
}

// ── Colours ───────────────────────────────────────────────

const FLOOR_COLOR: [u8; 3] = [0x00, 0xff, 0x00];
const TOP_COLOR: [u8; 3] = [0xd8, 0x8c, 0x5a];
const WALL_COLOR: [u8; 3] = [0xff, 0xff, 0xff];
const HANDLE_COLOR: [u8; 3] = [0x00, 0xff, 0x00];

/// Handles to the nodes making up one roof
#[derive(Debug, Clone)]
pub struct RoofModel {
    params: RoofParameters,
    solution: RoofSolution,
    pub roof: NodeId,
    pub bottom: NodeId,
    pub top: NodeId,
    pub wall: NodeId,
    pub handle: NodeId,
    pub front_ball: NodeId,
    pub back_ball: NodeId,
    pub ridge: NodeId,
}

impl RoofModel {
    /// Build the roof under `parent`. Nothing is inserted when the
    /// parameters are rejected.
    pub fn build(
        scene: &mut SceneGraph,
        parent: NodeId,
        params: RoofParameters,
        handle_radius: f64,
    ) -> Result<Self, RoofError> {
        let solution = params.solve()?;
        let w = params.width as f32;
        let d = params.depth as f32;
        let h = params.height as f32;

        let roof = scene.add_group(parent, "roof", NodeTransform::at(Vec3::new(-w / 2.0, 0.0, 0.0)))?;

        let unit_plane = Primitive::Plane {
            width: 1.0,
            height: 1.0,
        };
        let bottom = scene.add_mesh(
            roof,
            "bottom",
            NodeTransform::at(Vec3::new(w / 2.0, 0.0, 0.0))
                .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0))
                .with_scale(Vec3::new(w, d, 1.0)),
            Drawable::new(unit_plane.clone(), Material::new(FLOOR_COLOR)),
        )?;
        let top = scene.add_mesh(
            roof,
            "top",
            Self::top_transform(w, d, h, &solution),
            Drawable::new(unit_plane.clone(), Material::new(TOP_COLOR)),
        )?;
        let wall = scene.add_mesh(
            roof,
            "wall",
            Self::wall_transform(w, d, h),
            Drawable::new(unit_plane, Material::new(WALL_COLOR)),
        )?;

        let handle = scene.add_group(parent, "handle", NodeTransform::at(Vec3::new(w / 2.0, h, 0.0)))?;
        let ball = Primitive::Sphere {
            radius: handle_radius,
        };
        let front_ball = scene.add_mesh(
            handle,
            "front_ball",
            NodeTransform::at(Vec3::new(0.0, 0.0, d / 2.0)),
            Drawable::new(ball.clone(), Material::new(HANDLE_COLOR)),
        )?;
        let back_ball = scene.add_mesh(
            handle,
            "back_ball",
            NodeTransform::at(Vec3::new(0.0, 0.0, -d / 2.0)),
            Drawable::new(ball, Material::new(HANDLE_COLOR)),
        )?;
        let half = params.depth / 2.0;
        let ridge = scene.add_mesh(
            handle,
            "ridge",
            NodeTransform::IDENTITY,
            Drawable::new(
                Primitive::Polyline {
                    points: vec![[0.0, 0.0, half], [0.0, 0.0, -half]],
                },
                Material::new(HANDLE_COLOR),
            ),
        )?;

        tracing::info!(
            "Built roof {}×{} at height {} (pitch {:.2}°)",
            params.width,
            params.depth,
            params.height,
            solution.pitch_degrees()
        );

        Ok(Self {
            params,
            solution,
            roof,
            bottom,
            top,
            wall,
            handle,
            front_ball,
            back_ball,
            ridge,
        })
    }

    fn top_transform(w: f32, d: f32, h: f32, solution: &RoofSolution) -> NodeTransform {
        NodeTransform::at(Vec3::new(w / 2.0, h / 2.0, 0.0))
            .with_rotation(Vec3::new(-FRAC_PI_2, -(solution.pitch_angle as f32), 0.0))
            .with_scale(Vec3::new(solution.rafter_length as f32, d, 1.0))
    }

    fn wall_transform(w: f32, d: f32, h: f32) -> NodeTransform {
        NodeTransform::at(Vec3::new(w, h / 2.0, 0.0))
            .with_rotation(Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0))
            .with_scale(Vec3::new(h, d, 1.0))
    }

    pub fn parameters(&self) -> RoofParameters {
        self.params
    }

    pub fn solution(&self) -> RoofSolution {
        self.solution
    }

    pub fn height(&self) -> f64 {
        self.params.height
    }

    /// Recompute the roof for `height` and write the dependent transforms.
    /// On error the scene is left as it was.
    pub fn apply(&mut self, scene: &mut SceneGraph, height: f64) -> Result<RoofSolution, RoofError> {
        let solution = shared::recompute(height, self.params.width, self.params.depth)
            .inspect_err(|e| tracing::warn!("Roof recompute rejected: {}", e))?;
        for id in [self.top, self.wall] {
            if !scene.contains(id) {
                return Err(SceneError::UnknownNode(id).into());
            }
        }

        let w = self.params.width as f32;
        let d = self.params.depth as f32;
        let h = height as f32;

        if let Some(wall) = scene.node_mut(self.wall) {
            wall.transform.scale.x = solution.wall_scale as f32;
            wall.transform.position.y = h / 2.0;
        }
        if let Some(top) = scene.node_mut(self.top) {
            let t = Self::top_transform(w, d, h, &solution);
            top.transform.position = t.position;
            top.transform.rotation = t.rotation;
            top.transform.scale = t.scale;
        }

        self.params.height = height;
        self.solution = solution;
        Ok(solution)
    }

    /// Meshes of the handle group
    pub fn handle_meshes(&self) -> [NodeId; 3] {
        [self.front_ball, self.back_ball, self.ridge]
    }
}
