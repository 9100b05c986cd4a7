//! Outline geometry for drawing primitives as lines

use glam::Vec3;
use shared::Primitive;

use crate::scene::SceneGraph;

const SPHERE_SEGMENTS: usize = 24;

/// A coloured world-space line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [u8; 3],
}

fn v(p: [f64; 3]) -> Vec3 {
    Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32)
}

/// Outline of a primitive in its local space
pub fn local_segments(primitive: &Primitive) -> Vec<(Vec3, Vec3)> {
    match primitive {
        Primitive::Plane { width, height } => {
            let hw = *width as f32 * 0.5;
            let hh = *height as f32 * 0.5;
            let c = [
                Vec3::new(-hw, -hh, 0.0),
                Vec3::new(hw, -hh, 0.0),
                Vec3::new(hw, hh, 0.0),
                Vec3::new(-hw, hh, 0.0),
            ];
            let mut out: Vec<_> = (0..4).map(|i| (c[i], c[(i + 1) % 4])).collect();
            // Diagonal so flat planes read as surfaces
            out.push((c[0], c[2]));
            out
        }
        Primitive::Box {
            width,
            height,
            depth,
        } => {
            let h = Vec3::new(*width as f32, *height as f32, *depth as f32) * 0.5;
            let corner = |i: usize| {
                Vec3::new(
                    if i & 1 == 0 { -h.x } else { h.x },
                    if i & 2 == 0 { -h.y } else { h.y },
                    if i & 4 == 0 { -h.z } else { h.z },
                )
            };
            let mut out = Vec::with_capacity(12);
            for i in 0..8 {
                for bit in [1, 2, 4] {
                    if i & bit == 0 {
                        out.push((corner(i), corner(i | bit)));
                    }
                }
            }
            out
        }
        Primitive::Sphere { radius } => {
            let r = *radius as f32;
            let mut out = Vec::with_capacity(SPHERE_SEGMENTS * 3);
            let step = std::f32::consts::TAU / SPHERE_SEGMENTS as f32;
            for i in 0..SPHERE_SEGMENTS {
                let (s0, c0) = (i as f32 * step).sin_cos();
                let (s1, c1) = ((i + 1) as f32 * step).sin_cos();
                out.push((Vec3::new(c0, s0, 0.0) * r, Vec3::new(c1, s1, 0.0) * r));
                out.push((Vec3::new(c0, 0.0, s0) * r, Vec3::new(c1, 0.0, s1) * r));
                out.push((Vec3::new(0.0, c0, s0) * r, Vec3::new(0.0, c1, s1) * r));
            }
            out
        }
        Primitive::Polyline { points } => points.windows(2).map(|w| (v(w[0]), v(w[1]))).collect(),
    }
}

/// Every mesh outline in the scene, in world space, coloured for display
pub fn world_segments(scene: &SceneGraph, highlight: [u8; 3]) -> Vec<WireSegment> {
    let mut out = Vec::new();
    for id in scene.meshes_under(scene.root()) {
        let (Some(node), Some(world)) = (scene.node(id), scene.world_matrix(id)) else {
            continue;
        };
        let Some(drawable) = node.drawable() else {
            continue;
        };
        let color = drawable.material.display_color(highlight);
        for (a, b) in local_segments(&drawable.primitive) {
            out.push(WireSegment {
                start: world.transform_point3(a),
                end: world.transform_point3(b),
                color,
            });
        }
    }
    out
}
