//! Ray casting against an explicit candidate set.
//!
//! Picking never walks the whole scene: callers pass the candidates that are
//! eligible in the current interaction mode, and each candidate is tested
//! together with its descendants. Everything here is a pure function of its
//! inputs.

use std::collections::HashSet;

use glam::{Mat4, Vec3};
use shared::Primitive;

use crate::scene::{NodeId, SceneGraph};

use super::camera::ArcBallCamera;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray expressed in another space (direction is not renormalised)
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of the given full size centred on the origin
    pub fn centered(size: Vec3) -> Self {
        Self {
            min: -size * 0.5,
            max: size * 0.5,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Infinite plane through `point`
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }
}

/// Tuning for primitives without a surface
#[derive(Debug, Clone, Copy)]
pub struct PickOptions {
    /// World-space distance within which a polyline counts as hit
    pub line_threshold: f32,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            line_threshold: 5.0,
        }
    }
}

/// One intersection, nearest first in a pick result
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Mesh that was hit
    pub node: NodeId,
    /// Candidate the mesh belongs to (the mesh itself or an ancestor)
    pub candidate: NodeId,
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest non-negative ray parameter hitting a sphere, if any
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - a * c;
    if a == 0.0 || disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t_near = (-b - sq) / a;
    let t_far = (-b + sq) / a;
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        // Origin inside the sphere
        Some(t_far)
    } else {
        None
    }
}

/// Intersection of a ray with a plane, in front of the origin
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    let denom = ray.direction.dot(plane.normal);
    if denom.abs() < 1e-6 {
        return None; // Ray parallel to plane
    }

    let t = (plane.point - ray.origin).dot(plane.normal) / denom;
    if t < 0.0 {
        return None; // Intersection behind camera
    }

    Some(ray.point_at(t))
}

/// Closest approach between a ray and a segment.
/// Returns (distance between them, ray parameter at the closest point).
pub fn ray_segment_distance(ray: &Ray, seg_start: Vec3, seg_end: Vec3) -> (f32, f32) {
    let u = ray.direction;
    let v = seg_end - seg_start;
    let w = ray.origin - seg_start;

    let a = u.dot(u); // always >= 0
    let b = u.dot(v);
    let c = v.dot(v); // always >= 0
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc);

    if denom <= 1e-6 * a * c {
        // Nearly parallel: the gap is constant, so take the segment point
        // nearest the origin along the ray
        let s_start = -d / a;
        let s_end = s_start + b / a;
        if s_start.min(s_end) > 0.0 {
            // Segment lies wholly ahead; its first point along the ray
            if s_start <= s_end {
                sc = s_start;
                tc = 0.0;
            } else {
                sc = s_end;
                tc = 1.0;
            }
        } else {
            sc = 0.0;
            tc = if c > 0.0 { e / c } else { 0.0 };
        }
    } else {
        sc = (b * e - c * d) / denom;
        tc = (a * e - b * d) / denom;
    }

    let tc = tc.clamp(0.0, 1.0);
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_seg = seg_start + v * tc;

    ((closest_ray - closest_seg).length(), sc)
}

/// Intersect a world ray with one primitive placed by `world`.
/// Returns the world-space hit point.
fn intersect_primitive(
    ray: &Ray,
    world: &Mat4,
    primitive: &Primitive,
    double_sided: bool,
    opts: &PickOptions,
) -> Option<Vec3> {
    if let Primitive::Polyline { points } = primitive {
        // Threshold is a world distance, so test in world space
        let pts: Vec<Vec3> = points
            .iter()
            .map(|p| world.transform_point3(Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32)))
            .collect();
        let mut best: Option<f32> = None;
        for seg in pts.windows(2) {
            let (dist, t) = ray_segment_distance(ray, seg[0], seg[1]);
            if dist <= opts.line_threshold && best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
        return best.map(|t| ray.point_at(t));
    }

    // Singular transforms (a wall scaled to zero height) cannot be hit
    if world.determinant().abs() < 1e-12 {
        return None;
    }
    let local = ray.transformed(&world.inverse());

    let t = match primitive {
        Primitive::Plane { width, height } => {
            if !double_sided && local.direction.z >= 0.0 {
                return None;
            }
            let hw = *width as f32 * 0.5;
            let hh = *height as f32 * 0.5;
            let a = Vec3::new(-hw, -hh, 0.0);
            let b = Vec3::new(hw, -hh, 0.0);
            let c = Vec3::new(hw, hh, 0.0);
            let d = Vec3::new(-hw, hh, 0.0);
            match (
                ray_triangle_intersect(&local, a, b, c),
                ray_triangle_intersect(&local, a, c, d),
            ) {
                (Some(t1), Some(t2)) => Some(t1.min(t2)),
                (t1, t2) => t1.or(t2),
            }
        }
        Primitive::Box {
            width,
            height,
            depth,
        } => ray_aabb(
            &local,
            &Aabb::centered(Vec3::new(*width as f32, *height as f32, *depth as f32)),
        ),
        Primitive::Sphere { radius } => ray_sphere(&local, Vec3::ZERO, *radius as f32),
        Primitive::Polyline { .. } => None,
    }?;

    Some(world.transform_point3(local.point_at(t)))
}

/// Intersect a world ray with the candidates and their descendants.
/// Hits are sorted by ascending distance; each mesh is reported at most once.
pub fn intersect_candidates(
    ray: &Ray,
    scene: &SceneGraph,
    candidates: &[NodeId],
    opts: &PickOptions,
) -> Vec<Hit> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    for &candidate in candidates {
        for id in scene.descendants(candidate) {
            if !seen.insert(id) {
                continue;
            }
            let Some(drawable) = scene.node(id).and_then(|n| n.drawable()) else {
                continue;
            };
            let Some(world) = scene.world_matrix(id) else {
                continue;
            };
            if let Some(point) = intersect_primitive(
                ray,
                &world,
                &drawable.primitive,
                drawable.material.double_sided,
                opts,
            ) {
                hits.push(Hit {
                    node: id,
                    candidate,
                    distance: (point - ray.origin).length(),
                    point,
                });
            }
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Pick under a pointer position.
///
/// `rect` is the interactive surface. Pointers outside it and empty
/// candidate sets produce no hits.
pub fn pick(
    pointer: egui::Pos2,
    rect: egui::Rect,
    camera: &ArcBallCamera,
    scene: &SceneGraph,
    candidates: &[NodeId],
    opts: &PickOptions,
) -> Vec<Hit> {
    if candidates.is_empty() || !rect.contains(pointer) || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Vec::new();
    }
    let ray = camera.screen_ray(pointer, rect);
    intersect_candidates(&ray, scene, candidates, opts)
}

/// True when something in `candidates` sits between the camera and `point`
pub fn is_point_occluded(
    point: Vec3,
    camera: &ArcBallCamera,
    scene: &SceneGraph,
    candidates: &[NodeId],
    opts: &PickOptions,
) -> bool {
    let eye = camera.eye_position();
    let to_point = point - eye;
    let point_distance = to_point.length();
    if point_distance <= f32::EPSILON {
        return false;
    }
    let ray = Ray {
        origin: eye,
        direction: to_point / point_distance,
    };
    intersect_candidates(&ray, scene, candidates, opts)
        .first()
        .is_some_and(|hit| hit.distance < point_distance - 1e-3 * point_distance.max(1.0))
}
