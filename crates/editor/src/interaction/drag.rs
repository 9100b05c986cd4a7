//! Constrained dragging of scene handles.
//!
//! A press on a drag candidate arms a [`DragSession`]; pointer moves slide the
//! target across a camera-facing plane through its world position and the
//! result is projected onto the handle's [`AxisConstraint`]. The orbit camera
//! is suspended for the lifetime of the session.

use std::collections::HashMap;

use glam::{BVec3, Vec3};

use crate::scene::{NodeId, SceneGraph};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::picking::{self, PickOptions, Plane, Ray};

use super::arbiter::CameraOrbitArbiter;
use super::candidates::{CandidateSet, TargetPolicy};

/// Drag controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pressed on a handle, not moved yet
    Armed,
    Dragging,
    /// Session torn down; the next press starts over
    Released,
}

/// Degrees of freedom of a dragged node, in its parent's space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstraint {
    /// Axes that follow the pointer; the rest stay at the initial position
    pub free: BVec3,
    /// Lower bound applied to every free axis
    pub floor: Option<f32>,
}

impl AxisConstraint {
    /// Moves on every axis
    pub const FREE: Self = Self {
        free: BVec3::TRUE,
        floor: None,
    };

    /// Y only, with X/Z pinned
    pub fn vertical(floor: Option<f32>) -> Self {
        Self {
            free: BVec3::new(false, true, false),
            floor,
        }
    }

    /// Project a proposed position onto the permitted degrees of freedom.
    /// Locked axes are copied from `initial` exactly.
    pub fn project(&self, proposed: Vec3, initial: Vec3) -> Vec3 {
        let mut out = Vec3::select(self.free, proposed, initial);
        if let Some(floor) = self.floor {
            for axis in 0..3 {
                if self.free.test(axis) && out[axis] < floor {
                    out[axis] = floor;
                }
            }
        }
        out
    }

    /// First free coordinate of `position`, the value a handle publishes
    pub fn primary_value(&self, position: Vec3) -> Option<f32> {
        (0..3).find(|&axis| self.free.test(axis)).map(|axis| position[axis])
    }
}

impl Default for AxisConstraint {
    fn default() -> Self {
        Self::FREE
    }
}

/// Registration of a constrained handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSpec {
    pub constraint: AxisConstraint,
    /// Whether moves report the free coordinate to the caller
    pub publishes: bool,
}

/// Screen-side inputs a pick needs
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub camera: &'a ArcBallCamera,
    pub rect: egui::Rect,
    pub pick: PickOptions,
}

/// State of one press-move-release cycle
#[derive(Debug, Clone)]
pub struct DragSession {
    pub target: NodeId,
    pub spec: HandleSpec,
    /// Local position captured before the first drag of this node
    pub initial_position: Vec3,
    plane: Plane,
    /// Where the press ray met the drag plane
    grab_point: Vec3,
    /// grab_point minus the target's world position at press time
    offset: Vec3,
    suspended_camera: bool,
}

impl DragSession {
    pub fn grab_point(&self) -> Vec3 {
        self.grab_point
    }
}

#[derive(Debug, Default)]
pub struct DragConstraintController {
    phase: DragPhase,
    handles: HashMap<NodeId, HandleSpec>,
    session: Option<DragSession>,
}

impl DragConstraintController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handle(&mut self, node: NodeId, constraint: AxisConstraint, publishes: bool) {
        self.handles.insert(
            node,
            HandleSpec {
                constraint,
                publishes,
            },
        );
    }

    pub fn unregister_handle(&mut self, node: NodeId) {
        self.handles.remove(&node);
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// True while a session is armed or dragging
    pub fn is_active(&self) -> bool {
        matches!(self.phase, DragPhase::Armed | DragPhase::Dragging)
    }

    /// Try to start a session at `pointer`. Returns the dragged node.
    pub fn pointer_down(
        &mut self,
        pointer: egui::Pos2,
        view: &ViewContext<'_>,
        scene: &mut SceneGraph,
        candidates: &CandidateSet,
        arbiter: &mut CameraOrbitArbiter,
    ) -> Option<NodeId> {
        if self.is_active() {
            // A second press without a release: tear the old session down first
            tracing::warn!("Pointer down during an active drag; releasing previous session");
            self.release(arbiter);
        }
        if self.phase == DragPhase::Released {
            self.phase = DragPhase::Idle;
        }

        let hits = picking::pick(
            pointer,
            view.rect,
            view.camera,
            scene,
            candidates.nodes(),
            &view.pick,
        );
        let hit = hits.first()?;
        let target = match candidates.policy {
            TargetPolicy::Hit => hit.node,
            TargetPolicy::Candidate => hit.candidate,
        };

        let initial_position = scene.capture_initial_position(target)?;
        let world_position = scene.world_position(target)?;
        let ray = view.camera.screen_ray(pointer, view.rect);
        let plane = Plane::from_normal_and_point(view.camera.forward(), world_position);
        let grab_point = picking::ray_plane(&ray, &plane).unwrap_or(hit.point);

        let spec = self.handles.get(&target).copied().unwrap_or(HandleSpec {
            constraint: AxisConstraint::FREE,
            publishes: false,
        });

        arbiter.suspend();
        self.session = Some(DragSession {
            target,
            spec,
            initial_position,
            plane,
            grab_point,
            offset: grab_point - world_position,
            suspended_camera: true,
        });
        self.phase = DragPhase::Armed;
        tracing::debug!("Drag armed on {}", target);
        Some(target)
    }

    /// Move the target along the drag plane. Returns the published
    /// coordinate when the handle publishes one.
    pub fn pointer_move(&mut self, ray: &Ray, scene: &mut SceneGraph) -> Option<f32> {
        if !self.is_active() {
            return None;
        }
        let session = self.session.as_ref()?;

        let Some(on_plane) = picking::ray_plane(ray, &session.plane) else {
            // Parallel to the plane: keep the last position
            return None;
        };
        let parent_world = scene.parent_world_matrix(session.target)?;
        if parent_world.determinant().abs() < 1e-12 {
            return None;
        }
        let local = parent_world
            .inverse()
            .transform_point3(on_plane - session.offset);
        let constrained = session
            .spec
            .constraint
            .project(local, session.initial_position);

        let target = session.target;
        let spec = session.spec;
        if scene.set_position(target, constrained).is_err() {
            tracing::warn!("Drag target {} no longer exists", target);
            return None;
        }
        self.phase = DragPhase::Dragging;

        if spec.publishes {
            spec.constraint.primary_value(constrained)
        } else {
            None
        }
    }

    pub fn pointer_up(&mut self, arbiter: &mut CameraOrbitArbiter) {
        self.release(arbiter);
    }

    pub fn pointer_cancel(&mut self, arbiter: &mut CameraOrbitArbiter) {
        self.release(arbiter);
    }

    fn release(&mut self, arbiter: &mut CameraOrbitArbiter) {
        match self.session.take() {
            Some(session) => {
                if session.suspended_camera {
                    arbiter.resume();
                }
                self.phase = DragPhase::Released;
                tracing::debug!("Drag released on {}", session.target);
            }
            None => {
                tracing::debug!("Release with no active drag; ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::candidates::{CandidatePool, InteractionMode};
    use crate::scene::{Drawable, Material, NodeTransform};
    use shared::Primitive;

    struct Fixture {
        scene: SceneGraph,
        camera: ArcBallCamera,
        rect: egui::Rect,
        pool: CandidatePool,
        arbiter: CameraOrbitArbiter,
        drag: DragConstraintController,
        handle: NodeId,
    }

    fn fixture() -> Fixture {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let handle = scene
            .add_group(root, "handle", NodeTransform::at(Vec3::new(0.0, 100.0, 0.0)))
            .unwrap();
        scene
            .add_mesh(
                handle,
                "ball",
                NodeTransform::IDENTITY,
                Drawable::new(Primitive::Sphere { radius: 10.0 }, Material::new([0, 255, 0])),
            )
            .unwrap();

        let mut camera = ArcBallCamera::default();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        camera.distance = 1000.0;
        camera.target = Vec3::new(0.0, 100.0, 0.0);
        camera.set_viewport_size(800.0, 600.0);

        let mut pool = CandidatePool::new();
        pool.assign(InteractionMode::Drag, vec![handle], TargetPolicy::Candidate);

        let mut drag = DragConstraintController::new();
        drag.register_handle(handle, AxisConstraint::vertical(Some(0.0)), true);

        Fixture {
            scene,
            camera,
            rect: egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0)),
            pool,
            arbiter: CameraOrbitArbiter::new(),
            drag,
            handle,
        }
    }

    impl Fixture {
        fn press(&mut self, pos: egui::Pos2) -> Option<NodeId> {
            let view = ViewContext {
                camera: &self.camera,
                rect: self.rect,
                pick: PickOptions::default(),
            };
            self.drag.pointer_down(
                pos,
                &view,
                &mut self.scene,
                self.pool.set(InteractionMode::Drag),
                &mut self.arbiter,
            )
        }

        fn move_to_world(&mut self, p: Vec3) -> Option<f32> {
            let screen = self.camera.project(p, self.rect).unwrap();
            let ray = self.camera.screen_ray(screen, self.rect);
            self.drag.pointer_move(&ray, &mut self.scene)
        }
    }

    #[test]
    fn test_projection_pins_locked_axes() {
        let c = AxisConstraint::vertical(Some(0.0));
        let initial = Vec3::new(500.0, 200.0, 0.0);
        let out = c.project(Vec3::new(512.3, 321.0, -7.5), initial);
        assert_eq!(out, Vec3::new(500.0, 321.0, 0.0));
    }

    #[test]
    fn test_projection_clamps_to_floor() {
        let c = AxisConstraint::vertical(Some(0.0));
        let out = c.project(Vec3::new(1.0, -40.0, 1.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn test_press_miss_stays_idle() {
        let mut f = fixture();
        assert!(f.press(egui::pos2(10.0, 10.0)).is_none());
        assert_eq!(f.drag.phase(), DragPhase::Idle);
        assert!(f.arbiter.is_enabled());
    }

    #[test]
    fn test_press_arms_and_suspends_camera() {
        let mut f = fixture();
        let target = f.press(f.rect.center());
        assert_eq!(target, Some(f.handle));
        assert_eq!(f.drag.phase(), DragPhase::Armed);
        assert!(!f.arbiter.is_enabled());
        assert_eq!(
            f.scene.node(f.handle).unwrap().initial_position,
            Some(Vec3::new(0.0, 100.0, 0.0))
        );
    }

    #[test]
    fn test_move_publishes_height_and_pins_axes() {
        let mut f = fixture();
        f.press(f.rect.center());
        let grab = f.drag.session().unwrap().grab_point();

        let value = f.move_to_world(grab + Vec3::new(37.0, 150.0, 0.0));
        assert_eq!(f.drag.phase(), DragPhase::Dragging);
        let pos = f.scene.node(f.handle).unwrap().transform.position;
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.z, 0.0);
        assert!((pos.y - 250.0).abs() < 0.5, "{pos:?}");
        assert_eq!(value, Some(pos.y));
    }

    #[test]
    fn test_move_below_floor_clamps() {
        let mut f = fixture();
        f.press(f.rect.center());
        let grab = f.drag.session().unwrap().grab_point();
        let value = f.move_to_world(grab + Vec3::new(0.0, -300.0, 0.0));
        assert_eq!(value, Some(0.0));
        assert_eq!(f.scene.node(f.handle).unwrap().transform.position.y, 0.0);
    }

    #[test]
    fn test_release_without_move_resumes_camera() {
        let mut f = fixture();
        f.press(f.rect.center());
        f.drag.pointer_up(&mut f.arbiter);
        assert_eq!(f.drag.phase(), DragPhase::Released);
        assert!(f.arbiter.is_enabled());
    }

    #[test]
    fn test_out_of_state_release_is_noop() {
        let mut f = fixture();
        f.drag.pointer_cancel(&mut f.arbiter);
        f.drag.pointer_up(&mut f.arbiter);
        assert_eq!(f.drag.phase(), DragPhase::Idle);
        assert!(f.arbiter.is_enabled());

        f.press(f.rect.center());
        f.drag.pointer_up(&mut f.arbiter);
        f.drag.pointer_cancel(&mut f.arbiter);
        assert!(f.arbiter.is_enabled());
    }

    #[test]
    fn test_move_after_release_is_ignored() {
        let mut f = fixture();
        f.press(f.rect.center());
        f.drag.pointer_up(&mut f.arbiter);
        let before = f.scene.node(f.handle).unwrap().transform.position;
        assert!(f.move_to_world(Vec3::new(0.0, 400.0, 0.0)).is_none());
        assert_eq!(f.scene.node(f.handle).unwrap().transform.position, before);
    }

    #[test]
    fn test_initial_position_captured_once() {
        let mut f = fixture();
        f.press(f.rect.center());
        let grab = f.drag.session().unwrap().grab_point();
        f.move_to_world(grab + Vec3::new(0.0, 80.0, 0.0));
        f.drag.pointer_up(&mut f.arbiter);

        // Second session starts from the moved position but keeps the first snapshot
        let moved = f.camera.project(Vec3::new(0.0, 180.0, 0.0), f.rect).unwrap();
        assert_eq!(f.press(moved), Some(f.handle));
        assert_eq!(
            f.drag.session().unwrap().initial_position,
            Vec3::new(0.0, 100.0, 0.0)
        );
        f.drag.pointer_up(&mut f.arbiter);
    }

    #[test]
    fn test_unregistered_target_moves_freely_without_publishing() {
        let mut f = fixture();
        f.drag.unregister_handle(f.handle);
        f.press(f.rect.center());
        let grab = f.drag.session().unwrap().grab_point();
        let value = f.move_to_world(grab + Vec3::new(50.0, 0.0, 0.0));
        assert!(value.is_none());
        let pos = f.scene.node(f.handle).unwrap().transform.position;
        assert!((pos.x - 50.0).abs() < 0.5);
    }
}
