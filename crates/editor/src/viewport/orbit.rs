use glam::Vec2;

use crate::interaction::CameraOrbitArbiter;
use crate::settings::CameraSettings;

use super::camera::ArcBallCamera;

/// Turns pointer gestures into camera motion, gated by the orbit arbiter.
///
/// Rotation is accumulated and eased in over several updates; pan and zoom
/// are applied immediately.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Rotation still to be applied, in degrees (yaw, pitch)
    pending: Vec2,
    pub auto_rotate: bool,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    damping: f32,
    auto_rotate_speed: f32,
}

impl OrbitController {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            pending: Vec2::ZERO,
            auto_rotate: false,
            rotate_speed: settings.rotate_speed,
            pan_speed: settings.pan_speed,
            zoom_speed: settings.zoom_speed,
            damping: settings.damping,
            auto_rotate_speed: settings.auto_rotate_speed,
        }
    }

    /// Queue a rotation from a pointer delta in pixels
    pub fn rotate(&mut self, arbiter: &CameraOrbitArbiter, delta: Vec2) {
        if !arbiter.is_enabled() {
            return;
        }
        self.pending += Vec2::new(-delta.x, delta.y) * self.rotate_speed;
    }

    pub fn pan(&mut self, camera: &mut ArcBallCamera, arbiter: &CameraOrbitArbiter, delta: Vec2) {
        if !arbiter.is_enabled() {
            return;
        }
        camera.pan(-delta.x * self.pan_speed, delta.y * self.pan_speed);
    }

    /// Zoom by a scroll amount (positive moves closer)
    pub fn zoom(&mut self, camera: &mut ArcBallCamera, arbiter: &CameraOrbitArbiter, scroll: f32) {
        if !arbiter.is_enabled() {
            return;
        }
        camera.zoom(scroll * self.zoom_speed);
    }

    /// Advance damping and auto-rotation by `dt` seconds
    pub fn update(&mut self, camera: &mut ArcBallCamera, arbiter: &CameraOrbitArbiter, dt: f32) {
        if !arbiter.is_enabled() {
            // Drop momentum so the camera does not jump once a drag ends
            self.pending = Vec2::ZERO;
            return;
        }

        if self.auto_rotate {
            self.pending.x += self.auto_rotate_speed * dt.max(0.0);
        }

        let step = if self.damping > 0.0 && self.damping < 1.0 {
            self.pending * self.damping
        } else {
            self.pending
        };
        self.pending -= step;
        if self.pending.length_squared() < 1e-8 {
            self.pending = Vec2::ZERO;
        }
        if step != Vec2::ZERO {
            camera.rotate(step.x, step.y);
        }
    }

    /// True while queued rotation remains
    pub fn is_moving(&self) -> bool {
        self.pending != Vec2::ZERO
    }

    pub fn stop(&mut self) {
        self.pending = Vec2::ZERO;
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ArcBallCamera {
        let mut cam = ArcBallCamera::default();
        cam.yaw = 0.0;
        cam.pitch = 0.0;
        cam
    }

    #[test]
    fn test_rotation_eases_in() {
        let mut cam = camera();
        let arbiter = CameraOrbitArbiter::new();
        let mut orbit = OrbitController::default();

        orbit.rotate(&arbiter, Vec2::new(-100.0, 0.0));
        orbit.update(&mut cam, &arbiter, 1.0 / 60.0);
        let first = cam.yaw;
        assert!(first > 0.0);
        assert!(orbit.is_moving());

        for _ in 0..2000 {
            orbit.update(&mut cam, &arbiter, 1.0 / 60.0);
        }
        let total = (100.0 * CameraSettings::default().rotate_speed).to_radians();
        assert!((cam.yaw - total).abs() < 1e-3);
        assert!(!orbit.is_moving());
    }

    #[test]
    fn test_damping_step_ignores_frame_time() {
        let arbiter = CameraOrbitArbiter::new();
        let damping = CameraSettings::default().damping;
        let mut yaws = Vec::new();
        for dt in [1.0 / 144.0, 1.0 / 30.0, 0.5] {
            let mut cam = camera();
            let mut orbit = OrbitController::default();
            orbit.rotate(&arbiter, Vec2::new(-100.0, 0.0));
            orbit.update(&mut cam, &arbiter, dt);
            yaws.push(cam.yaw);
        }
        let queued = (100.0 * CameraSettings::default().rotate_speed).to_radians();
        for yaw in yaws {
            assert!((yaw - queued * damping).abs() < 1e-6, "{yaw}");
        }
    }

    #[test]
    fn test_suspended_arbiter_blocks_gestures() {
        let mut cam = camera();
        let mut arbiter = CameraOrbitArbiter::new();
        let mut orbit = OrbitController::default();
        let before = cam.distance;

        arbiter.suspend();
        orbit.rotate(&arbiter, Vec2::new(50.0, 20.0));
        orbit.zoom(&mut cam, &arbiter, 100.0);
        orbit.pan(&mut cam, &arbiter, Vec2::new(10.0, 10.0));
        orbit.update(&mut cam, &arbiter, 0.1);

        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.distance, before);
        assert!(!orbit.is_moving());
    }

    #[test]
    fn test_suspension_drops_momentum() {
        let mut cam = camera();
        let mut arbiter = CameraOrbitArbiter::new();
        let mut orbit = OrbitController::default();

        orbit.rotate(&arbiter, Vec2::new(80.0, 0.0));
        arbiter.suspend();
        orbit.update(&mut cam, &arbiter, 0.1);
        arbiter.resume();
        orbit.update(&mut cam, &arbiter, 0.1);
        assert_eq!(cam.yaw, 0.0);
    }

    #[test]
    fn test_auto_rotate_advances_yaw() {
        let mut cam = camera();
        let arbiter = CameraOrbitArbiter::new();
        let mut orbit = OrbitController::default();
        orbit.auto_rotate = true;
        for _ in 0..10 {
            orbit.update(&mut cam, &arbiter, 0.1);
        }
        assert!(cam.yaw > 0.0);
    }
}
