use glam::{Mat4, Vec3};

use crate::settings::CameraSettings;

use super::picking::Ray;

/// Arc-ball camera for the 3D viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Viewport width / height, kept in sync by `set_viewport_size`
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    min_distance: f32,
    max_distance: f32,
}

impl ArcBallCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            yaw: settings.yaw.to_radians(),
            pitch: settings.pitch.to_radians(),
            distance: settings.distance,
            target: Vec3::from(settings.target),
            fov: settings.fov.to_radians(),
            aspect: 4.0 / 3.0,
            znear: settings.znear,
            zfar: settings.zfar,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(self.min_distance, self.max_distance);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Update the aspect ratio after the viewport was resized.
    /// Degenerate sizes are ignored so the projection never divides by zero.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye_position()).normalize_or_zero()
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.znear, self.zfar)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let right = self.right_vector();
        right.cross(self.forward()).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords inside `rect`
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let p = self.view_projection() * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray from a screen position into the 3D scene.
    ///
    /// `rect` is the interactive surface, which may be offset inside the
    /// window; NDC are computed relative to it.
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        // Camera basis, as used by the view matrix
        let forward = self.forward();
        let right = self.right_vector();
        let up = self.up_vector();

        let half_h = (self.fov * 0.5).tan();
        let half_w = half_h * self.aspect;
        let direction = (forward + right * (ndc_x * half_w) + up * (ndc_y * half_h)).normalize_or_zero();

        Ray {
            origin: self.eye_position(),
            direction,
        }
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}
