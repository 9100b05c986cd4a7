use egui::{Color32, Painter, Rect, Stroke};
use roof_editor_lib::scene::SceneGraph;
use roof_editor_lib::Renderer;

use super::camera::ArcBallCamera;
use super::wireframe::world_segments;

const GRID_HALF_EXTENT: f32 = 1000.0;
const GRID_STEP: f32 = 100.0;

/// Draws mesh outlines projected through the camera
pub struct PainterRenderer {
    painter: Painter,
    rect: Rect,
}

impl PainterRenderer {
    pub fn new(painter: Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn line(&self, camera: &ArcBallCamera, a: glam::Vec3, b: glam::Vec3, stroke: Stroke) {
        // Segments crossing the camera plane are dropped rather than clipped
        if let (Some(pa), Some(pb)) = (camera.project(a, self.rect), camera.project(b, self.rect)) {
            self.painter.line_segment([pa, pb], stroke);
        }
    }

    fn grid(&self, camera: &ArcBallCamera) {
        let stroke = Stroke::new(1.0, Color32::from_gray(210));
        let steps = (GRID_HALF_EXTENT / GRID_STEP) as i32;
        for i in -steps..=steps {
            let t = i as f32 * GRID_STEP;
            self.line(
                camera,
                glam::Vec3::new(t, 0.0, -GRID_HALF_EXTENT),
                glam::Vec3::new(t, 0.0, GRID_HALF_EXTENT),
                stroke,
            );
            self.line(
                camera,
                glam::Vec3::new(-GRID_HALF_EXTENT, 0.0, t),
                glam::Vec3::new(GRID_HALF_EXTENT, 0.0, t),
                stroke,
            );
        }
    }
}

impl Renderer for PainterRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &ArcBallCamera, highlight: [u8; 3]) {
        self.grid(camera);
        for seg in world_segments(scene, highlight) {
            let [r, g, b] = seg.color;
            // Pure white outlines vanish on the pale background
            let color = if seg.color == [255, 255, 255] {
                Color32::from_gray(120)
            } else {
                Color32::from_rgb(r, g, b)
            };
            self.line(camera, seg.start, seg.end, Stroke::new(1.5, color));
        }
    }
}
