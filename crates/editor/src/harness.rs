//! Headless test harness for driving the editor without a window.
//!
//! The harness pins the viewport to 800×600 and looks at the roof straight
//! from the front, so screen-space drags map to predictable world moves.

use glam::Vec3;
use shared::RoofParameters;

use crate::editor::{Editor, PointerInput, Renderer};
use crate::interaction::DragPhase;
use crate::scene::{NodeId, NodeTransform, SceneGraph};
use crate::settings::EditorSettings;
use crate::viewport::camera::ArcBallCamera;

pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// Renderer that records what it was asked to draw
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Number of render calls
    pub renders: usize,
    watched: Vec<NodeId>,
    /// Transforms of the watched nodes at each render call
    pub snapshots: Vec<Vec<Option<NodeTransform>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the local transforms of `nodes` on every render
    pub fn watching(nodes: Vec<NodeId>) -> Self {
        Self {
            watched: nodes,
            ..Self::default()
        }
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &SceneGraph, _camera: &ArcBallCamera, _highlight: [u8; 3]) {
        self.renders += 1;
        let snapshot = self
            .watched
            .iter()
            .map(|id| scene.node(*id).map(|n| n.transform))
            .collect();
        self.snapshots.push(snapshot);
    }
}

/// Headless editor with a recording renderer
pub struct EditorHarness {
    pub editor: Editor,
    pub renderer: RecordingRenderer,
    cursor: egui::Pos2,
}

impl EditorHarness {
    /// Default roof from the default settings
    pub fn new() -> Self {
        let settings = EditorSettings::default();
        let params = RoofParameters::new(settings.roof.width, settings.roof.depth, settings.roof.height);
        Self::with_roof(params)
    }

    /// Roof with the given dimensions.
    ///
    /// Panics on degenerate parameters; use [`Editor::with_roof`] to test those.
    pub fn with_roof(params: RoofParameters) -> Self {
        let editor = match Editor::with_roof(EditorSettings::default(), params) {
            Ok(editor) => editor,
            Err(e) => panic!("harness roof rejected: {e}"),
        };
        let watched = vec![editor.roof().top, editor.roof().wall];
        let mut harness = Self {
            editor,
            renderer: RecordingRenderer::watching(watched),
            cursor: egui::Pos2::ZERO,
        };
        harness.editor.on_resize(Self::viewport_rect());
        harness.front_view();
        harness
    }

    pub fn viewport_rect() -> egui::Rect {
        egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        )
    }

    /// Look along -Z at the roof centre
    pub fn front_view(&mut self) {
        let camera = self.editor.camera_mut();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        camera.distance = 2000.0;
        camera.target = Vec3::new(0.0, 200.0, 0.0);
    }

    // ── Geometry helpers ──────────────────────────────────────

    /// Screen position of a world point, if in front of the camera
    pub fn screen_of(&self, point: Vec3) -> Option<egui::Pos2> {
        self.editor.camera().project(point, self.editor.viewport())
    }

    /// World position of the front handle sphere
    pub fn front_ball_world(&self) -> Vec3 {
        let id = self.editor.roof().front_ball;
        self.editor.scene().world_position(id).unwrap_or(Vec3::ZERO)
    }

    // ── Pointer input ─────────────────────────────────────────

    pub fn press(&mut self, pos: egui::Pos2) {
        self.cursor = pos;
        self.editor.pointer_down(PointerInput::at(pos));
    }

    /// Press with the selection modifier held
    pub fn press_selecting(&mut self, pos: egui::Pos2) {
        self.cursor = pos;
        self.editor.pointer_down(PointerInput::selecting(pos));
    }

    /// Press on a world point
    pub fn press_world(&mut self, point: Vec3) {
        let pos = self.screen_of(point).unwrap_or(egui::pos2(-1.0, -1.0));
        self.press(pos);
    }

    /// Press on the front handle sphere
    pub fn press_handle(&mut self) {
        self.press_world(self.front_ball_world());
    }

    /// Click on a world point with the selection modifier held
    pub fn select_world(&mut self, point: Vec3) {
        let pos = self.screen_of(point).unwrap_or(egui::pos2(-1.0, -1.0));
        self.press_selecting(pos);
        self.release();
    }

    pub fn drag_to(&mut self, pos: egui::Pos2) {
        self.cursor = pos;
        self.editor.pointer_move(PointerInput::at(pos));
    }

    /// Move the pointer so the grabbed point travels by `delta` in world space
    pub fn drag_by(&mut self, delta: Vec3) {
        let Some(grab) = self.editor.drag().session().map(|s| s.grab_point()) else {
            return;
        };
        if let Some(pos) = self.screen_of(grab + delta) {
            self.drag_to(pos);
        }
    }

    pub fn release(&mut self) {
        self.editor.pointer_up(PointerInput::at(self.cursor));
    }

    pub fn cancel(&mut self) {
        self.editor.pointer_cancel(PointerInput::at(self.cursor));
    }

    /// Run one 60 Hz frame
    pub fn frame(&mut self) {
        self.editor.frame(1.0 / 60.0, &mut self.renderer);
    }

    // ── State queries ─────────────────────────────────────────

    pub fn height(&self) -> f64 {
        self.editor.height()
    }

    /// Local position of the handle group
    pub fn handle_position(&self) -> Vec3 {
        let id = self.editor.roof().handle;
        self.editor
            .scene()
            .node(id)
            .map(|n| n.transform.position)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn camera_enabled(&self) -> bool {
        self.editor.is_camera_enabled()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.editor.drag().phase()
    }

    /// Meshes currently drawn with the highlight colour
    pub fn highlighted(&self) -> Vec<NodeId> {
        let scene = self.editor.scene();
        scene
            .meshes_under(scene.root())
            .into_iter()
            .filter(|id| {
                scene
                    .node(*id)
                    .and_then(|n| n.drawable())
                    .is_some_and(|d| d.material.highlighted)
            })
            .collect()
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
