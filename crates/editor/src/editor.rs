//! Editor orchestration
//!
//! [`Editor`] owns the scene and every controller, and is driven by three
//! kinds of calls from the host: pointer events, `on_resize`, and one
//! `frame` per animation frame. Within a frame the roof is recomputed before
//! the renderer sees the scene.

use std::path::PathBuf;

use glam::{Vec2, Vec3};
use shared::{NodeDescription, RoofParameters};

use crate::assets::{AssetError, PendingAsset};
use crate::interaction::{
    AxisConstraint, CameraOrbitArbiter, CandidatePool, DragConstraintController, DragPhase,
    InteractionMode, SelectionHighlighter, TargetPolicy, ViewContext,
};
use crate::roof::{RoofError, RoofModel};
use crate::scene::{NodeId, SceneError, SceneGraph};
use crate::settings::EditorSettings;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::orbit::OrbitController;
use crate::viewport::picking::{self, Hit, PickOptions};

/// Draws the scene once per frame
pub trait Renderer {
    fn render(&mut self, scene: &SceneGraph, camera: &ArcBallCamera, highlight: [u8; 3]);
}

/// Pointer position in surface pixels plus the selection modifier (Shift)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pos: egui::Pos2,
    pub selection_modifier: bool,
}

impl PointerInput {
    pub fn at(pos: egui::Pos2) -> Self {
        Self {
            pos,
            selection_modifier: false,
        }
    }

    pub fn selecting(pos: egui::Pos2) -> Self {
        Self {
            pos,
            selection_modifier: true,
        }
    }
}

/// What the current press turned into
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    None,
    Drag,
    Orbit { last: egui::Pos2 },
    Select,
}

pub struct Editor {
    settings: EditorSettings,
    scene: SceneGraph,
    camera: ArcBallCamera,
    orbit: OrbitController,
    arbiter: CameraOrbitArbiter,
    candidates: CandidatePool,
    drag: DragConstraintController,
    highlighter: SelectionHighlighter,
    /// Meshes that can be picked in selection mode
    selectable: Vec<NodeId>,
    roof: RoofModel,
    viewport: egui::Rect,
    gesture: Gesture,
    /// Height published by the last drag move, applied on the next frame
    published_height: Option<f64>,
    pending_asset: Option<PendingAsset>,
    frames: u64,
}

impl Editor {
    /// Build the editor with the roof described by `settings.roof`
    pub fn new(settings: EditorSettings) -> Result<Self, RoofError> {
        let params = RoofParameters::new(settings.roof.width, settings.roof.depth, settings.roof.height);
        Self::with_roof(settings, params)
    }

    pub fn with_roof(settings: EditorSettings, params: RoofParameters) -> Result<Self, RoofError> {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let roof = RoofModel::build(&mut scene, root, params, settings.roof.handle_radius)?;

        let mut drag = DragConstraintController::new();
        drag.register_handle(
            roof.handle,
            AxisConstraint::vertical(Some(settings.roof.height_floor as f32)),
            true,
        );

        let mut editor = Self {
            camera: ArcBallCamera::new(&settings.camera),
            orbit: OrbitController::new(&settings.camera),
            arbiter: CameraOrbitArbiter::new(),
            candidates: CandidatePool::new(),
            drag,
            highlighter: SelectionHighlighter::new(),
            selectable: roof.handle_meshes().to_vec(),
            roof,
            scene,
            viewport: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0)),
            gesture: Gesture::None,
            published_height: None,
            pending_asset: None,
            frames: 0,
            settings,
        };
        editor.restore_default_candidates();
        Ok(editor)
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &ArcBallCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ArcBallCamera {
        &mut self.camera
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitController {
        &mut self.orbit
    }

    pub fn arbiter(&self) -> &CameraOrbitArbiter {
        &self.arbiter
    }

    pub fn candidates(&self) -> &CandidatePool {
        &self.candidates
    }

    pub fn drag(&self) -> &DragConstraintController {
        &self.drag
    }

    pub fn highlighter(&self) -> &SelectionHighlighter {
        &self.highlighter
    }

    pub fn roof(&self) -> &RoofModel {
        &self.roof
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn viewport(&self) -> egui::Rect {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.arbiter.is_enabled()
    }

    /// Settings with the current roof height and camera view written back
    pub fn live_settings(&self) -> EditorSettings {
        let mut settings = self.settings.clone();
        settings.roof.height = self.roof.height();
        settings.camera.yaw = self.camera.yaw.to_degrees();
        settings.camera.pitch = self.camera.pitch.to_degrees();
        settings.camera.distance = self.camera.distance;
        settings.camera.target = self.camera.target.to_array();
        settings
    }

    fn pick_options(&self) -> PickOptions {
        PickOptions {
            line_threshold: self.settings.picking.line_threshold,
        }
    }

    /// Put the camera back where the settings place it
    pub fn reset_camera(&mut self) {
        let aspect = self.camera.aspect;
        self.camera = ArcBallCamera::new(&self.settings.camera);
        self.camera.aspect = aspect;
        self.orbit.stop();
    }

    /// Drag candidates when nothing is selected: the roof handle as a group
    fn restore_default_candidates(&mut self) {
        self.set_drag_candidates(vec![self.roof.handle]);
    }

    /// Replace the drag set; every other selectable mesh stays selectable
    fn set_drag_candidates(&mut self, nodes: Vec<NodeId>) {
        self.candidates
            .assign(InteractionMode::Drag, nodes, TargetPolicy::Candidate);
        let drag = self.candidates.set(InteractionMode::Drag);
        let select: Vec<NodeId> = self
            .selectable
            .iter()
            .copied()
            .filter(|n| !drag.contains(*n))
            .collect();
        self.candidates
            .assign(InteractionMode::Select, select, TargetPolicy::Hit);
    }

    // ── Pointer input ─────────────────────────────────────────

    pub fn pointer_down(&mut self, input: PointerInput) {
        if self.gesture != Gesture::None {
            // Missed release from the host; finish the old gesture first
            self.pointer_cancel(input);
        }

        if input.selection_modifier {
            self.select_at(input.pos);
            self.gesture = Gesture::Select;
            return;
        }

        let view = ViewContext {
            camera: &self.camera,
            rect: self.viewport,
            pick: self.pick_options(),
        };
        let started = self.drag.pointer_down(
            input.pos,
            &view,
            &mut self.scene,
            self.candidates.set(InteractionMode::Drag),
            &mut self.arbiter,
        );
        self.gesture = match started {
            Some(_) => {
                self.published_height = None;
                Gesture::Drag
            }
            None if self.viewport.contains(input.pos) => Gesture::Orbit { last: input.pos },
            None => Gesture::None,
        };
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        match self.gesture {
            Gesture::Drag => {
                let ray = self.camera.screen_ray(input.pos, self.viewport);
                if let Some(value) = self.drag.pointer_move(&ray, &mut self.scene) {
                    self.published_height = Some(value as f64);
                }
            }
            Gesture::Orbit { last } => {
                let delta = input.pos - last;
                self.orbit.rotate(&self.arbiter, Vec2::new(delta.x, delta.y));
                self.gesture = Gesture::Orbit { last: input.pos };
            }
            Gesture::None | Gesture::Select => {}
        }
    }

    pub fn pointer_up(&mut self, _input: PointerInput) {
        let was_dragging = self.drag.phase() == DragPhase::Dragging;
        self.drag.pointer_up(&mut self.arbiter);
        if was_dragging {
            self.apply_published_height();
        }
        self.gesture = Gesture::None;
    }

    pub fn pointer_cancel(&mut self, _input: PointerInput) {
        let was_dragging = self.drag.phase() == DragPhase::Dragging;
        self.drag.pointer_cancel(&mut self.arbiter);
        if was_dragging {
            self.apply_published_height();
        }
        self.gesture = Gesture::None;
    }

    /// Scroll zoom (positive moves closer)
    pub fn scroll(&mut self, delta: f32) {
        self.orbit.zoom(&mut self.camera, &self.arbiter, delta);
    }

    /// Pan by a pointer delta in pixels
    pub fn pan(&mut self, delta: Vec2) {
        self.orbit.pan(&mut self.camera, &self.arbiter, delta);
    }

    /// Selection-mode press: highlight the hit group and make it the only
    /// drag candidate, or restore the defaults on a miss.
    fn select_at(&mut self, pos: egui::Pos2) {
        let hits = picking::pick(
            pos,
            self.viewport,
            &self.camera,
            &self.scene,
            self.candidates.set(InteractionMode::Select).nodes(),
            &self.pick_options(),
        );
        let Some(hit) = hits.first() else {
            self.highlighter.clear(&mut self.scene);
            self.restore_default_candidates();
            tracing::debug!("Selection cleared");
            return;
        };

        match self.highlighter.select(&mut self.scene, hit.node) {
            Some(group) => {
                self.set_drag_candidates(vec![group]);
                tracing::info!("Selected group {}", group);
            }
            None => self.restore_default_candidates(),
        }
    }

    /// Hits against the current candidates of `mode`, for hover feedback
    pub fn hits_at(&self, pos: egui::Pos2, mode: InteractionMode) -> Vec<Hit> {
        picking::pick(
            pos,
            self.viewport,
            &self.camera,
            &self.scene,
            self.candidates.set(mode).nodes(),
            &self.pick_options(),
        )
    }

    /// Whether `point` is hidden behind selectable geometry
    pub fn is_occluded(&self, point: Vec3) -> bool {
        picking::is_point_occluded(
            point,
            &self.camera,
            &self.scene,
            self.candidates.set(InteractionMode::Select).nodes(),
            &self.pick_options(),
        )
    }

    // ── Frame ─────────────────────────────────────────────────

    /// Advance one animation frame and render exactly once
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn Renderer) {
        self.poll_asset();
        self.orbit.update(&mut self.camera, &self.arbiter, dt);

        if self.drag.phase() == DragPhase::Dragging {
            self.apply_published_height();
        }

        renderer.render(&self.scene, &self.camera, self.settings.highlight.color);
        self.frames += 1;
    }

    fn apply_published_height(&mut self) {
        let Some(height) = self.published_height else {
            return;
        };
        if let Err(e) = self.roof.apply(&mut self.scene, height) {
            tracing::warn!("Roof not updated for height {}: {}", height, e);
        }
    }

    /// Current roof height
    pub fn height(&self) -> f64 {
        self.roof.height()
    }

    /// The interactive surface moved or changed size
    pub fn on_resize(&mut self, rect: egui::Rect) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            tracing::debug!("Ignoring degenerate viewport {:?}", rect);
            return;
        }
        if rect != self.viewport {
            self.viewport = rect;
            self.camera.set_viewport_size(rect.width(), rect.height());
        }
    }

    // ── Assets ────────────────────────────────────────────────

    /// Start loading an asset; the result is picked up by `poll_asset`
    pub fn load_asset(&mut self, runtime: &tokio::runtime::Handle, path: impl Into<PathBuf>) {
        let pending = PendingAsset::spawn(runtime, path);
        tracing::info!("Loading asset {}", pending.path().display());
        self.pending_asset = Some(pending);
    }

    /// Progress of the asset being loaded, if any
    pub fn asset_progress(&self) -> Option<u8> {
        self.pending_asset.as_ref().map(|p| p.progress())
    }

    /// Insert a finished asset into the scene. Returns `None` while nothing
    /// has completed. Failed loads leave the scene untouched.
    pub fn poll_asset(&mut self) -> Option<Result<NodeId, AssetError>> {
        let outcome = self.pending_asset.as_mut()?.try_take()?;
        self.pending_asset = None;

        let result = outcome.and_then(|desc| {
            self.insert_asset(&desc)
                .map_err(|e| AssetError::Invalid(e.to_string()))
        });
        if let Err(e) = &result {
            tracing::warn!("{}", e);
        }
        Some(result)
    }

    /// Instantiate a description under the root and make its meshes
    /// selectable
    pub fn insert_asset(&mut self, desc: &NodeDescription) -> Result<NodeId, SceneError> {
        let root = self.scene.root();
        let id = self.scene.instantiate(root, desc)?;
        for mesh in self.scene.meshes_under(id) {
            self.selectable.push(mesh);
            self.candidates.insert(InteractionMode::Select, mesh);
        }
        tracing::info!("Asset '{}' added to scene as {}", desc.name, id);
        Ok(id)
    }
}
