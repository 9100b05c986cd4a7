//! 3D viewport panel drawn with the egui painter

mod painter;
pub use roof_editor_lib::viewport::{camera, wireframe};

use egui::Ui;
use glam::Vec2;
use roof_editor_lib::interaction::InteractionMode;
use roof_editor_lib::{Editor, PointerInput};

use painter::PainterRenderer;

/// Maps egui input on the central panel to editor calls
pub struct ViewportPanel {
    /// Surface rect reported to the editor last frame
    last_rect: Option<egui::Rect>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self { last_rect: None }
    }

    pub fn show(&mut self, ui: &mut Ui, editor: &mut Editor) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        // ── Resize ────────────────────────────────────────
        if self.last_rect != Some(rect) {
            editor.on_resize(rect);
            self.last_rect = Some(rect);
        }

        // ── Pointer input ─────────────────────────────────
        let shift = ui.input(|i| i.modifiers.shift);
        let pointer = |pos: egui::Pos2| PointerInput {
            pos,
            selection_modifier: shift,
        };

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or_else(|| response.interact_pointer_pos()) {
                editor.pointer_down(pointer(pos));
            }
        } else if response.clicked_by(egui::PointerButton::Primary) {
            // Press and release inside one frame never reports a drag
            if let Some(pos) = response.interact_pointer_pos() {
                editor.pointer_down(pointer(pos));
                editor.pointer_up(pointer(pos));
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                editor.pointer_move(pointer(pos));
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            let pos = response
                .interact_pointer_pos()
                .or_else(|| ui.input(|i| i.pointer.latest_pos()))
                .unwrap_or(rect.center());
            editor.pointer_up(pointer(pos));
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let d = response.drag_delta();
            editor.pan(Vec2::new(d.x, d.y));
        }

        // Window lost focus mid-drag
        if editor.drag().is_active() && !ui.input(|i| i.pointer.any_down()) {
            editor.pointer_cancel(pointer(rect.center()));
        }

        // ── Scroll zoom ───────────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                editor.scroll(scroll);
            }
        }

        // ── Hover cursor ──────────────────────────────────
        if let Some(pos) = response.hover_pos() {
            let mode = if shift {
                InteractionMode::Select
            } else {
                InteractionMode::Drag
            };
            if editor.drag().is_active() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if !editor.hits_at(pos, mode).is_empty() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── Frame + render ────────────────────────────────
        let dt = ui.input(|i| i.stable_dt).min(0.1);
        let mut renderer = PainterRenderer::new(ui.painter_at(rect), rect);
        editor.frame(dt, &mut renderer);

        // ── Handle label ──────────────────────────────────
        let handle = editor.roof().handle;
        if let Some(world) = editor.scene().world_position(handle) {
            let hidden = editor.is_occluded(world);
            if let Some(screen) = editor.camera().project(world, rect) {
                if !hidden && rect.contains(screen) {
                    ui.painter_at(rect).text(
                        screen + egui::vec2(10.0, -10.0),
                        egui::Align2::LEFT_BOTTOM,
                        format!("h = {:.0}", editor.height()),
                        egui::FontId::proportional(13.0),
                        egui::Color32::from_rgb(30, 110, 30),
                    );
                }
            }
        }
    }
}
