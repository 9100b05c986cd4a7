//! Main application module

mod styles;

use std::path::PathBuf;

use eframe::egui;
use roof_editor_lib::Editor;

use crate::viewport::ViewportPanel;

/// Desktop roof editor
pub struct RoofApp {
    editor: Editor,
    viewport: ViewportPanel,
    runtime: tokio::runtime::Runtime,
    /// Last reported asset error, shown in the top bar
    asset_error: Option<String>,
}

impl RoofApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        editor: Editor,
        runtime: tokio::runtime::Runtime,
        initial_asset: Option<PathBuf>,
    ) -> Self {
        styles::configure_styles(&cc.egui_ctx);

        let mut app = Self {
            editor,
            viewport: ViewportPanel::new(),
            runtime,
            asset_error: None,
        };
        if let Some(path) = initial_asset {
            app.editor.load_asset(app.runtime.handle(), path);
        }
        app
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Reset camera").clicked() {
                self.editor.reset_camera();
            }
            let orbit = self.editor.orbit_mut();
            ui.toggle_value(&mut orbit.auto_rotate, "Auto-rotate");

            ui.separator();

            let solution = self.editor.roof().solution();
            ui.monospace(format!(
                "height {:>7.1}   rafter {:>7.1}   pitch {:>5.2}°",
                self.editor.height(),
                solution.rafter_length,
                solution.pitch_degrees()
            ));

            if let Some(progress) = self.editor.asset_progress() {
                ui.separator();
                ui.add(
                    egui::ProgressBar::new(progress as f32 / 100.0)
                        .desired_width(120.0)
                        .text(format!("loading {progress}%")),
                );
            }
            if let Some(err) = &self.asset_error {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(180, 40, 40), err);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak("Shift + click selects a group");
            });
        });
    }
}

impl eframe::App for RoofApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(Err(e)) = self.editor.poll_asset() {
            self.asset_error = Some(e.to_string());
        }

        // ── Top bar ───────────────────────────────────────────
        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                self.top_bar(ui);
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(styles::BACKGROUND))
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.editor);
            });

        // Keep animating while the camera eases or spins
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Next start opens on the roof and view the user left
        self.editor.live_settings().save();
    }
}
