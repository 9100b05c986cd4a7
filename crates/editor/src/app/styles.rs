//! Application style configuration

use eframe::egui;

/// Scene background behind the roof
pub const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf0, 0xf0);

/// Light theme so panels sit quietly next to the pale viewport
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(3);

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);

    style.visuals.panel_fill = egui::Color32::from_rgb(232, 232, 236);

    // Toggle buttons (auto-rotate) read as selected in the accent colour
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(90, 160, 90);

    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::monospace(13.0),
    );

    ctx.set_style(style);
}
