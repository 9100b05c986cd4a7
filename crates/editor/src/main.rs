mod app;
mod viewport;

use std::path::PathBuf;

use app::RoofApp;
use roof_editor_lib::settings::EditorSettings;
use roof_editor_lib::Editor;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roof_editor=info,roof_editor_lib=info".into()),
        )
        .init();

    // Parse --asset <path> argument
    let initial_asset = parse_asset_arg();

    let settings = EditorSettings::load();
    let editor = match Editor::new(settings) {
        Ok(editor) => editor,
        Err(e) => {
            tracing::error!("Cannot build roof from settings: {e}");
            return;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Roof Editor")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "roof-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(RoofApp::new(cc, editor, runtime, initial_asset)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_asset_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--asset" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
            tracing::warn!("--asset needs a path");
            break;
        }
        i += 1;
    }
    None
}
