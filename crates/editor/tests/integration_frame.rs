//! Integration tests for the per-frame pipeline: recompute, render, resize.

use std::time::{Duration, Instant};

use glam::Vec3;
use roof_editor_lib::fixtures;
use roof_editor_lib::harness::EditorHarness;
use roof_editor_lib::interaction::{DragPhase, InteractionMode};
use shared::RoofParameters;

/// 1000×500 roof with the ridge at 200
fn low_roof() -> EditorHarness {
    EditorHarness::with_roof(RoofParameters::new(1000.0, 500.0, 200.0))
}

fn wall_scale_x(snapshot: &[Option<roof_editor_lib::scene::NodeTransform>]) -> f32 {
    // Watched nodes are [top, wall]
    snapshot[1].map(|t| t.scale.x).unwrap_or(f32::NAN)
}

#[test]
fn test_one_render_per_frame() {
    let mut h = low_roof();
    for _ in 0..3 {
        h.frame();
    }
    assert_eq!(h.renderer.renders, 3);
    assert_eq!(h.editor.frames(), 3);
}

#[test]
fn test_pointer_events_alone_do_not_render() {
    let mut h = low_roof();
    h.press_handle();
    h.drag_by(Vec3::new(0.0, 40.0, 0.0));
    h.release();
    assert_eq!(h.renderer.renders, 0);
}

#[test]
fn test_recompute_lands_before_render() {
    let mut h = low_roof();
    h.frame();
    assert!((wall_scale_x(&h.renderer.snapshots[0]) - 200.0).abs() < 1e-3);

    h.press_handle();
    h.drag_by(Vec3::new(0.0, 100.0, 0.0));
    // Published, not yet applied
    assert_eq!(h.height(), 200.0);

    h.frame();
    let seen = wall_scale_x(&h.renderer.snapshots[1]);
    assert!((seen - 300.0).abs() < 0.05, "wall rendered at {seen}");
    assert!((h.height() - 300.0).abs() < 0.05);
    h.release();
}

#[test]
fn test_top_follows_height_each_frame() {
    let mut h = low_roof();
    h.press_handle();
    for step in 1..=4 {
        h.drag_by(Vec3::new(0.0, 25.0 * step as f32, 0.0));
        h.frame();
    }
    h.release();

    // Rafter length grows monotonically as the handle rises
    let lengths: Vec<f32> = h
        .renderer
        .snapshots
        .iter()
        .map(|s| s[0].map(|t| t.scale.x).unwrap_or(f32::NAN))
        .collect();
    assert_eq!(lengths.len(), 4);
    assert!(lengths.windows(2).all(|w| w[1] > w[0]), "{lengths:?}");
}

#[test]
fn test_resize_updates_camera_aspect() {
    let mut h = low_roof();
    assert!((h.editor.camera().aspect - 800.0 / 600.0).abs() < 1e-6);

    let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 400.0));
    h.editor.on_resize(rect);
    assert_eq!(h.editor.viewport(), rect);
    assert!((h.editor.camera().aspect - 1.0).abs() < 1e-6);
}

#[test]
fn test_zero_sized_resize_ignored() {
    let mut h = low_roof();
    let before = h.editor.viewport();
    h.editor
        .on_resize(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(0.0, 600.0)));
    assert_eq!(h.editor.viewport(), before);
    assert!((h.editor.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    h.frame();
    assert_eq!(h.renderer.renders, 1);
}

#[test]
fn test_handle_picked_in_offset_viewport() {
    let mut h = low_roof();
    let rect = egui::Rect::from_min_size(egui::pos2(200.0, 100.0), egui::vec2(800.0, 600.0));
    h.editor.on_resize(rect);

    h.press_handle();
    assert_eq!(h.drag_phase(), DragPhase::Armed);
    h.drag_by(Vec3::new(0.0, 60.0, 0.0));
    h.frame();
    h.release();
    assert!((h.height() - 260.0).abs() < 0.05, "height {}", h.height());
}

#[test]
fn test_press_outside_viewport_does_nothing() {
    let mut h = low_roof();
    let yaw = h.editor.camera().yaw;

    h.press(egui::pos2(-20.0, 300.0));
    assert_eq!(h.drag_phase(), DragPhase::Idle);
    h.drag_to(egui::pos2(300.0, 300.0));
    h.release();
    for _ in 0..5 {
        h.frame();
    }
    assert_eq!(h.editor.camera().yaw, yaw);
    assert!(h.editor.hits_at(egui::pos2(-20.0, 300.0), InteractionMode::Drag).is_empty());
}

#[test]
fn test_orbit_ignored_while_dragging() {
    let mut h = low_roof();
    let yaw = h.editor.camera().yaw;
    h.press_handle();
    h.drag_by(Vec3::new(0.0, 80.0, 0.0));
    h.editor.scroll(120.0);
    for _ in 0..5 {
        h.frame();
    }
    assert_eq!(h.editor.camera().yaw, yaw);
    assert_eq!(h.editor.camera().distance, 2000.0);
    h.release();
}

#[test]
fn test_handle_label_occluded_by_asset() {
    let mut h = low_roof();
    let handle = h.editor.roof().handle;
    let anchor = h.editor.scene().world_position(handle).unwrap();
    assert_eq!(anchor, Vec3::new(500.0, 200.0, 0.0));
    assert!(!h.editor.is_occluded(anchor));

    // The sight line to the anchor crosses z = 550 at x = 362.5
    h.editor
        .insert_asset(&fixtures::group(
            "blocker",
            [400.0, 0.0, 550.0],
            vec![fixtures::box_at("blocker_body", 200.0, 600.0, 50.0, [0.0, 300.0, 0.0])],
        ))
        .unwrap();
    assert!(h.editor.is_occluded(anchor));
}

#[test]
fn test_asset_loads_through_frames() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let path = std::env::temp_dir().join(format!("roof-asset-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, fixtures::to_json(&fixtures::inverter([0.0, 0.0, 600.0]))).unwrap();

    let mut h = low_roof();
    let before = h.editor.scene().len();
    h.editor.load_asset(runtime.handle(), &path);

    let deadline = Instant::now() + Duration::from_secs(5);
    while h.editor.asset_progress().is_some() && Instant::now() < deadline {
        h.frame();
        std::thread::sleep(Duration::from_millis(5));
    }
    let _ = std::fs::remove_file(&path);

    assert_eq!(h.editor.asset_progress(), None);
    assert_eq!(h.editor.scene().len(), before + 3);
    let inverter = h.editor.scene().find_by_name("inverter").unwrap();
    for mesh in h.editor.scene().meshes_under(inverter) {
        assert!(h
            .editor
            .candidates()
            .set(InteractionMode::Select)
            .contains(mesh));
    }
}

#[test]
fn test_failed_asset_leaves_scene_untouched() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let path = std::env::temp_dir().join(format!("roof-missing-{}.json", uuid::Uuid::new_v4()));

    let mut h = low_roof();
    let before = h.editor.scene().len();
    h.editor.load_asset(runtime.handle(), &path);

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut outcome = None;
    while outcome.is_none() && Instant::now() < deadline {
        outcome = h.editor.poll_asset();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert!(matches!(outcome, Some(Err(_))));
    assert_eq!(h.editor.scene().len(), before);
}
