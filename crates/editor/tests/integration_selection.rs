//! Integration tests for Shift-click selection and candidate switching.

use glam::Vec3;
use roof_editor_lib::fixtures;
use roof_editor_lib::harness::EditorHarness;
use roof_editor_lib::interaction::{DragPhase, InteractionMode};
use roof_editor_lib::scene::NodeId;
use shared::RoofParameters;

/// 1000×500 roof with the ridge at 200
fn low_roof() -> EditorHarness {
    EditorHarness::with_roof(RoofParameters::new(1000.0, 500.0, 200.0))
}

const INVERTER_AT: [f64; 3] = [-250.0, 0.0, 400.0];
const RACK_AT: [f64; 3] = [300.0, 0.0, 400.0];

/// Harness with an inverter and a three-module battery rack in front of the roof
fn furnished() -> (EditorHarness, NodeId, NodeId) {
    let mut h = low_roof();
    let inverter = h
        .editor
        .insert_asset(&fixtures::inverter(INVERTER_AT))
        .unwrap();
    let rack = h
        .editor
        .insert_asset(&fixtures::battery_rack(RACK_AT, 3))
        .unwrap();
    (h, inverter, rack)
}

fn inverter_body() -> Vec3 {
    Vec3::new(-250.0, 80.0, 400.0)
}

fn lowest_battery() -> Vec3 {
    Vec3::new(300.0, 20.0, 400.0)
}

fn children(h: &EditorHarness, group: NodeId) -> Vec<NodeId> {
    h.editor.scene().children_of(group).to_vec()
}

#[test]
fn test_select_highlights_whole_group() {
    let (mut h, inverter, _) = furnished();
    h.select_world(inverter_body());

    assert_eq!(h.editor.highlighter().group(), Some(inverter));
    let highlighted = h.highlighted();
    assert_eq!(highlighted.len(), 2);
    for child in children(&h, inverter) {
        assert!(highlighted.contains(&child));
    }
}

#[test]
fn test_select_a_then_b_leaves_only_b() {
    let (mut h, inverter, rack) = furnished();
    h.select_world(inverter_body());
    h.select_world(lowest_battery());

    assert_eq!(h.editor.highlighter().group(), Some(rack));
    let highlighted = h.highlighted();
    assert_eq!(highlighted.len(), 3);
    for child in children(&h, inverter) {
        assert!(!highlighted.contains(&child));
    }
    for child in children(&h, rack) {
        assert!(highlighted.contains(&child));
    }
}

#[test]
fn test_selected_group_becomes_only_drag_candidate() {
    let (mut h, inverter, _) = furnished();
    h.select_world(inverter_body());

    let drag = h.editor.candidates().set(InteractionMode::Drag);
    assert_eq!(drag.nodes(), &[inverter]);
    assert!(!drag.contains(h.editor.roof().handle));

    // Other meshes stay selectable
    let select = h.editor.candidates().set(InteractionMode::Select);
    for id in h.editor.roof().handle_meshes() {
        assert!(select.contains(id));
    }
}

#[test]
fn test_selected_group_drags_freely() {
    let (mut h, inverter, _) = furnished();
    h.select_world(inverter_body());

    h.press_world(inverter_body());
    assert_eq!(h.drag_phase(), DragPhase::Armed);
    assert_eq!(h.editor.drag().session().map(|s| s.target), Some(inverter));

    h.drag_by(Vec3::new(100.0, 50.0, 0.0));
    h.frame();
    h.release();

    let pos = h.editor.scene().node(inverter).unwrap().transform.position;
    assert!((pos - Vec3::new(-150.0, 50.0, 400.0)).length() < 0.05, "{pos:?}");
    // Unregistered targets publish nothing
    assert_eq!(h.height(), 200.0);
    assert!(h.camera_enabled());
}

#[test]
fn test_handle_not_draggable_while_asset_selected() {
    let (mut h, _, _) = furnished();
    h.select_world(inverter_body());

    h.press_handle();
    assert_eq!(h.drag_phase(), DragPhase::Idle);
    h.release();
    assert_eq!(h.handle_position(), Vec3::new(500.0, 200.0, 0.0));
}

#[test]
fn test_selecting_handle_highlights_handle_group() {
    let mut h = low_roof();
    let ball = h.front_ball_world();
    h.select_world(ball);

    let handle = h.editor.roof().handle;
    assert_eq!(h.editor.highlighter().group(), Some(handle));
    let highlighted = h.highlighted();
    for id in h.editor.roof().handle_meshes() {
        assert!(highlighted.contains(&id));
    }
    // Roof surfaces are never part of the handle group
    assert!(!highlighted.contains(&h.editor.roof().wall));
}

#[test]
fn test_selection_press_never_starts_drag() {
    let mut h = low_roof();
    let ball = h.front_ball_world();
    let pos = h.screen_of(ball).unwrap();

    h.press_selecting(pos);
    assert_eq!(h.drag_phase(), DragPhase::Idle);
    assert!(h.camera_enabled());
    h.drag_to(pos + egui::vec2(0.0, -80.0));
    h.release();
    h.frame();
    assert_eq!(h.height(), 200.0);
}

#[test]
fn test_miss_clears_and_restores_default_candidates() {
    let (mut h, _, _) = furnished();
    h.select_world(inverter_body());
    assert!(!h.highlighted().is_empty());

    // Top-left corner looks over everything
    h.press_selecting(egui::pos2(5.0, 5.0));
    h.release();

    assert!(h.highlighted().is_empty());
    assert_eq!(h.editor.highlighter().group(), None);
    let drag = h.editor.candidates().set(InteractionMode::Drag);
    assert_eq!(drag.nodes(), &[h.editor.roof().handle]);

    // The roof handle drags again
    h.press_handle();
    assert_eq!(h.drag_phase(), DragPhase::Armed);
    h.release();
}

#[test]
fn test_highlight_uses_configured_colour() {
    let (mut h, inverter, _) = furnished();
    h.select_world(inverter_body());

    let colour = h.editor.settings().highlight.color;
    let body = children(&h, inverter)[0];
    let material = &h.editor.scene().node(body).unwrap().drawable().unwrap().material;
    assert_eq!(material.display_color(colour), colour);
}

#[test]
fn test_selection_keeps_meshes_in_their_own_group() {
    let (mut h, inverter, rack) = furnished();
    let before: Vec<NodeId> = children(&h, inverter);
    h.select_world(inverter_body());
    h.select_world(lowest_battery());

    assert_eq!(children(&h, inverter), before);
    for child in children(&h, rack) {
        assert_eq!(h.editor.scene().parent_of(child), Some(rack));
    }
}
