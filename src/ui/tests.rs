use super::state::StoreOperation;
use super::*;
use crate::config::EditorConfig;
use crate::manipulation::GestureMode;
use crate::persistence::MemoryStore;
use crate::types::ShapeId;
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;

fn screen_rect() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 800.0))
}

/// App with screen space equal to canvas space.
fn test_app() -> DiagramApp {
    let mut app = DiagramApp::default();
    app.canvas.initialized = true;
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom_factor = 1.0;
    app
}

/// Runs one frame of the canvas on `ctx` with the given events.
fn canvas_frame(ctx: &egui::Context, app: &mut DiagramApp, events: Vec<egui::Event>) {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = events;
    let _ = ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
        app.draw_label_dialog(ctx);
    });
}

fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

fn key_press(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: Some(key),
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }
}

fn delete_key() -> egui::Event {
    key_press(egui::Key::Delete)
}

/// App with the label dialog open on a new rectangle, its text field focused
/// and its buffer replaced with `edited`.
fn app_with_open_dialog(ctx: &egui::Context, edited: &str) -> (DiagramApp, ShapeId) {
    let mut app = test_app();
    let id = app.editor.add_shape(ShapeKind::Rectangle);
    assert!(app.editor.request_label_edit(id));
    app.focus_label_field = true;

    canvas_frame(ctx, &mut app, vec![]);
    if let Some(buffer) = app.editor.label_editor_mut().buffer_mut() {
        *buffer = edited.to_string();
    }
    canvas_frame(ctx, &mut app, vec![]);
    assert!(app.editor.label_editor().is_open());
    (app, id)
}

#[derive(Default)]
struct TestStorage(HashMap<String, String>);

impl eframe::Storage for TestStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    fn flush(&mut self) {}
}

#[test]
fn clicking_canvas_selects_shape() {
    let mut app = test_app();
    let id = app.editor.add_shape(ShapeKind::Rectangle);
    app.editor.add_shape(ShapeKind::Connector);
    assert_ne!(app.editor.registry().selected_id(), Some(id));

    let ctx = egui::Context::default();
    let click_pos = egui::pos2(140.0, 100.0);

    // First frame: establish hover
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(click_pos)]);
    // Second frame: press over the rectangle's body
    canvas_frame(
        &ctx,
        &mut app,
        vec![egui::Event::PointerMoved(click_pos), button(click_pos, true)],
    );

    assert_eq!(app.editor.registry().selected_id(), Some(id));
    assert_eq!(app.editor.mode(), GestureMode::Dragging);
}

#[test]
fn dragging_on_canvas_moves_shape() {
    let mut app = test_app();
    let id = app.editor.add_shape(ShapeKind::Rectangle);

    let ctx = egui::Context::default();
    let start = egui::pos2(130.0, 90.0);
    let end = egui::pos2(150.0, 110.0);

    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    canvas_frame(&ctx, &mut app, vec![button(start, true)]);
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(end)]);
    canvas_frame(&ctx, &mut app, vec![button(end, false)]);

    let shape = app.editor.registry().get(id).unwrap();
    assert!((shape.position.0 - 140.0).abs() < 1e-3);
    assert!((shape.position.1 - 100.0).abs() < 1e-3);
    assert_eq!(app.editor.mode(), GestureMode::Idle);
}

#[test]
fn pressing_empty_canvas_clears_selection() {
    let mut app = test_app();
    app.editor.add_shape(ShapeKind::Diamond);
    assert!(app.editor.registry().selected_id().is_some());

    let ctx = egui::Context::default();
    let empty = egui::pos2(900.0, 700.0);
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(empty)]);
    canvas_frame(&ctx, &mut app, vec![button(empty, true)]);
    canvas_frame(&ctx, &mut app, vec![button(empty, false)]);

    assert_eq!(app.editor.registry().selected_id(), None);
    assert_eq!(app.editor.mode(), GestureMode::Idle);
}

#[test]
fn double_click_opens_label_dialog() {
    let mut app = test_app();
    let id = app.editor.add_shape(ShapeKind::Rectangle);

    let ctx = egui::Context::default();
    let pos = egui::pos2(180.0, 120.0);
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(pos)]);
    canvas_frame(&ctx, &mut app, vec![button(pos, true)]);
    canvas_frame(&ctx, &mut app, vec![button(pos, false)]);
    canvas_frame(&ctx, &mut app, vec![button(pos, true)]);
    canvas_frame(&ctx, &mut app, vec![button(pos, false)]);

    let request = app.editor.label_editor().request().unwrap();
    assert_eq!(request.shape, id);
    assert_eq!(request.original, "Texto");
}

#[test]
fn delete_key_removes_selected_shape() {
    let mut app = test_app();
    let keep = app.editor.add_shape(ShapeKind::Rectangle);
    let doomed = app.editor.add_shape(ShapeKind::Diamond);

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![delete_key()];
    let _ = ctx.run(raw, |ctx| {
        app.handle_delete_key(ctx);
    });

    assert!(app.editor.registry().get(doomed).is_none());
    assert!(app.editor.registry().get(keep).is_some());
}

#[test]
fn delete_key_is_ignored_while_label_dialog_is_open() {
    let mut app = test_app();
    let id = app.editor.add_shape(ShapeKind::Rectangle);
    assert!(app.editor.request_label_edit(id));
    app.focus_label_field = true;

    let ctx = egui::Context::default();
    // First frame shows the dialog and focuses its text field
    canvas_frame(&ctx, &mut app, vec![]);

    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![delete_key()];
    let _ = ctx.run(raw, |ctx| {
        app.handle_delete_key(ctx);
        app.draw_label_dialog(ctx);
    });

    assert!(app.editor.registry().get(id).is_some());
    assert!(app.editor.label_editor().is_open());
}

#[test]
fn enter_in_label_dialog_commits_edited_text() {
    let ctx = egui::Context::default();
    let (mut app, id) = app_with_open_dialog(&ctx, "Start");

    canvas_frame(&ctx, &mut app, vec![key_press(egui::Key::Enter)]);

    assert!(!app.editor.label_editor().is_open());
    assert_eq!(app.editor.registry().get(id).unwrap().label, "Start");
}

#[test]
fn escape_in_label_dialog_discards_edit() {
    let ctx = egui::Context::default();
    let (mut app, id) = app_with_open_dialog(&ctx, "Discarded");

    canvas_frame(&ctx, &mut app, vec![key_press(egui::Key::Escape)]);

    assert!(!app.editor.label_editor().is_open());
    assert_eq!(app.editor.registry().get(id).unwrap().label, "Texto");
}

#[test]
fn clicking_outside_label_dialog_discards_edit() {
    let ctx = egui::Context::default();
    let (mut app, id) = app_with_open_dialog(&ctx, "Discarded");
    let outside = egui::pos2(12.0, 780.0);

    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(outside)]);
    canvas_frame(&ctx, &mut app, vec![button(outside, true)]);
    canvas_frame(&ctx, &mut app, vec![button(outside, false)]);

    assert!(!app.editor.label_editor().is_open());
    let shape = app.editor.registry().get(id).unwrap();
    assert_eq!(shape.label, "Texto");
    // The canvas did not see the click either
    assert_eq!(shape.position, (120.0, 80.0));
    assert_eq!(app.editor.registry().selected_id(), Some(id));
}

#[test]
fn save_then_load_restores_diagram() {
    let store = Arc::new(MemoryStore::new());
    let mut app = DiagramApp::with_store(EditorConfig::default(), store.clone());
    app.editor.add_shape(ShapeKind::Rectangle);
    app.editor.add_shape(ShapeKind::Connector);
    let ctx = egui::Context::default();

    // Without a runtime the store task runs inline
    app.save_diagram(&ctx);
    app.handle_pending_operations();
    assert_eq!(app.store.in_flight, None);
    assert_eq!(app.status.as_ref().map(|s| s.is_error), Some(false));
    assert_eq!(store.len(), 1);

    let mut fresh = DiagramApp::with_store(EditorConfig::default(), store);
    fresh.load_diagram(&ctx);
    fresh.handle_pending_operations();

    assert_eq!(fresh.editor.records(), app.editor.records());
    assert_eq!(fresh.editor.registry().selected_id(), None);
}

#[test]
fn load_without_saved_diagram_reports_error_and_keeps_shapes() {
    let mut app = test_app();
    app.editor.add_shape(ShapeKind::Diamond);
    let ctx = egui::Context::default();

    app.load_diagram(&ctx);
    app.handle_pending_operations();

    assert_eq!(app.editor.registry().len(), 1);
    assert!(app.status.as_ref().is_some_and(|s| s.is_error));
}

#[test]
fn store_operation_is_refused_while_another_runs() {
    let mut app = test_app();
    app.editor.add_shape(ShapeKind::Rectangle);
    app.store.in_flight = Some(StoreOperation::Save);
    let ctx = egui::Context::default();

    app.load_diagram(&ctx);

    assert_eq!(app.store.in_flight, Some(StoreOperation::Save));
    assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    assert!(app.store.receiver.try_recv().is_err());
}

#[test]
fn settings_round_trip_through_app_storage() {
    let mut app = test_app();
    app.config.show_grid = false;
    app.config.document_key = "flow".to_string();

    let mut storage = TestStorage::default();
    eframe::App::save(&mut app, &mut storage);

    let restored = EditorConfig::from_storage(Some(&storage));
    assert!(!restored.show_grid);
    assert_eq!(restored.document_key, "flow");
}
