//! Integration tests: image import and load tokens (collage-editor).

use collage_core::model::ObjectKind;
use collage_editor::{
    Command, Editor, EditorConfig, EditorError, ImportOutcome, LayerAction, MemoryStore, Outcome,
    Placement,
};
use image::{ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn fresh() -> Editor<MemoryStore> {
    Editor::fresh(MemoryStore::new(), EditorConfig::default()).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

// ─── Placement ──────────────────────────────────────────────────────────

#[test]
fn picked_image_is_scaled_to_quarter_canvas_width() {
    let mut editor = fresh();
    let token = editor.begin_import("image/png", Placement::Origin).unwrap();
    let outcome = editor.complete_import(token, png(500, 250)).unwrap();
    assert_eq!(outcome, ImportOutcome::Added(token.id()));

    let obj = &editor.scene().objects[0];
    assert_eq!(obj.id, token.id());
    assert_eq!(obj.scaled_size(), (125.0, 62.5));
    assert_eq!((obj.left, obj.top), (0.0, 0.0));
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn dropped_image_is_centered_on_drop_point() {
    let mut editor = fresh();
    let token = editor
        .begin_import("image/png", Placement::Centered { x: 250.0, y: 100.0 })
        .unwrap();
    editor.complete_import(token, png(250, 100)).unwrap();

    let obj = &editor.scene().objects[0];
    assert_eq!(obj.scaled_size(), (125.0, 50.0));
    assert_eq!((obj.left, obj.top), (187.5, 75.0));
}

#[test]
fn mime_is_sniffed_when_missing() {
    let mut editor = fresh();
    let token = editor.begin_import("", Placement::Origin).unwrap();
    editor.complete_import(token, png(4, 4)).unwrap();
    match &editor.scene().objects[0].kind {
        ObjectKind::Image(image) => assert_eq!(image.source.mime(), "image/png"),
        other => panic!("expected image, got {other:?}"),
    }
}

#[test]
fn non_image_drop_is_ignored() {
    let mut editor = fresh();
    assert!(editor.begin_import("text/plain", Placement::Origin).is_none());
    assert_eq!(editor.pending_imports(), 0);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn untyped_drop_is_ignored() {
    let mut editor = fresh();
    let drop = Placement::Centered { x: 10.0, y: 10.0 };
    assert!(editor.begin_import("", drop).is_none());
    assert_eq!(editor.pending_imports(), 0);
}

#[test]
fn non_finite_drop_point_falls_back_to_origin() {
    let mut editor = fresh();
    let token = editor
        .begin_import("image/png", Placement::Centered { x: f32::NAN, y: 5.0 })
        .unwrap();
    editor.complete_import(token, png(8, 8)).unwrap();
    let obj = &editor.scene().objects[0];
    assert_eq!((obj.left, obj.top), (0.0, 0.0));
}

#[test]
fn undecodable_file_is_an_error_and_adds_nothing() {
    let mut editor = fresh();
    let token = editor.begin_import("image/png", Placement::Origin).unwrap();
    let err = editor.complete_import(token, b"not a png".to_vec()).unwrap_err();
    assert!(matches!(err, EditorError::Decode { .. }));
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), 1);
}

// ─── Load tokens ────────────────────────────────────────────────────────

#[test]
fn deleting_pending_import_cancels_it() {
    let mut editor = fresh();
    let token = editor.begin_import("image/png", Placement::Origin).unwrap();
    assert!(editor.layers().iter().any(|e| e.id == token.id() && e.loading));

    let outcome = editor
        .dispatch(Command::Layer {
            id: token.id(),
            action: LayerAction::Delete,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::ImportCancelled);
    assert!(editor.layers().is_empty());

    // The read finishes later; nothing comes back.
    let late = editor.complete_import(token, png(10, 10)).unwrap();
    assert_eq!(late, ImportOutcome::Cancelled);
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn cancel_import_is_one_shot() {
    let mut editor = fresh();
    let token = editor.begin_import("image/jpeg", Placement::Origin).unwrap();
    assert!(editor.cancel_import(token));
    assert!(!editor.cancel_import(token));
}

#[test]
fn ids_are_not_reused_after_undo() {
    let mut editor = fresh();
    let first = editor.begin_import("image/png", Placement::Origin).unwrap();
    editor.complete_import(first, png(8, 8)).unwrap();
    editor.dispatch(Command::Undo).unwrap();

    let second = editor.begin_import("image/png", Placement::Origin).unwrap();
    assert_ne!(first.id(), second.id());
}

#[test]
fn imports_complete_out_of_order() {
    let mut editor = fresh();
    let a = editor.begin_import("image/png", Placement::Origin).unwrap();
    let b = editor.begin_import("image/png", Placement::Origin).unwrap();
    editor.complete_import(b, png(4, 4)).unwrap();
    editor.complete_import(a, png(4, 4)).unwrap();

    let order: Vec<_> = editor.scene().objects.iter().map(|o| o.id).collect();
    assert_eq!(order, vec![b.id(), a.id()]);
}
