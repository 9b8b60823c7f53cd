use design_studio::clipboard::{ClipboardPayload, CLIPBOARD_FORMAT};
use design_studio::command::{Command, CommandError, Outcome};
use design_studio::error::{SceneError, ValidationError};
use design_studio::scene::{
    Alignment, ElementId, ElementKind, ElementPatch, ReorderDirection, SceneElement, TextContent,
};
use design_studio::StudioConfig;
use design_studio::state::SceneFile;
use design_studio::Document;
use egui::{Color32, Pos2, Rect, Vec2};

fn rect_at(x: f32, y: f32) -> SceneElement {
    SceneElement::new(
        ElementKind::Rect {
            size: Vec2::new(40.0, 40.0),
            corner_radius: 4.0,
        },
        Pos2::new(x, y),
    )
}

fn add(document: &mut Document, element: SceneElement) -> ElementId {
    document.execute(Command::AddElement(element)).unwrap();
    document.selection().single().expect("add selects the new element")
}

#[test]
fn test_new_document_has_initial_history_entry() {
    let document = Document::default();
    assert_eq!(document.name(), "Untitled");
    assert!(document.scene().is_empty());
    assert_eq!(document.history().len(), 1);
    assert!(!document.history().can_undo());
}

#[test]
fn test_each_change_is_one_history_entry() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    document
        .execute(Command::UpdateElement {
            id,
            patch: ElementPatch::fill(Color32::RED),
        })
        .unwrap();

    assert_eq!(document.history().len(), 3);
    assert_eq!(document.history().undo_label(), Some("Edit properties"));

    assert!(document.undo());
    assert_ne!(document.scene().get(id).unwrap().style.fill, Color32::RED);
    assert!(document.redo());
    assert_eq!(document.scene().get(id).unwrap().style.fill, Color32::RED);
}

#[test]
fn test_unchanged_commands_are_not_recorded() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    let before = document.history().len();

    let outcome = document
        .execute(Command::TranslateElements {
            ids: vec![id],
            delta: Vec2::ZERO,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Unchanged);
    let outcome = document
        .execute(Command::Reorder {
            ids: vec![id],
            direction: ReorderDirection::Forward,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(document.history().len(), before);
}

#[test]
fn test_failed_command_changes_nothing() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    document
        .execute(Command::SetLocked {
            ids: vec![id],
            locked: true,
        })
        .unwrap();
    let before = document.history().len();

    let err = document.nudge_selection(Vec2::new(1.0, 0.0)).unwrap_err();
    assert!(matches!(err, CommandError::Scene(SceneError::Locked(locked)) if locked == id));
    assert_eq!(document.history().len(), before);
    assert_eq!(document.scene().get(id).unwrap().position, Pos2::ZERO);
}

#[test]
fn test_undo_prunes_selection() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    assert!(document.selection().contains(id));

    document.undo();
    assert!(document.scene().is_empty());
    assert!(document.selection().is_empty());
}

#[test]
fn test_delete_selection_clears_selection() {
    let mut document = Document::default();
    let a = add(&mut document, rect_at(0.0, 0.0));
    let b = add(&mut document, rect_at(100.0, 0.0));
    document.select_all();
    assert_eq!(document.selection().len(), 2);

    document.delete_selection().unwrap();
    assert!(document.scene().is_empty());
    assert!(document.selection().is_empty());

    document.undo();
    assert!(document.scene().contains(a) && document.scene().contains(b));
}

#[test]
fn test_duplicate_selection_offsets_and_selects_copy() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(10.0, 10.0));
    document.duplicate_selection().unwrap();

    let copy = document.selection().single().unwrap();
    assert_ne!(copy, id);
    assert_eq!(document.scene().get(copy).unwrap().position, Pos2::new(30.0, 30.0));
    assert_eq!(document.history().undo_label(), Some("Duplicate"));
}

#[test]
fn test_copy_paste_cascades() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    let text = document.copy_selection().unwrap().expect("one element selected");

    document.paste(&text).unwrap();
    let first = document.selection().single().unwrap();
    document.paste_clipboard().unwrap();
    let second = document.selection().single().unwrap();

    assert_eq!(document.scene().len(), 3);
    assert_ne!(first, id);
    assert_ne!(second, first);
    assert_eq!(document.scene().get(first).unwrap().position, Pos2::new(20.0, 20.0));
    assert_eq!(document.scene().get(second).unwrap().position, Pos2::new(40.0, 40.0));
}

#[test]
fn test_copy_without_selection() {
    let mut document = Document::default();
    assert!(document.copy_selection().unwrap().is_none());
    assert_eq!(document.paste_clipboard().unwrap(), Outcome::Unchanged);
}

#[test]
fn test_paste_rejects_foreign_payloads() {
    let mut document = Document::default();
    let err = document.paste("not json at all").unwrap_err();
    assert!(matches!(err, CommandError::Validation(ValidationError::MalformedDocument(_))));

    let foreign = r#"{"format":"someone-else","elements":[]}"#;
    let err = document.paste(foreign).unwrap_err();
    assert!(matches!(err, CommandError::Validation(ValidationError::UnsupportedType(_))));

    let empty = format!(r#"{{"format":"{}","elements":[]}}"#, CLIPBOARD_FORMAT);
    assert!(matches!(ClipboardPayload::parse(&empty), Err(ValidationError::Empty)));
    assert!(document.scene().is_empty());
}

#[test]
fn test_drag_records_one_snapped_move() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    let before = document.history().len();

    assert!(document.begin_drag().unwrap());
    document.drag_selected(Vec2::new(7.0, 3.0)).unwrap();
    document.drag_selected(Vec2::new(7.0, 3.0)).unwrap();
    assert!(document.is_dragging());
    assert_eq!(document.history().len(), before);

    assert!(document.end_drag().unwrap());
    // (14, 6) snaps to the 20px grid.
    assert_eq!(document.scene().get(id).unwrap().position, Pos2::new(20.0, 0.0));
    assert_eq!(document.history().len(), before + 1);
    assert_eq!(document.history().undo_label(), Some("Move"));
}

#[test]
fn test_drag_of_locked_selection_is_refused() {
    let mut document = Document::default();
    let id = add(&mut document, rect_at(0.0, 0.0));
    document
        .execute(Command::SetLocked {
            ids: vec![id],
            locked: true,
        })
        .unwrap();

    let err = document.begin_drag().unwrap_err();
    assert_eq!(err, SceneError::Locked(id));
    assert!(!document.is_dragging());
    // Without a drag in progress these are no-ops.
    document.drag_selected(Vec2::new(5.0, 5.0)).unwrap();
    assert!(!document.end_drag().unwrap());
    assert_eq!(document.scene().get(id).unwrap().position, Pos2::ZERO);
}

#[test]
fn test_drag_back_to_start_records_nothing() {
    let mut document = Document::default();
    add(&mut document, rect_at(0.0, 0.0));
    let before = document.history().len();

    document.begin_drag().unwrap();
    document.drag_selected(Vec2::new(4.0, 4.0)).unwrap();
    assert!(!document.end_drag().unwrap());
    assert_eq!(document.history().len(), before);
}

#[test]
fn test_drag_without_snap_keeps_exact_position() {
    let mut config = StudioConfig::default();
    config.grid.snap = false;
    let mut document = Document::new("Free", &config);
    let id = add(&mut document, rect_at(0.0, 0.0));

    document.begin_drag().unwrap();
    document.drag_selected(Vec2::new(13.0, 7.0)).unwrap();
    document.end_drag().unwrap();
    assert_eq!(document.scene().get(id).unwrap().position, Pos2::new(13.0, 7.0));
}

#[test]
fn test_click_and_marquee_selection() {
    let mut document = Document::default();
    let a = add(&mut document, rect_at(0.0, 0.0));
    let b = add(&mut document, rect_at(100.0, 0.0));

    assert_eq!(document.select_at(Pos2::new(10.0, 10.0), false), Some(a));
    assert_eq!(document.selection().ids(), &[a]);
    document.select_at(Pos2::new(110.0, 10.0), true);
    assert_eq!(document.selection().len(), 2);
    // A miss without modifiers clears.
    assert_eq!(document.select_at(Pos2::new(500.0, 500.0), false), None);
    assert!(document.selection().is_empty());

    let hits = document.select_in_rect(Rect::from_min_max(Pos2::new(90.0, -10.0), Pos2::new(200.0, 50.0)), false);
    assert_eq!(hits, 1);
    assert_eq!(document.selection().single(), Some(b));
}

#[test]
fn test_export_import_round_trip() {
    let mut document = Document::new("Poster", &StudioConfig::default());
    add(&mut document, rect_at(0.0, 0.0));
    let mut text = TextContent::default();
    text.text = "Hello".to_owned();
    add(&mut document, SceneElement::new(ElementKind::Text(text), Pos2::new(50.0, 60.0)));
    let json = document.export_scene().unwrap();

    let mut other = Document::default();
    other.import_scene(&json).unwrap();
    assert_eq!(other.name(), "Poster");
    assert_eq!(other.scene(), document.scene());
    assert!(other.selection().is_empty());
    assert_eq!(other.history().undo_label(), Some("Import scene"));

    assert!(other.undo());
    assert!(other.scene().is_empty());
}

#[test]
fn test_import_rejects_malformed_json() {
    let mut document = Document::default();
    add(&mut document, rect_at(0.0, 0.0));
    let before = document.history().len();

    let err = document.import_scene("{\"elements\": 3}").unwrap_err();
    assert!(matches!(err, ValidationError::MalformedDocument(_)));
    assert_eq!(document.scene().len(), 1);
    assert_eq!(document.history().len(), before);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_scene_file_save_and_load() {
    let mut document = Document::new("Saved", &StudioConfig::default());
    add(&mut document, rect_at(20.0, 40.0));
    let file = SceneFile::new(document.name(), document.scene());

    let path = std::env::temp_dir().join(format!("design-studio-{}.json", std::process::id()));
    file.save(&path).unwrap();
    let loaded = SceneFile::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.name, "Saved");
    assert_eq!(loaded.into_scene(), *document.scene());
}

#[test]
fn test_align_already_aligned_is_not_recorded() {
    let mut document = Document::default();
    let a = add(&mut document, rect_at(0.0, 0.0));
    let b = add(&mut document, rect_at(0.0, 80.0));
    let before = document.history().len();

    let outcome = document
        .execute(Command::Align {
            ids: vec![a, b],
            alignment: Alignment::Left,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(document.history().len(), before);

    let outcome = document
        .execute(Command::Align {
            ids: vec![a, b],
            alignment: Alignment::Top,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Changed);
    assert_eq!(document.history().len(), before + 1);
}

#[test]
fn test_import_with_extreme_layers_then_add() {
    let mut top = rect_at(0.0, 0.0);
    top.layer = i64::MAX;
    let mut bottom = rect_at(50.0, 0.0);
    bottom.layer = i64::MIN;
    let file = SceneFile {
        version: "0.1.0".to_owned(),
        timestamp: 0,
        name: "Layers".to_owned(),
        elements: vec![top.clone(), bottom.clone()],
    };

    let mut document = Document::default();
    document.import_scene(&file.to_json().unwrap()).unwrap();
    let added = add(&mut document, rect_at(100.0, 0.0));

    let order: Vec<ElementId> = document.scene().ids().collect();
    assert_eq!(order, vec![bottom.id, top.id, added]);
    let layers: Vec<i64> = document.scene().elements().iter().map(|e| e.layer).collect();
    assert!(layers.windows(2).all(|w| w[0] < w[1]));
}
