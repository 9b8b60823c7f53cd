use design_studio::config::StudioConfig;
use design_studio::error::{EncodeError, InvariantViolation, SegmentationError, StateTransitionError, ValidationError};
use design_studio::raster::codec::encode;
use design_studio::raster::{ExportFormat, OutlineStyle, PixelBuffer};
use design_studio::segment::{ColorKeySegmenter, SegmentationFuture, Segmenter};
use design_studio::state::{EditorContext, EditorState, SegmentationStatus};
use design_studio::StudioError;
use egui::{Modifiers, Pos2, Vec2};
use futures::FutureExt;

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn session(buffer: PixelBuffer) -> EditorContext {
    let mut editor = EditorContext::new(StudioConfig::default());
    editor.load_buffer(buffer).unwrap();
    editor
}

fn alpha_at(editor: &EditorContext, x: u32, y: u32) -> u8 {
    editor.store().current().unwrap().alpha(x, y)
}

/// Green backdrop with a red block in the middle.
fn product_shot() -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(20, 20, [0, 255, 0, 255]);
    for y in 8..12 {
        for x in 8..12 {
            buffer.set_pixel(x, y, [255, 0, 0, 255]);
        }
    }
    buffer
}

struct Failing;

impl Segmenter for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn segment(&self, _input: PixelBuffer) -> SegmentationFuture {
        async move { Err(SegmentationError::Failed("model unavailable".to_owned())) }.boxed()
    }
}

struct WrongSize;

impl Segmenter for WrongSize {
    fn name(&self) -> &str {
        "wrong-size"
    }

    fn segment(&self, _input: PixelBuffer) -> SegmentationFuture {
        async move { Ok(PixelBuffer::new(3, 3)) }.boxed()
    }
}

/// Never finishes.
struct Stuck;

impl Segmenter for Stuck {
    fn name(&self) -> &str {
        "stuck"
    }

    fn segment(&self, _input: PixelBuffer) -> SegmentationFuture {
        futures::future::pending().boxed()
    }
}

#[test]
fn test_load_starts_fresh_session() {
    let mut editor = EditorContext::new(StudioConfig::default());
    assert!(!editor.is_loaded());
    assert!(editor.session_id().is_none());

    let bytes = encode(&PixelBuffer::filled(30, 20, WHITE), &ExportFormat::Png).unwrap();
    editor.load_image(&bytes, None).unwrap();
    let first = editor.session_id();
    assert!(first.is_some());
    assert_eq!(editor.store().dimensions(), Some((30, 20)));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().current_entry().map(|e| e.label()), Some("Load image"));

    editor.load_image(&bytes, Some("image/png")).unwrap();
    assert_ne!(editor.session_id(), first);
}

#[test]
fn test_failed_load_keeps_previous_session() {
    let mut editor = session(PixelBuffer::filled(10, 10, WHITE));
    let id = editor.session_id();

    let err = editor.load_image(&[], Some("image/png")).unwrap_err();
    assert!(matches!(err, StudioError::Validation(ValidationError::Empty)));
    let err = editor.load_image(b"not an image", Some("image/png")).unwrap_err();
    assert!(matches!(err, StudioError::Decode(_)));

    assert_eq!(editor.session_id(), id);
    assert_eq!(editor.store().dimensions(), Some((10, 10)));
}

#[test]
fn test_stroke_is_one_history_entry() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    let revision = editor.revision();

    editor.pointer_down(Pos2::new(20.0, 50.0), Modifiers::NONE).unwrap();
    assert!(editor.state().is_stroking());
    editor.pointer_move(Pos2::new(50.0, 50.0), Modifiers::NONE);
    editor.pointer_move(Pos2::new(80.0, 50.0), Modifiers::NONE);
    assert_eq!(editor.history().len(), 1);

    assert!(editor.pointer_up(Pos2::new(80.0, 50.0), Modifiers::NONE));
    assert!(editor.state().is_idle());
    assert!(editor.revision() > revision);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().undo_label(), Some("Erase"));
    for x in [20, 35, 50, 65, 80] {
        assert_eq!(alpha_at(&editor, x, 50), 0);
    }
    assert_eq!(alpha_at(&editor, 50, 5), 255);
}

#[test]
fn test_undo_redo_stroke() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    editor.pointer_down(Pos2::new(50.0, 50.0), Modifiers::NONE).unwrap();
    editor.pointer_up(Pos2::new(50.0, 50.0), Modifiers::NONE);
    assert_eq!(alpha_at(&editor, 50, 50), 0);

    assert!(editor.undo().unwrap());
    assert_eq!(alpha_at(&editor, 50, 50), 255);
    assert!(!editor.undo().unwrap());

    assert!(editor.redo().unwrap());
    assert_eq!(alpha_at(&editor, 50, 50), 0);
    assert!(!editor.redo().unwrap());
}

#[test]
fn test_restore_stroke_brings_pixels_back() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    editor.pointer_down(Pos2::new(50.0, 50.0), Modifiers::NONE).unwrap();
    editor.pointer_up(Pos2::new(50.0, 50.0), Modifiers::NONE);

    editor.set_mode(design_studio::raster::BrushMode::Restore);
    editor.pointer_down(Pos2::new(50.0, 50.0), Modifiers::NONE).unwrap();
    editor.pointer_up(Pos2::new(50.0, 50.0), Modifiers::NONE);
    assert_eq!(alpha_at(&editor, 50, 50), 255);
    assert_eq!(editor.history().undo_label(), Some("Restore"));
}

#[test]
fn test_alt_drag_pans_without_history() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    editor.pointer_down(Pos2::new(10.0, 10.0), Modifiers::ALT).unwrap();
    assert!(editor.state().is_panning());
    editor.pointer_move(Pos2::new(30.0, 25.0), Modifiers::ALT);
    assert!(!editor.pointer_up(Pos2::new(30.0, 25.0), Modifiers::ALT));

    assert_eq!(editor.viewport().pan(), Vec2::new(20.0, 15.0));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(alpha_at(&editor, 10, 10), 255);
}

#[test]
fn test_stroke_without_image_is_ignored() {
    let mut editor = EditorContext::new(StudioConfig::default());
    editor.pointer_down(Pos2::new(10.0, 10.0), Modifiers::NONE).unwrap();
    assert!(editor.state().is_idle());
    assert!(!editor.pointer_up(Pos2::new(10.0, 10.0), Modifiers::NONE));
}

#[test]
fn test_show_original_is_display_only() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    editor.pointer_down(Pos2::new(50.0, 50.0), Modifiers::NONE).unwrap();
    editor.pointer_up(Pos2::new(50.0, 50.0), Modifiers::NONE);
    let entries = editor.history().len();

    editor.toggle_show_original();
    assert_eq!(editor.display_buffer().unwrap().alpha(50, 50), 255);
    assert_eq!(alpha_at(&editor, 50, 50), 0);
    editor.toggle_show_original();
    assert_eq!(editor.display_buffer().unwrap().alpha(50, 50), 0);
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn test_outline_and_reset() {
    let mut buffer = PixelBuffer::new(60, 60);
    for y in 20..40 {
        for x in 20..40 {
            buffer.set_pixel(x, y, WHITE);
        }
    }
    let mut editor = session(buffer);
    let style = OutlineStyle::default();

    assert!(editor.apply_outline(&style).unwrap());
    assert_eq!(editor.history().undo_label(), Some("Outline"));
    let [r, g, b, a] = editor.store().current().unwrap().pixel(32, 19);
    assert_eq!([r, g, b, a], [0, 255, 255, 255]);

    editor.reset_to_original().unwrap();
    assert_eq!(editor.history().undo_label(), Some("Reset"));
    assert_eq!(editor.store().current().unwrap().pixel(32, 19), [0, 0, 0, 0]);
}

#[test]
fn test_outline_on_blank_image_does_nothing() {
    let mut editor = session(PixelBuffer::new(30, 30));
    assert!(!editor.apply_outline(&OutlineStyle::default()).unwrap());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_segmentation_applies_once() {
    let mut editor = session(product_shot());
    editor.begin_segmentation(&ColorKeySegmenter::default()).unwrap();
    assert!(editor.is_segmenting());
    assert!(editor.state().is_segmenting());

    assert!(matches!(editor.poll_segmentation(), SegmentationStatus::Applied));
    assert!(!editor.is_segmenting());
    assert_eq!(*editor.state(), EditorState::Idle);
    assert_eq!(alpha_at(&editor, 0, 0), 0);
    assert_eq!(alpha_at(&editor, 10, 10), 255);
    assert_eq!(editor.history().undo_label(), Some("Remove background"));
    assert!(matches!(editor.poll_segmentation(), SegmentationStatus::Idle));

    // The original is untouched, so reset brings the backdrop back.
    editor.reset_to_original().unwrap();
    assert_eq!(alpha_at(&editor, 0, 0), 255);
}

#[test]
fn test_failed_segmentation_leaves_image() {
    let mut editor = session(product_shot());
    editor.begin_segmentation(&Failing).unwrap();

    match editor.poll_segmentation() {
        SegmentationStatus::Failed(SegmentationError::Failed(message)) => {
            assert_eq!(message, "model unavailable")
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(alpha_at(&editor, 0, 0), 255);
    assert_eq!(editor.history().len(), 1);
    assert!(editor.state().is_idle());
}

#[test]
fn test_segmentation_result_must_match_size() {
    let mut editor = session(product_shot());
    editor.begin_segmentation(&WrongSize).unwrap();

    let status = editor.poll_segmentation();
    assert!(matches!(
        status,
        SegmentationStatus::Failed(SegmentationError::DimensionMismatch {
            want_w: 20,
            want_h: 20,
            got_w: 3,
            got_h: 3,
        })
    ));
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_pending_segmentation_locks_input() {
    let mut editor = session(product_shot());
    editor.begin_segmentation(&Stuck).unwrap();
    assert!(matches!(editor.poll_segmentation(), SegmentationStatus::Pending));

    let err = editor.begin_segmentation(&Stuck).unwrap_err();
    assert!(matches!(err, StudioError::Segmentation(SegmentationError::Busy)));
    let err = editor.pointer_down(Pos2::new(5.0, 5.0), Modifiers::NONE).unwrap_err();
    assert_eq!(err, StateTransitionError { from: "segmenting", to: "stroke" });
    assert!(editor.undo().is_err());
    assert!(editor.apply_outline(&OutlineStyle::default()).is_err());
    assert_eq!(alpha_at(&editor, 5, 5), 255);

    assert!(editor.cancel_segmentation());
    assert!(editor.state().is_idle());
    assert!(matches!(editor.poll_segmentation(), SegmentationStatus::Idle));
    assert!(!editor.cancel_segmentation());
    editor.pointer_down(Pos2::new(5.0, 5.0), Modifiers::NONE).unwrap();
}

#[test]
fn test_color_key_respects_contiguity() {
    // A key-colored hole inside the subject survives a contiguous pass.
    let mut buffer = PixelBuffer::filled(10, 10, [255, 255, 255, 255]);
    for y in 2..8 {
        for x in 2..8 {
            buffer.set_pixel(x, y, [20, 20, 20, 255]);
        }
    }
    buffer.set_pixel(5, 5, [255, 255, 255, 255]);

    let contiguous = ColorKeySegmenter::with_key([255, 255, 255], 5.0).apply(buffer.clone());
    assert_eq!(contiguous.alpha(0, 0), 0);
    assert_eq!(contiguous.alpha(5, 5), 255);
    assert_eq!(contiguous.alpha(3, 3), 255);

    let global = ColorKeySegmenter {
        contiguous: false,
        ..ColorKeySegmenter::with_key([255, 255, 255], 5.0)
    }
    .apply(buffer);
    assert_eq!(global.alpha(5, 5), 0);
}

#[test]
fn test_nothing_to_export_or_segment() {
    let mut editor = EditorContext::new(StudioConfig::default());
    assert!(matches!(editor.export(&ExportFormat::Png), Err(EncodeError::NoImage)));
    let err = editor.begin_segmentation(&ColorKeySegmenter::default()).unwrap_err();
    assert!(matches!(err, StudioError::Invariant(InvariantViolation::NoImage)));
    assert!(!editor.is_segmenting());
}

#[test]
fn test_export_current_image() {
    let editor = session(PixelBuffer::filled(12, 8, WHITE));
    let png = editor.export(&ExportFormat::Png).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_click_without_movement_is_one_stroke() {
    let mut editor = session(PixelBuffer::filled(100, 100, WHITE));
    let before = editor.history().len();
    assert!(!editor.in_gesture());

    editor.pointer_down(Pos2::new(50.0, 50.0), Modifiers::NONE).unwrap();
    assert!(editor.in_gesture());
    assert_eq!(alpha_at(&editor, 50, 50), 0);

    assert!(editor.pointer_up(Pos2::new(50.0, 50.0), Modifiers::NONE));
    assert!(!editor.in_gesture());
    assert_eq!(editor.history().len(), before + 1);
    assert_eq!(editor.history().undo_label(), Some("Erase"));
}
