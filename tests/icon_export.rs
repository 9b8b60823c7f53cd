use design_studio::error::EncodeError;
use design_studio::icon::{content_bounds, export_icon_set, render_icon, IconOptions, IconPlatform};
use design_studio::raster::codec::decode;
use design_studio::raster::InputFormat;
use design_studio::scene::{ElementKind, SceneElement, SceneGraph, Style};
use egui::{Color32, Pos2, Rect, Vec2};

const RED: [u8; 4] = [255, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn filled(kind: ElementKind, x: f32, y: f32, fill: Color32) -> SceneElement {
    SceneElement::new(kind, Pos2::new(x, y)).with_style(Style {
        fill,
        ..Style::default()
    })
}

fn rect(x: f32, y: f32, w: f32, h: f32, fill: Color32) -> SceneElement {
    let kind = ElementKind::Rect {
        size: Vec2::new(w, h),
        corner_radius: 0.0,
    };
    filled(kind, x, y, fill)
}

fn scene_of(elements: Vec<SceneElement>) -> SceneGraph {
    let mut scene = SceneGraph::new();
    for element in elements {
        scene.add(element);
    }
    scene
}

fn no_padding() -> IconOptions {
    IconOptions {
        padding: 0.0,
        background: None,
    }
}

#[test]
fn test_content_fills_the_safe_area() {
    let scene = scene_of(vec![rect(0.0, 0.0, 100.0, 100.0, Color32::RED)]);
    let icon = render_icon(&scene, 100, IconPlatform::Standard, &no_padding()).unwrap();

    assert_eq!(icon.dimensions(), (100, 100));
    assert_eq!(icon.pixel(50, 50), RED);
    // An 80% safe area leaves a 10 pixel margin on each side.
    assert_eq!(icon.pixel(10, 10), RED);
    assert_eq!(icon.pixel(89, 89), RED);
    assert_eq!(icon.pixel(9, 9), CLEAR);
    assert_eq!(icon.pixel(90, 90), CLEAR);
    assert_eq!(icon.pixel(5, 50), CLEAR);
}

#[test]
fn test_padding_shrinks_the_content() {
    let scene = scene_of(vec![rect(0.0, 0.0, 100.0, 100.0, Color32::RED)]);
    let options = IconOptions {
        padding: 50.0,
        background: None,
    };
    let icon = render_icon(&scene, 100, IconPlatform::Standard, &options).unwrap();

    assert_eq!(icon.pixel(50, 50), RED);
    assert_eq!(icon.pixel(35, 50), RED);
    assert_eq!(icon.pixel(25, 50), CLEAR);
    assert_eq!(icon.pixel(75, 50), CLEAR);
}

#[test]
fn test_wide_content_is_centered_vertically() {
    let scene = scene_of(vec![rect(0.0, 0.0, 200.0, 100.0, Color32::RED)]);
    let icon = render_icon(&scene, 100, IconPlatform::Standard, &no_padding()).unwrap();

    assert_eq!(icon.pixel(50, 50), RED);
    assert_eq!(icon.pixel(12, 35), RED);
    assert_eq!(icon.pixel(50, 25), CLEAR);
    assert_eq!(icon.pixel(50, 72), CLEAR);
}

#[test]
fn test_background_and_paint_order() {
    let scene = scene_of(vec![
        rect(0.0, 0.0, 100.0, 100.0, Color32::RED),
        rect(25.0, 25.0, 50.0, 50.0, Color32::BLUE),
    ]);
    let options = IconOptions {
        padding: 0.0,
        background: Some(Color32::WHITE),
    };
    let icon = render_icon(&scene, 100, IconPlatform::Standard, &options).unwrap();

    assert_eq!(icon.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(icon.pixel(15, 15), RED);
    assert_eq!(icon.pixel(50, 50), [0, 0, 255, 255]);
}

#[test]
fn test_shapes_keep_their_outline() {
    let circle = filled(ElementKind::Circle { diameter: 100.0 }, 0.0, 0.0, Color32::RED);
    let scene = scene_of(vec![circle]);
    let icon = render_icon(&scene, 100, IconPlatform::Standard, &no_padding()).unwrap();

    assert_eq!(icon.pixel(50, 50), RED);
    assert_eq!(icon.pixel(50, 12), RED);
    // Inside the bounds but outside the disc.
    assert_eq!(icon.pixel(12, 12), CLEAR);
}

#[test]
fn test_hidden_elements_are_not_rendered() {
    let mut cover = rect(0.0, 0.0, 100.0, 100.0, Color32::BLUE);
    cover.visible = false;
    let scene = scene_of(vec![rect(0.0, 0.0, 100.0, 100.0, Color32::RED), cover]);

    assert_eq!(content_bounds(&scene), Some(Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0))));
    let icon = render_icon(&scene, 64, IconPlatform::Web, &no_padding()).unwrap();
    assert_eq!(icon.pixel(32, 32), RED);
}

#[test]
fn test_opacity_lowers_alpha() {
    let mut faded = rect(0.0, 0.0, 100.0, 100.0, Color32::RED);
    faded.opacity = 0.5;
    let scene = scene_of(vec![faded]);
    let icon = render_icon(&scene, 50, IconPlatform::Standard, &no_padding()).unwrap();

    let alpha = icon.alpha(25, 25);
    assert!((120..=136).contains(&alpha), "alpha {}", alpha);
}

#[test]
fn test_empty_or_hidden_scene_has_nothing_to_export() {
    let empty = SceneGraph::new();
    let err = render_icon(&empty, 32, IconPlatform::Standard, &IconOptions::default()).unwrap_err();
    assert!(matches!(err, EncodeError::EmptyScene));

    let mut hidden = rect(0.0, 0.0, 10.0, 10.0, Color32::RED);
    hidden.visible = false;
    let scene = scene_of(vec![hidden]);
    let err = export_icon_set(&scene, IconPlatform::Android, &IconOptions::default()).unwrap_err();
    assert!(matches!(err, EncodeError::EmptyScene));
}

#[test]
fn test_icon_set_has_one_png_per_size() {
    let scene = scene_of(vec![rect(0.0, 0.0, 100.0, 60.0, Color32::RED)]);
    let files = export_icon_set(&scene, IconPlatform::Android, &IconOptions::default()).unwrap();

    let sizes: Vec<u32> = files.iter().map(|f| f.size).collect();
    assert_eq!(sizes, IconPlatform::Android.sizes());
    assert_eq!(files[0].file_name("logo"), "logo-48x48.png");

    let decoded = decode(&files[0].bytes, InputFormat::Png).unwrap();
    assert_eq!(decoded.dimensions(), (48, 48));
    assert_eq!(decoded.pixel(24, 24), RED);
    assert_eq!(decoded.pixel(0, 0), CLEAR);
}

#[test]
fn test_safe_areas_by_platform() {
    assert_eq!(IconPlatform::Standard.safe_area(), 0.8);
    assert_eq!(IconPlatform::Ios.safe_area(), 0.7);
    assert_eq!(IconPlatform::GooglePlay.sizes(), &[512]);
    assert!(IconPlatform::ALL.iter().all(|p| p.sizes().windows(2).all(|w| w[0] < w[1])));
}
