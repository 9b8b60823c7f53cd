use design_studio::config::ZoomRange;
use design_studio::viewport::{Grid, Viewport, FIT_MARGIN};
use egui::{Pos2, Vec2};

fn approx(a: Pos2, b: Pos2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn test_screen_and_content_are_inverse() {
    let mut viewport = Viewport::new(ZoomRange::VECTOR, Vec2::new(400.0, 300.0));
    viewport.pan_by(Vec2::new(35.0, -12.0));
    viewport.zoom_at(Pos2::new(100.0, 100.0), 2.5);

    for p in [Pos2::ZERO, Pos2::new(17.0, 230.0), Pos2::new(-40.0, 900.0)] {
        assert!(approx(viewport.to_content(viewport.to_screen(p)), p));
    }
}

#[test]
fn test_zoom_keeps_anchor_fixed() {
    let mut viewport = Viewport::new(ZoomRange::VECTOR, Vec2::new(400.0, 300.0));
    let anchor = Pos2::new(120.0, 80.0);
    let under = viewport.to_content(anchor);

    viewport.zoom_at(anchor, 3.0);
    assert_eq!(viewport.zoom(), 3.0);
    assert!(approx(viewport.to_screen(under), anchor));

    viewport.zoom_out(anchor);
    assert!(approx(viewport.to_screen(under), anchor));
}

#[test]
fn test_zoom_is_clamped() {
    let mut raster = Viewport::new(ZoomRange::RASTER, Vec2::new(100.0, 100.0));
    raster.zoom_at(Pos2::ZERO, 10.0);
    assert_eq!(raster.zoom(), 3.0);
    raster.zoom_at(Pos2::ZERO, 0.01);
    assert_eq!(raster.zoom(), 0.5);
    raster.zoom_out(Pos2::ZERO);
    assert_eq!(raster.zoom(), 0.5);

    let mut vector = Viewport::new(ZoomRange::VECTOR, Vec2::new(100.0, 100.0));
    vector.zoom_at(Pos2::ZERO, 100.0);
    assert_eq!(vector.zoom(), 8.0);
    vector.zoom_at(Pos2::ZERO, 0.0);
    assert_eq!(vector.zoom(), 0.1);
    vector.zoom_at(Pos2::ZERO, f32::NAN);
    assert_eq!(vector.zoom(), 1.0);
}

#[test]
fn test_zoom_steps() {
    let mut viewport = Viewport::new(ZoomRange::RASTER, Vec2::new(100.0, 100.0));
    viewport.zoom_in(Pos2::ZERO);
    assert_eq!(viewport.zoom(), 1.25);
    viewport.zoom_out(Pos2::ZERO);
    viewport.zoom_out(Pos2::ZERO);
    assert_eq!(viewport.zoom(), 0.75);
}

#[test]
fn test_fit_centers_content_with_margin() {
    let mut viewport = Viewport::new(ZoomRange::RASTER, Vec2::new(400.0, 200.0));
    viewport.fit(Vec2::new(800.0, 800.0));

    // Width limits: 800 / 400 = 2.
    assert!((viewport.zoom() - 2.0 * FIT_MARGIN).abs() < 1e-5);
    let rect = viewport.content_rect();
    assert!(approx(rect.center(), Pos2::new(400.0, 400.0)));
}

#[test]
fn test_fit_without_content_resets() {
    let mut viewport = Viewport::new(ZoomRange::RASTER, Vec2::ZERO);
    viewport.pan_by(Vec2::new(10.0, 10.0));
    viewport.fit(Vec2::new(800.0, 600.0));
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan(), Vec2::ZERO);
}

#[test]
fn test_clamped_mapping_stays_inside_content() {
    let viewport = Viewport::new(ZoomRange::RASTER, Vec2::new(50.0, 40.0));
    assert_eq!(viewport.to_content_clamped(Pos2::new(-5.0, 100.0)), Pos2::new(0.0, 40.0));
    assert_eq!(viewport.to_content_clamped(Pos2::new(25.0, 10.0)), Pos2::new(25.0, 10.0));
}

#[test]
fn test_grid_snap() {
    let mut grid = Grid::default();
    assert_eq!(grid.snap(Pos2::new(9.0, 11.0)), Pos2::new(0.0, 20.0));
    assert_eq!(grid.snap(Pos2::new(-31.0, 50.0)), Pos2::new(-40.0, 60.0));

    grid.snap = false;
    assert_eq!(grid.snap(Pos2::new(9.0, 11.0)), Pos2::new(9.0, 11.0));
}
