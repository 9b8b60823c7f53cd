use egui::emath::Rot2;
use egui::{Pos2, Rect};

use super::shapes;
use crate::scene::{ElementId, ElementKind, SceneElement, SceneGraph};

/// Extra reach around thin elements (lines, outlines) in content units.
pub const HIT_TOLERANCE: f32 = 4.0;

/// Bring `p` into the element's unrotated frame.
fn to_local(element: &SceneElement, p: Pos2) -> Pos2 {
    if element.rotation == 0.0 {
        return p;
    }
    let c = element.center();
    let inverse = Rot2::from_angle(-element.rotation.to_radians());
    c + inverse * (p - c)
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether `p` (content space) lands on `element`, honoring rotation.
pub fn contains_point(element: &SceneElement, p: Pos2) -> bool {
    let local = to_local(element, p);
    let bounds = element.bounds();
    let stroke = element.style.stroke.as_ref().map_or(0.0, |s| s.width / 2.0);

    match &element.kind {
        ElementKind::Circle { .. } => {
            let c = bounds.center();
            let rx = bounds.width() / 2.0 + stroke;
            let ry = bounds.height() / 2.0 + stroke;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let dx = (local.x - c.x) / rx;
            let dy = (local.y - c.y) / ry;
            dx * dx + dy * dy <= 1.0
        }
        ElementKind::Line { points } => {
            let reach = stroke.max(HIT_TOLERANCE);
            let to_world = |q: &Pos2| bounds.min + q.to_vec2() * element.scale;
            points
                .windows(2)
                .any(|w| distance_to_segment(local, to_world(&w[0]), to_world(&w[1])) <= reach)
        }
        _ => bounds.expand(stroke).contains(local),
    }
}

/// Whether `p` (content space) lies inside the painted fill of `element`,
/// honoring rotation. Text, lines and groups have no fill of their own.
pub fn fill_contains(element: &SceneElement, p: Pos2) -> bool {
    let local = to_local(element, p);
    let bounds = element.bounds();
    match &element.kind {
        ElementKind::Circle { .. } => {
            let c = bounds.center();
            let (rx, ry) = (bounds.width() / 2.0, bounds.height() / 2.0);
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let dx = (local.x - c.x) / rx;
            let dy = (local.y - c.y) / ry;
            dx * dx + dy * dy <= 1.0
        }
        ElementKind::Rect { corner_radius, .. } => shapes::rounded_rect_contains(bounds, *corner_radius, local),
        ElementKind::Triangle { .. } => shapes::polygon_contains(&shapes::triangle(bounds), local),
        ElementKind::Star {
            points, inner_ratio, ..
        } => {
            let outer = element.size().min_elem() / 2.0;
            let outline = shapes::star(bounds.center(), outer, outer * inner_ratio.clamp(0.05, 1.0), *points, 0.0);
            shapes::polygon_contains(&outline, local)
        }
        ElementKind::Polygon { sides, .. } => {
            let radius = element.size().min_elem() / 2.0;
            shapes::polygon_contains(&shapes::regular_polygon(bounds.center(), radius, *sides, 0.0), local)
        }
        ElementKind::Button(widget) | ElementKind::Card(widget) => {
            shapes::rounded_rect_contains(bounds, widget.corner_radius, local)
        }
        ElementKind::Text(_) | ElementKind::Line { .. } | ElementKind::Group { .. } => false,
        _ => bounds.contains(local),
    }
}

/// Distance from `p` to the nearest segment of a line element, or `None`
/// for any other kind.
pub fn line_distance(element: &SceneElement, p: Pos2) -> Option<f32> {
    let ElementKind::Line { points } = &element.kind else {
        return None;
    };
    let local = to_local(element, p);
    let origin = element.bounds().min;
    let to_world = |q: &Pos2| origin + q.to_vec2() * element.scale;
    points
        .windows(2)
        .map(|w| distance_to_segment(local, to_world(&w[0]), to_world(&w[1])))
        .reduce(f32::min)
}

/// Topmost visible element under `p`.
pub fn element_at(scene: &SceneGraph, p: Pos2) -> Option<ElementId> {
    scene
        .elements()
        .iter()
        .rev()
        .find(|e| e.visible && contains_point(e, p))
        .map(|e| e.id)
}

/// Visible elements whose rotated bounds touch the marquee, in paint order.
pub fn elements_in_rect(scene: &SceneGraph, marquee: Rect) -> Vec<ElementId> {
    scene
        .elements()
        .iter()
        .filter(|e| e.visible && e.world_bounds().intersects(marquee))
        .map(|e| e.id)
        .collect()
}
