use egui::{Pos2, Rect, Vec2};

/// Vertices of a regular polygon, the first one pointing up.
pub fn regular_polygon(center: Pos2, radius: f32, sides: u32, rotation: f32) -> Vec<Pos2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let a = rotation - std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::TAU / sides as f32;
            center + radius * Vec2::angled(a)
        })
        .collect()
}

/// Alternating outer and inner vertices of a star, the first tip pointing up.
pub fn star(center: Pos2, outer: f32, inner: f32, points: u32, rotation: f32) -> Vec<Pos2> {
    let points = points.max(2);
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = rotation - std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / points as f32;
            center + r * Vec2::angled(a)
        })
        .collect()
}

/// Apex at the top middle, base along the bottom edge.
pub fn triangle(bounds: Rect) -> [Pos2; 3] {
    [bounds.center_top(), bounds.right_bottom(), bounds.left_bottom()]
}

/// Even-odd test, so concave outlines such as stars work.
pub fn polygon_contains(outline: &[Pos2], p: Pos2) -> bool {
    let mut inside = false;
    let mut j = outline.len().wrapping_sub(1);
    for i in 0..outline.len() {
        let (a, b) = (outline[i], outline[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn rounded_rect_contains(rect: Rect, radius: f32, p: Pos2) -> bool {
    if !rect.contains(p) {
        return false;
    }
    let r = radius.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    if r <= 0.0 {
        return true;
    }
    let inner = rect.shrink(r);
    let nearest = Pos2::new(p.x.clamp(inner.min.x, inner.max.x), p.y.clamp(inner.min.y, inner.max.y));
    p.distance(nearest) <= r
}
