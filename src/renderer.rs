use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, TextureHandle, Vec2};

use crate::document::Document;
use crate::geometry::shapes::{regular_polygon, star};
use crate::raster::{BrushMode, BrushShape, PixelBuffer};
use crate::scene::{ElementKind, SceneElement};
use crate::state::EditorContext;
use crate::viewport::{Grid, Viewport};

const CHECKER_SIZE: f32 = 10.0;
const CHECKER_LIGHT: Color32 = Color32::from_gray(200);
const CHECKER_DARK: Color32 = Color32::from_gray(160);
const SELECTION_COLOR: Color32 = Color32::from_rgb(0x38, 0xbd, 0xf8);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(18, 18, 18, 18);

/// Maps content space onto the canvas widget.
#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: Pos2,
    viewport: Viewport,
}

impl Frame {
    fn point(&self, p: Pos2) -> Pos2 {
        self.origin + self.viewport.to_screen(p).to_vec2()
    }

    fn len(&self, l: f32) -> f32 {
        l * self.viewport.zoom()
    }

    fn rect(&self, r: Rect) -> Rect {
        Rect::from_min_max(self.point(r.min), self.point(r.max))
    }
}

pub fn to_image(buffer: &PixelBuffer) -> egui::ColorImage {
    let (w, h) = buffer.dimensions();
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], buffer.as_raw())
}

/// Draws both editors. Owns the GPU texture of the raster session.
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
    /// (`EditorContext::revision`, showing original) the texture was built from.
    uploaded: Option<(u64, bool)>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_texture", &self.texture.is_some())
            .field("uploaded", &self.uploaded)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-upload the raster when the session changed since the last frame.
    fn sync_texture(&mut self, ctx: &egui::Context, editor: &EditorContext) {
        let key = (editor.revision(), editor.show_original());
        if self.uploaded == Some(key) {
            return;
        }
        let Some(buffer) = editor.display_buffer() else {
            self.texture = None;
            self.uploaded = Some(key);
            return;
        };
        let image = to_image(buffer);
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("raster", image, egui::TextureOptions::NEAREST));
            }
        }
        self.uploaded = Some(key);
    }

    fn paint_checkerboard(painter: &egui::Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, CHECKER_LIGHT);
        let clip = painter.clip_rect().intersect(rect);
        if !clip.is_positive() {
            return;
        }
        let cols = (rect.width() / CHECKER_SIZE).ceil() as i32;
        let rows = (rect.height() / CHECKER_SIZE).ceil() as i32;
        for row in 0..rows {
            for col in (row % 2..cols).step_by(2) {
                let min = rect.min + Vec2::new(col as f32, row as f32) * CHECKER_SIZE;
                let cell = Rect::from_min_size(min, Vec2::splat(CHECKER_SIZE)).intersect(rect);
                if cell.intersects(clip) {
                    painter.rect_filled(cell, 0.0, CHECKER_DARK);
                }
            }
        }
    }

    /// Paint the raster session into `canvas`, plus the brush cursor.
    pub fn render_raster(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        canvas: Rect,
        editor: &EditorContext,
        hover: Option<Pos2>,
    ) {
        self.sync_texture(ctx, editor);
        let frame = Frame {
            origin: canvas.min,
            viewport: *editor.viewport(),
        };
        let Some(texture) = &self.texture else {
            painter.text(
                canvas.center(),
                Align2::CENTER_CENTER,
                "Drop a PNG, JPEG or WebP image here",
                FontId::proportional(18.0),
                Color32::GRAY,
            );
            return;
        };

        let image_rect = frame.rect(Rect::from_min_size(Pos2::ZERO, editor.viewport().content_size()));
        Self::paint_checkerboard(painter, image_rect);
        painter.image(
            texture.id(),
            image_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        if let Some(hover) = hover.filter(|p| canvas.contains(*p)) {
            let brush = editor.brush();
            let center = frame.point(editor.viewport().to_content(hover - canvas.min.to_vec2()));
            let r = frame.len(brush.radius);
            let color = match brush.mode {
                BrushMode::Erase => Color32::from_rgb(0xef, 0x44, 0x44),
                BrushMode::Restore => Color32::from_rgb(0x22, 0xc5, 0x5e),
            };
            let stroke = Stroke::new(1.5, color);
            match brush.shape {
                BrushShape::Circle => {
                    painter.circle_stroke(center, r, stroke);
                }
                BrushShape::Square => {
                    painter.rect_stroke(Rect::from_center_size(center, Vec2::splat(2.0 * r)), 0.0, stroke);
                }
            }
        }
    }

    fn paint_grid(painter: &egui::Painter, canvas: Rect, frame: &Frame, grid: &Grid) {
        let step = frame.len(grid.size);
        if !grid.visible || step < 4.0 {
            return;
        }
        let stroke = Stroke::new(1.0, GRID_COLOR);
        let start = frame.point(Pos2::ZERO);
        let first_x = canvas.min.x + (start.x - canvas.min.x).rem_euclid(step);
        let first_y = canvas.min.y + (start.y - canvas.min.y).rem_euclid(step);
        let mut x = first_x;
        while x < canvas.max.x {
            painter.vline(x, canvas.y_range(), stroke);
            x += step;
        }
        let mut y = first_y;
        while y < canvas.max.y {
            painter.hline(canvas.x_range(), y, stroke);
            y += step;
        }
    }

    /// Paint the scene in layer order, then selection outlines and an
    /// optional marquee (content space).
    pub fn render_scene(&self, painter: &egui::Painter, canvas: Rect, document: &Document, marquee: Option<Rect>) {
        let frame = Frame {
            origin: canvas.min,
            viewport: *document.viewport(),
        };
        Self::paint_grid(painter, canvas, &frame, document.grid());

        for element in document.scene().elements().iter().filter(|e| e.visible) {
            paint_element(painter, &frame, element, Vec2::ZERO);
        }

        for id in document.selection().ids() {
            if let Some(element) = document.scene().get(*id) {
                let corners: Vec<Pos2> = element.corners().iter().map(|p| frame.point(*p)).collect();
                painter.add(Shape::closed_line(corners, Stroke::new(1.5, SELECTION_COLOR)));
            }
        }

        if let Some(marquee) = marquee {
            let rect = frame.rect(marquee);
            painter.rect_filled(rect, 0.0, SELECTION_COLOR.gamma_multiply(0.1));
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SELECTION_COLOR));
        }
    }
}

/// egui only fills convex polygons; concave outlines get a center fan.
fn fill_fan(painter: &egui::Painter, center: Pos2, outline: &[Pos2], fill: Color32) {
    for i in 0..outline.len() {
        let next = outline[(i + 1) % outline.len()];
        painter.add(Shape::convex_polygon(vec![center, outline[i], next], fill, Stroke::NONE));
    }
}

fn paint_element(painter: &egui::Painter, frame: &Frame, element: &SceneElement, parent: Vec2) {
    let opacity = element.opacity.clamp(0.0, 1.0);
    let fill = element.style.fill.gamma_multiply(opacity);
    let stroke = element.style.stroke.as_ref().map_or(Stroke::NONE, |s| {
        Stroke::new(frame.len(s.width), s.color.gamma_multiply(opacity))
    });
    let rotation = element.rotation.to_radians();
    let bounds = element.bounds().translate(parent);
    let center = frame.point(bounds.center());
    let corners: Vec<Pos2> = element.corners().iter().map(|p| frame.point(*p + parent)).collect();

    if let Some(shadow) = element.style.shadow {
        let shadow_color = shadow.color.gamma_multiply(shadow.opacity * opacity);
        let offset = shadow.offset * frame.viewport.zoom();
        painter.add(Shape::convex_polygon(
            corners.iter().map(|p| *p + offset).collect(),
            shadow_color,
            Stroke::NONE,
        ));
    }

    match &element.kind {
        ElementKind::Circle { .. } => {
            let size = element.size() * frame.viewport.zoom();
            if (size.x - size.y).abs() < f32::EPSILON {
                painter.circle(center, size.x / 2.0, fill, stroke);
            } else {
                let outline: Vec<Pos2> = (0..64)
                    .map(|i| {
                        let a = i as f32 * std::f32::consts::TAU / 64.0;
                        let local = Vec2::new(a.cos() * size.x / 2.0, a.sin() * size.y / 2.0);
                        center + egui::emath::Rot2::from_angle(rotation) * local
                    })
                    .collect();
                painter.add(Shape::convex_polygon(outline, fill, stroke));
            }
        }
        ElementKind::Rect { corner_radius, .. } if element.rotation == 0.0 => {
            let rect = frame.rect(bounds);
            painter.rect(rect, frame.len(*corner_radius), fill, stroke);
        }
        ElementKind::Rect { .. } | ElementKind::Path { .. } => {
            painter.add(Shape::convex_polygon(corners, fill, stroke));
        }
        ElementKind::Triangle { .. } => {
            let apex = Pos2::new((corners[0].x + corners[1].x) / 2.0, (corners[0].y + corners[1].y) / 2.0);
            painter.add(Shape::convex_polygon(vec![apex, corners[2], corners[3]], fill, stroke));
        }
        ElementKind::Star {
            points, inner_ratio, ..
        } => {
            let outer = frame.len(element.size().min_elem() / 2.0);
            let outline = star(center, outer, outer * inner_ratio.clamp(0.05, 1.0), *points, rotation);
            fill_fan(painter, center, &outline, fill);
            painter.add(Shape::closed_line(outline, stroke));
        }
        ElementKind::Polygon { sides, .. } => {
            let radius = frame.len(element.size().min_elem() / 2.0);
            painter.add(Shape::convex_polygon(
                regular_polygon(center, radius, *sides, rotation),
                fill,
                stroke,
            ));
        }
        ElementKind::Text(text) => {
            painter.text(
                frame.point(bounds.min),
                Align2::LEFT_TOP,
                text.display_text(),
                FontId::proportional(frame.len(text.font_size * element.scale.y).max(1.0)),
                fill,
            );
        }
        ElementKind::Line { points } => {
            let line_stroke = if stroke == Stroke::NONE {
                Stroke::new(frame.len(2.0), fill)
            } else {
                stroke
            };
            let pts: Vec<Pos2> = points
                .iter()
                .map(|p| frame.point(bounds.min + p.to_vec2() * element.scale))
                .collect();
            painter.add(Shape::line(pts, line_stroke));
        }
        ElementKind::Group { children } => {
            for child in children.iter().filter(|c| c.visible) {
                paint_element(painter, frame, child, parent + element.position.to_vec2());
            }
        }
        ElementKind::Button(widget) | ElementKind::Card(widget) => {
            let rect = frame.rect(bounds);
            painter.rect(rect, frame.len(widget.corner_radius), fill, stroke);
            paint_label(painter, frame, rect, &widget.label, widget.font_size, widget.text_color, Align2::CENTER_CENTER);
        }
        ElementKind::ProgressBar { widget, value } => {
            let rect = frame.rect(bounds);
            let rounding = frame.len(widget.corner_radius);
            painter.rect(rect, rounding, Color32::from_gray(60).gamma_multiply(opacity), stroke);
            let mut done = rect;
            done.set_width(rect.width() * value.clamp(0.0, 1.0));
            painter.rect_filled(done, rounding, fill);
        }
        ElementKind::Menu { widget, items } => {
            let rect = frame.rect(bounds);
            painter.rect(rect, frame.len(widget.corner_radius), fill, stroke);
            let slot = rect.width() / items.len().max(1) as f32;
            for (i, item) in items.iter().enumerate() {
                let cell = Rect::from_min_size(rect.min + Vec2::new(slot * i as f32, 0.0), Vec2::new(slot, rect.height()));
                paint_label(painter, frame, cell, item, widget.font_size, widget.text_color, Align2::CENTER_CENTER);
            }
        }
        ElementKind::Input { widget, placeholder } => {
            let rect = frame.rect(bounds);
            painter.rect(rect, frame.len(widget.corner_radius), fill, Stroke::new(1.0, Color32::GRAY));
            let text = if widget.label.is_empty() { placeholder } else { &widget.label };
            let inset = rect.shrink(frame.len(8.0));
            paint_label(painter, frame, inset, text, widget.font_size, widget.text_color, Align2::LEFT_CENTER);
        }
        ElementKind::Checkbox { widget, checked } => {
            let rect = frame.rect(bounds);
            let side = rect.height().min(frame.len(18.0));
            let tick = Rect::from_min_size(Pos2::new(rect.min.x, rect.center().y - side / 2.0), Vec2::splat(side));
            painter.rect(tick, 2.0, if *checked { fill } else { Color32::TRANSPARENT }, Stroke::new(1.0, fill));
            let label_rect = Rect::from_min_max(Pos2::new(tick.max.x + frame.len(6.0), rect.min.y), rect.max);
            paint_label(painter, frame, label_rect, &widget.label, widget.font_size, widget.text_color, Align2::LEFT_CENTER);
        }
    }
}

fn paint_label(
    painter: &egui::Painter,
    frame: &Frame,
    rect: Rect,
    text: &str,
    font_size: f32,
    color: Color32,
    align: Align2,
) {
    if text.is_empty() {
        return;
    }
    let pos = align.pos_in_rect(&rect);
    painter.text(pos, align, text, FontId::proportional(frame.len(font_size).max(1.0)), color);
}
