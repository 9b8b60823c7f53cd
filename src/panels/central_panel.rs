use egui::{Pos2, Rect, Sense};

use crate::app::{SceneGesture, StudioApp, Workspace};
use crate::geometry;

/// Relative zoom change per point of scrolling in the scene editor.
const SCROLL_ZOOM_SPEED: f32 = 0.0015;

fn image_canvas(app: &mut StudioApp, ui: &mut egui::Ui, response: &egui::Response, painter: &egui::Painter) {
    let rect = response.rect;
    let modifiers = ui.input(|i| i.modifiers);
    let latest = ui.input(|i| i.pointer.latest_pos());
    let local = |p: Pos2| p - rect.min.to_vec2();

    // Strokes start on press so a click without movement still stamps.
    let pressed = response.is_pointer_button_down_on() && ui.input(|i| i.pointer.any_pressed());
    if pressed && !app.editor.in_gesture() {
        if let Some(p) = response.interact_pointer_pos().or(latest) {
            if let Err(e) = app.editor.pointer_down(local(p), modifiers) {
                app.report(e);
            }
        }
    } else if app.editor.in_gesture() && response.dragged() {
        if let Some(p) = response.interact_pointer_pos() {
            app.editor.pointer_move(local(p), modifiers);
        }
    }
    if app.editor.in_gesture() && !ui.input(|i| i.pointer.any_down()) {
        if let Some(p) = latest.or(response.interact_pointer_pos()) {
            app.editor.pointer_up(local(p), modifiers);
        }
    }

    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll > 0.0 {
            app.editor.viewport_mut().zoom_in(local(hover));
        } else if scroll < 0.0 {
            app.editor.viewport_mut().zoom_out(local(hover));
        }
    }

    let ctx = ui.ctx().clone();
    app.renderer.render_raster(&ctx, painter, rect, &app.editor, response.hover_pos());

    if app.editor.is_segmenting() {
        ui.put(
            Rect::from_center_size(rect.center(), egui::vec2(48.0, 48.0)),
            egui::Spinner::new().size(48.0),
        );
    }
}

fn scene_canvas(app: &mut StudioApp, ui: &mut egui::Ui, response: &egui::Response, painter: &egui::Painter) {
    let rect = response.rect;
    let modifiers = ui.input(|i| i.modifiers);
    let additive = modifiers.shift || modifiers.command;
    let to_content = |app: &StudioApp, p: Pos2| app.document.viewport().to_content(p - rect.min.to_vec2());

    if response.clicked() {
        if let Some(p) = response.interact_pointer_pos() {
            let content = to_content(app, p);
            app.document.select_at(content, additive);
        }
    }

    if response.drag_started() {
        if let Some(p) = response.interact_pointer_pos() {
            let content = to_content(app, p);
            app.gesture = if modifiers.alt || response.dragged_by(egui::PointerButton::Middle) {
                SceneGesture::Pan
            } else {
                match geometry::element_at(app.document.scene(), content) {
                    Some(id) => {
                        if !app.document.selection().contains(id) {
                            app.document.select_at(content, additive);
                        }
                        match app.document.begin_drag() {
                            Ok(_) => SceneGesture::Move,
                            Err(e) => {
                                app.report(e);
                                SceneGesture::None
                            }
                        }
                    }
                    None => SceneGesture::Marquee {
                        start: content,
                        end: content,
                    },
                }
            };
        }
    } else if response.dragged() {
        let delta = response.drag_delta();
        match app.gesture {
            SceneGesture::Move => {
                let zoom = app.document.viewport().zoom();
                if let Err(e) = app.document.drag_selected(delta / zoom) {
                    app.report(e);
                }
            }
            SceneGesture::Pan => app.document.viewport_mut().pan_by(delta),
            SceneGesture::Marquee { start, .. } => {
                if let Some(p) = response.interact_pointer_pos() {
                    let end = to_content(app, p);
                    app.gesture = SceneGesture::Marquee { start, end };
                }
            }
            SceneGesture::None => {}
        }
    }

    if response.drag_stopped() {
        match std::mem::take(&mut app.gesture) {
            SceneGesture::Move => {
                if let Err(e) = app.document.end_drag() {
                    app.report(e);
                }
            }
            SceneGesture::Marquee { start, end } => {
                app.document.select_in_rect(Rect::from_two_pos(start, end), additive);
            }
            SceneGesture::Pan | SceneGesture::None => {}
        }
    }

    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            let viewport = app.document.viewport_mut();
            let zoom = viewport.zoom() * (1.0 + scroll * SCROLL_ZOOM_SPEED);
            viewport.zoom_at(hover - rect.min.to_vec2(), zoom);
        }
    }

    let marquee = match app.gesture {
        SceneGesture::Marquee { start, end } => Some(Rect::from_two_pos(start, end)),
        _ => None,
    };
    app.renderer.render_scene(painter, rect, &app.document, marquee);
}

pub fn central_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        app.canvas_size = response.rect.size();
        match app.workspace {
            Workspace::Image => image_canvas(app, ui, &response, &painter),
            Workspace::Scene => scene_canvas(app, ui, &response, &painter),
        }
    });
}
