use crate::app::{StudioApp, Workspace};

pub fn menu_bar(app: &mut StudioApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut app.workspace, Workspace::Image, "Image");
            ui.selectable_value(&mut app.workspace, Workspace::Scene, "Scene");
            ui.separator();

            let busy = app.editor.is_segmenting();
            match app.workspace {
                Workspace::Image => {
                    let history = app.editor.history();
                    let (can_undo, can_redo) = (history.can_undo() && !busy, history.can_redo() && !busy);
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        if let Err(e) = app.editor.undo() {
                            app.report(e);
                        }
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        if let Err(e) = app.editor.redo() {
                            app.report(e);
                        }
                    }
                    ui.label(format!("{:.0}%", app.editor.viewport().zoom() * 100.0));
                }
                Workspace::Scene => {
                    let history = app.document.history();
                    let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        app.document.undo();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        app.document.redo();
                    }
                    ui.label(format!("{:.0}%", app.document.viewport().zoom() * 100.0));
                }
            }

            if let Some(status) = app.status.clone() {
                ui.separator();
                ui.label(status);
                if ui.small_button("x").clicked() {
                    app.status = None;
                }
            }
        });
    });
}
