use crate::app::{StudioApp, Workspace};
use crate::command::HistoryStack;

fn history_grid<T>(ui: &mut egui::Ui, history: &HistoryStack<T>) {
    ui.label(format!("{} of {} entries", history.len(), history.capacity()));
    egui::Grid::new("history_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            for (i, entry) in history.entries().iter().enumerate() {
                let label = if history.pointer() == Some(i) {
                    egui::RichText::new(entry.label()).strong()
                } else if history.pointer().is_some_and(|p| i > p) {
                    egui::RichText::new(entry.label()).weak()
                } else {
                    egui::RichText::new(entry.label())
                };
                ui.label(format!("{}", i + 1));
                ui.label(label);
                ui.end_row();
            }
        });
}

pub fn history_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::SidePanel::right("history_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("History");
            egui::ScrollArea::vertical().show(ui, |ui| match app.workspace {
                Workspace::Image => history_grid(ui, app.editor.history()),
                Workspace::Scene => history_grid(ui, app.document.history()),
            });
        });
}
