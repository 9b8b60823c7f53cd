use egui::{Color32, Pos2, Vec2};

use crate::app::{StudioApp, Workspace};
use crate::command::Command;
use crate::icon::IconPlatform;
use crate::palette::{self, PaletteMode, ROLES};
use crate::raster::{BrushMode, BrushShape, DashStyle, ExportFormat};
use crate::scene::align::{MIN_ALIGN_MEMBERS, MIN_DISTRIBUTE_MEMBERS};
use crate::scene::{
    Alignment, DistributeAxis, ElementId, ElementKind, ElementPatch, ReorderDirection, SceneElement, TextContent, Widget,
};

const PRESETS: [&str; 12] = [
    "Rectangle", "Circle", "Triangle", "Star", "Polygon", "Text", "Line", "Button", "Card", "Progress", "Input",
    "Checkbox",
];

fn preset(name: &str) -> Option<ElementKind> {
    let kind = match name {
        "Rectangle" => ElementKind::Rect {
            size: Vec2::new(120.0, 80.0),
            corner_radius: 0.0,
        },
        "Circle" => ElementKind::Circle { diameter: 100.0 },
        "Triangle" => ElementKind::Triangle {
            size: Vec2::new(100.0, 90.0),
        },
        "Star" => ElementKind::Star {
            size: 100.0,
            points: 5,
            inner_ratio: 0.5,
        },
        "Polygon" => ElementKind::Polygon { size: 100.0, sides: 6 },
        "Text" => ElementKind::Text(TextContent::default()),
        "Line" => ElementKind::Line {
            points: vec![Pos2::ZERO, Pos2::new(120.0, 0.0)],
        },
        "Button" => ElementKind::Button(Widget::new("Button", Vec2::new(120.0, 40.0))),
        "Card" => ElementKind::Card(Widget::new("Card", Vec2::new(220.0, 140.0))),
        "Progress" => ElementKind::ProgressBar {
            widget: Widget::new("", Vec2::new(200.0, 16.0)),
            value: 0.5,
        },
        "Input" => ElementKind::Input {
            widget: Widget::new("", Vec2::new(200.0, 36.0)),
            placeholder: "Type here".to_owned(),
        },
        "Checkbox" => ElementKind::Checkbox {
            widget: Widget::new("Option", Vec2::new(120.0, 24.0)),
            checked: true,
        },
        _ => return None,
    };
    Some(kind)
}

fn image_tools(app: &mut StudioApp, ui: &mut egui::Ui) {
    let busy = app.editor.is_segmenting();
    let limits = app.editor.config().brush;

    ui.heading("Brush");
    let mut brush = *app.editor.brush();
    ui.horizontal(|ui| {
        ui.selectable_value(&mut brush.mode, BrushMode::Erase, "Erase");
        ui.selectable_value(&mut brush.mode, BrushMode::Restore, "Restore");
    });
    ui.horizontal(|ui| {
        ui.selectable_value(&mut brush.shape, BrushShape::Circle, "Circle");
        ui.selectable_value(&mut brush.shape, BrushShape::Square, "Square");
    });
    ui.add(egui::Slider::new(&mut brush.radius, limits.min_radius..=limits.max_radius).text("Radius"));
    ui.add_enabled(
        brush.mode == BrushMode::Erase,
        egui::Slider::new(&mut brush.hardness, 0.0..=1.0).text("Hardness"),
    );
    if brush != *app.editor.brush() {
        app.editor.set_brush(brush);
    }
    let mut show_original = app.editor.show_original();
    if ui.checkbox(&mut show_original, "Show original").changed() {
        app.editor.toggle_show_original();
    }

    ui.separator();
    ui.heading("Outline");
    ui.horizontal(|ui| {
        ui.label("Color");
        ui.color_edit_button_srgba(&mut app.outline.color);
    });
    ui.add(egui::Slider::new(&mut app.outline.thickness, 1.0..=10.0).text("Thickness"));
    egui::ComboBox::from_label("Dash")
        .selected_text(format!("{:?}", app.outline.dash))
        .show_ui(ui, |ui| {
            for dash in [DashStyle::Solid, DashStyle::Dashed, DashStyle::Dotted] {
                ui.selectable_value(&mut app.outline.dash, dash, format!("{:?}", dash));
            }
        });
    let loaded = app.editor.is_loaded();
    if ui.add_enabled(loaded && !busy, egui::Button::new("Trace outline")).clicked() {
        let outline = app.outline;
        match app.editor.apply_outline(&outline) {
            Ok(true) => app.notify("Outline applied"),
            Ok(false) => app.notify("No boundary found"),
            Err(e) => app.report(e),
        }
    }

    ui.separator();
    ui.heading("Background");
    ui.add(egui::Slider::new(&mut app.segmenter.tolerance, 0.0..=100.0).text("Tolerance"));
    ui.checkbox(&mut app.segmenter.contiguous, "Contiguous");
    if busy {
        ui.horizontal(|ui| {
            ui.spinner();
            if ui.button("Cancel").clicked() {
                app.editor.cancel_segmentation();
            }
        });
    } else if ui.add_enabled(loaded, egui::Button::new("Remove background")).clicked() {
        app.start_segmentation();
    }
    if ui.add_enabled(loaded && !busy, egui::Button::new("Reset to original")).clicked() {
        if let Err(e) = app.editor.reset_to_original() {
            app.report(e);
        }
    }

    ui.separator();
    ui.heading("Export");
    let jpeg = ExportFormat::Jpeg {
        quality: 90,
        background: Color32::WHITE,
    };
    egui::ComboBox::from_label("Format")
        .selected_text(app.export_format.extension())
        .show_ui(ui, |ui| {
            for format in [ExportFormat::Png, jpeg, ExportFormat::WebP] {
                let selected = std::mem::discriminant(&app.export_format) == std::mem::discriminant(&format);
                if ui.selectable_label(selected, format.extension()).clicked() && !selected {
                    app.export_format = format;
                }
            }
        });
    if let ExportFormat::Jpeg { quality, background } = &mut app.export_format {
        ui.add(egui::Slider::new(quality, 1..=100).text("Quality"));
        ui.horizontal(|ui| {
            ui.label("Background");
            ui.color_edit_button_srgba(background);
        });
    }
    if ui.add_enabled(loaded, egui::Button::new("Export image")).clicked() {
        app.export_image();
    }
}

fn run(app: &mut StudioApp, command: Command) {
    if let Err(e) = app.document.execute(command) {
        app.report(e);
    }
}

fn scene_tools(app: &mut StudioApp, ui: &mut egui::Ui) {
    let mut name = app.document.name().to_owned();
    if ui.text_edit_singleline(&mut name).changed() {
        app.document.set_name(name);
    }

    ui.heading("Add");
    ui.horizontal_wrapped(|ui| {
        for label in PRESETS {
            if ui.button(label).clicked() {
                if let Some(kind) = preset(label) {
                    let center = app.document.viewport().to_content((app.canvas_size / 2.0).to_pos2());
                    let position = app.document.grid().snap(center - kind.size() / 2.0);
                    run(app, Command::AddElement(SceneElement::new(kind, position)));
                }
            }
        }
    });

    let ids = app.document.selection().ids().to_vec();
    ui.separator();
    ui.heading(format!("Selection ({})", ids.len()));
    if ids.is_empty() {
        ui.label("Click or drag on the canvas to select.");
    } else {
        ui.horizontal_wrapped(|ui| {
            for direction in [
                ReorderDirection::ToFront,
                ReorderDirection::Forward,
                ReorderDirection::Backward,
                ReorderDirection::ToBack,
            ] {
                if ui.button(direction.label()).clicked() {
                    run(app, Command::Reorder { ids: ids.clone(), direction });
                }
            }
        });
        ui.add_enabled_ui(ids.len() >= MIN_ALIGN_MEMBERS, |ui| {
            ui.horizontal_wrapped(|ui| {
                for alignment in [
                    Alignment::Left,
                    Alignment::CenterH,
                    Alignment::Right,
                    Alignment::Top,
                    Alignment::Middle,
                    Alignment::Bottom,
                ] {
                    if ui.button(format!("Align {}", alignment.name())).clicked() {
                        run(app, Command::Align { ids: ids.clone(), alignment });
                    }
                }
            });
        });
        ui.add_enabled_ui(ids.len() >= MIN_DISTRIBUTE_MEMBERS, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Distribute H").clicked() {
                    let axis = DistributeAxis::Horizontal;
                    run(app, Command::Distribute { ids: ids.clone(), axis });
                }
                if ui.button("Distribute V").clicked() {
                    let axis = DistributeAxis::Vertical;
                    run(app, Command::Distribute { ids: ids.clone(), axis });
                }
            });
        });
        ui.horizontal_wrapped(|ui| {
            if ui.button("Duplicate").clicked() {
                if let Err(e) = app.document.duplicate_selection() {
                    app.report(e);
                }
            }
            if ui.button("Delete").clicked() {
                if let Err(e) = app.document.delete_selection() {
                    app.report(e);
                }
            }
            let any_locked = ids.iter().any(|id| app.document.scene().get(*id).is_some_and(|e| e.locked));
            let lock_label = if any_locked { "Unlock" } else { "Lock" };
            if ui.button(lock_label).clicked() {
                run(app, Command::SetLocked { ids: ids.clone(), locked: !any_locked });
            }
            let any_hidden = ids.iter().any(|id| app.document.scene().get(*id).is_some_and(|e| !e.visible));
            let visible_label = if any_hidden { "Show" } else { "Hide" };
            if ui.button(visible_label).clicked() {
                run(app, Command::SetVisible { ids: ids.clone(), visible: any_hidden });
            }
        });

        if let Some(element) = app.document.selection().single().and_then(|id| app.document.scene().get(id)) {
            let id = element.id;
            let mut fill = element.style.fill;
            ui.add_enabled_ui(!element.locked, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("{} fill", element.kind.name()));
                    ui.color_edit_button_srgba(&mut fill);
                });
            });
            if fill != element.style.fill {
                run(app, Command::UpdateElement {
                    id,
                    patch: ElementPatch::fill(fill),
                });
            }
        }
    }

    ui.separator();
    ui.heading("Grid");
    let grid = app.document.grid_mut();
    ui.checkbox(&mut grid.visible, "Show grid");
    ui.checkbox(&mut grid.snap, "Snap to grid");
    ui.add(egui::DragValue::new(&mut grid.size).range(2.0..=200.0).prefix("Size "));

    ui.separator();
    let target = app.document.selection().single();
    palette_tools(app, ui, target);

    ui.separator();
    if ui.button("Export scene").clicked() {
        app.export_scene();
    }
    icon_tools(app, ui);
}

/// Swatches apply as the fill of `target`, the single selected element.
fn palette_tools(app: &mut StudioApp, ui: &mut egui::Ui, target: Option<ElementId>) {
    ui.heading("Palette");
    let mut mode = app.palette.mode;
    egui::ComboBox::from_label("Style")
        .selected_text(mode.name())
        .show_ui(ui, |ui| {
            for candidate in PaletteMode::ALL {
                ui.selectable_value(&mut mode, candidate, candidate.name());
            }
        });
    if mode != app.palette.mode {
        app.palette.set_mode(mode, palette::random_hue());
    }

    let mut apply = None;
    for (i, role) in ROLES.iter().enumerate() {
        ui.horizontal(|ui| {
            let swatch = &mut app.palette.swatches[i];
            ui.color_edit_button_srgba(&mut swatch.color);
            ui.checkbox(&mut swatch.locked, *role);
            let color = swatch.color;
            if ui.add_enabled(target.is_some(), egui::Button::new("Apply").small()).clicked() {
                apply = Some(color);
            }
        });
    }
    if let (Some(id), Some(color)) = (target, apply) {
        run(app, Command::UpdateElement {
            id,
            patch: ElementPatch::fill(color),
        });
    }
    ui.horizontal(|ui| {
        if ui.button("Regenerate").clicked() {
            app.regenerate_palette();
        }
        if ui.button("Copy CSS").clicked() {
            let css = app.palette.css_variables();
            ui.ctx().copy_text(css);
            app.notify("Copied palette CSS");
        }
    });
}

fn icon_tools(app: &mut StudioApp, ui: &mut egui::Ui) {
    egui::ComboBox::from_label("Icon platform")
        .selected_text(app.icon_platform.name())
        .show_ui(ui, |ui| {
            for platform in IconPlatform::ALL {
                ui.selectable_value(&mut app.icon_platform, platform, platform.name());
            }
        });
    ui.add(egui::Slider::new(&mut app.icon_options.padding, 0.0..=200.0).text("Padding"));
    let mut opaque = app.icon_options.background.is_some();
    if ui.checkbox(&mut opaque, "Background").changed() {
        app.icon_options.background = opaque.then_some(Color32::WHITE);
    }
    if let Some(background) = &mut app.icon_options.background {
        ui.color_edit_button_srgba(background);
    }
    let any_visible = app.document.scene().elements().iter().any(|e| e.visible);
    if ui.add_enabled(any_visible, egui::Button::new("Export icons")).clicked() {
        app.export_icons();
    }
}

pub fn tools_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match app.workspace {
                Workspace::Image => image_tools(app, ui),
                Workspace::Scene => scene_tools(app, ui),
            });
        });
}
