use egui::{Event, Pos2, Vec2};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::config::StudioConfig;
use crate::document::Document;
use crate::error::StudioError;
use crate::file_handler::{FileHandler, LoadedFile};
use crate::icon::{self, IconOptions, IconPlatform};
use crate::input::{self, ImageAction, SceneAction};
use crate::palette::{self, Palette};
use crate::panels;
use crate::raster::{BrushMode, BrushSettings, ExportFormat, OutlineStyle};
use crate::renderer::Renderer;
use crate::segment::ColorKeySegmenter;
use crate::state::{EditorContext, SegmentationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Workspace {
    #[default]
    Image,
    Scene,
}

/// What the scene canvas is doing with the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum SceneGesture {
    #[default]
    None,
    Move,
    Pan,
    /// Content-space corners.
    Marquee { start: Pos2, end: Pos2 },
}

/// We derive Deserialize/Serialize so we can persist preferences on shutdown.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct Preferences {
    config: StudioConfig,
    workspace: Workspace,
    brush: BrushSettings,
    outline: OutlineStyle,
    export_format: ExportFormat,
    segmenter: ColorKeySegmenter,
    palette: Palette,
    icon_platform: IconPlatform,
    icon_options: IconOptions,
}

#[derive(Debug)]
pub struct StudioApp {
    pub(crate) workspace: Workspace,
    pub(crate) editor: EditorContext,
    pub(crate) document: Document,
    pub(crate) renderer: Renderer,
    file_handler: FileHandler,
    pub(crate) outline: OutlineStyle,
    pub(crate) export_format: ExportFormat,
    pub(crate) segmenter: ColorKeySegmenter,
    pub(crate) palette: Palette,
    pub(crate) icon_platform: IconPlatform,
    pub(crate) icon_options: IconOptions,
    pub(crate) gesture: SceneGesture,
    pub(crate) canvas_size: Vec2,
    pub(crate) status: Option<String>,
}

impl Default for StudioApp {
    fn default() -> Self {
        Self::from_preferences(Preferences::default())
    }
}

impl StudioApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let preferences = cc
            .storage
            .and_then(|storage| eframe::get_value::<Preferences>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::from_preferences(preferences)
    }

    fn from_preferences(preferences: Preferences) -> Self {
        let mut editor = EditorContext::new(preferences.config.clone());
        editor.set_brush(preferences.brush);
        Self {
            workspace: preferences.workspace,
            editor,
            document: Document::new("Untitled", &preferences.config),
            renderer: Renderer::new(),
            file_handler: FileHandler::new(),
            outline: preferences.outline,
            export_format: preferences.export_format,
            segmenter: preferences.segmenter,
            palette: preferences.palette,
            icon_platform: preferences.icon_platform,
            icon_options: preferences.icon_options,
            gesture: SceneGesture::None,
            canvas_size: Vec2::new(800.0, 600.0),
            status: None,
        }
    }

    pub fn workspace(&self) -> Workspace {
        self.workspace
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn report(&mut self, err: impl Into<StudioError>) {
        let err = err.into();
        error!("{}", err);
        self.status = Some(err.to_string());
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.status = Some(message);
    }

    /// Load dropped files: JSON goes to the scene, everything else is
    /// treated as an image upload.
    pub fn open_file(&mut self, file: LoadedFile) {
        if file.is_scene_document() {
            let text = String::from_utf8_lossy(&file.bytes);
            match self.document.import_scene(&text) {
                Ok(()) => {
                    self.workspace = Workspace::Scene;
                    self.notify(format!("Opened {}", file.name));
                }
                Err(e) => self.report(e),
            }
            return;
        }
        match self.editor.load_image(&file.bytes, file.mime.as_deref()) {
            Ok(()) => {
                self.workspace = Workspace::Image;
                self.editor.viewport_mut().fit(self.canvas_size);
                self.notify(format!("Opened {}", file.name));
            }
            Err(e) => self.report(e),
        }
    }

    pub(crate) fn export_image(&mut self) {
        match self.editor.export(&self.export_format) {
            Ok(bytes) => {
                let name = format!("export.{}", self.export_format.extension());
                self.deliver(&name, &bytes);
            }
            Err(e) => self.report(e),
        }
    }

    pub(crate) fn export_scene(&mut self) {
        match self.document.export_scene() {
            Ok(json) => {
                let name = format!("{}.json", self.document.name());
                self.deliver(&name, json.as_bytes());
            }
            Err(e) => self.report(e),
        }
    }

    /// Every size of the chosen platform, one PNG per size.
    pub(crate) fn export_icons(&mut self) {
        match icon::export_icon_set(self.document.scene(), self.icon_platform, &self.icon_options) {
            Ok(files) => {
                let stem = self.document.name().to_owned();
                for file in &files {
                    self.deliver(&file.file_name(&stem), &file.bytes);
                }
                self.notify(format!("Exported {} icon(s) for {}", files.len(), self.icon_platform.name()));
            }
            Err(e) => self.report(e),
        }
    }

    pub(crate) fn regenerate_palette(&mut self) {
        self.palette.regenerate(palette::random_hue());
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn deliver(&mut self, name: &str, bytes: &[u8]) {
        match std::fs::write(name, bytes) {
            Ok(()) => self.notify(format!("Saved {} ({} bytes)", name, bytes.len())),
            Err(e) => self.report(crate::state::PersistenceError::from(e)),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn deliver(&mut self, name: &str, bytes: &[u8]) {
        self.notify(format!("Encoded {} ({} bytes)", name, bytes.len()));
    }

    pub(crate) fn start_segmentation(&mut self) {
        let segmenter = self.segmenter;
        if let Err(e) = self.editor.begin_segmentation(&segmenter) {
            self.report(e);
        }
    }

    fn poll_segmentation(&mut self, ctx: &egui::Context) {
        match self.editor.poll_segmentation() {
            SegmentationStatus::Idle => {}
            SegmentationStatus::Pending => ctx.request_repaint(),
            SegmentationStatus::Applied => self.notify("Background removed"),
            SegmentationStatus::Failed(e) => self.report(e),
        }
    }

    fn handle_image_action(&mut self, action: ImageAction) {
        let center = (self.canvas_size / 2.0).to_pos2();
        let result: Result<(), StudioError> = match action {
            ImageAction::GrowBrush => {
                self.editor.grow_brush();
                Ok(())
            }
            ImageAction::ShrinkBrush => {
                self.editor.shrink_brush();
                Ok(())
            }
            ImageAction::EraseMode => {
                self.editor.set_mode(BrushMode::Erase);
                Ok(())
            }
            ImageAction::RestoreMode => {
                self.editor.set_mode(BrushMode::Restore);
                Ok(())
            }
            ImageAction::ToggleOriginal => {
                self.editor.toggle_show_original();
                Ok(())
            }
            ImageAction::ZoomIn => {
                self.editor.viewport_mut().zoom_in(center);
                Ok(())
            }
            ImageAction::ZoomOut => {
                self.editor.viewport_mut().zoom_out(center);
                Ok(())
            }
            ImageAction::FitToView => {
                self.editor.viewport_mut().fit(self.canvas_size);
                Ok(())
            }
            ImageAction::Undo => self.editor.undo().map(drop).map_err(StudioError::from),
            ImageAction::Redo => self.editor.redo().map(drop).map_err(StudioError::from),
            ImageAction::Outline if self.editor.is_loaded() => {
                let outline = self.outline;
                self.editor.apply_outline(&outline).map(drop)
            }
            ImageAction::Outline => Ok(()),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    pub(crate) fn handle_scene_action(&mut self, ctx: &egui::Context, action: SceneAction) {
        let result: Result<(), StudioError> = match action {
            SceneAction::Undo => {
                self.document.undo();
                Ok(())
            }
            SceneAction::Redo => {
                self.document.redo();
                Ok(())
            }
            SceneAction::Copy => match self.document.copy_selection() {
                Ok(Some(text)) => {
                    ctx.copy_text(text);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => Err(e.into()),
            },
            SceneAction::Paste => self.document.paste_clipboard().map(drop).map_err(StudioError::from),
            SceneAction::Duplicate => self.document.duplicate_selection().map(drop).map_err(StudioError::from),
            SceneAction::Delete => self.document.delete_selection().map(drop).map_err(StudioError::from),
            SceneAction::SelectAll => {
                self.document.select_all();
                Ok(())
            }
            SceneAction::Deselect => {
                self.document.clear_selection();
                Ok(())
            }
            SceneAction::Nudge(delta) => self.document.nudge_selection(delta).map(drop).map_err(StudioError::from),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let keys = input::key_presses(ctx);
        match self.workspace {
            Workspace::Image => {
                for (key, modifiers) in keys {
                    if let Some(action) = ImageAction::from_key(key, modifiers) {
                        self.handle_image_action(action);
                    }
                }
            }
            Workspace::Scene => {
                // Native backends turn copy/cut/paste into dedicated events.
                let events = ctx.input(|i| i.events.clone());
                let mut pasted = false;
                for event in events {
                    match event {
                        Event::Copy => self.handle_scene_action(ctx, SceneAction::Copy),
                        Event::Cut => {
                            self.handle_scene_action(ctx, SceneAction::Copy);
                            self.handle_scene_action(ctx, SceneAction::Delete);
                        }
                        Event::Paste(text) => {
                            pasted = true;
                            if let Err(e) = self.document.paste(&text) {
                                self.report(e);
                            }
                        }
                        _ => {}
                    }
                }
                for (key, modifiers) in keys {
                    match SceneAction::from_key(key, modifiers) {
                        Some(SceneAction::Paste) if pasted => {}
                        Some(action) => self.handle_scene_action(ctx, action),
                        None => {}
                    }
                }
            }
        }
    }
}

impl eframe::App for StudioApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let preferences = Preferences {
            config: self.editor.config().clone(),
            workspace: self.workspace,
            brush: *self.editor.brush(),
            outline: self.outline,
            export_format: self.export_format,
            segmenter: self.segmenter,
            palette: self.palette.clone(),
            icon_platform: self.icon_platform,
            icon_options: self.icon_options,
        };
        eframe::set_value(storage, eframe::APP_KEY, &preferences);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for file in self.file_handler.take_dropped_files(ctx) {
            self.open_file(file);
        }
        self.poll_segmentation(ctx);
        self.handle_shortcuts(ctx);

        panels::menu_bar(self, ctx);
        panels::tools_panel(self, ctx);
        panels::history_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
