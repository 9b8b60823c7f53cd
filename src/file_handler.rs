use egui::{Align2, Color32, Id, LayerId, Order};

use crate::raster::InputFormat;

/// A dropped file with its bytes in memory.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    /// Reported MIME type, or one guessed from the extension.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl LoadedFile {
    pub fn is_scene_document(&self) -> bool {
        self.mime.as_deref() == Some("application/json") || self.name.to_lowercase().ends_with(".json")
    }
}

fn extension_mime(name: &str) -> Option<String> {
    let ext = std::path::Path::new(name).extension()?.to_string_lossy().to_lowercase();
    if ext == "json" {
        return Some("application/json".to_owned());
    }
    InputFormat::from_extension(&ext).map(|format| format.mime().to_owned())
}

#[derive(Debug, Default)]
pub struct FileHandler {
    processed: usize,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the files dropped onto the window this frame.
    ///
    /// Files without accessible bytes are skipped with a warning.
    pub fn take_dropped_files(&mut self, ctx: &egui::Context) -> Vec<LoadedFile> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut files = Vec::with_capacity(dropped.len());
        for file in dropped {
            let name = match (&file.path, file.name.is_empty()) {
                (Some(path), _) => path.display().to_string(),
                (None, false) => file.name.clone(),
                (None, true) => "unknown".to_owned(),
            };
            let Some(bytes) = Self::read_bytes(&file, &name) else {
                continue;
            };
            let mime = if file.mime.is_empty() {
                extension_mime(&name)
            } else {
                Some(file.mime.clone())
            };
            log::debug!("Dropped file {} ({:?}, {} bytes)", name, mime, bytes.len());
            files.push(LoadedFile { name, mime, bytes });
        }
        self.processed += files.len();
        files
    }

    /// Total number of files taken so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    fn read_bytes(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
        if let Some(bytes) = &file.bytes {
            return Some(bytes.to_vec());
        }
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            return match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    log::error!("Failed to read {}: {}", name, err);
                    None
                }
            };
        }
        log::warn!("Dropped file has no accessible data: {}", name);
        None
    }

    /// Overlay listing the files hovering over the window.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None if !file.mime.is_empty() => text += &format!("\n{}", file.mime),
                    None => text += "\n(Path not available)",
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
