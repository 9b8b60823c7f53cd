//! Copy/paste of scene elements as a JSON payload.

use egui::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scene::{SceneElement, SceneGraph};
use crate::selection::Selection;

/// Marks payloads produced by this crate.
pub const CLIPBOARD_FORMAT: &str = "design-studio/elements";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub format: String,
    pub elements: Vec<SceneElement>,
}

impl ClipboardPayload {
    /// Deep copies of the selected elements, in paint order.
    pub fn from_selection(scene: &SceneGraph, selection: &Selection) -> Self {
        let elements = scene
            .elements()
            .iter()
            .filter(|e| selection.contains(e.id))
            .cloned()
            .collect();
        Self {
            format: CLIPBOARD_FORMAT.to_owned(),
            elements,
        }
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse pasted text. Anything that is not one of our payloads, or that
    /// carries no elements, is rejected.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let payload: ClipboardPayload = serde_json::from_str(text)?;
        if payload.format != CLIPBOARD_FORMAT {
            return Err(ValidationError::UnsupportedType(payload.format));
        }
        if payload.elements.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(payload)
    }

    /// Fresh-id copies moved by `offset`.
    pub fn instantiate(&self, offset: Vec2) -> Vec<SceneElement> {
        self.elements.iter().map(|e| e.fresh_copy(offset)).collect()
    }
}

/// In-app clipboard. Repeated pastes of the same contents cascade.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    contents: Option<String>,
    pastes: u32,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: String) {
        debug!("Clipboard holds {} bytes", text.len());
        self.contents = Some(text);
        self.pastes = 0;
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// Offset for the next paste of `text`: one more `step` than the last
    /// paste when `text` is what we hold, otherwise a single `step`.
    pub fn next_offset(&mut self, text: &str, step: Vec2) -> Vec2 {
        if self.contents.as_deref() == Some(text) {
            self.pastes += 1;
            step * self.pastes as f32
        } else {
            step
        }
    }
}
