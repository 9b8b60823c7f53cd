//! Key bindings. Each action maps onto exactly one session operation.

use egui::{Key, Modifiers, Vec2};

/// Nudge distance for arrow keys, and with shift held.
pub const NUDGE: f32 = 1.0;
pub const NUDGE_LARGE: f32 = 10.0;

/// Ctrl on Linux/Windows, Cmd on macOS.
fn is_command(modifiers: Modifiers) -> bool {
    modifiers.command || modifiers.ctrl || modifiers.mac_cmd
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAction {
    GrowBrush,
    ShrinkBrush,
    EraseMode,
    RestoreMode,
    ToggleOriginal,
    Outline,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    FitToView,
}

impl ImageAction {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if is_command(modifiers) {
            return match key {
                Key::Z if modifiers.shift => Some(Self::Redo),
                Key::Z => Some(Self::Undo),
                Key::Y => Some(Self::Redo),
                Key::Num0 => Some(Self::FitToView),
                _ => None,
            };
        }
        if modifiers.alt {
            return None;
        }
        match key {
            Key::OpenBracket => Some(Self::ShrinkBrush),
            Key::CloseBracket => Some(Self::GrowBrush),
            Key::E => Some(Self::EraseMode),
            Key::R => Some(Self::RestoreMode),
            Key::H => Some(Self::ToggleOriginal),
            Key::O => Some(Self::Outline),
            Key::Plus | Key::Equals => Some(Self::ZoomIn),
            Key::Minus => Some(Self::ZoomOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneAction {
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    Deselect,
    Nudge(Vec2),
}

impl SceneAction {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if is_command(modifiers) {
            return match key {
                Key::Z if modifiers.shift => Some(Self::Redo),
                Key::Z => Some(Self::Undo),
                Key::Y => Some(Self::Redo),
                Key::C => Some(Self::Copy),
                Key::V => Some(Self::Paste),
                Key::D => Some(Self::Duplicate),
                Key::A => Some(Self::SelectAll),
                _ => None,
            };
        }
        let step = if modifiers.shift { NUDGE_LARGE } else { NUDGE };
        match key {
            Key::Delete | Key::Backspace => Some(Self::Delete),
            Key::Escape => Some(Self::Deselect),
            Key::ArrowLeft => Some(Self::Nudge(Vec2::new(-step, 0.0))),
            Key::ArrowRight => Some(Self::Nudge(Vec2::new(step, 0.0))),
            Key::ArrowUp => Some(Self::Nudge(Vec2::new(0.0, -step))),
            Key::ArrowDown => Some(Self::Nudge(Vec2::new(0.0, step))),
            _ => None,
        }
    }
}
