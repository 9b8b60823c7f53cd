#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod icon;
pub mod input;
mod panels;
pub mod palette;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod segment;
pub mod selection;
pub mod state;
pub mod tool;
pub mod util;
pub mod viewport;

pub use app::{StudioApp, Workspace};
pub use command::{Command, CommandError, HistoryStack};
pub use config::StudioConfig;
pub use document::Document;
pub use error::{StudioError, StudioResult};
pub use renderer::Renderer;
pub use scene::{ElementId, SceneElement, SceneGraph};
pub use state::{EditorContext, EditorState};
