//! Screen <-> content coordinate mapping under pan and zoom.
//!
//! Screen positions here are relative to the top-left of the canvas widget,
//! not the window. `content = (screen - pan) / zoom`.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, ZoomRange};

/// Zoom factor used by [`Viewport::fit`] so the content never touches the edges.
pub const FIT_MARGIN: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pan: Vec2,
    zoom: f32,
    range: ZoomRange,
    content_size: Vec2,
}

impl Viewport {
    pub fn new(range: ZoomRange, content_size: Vec2) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: range.clamp(1.0),
            range,
            content_size,
        }
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn range(&self) -> ZoomRange {
        self.range
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    pub fn set_content_size(&mut self, size: Vec2) {
        self.content_size = size;
    }

    /// Unclamped mapping, used for scene placement.
    pub fn to_content(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    /// Mapping clamped to `[0, w] x [0, h]`, used for raster operations.
    pub fn to_content_clamped(&self, screen: Pos2) -> Pos2 {
        let p = self.to_content(screen);
        Pos2::new(
            p.x.clamp(0.0, self.content_size.x.max(0.0)),
            p.y.clamp(0.0, self.content_size.y.max(0.0)),
        )
    }

    pub fn to_screen(&self, content: Pos2) -> Pos2 {
        (content.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// Where the whole content lands on screen.
    pub fn content_rect(&self) -> Rect {
        Rect::from_min_size(self.to_screen(Pos2::ZERO), self.content_size * self.zoom)
    }

    /// Set the zoom, keeping the content point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Pos2, zoom: f32) {
        let before = self.to_content(anchor);
        self.zoom = self.range.clamp(zoom);
        let after = self.to_screen(before);
        self.pan += anchor - after;
    }

    pub fn zoom_in(&mut self, anchor: Pos2) {
        self.zoom_at(anchor, self.zoom + self.range.step);
    }

    pub fn zoom_out(&mut self, anchor: Pos2) {
        self.zoom_at(anchor, self.zoom - self.range.step);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom so the content fits `view_size` with a margin, and center it.
    pub fn fit(&mut self, view_size: Vec2) {
        if self.content_size.x <= 0.0 || self.content_size.y <= 0.0 {
            self.reset();
            return;
        }
        let scale = (view_size.x / self.content_size.x).min(view_size.y / self.content_size.y);
        self.zoom = self.range.clamp(scale * FIT_MARGIN);
        self.pan = (view_size - self.content_size * self.zoom) / 2.0;
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = self.range.clamp(1.0);
    }
}

/// Snapping grid for scene placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub size: f32,
    pub visible: bool,
    pub snap: bool,
}

impl Default for Grid {
    fn default() -> Self {
        GridConfig::default().into()
    }
}

impl From<GridConfig> for Grid {
    fn from(config: GridConfig) -> Self {
        Self {
            size: config.size,
            visible: config.visible,
            snap: config.snap,
        }
    }
}

impl Grid {
    pub fn snap_value(&self, v: f32) -> f32 {
        if !self.snap || self.size <= 0.0 {
            return v;
        }
        (v / self.size).round() * self.size
    }

    pub fn snap(&self, p: Pos2) -> Pos2 {
        Pos2::new(self.snap_value(p.x), self.snap_value(p.y))
    }
}
