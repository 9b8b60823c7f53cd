use egui::Pos2;
use log::debug;

use super::trait_def::{PointerInput, Tool, ToolOutcome, ToolTarget};
use crate::raster::{brush, BrushSettings, PixelRect};

/// State for the brush tool's current stroke
#[derive(Debug, Clone)]
struct StrokeState {
    settings: BrushSettings,
    last: Pos2,
    dirty: Option<PixelRect>,
    stamps: usize,
}

/// Erase/restore brush. Stamps along the pointer path; leaves history to
/// the caller, who snapshots once when the stroke finishes.
#[derive(Debug, Clone, Default)]
pub struct BrushTool {
    current: Option<StrokeState>,
}

impl BrushTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between interpolated stamps along one move.
    fn spacing(radius: f32) -> f32 {
        (radius / 4.0).max(1.0)
    }

    fn stamp(state: &mut StrokeState, target: &mut ToolTarget<'_>, at: Pos2) {
        let stamp = state.settings.stamp_at(at);
        if let Some(rect) = brush::apply(target.store, state.settings.mode, &stamp) {
            state.dirty = Some(state.dirty.map_or(rect, |d| d.union(rect)));
        }
        state.stamps += 1;
    }

    pub fn stamps(&self) -> usize {
        self.current.as_ref().map_or(0, |s| s.stamps)
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &'static str {
        "brush"
    }

    fn begin(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) {
        let mut state = StrokeState {
            settings: target.brush,
            last: input.content,
            dirty: None,
            stamps: 0,
        };
        Self::stamp(&mut state, target, input.content);
        self.current = Some(state);
    }

    fn update(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        let from = state.last;
        let to = input.content;
        let distance = from.distance(to);
        let spacing = Self::spacing(state.settings.radius);
        let steps = (distance / spacing).ceil().max(1.0) as usize;
        for i in 1..=steps {
            let at = from.lerp(to, i as f32 / steps as f32);
            Self::stamp(state, target, at);
        }
        state.last = to;
    }

    fn finish(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) -> ToolOutcome {
        if self.current.as_ref().is_some_and(|s| s.last != input.content) {
            self.update(target, input);
        }
        let Some(state) = self.current.take() else {
            return ToolOutcome::Untouched;
        };
        debug!(
            "{} stroke finished after {} stamps",
            state.settings.mode.name(),
            state.stamps
        );
        match state.dirty {
            Some(rect) if !rect.is_empty() => ToolOutcome::Modified(rect),
            _ => ToolOutcome::Untouched,
        }
    }

    fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
