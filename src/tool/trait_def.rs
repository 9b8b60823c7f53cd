use egui::{Modifiers, Pos2, Vec2};

use crate::raster::{BrushSettings, PixelRect, PixelStore};
use crate::viewport::Viewport;

/// One pointer sample, already mapped into content space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Canvas-relative screen position
    pub screen: Pos2,
    /// Content position, clamped to the image
    pub content: Pos2,
    /// Screen movement since the previous sample
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

/// What a tool may touch while it runs.
pub struct ToolTarget<'a> {
    pub store: &'a mut PixelStore,
    pub viewport: &'a mut Viewport,
    pub brush: BrushSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The gesture left `current` as it was
    Untouched,
    /// Pixels inside this box may have changed
    Modified(PixelRect),
}

/// A pointer-driven raster tool. One `begin`, any number of `update`s and
/// one `finish` make up a gesture.
pub trait Tool {
    fn name(&self) -> &'static str;
    fn begin(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput);
    fn update(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput);
    fn finish(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) -> ToolOutcome;
    fn is_active(&self) -> bool;
}
