//! Erase/restore stamps applied to the `current` buffer of a [`PixelStore`].
//!
//! A stroke is a series of stamps; neither function here touches history.
//! The caller snapshots once when the stroke ends.

use egui::Pos2;
use log::warn;
use serde::{Deserialize, Serialize};

use super::{PixelBuffer, PixelRect, PixelStore};

/// Hardness at or above this is a binary cutoff.
pub const HARD_EDGE: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushMode {
    #[default]
    Erase,
    Restore,
}

impl BrushMode {
    pub fn name(&self) -> &'static str {
        match self {
            BrushMode::Erase => "erase",
            BrushMode::Restore => "restore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushShape {
    #[default]
    Circle,
    Square,
}

impl BrushShape {
    /// Euclidean for circles, Chebyshev for squares.
    pub fn distance(&self, dx: f32, dy: f32) -> f32 {
        match self {
            BrushShape::Circle => (dx * dx + dy * dy).sqrt(),
            BrushShape::Square => dx.abs().max(dy.abs()),
        }
    }
}

/// Persistent brush configuration, the `BrushStroke` parameters of one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub mode: BrushMode,
    pub shape: BrushShape,
    pub radius: f32,
    /// 0.0 (soft) ..= 1.0 (hard). Ignored when restoring.
    pub hardness: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            mode: BrushMode::Erase,
            shape: BrushShape::Circle,
            radius: 20.0,
            hardness: 1.0,
        }
    }
}

impl BrushSettings {
    pub fn stamp_at(&self, center: Pos2) -> Stamp {
        Stamp {
            center,
            radius: self.radius,
            hardness: self.hardness,
            shape: self.shape,
        }
    }

    /// Step the radius, staying inside `min..=max`.
    pub fn resize(&mut self, delta: f32, min: f32, max: f32) {
        self.radius = (self.radius + delta).clamp(min, max);
    }
}

/// One footprint placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub center: Pos2,
    pub radius: f32,
    pub hardness: f32,
    pub shape: BrushShape,
}

impl Stamp {
    /// The `[center - r, center + r]` box clipped to a `width`x`height` buffer.
    pub fn bounds(&self, width: u32, height: u32) -> PixelRect {
        if self.radius.is_nan() || self.radius < 0.0 {
            return PixelRect::clip(0, 0, 0, 0, width, height);
        }
        let x0 = (self.center.x - self.radius).floor() as i64;
        let y0 = (self.center.y - self.radius).floor() as i64;
        let x1 = (self.center.x + self.radius).ceil() as i64;
        let y1 = (self.center.y + self.radius).ceil() as i64;
        PixelRect::clip(x0, y0, x1 - x0 + 1, y1 - y0 + 1, width, height)
    }

    /// Distance of pixel (`x`, `y`) from the center under this stamp's shape,
    /// or `None` when the pixel is outside the footprint.
    fn reach(&self, x: u32, y: u32) -> Option<f32> {
        let d = self
            .shape
            .distance(x as f32 - self.center.x, y as f32 - self.center.y);
        (d <= self.radius).then_some(d)
    }

    /// How much of a pixel's alpha an erase removes at distance `d`, in 0..=1.
    fn erase_strength(&self, d: f32) -> f32 {
        let hardness = self.hardness.clamp(0.0, 1.0);
        if hardness >= HARD_EDGE || self.radius <= 0.0 {
            return 1.0;
        }
        let t = d / self.radius;
        if t <= hardness {
            1.0
        } else {
            ((1.0 - t) / (1.0 - hardness)).clamp(0.0, 1.0)
        }
    }

    fn for_each_covered(&self, buffer_w: u32, buffer_h: u32, mut f: impl FnMut(u32, u32, f32)) -> PixelRect {
        let rect = self.bounds(buffer_w, buffer_h);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                if let Some(d) = self.reach(x, y) {
                    f(x, y, d);
                }
            }
        }
        rect
    }
}

/// Lower alpha inside the footprint. RGB is never touched and alpha never rises.
/// Returns the clipped bounding box that was scanned, or `None` without an image.
pub fn erase(store: &mut PixelStore, stamp: &Stamp) -> Option<PixelRect> {
    let current = store.current_mut()?;
    Some(erase_buffer(current, stamp))
}

pub(crate) fn erase_buffer(current: &mut PixelBuffer, stamp: &Stamp) -> PixelRect {
    let (w, h) = current.dimensions();
    stamp.for_each_covered(w, h, |x, y, d| {
        let px = current.pixel_mut(x, y);
        let kept = (px[3] as f32 * (1.0 - stamp.erase_strength(d))).round() as u8;
        px[3] = kept.min(px[3]);
    })
}

/// Copy RGBA verbatim from `original` wherever the footprint covers.
/// A no-op when nothing is loaded.
pub fn restore(store: &mut PixelStore, stamp: &Stamp) -> Option<PixelRect> {
    let Some((original, current)) = store.pair_mut() else {
        warn!("Restore brush used without an original image");
        return None;
    };
    let (w, h) = current.dimensions();
    Some(stamp.for_each_covered(w, h, |x, y, _| {
        current.set_pixel(x, y, original.pixel(x, y));
    }))
}

/// Apply one stamp in the given mode.
pub fn apply(store: &mut PixelStore, mode: BrushMode, stamp: &Stamp) -> Option<PixelRect> {
    match mode {
        BrushMode::Erase => erase(store, stamp),
        BrushMode::Restore => restore(store, stamp),
    }
}
