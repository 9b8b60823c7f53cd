//! Raster side of the studio: pixel storage, brushes, edge tracing and codecs.

pub mod brush;
pub mod codec;
pub mod outline;
pub mod store;
pub mod trace;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;

pub use brush::{BrushMode, BrushSettings, BrushShape, Stamp};
pub use codec::{ExportFormat, InputFormat};
pub use outline::{DashStyle, OutlineStyle};
pub use store::{BufferTarget, PixelStore, Region};
pub use trace::{EdgeTrace, Polyline, TraceOptions, TraceOutcome};

/// Integer pixel coordinate inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: PixelPoint) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned pixel rectangle, `width`/`height` may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Intersect a signed request with a `width`x`height` buffer.
    pub fn clip(x: i64, y: i64, w: i64, h: i64, width: u32, height: u32) -> Self {
        let x0 = x.clamp(0, width as i64);
        let y0 = y.clamp(0, height as i64);
        let x1 = x.saturating_add(w.max(0)).clamp(0, width as i64);
        let y1 = y.saturating_add(h.max(0)).clamp(0, height as i64);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0).max(0) as u32,
            height: (y1 - y0).max(0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// Smallest rect covering both. Empty rects are ignored.
    pub fn union(self, other: PixelRect) -> PixelRect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// An owned RGBA8 grid. Cloning is always a deep copy.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, InvariantViolation> {
        let len = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(|pixels| Self { pixels })
            .ok_or(InvariantViolation::BadPixelData { width, height, len })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Panics when out of bounds, like indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[3]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(rgba));
    }

    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8; 4] {
        &mut self.pixels.get_pixel_mut(x, y).0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Copy `rect` out into a new buffer. `rect` must already be clipped.
    pub(crate) fn crop(&self, rect: PixelRect) -> PixelBuffer {
        let mut out = PixelBuffer::new(rect.width, rect.height);
        for y in 0..rect.height {
            for x in 0..rect.width {
                out.set_pixel(x, y, self.pixel(rect.x + x, rect.y + y));
            }
        }
        out
    }

    /// Number of pixels with alpha above `threshold`.
    pub fn count_opaque(&self, threshold: u8) -> usize {
        self.pixels.pixels().filter(|p| p.0[3] > threshold).count()
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}
