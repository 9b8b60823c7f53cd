use log::info;

use super::{PixelBuffer, PixelRect};
use crate::error::InvariantViolation;

/// Which of the two session buffers an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Original,
    Current,
}

/// A clipped read. `origin` is where `pixels` starts in the source buffer;
/// its size may be smaller than what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub origin: PixelRect,
    pub pixels: PixelBuffer,
}

#[derive(Debug, Clone)]
struct Buffers {
    original: PixelBuffer,
    current: PixelBuffer,
}

/// Owns the `original` and `current` rasters of one editing session.
///
/// `original` is frozen from the moment it is loaded. `current` starts as a
/// deep copy and is mutated in place by brushes, outlines and segmentation.
#[derive(Debug, Clone, Default)]
pub struct PixelStore {
    buffers: Option<Buffers>,
}

impl PixelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both buffers with `image`. Returns a copy of the new `current`.
    pub fn load(&mut self, image: PixelBuffer) -> PixelBuffer {
        info!("Loading {}x{} image into pixel store", image.width(), image.height());
        let current = image.clone();
        let snapshot = current.clone();
        self.buffers = Some(Buffers {
            original: image,
            current,
        });
        snapshot
    }

    pub fn unload(&mut self) {
        self.buffers = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.buffers.as_ref().map(|b| b.current.dimensions())
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.buffers.as_ref().map(|b| &b.original)
    }

    pub fn current(&self) -> Option<&PixelBuffer> {
        self.buffers.as_ref().map(|b| &b.current)
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut PixelBuffer> {
        self.buffers.as_mut().map(|b| &mut b.current)
    }

    /// Split borrow for operations that copy from `original` into `current`.
    pub(crate) fn pair_mut(&mut self) -> Option<(&PixelBuffer, &mut PixelBuffer)> {
        self.buffers
            .as_mut()
            .map(|b| (&b.original, &mut b.current))
    }

    /// Read a rectangle of `current`, clipped to the buffer. Never fails; an
    /// unloaded store or a request fully outside yields an empty region.
    pub fn read_region(&self, x: i64, y: i64, w: i64, h: i64) -> Region {
        let Some(current) = self.current() else {
            return Region {
                origin: PixelRect::clip(0, 0, 0, 0, 0, 0),
                pixels: PixelBuffer::new(0, 0),
            };
        };
        let rect = PixelRect::clip(x, y, w, h, current.width(), current.height());
        Region {
            origin: rect,
            pixels: current.crop(rect),
        }
    }

    /// Write `grid` into `target` at (`x`, `y`), clipped the same way as reads.
    /// Returns the rectangle that was actually written.
    pub fn write_region(
        &mut self,
        target: BufferTarget,
        x: i64,
        y: i64,
        grid: &PixelBuffer,
    ) -> Result<PixelRect, InvariantViolation> {
        if target == BufferTarget::Original {
            return Err(InvariantViolation::OriginalIsReadOnly);
        }
        let current = self.current_mut().ok_or(InvariantViolation::NoImage)?;
        let rect = PixelRect::clip(
            x,
            y,
            grid.width() as i64,
            grid.height() as i64,
            current.width(),
            current.height(),
        );
        // Offset into `grid` when the write starts left of / above the buffer.
        let gx = (rect.x as i64 - x) as u32;
        let gy = (rect.y as i64 - y) as u32;
        for row in 0..rect.height {
            for col in 0..rect.width {
                current.set_pixel(rect.x + col, rect.y + row, grid.pixel(gx + col, gy + row));
            }
        }
        Ok(rect)
    }

    /// Deep copy of `current` for the history stack.
    pub fn snapshot(&self) -> Option<PixelBuffer> {
        self.current().cloned()
    }

    /// Replace `current` wholesale with a snapshot of identical dimensions.
    pub fn restore(&mut self, snapshot: &PixelBuffer) -> Result<(), InvariantViolation> {
        let current = self.current_mut().ok_or(InvariantViolation::NoImage)?;
        if !current.same_size(snapshot) {
            return Err(InvariantViolation::DimensionMismatch {
                want_w: current.width(),
                want_h: current.height(),
                got_w: snapshot.width(),
                got_h: snapshot.height(),
            });
        }
        current.clone_from(snapshot);
        Ok(())
    }
}
