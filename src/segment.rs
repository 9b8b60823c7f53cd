//! Background segmentation seam.
//!
//! A [`Segmenter`] turns a copy of the current raster into a new raster with
//! the background made transparent. The editor never blocks on it: the future
//! is stored in a [`PendingSegmentation`] and polled once per frame.

use std::collections::VecDeque;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::task::noop_waker_ref;
use futures::FutureExt;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;
use crate::raster::PixelBuffer;

pub type SegmentationFuture = BoxFuture<'static, Result<PixelBuffer, SegmentationError>>;

/// Anything that can separate foreground from background.
pub trait Segmenter {
    /// Short human readable name, used in logs.
    fn name(&self) -> &str;

    /// Start segmenting `input`. The returned future owns everything it needs.
    fn segment(&self, input: PixelBuffer) -> SegmentationFuture;
}

/// An in-flight segmentation and the size its result must have.
pub struct PendingSegmentation {
    future: SegmentationFuture,
    expected: (u32, u32),
    segmenter: String,
}

impl std::fmt::Debug for PendingSegmentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSegmentation")
            .field("expected", &self.expected)
            .field("segmenter", &self.segmenter)
            .finish_non_exhaustive()
    }
}

impl PendingSegmentation {
    pub fn start(segmenter: &dyn Segmenter, input: PixelBuffer) -> Self {
        let expected = input.dimensions();
        debug!("Starting segmentation with {} on {}x{}", segmenter.name(), expected.0, expected.1);
        Self {
            future: segmenter.segment(input),
            expected,
            segmenter: segmenter.name().to_owned(),
        }
    }

    pub fn segmenter(&self) -> &str {
        &self.segmenter
    }

    /// Poll once without a real waker. `Ready` results are already checked
    /// against the input dimensions.
    pub fn poll(&mut self) -> Poll<Result<PixelBuffer, SegmentationError>> {
        let mut cx = Context::from_waker(noop_waker_ref());
        match self.future.poll_unpin(&mut cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) if result.dimensions() != self.expected => {
                Poll::Ready(Err(SegmentationError::DimensionMismatch {
                    want_w: self.expected.0,
                    want_h: self.expected.1,
                    got_w: result.width(),
                    got_h: result.height(),
                }))
            }
            Poll::Ready(result) => Poll::Ready(result),
        }
    }
}

/// Clears pixels whose color is close to a key color.
///
/// Stands in for an ML model: good enough for flat studio backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorKeySegmenter {
    /// `None` samples the top-left pixel.
    pub key: Option<[u8; 3]>,
    /// 0..=100, percent of the full channel range.
    pub tolerance: f32,
    /// Only clear key-colored regions connected to the image border.
    pub contiguous: bool,
}

impl Default for ColorKeySegmenter {
    fn default() -> Self {
        Self {
            key: None,
            tolerance: 12.0,
            contiguous: true,
        }
    }
}

impl ColorKeySegmenter {
    pub fn with_key(key: [u8; 3], tolerance: f32) -> Self {
        Self {
            key: Some(key),
            tolerance,
            ..Self::default()
        }
    }

    fn matches(&self, px: [u8; 4], key: [f32; 3]) -> bool {
        if px[3] == 0 {
            return true;
        }
        let tol = self.tolerance.clamp(0.0, 100.0) * 2.55;
        let dr = px[0] as f32 - key[0];
        let dg = px[1] as f32 - key[1];
        let db = px[2] as f32 - key[2];
        dr * dr + dg * dg + db * db <= tol * tol
    }

    /// Synchronous core, also usable without an executor.
    pub fn apply(&self, mut buffer: PixelBuffer) -> PixelBuffer {
        let (w, h) = buffer.dimensions();
        if w == 0 || h == 0 {
            return buffer;
        }
        let key = self.key.unwrap_or_else(|| {
            let [r, g, b, _] = buffer.pixel(0, 0);
            [r, g, b]
        });
        let key = [key[0] as f32, key[1] as f32, key[2] as f32];

        let mask = if self.contiguous {
            self.border_connected(&buffer, key)
        } else {
            (0..h)
                .flat_map(|y| (0..w).map(move |x| (x, y)))
                .map(|(x, y)| self.matches(buffer.pixel(x, y), key))
                .collect()
        };

        for y in 0..h {
            for x in 0..w {
                if mask[(y * w + x) as usize] {
                    buffer.pixel_mut(x, y)[3] = 0;
                }
            }
        }
        buffer
    }

    /// BFS from every matching border pixel.
    fn border_connected(&self, buffer: &PixelBuffer, key: [f32; 3]) -> Vec<bool> {
        let (w, h) = buffer.dimensions();
        let mut mask = vec![false; (w * h) as usize];
        let mut queue = VecDeque::new();

        let border = (0..w)
            .flat_map(|x| [(x, 0), (x, h - 1)])
            .chain((0..h).flat_map(|y| [(0, y), (w - 1, y)]));
        for (x, y) in border {
            let idx = (y * w + x) as usize;
            if !mask[idx] && self.matches(buffer.pixel(x, y), key) {
                mask[idx] = true;
                queue.push_back((x, y));
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx >= w || ny >= h {
                    continue;
                }
                let idx = (ny * w + nx) as usize;
                if !mask[idx] && self.matches(buffer.pixel(nx, ny), key) {
                    mask[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        mask
    }
}

impl Segmenter for ColorKeySegmenter {
    fn name(&self) -> &str {
        "color-key"
    }

    fn segment(&self, input: PixelBuffer) -> SegmentationFuture {
        let this = *self;
        async move { Ok(this.apply(input)) }.boxed()
    }
}
