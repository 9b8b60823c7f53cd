use egui::Color32;
use serde::{Deserialize, Serialize};

use super::trace::EdgeTrace;
use super::PixelBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineStyle {
    pub color: Color32,
    pub thickness: f32,
    pub dash: DashStyle,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(0x00, 0xff, 0xff),
            thickness: 2.0,
            dash: DashStyle::Solid,
        }
    }
}

impl OutlineStyle {
    /// Alternating on/off lengths in pixels. Empty means a continuous line.
    pub fn dash_pattern(&self) -> Vec<f32> {
        let t = self.thickness.max(1.0);
        match self.dash {
            DashStyle::Solid => Vec::new(),
            DashStyle::Dashed => vec![5.0 * t, 3.0 * t],
            DashStyle::Dotted => vec![1.0, 3.0 * t],
        }
    }
}

/// Tracks where along the pattern the pen is, across segment boundaries.
struct DashCursor {
    pattern: Vec<f32>,
    period: f32,
    offset: f32,
}

impl DashCursor {
    fn new(pattern: Vec<f32>) -> Self {
        let period: f32 = pattern.iter().sum();
        Self {
            pattern,
            period,
            offset: 0.0,
        }
    }

    fn pen_down(&self) -> bool {
        if self.pattern.is_empty() || self.period <= 0.0 {
            return true;
        }
        let mut at = self.offset % self.period;
        for (i, len) in self.pattern.iter().enumerate() {
            if at < *len {
                return i % 2 == 0;
            }
            at -= len;
        }
        true
    }

    fn advance(&mut self, by: f32) {
        self.offset += by;
    }
}

/// Source-over one color onto one pixel.
pub(crate) fn blend(dst: [u8; 4], src: Color32) -> [u8; 4] {
    let [sr, sg, sb, sa] = src.to_srgba_unmultiplied();
    let sa = sa as f32 / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| -> u8 {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    [
        mix(sr, dst[0]),
        mix(sg, dst[1]),
        mix(sb, dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

/// Pixels covered by the outline, marked before anything is blended.
struct Coverage {
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl Coverage {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![false; width as usize * height as usize],
        }
    }

    fn dab(&mut self, cx: f32, cy: f32, radius: f32) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }
        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w - 1);
        let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.covered[y as usize * w as usize + x as usize] = true;
                }
            }
        }
    }

    fn blend_into(&self, buffer: &mut PixelBuffer, color: Color32) {
        for (i, _) in self.covered.iter().enumerate().filter(|(_, c)| **c) {
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            let px = buffer.pixel(x, y);
            buffer.set_pixel(x, y, blend(px, color));
        }
    }
}

/// Paint every polyline of `trace` onto `buffer`. Each covered pixel is
/// blended exactly once, however many dabs overlap it.
pub fn stamp_outline(buffer: &mut PixelBuffer, trace: &EdgeTrace, style: &OutlineStyle) {
    let radius = (style.thickness / 2.0).max(0.5);
    let (w, h) = buffer.dimensions();
    let mut coverage = Coverage::new(w, h);
    for polyline in &trace.polylines {
        let mut cursor = DashCursor::new(style.dash_pattern());
        for (a, b) in polyline.segments() {
            let (ax, ay) = (a.x as f32, a.y as f32);
            let (bx, by) = (b.x as f32, b.y as f32);
            let length = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            // Half-pixel steps keep thin lines gap free.
            let steps = (length * 2.0).ceil().max(1.0) as usize;
            let step_len = length / steps as f32;
            for i in 0..steps {
                let t = i as f32 / steps as f32;
                if cursor.pen_down() {
                    coverage.dab(ax + (bx - ax) * t, ay + (by - ay) * t, radius);
                }
                cursor.advance(step_len);
            }
        }
        if let Some(last) = polyline.points.last() {
            if cursor.pen_down() {
                coverage.dab(last.x as f32, last.y as f32, radius);
            }
        }
    }
    coverage.blend_into(buffer, style.color);
}
