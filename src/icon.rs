//! Square icon export: the visible scene scaled into a platform's safe area.

use egui::{Color32, Pos2, Rect, Vec2};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::geometry::hit_testing::{fill_contains, line_distance};
use crate::raster::codec::encode;
use crate::raster::outline::blend;
use crate::raster::{ExportFormat, PixelBuffer};
use crate::scene::{ElementKind, SceneElement, SceneGraph};

/// Line width used when a line element has no stroke of its own.
const DEFAULT_LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconPlatform {
    #[default]
    Standard,
    Android,
    Ios,
    Web,
    GooglePlay,
}

impl IconPlatform {
    pub const ALL: [IconPlatform; 5] = [
        IconPlatform::Standard,
        IconPlatform::Android,
        IconPlatform::Ios,
        IconPlatform::Web,
        IconPlatform::GooglePlay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IconPlatform::Standard => "Standard icon",
            IconPlatform::Android => "Android adaptive",
            IconPlatform::Ios => "iOS app icon",
            IconPlatform::Web => "Web favicon",
            IconPlatform::GooglePlay => "Google Play",
        }
    }

    /// Fraction of the icon side the padded content may span.
    pub fn safe_area(&self) -> f32 {
        match self {
            IconPlatform::Standard => 0.8,
            IconPlatform::Android => 0.75,
            IconPlatform::Ios => 0.7,
            IconPlatform::Web => 0.85,
            IconPlatform::GooglePlay => 0.9,
        }
    }

    /// Pixel sizes exported by [`export_icon_set`].
    pub fn sizes(&self) -> &'static [u32] {
        match self {
            IconPlatform::Standard => &[
                16, 20, 29, 32, 40, 48, 58, 60, 64, 72, 76, 80, 87, 96, 120, 128, 144, 152, 167, 180, 192, 256, 512,
                1024,
            ],
            IconPlatform::Android => &[48, 72, 96, 144, 192, 512],
            IconPlatform::Ios => &[20, 29, 40, 58, 60, 76, 80, 87, 120, 152, 167, 180, 1024],
            IconPlatform::Web => &[16, 32, 48, 64, 96, 128, 192, 256, 512],
            IconPlatform::GooglePlay => &[512],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconOptions {
    /// Margin around the content bounds, in content units.
    pub padding: f32,
    /// `None` keeps the icon transparent.
    pub background: Option<Color32>,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            padding: 40.0,
            background: None,
        }
    }
}

/// One encoded PNG of an icon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub size: u32,
    pub bytes: Vec<u8>,
}

impl IconFile {
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}-{}x{}.png", stem, self.size, self.size)
    }
}

/// Union of the rotated bounds of every visible element.
pub fn content_bounds(scene: &SceneGraph) -> Option<Rect> {
    scene
        .elements()
        .iter()
        .filter(|e| e.visible)
        .map(SceneElement::world_bounds)
        .reduce(Rect::union)
}

/// Source-over every visible element that covers `p`, in paint order.
fn sample(px: &mut [u8; 4], element: &SceneElement, p: Pos2) {
    let opacity = element.opacity.clamp(0.0, 1.0);
    match &element.kind {
        ElementKind::Group { children } => {
            let local = p - element.position.to_vec2();
            for child in children.iter().filter(|c| c.visible) {
                sample(px, child, local);
            }
        }
        ElementKind::Line { .. } => {
            let (width, color) = element
                .style
                .stroke
                .as_ref()
                .map_or((DEFAULT_LINE_WIDTH, element.style.fill), |s| (s.width, s.color));
            if line_distance(element, p).is_some_and(|d| d <= width / 2.0) {
                *px = blend(*px, color.gamma_multiply(opacity));
            }
        }
        _ => {
            if fill_contains(element, p) {
                *px = blend(*px, element.style.fill.gamma_multiply(opacity));
            }
        }
    }
}

/// Rasterize the scene into a `size`x`size` icon. The padded content is
/// scaled to fit the platform's safe area and centered.
pub fn render_icon(
    scene: &SceneGraph,
    size: u32,
    platform: IconPlatform,
    options: &IconOptions,
) -> Result<PixelBuffer, EncodeError> {
    let bounds = content_bounds(scene).ok_or(EncodeError::EmptyScene)?;
    let content = bounds.expand(options.padding.max(0.0));
    let extent = content.width().max(content.height()).max(1.0);
    let scale = size as f32 * platform.safe_area() / extent;
    let offset = (Vec2::splat(size as f32) - content.size() * scale) / 2.0;

    let mut buffer = match options.background {
        Some(color) => PixelBuffer::filled(size, size, color.to_srgba_unmultiplied()),
        None => PixelBuffer::new(size, size),
    };
    for y in 0..size {
        for x in 0..size {
            let at = content.min + (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - offset) / scale;
            let mut px = buffer.pixel(x, y);
            for element in scene.elements().iter().filter(|e| e.visible) {
                sample(&mut px, element, at);
            }
            buffer.set_pixel(x, y, px);
        }
    }
    debug!("Rendered {}x{} icon at scale {:.3}", size, size, scale);
    Ok(buffer)
}

/// Every size of `platform` as PNG bytes, smallest first.
pub fn export_icon_set(
    scene: &SceneGraph,
    platform: IconPlatform,
    options: &IconOptions,
) -> Result<Vec<IconFile>, EncodeError> {
    let files = platform
        .sizes()
        .iter()
        .map(|&size| {
            let buffer = render_icon(scene, size, platform, options)?;
            Ok(IconFile {
                size,
                bytes: encode(&buffer, &ExportFormat::Png)?,
            })
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;
    info!("Exported {} icon(s) for {}", files.len(), platform.name());
    Ok(files)
}
