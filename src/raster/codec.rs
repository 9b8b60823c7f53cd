//! Image intake and export.

use egui::Color32;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};

use super::PixelBuffer;
use crate::error::{DecodeError, EncodeError, ValidationError};

/// Raster formats accepted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Png,
    Jpeg,
    WebP,
}

impl InputFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

/// Check an upload before any decoding happens. A declared MIME type wins;
/// without one the format is sniffed from the bytes.
pub fn validate_upload(
    bytes: &[u8],
    mime: Option<&str>,
    max_bytes: usize,
) -> Result<InputFormat, ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ValidationError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    match mime.filter(|m| !m.is_empty()) {
        Some(mime) => {
            InputFormat::from_mime(mime).ok_or_else(|| ValidationError::UnsupportedType(mime.to_owned()))
        }
        None => image::guess_format(bytes)
            .ok()
            .and_then(InputFormat::from_image_format)
            .ok_or_else(|| ValidationError::UnsupportedType("unknown".to_owned())),
    }
}

/// Decode at native resolution into RGBA8.
pub fn decode(bytes: &[u8], format: InputFormat) -> Result<PixelBuffer, DecodeError> {
    let image = image::load_from_memory_with_format(bytes, format.image_format())?;
    debug!("Decoded {:?} image: {}x{}", format, image.width(), image.height());
    Ok(PixelBuffer::from(image.to_rgba8()))
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy and opaque; transparent areas are composited onto `background`.
    Jpeg { quality: u8, background: Color32 },
    /// Lossless WebP, keeps transparency.
    WebP,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
            Self::WebP => "webp",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }
}

/// Composite `buffer` over an opaque background color.
pub fn flatten_onto(buffer: &PixelBuffer, background: Color32) -> RgbImage {
    let [br, bg, bb, _] = background.to_srgba_unmultiplied();
    let (w, h) = buffer.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let [r, g, b, a] = buffer.pixel(x, y);
        let a = a as f32 / 255.0;
        let over = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        image::Rgb([over(r, br), over(g, bg), over(b, bb)])
    })
}

pub fn encode(buffer: &PixelBuffer, format: &ExportFormat) -> Result<Vec<u8>, EncodeError> {
    let (w, h) = buffer.dimensions();
    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(buffer.as_raw(), w, h, ExtendedColorType::Rgba8)?;
        }
        ExportFormat::Jpeg {
            quality,
            background,
        } => {
            let flat = flatten_onto(buffer, *background);
            JpegEncoder::new_with_quality(&mut out, (*quality).clamp(1, 100)).encode_image(&flat)?;
        }
        ExportFormat::WebP => {
            WebPEncoder::new_lossless(&mut out).write_image(buffer.as_raw(), w, h, ExtendedColorType::Rgba8)?;
        }
    }
    debug!("Encoded {}x{} image as {} ({} bytes)", w, h, format.extension(), out.len());
    Ok(out)
}
