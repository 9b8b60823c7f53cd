//! Studio-wide limits and tunables.
//!
//! Every struct here is `#[serde(default)]`, so a partial JSON document (or an
//! older persisted one) fills the gaps with defaults instead of failing.

use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::raster::TraceOptions;

/// Inclusive zoom bounds plus the increment used by shortcuts and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ZoomRange {
    pub const RASTER: ZoomRange = ZoomRange {
        min: 0.5,
        max: 3.0,
        step: 0.25,
    };

    pub const VECTOR: ZoomRange = ZoomRange {
        min: 0.1,
        max: 8.0,
        step: 0.1,
    };

    pub fn clamp(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return 1.0_f32.clamp(self.min, self.max);
        }
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushLimits {
    pub min_radius: f32,
    pub max_radius: f32,
    pub radius_step: f32,
    pub default_radius: f32,
    pub default_hardness: f32,
}

impl Default for BrushLimits {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            max_radius: 100.0,
            radius_step: 5.0,
            default_radius: 20.0,
            default_hardness: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: f32,
    pub visible: bool,
    pub snap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            visible: true,
            snap: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub max_upload_bytes: usize,
    pub history_capacity: usize,
    pub raster_zoom: ZoomRange,
    pub vector_zoom: ZoomRange,
    pub brush: BrushLimits,
    pub trace: TraceOptions,
    pub duplicate_offset: Vec2,
    pub grid: GridConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            history_capacity: 50,
            raster_zoom: ZoomRange::RASTER,
            vector_zoom: ZoomRange::VECTOR,
            brush: BrushLimits::default(),
            trace: TraceOptions::default(),
            duplicate_offset: Vec2::new(20.0, 20.0),
            grid: GridConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
