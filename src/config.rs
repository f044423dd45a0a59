use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Which obscuring effect to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectKind {
    #[default]
    Blur,
    Mosaic,
}

/// How pointer input is turned into a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditMode {
    /// Drag out an axis-aligned rectangle
    #[default]
    Rect,
    /// Paint a freehand stroke
    Brush,
}

impl EditMode {
    pub fn name(&self) -> &'static str {
        match self {
            EditMode::Rect => "Rect",
            EditMode::Brush => "Brush",
        }
    }
}

/// Effect parameters supplied with each operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub kind: EffectKind,
    /// Blur strength, higher is blurrier
    pub blur_intensity: u32,
    /// Edge length of one mosaic cell in pixels
    pub mosaic_block_size: u32,
    /// Half of the brush diameter, in buffer pixels
    pub brush_radius: f32,
}

impl EffectConfig {
    pub const BLUR_INTENSITY: RangeInclusive<u32> = 1..=50;
    pub const MOSAIC_BLOCK_SIZE: RangeInclusive<u32> = 5..=50;
    pub const BRUSH_RADIUS: RangeInclusive<f32> = 2.5..=50.0;

    /// Copy of this config with every field clamped into its documented range
    pub fn sanitized(&self) -> Self {
        let radius = if self.brush_radius.is_nan() {
            *Self::BRUSH_RADIUS.start()
        } else {
            self.brush_radius
                .clamp(*Self::BRUSH_RADIUS.start(), *Self::BRUSH_RADIUS.end())
        };
        Self {
            kind: self.kind,
            blur_intensity: self
                .blur_intensity
                .clamp(*Self::BLUR_INTENSITY.start(), *Self::BLUR_INTENSITY.end()),
            mosaic_block_size: self
                .mosaic_block_size
                .clamp(*Self::MOSAIC_BLOCK_SIZE.start(), *Self::MOSAIC_BLOCK_SIZE.end()),
            brush_radius: radius,
        }
    }

    /// Brush diameter in whole pixels, as shown in the controls
    pub fn brush_size(&self) -> u32 {
        (self.brush_radius * 2.0).round() as u32
    }

    pub fn set_brush_size(&mut self, diameter: u32) {
        self.brush_radius = diameter as f32 / 2.0;
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            kind: EffectKind::Blur,
            blur_intensity: 10,
            mosaic_block_size: 10,
            brush_radius: 10.0,
        }
    }
}

/// Bounds on the snapshot history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept; `None` keeps every snapshot
    pub capacity: Option<usize>,
}

impl HistoryConfig {
    pub fn unbounded() -> Self {
        Self { capacity: None }
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}
