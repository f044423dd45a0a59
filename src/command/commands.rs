use crate::buffer::PixelBuffer;
use crate::config::EffectConfig;
use crate::effect;
use crate::geometry::PixelRect;
use crate::stroke::{self, StrokeRef};

/// A committed edit: the region plus the effect settings it was made with
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Apply the effect to a dragged rectangle
    ApplyRect {
        rect: PixelRect,
        config: EffectConfig,
    },

    /// Apply the effect along a resampled brush stroke
    ApplyStroke {
        stroke: StrokeRef,
        config: EffectConfig,
    },
}

impl Command {
    /// Run the copy-then-transform cycle against `base`.
    ///
    /// `base` is never mutated; the returned buffer is a fresh snapshot.
    pub fn execute(&self, base: &PixelBuffer) -> PixelBuffer {
        match self {
            Command::ApplyRect { rect, config } => effect::apply_region(base, *rect, config),
            Command::ApplyStroke { stroke, config } => {
                stroke::apply_along_path(base, stroke.points(), config.brush_radius, config)
            }
        }
    }

    pub fn config(&self) -> &EffectConfig {
        match self {
            Command::ApplyRect { config, .. } | Command::ApplyStroke { config, .. } => config,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::ApplyRect { .. } => "ApplyRect",
            Command::ApplyStroke { .. } => "ApplyStroke",
        }
    }
}
