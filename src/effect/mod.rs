//! Region effects: mosaic block averaging and resample blur.

mod blur;
mod mosaic;

pub use blur::{blur_rect, blur_scale, downsampled_size, resample_round_trip};
pub use mosaic::{global_cell_origin, mosaic_cell, mosaic_rect};

use crate::buffer::{PixelBuffer, WorkingBuffer};
use crate::config::{EffectConfig, EffectKind};
use crate::geometry::PixelRect;

/// Apply the configured effect to `rect` of a working buffer, in place
pub fn apply_in_place(work: &mut WorkingBuffer, rect: PixelRect, config: &EffectConfig) {
    let config = config.sanitized();
    match config.kind {
        EffectKind::Mosaic => mosaic_rect(work, rect, config.mosaic_block_size),
        EffectKind::Blur => blur_rect(work, rect, config.blur_intensity),
    }
}

/// Return a copy of `buffer` with the effect applied inside `rect`.
///
/// The rectangle is clipped to the buffer. If nothing remains after clipping
/// the result equals the input.
pub fn apply_region(buffer: &PixelBuffer, rect: PixelRect, config: &EffectConfig) -> PixelBuffer {
    if rect.clip_to(buffer.width(), buffer.height()).is_none() {
        log::debug!("Region {:?} lies outside the buffer, nothing to apply", rect);
        return buffer.clone();
    }
    let mut work = buffer.to_working();
    apply_in_place(&mut work, rect, config);
    work.freeze()
}
