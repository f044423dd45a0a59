use std::collections::HashSet;
use std::sync::Arc;

use egui::Pos2;

use crate::buffer::{PixelBuffer, WorkingBuffer};
use crate::config::{EffectConfig, EffectKind};
use crate::effect::{blur_rect, global_cell_origin, mosaic_cell};
use crate::geometry::PixelRect;

/// Target distance between consecutive resampled points, in buffer pixels
pub const SAMPLE_SPACING: f32 = 5.0;

/// Upper bound on points emitted for one raw segment
const MAX_SEGMENT_STEPS: usize = 4096;

// Immutable stroke: the dense path that gets committed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    points: Vec<Pos2>,
}

// Mutable stroke: grows while the pointer moves
#[derive(Debug, Clone, PartialEq)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    last_raw: Pos2,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(points: Vec<Pos2>) -> Self {
        Self { points }
    }

    /// Build a stroke from raw pointer samples
    pub fn from_raw(raw: &[Pos2]) -> Self {
        Self::new(resample(raw))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl MutableStroke {
    /// Start a stroke at the pointer-down position
    pub fn new(start: Pos2) -> Self {
        Self {
            points: vec![start],
            last_raw: start,
        }
    }

    /// Append the interpolated points between the previous sample and `point`
    pub fn add_point(&mut self, point: Pos2) {
        self.points.extend(resample_segment(self.last_raw, point));
        self.last_raw = point;
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn last_raw(&self) -> Pos2 {
        self.last_raw
    }

    // Convert to an immutable Stroke
    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.points.clone())
    }

    // Convert to a reference-counted StrokeRef
    pub fn to_stroke_ref(&self) -> StrokeRef {
        Arc::new(self.to_stroke())
    }
}

/// Points strictly after `from` up to and including `to`, about
/// [`SAMPLE_SPACING`] apart. `from` itself is never emitted.
pub fn resample_segment(from: Pos2, to: Pos2) -> Vec<Pos2> {
    let delta = to - from;
    let distance = delta.length();
    if !distance.is_finite() {
        return vec![to];
    }
    let steps = ((distance / SAMPLE_SPACING).floor() as usize).clamp(1, MAX_SEGMENT_STEPS);

    (1..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            from + delta * t
        })
        .collect()
}

/// Densify a raw pointer path. The first raw point is kept once; every
/// segment then contributes only forward-interpolated points.
pub fn resample(raw: &[Pos2]) -> Vec<Pos2> {
    let Some(&first) = raw.first() else {
        return Vec::new();
    };
    let mut dense = vec![first];
    for pair in raw.windows(2) {
        dense.extend(resample_segment(pair[0], pair[1]));
    }
    dense
}

/// Return a copy of `buffer` with the configured effect painted along `points`
pub fn apply_along_path(
    buffer: &PixelBuffer,
    points: &[Pos2],
    radius: f32,
    config: &EffectConfig,
) -> PixelBuffer {
    if points.is_empty() {
        return buffer.clone();
    }
    let mut work = buffer.to_working();
    apply_along_path_in_place(&mut work, points, radius, config);
    work.freeze()
}

/// In-place variant of [`apply_along_path`]
pub fn apply_along_path_in_place(
    work: &mut WorkingBuffer,
    points: &[Pos2],
    radius: f32,
    config: &EffectConfig,
) {
    let config = config.sanitized();
    if points.is_empty() || radius.is_nan() || radius <= 0.0 {
        return;
    }
    let radius = radius.clamp(
        *EffectConfig::BRUSH_RADIUS.start(),
        *EffectConfig::BRUSH_RADIUS.end(),
    );
    match config.kind {
        EffectKind::Mosaic => mosaic_along_path(work, points, radius, config.mosaic_block_size),
        EffectKind::Blur => blur_along_path(work, points, radius, config.blur_intensity),
    }
}

/// Mosaic every global grid cell touched by a disc around each point.
///
/// Cells are keyed by their buffer-global origin and averaged at most once
/// per stroke, so overlapping dabs never compound.
fn mosaic_along_path(work: &mut WorkingBuffer, points: &[Pos2], radius: f32, block_size: u32) {
    let width = i64::from(work.width());
    let height = i64::from(work.height());
    let block = i64::from(block_size.max(1));
    let reach = radius.ceil() as i64;
    let radius_sq = radius * radius;

    let mut processed: HashSet<(i64, i64)> = HashSet::new();
    for point in points {
        if !dab_reaches(*point, radius, width, height) {
            continue;
        }
        let cx = point.x.round() as i64;
        let cy = point.y.round() as i64;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 > radius_sq {
                    continue;
                }
                let origin = global_cell_origin(cx + dx, cy + dy, block_size);
                if origin.0 < 0 || origin.1 < 0 || origin.0 >= width || origin.1 >= height {
                    continue;
                }
                if !processed.insert(origin) {
                    continue;
                }
                let cell = PixelRect::new(
                    origin.0,
                    origin.1,
                    block.min(width - origin.0),
                    block.min(height - origin.1),
                );
                mosaic_cell(work, cell);
            }
        }
    }
    log::debug!("Stroke mosaic touched {} cells", processed.len());
}

/// Blur a square box around each point. Overlapping dabs compound.
fn blur_along_path(work: &mut WorkingBuffer, points: &[Pos2], radius: f32, intensity: u32) {
    let (width, height) = (i64::from(work.width()), i64::from(work.height()));
    for point in points {
        if !dab_reaches(*point, radius, width, height) {
            continue;
        }
        let dab = PixelRect::square_around(*point, radius);
        if dab.clip_to(work.width(), work.height()).is_none() {
            continue;
        }
        blur_rect(work, dab, intensity);
    }
}

// True if a dab of `radius` around `center` can touch a `width` x `height` buffer.
// Checked in float space so far-off or non-finite centers never reach integer math.
fn dab_reaches(center: Pos2, radius: f32, width: i64, height: i64) -> bool {
    center.is_finite()
        && center.x + radius >= 0.0
        && center.y + radius >= 0.0
        && center.x - radius <= width as f32
        && center.y - radius <= height as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_resample_segment_spacing() {
        let points = resample_segment(pos2(0.0, 0.0), pos2(20.0, 0.0));
        assert_eq!(
            points,
            vec![pos2(5.0, 0.0), pos2(10.0, 0.0), pos2(15.0, 0.0), pos2(20.0, 0.0)]
        );
    }

    #[test]
    fn test_short_segment_emits_endpoint_only() {
        let points = resample_segment(pos2(1.0, 1.0), pos2(3.0, 2.0));
        assert_eq!(points, vec![pos2(3.0, 2.0)]);
    }

    #[test]
    fn test_resample_keeps_first_point_once() {
        let dense = resample(&[pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)]);
        assert_eq!(
            dense,
            vec![
                pos2(0.0, 0.0),
                pos2(5.0, 0.0),
                pos2(10.0, 0.0),
                pos2(10.0, 5.0),
                pos2(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_dab_reaches() {
        assert!(dab_reaches(pos2(-4.0, 5.0), 5.0, 10, 10));
        assert!(!dab_reaches(pos2(-6.0, 5.0), 5.0, 10, 10));
        assert!(!dab_reaches(pos2(1e20, 5.0), 5.0, 10, 10));
        assert!(!dab_reaches(pos2(f32::NAN, 5.0), 5.0, 10, 10));
    }

    #[test]
    fn test_non_finite_segment_emits_endpoint_only() {
        let far = pos2(f32::INFINITY, 0.0);
        assert_eq!(resample_segment(pos2(0.0, 0.0), far), vec![far]);
        assert_eq!(resample_segment(pos2(0.0, 0.0), pos2(1e30, 0.0)).len(), MAX_SEGMENT_STEPS);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample(&[]).is_empty());
    }

    #[test]
    fn test_mutable_stroke_matches_batch_resample() {
        let raw = [pos2(2.0, 3.0), pos2(30.0, 3.0), pos2(30.0, 40.0), pos2(29.0, 41.0)];
        let mut stroke = MutableStroke::new(raw[0]);
        for p in &raw[1..] {
            stroke.add_point(*p);
        }
        assert_eq!(stroke.points(), resample(&raw).as_slice());
        assert_eq!(stroke.last_raw(), pos2(29.0, 41.0));
        assert_eq!(stroke.to_stroke(), Stroke::from_raw(&raw));
    }
}
