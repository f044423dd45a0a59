use egui::{Pos2, Rect, Vec2};

use crate::buffer::{BufferRef, PixelBuffer, WorkingBuffer};

/// Opacity of the black wash drawn over the region being edited
pub const PREVIEW_ALPHA: f32 = 0.5;

/// Live description of an in-progress edit, drawn on top of the current snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Rectangle being dragged out
    Rect(Rect),
    /// Brush dabs along the stroke so far
    Discs { points: Vec<Pos2>, radius: f32 },
}

impl Overlay {
    /// True if the pixel whose top-left corner is `(x, y)` lies inside the rect
    fn rect_covers(rect: &Rect, x: u32, y: u32) -> bool {
        rect.contains(pixel_center(x, y))
    }

    /// Shade everything this overlay covers that is not yet marked in `shaded`.
    ///
    /// Disc overlays start at point `from`; earlier points are assumed done.
    fn shade_into(&self, work: &mut WorkingBuffer, shaded: &mut [bool], from: usize) {
        let (width, height) = (work.width(), work.height());
        match self {
            Overlay::Rect(rect) => {
                if let Some(bounds) = scan_bounds(*rect, width, height) {
                    shade_where(work, shaded, bounds, |x, y| Self::rect_covers(rect, x, y));
                }
            }
            Overlay::Discs { points, radius } => {
                let radius_sq = radius * radius;
                for p in points.iter().skip(from).filter(|p| p.is_finite()) {
                    let disc = Rect::from_center_size(*p, Vec2::splat(radius * 2.0));
                    if let Some(bounds) = scan_bounds(disc, width, height) {
                        shade_where(work, shaded, bounds, |x, y| {
                            p.distance_sq(pixel_center(x, y)) <= radius_sq
                        });
                    }
                }
            }
        }
    }
}

fn pixel_center(x: u32, y: u32) -> Pos2 {
    Pos2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Pixel bounds of `rect`, clipped to a `width` x `height` buffer
fn scan_bounds(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if !rect.is_finite() {
        return None;
    }
    let x0 = rect.min.x.floor().max(0.0) as u32;
    let y0 = rect.min.y.floor().max(0.0) as u32;
    let x1 = (rect.max.x.ceil().max(0.0) as u32).min(width);
    let y1 = (rect.max.y.ceil().max(0.0) as u32).min(height);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn shade_where(
    work: &mut WorkingBuffer,
    shaded: &mut [bool],
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    covers: impl Fn(u32, u32) -> bool,
) {
    let width = work.width() as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let idx = y as usize * width + x as usize;
            if !shaded[idx] && covers(x, y) {
                work.set_pixel(x, y, shade(work.pixel(x, y)));
                shaded[idx] = true;
            }
        }
    }
}

fn coverage_mask(base: &PixelBuffer) -> Vec<bool> {
    vec![false; base.width() as usize * base.height() as usize]
}

/// Build the display buffer for one frame of an in-progress edit.
///
/// `base` is left untouched. Every covered pixel is shaded once, even where
/// dabs overlap.
pub fn compose(base: &PixelBuffer, overlay: &Overlay) -> PixelBuffer {
    let mut work = base.to_working();
    let mut shaded = coverage_mask(base);
    overlay.shade_into(&mut work, &mut shaded, 0);
    work.freeze()
}

/// The composed frame for the edit in progress, kept between repaints.
///
/// Growing a stroke only shades the newly added dabs; any other change
/// recomposes from the base snapshot.
pub struct PreviewCache {
    base_id: usize,
    overlay: Overlay,
    shaded: Vec<bool>,
    frame: BufferRef,
}

impl std::fmt::Debug for PreviewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCache")
            .field("base_id", &self.base_id)
            .field("overlay", &self.overlay)
            .field("frame_id", &self.frame.id())
            .finish()
    }
}

impl PreviewCache {
    pub fn new(base: &PixelBuffer, overlay: Overlay) -> Self {
        let mut work = base.to_working();
        let mut shaded = coverage_mask(base);
        overlay.shade_into(&mut work, &mut shaded, 0);
        Self {
            base_id: base.id(),
            overlay,
            shaded,
            frame: work.freeze().into_ref(),
        }
    }

    pub fn frame(&self) -> &BufferRef {
        &self.frame
    }

    /// Bring the frame in line with `overlay` drawn over `base`.
    ///
    /// Returns false when nothing changed and the previous frame is reused.
    pub fn update(&mut self, base: &PixelBuffer, overlay: &Overlay) -> bool {
        if self.base_id == base.id() && self.overlay == *overlay {
            return false;
        }
        match self.appended_from(base, overlay) {
            Some(from) => {
                let mut work = self.frame.to_working();
                overlay.shade_into(&mut work, &mut self.shaded, from);
                self.frame = work.freeze().into_ref();
                self.overlay = overlay.clone();
            }
            None => *self = Self::new(base, overlay.clone()),
        }
        true
    }

    // Index of the first new dab if `overlay` only extends the cached stroke
    fn appended_from(&self, base: &PixelBuffer, overlay: &Overlay) -> Option<usize> {
        if self.base_id != base.id() {
            return None;
        }
        match (&self.overlay, overlay) {
            (
                Overlay::Discs { points: old, radius: old_radius },
                Overlay::Discs { points: new, radius },
            ) if old_radius == radius && new.len() > old.len() && new.starts_with(old) => {
                Some(old.len())
            }
            _ => None,
        }
    }
}

// Source-over of translucent black onto an unpremultiplied pixel
fn shade(px: [u8; 4]) -> [u8; 4] {
    let dst_a = f32::from(px[3]) / 255.0;
    let out_a = PREVIEW_ALPHA + dst_a * (1.0 - PREVIEW_ALPHA);
    let keep = dst_a * (1.0 - PREVIEW_ALPHA) / out_a;
    let channel = |c: u8| (f32::from(c) * keep).round() as u8;
    [
        channel(px[0]),
        channel(px[1]),
        channel(px[2]),
        (out_a * 255.0).round() as u8,
    ]
}
