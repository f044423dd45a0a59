use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::buffer::WorkingBuffer;
use crate::geometry::PixelRect;

/// Smallest fraction of the region size used for the downsampled copy
pub const MIN_SCALE: f32 = 0.05;

/// Intensity at which the downsample factor bottoms out
const INTENSITY_RANGE: f32 = 50.0;

/// Downsample factor for a given blur intensity
pub fn blur_scale(intensity: u32) -> f32 {
    (1.0 - intensity as f32 / INTENSITY_RANGE).max(MIN_SCALE)
}

/// Size of the intermediate image for a `width` x `height` region
pub fn downsampled_size(width: u32, height: u32, intensity: u32) -> (u32, u32) {
    let scale = blur_scale(intensity);
    let w = ((width as f32 * scale).floor() as u32).max(1);
    let h = ((height as f32 * scale).floor() as u32).max(1);
    (w, h)
}

/// Blur `rect` by shrinking it and stretching it back with bilinear filtering.
///
/// This is a box-like approximation, not a Gaussian. The region keeps its
/// clipped size; pixels outside it are untouched.
pub fn blur_rect(work: &mut WorkingBuffer, rect: PixelRect, intensity: u32) {
    let Some(area) = rect.clip_to(work.width(), work.height()) else {
        return;
    };
    let (ox, oy) = (area.x as u32, area.y as u32);
    let (width, height) = (area.width as u32, area.height as u32);

    let region = RgbaImage::from_fn(width, height, |x, y| Rgba(work.pixel(ox + x, oy + y)));
    let restored = resample_round_trip(&region, intensity);

    for (x, y, px) in restored.enumerate_pixels() {
        work.set_pixel(ox + x, oy + y, px.0);
    }
}

/// Downsample then upsample an image back to its original size
pub fn resample_round_trip(region: &RgbaImage, intensity: u32) -> RgbaImage {
    let (width, height) = region.dimensions();
    let (small_w, small_h) = downsampled_size(width, height, intensity);
    let small = imageops::resize(region, small_w, small_h, FilterType::Triangle);
    imageops::resize(&small, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        assert!((blur_scale(10) - 0.8).abs() < 1e-6);
        assert!((blur_scale(50) - MIN_SCALE).abs() < 1e-6);
        assert!((blur_scale(49) - MIN_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_downsampled_size_never_zero() {
        assert_eq!(downsampled_size(3, 2, 50), (1, 1));
        assert_eq!(downsampled_size(100, 40, 25), (50, 20));
    }

    #[test]
    fn test_round_trip_keeps_dimensions() {
        let region = RgbaImage::from_pixel(37, 11, Rgba([1, 2, 3, 255]));
        let out = resample_round_trip(&region, 30);
        assert_eq!(out.dimensions(), (37, 11));
    }

    #[test]
    fn test_round_trip_of_uniform_image_is_uniform() {
        let region = RgbaImage::from_pixel(20, 20, Rgba([90, 60, 30, 255]));
        let out = resample_round_trip(&region, 40);
        assert!(out.pixels().all(|px| *px == Rgba([90, 60, 30, 255])));
    }
}
