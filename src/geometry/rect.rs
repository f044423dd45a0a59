use egui::{Pos2, Rect};

/// Integer pixel rectangle in buffer space.
///
/// The rectangle may extend past the buffer edges; use [`PixelRect::clip_to`]
/// before touching pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalise a drag between two pointer positions.
    ///
    /// Origin and extent are floored independently, matching how a canvas
    /// region read truncates fractional coordinates.
    pub fn from_points(a: Pos2, b: Pos2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let width = (a.x - b.x).abs();
        let height = (a.y - b.y).abs();
        Self::new(
            x.floor() as i64,
            y.floor() as i64,
            width.floor() as i64,
            height.floor() as i64,
        )
    }

    /// Convert a float rectangle using the same flooring as [`PixelRect::from_points`]
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_points(rect.min, rect.max)
    }

    /// Square box of half-size `radius` centered on `center`
    pub fn square_around(center: Pos2, radius: f32) -> Self {
        let x0 = (center.x - radius).floor() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let x1 = (center.x + radius).floor() as i64;
        let y1 = (center.y + radius).floor() as i64;
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersect with a `width` x `height` buffer; `None` if nothing is left
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(i64::from(width));
        let y1 = self.bottom().min(i64::from(height));
        let clipped = PixelRect::new(x0, y0, x1 - x0, y1 - y0);
        (!clipped.is_empty()).then_some(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_from_points_normalises_drag_direction() {
        let rect = PixelRect::from_points(pos2(20.7, 30.2), pos2(5.5, 10.9));
        assert_eq!(rect, PixelRect::new(5, 10, 15, 19));
    }

    #[test]
    fn test_clip_inside_buffer_is_identity() {
        let rect = PixelRect::new(2, 3, 4, 5);
        assert_eq!(rect.clip_to(100, 100), Some(rect));
    }

    #[test]
    fn test_clip_at_edges() {
        let rect = PixelRect::new(-5, 8, 10, 10);
        assert_eq!(rect.clip_to(10, 12), Some(PixelRect::new(0, 8, 5, 4)));
    }

    #[test]
    fn test_clip_outside_buffer_is_none() {
        assert_eq!(PixelRect::new(20, 0, 5, 5).clip_to(10, 10), None);
        assert_eq!(PixelRect::new(0, 0, 0, 5).clip_to(10, 10), None);
    }

    #[test]
    fn test_square_around() {
        let rect = PixelRect::square_around(pos2(10.0, 10.0), 2.5);
        assert_eq!(rect, PixelRect::new(7, 7, 5, 5));
    }
}
