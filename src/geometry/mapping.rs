use egui::{Pos2, Rect, Vec2};

/// Map a screen position inside `display` into buffer space.
///
/// `buffer_size` is the raster size in pixels; `display` is where that raster
/// is drawn on screen. Positions outside `display` map outside the buffer.
pub fn screen_to_buffer(pos: Pos2, display: Rect, buffer_size: Vec2) -> Pos2 {
    if display.width() <= 0.0 || display.height() <= 0.0 {
        return Pos2::ZERO;
    }
    let scale_x = buffer_size.x / display.width();
    let scale_y = buffer_size.y / display.height();
    Pos2::new(
        (pos.x - display.min.x) * scale_x,
        (pos.y - display.min.y) * scale_y,
    )
}

/// Largest rect with the buffer's aspect ratio that fits in `available`,
/// centered, never scaled above 1:1
pub fn fit_to_area(available: Rect, buffer_size: Vec2) -> Rect {
    if buffer_size.x <= 0.0 || buffer_size.y <= 0.0 {
        return Rect::from_min_size(available.min, Vec2::ZERO);
    }
    let scale = (available.width() / buffer_size.x)
        .min(available.height() / buffer_size.y)
        .min(1.0)
        .max(0.0);
    Rect::from_center_size(available.center(), buffer_size * scale)
}
