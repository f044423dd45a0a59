mod mapping;
mod rect;

pub use mapping::{fit_to_area, screen_to_buffer};
pub use rect::PixelRect;
