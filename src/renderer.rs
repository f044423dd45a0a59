// src/renderer.rs
use eframe::egui::{self, Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions};

use crate::buffer::PixelBuffer;

/// Uploads the displayed buffer to the GPU and paints it.
///
/// The texture is only re-uploaded when the buffer id changes, so idle frames
/// cost nothing beyond the draw call.
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
    uploaded_id: Option<usize>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_texture", &self.texture.is_some())
            .field("uploaded_id", &self.uploaded_id)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `buffer` differs from what is already on the GPU
    pub fn needs_upload(&self, buffer: &PixelBuffer) -> bool {
        self.uploaded_id != Some(buffer.id())
    }

    /// Make sure the texture shows `buffer`
    pub fn update(&mut self, ctx: &egui::Context, buffer: &PixelBuffer) {
        if !self.needs_upload(buffer) {
            return;
        }
        let image = to_color_image(buffer);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::LINEAR));
            }
        }
        self.uploaded_id = Some(buffer.id());
    }

    /// Paint the current texture stretched over `rect`
    pub fn paint(&self, painter: &egui::Painter, rect: Rect) {
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            painter.rect_filled(rect, 0.0, Color32::from_gray(200));
        }
    }

    /// Drop the texture, e.g. before a new image is loaded
    pub fn clear(&mut self) {
        self.texture = None;
        self.uploaded_id = None;
    }
}

/// Convert a buffer into an egui image
pub fn to_color_image(buffer: &PixelBuffer) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [buffer.width() as usize, buffer.height() as usize],
        buffer.data(),
    )
}
