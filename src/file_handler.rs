use std::path::Path;

use eframe::egui;
use image::{ExtendedColorType, ImageFormat};

use crate::buffer::PixelBuffer;
use crate::error::FileError;

/// File name used when saving the edited image
pub const EXPORT_FILE_NAME: &str = "edited-photo.png";

/// Collects files dropped onto the window and turns them into pixel buffers
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files were queued
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the most recently dropped image file.
    ///
    /// Only one image is edited at a time, so when several files are dropped
    /// the last decodable one wins.
    pub fn take_dropped_image(&mut self) -> Option<Result<PixelBuffer, FileError>> {
        let files = std::mem::take(&mut self.dropped_files);
        let mut result = None;
        for file in &files {
            let outcome = load_dropped_file(file);
            if let Err(err) = &outcome {
                log::warn!("Skipping dropped file {}: {}", display_name(file), err);
            }
            if outcome.is_ok() || result.is_none() {
                result = Some(outcome);
            }
        }
        result
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(path) = &file.path {
        has_image_extension(path)
    } else {
        has_image_extension(Path::new(&file.name))
    }
}

fn has_image_extension(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
        }
        None => false,
    }
}

fn load_dropped_file(file: &egui::DroppedFile) -> Result<PixelBuffer, FileError> {
    let name = display_name(file);
    if !is_image_file(file) {
        return Err(FileError::NotAnImage(name));
    }
    if let Some(bytes) = &file.bytes {
        log::info!("Processing image from memory: {} ({} bytes)", name, bytes.len());
        decode_image(bytes)
    } else if let Some(path) = &file.path {
        load_image(path)
    } else {
        Err(FileError::NotAnImage(name))
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into an RGBA buffer
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, FileError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Successfully decoded image: {}x{}", width, height);
    Ok(PixelBuffer::from_rgba(width, height, rgba.into_raw())?)
}

/// Read and decode an image file from disk
pub fn load_image(path: &Path) -> Result<PixelBuffer, FileError> {
    log::info!("Processing image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Whether an export created a new file or replaced one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Created,
    Replaced,
}

/// Encode `buffer` as PNG at `path`, replacing any existing file
pub fn export_png(buffer: &PixelBuffer, path: &Path) -> Result<ExportOutcome, FileError> {
    let outcome = if path.exists() {
        log::warn!("Overwriting existing file {}", path.display());
        ExportOutcome::Replaced
    } else {
        ExportOutcome::Created
    };
    image::save_buffer_with_format(
        path,
        buffer.data(),
        buffer.width(),
        buffer.height(),
        ExtendedColorType::Rgba8,
        ImageFormat::Png,
    )?;
    log::info!("Saved {}x{} image to {}", buffer.width(), buffer.height(), path.display());
    Ok(outcome)
}
