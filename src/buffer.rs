use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::BufferError;

// Static counter for generating unique buffer IDs
static NEXT_BUFFER_ID: AtomicUsize = AtomicUsize::new(1);

/// Number of bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// An RGBA color as stored in a buffer
pub type Rgba = [u8; 4];

// Immutable pixel buffer, published as a history snapshot
#[derive(Clone)]
pub struct PixelBuffer {
    id: usize,
    width: u32,
    height: u32,
    data: Vec<u8>, // Interleaved RGBA, row-major
}

// Mutable working copy used while an edit is being committed
pub struct WorkingBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

// Reference-counted snapshot shared between the history and the renderer
pub type BufferRef = Arc<PixelBuffer>;

fn next_id() -> usize {
    NEXT_BUFFER_ID.fetch_add(1, Ordering::SeqCst)
}

fn expected_len(width: u32, height: u32) -> usize {
    CHANNELS * width as usize * height as usize
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, validating that the length is exactly `4 * width * height`
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::EmptyDimensions { width, height });
        }
        let expected = expected_len(width, height);
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            id: next_id(),
            width,
            height,
            data,
        })
    }

    /// Create a buffer where every pixel has the same color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, BufferError> {
        let data = color.repeat(width as usize * height as usize);
        Self::from_rgba(width, height, data)
    }

    /// Wrap this buffer in an `Arc` for sharing
    pub fn into_ref(self) -> BufferRef {
        Arc::new(self)
    }

    /// Process-unique identifier, changes whenever a new buffer is produced
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = offset(self.width, x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[idx..idx + CHANNELS]);
        Some(px)
    }

    /// Copy the pixels into a mutable working buffer
    pub fn to_working(&self) -> WorkingBuffer {
        WorkingBuffer {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}

// Equality compares pixels only; two snapshots with identical content are equal
impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl Eq for PixelBuffer {}

impl WorkingBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`; callers must stay within bounds
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = offset(self.width, x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Overwrite R, G and B at `(x, y)`, leaving alpha untouched
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = offset(self.width, x, y);
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Overwrite all four channels at `(x, y)`
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        let idx = offset(self.width, x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&px);
    }

    /// Publish the working copy as a new immutable snapshot
    pub fn freeze(self) -> PixelBuffer {
        PixelBuffer {
            id: next_id(),
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

#[inline]
fn offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * CHANNELS
}
