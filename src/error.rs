use thiserror::Error;

/// Errors raised when a pixel buffer would violate its size invariant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Buffer dimensions must be positive (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
}

/// Errors that can occur while importing or exporting image files
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoded image is not a valid buffer: {0}")]
    Buffer(#[from] BufferError),

    #[error("Not a supported image file: {0}")]
    NotAnImage(String),
}

/// Errors that can occur during edit session state transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The requested state transition is not allowed from the current state
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// An edit was started before any image was loaded
    #[error("No image loaded")]
    NoImage,
}
