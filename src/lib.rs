#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod buffer;
pub mod command;
pub mod config;
pub mod effect;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod panels;
pub mod preview;
pub mod renderer;
pub mod state;
pub mod stroke;

pub use app::RedactApp;
pub use buffer::{BufferRef, PixelBuffer, WorkingBuffer};
pub use command::{Command, History};
pub use config::{EditMode, EffectConfig, EffectKind, HistoryConfig};
pub use effect::apply_region;
pub use error::{BufferError, FileError, StateTransitionError};
pub use geometry::PixelRect;
pub use preview::Overlay;
pub use renderer::Renderer;
pub use state::{CommitOutcome, EditSession, EditorState};
pub use stroke::{MutableStroke, Stroke, apply_along_path, resample};
