use std::path::{Path, PathBuf};

use eframe::egui;

use crate::buffer::BufferRef;
use crate::config::{EditMode, EffectConfig};
use crate::file_handler::{self, ExportOutcome, FileHandler};
use crate::geometry;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;
use crate::state::{CommitOutcome, EditSession};

/// We derive Deserialize/Serialize so the effect settings survive a restart.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct RedactApp {
    config: EffectConfig,
    mode: EditMode,

    #[serde(skip)]
    session: EditSession,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    file_handler: FileHandler,
    // Last message shown under the controls
    #[serde(skip)]
    status: Option<String>,
}

impl Default for RedactApp {
    fn default() -> Self {
        Self {
            config: EffectConfig::default(),
            mode: EditMode::default(),
            session: EditSession::new(),
            renderer: Renderer::new(),
            file_handler: FileHandler::new(),
            status: None,
        }
    }
}

impl RedactApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_image: Option<PathBuf>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.config = app.config.sanitized();

        if let Some(path) = initial_image {
            app.open(&path);
        }
        app
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EffectConfig {
        &mut self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
        self.session.set_mode(mode);
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Load an image file from disk, replacing the current one
    pub fn open(&mut self, path: &Path) {
        match file_handler::load_image(path) {
            Ok(buffer) => {
                self.renderer.clear();
                self.session.load_image(buffer);
                self.status = Some(format!("Opened {}", path.display()));
            }
            Err(err) => {
                log::error!("Failed to open {}: {}", path.display(), err);
                self.status = Some(format!("Could not open {}: {}", path.display(), err));
            }
        }
    }

    pub fn undo(&mut self) {
        if self.session.undo().is_none() {
            self.status = Some("Nothing to undo".to_owned());
        }
    }

    pub fn redo(&mut self) {
        if self.session.redo().is_none() {
            self.status = Some("Nothing to redo".to_owned());
        }
    }

    /// Write the current snapshot into the working directory
    pub fn save(&mut self) {
        let Some(buffer) = self.session.current_snapshot() else {
            return;
        };
        let path = Path::new(file_handler::EXPORT_FILE_NAME);
        self.status = Some(match file_handler::export_png(buffer, path) {
            Ok(ExportOutcome::Created) => format!("Saved {}", path.display()),
            Ok(ExportOutcome::Replaced) => format!("Saved {} (replaced existing file)", path.display()),
            Err(err) => {
                log::error!("Failed to save {}: {}", path.display(), err);
                format!("Could not save: {}", err)
            }
        });
    }

    /// Feed canvas pointer input into the edit session.
    ///
    /// `image_rect` is where the buffer is drawn on screen.
    pub(crate) fn handle_canvas_input(&mut self, ui: &egui::Ui, response: &egui::Response, image_rect: egui::Rect) {
        let Some(current) = self.session.current_snapshot() else {
            return;
        };
        let buffer_size = egui::vec2(current.width() as f32, current.height() as f32);
        let to_buffer = |pos: egui::Pos2| geometry::screen_to_buffer(pos, image_rect, buffer_size);

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = origin.filter(|p| image_rect.contains(*p)) {
                if let Err(err) = self.session.pointer_down(to_buffer(pos)) {
                    log::warn!("Ignoring pointer down: {}", err);
                }
            }
        }

        if response.dragged() && !self.session.state().is_idle() {
            if let Some(pos) = response.interact_pointer_pos() {
                if image_rect.contains(pos) {
                    self.session.pointer_move(to_buffer(pos));
                } else {
                    let outcome = self.session.pointer_leave(&self.config);
                    self.report(outcome);
                }
            }
        }

        if response.drag_stopped() {
            let outcome = self.session.pointer_up(&self.config);
            self.report(outcome);
        }
    }

    fn report(&mut self, outcome: CommitOutcome) {
        match outcome {
            CommitOutcome::Committed(_) => self.status = None,
            CommitOutcome::Discarded => {
                self.status = Some("Selection too small, nothing applied".to_owned());
            }
            CommitOutcome::NoEdit => {}
        }
    }

    /// Buffer to show this frame, including any live preview
    pub(crate) fn display_buffer(&mut self) -> Option<BufferRef> {
        self.session.preview(&self.config)
    }

    pub(crate) fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, KeyboardShortcut, Modifiers};

        let redo = KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        let undo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);

        // Check redo first: the undo shortcut would also match with shift held
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.undo();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        match self.file_handler.take_dropped_image() {
            Some(Ok(buffer)) => {
                self.renderer.clear();
                self.session.load_image(buffer);
                self.status = None;
            }
            Some(Err(err)) => {
                log::error!("Failed to load dropped file: {}", err);
                self.status = Some(err.to_string());
            }
            None => {}
        }
    }
}

impl eframe::App for RedactApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.set_mode(self.mode);
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
