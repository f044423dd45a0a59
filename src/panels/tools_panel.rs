use crate::RedactApp;
use crate::config::{EditMode, EffectConfig, EffectKind};

pub fn tools_panel(app: &mut RedactApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.separator();

            // Edit mode
            let mut mode = app.mode();
            ui.label("Edit mode");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut mode, EditMode::Rect, "▭ Drag");
                ui.selectable_value(&mut mode, EditMode::Brush, "🖌 Brush");
            });
            if mode != app.mode() {
                log::info!("Edit mode selected from UI: {}", mode.name());
                app.set_mode(mode);
            }

            ui.separator();

            // Effect settings
            let config = app.config_mut();
            ui.label("Effect");
            ui.horizontal(|ui| {
                ui.radio_value(&mut config.kind, EffectKind::Blur, "Blur");
                ui.radio_value(&mut config.kind, EffectKind::Mosaic, "Mosaic");
            });

            match config.kind {
                EffectKind::Blur => {
                    ui.add(
                        egui::Slider::new(&mut config.blur_intensity, EffectConfig::BLUR_INTENSITY)
                            .text("Intensity")
                            .suffix("px"),
                    );
                }
                EffectKind::Mosaic => {
                    ui.add(
                        egui::Slider::new(&mut config.mosaic_block_size, EffectConfig::MOSAIC_BLOCK_SIZE)
                            .text("Block size")
                            .suffix("px"),
                    );
                }
            }

            if mode == EditMode::Brush {
                let mut size = config.brush_size();
                let min = (*EffectConfig::BRUSH_RADIUS.start() * 2.0) as u32;
                let max = (*EffectConfig::BRUSH_RADIUS.end() * 2.0) as u32;
                if ui
                    .add(egui::Slider::new(&mut size, min..=max).text("Brush size").suffix("px"))
                    .changed()
                {
                    config.set_brush_size(size);
                }
            }

            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.session().can_undo();
                let can_redo = app.session().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });

            let has_image = app.session().has_image();
            if ui.add_enabled(has_image, egui::Button::new("Save PNG")).clicked() {
                app.save();
            }

            ui.separator();

            let history = app.session().history();
            match history.index() {
                Some(index) => match history.capacity() {
                    Some(capacity) => ui.label(format!(
                        "History: {} / {} (keeps {})",
                        index + 1,
                        history.len(),
                        capacity
                    )),
                    None => ui.label(format!("History: {} / {}", index + 1, history.len())),
                },
                None => ui.label("No image loaded"),
            };

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
