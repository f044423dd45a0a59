use crate::RedactApp;
use crate::geometry;

pub fn central_panel(app: &mut RedactApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(current) = app.session().current_snapshot() else {
            ui.centered_and_justified(|ui| {
                ui.heading("Drop an image here to start");
            });
            return;
        };
        let buffer_size = egui::vec2(current.width() as f32, current.height() as f32);

        // Create a painting area that fills the remaining space
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let image_rect = geometry::fit_to_area(response.rect, buffer_size);

        // Input first so this frame shows the latest preview
        app.handle_canvas_input(ui, &response, image_rect);

        if let Some(display) = app.display_buffer() {
            let renderer = app.renderer_mut();
            renderer.update(ctx, &display);
            renderer.paint(&painter, image_rect);
        }
    });
}
