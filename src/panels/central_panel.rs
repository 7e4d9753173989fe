use eframe::egui;

use crate::input::{InputHandler, route_event};
use crate::renderer::Renderer;
use crate::state::CanvasState;
use crate::tool::Tool;

/// The drawing surface: routes pointer input into the canvas and paints it
pub fn central_panel(state: &mut CanvasState, renderer: &mut Renderer, input: &mut InputHandler, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            state.resize(canvas_rect.size());

            for event in input.process_input(ctx, canvas_rect, response.hovered()) {
                route_event(&event, state);
            }

            let cursor = if state.interaction().is_panning() {
                egui::CursorIcon::Grabbing
            } else {
                match state.tool() {
                    Tool::Pan => egui::CursorIcon::Grab,
                    Tool::Pencil => egui::CursorIcon::Crosshair,
                    Tool::Eraser | Tool::Image => egui::CursorIcon::Default,
                }
            };
            response.on_hover_cursor(cursor);

            renderer.render(ctx, &painter, canvas_rect, state);
        });
}

/// Zoom buttons and readout in the bottom-right corner
pub fn canvas_controls(state: &mut CanvasState, ctx: &egui::Context) {
    egui::Window::new("View")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    state.zoom_out();
                }
                ui.label(format!("{:.0}%", state.viewport().zoom * 100.0));
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    state.zoom_in();
                }
                if ui.button("⟲").on_hover_text("Reset view").clicked() {
                    state.reset_view();
                }
            });
        });
}
