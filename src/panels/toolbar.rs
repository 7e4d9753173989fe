use eframe::egui;

use crate::components::ToolButton;
use crate::path::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, PRESET_COLORS};
use crate::state::CanvasState;
use crate::tool::Tool;

/// Floating toolbar along the top edge of the canvas
pub fn toolbar(state: &mut CanvasState, ctx: &egui::Context) {
    egui::Window::new("Toolbar")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, [0.0, 12.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    if ToolButton::new(tool, state.tool() == tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        state.set_tool(tool);
                    }
                }

                ui.separator();
                stroke_controls(state, ui);
                ui.separator();

                let undo_hint = history_hint("Undo", state.history().undo_label());
                if ui.add_enabled(state.can_undo(), egui::Button::new("↶")).on_hover_text(undo_hint).clicked() {
                    state.undo();
                }
                let redo_hint = history_hint("Redo", state.history().redo_label());
                if ui.add_enabled(state.can_redo(), egui::Button::new("↷")).on_hover_text(redo_hint).clicked() {
                    state.redo();
                }
                if ui.button("🗑").on_hover_text("Clear canvas").clicked() {
                    state.clear_canvas();
                }
            });
        });
}

/// Tooltip naming the edit an undo or redo would affect
fn history_hint(action: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{} {}", action, label),
        None => action.to_owned(),
    }
}

fn stroke_controls(state: &mut CanvasState, ui: &mut egui::Ui) {
    let mut stroke = state.stroke();

    if ui
        .add_enabled(stroke.width > MIN_STROKE_WIDTH, egui::Button::new("−"))
        .clicked()
    {
        state.step_stroke_width(-1.0);
    }
    ui.label(format!("{:.0}px", stroke.width));
    if ui
        .add_enabled(stroke.width < MAX_STROKE_WIDTH, egui::Button::new("+"))
        .clicked()
    {
        state.step_stroke_width(1.0);
    }

    if egui::color_picker::color_edit_button_srgba(ui, &mut stroke.color, egui::color_picker::Alpha::Opaque).changed() {
        state.set_stroke_color(stroke.color);
    }

    ui.menu_button("🎨", |ui| {
        ui.horizontal_wrapped(|ui| {
            for color in PRESET_COLORS {
                let (rect, response) = ui.allocate_exact_size(egui::vec2(20.0, 20.0), egui::Sense::click());
                ui.painter().rect_filled(rect, 3.0, color);
                if color == stroke.color {
                    ui.painter().rect_stroke(rect, 3.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
                }
                if response.clicked() {
                    state.set_stroke_color(color);
                    ui.close_menu();
                }
            }
        });
    });

    if ui
        .add(egui::Slider::new(&mut stroke.opacity, 0.0..=1.0).text("opacity"))
        .changed()
    {
        state.set_stroke_opacity(stroke.opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_hint_names_the_edit() {
        let mut state = CanvasState::default();
        assert_eq!(history_hint("Redo", state.history().redo_label()), "Redo");

        state.add_layer(None);
        state.undo();
        assert_eq!(history_hint("Redo", state.history().redo_label()), "Redo Add Layer");
    }
}
