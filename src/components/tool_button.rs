use eframe::egui;

use crate::tool::Tool;

/// Square icon button for one tool
pub struct ToolButton {
    pub tool: Tool,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: Tool, selected: bool) -> Self {
        Self { tool, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(0x25, 0x63, 0xeb)
            } else if response.hovered() {
                egui::Color32::from_rgb(0x37, 0x41, 0x51)
            } else {
                egui::Color32::TRANSPARENT
            };

            ui.painter().rect_filled(rect, 4.0, bg_color);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(18.0),
                egui::Color32::WHITE,
            );
        }

        response.on_hover_text(self.tool.name())
    }
}
