use serde::{Deserialize, Serialize};

/// Tools selectable from the toolbar
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Drag to move the view
    Pan,
    /// Freehand drawing on the current layer
    #[default]
    Pencil,
    // Selectable, no pointer behavior yet
    Eraser,
    Image,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Pan, Tool::Pencil, Tool::Eraser, Tool::Image];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pan => "Pan",
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Image => "Image",
        }
    }

    /// Toolbar glyph
    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Pan => "✋",
            Tool::Pencil => "✏",
            Tool::Eraser => "⌫",
            Tool::Image => "🖼",
        }
    }

    /// Whether pointer input does anything with this tool
    pub fn has_pointer_behavior(&self) -> bool {
        matches!(self, Tool::Pan | Tool::Pencil)
    }
}
