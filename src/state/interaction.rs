//! Gesture state of the canvas.
//!
//! ```text
//!              pointer-down (pan tool / middle button)
//!   ┌──────┐ ─────────────────────────────────────────► ┌─────────┐
//!   │      │ ◄───────────────────────────────────────── │ Panning │
//!   │ Idle │            pointer-up / leave              └─────────┘
//!   │      │ ─────────────────────────────────────────► ┌─────────┐
//!   └──────┘ ◄───────────────────────────────────────── │ Drawing │
//!              pointer-down (pencil) / pointer-up       └─────────┘
//! ```
//!
//! Gestures never nest: a pointer-down outside `Idle` is ignored.

use egui::Pos2;

use crate::path::MutablePath;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Dragging the view; `last` is the previous pointer position in screen space
    Panning { last: Pos2 },
    /// Collecting world-space points for a new path
    Drawing { path: MutablePath },
}

impl Interaction {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &Interaction) -> bool {
        match (self, new_state) {
            (Interaction::Idle, _) => true,
            (Interaction::Panning { .. }, Interaction::Idle) => true,
            (Interaction::Panning { .. }, Interaction::Panning { .. }) => true,
            (Interaction::Drawing { .. }, Interaction::Idle) => true,
            (Interaction::Drawing { .. }, Interaction::Drawing { .. }) => true,
            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Interaction::Panning { .. })
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Interaction::Drawing { .. })
    }

    /// Points of the stroke in progress, if drawing
    pub fn current_path(&self) -> Option<&MutablePath> {
        match self {
            Interaction::Drawing { path } => Some(path),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "Idle",
            Interaction::Panning { .. } => "Panning",
            Interaction::Drawing { .. } => "Drawing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_nested_gestures() {
        let panning = Interaction::Panning { last: Pos2::ZERO };
        let drawing = Interaction::Drawing {
            path: MutablePath::new(Pos2::ZERO),
        };
        assert!(Interaction::Idle.can_transition_to(&panning));
        assert!(Interaction::Idle.can_transition_to(&drawing));
        assert!(!panning.can_transition_to(&drawing));
        assert!(!drawing.can_transition_to(&panning));
        assert!(drawing.can_transition_to(&Interaction::Idle));
    }
}
