mod canvas_state;
mod interaction;

pub use canvas_state::CanvasState;
pub use interaction::Interaction;
