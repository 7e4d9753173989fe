mod central_panel;
mod layer_panel;
mod toolbar;

pub use central_panel::{canvas_controls, central_panel};
pub use layer_panel::{LayerPanel, dropped_image_source};
pub use toolbar::toolbar;
