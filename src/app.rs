use crate::config::CanvasConfig;
use crate::input::InputHandler;
use crate::panels::{LayerPanel, canvas_controls, central_panel, toolbar};
use crate::renderer::Renderer;
use crate::state::CanvasState;

/// A full-window canvas with its toolbar, layer panel and view controls
pub struct CanvasApp {
    state: CanvasState,
    renderer: Renderer,
    input: InputHandler,
    layer_panel: LayerPanel,
}

impl Default for CanvasApp {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl CanvasApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::with_config(config)
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            state: CanvasState::new(config),
            renderer: Renderer::default(),
            input: InputHandler::new(),
            layer_panel: LayerPanel::new(),
        }
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let undo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        let redo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z);

        // Redo first: its modifiers are a superset of undo's
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.state.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.state.undo();
        }
    }
}

impl eframe::App for CanvasApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.wants_keyboard_input() {
            self.handle_shortcuts(ctx);
        }
        self.layer_panel.ingest_dropped_files(ctx, &mut self.state);

        self.layer_panel.show(&mut self.state, ctx);
        central_panel(&mut self.state, &mut self.renderer, &mut self.input, ctx);
        toolbar(&mut self.state, ctx);
        canvas_controls(&mut self.state, ctx);
    }
}
