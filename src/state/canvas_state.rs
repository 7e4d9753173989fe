use egui::{Color32, PointerButton, Pos2, Vec2};

use crate::command::{Command, CommandHistory};
use crate::config::CanvasConfig;
use crate::document::Document;
use crate::geometry::{Viewport, screen_to_world};
use crate::image::CanvasImage;
use crate::layer::{Layer, LayerId, LayerIdGenerator, LayerProperty};
use crate::path::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, MutablePath, PathRef, StrokeStyle};
use crate::tool::Tool;

use super::Interaction;

/// Everything one canvas widget knows: the layer tree, its history, the
/// view, the active tool and any gesture in progress.
///
/// Content edits go through [`Command`]s and land in the history. View,
/// tool and selection changes do not.
#[derive(Debug, Clone)]
pub struct CanvasState {
    document: Document,
    current_layer_id: LayerId,
    tool: Tool,
    stroke: StrokeStyle,
    viewport: Viewport,
    interaction: Interaction,
    history: CommandHistory,
    ids: LayerIdGenerator,
    config: CanvasConfig,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasState {
    /// A canvas with one root layer selected and a single history entry.
    /// Unusable config values are replaced, see [`CanvasConfig::sanitized`].
    pub fn new(config: CanvasConfig) -> Self {
        let config = config.sanitized();
        let mut ids = LayerIdGenerator::default();
        let root = ids.generate();
        let document = Document::new(root);

        Self {
            history: CommandHistory::new(document.clone()),
            document,
            current_layer_id: root,
            tool: Tool::default(),
            stroke: config.default_stroke,
            viewport: Viewport::default(),
            interaction: Interaction::Idle,
            ids,
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current_layer_id(&self) -> LayerId {
        self.current_layer_id
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.document.get_layer(self.current_layer_id).ok()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    fn execute(&mut self, command: Command) -> bool {
        match self.history.execute(&command, &mut self.document) {
            Ok(()) => {
                log::info!("{} (history {})", command.label(), self.history.index());
                true
            }
            Err(err) => {
                log::debug!("{} ignored: {}", command.label(), err);
                false
            }
        }
    }

    /// Point the selection at a live layer if it lost its target
    fn ensure_current_layer(&mut self) {
        if !self.document.contains(self.current_layer_id) {
            if let Some(first) = self.document.first_layer_id() {
                log::debug!("current layer {} gone, selecting {}", self.current_layer_id, first);
                self.current_layer_id = first;
            }
        }
    }

    // ---- Layers ----

    /// Add a layer (nested under `parent` if given) and select it.
    ///
    /// Returns `None` when `parent` does not exist.
    pub fn add_layer(&mut self, parent: Option<LayerId>) -> Option<LayerId> {
        if let Some(parent) = parent {
            if !self.document.contains(parent) {
                log::debug!("add layer ignored: parent {} not found", parent);
                return None;
            }
        }

        let id = self.ids.generate();
        if !self.execute(Command::AddLayer { id, parent }) {
            return None;
        }
        self.current_layer_id = id;
        Some(id)
    }

    /// Delete a layer and its subtree. The last remaining layer stays.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let deleted = self.execute(Command::DeleteLayer { id });
        if deleted {
            self.ensure_current_layer();
        }
        deleted
    }

    pub fn set_current_layer(&mut self, id: LayerId) {
        if self.document.contains(id) {
            self.current_layer_id = id;
        } else {
            log::debug!("select ignored: {} not found", id);
        }
    }

    pub fn update_layer_property(&mut self, id: LayerId, property: LayerProperty) -> bool {
        self.execute(Command::UpdateLayerProperty { id, property })
    }

    /// Flip the tree view state of a layer. Not recorded in history.
    pub fn toggle_expansion(&mut self, id: LayerId) {
        if let Err(err) = self.document.toggle_expansion(id) {
            log::debug!("toggle expansion ignored: {}", err);
        }
    }

    // ---- Content ----

    pub fn commit_path(&mut self, layer_id: LayerId, path: PathRef) -> bool {
        self.execute(Command::CommitPath { layer_id, path })
    }

    pub fn add_image(&mut self, layer_id: LayerId, image: CanvasImage) -> bool {
        self.execute(Command::AddImage { layer_id, image })
    }

    /// Place an image at the world origin with the configured default size
    pub fn add_image_to_current_layer(&mut self, src: impl Into<std::sync::Arc<str>>) -> bool {
        let image = CanvasImage::new(src, Pos2::ZERO, self.config.default_image_size);
        self.add_image(self.current_layer_id, image)
    }

    /// Remove every path and image from every layer as a single edit
    pub fn clear_canvas(&mut self) {
        self.execute(Command::ClearCanvas);
    }

    // ---- History ----

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(document) => {
                self.document = document.clone();
                self.ensure_current_layer();
                log::info!("undo (history {})", self.history.index());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(document) => {
                self.document = document.clone();
                self.ensure_current_layer();
                log::info!("redo (history {})", self.history.index());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- Tool and style ----

    /// Switch tools. A gesture in progress is dropped without committing.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        if !self.interaction.is_idle() {
            log::debug!("{} cancelled by tool change", self.interaction.name());
            self.interaction = Interaction::Idle;
        }
        self.tool = tool;
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.stroke.color = color;
    }

    pub fn set_stroke_opacity(&mut self, opacity: f32) {
        self.stroke.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke.width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    pub fn step_stroke_width(&mut self, delta: f32) {
        self.set_stroke_width(self.stroke.width + delta);
    }

    // ---- View ----

    /// Keep the viewport in step with the drawing surface
    pub fn resize(&mut self, size: Vec2) {
        self.viewport.resize(size);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom, self.config.min_zoom, self.config.max_zoom);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.viewport.pan = pan;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.viewport.zoom * self.config.button_zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.viewport.zoom / self.config.button_zoom_step);
    }

    pub fn reset_view(&mut self) {
        self.viewport.zoom = 1.0;
        self.viewport.pan = Vec2::ZERO;
    }

    // ---- Pointer ----

    /// Start a gesture. `position` is in canvas screen space.
    pub fn pointer_down(&mut self, position: Pos2, button: PointerButton) {
        if !self.interaction.is_idle() {
            log::debug!("pointer down ignored while {}", self.interaction.name());
            return;
        }

        if button != PointerButton::Middle && !self.tool.has_pointer_behavior() {
            log::debug!("{} has no pointer action", self.tool.name());
            return;
        }

        let next = if button == PointerButton::Middle || self.tool == Tool::Pan {
            Interaction::Panning { last: position }
        } else if self.tool == Tool::Pencil && button == PointerButton::Primary {
            let start = screen_to_world(position, &self.viewport);
            Interaction::Drawing {
                path: MutablePath::new(start),
            }
        } else {
            log::debug!("no pointer action for {} with {:?}", self.tool.name(), button);
            return;
        };

        if self.interaction.can_transition_to(&next) {
            self.interaction = next;
        }
    }

    pub fn pointer_move(&mut self, position: Pos2) {
        let world = screen_to_world(position, &self.viewport);
        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::Panning { last } => {
                self.viewport.pan += position - *last;
                *last = position;
            }
            Interaction::Drawing { path } => path.add_point(world),
        }
    }

    /// End the gesture. A stroke with fewer than two points is dropped.
    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { path } if path.len() >= 2 => {
                let path = path.finish(self.stroke);
                self.commit_path(self.current_layer_id, path);
            }
            Interaction::Drawing { path } => {
                log::debug!("stroke with {} point(s) discarded", path.len());
            }
            Interaction::Idle | Interaction::Panning { .. } => {}
        }
    }

    /// The pointer left the canvas; behaves like a release
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Zoom by one step per notch, keeping the point under `position` fixed
    pub fn wheel(&mut self, position: Pos2, notches: f32) {
        if notches == 0.0 || !notches.is_finite() {
            return;
        }
        let factor = self.config.wheel_zoom_step.powf(notches);
        self.viewport
            .zoom_at(position, factor, self.config.min_zoom, self.config.max_zoom);
    }
}
