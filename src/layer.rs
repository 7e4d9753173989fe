use serde::{Deserialize, Serialize};
use std::fmt;

use crate::image::CanvasImage;
use crate::path::PathRef;

/// A unique identifier for a layer, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub usize);

impl LayerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Hands out layer ids for one canvas session.
///
/// Lives outside the undoable document so that an id released by undo is
/// never handed out again.
#[derive(Debug, Clone)]
pub struct LayerIdGenerator {
    next: usize,
}

impl Default for LayerIdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl LayerIdGenerator {
    pub fn generate(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        id
    }
}

/// One editable attribute of a layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerProperty {
    Name(String),
    Description(Option<String>),
    Visible(bool),
    Opacity(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    pub description: Option<String>,
    /// Own visibility; see [`Document::is_effectively_visible`](crate::document::Document::is_effectively_visible)
    pub visible: bool,
    /// Own opacity in 0.0 ..= 1.0
    pub opacity: f32,
    /// Draw order is insertion order
    pub paths: Vec<PathRef>,
    pub images: Vec<CanvasImage>,
    pub parent: Option<LayerId>,
    pub children: Vec<LayerId>,
    /// Number of ancestors
    pub depth: usize,
    /// Tree view state, does not affect rendering
    pub expanded: bool,
}

impl Layer {
    pub fn new(id: LayerId, parent: Option<&Layer>) -> Self {
        Self {
            id,
            name: format!("Layer {}", id.0),
            description: None,
            visible: true,
            opacity: 1.0,
            paths: Vec::new(),
            images: Vec::new(),
            parent: parent.map(|p| p.id),
            children: Vec::new(),
            depth: parent.map_or(0, |p| p.depth + 1),
            expanded: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn set_property(&mut self, property: LayerProperty) {
        match property {
            LayerProperty::Name(name) => self.name = name,
            LayerProperty::Description(description) => {
                self.description = description.filter(|d| !d.is_empty());
            }
            LayerProperty::Visible(visible) => self.visible = visible,
            LayerProperty::Opacity(opacity) => self.opacity = opacity.clamp(0.0, 1.0),
        }
    }

    /// Drop all paths and images, keep the layer itself
    pub fn clear_content(&mut self) {
        self.paths.clear();
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_id_display() {
        assert_eq!(LayerId(7).to_string(), "layer-7");
    }

    #[test]
    fn test_generator_is_monotonic() {
        let mut ids = LayerIdGenerator::default();
        assert_eq!(ids.generate(), LayerId(1));
        assert_eq!(ids.generate(), LayerId(2));
    }

    #[test]
    fn test_child_depth() {
        let root = Layer::new(LayerId(1), None);
        let child = Layer::new(LayerId(2), Some(&root));
        let grandchild = Layer::new(LayerId(3), Some(&child));
        assert_eq!(root.depth, 0);
        assert_eq!(child.depth, 1);
        assert_eq!(grandchild.depth, 2);
        assert_eq!(grandchild.parent, Some(LayerId(2)));
        assert_eq!(child.name, "Layer 2");
    }

    #[test]
    fn test_set_property() {
        let mut layer = Layer::new(LayerId(1), None);
        layer.set_property(LayerProperty::Opacity(1.5));
        assert_eq!(layer.opacity, 1.0);
        layer.set_property(LayerProperty::Description(Some(String::new())));
        assert_eq!(layer.description, None);
        layer.set_property(LayerProperty::Visible(false));
        assert!(!layer.visible);
    }
}
