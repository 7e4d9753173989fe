use std::collections::{HashMap, HashSet};

use crate::command::{CommandError, CommandResult};
use crate::image::CanvasImage;
use crate::layer::{Layer, LayerId, LayerProperty};
use crate::path::PathRef;

/// Visibility and opacity of a layer composed with all of its ancestors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveProperties {
    pub visible: bool,
    pub opacity: f32,
}

/// The layer tree of one canvas.
///
/// Layers are kept in an arena in creation order, with an id index for
/// lookups. Parent and child links are stored as ids on each layer. A
/// `Document` is the unit that history snapshots are made of, so every
/// content edit goes through a [`Command`](crate::command::Command) applied
/// to a clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    layers: Vec<Layer>,
    index: HashMap<LayerId, usize>,
}

impl Document {
    /// Creates a document holding a single root layer
    pub fn new(root: LayerId) -> Self {
        let mut document = Self {
            layers: Vec::new(),
            index: HashMap::new(),
        };
        document.push(Layer::new(root, None));
        document
    }

    fn push(&mut self, layer: Layer) {
        self.index.insert(layer.id, self.layers.len());
        self.layers.push(layer);
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (layer.id, i))
            .collect();
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get_layer(&self, id: LayerId) -> CommandResult<&Layer> {
        self.index
            .get(&id)
            .map(|&i| &self.layers[i])
            .ok_or(CommandError::LayerNotFound(id))
    }

    pub fn get_layer_mut(&mut self, id: LayerId) -> CommandResult<&mut Layer> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.layers[i]),
            None => Err(CommandError::LayerNotFound(id)),
        }
    }

    /// First layer in collection order
    pub fn first_layer_id(&self) -> Option<LayerId> {
        self.layers.first().map(|layer| layer.id)
    }

    /// Add a new empty layer, nested under `parent` if given.
    pub fn add_layer(&mut self, id: LayerId, parent: Option<LayerId>) -> CommandResult<LayerId> {
        let layer = match parent {
            Some(parent_id) => {
                let parent = self.get_layer(parent_id)?;
                Layer::new(id, Some(parent))
            }
            None => Layer::new(id, None),
        };

        if let Some(parent_id) = parent {
            self.get_layer_mut(parent_id)?.children.push(id);
        }
        self.push(layer);
        Ok(id)
    }

    /// All descendants of `id`, depth first, not including `id` itself
    pub fn descendants(&self, id: LayerId) -> Vec<LayerId> {
        let mut result = Vec::new();
        let mut stack: Vec<LayerId> = match self.get_layer(id) {
            Ok(layer) => layer.children.iter().rev().copied().collect(),
            Err(_) => return result,
        };

        while let Some(next) = stack.pop() {
            result.push(next);
            if let Ok(layer) = self.get_layer(next) {
                stack.extend(layer.children.iter().rev().copied());
            }
        }
        result
    }

    /// Remove a layer together with its whole subtree.
    ///
    /// Returns the ids that were removed, `id` first.
    pub fn remove_layer(&mut self, id: LayerId) -> CommandResult<Vec<LayerId>> {
        let parent = self.get_layer(id)?.parent;
        if self.layers.len() <= 1 {
            return Err(CommandError::LastLayer);
        }

        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        let doomed: HashSet<LayerId> = removed.iter().copied().collect();

        self.layers.retain(|layer| !doomed.contains(&layer.id));
        self.rebuild_index();

        if let Some(parent_id) = parent {
            if let Ok(parent) = self.get_layer_mut(parent_id) {
                parent.children.retain(|child| *child != id);
            }
        }
        Ok(removed)
    }

    pub fn update_layer_property(&mut self, id: LayerId, property: LayerProperty) -> CommandResult {
        self.get_layer_mut(id)?.set_property(property);
        Ok(())
    }

    pub fn commit_path(&mut self, id: LayerId, path: PathRef) -> CommandResult {
        if !path.is_drawable() {
            return Err(CommandError::DegeneratePath(path.points().len()));
        }
        self.get_layer_mut(id)?.paths.push(path);
        Ok(())
    }

    pub fn add_image(&mut self, id: LayerId, image: CanvasImage) -> CommandResult {
        self.get_layer_mut(id)?.images.push(image);
        Ok(())
    }

    pub fn toggle_expansion(&mut self, id: LayerId) -> CommandResult {
        let layer = self.get_layer_mut(id)?;
        layer.expanded = !layer.expanded;
        Ok(())
    }

    /// Empty every layer, keeping the tree
    pub fn clear_content(&mut self) {
        for layer in &mut self.layers {
            layer.clear_content();
        }
    }

    pub fn has_content(&self) -> bool {
        self.layers.iter().any(|layer| !layer.is_empty())
    }

    /// Walk from `id` up to its root. Bounded by the layer count so a
    /// corrupted parent chain cannot loop forever.
    fn ancestry(&self, id: LayerId) -> impl Iterator<Item = &Layer> {
        let mut next = self.get_layer(id).ok();
        let mut remaining = self.layers.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = current.parent.and_then(|p| self.get_layer(p).ok());
            Some(current)
        })
    }

    /// Own visibility AND every ancestor's. Unknown ids are not visible.
    pub fn is_effectively_visible(&self, id: LayerId) -> bool {
        self.contains(id) && self.ancestry(id).all(|layer| layer.visible)
    }

    /// Own opacity times every ancestor's. Unknown ids are fully transparent.
    pub fn effective_opacity(&self, id: LayerId) -> f32 {
        if !self.contains(id) {
            return 0.0;
        }
        self.ancestry(id).map(|layer| layer.opacity).product()
    }

    /// Effective properties of every layer, computed top-down in one pass.
    pub fn effective_properties(&self) -> HashMap<LayerId, EffectiveProperties> {
        let mut result: HashMap<LayerId, EffectiveProperties> = HashMap::with_capacity(self.layers.len());
        for layer in self.layers_by_depth() {
            let inherited = layer
                .parent
                .and_then(|p| result.get(&p).copied())
                .unwrap_or(EffectiveProperties {
                    visible: true,
                    opacity: 1.0,
                });
            result.insert(
                layer.id,
                EffectiveProperties {
                    visible: inherited.visible && layer.visible,
                    opacity: inherited.opacity * layer.opacity,
                },
            );
        }
        result
    }

    /// Layers ordered by depth; creation order is kept within a depth
    pub fn layers_by_depth(&self) -> Vec<&Layer> {
        let mut sorted: Vec<&Layer> = self.layers.iter().collect();
        sorted.sort_by_key(|layer| layer.depth);
        sorted
    }

    /// Tree order for the layer panel: each root followed by its subtree,
    /// skipping the children of collapsed layers.
    pub fn display_order(&self) -> Vec<&Layer> {
        let mut result = Vec::with_capacity(self.layers.len());
        let mut stack: Vec<&Layer> = self.layers.iter().filter(|l| l.is_root()).rev().collect();

        while let Some(layer) = stack.pop() {
            result.push(layer);
            if layer.expanded {
                stack.extend(
                    layer
                        .children
                        .iter()
                        .rev()
                        .filter_map(|child| self.get_layer(*child).ok()),
                );
            }
        }
        result
    }

    /// Check the tree invariants: parent/child links agree, depths match,
    /// ids are indexed, and at least one layer exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("document has no layers".to_string());
        }
        if self.index.len() != self.layers.len() {
            return Err(format!(
                "index holds {} ids for {} layers",
                self.index.len(),
                self.layers.len()
            ));
        }

        for layer in &self.layers {
            match layer.parent {
                Some(parent_id) => {
                    let parent = self
                        .get_layer(parent_id)
                        .map_err(|_| format!("{} has missing parent {}", layer.id, parent_id))?;
                    if !parent.children.contains(&layer.id) {
                        return Err(format!("{} is not listed as a child of {}", layer.id, parent_id));
                    }
                    if layer.depth != parent.depth + 1 {
                        return Err(format!("{} has depth {}, parent has {}", layer.id, layer.depth, parent.depth));
                    }
                }
                None if layer.depth != 0 => {
                    return Err(format!("root {} has depth {}", layer.id, layer.depth));
                }
                None => {}
            }

            for child in &layer.children {
                let child_layer = self
                    .get_layer(*child)
                    .map_err(|_| format!("{} lists missing child {}", layer.id, child))?;
                if child_layer.parent != Some(layer.id) {
                    return Err(format!("{} lists {} which has another parent", layer.id, child));
                }
            }
        }
        Ok(())
    }
}
