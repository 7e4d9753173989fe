use crate::document::Document;
use crate::image::CanvasImage;
use crate::layer::{LayerId, LayerProperty};
use crate::path::PathRef;

use super::CommandResult;

/// Content edits that go through the undo history.
///
/// Applying a command never touches the input document: it works on a clone
/// and hands that back, so snapshots already in the history stay as they were.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add an empty layer, nested under `parent` if given
    AddLayer {
        id: LayerId,
        parent: Option<LayerId>,
    },

    /// Delete a layer and all of its descendants
    DeleteLayer { id: LayerId },

    /// Replace one attribute of a layer
    UpdateLayerProperty {
        id: LayerId,
        property: LayerProperty,
    },

    /// Append a finished path to a layer
    CommitPath { layer_id: LayerId, path: PathRef },

    /// Append an image to a layer
    AddImage {
        layer_id: LayerId,
        image: CanvasImage,
    },

    /// Remove every path and image, keeping the layers
    ClearCanvas,
}

impl Command {
    /// Apply the command to a copy of `document`
    pub fn apply(&self, document: &Document) -> CommandResult<Document> {
        let mut next = document.clone();
        match self {
            Command::AddLayer { id, parent } => {
                next.add_layer(*id, *parent)?;
            }
            Command::DeleteLayer { id } => {
                next.remove_layer(*id)?;
            }
            Command::UpdateLayerProperty { id, property } => {
                next.update_layer_property(*id, property.clone())?;
            }
            Command::CommitPath { layer_id, path } => {
                next.commit_path(*layer_id, path.clone())?;
            }
            Command::AddImage { layer_id, image } => {
                next.add_image(*layer_id, image.clone())?;
            }
            Command::ClearCanvas => next.clear_content(),
        }
        Ok(next)
    }

    /// Short label for history listings
    pub fn label(&self) -> &'static str {
        match self {
            Command::AddLayer { .. } => "Add Layer",
            Command::DeleteLayer { .. } => "Delete Layer",
            Command::UpdateLayerProperty { .. } => "Edit Layer",
            Command::CommitPath { .. } => "Draw Path",
            Command::AddImage { .. } => "Add Image",
            Command::ClearCanvas => "Clear Canvas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandError;
    use crate::path::{Path, StrokeStyle};
    use egui::pos2;

    #[test]
    fn test_apply_leaves_input_untouched() {
        let doc = Document::new(LayerId(1));
        let path = Path::new_ref(vec![pos2(0.0, 0.0), pos2(5.0, 5.0)], StrokeStyle::default());
        let cmd = Command::CommitPath {
            layer_id: LayerId(1),
            path,
        };

        let next = cmd.apply(&doc).unwrap();
        assert_eq!(next.get_layer(LayerId(1)).unwrap().paths.len(), 1);
        assert!(doc.get_layer(LayerId(1)).unwrap().paths.is_empty());
    }

    #[test]
    fn test_apply_unknown_layer_errors() {
        let doc = Document::new(LayerId(1));
        let cmd = Command::UpdateLayerProperty {
            id: LayerId(42),
            property: LayerProperty::Visible(false),
        };
        assert_eq!(cmd.apply(&doc), Err(CommandError::LayerNotFound(LayerId(42))));
    }

    #[test]
    fn test_clear_canvas_keeps_layers() {
        let mut doc = Document::new(LayerId(1));
        doc.add_layer(LayerId(2), Some(LayerId(1))).unwrap();
        let path = Path::new_ref(vec![pos2(0.0, 0.0), pos2(1.0, 1.0)], StrokeStyle::default());
        doc.commit_path(LayerId(2), path).unwrap();

        let cleared = Command::ClearCanvas.apply(&doc).unwrap();
        assert_eq!(cleared.len(), 2);
        assert!(!cleared.has_content());
        assert!(doc.has_content());
    }
}
