use crate::document::Document;

use super::{Command, CommandResult};

/// One entry on the history stack
#[derive(Debug, Clone)]
struct Snapshot {
    document: Document,
    label: &'static str,
}

/// Linear undo/redo over full document snapshots.
///
/// `index` points at the snapshot that matches the live document. Committing
/// after an undo drops everything past `index`; there is no branching.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    snapshots: Vec<Snapshot>,
    index: usize,
}

impl CommandHistory {
    /// Start a history whose first entry is `initial`
    pub fn new(initial: Document) -> Self {
        Self {
            snapshots: vec![Snapshot {
                document: initial,
                label: "Initial",
            }],
            index: 0,
        }
    }

    /// Apply `command` to `document` and record the result.
    ///
    /// On error neither the document nor the history changes.
    pub fn execute(&mut self, command: &Command, document: &mut Document) -> CommandResult {
        let next = command.apply(document)?;
        self.commit(next.clone(), command.label());
        *document = next;
        Ok(())
    }

    /// Push a snapshot, discarding any redo entries
    pub fn commit(&mut self, document: Document, label: &'static str) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(Snapshot { document, label });
        self.index = self.snapshots.len() - 1;
        log::debug!("history: committed '{}' at {}", label, self.index);
    }

    /// Step back one entry and return the document to restore
    pub fn undo(&mut self) -> Option<&Document> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index].document)
    }

    /// Step forward one entry and return the document to restore
    pub fn redo(&mut self) -> Option<&Document> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index].document)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Position of the live document in the stack
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at the current position
    pub fn current(&self) -> &Document {
        &self.snapshots[self.index].document
    }

    /// Label of the edit an undo would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.can_undo().then(|| self.snapshots[self.index].label)
    }

    /// Label of the edit a redo would reapply
    pub fn redo_label(&self) -> Option<&'static str> {
        self.can_redo().then(|| self.snapshots[self.index + 1].label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerId, LayerProperty};

    fn rename(id: usize, name: &str) -> Command {
        Command::UpdateLayerProperty {
            id: LayerId(id),
            property: LayerProperty::Name(name.to_string()),
        }
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut doc = Document::new(LayerId(1));
        let mut history = CommandHistory::new(doc.clone());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.execute(&rename(1, "a"), &mut doc).unwrap();
        assert_eq!(history.index(), 1);
        assert!(history.redo().is_none());
        assert_eq!(history.undo().unwrap().get_layer(LayerId(1)).unwrap().name, "Layer 1");
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_commit_after_undo_drops_redo() {
        let mut doc = Document::new(LayerId(1));
        let mut history = CommandHistory::new(doc.clone());
        history.execute(&rename(1, "a"), &mut doc).unwrap();
        history.execute(&rename(1, "b"), &mut doc).unwrap();

        doc = history.undo().unwrap().clone();
        history.execute(&rename(1, "c"), &mut doc).unwrap();

        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().get_layer(LayerId(1)).unwrap().name, "c");
    }

    #[test]
    fn test_failed_command_is_not_recorded() {
        let mut doc = Document::new(LayerId(1));
        let mut history = CommandHistory::new(doc.clone());
        assert!(history.execute(&rename(9, "x"), &mut doc).is_err());
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut doc = Document::new(LayerId(1));
        let mut history = CommandHistory::new(doc.clone());
        history.execute(&rename(1, "a"), &mut doc).unwrap();

        // Editing the live document must not reach into the history
        doc.update_layer_property(LayerId(1), LayerProperty::Name("live".into())).unwrap();
        assert_eq!(history.current().get_layer(LayerId(1)).unwrap().name, "a");
        assert_eq!(history.undo_label(), Some("Edit Layer"));
    }
}
