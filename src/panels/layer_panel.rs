use eframe::egui;
use futures::channel::mpsc;

use crate::image_cache::encode_data_uri;
use crate::layer::{LayerId, LayerProperty};
use crate::state::CanvasState;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// In-progress edit of a layer's name and description
#[derive(Debug, Clone)]
struct LayerEdit {
    id: LayerId,
    name: String,
    description: String,
}

/// A file chosen in the upload dialog
#[derive(Debug)]
struct PickedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Snapshot of a layer row, taken before drawing so the panel can mutate the
/// canvas afterwards
struct Row {
    id: LayerId,
    name: String,
    description: Option<String>,
    depth: usize,
    has_children: bool,
    expanded: bool,
    visible: bool,
    opacity: f32,
    paths: usize,
    images: usize,
}

enum LayerAction {
    Select(LayerId),
    ToggleExpansion(LayerId),
    AddChild(LayerId),
    SetVisible(LayerId, bool),
    SetOpacity(LayerId, f32),
    Delete(LayerId),
    StartEdit(LayerId),
    SaveEdit,
    CancelEdit,
    AddRoot,
    Upload,
}

/// Side panel listing the layer tree
#[derive(Debug)]
pub struct LayerPanel {
    editing: Option<LayerEdit>,
    /// Opacity slider value while its handle is held
    opacity_drag: Option<(LayerId, f32)>,
    uploads_tx: mpsc::UnboundedSender<PickedFile>,
    uploads_rx: mpsc::UnboundedReceiver<PickedFile>,
}

impl Default for LayerPanel {
    fn default() -> Self {
        let (uploads_tx, uploads_rx) = mpsc::unbounded();
        Self {
            editing: None,
            opacity_drag: None,
            uploads_tx,
            uploads_rx,
        }
    }
}

impl LayerPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, state: &mut CanvasState, ctx: &egui::Context) {
        self.receive_uploads(state);

        let rows: Vec<Row> = state
            .document()
            .display_order()
            .into_iter()
            .map(|layer| Row {
                id: layer.id,
                name: layer.name.clone(),
                description: layer.description.clone(),
                depth: layer.depth,
                has_children: !layer.children.is_empty(),
                expanded: layer.expanded,
                visible: layer.visible,
                opacity: layer.opacity,
                paths: layer.paths.len(),
                images: layer.images.len(),
            })
            .collect();
        let current = state.current_layer_id();
        let single_layer = state.document().len() <= 1;

        let mut actions = Vec::new();
        egui::SidePanel::right("layer_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Layers");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("➕").on_hover_text("Add layer").clicked() {
                            actions.push(LayerAction::AddRoot);
                        }
                        if ui.button("📂").on_hover_text("Upload image").clicked() {
                            actions.push(LayerAction::Upload);
                        }
                    });
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for row in &rows {
                        self.show_row(ui, row, row.id == current, single_layer, &mut actions);
                    }
                });

                ui.separator();
                ui.weak("Upload or drop image files to add them to the selected layer.");
            });

        for action in actions {
            self.apply(action, state, ctx);
        }
    }

    fn show_row(&mut self, ui: &mut egui::Ui, row: &Row, selected: bool, single_layer: bool, actions: &mut Vec<LayerAction>) {
        ui.horizontal(|ui| {
            ui.add_space(row.depth as f32 * 16.0);

            if row.has_children {
                let arrow = if row.expanded { "⏷" } else { "⏵" };
                if ui.small_button(arrow).clicked() {
                    actions.push(LayerAction::ToggleExpansion(row.id));
                }
            } else {
                ui.add_space(18.0);
            }

            let eye = if row.visible { "👁" } else { "—" };
            if ui.small_button(eye).on_hover_text("Toggle visibility").clicked() {
                actions.push(LayerAction::SetVisible(row.id, !row.visible));
            }

            let label = ui.selectable_label(selected, &row.name);
            let label = match &row.description {
                Some(description) => label.on_hover_text(description),
                None => label,
            };
            if label.clicked() {
                actions.push(LayerAction::Select(row.id));
            }

            ui.weak(format!("{}✏ {}🖼", row.paths, row.images));

            let mut opacity = match self.opacity_drag {
                Some((id, value)) if id == row.id => value,
                _ => row.opacity,
            };
            let slider = ui
                .add_sized(
                    [64.0, 16.0],
                    egui::Slider::new(&mut opacity, 0.0..=1.0).show_value(false),
                )
                .on_hover_text(format!("Opacity {:.0}%", opacity * 100.0));
            // One history entry per release
            if slider.dragged() {
                self.opacity_drag = Some((row.id, opacity));
            }
            if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
                self.opacity_drag = None;
                actions.push(LayerAction::SetOpacity(row.id, opacity));
            }

            if ui.small_button("＋").on_hover_text("Add child layer").clicked() {
                actions.push(LayerAction::AddChild(row.id));
            }
            if ui.small_button("✏").on_hover_text("Edit").clicked() {
                actions.push(LayerAction::StartEdit(row.id));
            }
            if ui
                .add_enabled(!single_layer, egui::Button::new("🗑").small())
                .on_hover_text("Delete layer")
                .clicked()
            {
                actions.push(LayerAction::Delete(row.id));
            }
        });

        if let Some(edit) = self.editing.as_mut().filter(|edit| edit.id == row.id) {
            ui.indent(("layer_edit", row.id.index()), |ui| {
                ui.text_edit_singleline(&mut edit.name);
                ui.add(egui::TextEdit::multiline(&mut edit.description).desired_rows(2).hint_text("Description"));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        actions.push(LayerAction::SaveEdit);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(LayerAction::CancelEdit);
                    }
                });
            });
        }
    }

    fn apply(&mut self, action: LayerAction, state: &mut CanvasState, ctx: &egui::Context) {
        match action {
            LayerAction::Select(id) => state.set_current_layer(id),
            LayerAction::ToggleExpansion(id) => state.toggle_expansion(id),
            LayerAction::AddChild(id) => {
                state.add_layer(Some(id));
            }
            LayerAction::AddRoot => {
                state.add_layer(None);
            }
            LayerAction::SetVisible(id, visible) => {
                state.update_layer_property(id, LayerProperty::Visible(visible));
            }
            LayerAction::SetOpacity(id, opacity) => {
                let unchanged = state
                    .document()
                    .get_layer(id)
                    .is_ok_and(|layer| (layer.opacity - opacity).abs() <= f32::EPSILON);
                if !unchanged {
                    state.update_layer_property(id, LayerProperty::Opacity(opacity));
                }
            }
            LayerAction::Upload => self.pick_images(ctx),
            LayerAction::Delete(id) => {
                state.delete_layer(id);
            }
            LayerAction::StartEdit(id) => {
                self.editing = state.document().get_layer(id).ok().map(|layer| LayerEdit {
                    id,
                    name: layer.name.clone(),
                    description: layer.description.clone().unwrap_or_default(),
                });
            }
            LayerAction::SaveEdit => {
                if let Some(edit) = self.editing.take() {
                    save_edit(edit, state);
                }
            }
            LayerAction::CancelEdit => self.editing = None,
        }
    }

    /// Open the upload dialog. Chosen files arrive through the upload channel
    /// and are added on a later frame.
    #[cfg(not(target_arch = "wasm32"))]
    fn pick_images(&self, _ctx: &egui::Context) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
        else {
            return;
        };

        for path in paths {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if self.uploads_tx.unbounded_send(PickedFile { name, bytes }).is_err() {
                        return;
                    }
                }
                Err(err) => log::error!("Failed to read {}: {}", path.display(), err),
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn pick_images(&self, ctx: &egui::Context) {
        let sender = self.uploads_tx.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(files) = rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_files()
                .await
            else {
                return;
            };

            for file in files {
                let picked = PickedFile {
                    name: file.file_name(),
                    bytes: file.read().await,
                };
                if sender.unbounded_send(picked).is_err() {
                    return;
                }
            }
            ctx.request_repaint();
        });
    }

    /// Add uploaded image files to the current layer.
    ///
    /// Returns how many images were added.
    fn receive_uploads(&mut self, state: &mut CanvasState) -> usize {
        let mut added = 0;
        while let Ok(Some(file)) = self.uploads_rx.try_next() {
            let Some(mime) = file_name_extension(&file.name).and_then(|ext| mime_for_extension(&ext)) else {
                log::warn!("Uploaded file is not a supported type: {}", file.name);
                continue;
            };
            if state.add_image_to_current_layer(encode_data_uri(mime, &file.bytes)) {
                added += 1;
            }
        }
        added
    }

    /// Add every dropped image file to the current layer.
    ///
    /// Returns how many images were added.
    pub fn ingest_dropped_files(&mut self, ctx: &egui::Context, state: &mut CanvasState) -> usize {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut added = 0;
        for file in &dropped {
            match dropped_image_source(file) {
                Some(src) => {
                    if state.add_image_to_current_layer(src) {
                        added += 1;
                    }
                }
                None => log::warn!("Dropped file is not a supported type: {}", file.name),
            }
        }
        added
    }
}

/// Commit only the fields that changed
fn save_edit(edit: LayerEdit, state: &mut CanvasState) {
    let Ok(layer) = state.document().get_layer(edit.id) else {
        return;
    };
    let description = Some(edit.description.trim().to_owned()).filter(|d| !d.is_empty());

    let mut changes = Vec::new();
    if layer.name != edit.name && !edit.name.trim().is_empty() {
        changes.push(LayerProperty::Name(edit.name.trim().to_owned()));
    }
    if layer.description != description {
        changes.push(LayerProperty::Description(description));
    }

    for change in changes {
        state.update_layer_property(edit.id, change);
    }
}

/// Image source for a dropped file: a base64 data URI when the bytes are at
/// hand (web), otherwise the file path (native). `None` for non-images.
pub fn dropped_image_source(file: &egui::DroppedFile) -> Option<String> {
    let mime = image_mime(file)?;
    if let Some(bytes) = &file.bytes {
        return Some(encode_data_uri(&mime, bytes));
    }
    file.path.as_ref().map(|path| path.display().to_string())
}

/// MIME type from the reported type or, failing that, the file extension
fn image_mime(file: &egui::DroppedFile) -> Option<String> {
    if file.mime.starts_with("image/") {
        return Some(file.mime.clone());
    }

    let extension = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .or_else(|| file_name_extension(&file.name))?;

    mime_for_extension(&extension).map(str::to_owned)
}

fn file_name_extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
