//! The editor: scene + history + persistence behind one dispatch point.
//!
//! Every command runs to completion synchronously. A command that changes
//! the scene ends with exactly one `record_snapshot`, which appends to the
//! history and overwrites the persisted slot.

use crate::commands::{Command, Outcome};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::history::History;
use crate::import::{self, ImportOutcome, ImportQueue, LoadToken, Placement};
use crate::layers::{LayerAction, LayerEntry, layer_entries};
use crate::store::{MemoryStore, SnapshotStore};
use collage_core::filter::FilterWidgets;
use collage_core::id::{IdAllocator, ObjectId};
use collage_core::model::{Scene, SceneObject, TextItem};
use collage_core::sizing::{self, Template};
use collage_core::snapshot::{Snapshot, diff_scenes};
use collage_render::hit::hit_test;

pub struct Editor<S: SnapshotStore = MemoryStore> {
    scene: Scene,
    history: History,
    store: S,
    config: EditorConfig,
    selection: Option<ObjectId>,
    imports: ImportQueue,
    ids: IdAllocator,
}

impl<S: SnapshotStore> Editor<S> {
    /// Open an editor on `store`.
    ///
    /// If the store holds a snapshot, the scene is restored from it and the
    /// history seeded with that single entry. Otherwise a fresh canvas is
    /// created and recorded (and persisted) as the first entry.
    pub fn open(store: S, config: EditorConfig) -> Result<Self, EditorError> {
        let saved = store.load(&config.storage_key)?;
        match saved {
            Some(text) => {
                let snapshot = Snapshot::from_json(&text)?;
                log::debug!(
                    "restored {} object(s) from {:?}",
                    snapshot.scene().len(),
                    config.storage_key
                );
                let scene = snapshot.to_scene();
                let mut editor = Self::with_scene(store, config, scene);
                editor.history.seed(snapshot);
                Ok(editor)
            }
            None => Self::fresh(store, config),
        }
    }

    /// Start from an empty canvas, ignoring anything in the store.
    pub fn fresh(store: S, config: EditorConfig) -> Result<Self, EditorError> {
        let size = config.custom_default;
        let mut editor = Self::with_scene(store, config, Scene::new(size.width, size.height));
        editor.record_snapshot()?;
        Ok(editor)
    }

    /// Start from an empty canvas without touching the store. The slot is
    /// left as it is until the first recorded change overwrites it.
    pub fn recover(store: S, config: EditorConfig) -> Self {
        let size = config.custom_default;
        let mut editor = Self::with_scene(store, config, Scene::new(size.width, size.height));
        editor.history.seed(Snapshot::capture(&editor.scene));
        editor
    }

    fn with_scene(store: S, config: EditorConfig, scene: Scene) -> Self {
        let ids = IdAllocator::after(scene.ids());
        Self {
            history: History::new(config.history_limit),
            scene,
            store,
            config,
            selection: None,
            imports: ImportQueue::new(),
            ids,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Current layer panel rows.
    pub fn layers(&self) -> Vec<LayerEntry> {
        layer_entries(&self.scene, &self.imports, self.selection)
    }

    /// Filter widget values for the selected image (defaults otherwise).
    pub fn filter_widgets(&self) -> FilterWidgets {
        self.selection
            .and_then(|id| self.scene.get(id))
            .and_then(SceneObject::filters)
            .map(|f| f.widgets())
            .unwrap_or_default()
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, EditorError> {
        log::debug!("dispatch: {}", command.description());
        let changed = match command {
            Command::ApplyTemplate {
                template,
                container,
            } => {
                if template == Template::Custom {
                    // Reveals the custom inputs; sizing waits for "apply".
                    false
                } else {
                    let bounds = container.inset(self.config.container_padding);
                    let size = sizing::template_size(template, bounds, self.config.custom_default);
                    if size.is_usable() {
                        self.scene.set_size(size.width, size.height)
                    } else {
                        log::warn!("ignoring unusable canvas size {size:?}");
                        false
                    }
                }
            }
            Command::ApplyCustomSize { width, height } => match sizing::custom_size(width, height) {
                Some(size) => self.scene.set_size(size.width, size.height),
                None => false,
            },
            Command::SetBackground(color) => {
                let changed = self.scene.background != color;
                self.scene.background = color;
                changed
            }
            Command::AddText {
                content,
                font_family,
                color,
            } => {
                let id = self.ids.next_id("text");
                let content = if content.is_empty() {
                    self.config.default_text.clone()
                } else {
                    content
                };
                let mut obj = SceneObject::text(
                    id,
                    TextItem {
                        content,
                        font_family,
                        font_size: self.config.font_size,
                        fill: color,
                    },
                );
                (obj.left, obj.top) = self.config.text_origin;
                self.scene.add(obj);
                true
            }
            Command::Select(id) => return Ok(self.select(id)),
            Command::SelectAt { x, y } => return Ok(self.select(hit_test(&self.scene, x, y))),
            Command::MoveObject { id, left, top } => {
                if !(left.is_finite() && top.is_finite()) {
                    log::warn!("ignoring move of {id} to ({left}, {top})");
                    return Ok(Outcome::Unchanged);
                }
                let obj = self.object_mut(id)?;
                let changed = (obj.left, obj.top) != (left, top);
                obj.left = left;
                obj.top = top;
                changed
            }
            Command::ScaleObject {
                id,
                scale_x,
                scale_y,
            } => {
                if !(scale_x.is_finite() && scale_y.is_finite()) {
                    log::warn!("ignoring scale of {id} to ({scale_x}, {scale_y})");
                    return Ok(Outcome::Unchanged);
                }
                let obj = self.object_mut(id)?;
                let changed = (obj.scale_x, obj.scale_y) != (scale_x, scale_y);
                obj.scale_x = scale_x;
                obj.scale_y = scale_y;
                changed
            }
            Command::RemoveObject(id) | Command::Layer {
                id,
                action: LayerAction::Delete,
            } => {
                if self.imports.cancel(id) {
                    log::debug!("cancelled pending import {id}");
                    return Ok(Outcome::ImportCancelled);
                }
                let removed = self.scene.remove(id).is_some();
                if removed && self.selection == Some(id) {
                    self.selection = None;
                }
                removed
            }
            Command::Layer {
                id,
                action: LayerAction::Forward,
            } => self.scene.bring_forward(id),
            Command::Layer {
                id,
                action: LayerAction::Backward,
            } => self.scene.send_backward(id),
            Command::SetFilter { slot, input } => self
                .selected_filters()
                .is_some_and(|filters| filters.apply(slot, input)),
            Command::ResetFilters => self
                .selected_filters()
                .is_some_and(|filters| filters.reset()),
            Command::Undo => return Ok(self.undo()),
            Command::Redo => return Ok(self.redo()),
        };

        if !changed {
            return Ok(Outcome::Unchanged);
        }
        self.record_snapshot()?;
        Ok(Outcome::Recorded)
    }

    /// Capture the scene, append it to history and overwrite the
    /// persisted slot.
    pub fn record_snapshot(&mut self) -> Result<(), EditorError> {
        let snapshot = Snapshot::capture(&self.scene);
        let text = snapshot.to_json()?;
        self.history.record(snapshot);
        log::debug!(
            "recorded snapshot {}/{}",
            self.history.index().map_or(0, |i| i + 1),
            self.history.len()
        );
        self.store.save(&self.config.storage_key, &text)?;
        Ok(())
    }

    fn undo(&mut self) -> Outcome {
        let Some(snapshot) = self.history.undo() else {
            return Outcome::Unchanged;
        };
        let next = snapshot.to_scene();
        self.restore(next, "undo")
    }

    fn redo(&mut self) -> Outcome {
        let Some(snapshot) = self.history.redo() else {
            return Outcome::Unchanged;
        };
        let next = snapshot.to_scene();
        self.restore(next, "redo")
    }

    fn restore(&mut self, next: Scene, label: &str) -> Outcome {
        let changes = diff_scenes(&self.scene, &next);
        log::debug!("{label}: {} change(s) {changes:?}", changes.len());
        self.scene = next;
        self.after_restore();
        Outcome::Restored
    }

    fn after_restore(&mut self) {
        if let Some(id) = self.selection
            && self.scene.get(id).is_none()
        {
            self.selection = None;
        }
    }

    fn select(&mut self, id: Option<ObjectId>) -> Outcome {
        let id = id.filter(|id| self.scene.get(*id).is_some());
        if id == self.selection {
            return Outcome::Unchanged;
        }
        self.selection = id;
        Outcome::SelectionChanged
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, EditorError> {
        self.scene.get_mut(id).ok_or(EditorError::UnknownObject(id))
    }

    fn selected_filters(&mut self) -> Option<&mut collage_core::filter::FilterStack> {
        let id = self.selection?;
        self.scene.get_mut(id)?.filters_mut()
    }

    // ─── Import ──────────────────────────────────────────────────────────

    /// Start an import for a file of type `mime`. Returns `None` for
    /// non-image files.
    pub fn begin_import(&mut self, mime: &str, placement: Placement) -> Option<LoadToken> {
        if !import::accepts_mime(mime, placement) {
            log::warn!("ignoring file of type {mime:?}");
            return None;
        }
        let placement = match placement {
            Placement::Centered { x, y } if !(x.is_finite() && y.is_finite()) => {
                Placement::Origin
            }
            other => other,
        };
        let id = self.ids.next_id("image");
        Some(self.imports.begin(id, mime, placement))
    }

    /// Finish an import once the host has read the file.
    ///
    /// A cancelled token yields `ImportOutcome::Cancelled` without decoding.
    /// On success the image is scaled to the configured fraction of the
    /// canvas width, added on top, and a snapshot is recorded.
    pub fn complete_import(
        &mut self,
        token: LoadToken,
        bytes: Vec<u8>,
    ) -> Result<ImportOutcome, EditorError> {
        let Some(pending) = self.imports.take(token) else {
            log::debug!("dropping stale import {}", token.id());
            return Ok(ImportOutcome::Cancelled);
        };
        let source = import::decode_source(&pending.mime, bytes)?;
        let target_width = self.scene.width * self.config.import_width_fraction;
        let obj = import::place_image(token.id(), source, pending.placement, target_width);
        self.scene.add(obj);
        self.record_snapshot()?;
        Ok(ImportOutcome::Added(token.id()))
    }

    /// Abandon a pending import. Returns `false` if it was not pending.
    pub fn cancel_import(&mut self, token: LoadToken) -> bool {
        self.imports.cancel(token.id())
    }

    pub fn pending_imports(&self) -> usize {
        self.imports.len()
    }
}
