//! Layer panel projection.
//!
//! The panel keeps no state of its own: entries are recomputed from the
//! scene's object list (plus any imports still loading) after every change.

use crate::import::ImportQueue;
use collage_core::id::ObjectId;
use collage_core::model::{ObjectKind, Scene};
use serde::Serialize;

/// Per-entry panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerAction {
    /// Move one step toward the top.
    Forward,
    /// Move one step toward the bottom.
    Backward,
    Delete,
}

impl LayerAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" | "forward" | "layer-up" => Some(LayerAction::Forward),
            "down" | "backward" | "layer-down" => Some(LayerAction::Backward),
            "delete" | "remove" | "layer-delete" => Some(LayerAction::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Image,
    Text,
}

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
    pub id: ObjectId,
    /// Position in the scene's object list (0 = bottom).
    pub index: usize,
    pub label: String,
    pub kind: LayerKind,
    pub selected: bool,
    /// Reserved by an import whose file read has not finished.
    pub loading: bool,
}

/// Entries in scene order (bottom first), followed by pending imports.
pub fn layer_entries(
    scene: &Scene,
    pending: &ImportQueue,
    selected: Option<ObjectId>,
) -> Vec<LayerEntry> {
    let mut entries: Vec<LayerEntry> = scene
        .objects
        .iter()
        .enumerate()
        .map(|(index, obj)| {
            let (kind, noun) = match obj.kind {
                ObjectKind::Image(_) => (LayerKind::Image, "Image"),
                ObjectKind::Text(_) => (LayerKind::Text, "Text"),
            };
            LayerEntry {
                id: obj.id,
                index,
                label: format!("{noun} {}", index + 1),
                kind,
                selected: selected == Some(obj.id),
                loading: false,
            }
        })
        .collect();

    let base = entries.len();
    entries.extend(pending.pending_ids().enumerate().map(|(n, id)| LayerEntry {
        id,
        index: base + n,
        label: format!("Image {} (loading)", base + n + 1),
        kind: LayerKind::Image,
        selected: false,
        loading: true,
    }));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_core::model::{Color, SceneObject, TextItem};
    use collage_core::source::ImageSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_follow_scene_order() {
        let mut scene = Scene::default();
        scene.add(SceneObject::image(
            ObjectId::intern("layers_img"),
            ImageSource::new("image/png", vec![0u8], 4, 4),
        ));
        scene.add(SceneObject::text(
            ObjectId::intern("layers_txt"),
            TextItem {
                content: "Hi".into(),
                font_family: "Arial".into(),
                font_size: 40.0,
                fill: Color::BLACK,
            },
        ));

        let selected = Some(ObjectId::intern("layers_txt"));
        let entries = layer_entries(&scene, &ImportQueue::new(), selected);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Image 1", "Text 2"]);
        assert!(!entries[0].selected);
        assert!(entries[1].selected);
    }

    #[test]
    fn action_names() {
        assert_eq!(LayerAction::from_name("layer-up"), Some(LayerAction::Forward));
        assert_eq!(LayerAction::from_name("down"), Some(LayerAction::Backward));
        assert_eq!(LayerAction::from_name("delete"), Some(LayerAction::Delete));
        assert_eq!(LayerAction::from_name("spin"), None);
    }
}
