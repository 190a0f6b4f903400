//! Immutable scene snapshots.
//!
//! A snapshot is a value copy of the whole scene. Image bytes are shared,
//! so capturing one is cheap. The persisted form is deterministic JSON;
//! a content key derived from the MessagePack encoding identifies equal
//! scenes, and `diff` reports what changed between two snapshots.

use crate::error::SnapshotError;
use crate::id::ObjectId;
use crate::model::{Color, Scene};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    scene: Arc<Scene>,
}

/// Content key of a snapshot. Equal scenes produce equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotKey(pub u64);

/// One structural difference between two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneChange {
    Resized { from: (f32, f32), to: (f32, f32) },
    Background { from: Color, to: Color },
    Added { id: ObjectId, index: usize },
    Removed { id: ObjectId },
    /// Relative stacking position changed.
    Reordered { id: ObjectId, from: usize, to: usize },
    /// Position, scale, filters or content changed.
    Modified { id: ObjectId },
}

pub type SceneChanges = SmallVec<[SceneChange; 4]>;

impl Snapshot {
    pub fn capture(scene: &Scene) -> Self {
        Self {
            scene: Arc::new(scene.clone()),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn to_scene(&self) -> Scene {
        (*self.scene).clone()
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&*self.scene)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let scene: Scene = serde_json::from_str(text)?;
        Ok(Self {
            scene: Arc::new(scene),
        })
    }

    pub fn key(&self) -> Result<SnapshotKey, SnapshotError> {
        let bytes = rmp_serde::to_vec_named(&*self.scene)?;
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Ok(SnapshotKey(hasher.finish()))
    }

    /// Structural changes that turn `self` into `next`.
    pub fn diff(&self, next: &Snapshot) -> SceneChanges {
        diff_scenes(&self.scene, &next.scene)
    }
}

pub fn diff_scenes(before: &Scene, after: &Scene) -> SceneChanges {
    let mut changes = SceneChanges::new();

    if (before.width, before.height) != (after.width, after.height) {
        changes.push(SceneChange::Resized {
            from: (before.width, before.height),
            to: (after.width, after.height),
        });
    }
    if before.background != after.background {
        changes.push(SceneChange::Background {
            from: before.background,
            to: after.background,
        });
    }

    let before_ids: HashSet<ObjectId> = before.ids().copied().collect();
    let after_ids: HashSet<ObjectId> = after.ids().copied().collect();

    for obj in &before.objects {
        if !after_ids.contains(&obj.id) {
            changes.push(SceneChange::Removed { id: obj.id });
        }
    }
    for (index, obj) in after.objects.iter().enumerate() {
        if !before_ids.contains(&obj.id) {
            changes.push(SceneChange::Added { id: obj.id, index });
        }
    }

    // Compare order among objects present on both sides, so an add or
    // remove below an object does not count as a reorder.
    let kept_before: Vec<_> = before
        .objects
        .iter()
        .filter(|o| after_ids.contains(&o.id))
        .collect();
    let kept_after: Vec<_> = after
        .objects
        .iter()
        .filter(|o| before_ids.contains(&o.id))
        .collect();

    for (to, obj) in kept_after.iter().enumerate() {
        let Some(from) = kept_before.iter().position(|o| o.id == obj.id) else {
            continue;
        };
        if from != to {
            changes.push(SceneChange::Reordered { id: obj.id, from, to });
        }
        if kept_before[from] != *obj {
            changes.push(SceneChange::Modified { id: obj.id });
        }
    }

    changes
}
