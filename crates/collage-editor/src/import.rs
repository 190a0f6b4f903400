//! Image import: file picker and drag-and-drop.
//!
//! File reads finish asynchronously on the host, so an import is two
//! calls. `begin` reserves an object ID and hands back a `LoadToken`;
//! `take` redeems the token when the bytes arrive. Deleting the reserved
//! object while the read is in flight cancels the token, and a late
//! completion is then dropped instead of resurrecting the object.

use crate::error::EditorError;
use collage_core::id::ObjectId;
use collage_core::model::SceneObject;
use collage_core::source::ImageSource;

/// Where a newly imported image goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// File picker: top-left corner.
    Origin,
    /// Drag-and-drop: center the scaled image on the drop point.
    Centered { x: f32, y: f32 },
}

/// Claim on a pending import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(ObjectId);

impl LoadToken {
    /// Rebuild a token from the reserved ID (e.g. one round-tripped
    /// through JavaScript as a string).
    pub fn from_id(id: ObjectId) -> Self {
        LoadToken(id)
    }

    /// The object ID reserved for the import.
    pub fn id(self) -> ObjectId {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingImport {
    pub mime: String,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Added(ObjectId),
    /// The token was cancelled (or already redeemed); nothing was added.
    Cancelled,
}

/// Imports whose bytes have not arrived yet, in request order.
#[derive(Debug, Default, Clone)]
pub struct ImportQueue {
    pending: Vec<(ObjectId, PendingImport)>,
}

impl ImportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, id: ObjectId, mime: &str, placement: Placement) -> LoadToken {
        self.pending.push((
            id,
            PendingImport {
                mime: mime.to_string(),
                placement,
            },
        ));
        LoadToken(id)
    }

    /// Redeem a token. `None` if it was cancelled or already used.
    pub fn take(&mut self, token: LoadToken) -> Option<PendingImport> {
        let pos = self.pending.iter().position(|(id, _)| *id == token.0)?;
        Some(self.pending.remove(pos).1)
    }

    /// Invalidate the import reserved under `id`.
    pub fn cancel(&mut self, id: ObjectId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: ObjectId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == id)
    }

    pub fn pending_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.pending.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Only `image/*` files are accepted. The picker may also hand over an
/// empty type, which is sniffed from the bytes later; drops may not.
pub fn accepts_mime(mime: &str, placement: Placement) -> bool {
    mime.starts_with("image/") || (mime.is_empty() && placement == Placement::Origin)
}

/// Decode enough of the file to know its size and format.
pub fn decode_source(mime: &str, bytes: Vec<u8>) -> Result<ImageSource, EditorError> {
    let image = image::load_from_memory(&bytes).map_err(|source| EditorError::Decode {
        mime: mime.to_string(),
        source,
    })?;
    let mime = if mime.starts_with("image/") {
        mime.to_string()
    } else {
        image::guess_format(&bytes)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string())
    };
    Ok(ImageSource::new(mime, bytes, image.width(), image.height()))
}

/// Build the scene object for a finished import: scaled to
/// `target_width`, then placed.
pub fn place_image(
    id: ObjectId,
    source: ImageSource,
    placement: Placement,
    target_width: f32,
) -> SceneObject {
    let mut obj = SceneObject::image(id, source);
    obj.scale_to_width(target_width);
    if let Placement::Centered { x, y } = placement {
        obj.center_on(x, y);
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_token_cannot_be_redeemed() {
        let mut queue = ImportQueue::new();
        let id = ObjectId::intern("import_q_1");
        let token = queue.begin(id, "image/png", Placement::Origin);
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(queue.take(token).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn token_redeems_once() {
        let mut queue = ImportQueue::new();
        let token = queue.begin(ObjectId::intern("import_q_2"), "image/jpeg", Placement::Origin);
        assert_eq!(queue.take(token).map(|p| p.mime), Some("image/jpeg".to_string()));
        assert!(queue.take(token).is_none());
    }

    #[test]
    fn drop_filter_accepts_images_only() {
        let drop = Placement::Centered { x: 0.0, y: 0.0 };
        assert!(accepts_mime("image/webp", drop));
        assert!(!accepts_mime("", drop));
        assert!(!accepts_mime("text/plain", drop));
    }

    #[test]
    fn picker_allows_blank_type() {
        assert!(accepts_mime("", Placement::Origin));
        assert!(accepts_mime("image/png", Placement::Origin));
        assert!(!accepts_mime("application/pdf", Placement::Origin));
    }

    #[test]
    fn centered_placement_uses_scaled_size() {
        let source = ImageSource::new("image/png", vec![0u8], 400, 200);
        let obj = place_image(
            ObjectId::intern("import_place"),
            source,
            Placement::Centered { x: 300.0, y: 200.0 },
            100.0,
        );
        assert_eq!(obj.scaled_size(), (100.0, 50.0));
        assert_eq!((obj.left, obj.top), (250.0, 175.0));
    }
}
