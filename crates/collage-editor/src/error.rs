use crate::store::StoreError;
use collage_core::SnapshotError;
use collage_core::id::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("cannot decode {mime} image: {source}")]
    Decode {
        mime: String,
        #[source]
        source: image::ImageError,
    },
    #[error("no object {0}")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
