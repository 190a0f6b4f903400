//! Error types for the scene model.

/// Failure to encode or decode a scene snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot key encoding failed: {0}")]
    Key(#[from] rmp_serde::encode::Error),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("invalid aspect ratio {0:?}, expected W:H or custom")]
    InvalidRatio(String),
}
