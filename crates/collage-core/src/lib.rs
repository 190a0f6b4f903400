pub mod error;
pub mod filter;
pub mod id;
pub mod model;
pub mod sizing;
pub mod snapshot;
pub mod source;

pub use error::{SizingError, SnapshotError};
pub use filter::{Filter, FilterInput, FilterSlot, FilterStack, FilterWidgets};
pub use id::{IdAllocator, ObjectId};
pub use model::*;
pub use sizing::{CanvasSize, Template};
pub use snapshot::{SceneChange, SceneChanges, Snapshot, SnapshotKey};
pub use source::ImageSource;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect};
