pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod import;
pub mod layers;
pub mod shortcuts;
pub mod store;

pub use commands::{Command, Outcome};
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::EditorError;
pub use history::History;
pub use import::{ImportOutcome, LoadToken, Placement};
pub use layers::{LayerAction, LayerEntry, LayerKind};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{FileStore, MemoryStore, SnapshotStore, StoreError};
