//! Typed user actions.
//!
//! Each control on the page maps to exactly one `Command`; the editor
//! turns each command into one state transition. Commands that change the
//! scene are recorded as a history snapshot; selection and history
//! navigation are not.

use crate::layers::LayerAction;
use collage_core::filter::{FilterInput, FilterSlot};
use collage_core::id::ObjectId;
use collage_core::model::Color;
use collage_core::sizing::{CanvasSize, Template};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Template selector changed. `container` is the raw container size;
    /// the editor subtracts its configured padding.
    ApplyTemplate {
        template: Template,
        container: CanvasSize,
    },
    /// Custom width/height "apply". No-op unless both are positive.
    ApplyCustomSize { width: i32, height: i32 },
    SetBackground(Color),
    /// Empty `content` falls back to the configured default text.
    AddText {
        content: String,
        font_family: String,
        color: Color,
    },
    Select(Option<ObjectId>),
    /// Select the topmost object under a canvas point (or clear).
    SelectAt { x: f32, y: f32 },
    MoveObject { id: ObjectId, left: f32, top: f32 },
    ScaleObject {
        id: ObjectId,
        scale_x: f32,
        scale_y: f32,
    },
    RemoveObject(ObjectId),
    Layer { id: ObjectId, action: LayerAction },
    /// Filter widget input, applied to the selected image.
    SetFilter { slot: FilterSlot, input: FilterInput },
    ResetFilters,
    Undo,
    Redo,
}

impl Command {
    /// Short human-readable label, used in logs.
    pub fn description(&self) -> &'static str {
        match self {
            Command::ApplyTemplate { .. } => "apply template",
            Command::ApplyCustomSize { .. } => "apply custom size",
            Command::SetBackground(_) => "set background",
            Command::AddText { .. } => "add text",
            Command::Select(_) | Command::SelectAt { .. } => "select",
            Command::MoveObject { .. } => "move object",
            Command::ScaleObject { .. } => "scale object",
            Command::RemoveObject(_) => "remove object",
            Command::Layer { action, .. } => match action {
                LayerAction::Forward => "bring forward",
                LayerAction::Backward => "send backward",
                LayerAction::Delete => "delete layer",
            },
            Command::SetFilter { .. } => "set filter",
            Command::ResetFilters => "reset filters",
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed (boundary, invalid input, no target).
    Unchanged,
    /// The scene changed and a snapshot was recorded and persisted.
    Recorded,
    /// Undo/redo reloaded the scene from history.
    Restored,
    /// Only the selection changed.
    SelectionChanged,
    /// A pending import was cancelled instead of removing an object.
    ImportCancelled,
}

impl Outcome {
    /// Whether the host should redraw the canvas and layer panel.
    pub fn needs_redraw(self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }
}
