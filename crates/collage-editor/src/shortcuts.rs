//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The map lives in Rust so the WASM bridge and native hosts agree.

use crate::commands::Command;
use crate::layers::LayerAction;
use collage_core::id::ObjectId;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,

    // ── Z-order ──
    SendBackward,
    BringForward,

    // ── UI ──
    Deselect,
}

impl ShortcutAction {
    /// The command this action stands for, given the current selection.
    /// Actions that need a target return `None` when nothing is selected.
    pub fn to_command(self, selection: Option<ObjectId>) -> Option<Command> {
        match self {
            ShortcutAction::Undo => Some(Command::Undo),
            ShortcutAction::Redo => Some(Command::Redo),
            ShortcutAction::Deselect => Some(Command::Select(None)),
            ShortcutAction::Delete => selection.map(Command::RemoveObject),
            ShortcutAction::BringForward => selection.map(|id| Command::Layer {
                id,
                action: LayerAction::Forward,
            }),
            ShortcutAction::SendBackward => selection.map(|id| Command::Layer {
                id,
                action: LayerAction::Backward,
            }),
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "]" => Some(ShortcutAction::BringForward),
            "[" => Some(ShortcutAction::SendBackward),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Shift+Z → Redo (key arrives uppercase with shift)
        assert_eq!(
            ShortcutMap::resolve("Z", true, true, false, false),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(
            ShortcutMap::resolve("[", false, false, false, false),
            Some(ShortcutAction::SendBackward)
        );
        assert_eq!(
            ShortcutMap::resolve("]", false, false, false, false),
            Some(ShortcutAction::BringForward)
        );
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("s", true, false, false, false), None);
    }

    #[test]
    fn targeted_actions_need_a_selection() {
        assert_eq!(ShortcutAction::Delete.to_command(None), None);
        assert_eq!(ShortcutAction::Undo.to_command(None), Some(Command::Undo));

        let id = ObjectId::intern("shortcut_target");
        assert_eq!(
            ShortcutAction::BringForward.to_command(Some(id)),
            Some(Command::Layer {
                id,
                action: LayerAction::Forward
            })
        );
        assert_eq!(
            ShortcutAction::Deselect.to_command(Some(id)),
            Some(Command::Select(None))
        );
    }
}
