//! Linear undo/redo over full-scene snapshots.
//!
//! Every recorded state is a complete `Snapshot`, never a diff. Undo and
//! redo only move the cursor; the editor reloads the scene from the entry
//! under it. Recording after an undo drops every entry past the cursor.

use collage_core::snapshot::Snapshot;

/// Snapshot list plus cursor.
///
/// Invariant: once any snapshot exists, `index < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    /// Maximum number of entries kept (`None` = unbounded).
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Replace everything with a single entry (startup / restore).
    pub fn seed(&mut self, snapshot: Snapshot) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.index = 0;
    }

    /// Append a new state after the cursor, discarding any redo entries.
    pub fn record(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(snapshot);
        self.index = self.entries.len() - 1;

        if let Some(limit) = self.limit
            && self.entries.len() > limit
        {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
            self.index -= excess;
        }
    }

    /// Step back one entry. Returns the snapshot to reload, or `None` at
    /// the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry. Returns the snapshot to reload, or `None`
    /// at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    /// Cursor position, `None` while empty.
    pub fn index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_core::model::Scene;
    use pretty_assertions::assert_eq;

    fn snap(width: f32) -> Snapshot {
        Snapshot::capture(&Scene::new(width, 100.0))
    }

    fn width(s: Option<&Snapshot>) -> Option<f32> {
        s.map(|s| s.scene().width)
    }

    #[test]
    fn empty_history_cannot_move() {
        let mut history = History::new(None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.index(), None);
    }

    #[test]
    fn undo_redo_walk_the_cursor() {
        let mut history = History::new(None);
        history.seed(snap(1.0));
        history.record(snap(2.0));
        history.record(snap(3.0));

        assert_eq!(width(history.undo()), Some(2.0));
        assert_eq!(width(history.undo()), Some(1.0));
        assert_eq!(width(history.undo()), None);
        assert_eq!(history.index(), Some(0));

        assert_eq!(width(history.redo()), Some(2.0));
        assert_eq!(width(history.redo()), Some(3.0));
        assert_eq!(width(history.redo()), None);
        assert_eq!(history.index(), Some(2));
    }

    #[test]
    fn record_after_undo_truncates_future() {
        let mut history = History::new(None);
        history.seed(snap(1.0));
        history.record(snap(2.0));
        history.record(snap(3.0));
        history.undo();
        history.undo();

        history.record(snap(9.0));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(width(history.current()), Some(9.0));
    }

    #[test]
    fn limit_drops_oldest_and_shifts_cursor() {
        let mut history = History::new(Some(3));
        history.seed(snap(1.0));
        for w in 2..=5 {
            history.record(snap(w as f32));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
        let widths: Vec<f32> = history.entries().iter().map(|s| s.scene().width).collect();
        assert_eq!(widths, vec![3.0, 4.0, 5.0]);

        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, 2);
    }

    #[test]
    fn seed_resets_to_single_entry() {
        let mut history = History::new(None);
        history.seed(snap(1.0));
        history.record(snap(2.0));
        history.seed(snap(7.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), Some(0));
        assert!(!history.can_undo());
    }
}
