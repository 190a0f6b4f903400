use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for object IDs: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for objects in the scene.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Spur);

impl ObjectId {
    /// Intern a string as an ObjectId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ObjectId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Build a numbered ID with a kind prefix (e.g. `image_3`, `text_4`).
    pub fn numbered(prefix: &str, n: u64) -> Self {
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// The trailing serial number, if the ID was built by [`ObjectId::numbered`].
    pub fn serial(&self) -> Option<u64> {
        let (_, tail) = self.as_str().rsplit_once('_')?;
        tail.parse().ok()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ObjectId::intern(&s))
    }
}

/// Session-wide ID source.
///
/// Never rewinds: undo can bring back an older scene, but IDs handed out
/// since then (including ones reserved by pending imports) stay taken.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start after the highest serial found among `ids`.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a ObjectId>) -> Self {
        let max = ids.into_iter().filter_map(ObjectId::serial).max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self, prefix: &str) -> ObjectId {
        let n = self.next;
        self.next += 1;
        ObjectId::numbered(prefix, n)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ObjectId::intern("image_1");
        let b = ObjectId::intern("image_1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "image_1");
    }

    #[test]
    fn serial_parses_suffix() {
        assert_eq!(ObjectId::numbered("text", 12).serial(), Some(12));
        assert_eq!(ObjectId::intern("background").serial(), None);
    }

    #[test]
    fn allocator_continues_after_existing_ids() {
        let existing = [ObjectId::intern("image_4"), ObjectId::intern("text_9")];
        let mut ids = IdAllocator::after(existing.iter());
        assert_eq!(ids.next_id("image").as_str(), "image_10");
        assert_eq!(ids.next_id("text").as_str(), "text_11");
    }
}
