use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by card and connection identifiers.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter behind generated identifiers.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a card on the board.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(Spur);

impl CardId {
    /// Intern a string as a CardId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        CardId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique id with a prefix (e.g. `source_3`, `note_7`).
    pub fn with_prefix(prefix: &str) -> Self {
        Self::intern(&format!("{prefix}_{}", next_suffix()))
    }
}

/// Identity of a directed connection between two cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Spur);

impl ConnectionId {
    pub fn intern(s: &str) -> Self {
        ConnectionId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh id for a `source → target` link.
    pub fn between(source: CardId, target: CardId) -> Self {
        Self::intern(&format!(
            "link_{}_{}_{}",
            source.as_str(),
            target.as_str(),
            next_suffix()
        ))
    }
}

macro_rules! impl_id_traits {
    ($ty:ident, $sigil:literal) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($sigil, "{}"), self.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($ty::intern(&s))
            }
        }
    };
}

impl_id_traits!(CardId, "#");
impl_id_traits!(ConnectionId, "~");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = CardId::intern("intro");
        let b = CardId::intern("intro");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "intro");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = CardId::with_prefix("source");
        let b = CardId::with_prefix("source");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("source_"));
    }

    #[test]
    fn connection_ids_are_unique_per_call() {
        let s = CardId::intern("a");
        let t = CardId::intern("b");
        assert_ne!(ConnectionId::between(s, t), ConnectionId::between(s, t));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CardId::intern("chapter_2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"chapter_2\"");
        let back: CardId = serde_json::from_str("\"chapter_2\"").unwrap();
        assert_eq!(back, id);
    }
}
