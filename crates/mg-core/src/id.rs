use lasso::{Spur, ThreadedRodeo};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for scene identifiers.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter folded into generated ids so two ids minted in the
/// same millisecond with the same random suffix still differ.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Mint a fresh `<prefix>_<millis>_<suffix>` string.
fn fresh(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("{prefix}_{millis}_{suffix:08x}{n:x}")
}

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing handle.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a never-before-seen id (timestamp + random suffix).
            pub fn generate() -> Self {
                Self::intern(&fresh($prefix))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a node in the scene. Interned: 4 bytes, `Copy`, O(1) `Eq`/`Hash`.
    NodeId,
    "node"
);

interned_id!(
    /// Identifier of an edge in the scene.
    EdgeId,
    "edge"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("memory_42");
        let b = NodeId::intern("memory_42");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "memory_42");
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: std::collections::HashSet<NodeId> = (0..500).map(|_| NodeId::generate()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn generated_ids_carry_prefix() {
        assert!(NodeId::generate().as_str().starts_with("node_"));
        assert!(EdgeId::generate().as_str().starts_with("edge_"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EdgeId::intern("e1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"e1\"");
        let back: EdgeId = serde_json::from_str("\"e1\"").unwrap();
        assert_eq!(back, id);
    }
}
