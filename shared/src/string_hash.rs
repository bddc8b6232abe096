//! Hashed string identifiers.
//!
//! Animations and other named assets are looked up by a 32-bit djb2 hash of
//! their name (`h = h * 33 + byte`, seeded with 5381). Hashes are computed at
//! compile time where possible.
//!
//! The registry maps hashes back to names for log output. It is purely
//! diagnostic: it only exists in builds with debug assertions, and lookups in
//! release builds always return `"???"`.

use std::fmt;

/// djb2 seed
const SEED: u32 = 5381;

/// Placeholder for hashes with no registered name.
pub const UNKNOWN_NAME: &str = "???";

/// 32-bit djb2 hash of a name.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringHash(u32);

impl StringHash {
    /// Hash a string.
    ///
    /// ```
    /// use psxrender_shared::StringHash;
    ///
    /// const WALK: StringHash = StringHash::new("walk");
    /// assert_eq!(WALK, StringHash::new("walk"));
    /// ```
    pub const fn new(s: &str) -> Self {
        let bytes = s.as_bytes();
        let mut hash = SEED;
        let mut i = 0;
        while i < bytes.len() {
            hash = hash.wrapping_mul(33).wrapping_add(bytes[i] as u32);
            i += 1;
        }
        Self(hash)
    }

    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Registered name for this hash, or [`UNKNOWN_NAME`].
    pub fn name(self) -> String {
        registry::lookup(self.0)
    }
}

impl fmt::Debug for StringHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringHash({:#010x} {:?})", self.0, self.name())
    }
}

impl fmt::Display for StringHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for StringHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Hash `name` and remember it for diagnostics.
///
/// Call at startup for every name that should show up readable in logs.
pub fn register(name: &str) -> StringHash {
    let hash = StringHash::new(name);
    registry::insert(hash.0, name);
    hash
}

#[cfg(debug_assertions)]
mod registry {
    use std::sync::{OnceLock, RwLock};

    use hashbrown::HashMap;

    use super::UNKNOWN_NAME;

    fn table() -> &'static RwLock<HashMap<u32, String>> {
        static TABLE: OnceLock<RwLock<HashMap<u32, String>>> = OnceLock::new();
        TABLE.get_or_init(|| RwLock::new(HashMap::new()))
    }

    pub(super) fn insert(hash: u32, name: &str) {
        let Ok(mut map) = table().write() else {
            return;
        };
        match map.get(&hash) {
            Some(existing) if existing != name => {
                tracing::warn!(
                    "string hash collision: {:?} and {:?} both hash to {:#010x}",
                    existing,
                    name,
                    hash
                );
            }
            Some(_) => {}
            None => {
                map.insert(hash, name.to_owned());
            }
        }
    }

    pub(super) fn lookup(hash: u32) -> String {
        table()
            .read()
            .ok()
            .and_then(|map| map.get(&hash).cloned())
            .unwrap_or_else(|| UNKNOWN_NAME.to_owned())
    }
}

#[cfg(not(debug_assertions))]
mod registry {
    use super::UNKNOWN_NAME;

    pub(super) fn insert(_hash: u32, _name: &str) {}

    pub(super) fn lookup(_hash: u32) -> String {
        UNKNOWN_NAME.to_owned()
    }
}
