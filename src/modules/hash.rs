//! Module Name Hashing
//!
//! Modules are identified by a 64-bit hash of their logical name. The hash
//! is the store key, so two names with the same hash are the same module.
//!
//! Hashing uses `DefaultHasher::new()`, which is keyed with fixed constants
//! and therefore deterministic for the lifetime of a build.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// 64-bit hash of a module's logical name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameHash(pub u64);

impl NameHash {
    /// Hash a module name.
    pub fn of(name: &str) -> Self {
        hash_name(name)
    }

    /// Get the raw u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NameHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<&str> for NameHash {
    fn from(name: &str) -> Self {
        hash_name(name)
    }
}

/// Hash a module name to a [`NameHash`].
#[inline]
pub fn hash_name(name: &str) -> NameHash {
    NameHash(hash_bytes(name.as_bytes()))
}

/// Hash arbitrary bytes to a u64.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_hash() {
        assert_eq!(hash_name("mathutils"), hash_name("mathutils"));
        assert_eq!(NameHash::of("mathutils"), NameHash::from("mathutils"));
    }

    #[test]
    fn test_different_names_different_hash() {
        let a = hash_name("game.player");
        let b = hash_name("game.enemy");
        let c = hash_name("game.Player");

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_name_hash_matches_byte_hash() {
        assert_eq!(hash_name("abc").value(), hash_bytes(b"abc"));
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        let hash = NameHash(0xab);
        assert_eq!(hash.to_string(), "00000000000000ab");
    }
}
