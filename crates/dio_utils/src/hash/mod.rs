//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! All containers here hash with a fixed seed, so iteration order only
//! depends on the inserted data. Schema preparation relies on this to
//! report the same first error on every run.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::{FixedHashState, HashMap, HashSet, NoOpHashState};

    #[test]
    fn fixed_state_is_stable() {
        let a = FixedHashState.hash_one("storage_name");
        let b = FixedHashState.hash_one("storage_name");
        assert_eq!(a, b);
    }

    #[test]
    fn noop_state_passes_u64_through() {
        assert_eq!(NoOpHashState.hash_one(7_u64), 7);
    }

    #[test]
    fn containers_are_const_constructible() {
        let mut map: HashMap<&str, u32> = HashMap::with_hasher(FixedHashState);
        map.insert("x", 1);
        let mut set: HashSet<&str> = HashSet::with_hasher(FixedHashState);
        assert!(set.insert("x"));
        assert!(!set.insert("x"));
        assert_eq!(map.get("x"), Some(&1));
    }
}
