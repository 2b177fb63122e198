//! Fixed-seed hash containers for the engine's internal tables.
//!
//! A fixed seed keeps hash results stable across runs for the same input,
//! which keeps resolution order and cache behavior reproducible.

use foldhash::fast::FixedState;

/// The fixed seed used by every internal table.
pub(crate) const FIXED_STATE: FixedState = FixedState::with_seed(0x6D61_7073_746F_6E65);

/// A [`hashbrown::HashMap`] with the fixed hash state.
pub(crate) type FixedHashMap<K, V> = hashbrown::HashMap<K, V, FixedState>;

/// A [`hashbrown::HashSet`] with the fixed hash state.
pub(crate) type FixedHashSet<T> = hashbrown::HashSet<T, FixedState>;
