//! chained-hashmap: a single-threaded hash map built from scratch on
//! separate chaining, with power-of-two bucket arrays and snapshot views.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: implement the full hashing/bucketing/chaining/resizing logic
//!   ourselves rather than delegating to a ready-made table, while
//!   keeping every piece small enough to reason about independently.
//! - Pieces:
//!   - Bucket array: `Vec<Option<NodeKey>>` whose length is always a
//!     power of two, so the bucket index is `hash & (len - 1)`.
//!   - Node arena: chain nodes live in a `slotmap::SlotMap` and link to
//!     their successor by key, not by pointer. The structure is a strict
//!     forest of singly-linked lists; the arena gives single ownership
//!     of every node without `Rc` or raw links.
//!   - Resize policy: double the bucket array when the live-entry count
//!     exceeds 3/4 of the bucket count, checked before each insert.
//!   - Snapshot views: `entries()`/`keys()`/`values()` walk the chains
//!     once and produce independent copies; a borrowing `iter()` backs
//!     all three.
//!
//! Constraints
//! - Single-threaded: all mutation goes through `&mut self`; there is no
//!   interior mutability, no locking, and no background work.
//! - Keys are unique by equality; re-inserting an existing key replaces
//!   the value in place and never creates a second node.
//! - Appends go to the chain tail, so chain order is insertion order
//!   within a bucket.
//!
//! Hasher and rehashing invariants
//! - Each node stores its `u64` hash, computed once on insert; indexing
//!   always uses the stored hash and `K: Hash` is never invoked again
//!   for a stored node. Resizing re-places nodes by their stored hash,
//!   it does not rehash.
//! - The bucket index masks the hash's low bits directly, with no
//!   remixing. Hashers with poor low-bit entropy therefore cluster
//!   entries into few chains; lookups stay correct, only slower.
//!
//! Notes and non-goals
//! - Not thread-safe; no ordering guarantees across buckets; no
//!   persistence or serialization.
//! - The table grows but never shrinks; `remove` only splices chains.
//! - Absence is an `Option::None`/`false`/no-op, never an error. The
//!   only fallible operation is construction with a capacity whose
//!   power-of-two round-up overflows `usize`.

mod chained_hash_map;

// Public surface
pub use chained_hash_map::{CapacityError, ChainedHashMap, Iter, DEFAULT_CAPACITY};
