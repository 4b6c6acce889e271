//! weak-ref-list: a single-threaded, ordered list that stores elements by
//! weak reference, so a position in the list never keeps its element alive.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: give long-lived registries (listener lists, tracked-object lists)
//!   a container they can hand entries to without extending those entries'
//!   lifetimes, plus an explicit way to compact the dead entries left behind.
//! - Layers:
//!   - WeakSlot<T>: private per-entry wrapper around a `Weak<T>` and the
//!     element's hash, cached at construction. The cached hash is the only
//!     identity that survives reclamation.
//!   - WeakRefList<T, S>: public list API over `Vec<Option<WeakSlot<T>>>`;
//!     a stored `None` is a null marker, distinct from a dead slot.
//!
//! Constraints
//! - Single-threaded: elements are `Rc`, so the list is `!Send`/`!Sync` and
//!   the single-writer contract is enforced by the compiler.
//! - No unsafe, no internal locking, no interior mutability.
//! - Structural `len`: dead slots occupy positions and count until scavenged
//!   or removed; liveness is observed through `get`/iteration only.
//! - Reclamation is external: dropping the last `Rc` clone kills a slot
//!   silently; the list is never notified and only observes it afterward.
//!
//! Scavenging policy
//! - `scavenge` removes dead slots in one O(n) forward pass, keeping live
//!   slots and null markers in order. It runs automatically only on `push`,
//!   and only when the pre-insertion length strictly exceeds
//!   `ref_check_threshold` (disabled by default; callers opt in).
//!   `insert`/`set` never scavenge.
//!
//! Hasher and cached-hash invariants
//! - Each slot stores the element's `u64` hash computed by the list's
//!   `BuildHasher` at insertion; `T: Hash` is never invoked again for that
//!   slot. `remove_by_hash` matches against these cached hashes, which is
//!   why it still identifies entries whose element has been reclaimed.
//! - Container `Hash` combines the cached hashes (plus null markers) in
//!   order, never resolving liveness, so a list's hash is stable across
//!   element death. It does depend on the hasher instance's seed.
//!
//! Equality semantics (deliberate trade-off)
//! - Slot equality resolves at comparison time: same allocation or equal
//!   live elements match, and two dead slots match each other no matter
//!   what they once wrapped. `contains`/`position`/`remove` therefore stop
//!   recognizing an entry once it is reclaimed; `remove_by_hash` is the
//!   removal path that keeps working.
//!
//! Notes and non-goals
//! - Not a cache: no eviction beyond dead-slot removal.
//! - Not a set: duplicates and insertion order are preserved.
//! - Out-of-range indices are contract violations and panic, as with `Vec`;
//!   "element no longer resolvable" is never an error, always `None`.
//! - Iteration yields one item per stored position (`None` for null markers
//!   and dead slots alike), keeping the iterated length equal to `len`.

mod list;
mod slot;

// Public surface
pub use list::{Iter, WeakRefList};
