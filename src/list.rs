//! WeakRefList: the ordered weak-reference list and its iterator.

use crate::slot::WeakSlot;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Capacity used by `new`; callers with a known size use `with_capacity`.
const DEFAULT_CAPACITY: usize = 4;

/// An ordered, indexable list that holds its elements by weak reference:
/// occupying a position never keeps the element alive.
///
/// Elements live in `Rc` allocations owned by the caller; the list stores
/// only a downgraded reference plus the element's hash, cached at insertion.
/// When the last strong reference to an element is dropped, its slot turns
/// dead in place. Dead slots keep their position (and count toward `len`)
/// until `scavenge` runs or the slot is removed explicitly.
///
/// A stored `None` is a null marker: a deliberately empty position, distinct
/// from a dead slot, and never removed by scavenging.
///
/// Usage notes:
/// - Set `set_ref_check_threshold` or call `scavenge` every once in a while;
///   otherwise dead slots accumulate. Only `push` scavenges automatically.
/// - Prefer `remove_by_hash` over `remove`. Once an element is reclaimed its
///   slot is no longer recognizable by value (`remove`/`contains`/`position`
///   cannot match it); the cached hash still identifies it.
/// - Equality between dead slots collapses: two positions whose elements were
///   both reclaimed compare equal regardless of what they once held. This is
///   part of the contract, and it makes list equality time-dependent.
pub struct WeakRefList<T, S = RandomState> {
    hasher: S,
    slots: Vec<Option<WeakSlot<T>>>,
    ref_check_threshold: usize,
}

impl<T> WeakRefList<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T> Default for WeakRefList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> WeakRefList<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            slots: Vec::with_capacity(capacity),
            // usize::MAX disables automatic scavenging; memory-sensitive
            // callers opt in via set_ref_check_threshold.
            ref_check_threshold: usize::MAX,
        }
    }

    /// Number of occupied positions, dead or alive. Liveness is only
    /// observable through `get` or iteration.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Length above which `push` scavenges before appending.
    pub fn ref_check_threshold(&self) -> usize {
        self.ref_check_threshold
    }

    pub fn set_ref_check_threshold(&mut self, threshold: usize) {
        self.ref_check_threshold = threshold;
    }

    /// Element at `index`, or `None` if the position is a null marker or its
    /// element has been reclaimed. Does not scavenge.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> Option<Rc<T>> {
        self.slots[index].as_ref().and_then(WeakSlot::upgrade)
    }

    /// Remove the slot at `index`, shifting the tail left. Returns the
    /// element if the slot still held a live one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Option<Rc<T>> {
        self.slots.remove(index).and_then(|slot| slot.upgrade())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Remove every dead slot in one forward pass, preserving the order of
    /// live slots and null markers. Idempotent until another element dies.
    pub fn scavenge(&mut self) {
        self.slots
            .retain(|slot| slot.as_ref().map_or(true, WeakSlot::is_alive));
    }

    /// Iterate over current positions, yielding the live element or `None`
    /// for null markers and dead slots. One item per stored position, so the
    /// iterator's length always equals `len()`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

impl<T, S> WeakRefList<T, S>
where
    T: Hash,
    S: BuildHasher,
{
    /// Wrap `value` in a fresh slot, hashing it now; `None` stays the null
    /// marker.
    fn make_slot(&self, value: Option<&Rc<T>>) -> Option<WeakSlot<T>> {
        value.map(|rc| WeakSlot::new(rc, self.hasher.hash_one(&**rc)))
    }

    /// Replace the slot at `index` with a fresh wrapper around `value`.
    /// Does not scavenge.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, value: Option<&Rc<T>>) {
        let slot = self.make_slot(value);
        self.slots[index] = slot;
    }

    /// Append `value`. If the pre-insertion length strictly exceeds the
    /// ref-check threshold, a full scavenge runs first; this is the only
    /// operation with automatic dead-slot maintenance.
    pub fn push(&mut self, value: Option<&Rc<T>>) {
        if self.slots.len() > self.ref_check_threshold {
            self.scavenge();
        }
        let slot = self.make_slot(value);
        self.slots.push(slot);
    }

    /// Insert `value` at `index`, shifting the tail right. Never scavenges;
    /// threshold maintenance is deliberately confined to `push`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: Option<&Rc<T>>) {
        let slot = self.make_slot(value);
        self.slots.insert(index, slot);
    }

    /// Remove the first slot whose cached hash matches the hash of `value`
    /// under this list's hasher. Returns whether a slot was removed; a `None`
    /// probe removes nothing.
    ///
    /// This is the removal path that survives reclamation: the cached hash
    /// was captured at insertion and outlives the element, where `remove`
    /// stops matching. If two distinct elements share a hash, the first
    /// match is removed, which may be the wrong one; there is no secondary
    /// disambiguation.
    pub fn remove_by_hash(&mut self, value: Option<&T>) -> bool {
        let hash = match value {
            Some(value) => self.hasher.hash_one(value),
            None => return false,
        };
        let found = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().map_or(false, |s| s.cached_hash() == hash));
        match found {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T, S> WeakRefList<T, S>
where
    T: Hash + PartialEq,
    S: BuildHasher,
{
    /// Whether some slot matches `value` by slot equality. A `None` probe
    /// matches the first null marker.
    pub fn contains(&self, value: Option<&Rc<T>>) -> bool {
        self.position(value).is_some()
    }

    /// Index of the first slot matching `value`, by slot equality: a
    /// throwaway slot is built for the probe and compared against stored
    /// slots. A probe built here is always live, so dead slots never match;
    /// use `remove_by_hash` to target a possibly-reclaimed entry.
    pub fn position(&self, value: Option<&Rc<T>>) -> Option<usize> {
        let probe = self.make_slot(value);
        self.slots.iter().position(|slot| *slot == probe)
    }

    /// Remove the first slot matching `value` by slot equality. Returns
    /// whether a slot was removed.
    pub fn remove(&mut self, value: Option<&Rc<T>>) -> bool {
        match self.position(value) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Lists are equal iff they have the same length and slots match pairwise:
/// null markers only against null markers, everything else by slot equality
/// (including the dead-dead collapse).
impl<T: PartialEq, S> PartialEq for WeakRefList<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<T: Eq, S> Eq for WeakRefList<T, S> {}

/// Order-sensitive combination of the cached per-slot hashes; liveness is
/// never consulted, so a list's hash does not change when elements die.
/// Cached hashes come from each list's own hasher instance, so equal lists
/// only hash equal when their hashers agree (e.g. a shared or cloned hasher).
impl<T, S> Hash for WeakRefList<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slots.hash(state);
    }
}

impl<T: fmt::Debug, S> fmt::Debug for WeakRefList<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for slot in &self.slots {
            match slot {
                None => {
                    list.entry(&format_args!("<null>"));
                }
                Some(slot) => match slot.upgrade() {
                    Some(value) => {
                        list.entry(&value);
                    }
                    None => {
                        list.entry(&format_args!("<dead>"));
                    }
                },
            }
        }
        list.finish()
    }
}

/// Forward-only iterator over stored positions. Restart by calling
/// `WeakRefList::iter` again.
pub struct Iter<'a, T> {
    it: core::slice::Iter<'a, Option<WeakSlot<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Option<Rc<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|slot| slot.as_ref().and_then(WeakSlot::upgrade))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T, S> IntoIterator for &'a WeakRefList<T, S> {
    type Item = Option<Rc<T>>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
