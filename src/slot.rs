//! WeakSlot: per-entry wrapper with a death-stable cached hash.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Wraps one stored element: a non-owning reference plus the element's hash,
/// captured once at construction and retained for the slot's lifetime.
///
/// The cached hash is the slot's only identity that survives reclamation.
/// Once the target is gone, `upgrade` returns `None` and equality collapses
/// to "dead equals dead": two slots that once wrapped different elements
/// compare equal. Removal paths that must keep working after reclamation go
/// through the cached hash instead (`WeakRefList::remove_by_hash`).
pub(crate) struct WeakSlot<T> {
    target: Weak<T>,
    cached_hash: u64,
}

impl<T> WeakSlot<T> {
    /// Wrap a live element. `hash` is the element's hash under the owning
    /// list's hasher; it never changes afterward.
    pub(crate) fn new(value: &Rc<T>, hash: u64) -> Self {
        Self {
            target: Rc::downgrade(value),
            cached_hash: hash,
        }
    }

    /// Resolve the target, returning a strong reference while it is live.
    pub(crate) fn upgrade(&self) -> Option<Rc<T>> {
        self.target.upgrade()
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        self.cached_hash
    }
}

/// Slot equality resolves both sides at comparison time:
/// - same allocation: equal without touching `T: PartialEq`;
/// - both dead: equal regardless of what they once wrapped;
/// - one dead, one live: unequal;
/// - both live: element equality.
impl<T: PartialEq> PartialEq for WeakSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        if Weak::ptr_eq(&self.target, &other.target) {
            return true;
        }
        match (self.upgrade(), other.upgrade()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for WeakSlot<T> {}

/// A slot hashes as its cached hash, dead or alive.
impl<T> Hash for WeakSlot<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.cached_hash);
    }
}

impl<T: fmt::Debug> fmt::Debug for WeakSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(value) => f.debug_tuple("WeakSlot").field(&value).finish(),
            None => f.write_str("WeakSlot(<dead>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;
    use std::collections::hash_map::RandomState;

    fn slot(value: &Rc<String>, hasher: &RandomState) -> WeakSlot<String> {
        WeakSlot::new(value, hasher.hash_one(&**value))
    }

    /// Invariant: a freshly built slot is alive and resolves to its element.
    #[test]
    fn new_slot_resolves() {
        let h = RandomState::new();
        let a = Rc::new("a".to_string());
        let s = slot(&a, &h);
        assert!(s.is_alive());
        assert_eq!(s.upgrade().as_deref(), Some(&"a".to_string()));
    }

    /// Invariant: dropping the last strong reference kills the slot; the
    /// cached hash is unaffected.
    #[test]
    fn cached_hash_survives_death() {
        let h = RandomState::new();
        let a = Rc::new("a".to_string());
        let s = slot(&a, &h);
        let hash_alive = s.cached_hash();
        drop(a);
        assert!(!s.is_alive());
        assert!(s.upgrade().is_none());
        assert_eq!(s.cached_hash(), hash_alive);
    }

    /// Invariant: two live slots compare by element equality, not by
    /// allocation identity.
    #[test]
    fn live_slots_compare_by_value() {
        let h = RandomState::new();
        let a1 = Rc::new("a".to_string());
        let a2 = Rc::new("a".to_string());
        let b = Rc::new("b".to_string());
        assert_eq!(slot(&a1, &h), slot(&a2, &h));
        assert_ne!(slot(&a1, &h), slot(&b, &h));
    }

    /// Invariant: slots over the same allocation are equal through the
    /// pointer-identity shortcut, before any element comparison runs.
    #[test]
    fn same_allocation_is_equal_without_value_eq() {
        // Element equality always fails, so only ptr_eq can make these match.
        struct NeverEq;
        impl PartialEq for NeverEq {
            fn eq(&self, _: &Self) -> bool {
                false
            }
        }

        let v = Rc::new(NeverEq);
        let s1 = WeakSlot::new(&v, 0);
        let s2 = WeakSlot::new(&v, 0);
        assert!(s1 == s2);

        let other = Rc::new(NeverEq);
        let s3 = WeakSlot::new(&other, 0);
        assert!(s1 != s3);
    }

    /// Invariant: identity collapse. Two dead slots are equal no matter which
    /// elements they once wrapped; dead never equals live.
    #[test]
    fn dead_slots_collapse_to_equal() {
        let h = RandomState::new();
        let a = Rc::new("a".to_string());
        let b = Rc::new("b".to_string());
        let sa = slot(&a, &h);
        let sb = slot(&b, &h);
        drop(a);
        drop(b);
        assert!(sa == sb, "independently dead slots must collapse to equal");
        let c = Rc::new("c".to_string());
        let sc = slot(&c, &h);
        assert!(sa != sc, "dead must not equal live");
    }
}
