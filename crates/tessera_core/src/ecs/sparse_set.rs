//! # Sparse Set
//!
//! Membership structure shared by every component pool.
//!
//! ```text
//! sparse: [ 2 ][ - ][ 0 ][ - ][ 1 ]      indexed by entity index
//!           │          │         │
//! dense:  [ e2 ][ e4 ][ e0 ]             packed live handles
//! ```
//!
//! - `add`: O(1) append
//! - `remove`: O(1) swap with the last dense entry, then truncate
//! - `contains`: O(1) bounds check + back-reference check

use super::entity::Entity;

/// Sentinel stored in `sparse` for indices that are not in the set.
const EMPTY: u32 = u32::MAX;

/// Hook notified when a [`SparseSet`] swap-removes an entry.
///
/// Parallel arrays (such as a pool's payloads) implement this to perform the
/// matching swap-and-truncate, keeping index `k` of the parallel array paired
/// with `dense[k]`.
pub trait SwapListener {
    /// Called exactly once per effective removal, after the set has updated
    /// its own arrays.
    ///
    /// * `removed` - dense position the removed entity occupied
    /// * `vacated` - former position of the last entry (the new dense length)
    ///
    /// When `removed == vacated` the removed entity was already last.
    fn on_swap_remove(&mut self, removed: usize, vacated: usize);
}

impl SwapListener for () {
    #[inline]
    fn on_swap_remove(&mut self, _removed: usize, _vacated: usize) {}
}

/// Dense/sparse entity set with O(1) add, remove and membership.
///
/// Invariant: for every index `i` with `sparse[i] != EMPTY`,
/// `dense[sparse[i]].index() == i`.
#[derive(Clone, Debug, Default)]
pub struct SparseSet {
    /// Entity index -> position in `dense`, or `EMPTY`.
    sparse: Vec<u32>,
    /// Currently present handles, packed.
    dense: Vec<Entity>,
}

impl SparseSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
        }
    }

    /// Creates an empty set with room for `capacity` members.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entities in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set holds no entities.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the packed entity array.
    ///
    /// Order reflects add/remove history and changes on every removal.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.dense
    }

    /// Iterates over the members in dense order.
    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Entity>> {
        self.dense.iter().copied()
    }

    /// Adds an entity at the end of the dense array.
    ///
    /// # Panics
    ///
    /// Panics if a handle with the same index (of any generation) is already
    /// present. Adding twice would break the dense/sparse correspondence, so
    /// it is rejected instead.
    #[inline]
    pub fn add(&mut self, entity: Entity) {
        debug_assert!(!entity.is_null(), "cannot add the null entity");

        let idx = entity.index() as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, EMPTY);
        }
        assert!(
            self.sparse[idx] == EMPTY,
            "entity {entity} is already in the sparse set"
        );

        #[allow(clippy::cast_possible_truncation)]
        let dense_idx = self.dense.len() as u32;
        self.sparse[idx] = dense_idx;
        self.dense.push(entity);
    }

    /// Removes an entity. No-op if absent.
    ///
    /// # Returns
    ///
    /// `true` if the entity was removed.
    #[inline]
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.remove_notify(entity, &mut ())
    }

    /// Removes an entity and notifies `listener` of the swap.
    ///
    /// The last dense entry moves into the removed slot, the array shrinks by
    /// one, then `listener.on_swap_remove(removed, vacated)` runs before this
    /// call returns. Nothing happens (and the listener is not called) when
    /// the entity is absent.
    pub fn remove_notify<L>(&mut self, entity: Entity, listener: &mut L) -> bool
    where
        L: SwapListener + ?Sized,
    {
        let Some(removed) = self.position(entity) else {
            return false;
        };

        // dense is non-empty: `entity` was found in it.
        let last = self.dense[self.dense.len() - 1];
        self.dense[removed] = last;
        #[allow(clippy::cast_possible_truncation)]
        {
            self.sparse[last.index() as usize] = removed as u32;
        }
        self.dense.pop();
        self.sparse[entity.index() as usize] = EMPTY;

        listener.on_swap_remove(removed, self.dense.len());
        true
    }

    /// Checks membership in O(1).
    ///
    /// Compares the full handle, so a stale handle whose slot index has been
    /// reused by a newer generation is not reported as present.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    /// Returns the dense position of `entity`, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn position(&self, entity: Entity) -> Option<usize> {
        let dense_idx = *self.sparse.get(entity.index() as usize)? as usize;
        match self.dense.get(dense_idx) {
            Some(&present) if present == entity => Some(dense_idx),
            _ => None,
        }
    }

    /// Returns the dense position of an entity known to be present.
    ///
    /// The result is meaningless for absent entities; check with
    /// [`contains`](Self::contains) first when presence is not known by
    /// construction.
    #[inline]
    #[must_use]
    pub fn dense_index(&self, entity: Entity) -> usize {
        debug_assert!(self.contains(entity), "entity {entity} is not in the set");
        self.sparse[entity.index() as usize] as usize
    }

    /// Removes every member, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(set: &SparseSet) {
        for &e in set.entities() {
            assert!(set.contains(e));
            assert_eq!(set.entities()[set.dense_index(e)], e);
        }
    }

    #[test]
    fn test_add_contains() {
        let mut set = SparseSet::new();
        let a = Entity::new(3, 0);
        let b = Entity::new(10, 1);

        set.add(a);
        set.add(b);

        assert_eq!(set.len(), 2);
        assert!(set.contains(a));
        assert!(set.contains(b));
        assert!(!set.contains(Entity::new(4, 0)));
        assert!(!set.contains(Entity::new(100, 0)));
        assert_eq!(set.dense_index(a), 0);
        assert_eq!(set.dense_index(b), 1);
    }

    #[test]
    fn test_stale_generation_not_contained() {
        let mut set = SparseSet::new();
        set.add(Entity::new(5, 2));
        assert!(!set.contains(Entity::new(5, 1)));
        assert!(!set.contains(Entity::new(5, 3)));
    }

    #[test]
    fn test_swap_remove_updates_moved_entry() {
        let mut set = SparseSet::new();
        let es: Vec<Entity> = (0..4).map(|i| Entity::new(i, 0)).collect();
        for &e in &es {
            set.add(e);
        }

        assert!(set.remove(es[1]));
        assert_eq!(set.entities(), &[es[0], es[3], es[2]]);
        assert_eq!(set.dense_index(es[3]), 1);
        assert!(!set.contains(es[1]));
        assert_consistent(&set);
    }

    #[test]
    fn test_remove_last_and_only() {
        let mut set = SparseSet::new();
        let a = Entity::new(0, 0);
        let b = Entity::new(1, 0);
        set.add(a);
        set.add(b);

        assert!(set.remove(b));
        assert_eq!(set.entities(), &[a]);
        assert!(set.remove(a));
        assert!(set.is_empty());
        assert!(!set.contains(a));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = SparseSet::new();
        let a = Entity::new(2, 0);
        set.add(a);

        assert!(!set.remove(Entity::new(9, 0)));
        assert!(!set.remove(Entity::new(2, 1)));
        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert!(set.is_empty());
    }

    #[test]
    fn test_listener_called_once_with_positions() {
        struct Recorder(Vec<(usize, usize)>);
        impl SwapListener for Recorder {
            fn on_swap_remove(&mut self, removed: usize, vacated: usize) {
                self.0.push((removed, vacated));
            }
        }

        let mut set = SparseSet::new();
        for i in 0..3 {
            set.add(Entity::new(i, 0));
        }
        let mut rec = Recorder(Vec::new());

        set.remove_notify(Entity::new(0, 0), &mut rec);
        set.remove_notify(Entity::new(7, 0), &mut rec);
        set.remove_notify(Entity::new(1, 0), &mut rec);

        assert_eq!(rec.0, vec![(0, 2), (1, 1)]);
    }

    #[test]
    #[should_panic(expected = "already in the sparse set")]
    fn test_double_add_panics() {
        let mut set = SparseSet::new();
        set.add(Entity::new(1, 0));
        set.add(Entity::new(1, 0));
    }

    #[test]
    fn test_readd_after_remove() {
        let mut set = SparseSet::new();
        let a = Entity::new(1, 0);
        set.add(a);
        set.remove(a);
        set.add(a);
        assert!(set.contains(a));
        assert_consistent(&set);
    }
}
