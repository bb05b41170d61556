//! # Component Pool
//!
//! Typed storage for a single component type.
//!
//! The pool embeds a [`SparseSet`] and a payload array that is kept
//! index-for-index with the set's dense entity array:
//!
//! ```text
//! entities:   [ e2 ][ e4 ][ e0 ]
//! components: [ c2 ][ c4 ][ c0 ]
//! ```
//!
//! Removal swaps both arrays in the same call, through the set's
//! [`SwapListener`] hook.

use std::any::type_name;

use bytemuck::Pod;

use super::component::Component;
use super::entity::Entity;
use super::sparse_set::{SparseSet, SwapListener};

/// Dense storage for components of type `C`.
///
/// This storage guarantees:
/// - O(1) add, remove and lookup by entity
/// - `components()[k]` belongs to `entities()[k]` for every `k`
/// - Contiguous payloads for bulk iteration
///
/// # Example
///
/// ```rust
/// use tessera_core::{ComponentPool, Entity};
///
/// let mut pool: ComponentPool<u32> = ComponentPool::new();
/// let e = Entity::new(4, 0);
/// pool.add(e, 10);
/// *pool.get_mut(e) += 1;
/// assert_eq!(pool.remove(e), Some(11));
/// ```
pub struct ComponentPool<C: Component> {
    /// Membership bookkeeping.
    set: SparseSet,
    /// Payloads, parallel to `set.entities()`.
    components: Vec<C>,
}

/// Mirrors a set removal on the payload array and keeps the detached value.
struct Detach<'a, C> {
    components: &'a mut Vec<C>,
    detached: Option<C>,
}

impl<C> SwapListener for Detach<'_, C> {
    #[inline]
    fn on_swap_remove(&mut self, removed: usize, vacated: usize) {
        debug_assert_eq!(vacated + 1, self.components.len());
        // Moves the payload at `vacated` into `removed` and shrinks by one;
        // a plain pop when `removed == vacated`.
        self.detached = Some(self.components.swap_remove(removed));
    }
}

impl<C: Component> ComponentPool<C> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            set: SparseSet::new(),
            components: Vec::new(),
        }
    }

    /// Creates an empty pool with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: SparseSet::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the pool is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the underlying membership set.
    #[inline]
    #[must_use]
    pub fn set(&self) -> &SparseSet {
        &self.set
    }

    /// Checks whether `entity` has a component in this pool.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.set.contains(entity)
    }

    /// Attaches `component` to `entity`, returning a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if `entity` already has a component in this pool.
    #[inline]
    pub fn add(&mut self, entity: Entity, component: C) -> &mut C {
        self.set.add(entity);
        self.components.push(component);
        let last = self.components.len() - 1;
        &mut self.components[last]
    }

    /// Attaches a component built by `init`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` already has a component in this pool.
    #[inline]
    pub fn insert_with<F>(&mut self, entity: Entity, init: F) -> &mut C
    where
        F: FnOnce() -> C,
    {
        self.add(entity, init())
    }

    /// Detaches the component of `entity`. No-op if absent.
    ///
    /// # Returns
    ///
    /// The removed component, or `None` if there was none.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let mut detach = Detach {
            components: &mut self.components,
            detached: None,
        };
        self.set.remove_notify(entity, &mut detach);
        detach.detached
    }

    /// Gets the component of an entity known to be present.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no component in this pool.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> &C {
        match self.try_get(entity) {
            Some(component) => component,
            None => missing::<C>(entity),
        }
    }

    /// Gets the component of an entity known to be present, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no component in this pool.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> &mut C {
        match self.set.position(entity) {
            Some(idx) => &mut self.components[idx],
            None => missing::<C>(entity),
        }
    }

    /// Gets the component of `entity`, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn try_get(&self, entity: Entity) -> Option<&C> {
        self.set.position(entity).map(|idx| &self.components[idx])
    }

    /// Gets the component of `entity` mutably, or `None` if absent.
    #[inline]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        let idx = self.set.position(entity)?;
        Some(&mut self.components[idx])
    }

    /// Returns the packed entity array.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.set.entities()
    }

    /// Returns the packed component array, parallel to [`entities`](Self::entities).
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Returns the packed component array mutably.
    ///
    /// Values may be changed freely; membership cannot.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [C] {
        &mut self.components
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.set.iter().zip(self.components.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.set.iter().zip(self.components.iter_mut())
    }

    /// Removes every component.
    pub fn clear(&mut self) {
        self.set.clear();
        self.components.clear();
    }
}

impl<C: Component + Pod> ComponentPool<C> {
    /// Returns the packed component array as raw bytes.
    ///
    /// Useful for uploading a whole pool to a GPU buffer or a file in one
    /// copy.
    #[inline]
    #[must_use]
    pub fn component_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.components)
    }
}

impl<C: Component> Default for ComponentPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component + std::fmt::Debug> std::fmt::Debug for ComponentPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn missing<C>(entity: Entity) -> ! {
    panic!(
        "entity {entity} has no component of type `{}`",
        type_name::<C>()
    )
}
