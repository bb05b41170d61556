//! # Type-Erased Storage
//!
//! The registry keeps pools of unrelated component types in one collection.
//! [`Storage`] is the minimal capability every pool offers without knowing
//! its payload type; typed access goes through a checked downcast.

use std::any::{type_name, Any};

use super::component::Component;
use super::entity::Entity;
use super::pool::ComponentPool;

/// Object-safe interface shared by every [`ComponentPool`].
pub trait Storage: Any + Send + Sync {
    /// Checks whether `entity` has a component in this storage.
    fn contains(&self, entity: Entity) -> bool;

    /// Detaches and drops the component of `entity`. No-op if absent.
    ///
    /// Returns `true` if a component was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Packed entity array of the storage.
    fn entities(&self) -> &[Entity];

    /// Type name of the stored component, for diagnostics.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> Storage for ComponentPool<C> {
    #[inline]
    fn contains(&self, entity: Entity) -> bool {
        ComponentPool::contains(self, entity)
    }

    #[inline]
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    #[inline]
    fn len(&self) -> usize {
        ComponentPool::len(self)
    }

    #[inline]
    fn entities(&self) -> &[Entity] {
        ComponentPool::entities(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn Storage {
    /// Downcasts to the typed pool, or `None` if `C` is not the stored type.
    #[inline]
    #[must_use]
    pub fn downcast_ref<C: Component>(&self) -> Option<&ComponentPool<C>> {
        self.as_any().downcast_ref()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    #[inline]
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut ComponentPool<C>> {
        self.as_any_mut().downcast_mut()
    }
}

/// Recovers the typed pool behind a registry slot.
///
/// Slots are keyed by `TypeId`, so a mismatch means the key table is corrupt.
pub(crate) fn typed_ref<'a, C: Component>(
    storage: &'a (dyn Storage + 'static),
) -> &'a ComponentPool<C> {
    match storage.downcast_ref::<C>() {
        Some(pool) => pool,
        None => mismatched::<C>(storage),
    }
}

/// Mutable variant of [`typed_ref`].
pub(crate) fn typed_mut<'a, C: Component>(
    storage: &'a mut (dyn Storage + 'static),
) -> &'a mut ComponentPool<C> {
    if !storage.as_any().is::<ComponentPool<C>>() {
        mismatched::<C>(storage)
    }
    match storage.downcast_mut::<C>() {
        Some(pool) => pool,
        None => unreachable!("type checked above"),
    }
}

#[cold]
#[inline(never)]
fn mismatched<C>(storage: &dyn Storage) -> ! {
    unreachable!(
        "pool for `{}` registered under the key of `{}`",
        storage.component_name(),
        type_name::<C>()
    )
}
