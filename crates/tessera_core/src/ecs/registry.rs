//! # Registry
//!
//! The central container for all entities and components.
//!
//! The registry is the only authority for:
//! - Creating and destroying entities (slot table + free list)
//! - Creating component pools (one per type, on first use)
//! - Routing attach/detach/lookup to the right pool

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::component::Component;
use super::entity::{Entity, MAX_GENERATION, MAX_INDEX};
use super::pool::ComponentPool;
use super::storage::{typed_mut, typed_ref, Storage};
use super::view::{Query, View};
use crate::config::{GenerationPolicy, RegistryConfig};
use crate::error::{EcsError, EcsResult};

/// Per-index bookkeeping in the slot table.
#[derive(Clone, Copy, Debug)]
struct EntitySlot {
    /// Generation of the current (or next) occupant.
    generation: u32,
    /// Whether the slot is currently occupied.
    alive: bool,
}

/// Owner of every entity and component pool.
///
/// Operations on dead entities or absent components are silent: removal is a
/// no-op and the `try_*` lookups return `None`. Only the presence-assuming
/// accessors ([`get`](Self::get), [`get_mut`](Self::get_mut)) panic.
///
/// # Example
///
/// ```rust
/// use tessera_core::Registry;
///
/// struct Health(u32);
///
/// let mut registry = Registry::new();
/// let e = registry.create();
/// registry.add(e, Health(10));
/// assert!(registry.has::<Health>(e));
///
/// registry.destroy(e);
/// assert!(!registry.alive(e));
/// assert!(!registry.has::<Health>(e));
/// ```
pub struct Registry {
    /// Pools indexed by type key, in order of first use.
    pools: Vec<Box<dyn Storage>>,
    /// Component type -> index into `pools`.
    pool_keys: HashMap<TypeId, usize>,
    /// Slot table indexed by entity index.
    slots: Vec<EntitySlot>,
    /// Indices available for reuse (LIFO).
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Slots permanently withdrawn after generation exhaustion.
    retired_count: usize,
    config: RegistryConfig,
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            pools: Vec::new(),
            pool_keys: HashMap::new(),
            slots: Vec::with_capacity(config.entity_capacity),
            free_indices: Vec::new(),
            alive_count: 0,
            retired_count: 0,
            config,
        }
    }

    /// Returns the configuration this registry was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates a new entity.
    ///
    /// Reuses the most recently freed slot if there is one, otherwise
    /// allocates a new slot at generation 0.
    ///
    /// # Returns
    ///
    /// The new handle, or [`Entity::NULL`] if every slot is in use.
    #[inline]
    pub fn create(&mut self) -> Entity {
        match self.try_create() {
            Ok(entity) => entity,
            Err(err) => {
                tracing::warn!(%err, "entity creation failed");
                Entity::NULL
            }
        }
    }

    /// Creates a new entity, reporting exhaustion as an error.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExhausted`] if no slot is free and the
    /// index space is used up.
    pub fn try_create(&mut self) -> EcsResult<Entity> {
        let index = match self.free_indices.pop() {
            Some(index) => index,
            None => {
                // MAX_INDEX is never handed out: with MAX_GENERATION it
                // would spell Entity::NULL.
                let index = u32::try_from(self.slots.len())
                    .ok()
                    .filter(|&index| index < MAX_INDEX)
                    .ok_or(EcsError::CapacityExhausted { max: MAX_INDEX })?;
                self.slots.push(EntitySlot {
                    generation: 0,
                    alive: false,
                });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        self.alive_count += 1;

        Ok(Entity::new(index, slot.generation))
    }

    /// Destroys an entity and every component attached to it.
    ///
    /// The slot's generation advances, so `entity` (and every copy of it)
    /// is never reported alive again.
    ///
    /// # Returns
    ///
    /// `true` if the entity was destroyed, `false` if it was already dead or
    /// the handle was stale.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.alive(entity) {
            return false;
        }

        for pool in &mut self.pools {
            pool.remove_entity(entity);
        }

        let index = entity.index();
        let slot = &mut self.slots[index as usize];
        slot.alive = false;
        slot.generation = (slot.generation + 1) & MAX_GENERATION;
        self.alive_count -= 1;

        if slot.generation == 0 && self.config.generation_policy == GenerationPolicy::Retire {
            self.retired_count += 1;
            tracing::warn!(index, "entity slot retired after generation exhaustion");
        } else {
            self.free_indices.push(index);
        }

        true
    }

    /// Checks if a handle refers to a live entity.
    #[inline]
    #[must_use]
    pub fn alive(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index() as usize)
            .is_some_and(|slot| slot.alive && slot.generation == entity.generation())
    }

    /// Returns the number of alive entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.alive_count
    }

    /// Returns `true` if no entity is alive.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Returns the number of slots withdrawn by [`GenerationPolicy::Retire`].
    #[inline]
    #[must_use]
    pub const fn retired_slots(&self) -> usize {
        self.retired_count
    }

    /// Iterates over all alive entities in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .zip(0u32..)
            .filter(|(slot, _)| slot.alive)
            .map(|(slot, index)| Entity::new(index, slot.generation))
    }

    /// Destroys every entity and drops every pool.
    ///
    /// All previously issued handles become invalid, and the slot table
    /// starts over from index 0.
    pub fn clear(&mut self) {
        tracing::debug!(
            entities = self.alive_count,
            pools = self.pools.len(),
            "clearing registry"
        );
        self.pools.clear();
        self.pool_keys.clear();
        self.slots.clear();
        self.free_indices.clear();
        self.alive_count = 0;
        self.retired_count = 0;
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `component` to `entity`, returning a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive or already has a `C`. Use
    /// [`try_add`](Self::try_add) to get an error instead.
    #[inline]
    pub fn add<C: Component>(&mut self, entity: Entity, component: C) -> &mut C {
        assert!(
            self.alive(entity),
            "cannot attach `{}` to dead entity {entity}",
            type_name::<C>()
        );
        self.pool_mut::<C>().add(entity, component)
    }

    /// Checked variant of [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`] if `entity` is not alive
    /// - [`EcsError::DuplicateComponent`] if `entity` already has a `C`
    pub fn try_add<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        if !self.alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        let pool = self.pool_mut::<C>();
        if pool.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }
        Ok(pool.add(entity, component))
    }

    /// Detaches the `C` of `entity`. No-op if absent.
    ///
    /// # Returns
    ///
    /// The removed component, or `None` if there was none.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let key = self.pool_key::<C>()?;
        typed_mut::<C>(&mut *self.pools[key]).remove(entity)
    }

    /// Gets the `C` of an entity known to have one.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `C`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        match self.try_get(entity) {
            Some(component) => component,
            None => panic!(
                "{}",
                EcsError::MissingComponent {
                    entity,
                    component: type_name::<C>(),
                }
            ),
        }
    }

    /// Mutable variant of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `C`.
    #[inline]
    #[track_caller]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        match self.try_get_mut(entity) {
            Some(component) => component,
            None => panic!(
                "{}",
                EcsError::MissingComponent {
                    entity,
                    component: type_name::<C>(),
                }
            ),
        }
    }

    /// Gets the `C` of `entity`, or `None` if it has none.
    #[inline]
    #[must_use]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.pool::<C>()?.try_get(entity)
    }

    /// Gets the `C` of `entity` mutably, or `None` if it has none.
    #[inline]
    pub fn try_get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        let key = self.pool_key::<C>()?;
        typed_mut::<C>(&mut *self.pools[key]).try_get_mut(entity)
    }

    /// Checks whether `entity` has a `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.pool::<C>().is_some_and(|pool| pool.contains(entity))
    }

    // =========================================================================
    // Pools and views
    // =========================================================================

    /// Returns the pool for `C`, or `None` if the type was never used.
    #[must_use]
    pub fn pool<C: Component>(&self) -> Option<&ComponentPool<C>> {
        let key = self.pool_key::<C>()?;
        Some(typed_ref::<C>(&*self.pools[key]))
    }

    /// Returns the pool for `C`, creating it if needed.
    pub fn pool_mut<C: Component>(&mut self) -> &mut ComponentPool<C> {
        let key = self.ensure_pool::<C>();
        typed_mut::<C>(&mut *self.pools[key])
    }

    /// Returns the number of component pools created so far.
    #[inline]
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Iterates over every pool, type-erased, in order of creation.
    pub fn storages(&self) -> impl Iterator<Item = &dyn Storage> + '_ {
        self.pools.iter().map(|pool| &**pool)
    }

    /// Builds a view over the pools of `Q`, creating missing pools empty.
    ///
    /// # Panics
    ///
    /// Panics if `Q` names the same component type twice.
    pub fn view<Q: Query>(&mut self) -> View<'_, Q> {
        View::new(Q::fetch(self))
    }

    /// Calls `f` for every entity holding all components of `Q`.
    ///
    /// Shorthand for `registry.view::<Q>().each(f)`.
    ///
    /// # Panics
    ///
    /// Panics if `Q` names the same component type twice.
    pub fn each<Q, F>(&mut self, f: F)
    where
        Q: Query,
        F: FnMut(Entity, Q::ItemMut<'_>),
    {
        self.view::<Q>().each(f);
    }

    #[inline]
    fn pool_key<C: Component>(&self) -> Option<usize> {
        self.pool_keys.get(&TypeId::of::<C>()).copied()
    }

    /// Returns the key of the pool for `C`, creating the pool on first use.
    pub(crate) fn ensure_pool<C: Component>(&mut self) -> usize {
        if let Some(key) = self.pool_key::<C>() {
            return key;
        }

        let key = self.pools.len();
        self.pools
            .push(Box::new(ComponentPool::<C>::with_capacity(self.config.pool_capacity)));
        self.pool_keys.insert(TypeId::of::<C>(), key);
        tracing::debug!(component = type_name::<C>(), key, "registered component pool");
        key
    }

    /// Borrows several pools at once.
    ///
    /// # Panics
    ///
    /// Panics if a key repeats.
    pub(crate) fn storages_mut<const N: usize>(
        &mut self,
        keys: [usize; N],
    ) -> [&mut Box<dyn Storage>; N] {
        match self.pools.get_disjoint_mut(keys) {
            Ok(storages) => storages,
            Err(err) => panic!("view component types must be distinct: {err}"),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("alive", &self.alive_count)
            .field("slots", &self.slots.len())
            .field("free", &self.free_indices.len())
            .field("retired", &self.retired_count)
            .field(
                "pools",
                &self
                    .storages()
                    .map(|storage| storage.component_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
