//! # Views
//!
//! Multi-component iteration over a fixed set of pools.
//!
//! A view borrows one pool per requested component type and picks the pool
//! with the fewest entries as its *driver*:
//!
//! ```text
//! Position: [ e0 e1 e2 e3 e4 e5 e6 e7 ]
//! Velocity: [ e5 e2 e7 ]                 <- driver (smallest)
//! Health:   [ e2 e4 e7 e0 ]
//!
//! walk e5, e2, e7  ->  test Position, Health  ->  yield e2, e7
//! ```
//!
//! The pools are borrowed mutably for the whole life of the view, so no
//! entity or component can be added or removed while a view exists.
//! Component *values* may be changed freely through the references it hands
//! out.

use std::iter::FusedIterator;

use super::component::Component;
use super::entity::Entity;
use super::pool::ComponentPool;
use super::registry::Registry;
use super::storage::{typed_mut, Storage};

mod sealed {
    pub trait Sealed {}
}

/// A set of component types that can be viewed together.
///
/// Implemented for tuples of 1 to 8 distinct [`Component`] types, e.g.
/// `(Position,)` or `(Position, Velocity)`.
pub trait Query: sealed::Sealed + 'static {
    /// Borrowed pools, one per component type.
    type Pools<'w>;
    /// Shared references to one entity's components.
    type Item<'a>;
    /// Mutable references to one entity's components.
    type ItemMut<'a>;

    /// Number of component types in the query.
    const LEN: usize;

    /// Borrows (creating if needed) the pools for every component type.
    #[doc(hidden)]
    fn fetch(registry: &mut Registry) -> Self::Pools<'_>;

    /// Length of the pool at `slot`.
    #[doc(hidden)]
    fn len_of(pools: &Self::Pools<'_>, slot: usize) -> usize;

    /// Entity stored at dense position `pos` of the pool at `slot`.
    #[doc(hidden)]
    fn entity_at(pools: &Self::Pools<'_>, slot: usize, pos: usize) -> Entity;

    /// Membership in every pool except the one at `skip`.
    #[doc(hidden)]
    fn contains_others(pools: &Self::Pools<'_>, skip: usize, entity: Entity) -> bool;

    /// Shared references to every component of `entity`.
    #[doc(hidden)]
    fn get<'a, 'w: 'a>(pools: &'a Self::Pools<'w>, entity: Entity) -> Self::Item<'a>;

    /// Mutable references to every component of `entity`.
    #[doc(hidden)]
    fn get_mut<'a, 'w: 'a>(pools: &'a mut Self::Pools<'w>, entity: Entity) -> Self::ItemMut<'a>;

    /// Finds the pool for `T` among the bound pools.
    #[doc(hidden)]
    fn find<'a, 'w: 'a, T: Component>(pools: &'a Self::Pools<'w>) -> Option<&'a ComponentPool<T>>;

    /// Mutable variant of `find`.
    #[doc(hidden)]
    fn find_mut<'a, 'w: 'a, T: Component>(
        pools: &'a mut Self::Pools<'w>,
    ) -> Option<&'a mut ComponentPool<T>>;
}

macro_rules! impl_query {
    ($len:expr; $($idx:tt $name:ident),+) => {
        impl<$($name: Component),+> sealed::Sealed for ($($name,)+) {}

        #[allow(non_snake_case)]
        impl<$($name: Component),+> Query for ($($name,)+) {
            type Pools<'w> = ($(&'w mut ComponentPool<$name>,)+);
            type Item<'a> = ($(&'a $name,)+);
            type ItemMut<'a> = ($(&'a mut $name,)+);

            const LEN: usize = $len;

            fn fetch(registry: &mut Registry) -> Self::Pools<'_> {
                let keys = [$(registry.ensure_pool::<$name>()),+];
                let [$($name),+] = registry.storages_mut(keys);
                ($(typed_mut::<$name>(&mut **$name),)+)
            }

            #[inline]
            fn len_of(pools: &Self::Pools<'_>, slot: usize) -> usize {
                match slot {
                    $($idx => pools.$idx.len(),)+
                    _ => unreachable!("view slot {slot} out of range"),
                }
            }

            #[inline]
            fn entity_at(pools: &Self::Pools<'_>, slot: usize, pos: usize) -> Entity {
                match slot {
                    $($idx => pools.$idx.entities()[pos],)+
                    _ => unreachable!("view slot {slot} out of range"),
                }
            }

            #[inline]
            fn contains_others(pools: &Self::Pools<'_>, skip: usize, entity: Entity) -> bool {
                $(($idx == skip || pools.$idx.contains(entity)))&&+
            }

            #[inline]
            fn get<'a, 'w: 'a>(pools: &'a Self::Pools<'w>, entity: Entity) -> Self::Item<'a> {
                ($(pools.$idx.get(entity),)+)
            }

            #[inline]
            fn get_mut<'a, 'w: 'a>(
                pools: &'a mut Self::Pools<'w>,
                entity: Entity,
            ) -> Self::ItemMut<'a> {
                ($(pools.$idx.get_mut(entity),)+)
            }

            fn find<'a, 'w: 'a, T: Component>(
                pools: &'a Self::Pools<'w>,
            ) -> Option<&'a ComponentPool<T>> {
                $(
                    if let Some(pool) = pools.$idx.as_any().downcast_ref::<ComponentPool<T>>() {
                        return Some(pool);
                    }
                )+
                None
            }

            fn find_mut<'a, 'w: 'a, T: Component>(
                pools: &'a mut Self::Pools<'w>,
            ) -> Option<&'a mut ComponentPool<T>> {
                $(
                    if let Some(pool) = pools.$idx.as_any_mut().downcast_mut::<ComponentPool<T>>() {
                        return Some(pool);
                    }
                )+
                None
            }
        }
    };
}

impl_query!(1; 0 A);
impl_query!(2; 0 A, 1 B);
impl_query!(3; 0 A, 1 B, 2 C);
impl_query!(4; 0 A, 1 B, 2 C, 3 D);
impl_query!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
impl_query!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_query!(7; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_query!(8; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

/// Transient query over the pools of the component types in `Q`.
///
/// Created by [`Registry::view`]. Iteration walks the driver pool (the
/// smallest one at construction) in dense order and skips entities missing
/// from any other bound pool. The order is unspecified beyond that and
/// changes after structural mutation of the registry.
///
/// # Example
///
/// ```rust
/// use tessera_core::Registry;
///
/// struct Position(i32);
/// struct Velocity(i32);
///
/// let mut registry = Registry::new();
/// for i in 0..4 {
///     let e = registry.create();
///     registry.add(e, Position(i));
///     if i % 2 == 0 {
///         registry.add(e, Velocity(1));
///     }
/// }
///
/// let mut view = registry.view::<(Position, Velocity)>();
/// assert_eq!(view.size_hint(), 2);
/// view.each(|_, (pos, vel)| pos.0 += vel.0);
/// assert_eq!(view.iter().count(), 2);
/// ```
pub struct View<'w, Q: Query> {
    /// One borrowed pool per component type.
    pools: Q::Pools<'w>,
    /// Slot of the smallest pool at construction.
    driver: usize,
}

impl<'w, Q: Query> View<'w, Q> {
    pub(super) fn new(pools: Q::Pools<'w>) -> Self {
        let mut driver = 0;
        for slot in 1..Q::LEN {
            if Q::len_of(&pools, slot) < Q::len_of(&pools, driver) {
                driver = slot;
            }
        }
        Self { pools, driver }
    }

    /// Upper bound on the number of entities the view can yield.
    ///
    /// This is the driver pool's length, not an exact count.
    #[inline]
    #[must_use]
    pub fn size_hint(&self) -> usize {
        Q::len_of(&self.pools, self.driver)
    }

    /// Checks whether `entity` has every component of the view.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        Q::contains_others(&self.pools, usize::MAX, entity)
    }

    /// Calls `f` once per entity holding every component of the view.
    ///
    /// `f` receives the entity and mutable references to its components.
    pub fn each<F>(&mut self, mut f: F)
    where
        F: FnMut(Entity, Q::ItemMut<'_>),
    {
        let len = self.size_hint();
        for pos in 0..len {
            let entity = Q::entity_at(&self.pools, self.driver, pos);
            if Q::contains_others(&self.pools, self.driver, entity) {
                f(entity, Q::get_mut(&mut self.pools, entity));
            }
        }
    }

    /// Returns a fresh cursor over the matching entities.
    ///
    /// Each call starts over from the beginning; a single cursor is
    /// single-pass.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> ViewIter<'_, 'w, Q> {
        ViewIter {
            view: self,
            pos: 0,
            end: self.size_hint(),
        }
    }

    /// Gets one component of an entity known to match the view.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not part of the view or `entity` has no `C`.
    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        match Q::find::<C>(&self.pools) {
            Some(pool) => pool.get(entity),
            None => unbound::<C>(),
        }
    }

    /// Mutable variant of [`get`](Self::get).
    ///
    /// Borrows the whole view, so only one component can be held at a time.
    /// For several at once, destructure [`get_all_mut`](Self::get_all_mut).
    ///
    /// # Panics
    ///
    /// Panics if `C` is not part of the view or `entity` has no `C`.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        match Q::find_mut::<C>(&mut self.pools) {
            Some(pool) => pool.get_mut(entity),
            None => unbound::<C>(),
        }
    }

    /// Gets one component of `entity`, or `None` if it has none or `C` is
    /// not part of the view.
    #[must_use]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        Q::find::<C>(&self.pools)?.try_get(entity)
    }

    /// Gets every component of an entity known to match the view.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lacks any of the components.
    #[must_use]
    pub fn get_all(&self, entity: Entity) -> Q::Item<'_> {
        Q::get(&self.pools, entity)
    }

    /// Mutable variant of [`get_all`](Self::get_all).
    ///
    /// The references are disjoint, so any subset can be kept:
    ///
    /// ```rust
    /// use tessera_core::Registry;
    ///
    /// struct Position(i32);
    /// struct Velocity(i32);
    /// struct Health(u32);
    ///
    /// let mut registry = Registry::new();
    /// let e = registry.create();
    /// registry.add(e, Position(0));
    /// registry.add(e, Velocity(3));
    /// registry.add(e, Health(10));
    ///
    /// let mut view = registry.view::<(Position, Velocity, Health)>();
    /// let (pos, _, health) = view.get_all_mut(e);
    /// pos.0 += 1;
    /// health.0 -= 1;
    /// assert_eq!(view.get::<Health>(e).0, 9);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `entity` lacks any of the components.
    pub fn get_all_mut(&mut self, entity: Entity) -> Q::ItemMut<'_> {
        Q::get_mut(&mut self.pools, entity)
    }
}

impl<'v, 'w, Q: Query> IntoIterator for &'v View<'w, Q> {
    type Item = Entity;
    type IntoIter = ViewIter<'v, 'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward cursor over the entities of a [`View`].
///
/// Filters lazily, one driver entry at a time.
pub struct ViewIter<'v, 'w, Q: Query> {
    view: &'v View<'w, Q>,
    pos: usize,
    end: usize,
}

impl<Q: Query> Iterator for ViewIter<'_, '_, Q> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        let view = self.view;
        while self.pos < self.end {
            let entity = Q::entity_at(&view.pools, view.driver, self.pos);
            self.pos += 1;
            if Q::contains_others(&view.pools, view.driver, entity) {
                return Some(entity);
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.pos))
    }
}

impl<Q: Query> FusedIterator for ViewIter<'_, '_, Q> {}

#[cold]
#[inline(never)]
#[track_caller]
fn unbound<C>() -> ! {
    panic!(
        "component `{}` is not part of this view",
        std::any::type_name::<C>()
    )
}
