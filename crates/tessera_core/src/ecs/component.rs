//! # Component Marker
//!
//! Components are plain data attached to entities. Any owned, thread-safe
//! type qualifies; there is nothing to register up front.

/// Marker trait for ECS components.
///
/// Components must be:
/// - `'static`: pools are stored type-erased and recovered by downcast
/// - `Send + Sync`: a registry may be handed between threads behind a lock
///
/// Payloads are moved during swap-removal, so they must not depend on their
/// own storage address or dense position staying fixed.
///
/// Implemented automatically for every qualifying type.
///
/// # Example
///
/// ```rust
/// use tessera_core::Component;
///
/// #[derive(Clone, Copy, Default)]
/// struct Health(u32);
///
/// fn assert_component<C: Component>() {}
/// assert_component::<Health>();
/// ```
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}
