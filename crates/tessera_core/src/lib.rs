//! # Tessera Core
//!
//! Sparse-set Entity Component System designed for:
//! - Millions of attach/detach/iterate operations per frame
//! - O(1) membership tests and swap-removal
//! - Contiguous, cache-friendly component arrays
//!
//! ## Architecture
//!
//! 1. **Entities** are 32-bit handles packing a slot index and a generation
//! 2. **Sparse sets** map entity indices to positions in a dense array
//! 3. **Component pools** keep a payload array in lockstep with that dense array
//! 4. **The registry** owns every pool (type-erased) and the entity slot table
//! 5. **Views** iterate the smallest bound pool and filter by the others
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::Registry;
//!
//! #[derive(Debug, PartialEq)]
//! struct Position(f32);
//! struct Velocity(f32);
//!
//! let mut registry = Registry::new();
//! let e = registry.create();
//! registry.add(e, Position(0.0));
//! registry.add(e, Velocity(2.0));
//!
//! registry.each::<(Position, Velocity), _>(|_, (pos, vel)| pos.0 += vel.0);
//! assert_eq!(registry.get::<Position>(e), &Position(2.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod sync;

pub use config::{GenerationPolicy, RegistryConfig};
pub use ecs::{
    Component, ComponentPool, Entity, Query, Registry, SparseSet, Storage, SwapListener, View,
    ViewIter,
};
pub use error::{EcsError, EcsResult};
pub use sync::SharedRegistry;
