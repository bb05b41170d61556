//! # Entity Component System
//!
//! Sparse-set storage with generational entity handles.
//!
//! ## Design Philosophy
//!
//! - Each component type lives in its own pool of dense, contiguous arrays
//! - Membership is an O(1) lookup through a sparse index table
//! - Removal swaps with the last element instead of shifting
//! - Queries drive iteration from the smallest participating pool

mod component;
pub mod entity;
mod pool;
mod registry;
mod sparse_set;
mod storage;
mod view;

pub use component::Component;
pub use entity::Entity;
pub use pool::ComponentPool;
pub use registry::Registry;
pub use sparse_set::{SparseSet, SwapListener};
pub use storage::Storage;
pub use view::{Query, View, ViewIter};
