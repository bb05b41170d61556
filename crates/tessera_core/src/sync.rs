//! # Shared Registry Access
//!
//! A [`Registry`] has no internal synchronization. Callers that need one
//! registry on several threads serialize access through a lock:
//!
//! ```text
//! Thread 1 (simulation): lock -> create/add/each -> unlock
//! Thread 2 (render):     lock -> view/iter       -> unlock
//! ```
//!
//! Views and component references never outlive the guard they came from,
//! so the borrow checker keeps them inside the locked region.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::RegistryConfig;
use crate::ecs::Registry;

/// Cloneable, thread-safe handle to a registry behind a mutex.
///
/// # Example
///
/// ```rust
/// use tessera_core::SharedRegistry;
///
/// let shared = SharedRegistry::new();
/// let worker = shared.clone();
/// std::thread::spawn(move || {
///     worker.with(|registry| {
///         let e = registry.create();
///         registry.add(e, 1u32);
///     });
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared.lock().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Creates a shared, empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_registry(Registry::new())
    }

    /// Creates a shared, empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::from_registry(Registry::with_config(config))
    }

    /// Wraps an existing registry.
    #[must_use]
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Locks the registry, blocking until it is available.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }

    /// Locks the registry without blocking, or returns `None` if it is held.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Registry>> {
        self.inner.try_lock()
    }

    /// Runs `f` with exclusive access to the registry.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    struct Marker;

    #[test]
    fn test_concurrent_creation() {
        let shared = SharedRegistry::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        shared.with(|registry| {
                            let e = registry.create();
                            registry.add(e, Marker);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut registry = shared.lock();
        assert_eq!(registry.len(), 1000);
        assert_eq!(registry.view::<(Marker,)>().iter().count(), 1000);
    }

    #[test]
    fn test_try_lock_while_held() {
        let shared = SharedRegistry::new();
        let guard = shared.lock();
        assert!(shared.try_lock().is_none());
        drop(guard);
        assert!(shared.try_lock().is_some());
    }
}
