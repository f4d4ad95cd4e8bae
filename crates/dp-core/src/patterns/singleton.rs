//! Singleton pattern with lazy, thread-safe construction and explicit teardown.
//!
//! A [`Holder<T>`] is the process-wide slot for the one instance of `T`.  It
//! starts empty, is filled by the first accessor call, and is emptied again by
//! [`Holder::teardown`].  Unlike `std::sync::LazyLock` the slot can be reset,
//! which lets a program release the instance (closing files, flushing
//! buffers) at a well-defined point instead of never.
//!
//! | Classic singleton | Rust |
//! |-------------------|------|
//! | `static T* instance = nullptr` | `static HOLDER: Holder<T> = Holder::new()` |
//! | `if (!instance) instance = new T` | [`Holder::get_or_init`] (under the slot lock) |
//! | `std::atexit(cleanup)` | [`Holder::scope`] guard held by `main` |
//! | `delete instance; instance = nullptr` | [`Holder::teardown`] |
//!
//! Construction runs while the slot lock is held, so concurrent first
//! callers never build two instances.
//!
//! Teardown only drops the holder's own reference.  While a caller still
//! owns an `Arc` from an earlier accessor call the instance stays alive, and
//! the next accessor call re-adopts it instead of building a second one: at
//! most one instance of `T` is ever alive per holder.
//!
//! # Example
//! ```
//! use dp_core::patterns::singleton::Holder;
//!
//! struct Registry { names: Vec<&'static str> }
//! static REGISTRY: Holder<Registry> = Holder::new();
//!
//! let _scope = REGISTRY.scope();
//! let a = REGISTRY.get_or_init(|| Registry { names: vec!["a"] });
//! let b = REGISTRY.get_or_init(|| unreachable!());
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! assert_eq!(a.names, ["a"]);
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::debug;

/// Process-wide slot holding at most one shared instance of `T`.
pub struct Holder<T> {
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    live: Option<Arc<T>>,
    // The instance most recently torn down; upgradable while callers still
    // hold handles to it.
    retired: Weak<T>,
}

impl<T> Holder<T> {
    /// Create an empty holder.  `const` so it can initialise a `static`.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                live: None,
                retired: Weak::new(),
            }),
        }
    }

    // A panic while the lock is held cannot leave the slot half-written, so a
    // poisoned slot is still consistent.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the shared instance, constructing it with `init` if none is
    /// alive.
    pub fn get_or_init<F>(&self, init: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(init())) {
            Ok(instance) => instance,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_init`][Self::get_or_init].
    ///
    /// If `init` fails the slot stays empty and the error is returned; the
    /// next call will try to construct again.  `init` is not called when a
    /// torn-down instance is still referenced elsewhere; that instance is put
    /// back in the slot instead.
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut slot = self.lock();
        if let Some(instance) = slot.live.as_ref() {
            return Ok(Arc::clone(instance));
        }
        let instance = match slot.retired.upgrade() {
            Some(instance) => {
                debug!("re-adopted live singleton {}", type_name::<T>());
                instance
            }
            None => {
                let instance = Arc::new(init()?);
                debug!("constructed singleton {}", type_name::<T>());
                instance
            }
        };
        slot.retired = Weak::new();
        slot.live = Some(Arc::clone(&instance));
        Ok(instance)
    }

    /// Return the instance if the slot currently holds one.
    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().live.clone()
    }

    /// Return `true` if the slot currently holds an instance.
    pub fn is_initialized(&self) -> bool {
        self.lock().live.is_some()
    }

    /// Return `true` if an instance is alive, either in the slot or torn down
    /// but still referenced by a caller.
    pub fn is_alive(&self) -> bool {
        let slot = self.lock();
        slot.live.is_some() || slot.retired.strong_count() > 0
    }

    /// Empty the slot, dropping the holder's reference to the instance.
    ///
    /// Returns `true` if an instance was present.  Calling it on an empty
    /// slot is a no-op.  The instance itself is destroyed once the last
    /// outstanding `Arc` handed out by the accessor is dropped.
    pub fn teardown(&self) -> bool {
        let taken = {
            let mut slot = self.lock();
            let taken = slot.live.take();
            if let Some(instance) = taken.as_ref() {
                slot.retired = Arc::downgrade(instance);
            }
            taken
        };
        // Drop outside the lock: `T::drop` may be slow (closing a file).
        match taken {
            Some(instance) => {
                debug!(
                    "tearing down singleton {} ({} outstanding handle(s))",
                    type_name::<T>(),
                    Arc::strong_count(&instance) - 1
                );
                drop(instance);
                true
            }
            None => false,
        }
    }

    /// Tie the lifetime of the instance to a scope.
    ///
    /// The returned guard calls [`teardown`][Self::teardown] when dropped,
    /// on every exit path of the enclosing scope.
    #[must_use = "the singleton is torn down as soon as the scope guard is dropped"]
    pub fn scope(&self) -> SingletonScope<'_, T> {
        SingletonScope { holder: self }
    }
}

impl<T> Default for Holder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Holder")
            .field("type", &type_name::<T>())
            .field("initialized", &self.is_initialized())
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Scope guard returned by [`Holder::scope`].
pub struct SingletonScope<'a, T> {
    holder: &'a Holder<T>,
}

impl<T> Drop for SingletonScope<'_, T> {
    fn drop(&mut self) {
        self.holder.teardown();
    }
}

impl<T> fmt::Debug for SingletonScope<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SingletonScope").field(self.holder).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    struct Tracked<'a> {
        drops: &'a AtomicUsize,
    }

    impl Drop for Tracked<'_> {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn starts_empty() {
        let holder: Holder<u32> = Holder::new();
        assert!(!holder.is_initialized());
        assert!(holder.get().is_none());
    }

    #[test]
    fn init_runs_once() {
        let builds = AtomicUsize::new(0);
        let holder = Holder::new();
        let a = holder.get_or_init(|| {
            builds.fetch_add(1, Ordering::SeqCst);
            5_u32
        });
        let b = holder.get_or_init(|| {
            builds.fetch_add(1, Ordering::SeqCst);
            6_u32
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 5);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let holder: Holder<u32> = Holder::new();
        let err = holder.get_or_try_init(|| Err("nope")).unwrap_err();
        assert_eq!(err, "nope");
        assert!(!holder.is_initialized());
        let v = holder.get_or_try_init(|| Ok::<_, &str>(3)).unwrap();
        assert_eq!(*v, 3);
    }

    #[test]
    fn teardown_is_idempotent() {
        let drops = AtomicUsize::new(0);
        let holder = Holder::new();
        holder.get_or_init(|| Tracked { drops: &drops });
        assert!(holder.teardown());
        assert!(!holder.teardown());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!holder.is_initialized());
    }

    #[test]
    fn teardown_waits_for_outstanding_handles() {
        let drops = AtomicUsize::new(0);
        let holder = Holder::new();
        let handle = holder.get_or_init(|| Tracked { drops: &drops });
        holder.teardown();
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(handle);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reinitialises_after_teardown() {
        let holder = Holder::new();
        drop(holder.get_or_init(|| 1_u8));
        holder.teardown();
        assert!(!holder.is_alive());
        let second = holder.get_or_init(|| 2_u8);
        assert_eq!(*second, 2);
    }

    #[test]
    fn handle_held_across_teardown_is_readopted() {
        let drops = AtomicUsize::new(0);
        let builds = AtomicUsize::new(0);
        let holder = Holder::new();
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            Tracked { drops: &drops }
        };

        let old = holder.get_or_init(build);
        assert!(holder.teardown());
        assert!(!holder.is_initialized());
        assert!(holder.is_alive());

        let new = holder.get_or_init(build);
        assert!(Arc::ptr_eq(&old, &new));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(holder.is_initialized());

        drop((old, new));
        holder.teardown();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!holder.is_alive());
    }

    #[test]
    fn scope_tears_down_on_drop() {
        let drops = AtomicUsize::new(0);
        let holder = Holder::new();
        {
            let _scope = holder.scope();
            holder.get_or_init(|| Tracked { drops: &drops });
            assert!(holder.is_initialized());
        }
        assert!(!holder.is_initialized());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scope_tears_down_on_panic() {
        let holder: Holder<u32> = Holder::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = holder.scope();
            holder.get_or_init(|| 1);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!holder.is_initialized());
    }

    #[test]
    fn concurrent_first_callers_build_once() {
        const THREADS: usize = 16;
        let builds = AtomicUsize::new(0);
        let holder: Holder<usize> = Holder::new();
        let barrier = Barrier::new(THREADS);

        let instances: Vec<Arc<usize>> = thread::scope(|s| {
            let workers: Vec<_> = (0..THREADS)
                .map(|i| {
                    let (holder, builds, barrier) = (&holder, &builds, &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        holder.get_or_init(|| {
                            builds.fetch_add(1, Ordering::SeqCst);
                            i
                        })
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
