//! A process-wide counter reachable only through [`Counter::instance`].
//!
//! ```
//! use dp_creational::Counter;
//!
//! let _scope = Counter::scope();
//! Counter::instance().increment();
//! Counter::instance().increment();
//! assert_eq!(Counter::instance().value(), 2);
//! Counter::instance().decrement();
//! assert_eq!(Counter::instance().value(), 1);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dp_core::{Holder, SingletonScope};
use log::{debug, trace};

static INSTANCE: Holder<Counter> = Holder::new();

/// Counter singleton.  Starts at zero.
#[derive(Debug)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    fn new() -> Self {
        debug!("Counter::new");
        Self {
            value: AtomicI64::new(0),
        }
    }

    /// Return the shared instance, constructing it on the first call.
    pub fn instance() -> Arc<Counter> {
        INSTANCE.get_or_init(Counter::new)
    }

    /// Return `true` if the instance has been constructed and not yet torn
    /// down.
    pub fn is_initialized() -> bool {
        INSTANCE.is_initialized()
    }

    /// Release the shared instance.  No-op if there is none.
    pub fn teardown() -> bool {
        INSTANCE.teardown()
    }

    /// Tie the instance's lifetime to the returned guard.
    #[must_use = "the counter is torn down as soon as the scope guard is dropped"]
    pub fn scope() -> SingletonScope<'static, Counter> {
        INSTANCE.scope()
    }

    /// Add one.
    pub fn increment(&self) {
        let now = self.value.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("Counter::increment -> {now}");
    }

    /// Subtract one.
    pub fn decrement(&self) {
        let now = self.value.fetch_sub(1, Ordering::SeqCst) - 1;
        trace!("Counter::decrement -> {now}");
    }

    /// Current value.
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        debug!("Counter::drop (value {})", self.value());
    }
}
