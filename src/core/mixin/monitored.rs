/*!
 * Monitored Values
 *
 * A value bundled with the monitor that guards it
 */

use crate::core::guard::{Guard, MonitorGuard};
use crate::core::sync::{ConditionVariable, Lockable, LockCore, Monitor, MonitorConfig};
use crate::core::types::ContextId;
use std::fmt;
use std::ops::Deref;

/// A value that can only be reached through its own monitor
///
/// The lock is reentrant, so access is shared (`&T`) even while locked:
/// two nested `lock` calls from one context would otherwise alias a
/// `&mut T`. Mutate through interior mutability (`Cell`, `RefCell`, ...).
///
/// Contexts are plain values and any thread may present any of them, so the
/// monitor alone cannot prove which thread is inside. `Monitored<T>` is
/// therefore only `Sync` when `T` is: single-threaded hosts can use `Cell`
/// or `RefCell`, shared ones need atomics or a `Mutex` inside.
///
/// ```compile_fail
/// use monitor_sync::Monitored;
/// use std::cell::Cell;
/// use std::sync::Arc;
///
/// let shared = Arc::new(Monitored::new(Cell::new(0u64)));
/// let other = shared.clone();
/// std::thread::spawn(move || other.is_locked());
/// ```
///
/// # Example
///
/// ```
/// use monitor_sync::{ContextId, Monitored};
/// use std::cell::RefCell;
///
/// let queue = Monitored::new(RefCell::new(Vec::new()));
/// let ctx = ContextId::current();
///
/// queue.synchronize(ctx, |q| q.borrow_mut().push(1));
/// assert_eq!(queue.synchronize(ctx, |q| q.borrow().len()), 1);
/// ```
pub struct Monitored<T> {
    monitor: Monitor,
    value: T,
}

impl<T> Monitored<T> {
    pub fn new(value: T) -> Self {
        Self::with_config(value, MonitorConfig::default())
    }

    pub fn with_config(value: T, config: MonitorConfig) -> Self {
        Self {
            monitor: Monitor::with_config(config),
            value,
        }
    }

    /// Acquire and borrow the value until the guard drops
    pub fn lock(&self, ctx: ContextId) -> MonitoredGuard<'_, T> {
        MonitoredGuard {
            guard: self.monitor.lock(ctx),
            value: &self.value,
        }
    }

    /// Non-blocking [`Monitored::lock`]
    pub fn try_lock(&self, ctx: ContextId) -> Option<MonitoredGuard<'_, T>> {
        self.monitor.try_lock(ctx).map(|guard| MonitoredGuard {
            guard,
            value: &self.value,
        })
    }

    /// Run `body` on the value inside the critical section
    pub fn synchronize<F, R>(&self, ctx: ContextId, body: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.lock(ctx);
        body(&guard)
    }

    /// New condition variable bound to this value's monitor
    pub fn new_condition(&self) -> ConditionVariable {
        self.monitor.new_condition()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.monitor.is_locked()
    }

    #[inline]
    pub fn is_owned(&self, ctx: ContextId) -> bool {
        self.monitor.is_owned(ctx)
    }

    /// The underlying lock core, for manual `enter`/`exit`
    #[inline]
    pub fn lock_core(&self) -> &LockCore {
        self.monitor.lock_core()
    }

    /// Exclusive access without locking; `&mut self` proves no one else holds it
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Default for Monitored<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Monitored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Monitored");
        d.field("monitor", &self.monitor);
        match self.try_lock(ContextId::current()) {
            Some(guard) => d.field("value", &&*guard),
            None => d.field("value", &format_args!("<locked>")),
        };
        d.finish()
    }
}

/// Shared access to a [`Monitored`] value while its monitor is held
#[must_use = "the monitor is released as soon as the guard is dropped"]
pub struct MonitoredGuard<'a, T> {
    guard: MonitorGuard<'a>,
    value: &'a T,
}

impl<'a, T> MonitoredGuard<'a, T> {
    #[inline]
    pub fn context(&self) -> ContextId {
        self.guard.context()
    }

    /// Whether the underlying acquisition is still held
    #[inline]
    pub fn is_active(&self) -> bool {
        self.guard.is_active()
    }
}

impl<T> Deref for MonitoredGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.value
    }
}
