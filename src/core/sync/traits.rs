/*!
 * Lockable Trait
 *
 * Uniform lock surface over anything backed by a lock core.
 *
 * # Design: One Required Method
 *
 * Implementors only say where their [`LockCore`] lives. Every operation is a
 * provided method forwarding to it, so the facade, the attachment layer and
 * the core itself expose exactly the same semantics.
 */

use super::lock_core::LockCore;
use crate::core::errors::MonitorResult;
use crate::core::guard::MonitorGuard;
use crate::core::types::ContextId;

/// Types that expose a reentrant monitor lock
pub trait Lockable {
    /// The lock core backing this object
    ///
    /// Lazily-initialized implementors create it here on first use.
    fn lock_core(&self) -> &LockCore;

    /// Blocking, reentrant acquire
    #[inline]
    fn enter(&self, ctx: ContextId) {
        self.lock_core().enter(ctx)
    }

    /// Release one level; `OwnershipViolation` unless `ctx` owns the lock
    #[inline]
    fn exit(&self, ctx: ContextId) -> MonitorResult<()> {
        self.lock_core().exit(ctx)
    }

    /// Non-blocking acquire
    #[inline]
    fn try_enter(&self, ctx: ContextId) -> bool {
        self.lock_core().try_enter(ctx)
    }

    #[inline]
    fn check_owner(&self, ctx: ContextId) -> MonitorResult<()> {
        self.lock_core().check_owner(ctx)
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.lock_core().is_locked()
    }

    #[inline]
    fn is_owned(&self, ctx: ContextId) -> bool {
        self.lock_core().is_owned(ctx)
    }

    /// Acquire and return a guard that releases on drop
    #[inline]
    fn lock(&self, ctx: ContextId) -> MonitorGuard<'_> {
        self.lock_core().lock(ctx)
    }

    #[inline]
    fn try_lock(&self, ctx: ContextId) -> Option<MonitorGuard<'_>> {
        self.lock_core().try_lock(ctx)
    }

    /// Run `body` with the lock held, releasing on every exit path
    #[inline]
    fn synchronize<F, R>(&self, ctx: ContextId, body: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.lock_core().synchronize(ctx, body)
    }
}

impl Lockable for LockCore {
    #[inline]
    fn lock_core(&self) -> &LockCore {
        self
    }
}
