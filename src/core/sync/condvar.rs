/*!
 * Monitor Condition Variable
 *
 * Wait/signal bound to one lock core, built on parking_lot::Condvar
 */

use super::lock_core::LockCore;
use crate::core::errors::MonitorResult;
use crate::core::types::{ContextId, MonitorId};
use parking_lot::Condvar;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Condition variable tied to a single [`LockCore`]
///
/// Every operation requires the caller to own the lock core; otherwise it
/// fails with `OwnershipViolation` instead of risking a lost wakeup.
/// Several condition variables may share one lock core, and they all share
/// its exclusion: at most one context is inside the critical section.
///
/// Wake order among waiters is unspecified. Waiters must re-check their
/// predicate after `wait` returns; [`ConditionVariable::wait_while`] and
/// [`ConditionVariable::wait_until`] do this for you.
pub struct ConditionVariable {
    core: Arc<LockCore>,
    cond: Condvar,
}

impl ConditionVariable {
    pub(crate) fn new(core: Arc<LockCore>) -> Self {
        Self {
            core,
            cond: Condvar::new(),
        }
    }

    /// Id of the lock core this condition is bound to
    #[inline]
    pub fn monitor_id(&self) -> MonitorId {
        self.core.id()
    }

    /// Release the monitor, wait for a signal, then reacquire
    ///
    /// With `Some(timeout)` the call also returns once the timeout elapses.
    /// Either way the monitor is held again, at the caller's previous
    /// reentrancy depth, when this returns `Ok`. A timeout is not reported;
    /// re-check the predicate instead.
    pub fn wait(&self, ctx: ContextId, timeout: Option<Duration>) -> MonitorResult<()> {
        self.core.wait_on(ctx, &self.cond, timeout)
    }

    /// Wait repeatedly while `predicate` holds
    ///
    /// The predicate is checked before the first wait and after every wake.
    pub fn wait_while<F>(&self, ctx: ContextId, mut predicate: F) -> MonitorResult<()>
    where
        F: FnMut() -> bool,
    {
        while predicate() {
            self.wait(ctx, None)?;
        }
        Ok(())
    }

    /// Wait repeatedly until `predicate` holds
    pub fn wait_until<F>(&self, ctx: ContextId, mut predicate: F) -> MonitorResult<()>
    where
        F: FnMut() -> bool,
    {
        while !predicate() {
            self.wait(ctx, None)?;
        }
        Ok(())
    }

    /// Wake at most one waiter
    ///
    /// Not remembered if nobody is waiting.
    pub fn signal(&self, ctx: ContextId) -> MonitorResult<()> {
        self.core.check_owner(ctx)?;
        let woken = self.cond.notify_one();
        trace!(monitor = %self.core.id(), context = %ctx, woken, "condition signalled");
        Ok(())
    }

    /// Wake every current waiter
    ///
    /// They reacquire the monitor one at a time.
    pub fn broadcast(&self, ctx: ContextId) -> MonitorResult<()> {
        self.core.check_owner(ctx)?;
        let woken = self.cond.notify_all();
        trace!(monitor = %self.core.id(), context = %ctx, woken, "condition broadcast");
        Ok(())
    }
}

impl fmt::Debug for ConditionVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionVariable")
            .field("monitor", &self.core.id())
            .finish()
    }
}
