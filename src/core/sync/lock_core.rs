/*!
 * Lock Core
 *
 * Reentrant monitor lock with explicit owner tracking.
 *
 * # Design: Owner Record Under a Short Mutex
 *
 * The logical monitor lock is an `(owner, depth)` record guarded by a
 * `parking_lot::Mutex` that is only ever held for a few instructions. The
 * monitor itself can stay "held" across arbitrary user code without holding
 * that mutex, which is what lets `enter`/`exit` be called as separate
 * operations and lets condition variables release and reacquire it.
 *
 * - `released` is signalled whenever depth drops to zero
 * - Condition variables park on their own `Condvar` against the same record
 *   mutex, so release-and-block is atomic with respect to `signal`
 * - Reentrancy is depth + owner only, no recursive OS mutex
 */

use super::config::MonitorConfig;
use super::spinwait::Backoff;
use crate::core::errors::{MonitorError, MonitorResult};
use crate::core::guard::MonitorGuard;
use crate::core::types::{ContextId, MonitorId};
use crate::monitoring::{WaitKind, WaitSpan};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Owner and reentrancy depth. `depth > 0` iff `owner.is_some()`.
#[derive(Debug, Default)]
struct OwnerRecord {
    owner: Option<ContextId>,
    depth: usize,
}

impl OwnerRecord {
    #[inline]
    fn claim(&mut self, ctx: ContextId, depth: usize) {
        debug_assert!(self.owner.is_none() && self.depth == 0);
        self.owner = Some(ctx);
        self.depth = depth;
    }

    #[inline]
    fn violation(&self, caller: ContextId) -> MonitorError {
        MonitorError::OwnershipViolation {
            caller,
            owner: self.owner,
        }
    }
}

/// Reentrant lock with owner tracking
///
/// The building block shared by [`Monitor`](super::Monitor), the
/// attachment layer and every [`ConditionVariable`](super::ConditionVariable)
/// created from them (always through an `Arc<LockCore>`).
///
/// # Example
///
/// ```
/// use monitor_sync::{ContextId, LockCore};
///
/// let core = LockCore::new();
/// let ctx = ContextId::current();
///
/// core.enter(ctx);
/// core.enter(ctx); // reentrant, does not block
/// assert_eq!(core.depth(), 2);
/// core.exit(ctx).unwrap();
/// core.exit(ctx).unwrap();
/// assert!(!core.is_locked());
/// ```
pub struct LockCore {
    id: MonitorId,
    record: Mutex<OwnerRecord>,
    released: Condvar,
    config: MonitorConfig,
}

impl LockCore {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        let id = MonitorId::next();
        trace!(monitor = %id, spin_limit = config.spin_limit, "lock core created");
        Self {
            id,
            record: Mutex::new(OwnerRecord::default()),
            released: Condvar::new(),
            config,
        }
    }

    #[inline]
    pub fn id(&self) -> MonitorId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Acquire without blocking
    ///
    /// Succeeds if the lock is free or already owned by `ctx`. Returns
    /// `false` with no state change if another context owns it.
    pub fn try_enter(&self, ctx: ContextId) -> bool {
        let mut record = self.record.lock();
        match record.owner {
            Some(owner) if owner == ctx => {
                record.depth += 1;
                trace!(monitor = %self.id, context = %ctx, depth = record.depth, "monitor re-entered");
                true
            }
            Some(_) => false,
            None => {
                record.claim(ctx, 1);
                trace!(monitor = %self.id, context = %ctx, "monitor acquired");
                true
            }
        }
    }

    /// Acquire, blocking while another context owns the lock
    ///
    /// Reentrant: if `ctx` already owns the lock the depth is bumped and the
    /// call returns immediately.
    pub fn enter(&self, ctx: ContextId) {
        if self.try_enter(ctx) {
            return;
        }

        let mut backoff = Backoff::new(self.config.spin_limit);
        while backoff.snooze() {
            if self.try_enter(ctx) {
                return;
            }
        }

        let span = WaitSpan::new(
            WaitKind::Acquire,
            self.id,
            ctx,
            self.config.slow_acquire_threshold,
        );
        debug!(monitor = %self.id, context = %ctx, "monitor contended, parking");

        let mut record = self.record.lock();
        self.park_until_free(&mut record);
        record.claim(ctx, 1);
        drop(record);
        drop(span);
    }

    /// Release one level of acquisition
    ///
    /// Fails with `OwnershipViolation`, leaving the state untouched, unless
    /// `ctx` owns the lock. Wakes one blocked `enter` when the depth reaches 0.
    pub fn exit(&self, ctx: ContextId) -> MonitorResult<()> {
        let mut record = self.record.lock();
        if record.owner != Some(ctx) {
            let err = record.violation(ctx);
            drop(record);
            warn!(monitor = %self.id, error = %err, "exit by non-owner");
            return Err(err);
        }

        record.depth -= 1;
        if record.depth == 0 {
            record.owner = None;
            drop(record);
            self.released.notify_one();
            trace!(monitor = %self.id, context = %ctx, "monitor released");
        } else {
            trace!(monitor = %self.id, context = %ctx, depth = record.depth, "monitor exited one level");
        }
        Ok(())
    }

    /// Fail unless `ctx` owns the lock
    pub fn check_owner(&self, ctx: ContextId) -> MonitorResult<()> {
        let record = self.record.lock();
        self.check_record(&record, ctx)
    }

    /// Locked by any context
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.record.lock().depth > 0
    }

    /// Locked by `ctx`
    #[inline]
    pub fn is_owned(&self, ctx: ContextId) -> bool {
        self.record.lock().owner == Some(ctx)
    }

    /// Current owner, if any
    #[inline]
    pub fn owner(&self) -> Option<ContextId> {
        self.record.lock().owner
    }

    /// Current reentrancy depth (0 when unlocked)
    #[inline]
    pub fn depth(&self) -> usize {
        self.record.lock().depth
    }

    /// Acquire and return a guard that exits on drop
    pub fn lock(&self, ctx: ContextId) -> MonitorGuard<'_> {
        self.enter(ctx);
        MonitorGuard::acquired(self, ctx)
    }

    /// Non-blocking [`LockCore::lock`]
    pub fn try_lock(&self, ctx: ContextId) -> Option<MonitorGuard<'_>> {
        if self.try_enter(ctx) {
            Some(MonitorGuard::acquired(self, ctx))
        } else {
            None
        }
    }

    /// Run `body` inside the critical section
    ///
    /// The lock is released on every exit path of `body`, including panics.
    /// A `Result` returned by `body` is passed through after release.
    pub fn synchronize<F, R>(&self, ctx: ContextId, body: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.lock(ctx);
        body()
    }

    /// Release the lock, block on `cond`, then reacquire with the saved depth
    ///
    /// The record mutex is held from the owner check until `cond` parks the
    /// thread, and `signal`/`broadcast` must take the same mutex for their
    /// own owner check, so no notification can slip in between.
    pub(crate) fn wait_on(
        &self,
        ctx: ContextId,
        cond: &Condvar,
        timeout: Option<Duration>,
    ) -> MonitorResult<()> {
        let mut record = self.record.lock();
        self.check_record(&record, ctx)?;

        let span = WaitSpan::new(
            WaitKind::Condition,
            self.id,
            ctx,
            self.config.slow_acquire_threshold,
        );

        let depth = record.depth;
        record.owner = None;
        record.depth = 0;
        self.released.notify_one();
        trace!(monitor = %self.id, context = %ctx, depth, "monitor released for wait");

        match timeout {
            Some(timeout) => {
                if cond.wait_for(&mut record, timeout).timed_out() {
                    trace!(monitor = %self.id, context = %ctx, "condition wait timed out");
                }
            }
            None => cond.wait(&mut record),
        }

        self.park_until_free(&mut record);
        record.claim(ctx, depth);
        drop(record);
        drop(span);
        Ok(())
    }

    fn check_record(&self, record: &OwnerRecord, ctx: ContextId) -> MonitorResult<()> {
        if record.owner == Some(ctx) {
            Ok(())
        } else {
            let err = record.violation(ctx);
            warn!(monitor = %self.id, error = %err, "operation requires monitor ownership");
            Err(err)
        }
    }

    fn park_until_free(&self, record: &mut MutexGuard<'_, OwnerRecord>) {
        while record.owner.is_some() {
            self.released.wait(record);
        }
    }
}

impl Default for LockCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record.lock();
        f.debug_struct("LockCore")
            .field("id", &self.id)
            .field("owner", &record.owner)
            .field("depth", &record.depth)
            .finish()
    }
}
