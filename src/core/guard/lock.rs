/*!
 * Monitor Guard
 *
 * Scoped acquisition of a lock core, released on drop
 */

use super::traits::{Guard, GuardDrop};
use super::{GuardError, GuardMetadata, GuardResult};
use crate::core::sync::LockCore;
use crate::core::types::{ContextId, MonitorId};
use std::fmt;
use tracing::{error, trace};

/// One acquisition of a [`LockCore`], held by one context
///
/// Created by `lock`/`try_lock` on anything [`Lockable`](crate::Lockable).
/// Dropping the guard performs the matching `exit`, so it fires on early
/// return and while unwinding from a panic. Nested guards from the same
/// context stack like nested `enter` calls.
#[must_use = "the monitor is released as soon as the guard is dropped"]
pub struct MonitorGuard<'a> {
    core: &'a LockCore,
    metadata: GuardMetadata,
    active: bool,
}

impl<'a> MonitorGuard<'a> {
    /// Wrap an acquisition the caller already made with `enter`/`try_enter`
    pub(crate) fn acquired(core: &'a LockCore, ctx: ContextId) -> Self {
        Self {
            core,
            metadata: GuardMetadata::new("monitor", core.id(), ctx),
            active: true,
        }
    }

    /// Context that owns this acquisition
    #[inline]
    pub fn context(&self) -> ContextId {
        self.metadata.context
    }

    #[inline]
    pub fn monitor(&self) -> MonitorId {
        self.metadata.monitor
    }

    /// The lock core this guard holds
    #[inline]
    pub fn core(&self) -> &'a LockCore {
        self.core
    }
}

impl Guard for MonitorGuard<'_> {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }
        self.core.exit(self.metadata.context)?;
        self.active = false;
        Ok(())
    }
}

impl GuardDrop for MonitorGuard<'_> {
    fn on_drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        trace!(
            monitor = %self.metadata.monitor,
            context = %self.metadata.context,
            held_us = self.metadata.lifetime_micros(),
            "monitor guard dropped"
        );

        // Only fails if the body exited the monitor behind the guard's back
        if let Err(e) = self.core.exit(self.metadata.context) {
            error!(
                monitor = %self.metadata.monitor,
                context = %self.metadata.context,
                error = %e,
                "monitor guard could not release its acquisition"
            );
        }
    }
}

impl Drop for MonitorGuard<'_> {
    fn drop(&mut self) {
        self.on_drop();
    }
}

impl fmt::Debug for MonitorGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorGuard")
            .field("monitor", &self.metadata.monitor)
            .field("context", &self.metadata.context)
            .field("active", &self.active)
            .finish()
    }
}
