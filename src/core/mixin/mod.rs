/*!
 * Attachment Layer
 *
 * Gives monitor capability to host objects that were not built as a
 * `Monitor`.
 *
 * Two shapes:
 *
 * - **`MonitorMixin`**: the host keeps a `MonitorState` field and gets the
 *   `mon_*` operations as provided trait methods. The prefix keeps them
 *   clear of the host's own method names.
 * - **`Monitored<T>`**: a value bundled with its own monitor, handing out
 *   `&T` only while the lock is held.
 *
 * ## Example
 *
 * ```rust
 * use monitor_sync::{ContextId, MonitorMixin, MonitorState};
 * use std::cell::RefCell;
 *
 * struct Inbox {
 *     monitor: MonitorState,
 *     lines: RefCell<Vec<String>>,
 * }
 *
 * impl MonitorMixin for Inbox {
 *     fn monitor_state(&self) -> &MonitorState {
 *         &self.monitor
 *     }
 * }
 *
 * let inbox = Inbox { monitor: MonitorState::new(), lines: RefCell::new(Vec::new()) };
 * inbox.mon_initialize().unwrap();
 *
 * let ctx = ContextId::current();
 * inbox.mon_synchronize(ctx, || inbox.lines.borrow_mut().push("hello".into()));
 * assert!(!inbox.mon_locked());
 * ```
 */

mod monitored;
mod state;

pub use monitored::{Monitored, MonitoredGuard};
pub use state::{InitPhase, MonitorState};

use crate::core::errors::MonitorResult;
use crate::core::guard::MonitorGuard;
use crate::core::sync::{ConditionVariable, Lockable};
use crate::core::types::ContextId;

/// Monitor operations for any host holding a [`MonitorState`]
pub trait MonitorMixin {
    /// The host's embedded monitor state
    fn monitor_state(&self) -> &MonitorState;

    /// Explicit once-only initialization (see [`MonitorState::initialize`])
    fn mon_initialize(&self) -> MonitorResult<()> {
        self.monitor_state().initialize()
    }

    /// New condition variable bound to the host's monitor
    fn new_condition(&self) -> ConditionVariable {
        self.monitor_state().new_condition()
    }

    fn mon_enter(&self, ctx: ContextId) {
        self.monitor_state().enter(ctx)
    }

    fn mon_exit(&self, ctx: ContextId) -> MonitorResult<()> {
        self.monitor_state().exit(ctx)
    }

    fn mon_try_enter(&self, ctx: ContextId) -> bool {
        self.monitor_state().try_enter(ctx)
    }

    fn mon_synchronize<F, R>(&self, ctx: ContextId, body: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.monitor_state().synchronize(ctx, body)
    }

    fn mon_lock(&self, ctx: ContextId) -> MonitorGuard<'_> {
        self.monitor_state().lock(ctx)
    }

    fn mon_locked(&self) -> bool {
        self.monitor_state().is_locked()
    }

    fn mon_owned(&self, ctx: ContextId) -> bool {
        self.monitor_state().is_owned(ctx)
    }

    fn mon_check_owner(&self, ctx: ContextId) -> MonitorResult<()> {
        self.monitor_state().check_owner(ctx)
    }
}

impl MonitorMixin for MonitorState {
    #[inline]
    fn monitor_state(&self) -> &MonitorState {
        self
    }
}
