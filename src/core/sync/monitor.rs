/*!
 * Monitor Facade
 *
 * Standalone lock object with a condition variable factory
 */

use super::condvar::ConditionVariable;
use super::config::MonitorConfig;
use super::lock_core::LockCore;
use super::traits::Lockable;
use std::sync::Arc;

/// A reentrant lock plus condition variables sharing it
///
/// The lock core is created eagerly. All operations come from
/// [`Lockable`]; bring the trait into scope to use them.
///
/// # Example
///
/// ```
/// use monitor_sync::{ContextId, Lockable, Monitor};
///
/// let monitor = Monitor::new();
/// let ctx = ContextId::current();
///
/// let answer = monitor.synchronize(ctx, || {
///     assert!(monitor.is_owned(ctx));
///     41 + 1
/// });
/// assert_eq!(answer, 42);
/// assert!(!monitor.is_locked());
/// ```
#[derive(Debug, Default)]
pub struct Monitor {
    core: Arc<LockCore>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            core: Arc::new(LockCore::with_config(config)),
        }
    }

    /// New condition variable bound to this monitor's lock
    pub fn new_condition(&self) -> ConditionVariable {
        ConditionVariable::new(self.core.clone())
    }
}

impl Lockable for Monitor {
    #[inline]
    fn lock_core(&self) -> &LockCore {
        &self.core
    }
}
