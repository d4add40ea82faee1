/*!
 * RAII Monitor Guards
 *
 * Scoped acquisition with automatic release.
 *
 * ## Design Principles
 *
 * 1. **Release on every exit path**: normal return, `?` early return and
 *    panic unwinding all run `Drop`
 * 2. **Observable**: guards log how long the lock was held
 * 3. **Manual override**: a guard can be released early, exactly once
 *
 * ## Example
 *
 * ```rust
 * use monitor_sync::{ContextId, Lockable, Monitor};
 *
 * let monitor = Monitor::new();
 * let ctx = ContextId::current();
 * {
 *     let _guard = monitor.lock(ctx);
 *     assert!(monitor.is_owned(ctx));
 * } // released here
 * assert!(!monitor.is_locked());
 * ```
 */

mod lock;
mod traits;

pub use lock::MonitorGuard;
pub use traits::{Guard, GuardDrop};

use crate::core::errors::MonitorError;
use crate::core::types::{ContextId, MonitorId};

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Guard already released")]
    AlreadyReleased,

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: std::time::Instant,
    pub monitor: MonitorId,
    pub context: ContextId,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str, monitor: MonitorId, context: ContextId) -> Self {
        Self {
            resource_type,
            creation_time: std::time::Instant::now(),
            monitor,
            context,
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        crate::monitoring::micros_u64(self.creation_time.elapsed())
    }
}
