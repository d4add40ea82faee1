/*!
 * Core Types
 * Identities shared by every monitor operation
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);
static NEXT_MONITOR: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_CONTEXT: ContextId = ContextId::fresh();
}

/// Identity of an execution context (normally a thread)
///
/// Every lock operation takes the caller's context explicitly, so the lock
/// core never consults hidden thread-local state. Tests can mint several
/// contexts on one thread with [`ContextId::fresh`] to simulate contention
/// on the non-blocking paths.
///
/// # Example
///
/// ```
/// use monitor_sync::ContextId;
///
/// let me = ContextId::current();
/// assert_eq!(me, ContextId::current());
/// assert_ne!(me, ContextId::fresh());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(u64);

impl ContextId {
    /// Stable id of the calling thread, allocated on first use
    #[inline]
    pub fn current() -> Self {
        CURRENT_CONTEXT.with(|ctx| *ctx)
    }

    /// Allocate a new id that no thread has been given
    #[inline]
    pub fn fresh() -> Self {
        Self(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Unique id of a lock core, used for tracing fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorId(u64);

impl MonitorId {
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_MONITOR.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mon#{}", self.0)
    }
}
