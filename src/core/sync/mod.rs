/*!
 * Monitor Synchronization Primitives
 *
 * Reentrant monitor lock and the condition variables bound to it:
 * - `LockCore`: owner-tracked reentrant lock
 * - `ConditionVariable`: wait/signal/broadcast against one lock core
 * - `Monitor`: eagerly-constructed lock with a condition factory
 *
 * # Architecture
 *
 * Every operation takes the caller's `ContextId` explicitly. The lock core
 * keeps `(owner, depth)` under a short `parking_lot::Mutex`; condition
 * variables park on `parking_lot::Condvar`s tied to that same mutex, which
 * makes release-and-wait atomic with respect to signalling.
 *
 * # Guarantees
 *
 * - Mutual exclusion across enter/exit/synchronize and post-wait reacquire
 * - Reentrant acquisition never blocks the owner
 * - No fairness: wake order on both the lock and conditions is unspecified
 */

mod condvar;
mod config;
mod lock_core;
mod monitor;
mod spinwait;
mod traits;

pub use condvar::ConditionVariable;
pub use config::{MonitorConfig, SLOW_ACQUIRE_ENV, SPIN_LIMIT_ENV};
pub use lock_core::LockCore;
pub use monitor::Monitor;
pub use traits::Lockable;
