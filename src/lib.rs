/*!
 * Monitor Synchronization Library
 *
 * Reentrant monitors with condition variables, attachable to any object:
 * - `Monitor`: standalone lock with a condition factory
 * - `MonitorState` + `MonitorMixin`: monitor capability for host types
 * - `Monitored<T>`: a value reachable only under its monitor
 *
 * All operations take the caller's `ContextId` explicitly.
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::{
    ConditionVariable, ContextId, Guard, GuardError, InitPhase, LockCore, Lockable, Monitor,
    MonitorConfig, MonitorError, MonitorGuard, MonitorId, MonitorMixin, MonitorResult,
    MonitorState, Monitored, MonitoredGuard,
};
pub use monitoring::init_tracing;
