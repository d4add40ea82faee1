/*!
 * Core Module
 * Monitor primitives, identities and error handling
 */

pub mod errors;
pub mod guard;
pub mod mixin;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use guard::{Guard, GuardDrop, GuardError, GuardMetadata, GuardResult, MonitorGuard};
pub use mixin::{InitPhase, MonitorMixin, MonitorState, Monitored, MonitoredGuard};
pub use sync::{ConditionVariable, LockCore, Lockable, Monitor, MonitorConfig};
pub use types::*;
