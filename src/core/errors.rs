/*!
 * Error Types
 * Monitor misuse errors with thiserror, miette, and serde support
 */

use crate::core::types::ContextId;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Monitor errors with serialization support
///
/// Both kinds signal a bug in the caller. Neither is transient, so nothing
/// in this crate retries or swallows them. A timed-out wait is not an error.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MonitorError {
    #[error("Context {caller} does not own the monitor (owner: {})", display_owner(.owner))]
    #[diagnostic(
        code(monitor::ownership_violation),
        help("exit, wait, signal and broadcast must be called by the context holding the lock. Acquire it with enter() or synchronize() first.")
    )]
    OwnershipViolation {
        caller: ContextId,
        owner: Option<ContextId>,
    },

    #[error("Monitor state already initialized")]
    #[diagnostic(
        code(monitor::double_initialization),
        help("initialize() may run once per host object. Only a lazy initialization from new_condition() or a forwarded lock operation is forgiven.")
    )]
    DoubleInitialization,
}

fn display_owner(owner: &Option<ContextId>) -> String {
    match owner {
        Some(ctx) => ctx.to_string(),
        None => "none".to_string(),
    }
}

impl MonitorError {
    /// Check whether this is an ownership violation
    #[inline]
    pub fn is_ownership_violation(&self) -> bool {
        matches!(self, MonitorError::OwnershipViolation { .. })
    }
}
