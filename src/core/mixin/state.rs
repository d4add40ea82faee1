/*!
 * Host Monitor State
 *
 * Lazily-created, once-only lock core embedded in a host object
 */

use crate::core::errors::{MonitorError, MonitorResult};
use crate::core::sync::{ConditionVariable, Lockable, LockCore, MonitorConfig};
use crate::core::types::ContextId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Initialization phase of a host's monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    /// No lock core yet
    Uninitialized,
    /// Lock core created as a side effect of first use
    Lazy,
    /// Lock core claimed by an explicit `initialize()`
    Explicit,
}

/// Monitor capability embedded in a host object
///
/// Hosts hold one of these as a field (see
/// [`MonitorMixin`](super::MonitorMixin)). The lock core is created at most
/// once: by [`MonitorState::initialize`], or lazily by
/// [`MonitorState::new_condition`] or an acquiring operation (`enter`,
/// `try_enter`, `lock`, `try_lock`, `synchronize`). Queries and `exit` on an
/// uninitialized state answer directly and leave it `Uninitialized`.
///
/// ```text
/// Uninitialized --initialize()--> Explicit
/// Uninitialized --first use-----> Lazy --initialize()--> Explicit
/// Explicit      --initialize()--> Err(DoubleInitialization)
/// ```
///
/// Cloning produces a fresh, uninitialized state: a copied host never
/// shares its original's lock.
pub struct MonitorState {
    core: OnceLock<Arc<LockCore>>,
    phase: Mutex<InitPhase>,
    config: MonitorConfig,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            core: OnceLock::new(),
            phase: Mutex::new(InitPhase::Uninitialized),
            config,
        }
    }

    /// State that has already been explicitly initialized
    pub fn initialized() -> Self {
        let state = Self::new();
        state.core.get_or_init(|| Arc::new(LockCore::with_config(state.config.clone())));
        *state.phase.lock() = InitPhase::Explicit;
        state
    }

    /// Explicit, once-only initialization
    ///
    /// Forgives a prior lazy initialization; fails with
    /// `DoubleInitialization` if `initialize` already ran.
    pub fn initialize(&self) -> MonitorResult<()> {
        let mut phase = self.phase.lock();
        match *phase {
            InitPhase::Explicit => {
                drop(phase);
                warn!("monitor state initialized twice");
                Err(MonitorError::DoubleInitialization)
            }
            InitPhase::Lazy => {
                *phase = InitPhase::Explicit;
                debug!("explicit initialization adopted lazily created monitor");
                Ok(())
            }
            InitPhase::Uninitialized => {
                *phase = InitPhase::Explicit;
                drop(phase);
                self.shared_core();
                Ok(())
            }
        }
    }

    /// New condition variable, creating the lock core if needed
    pub fn new_condition(&self) -> ConditionVariable {
        ConditionVariable::new(self.shared_core().clone())
    }

    #[inline]
    pub fn phase(&self) -> InitPhase {
        *self.phase.lock()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.core.get().is_some()
    }

    #[inline]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn unowned(ctx: ContextId) -> MonitorError {
        MonitorError::OwnershipViolation {
            caller: ctx,
            owner: None,
        }
    }

    // Lock order is always core cell, then phase. `initialize` never touches
    // the cell while holding the phase lock.
    fn shared_core(&self) -> &Arc<LockCore> {
        if let Some(core) = self.core.get() {
            return core;
        }
        self.core.get_or_init(|| {
            let mut phase = self.phase.lock();
            if *phase == InitPhase::Uninitialized {
                *phase = InitPhase::Lazy;
            }
            Arc::new(LockCore::with_config(self.config.clone()))
        })
    }
}

impl Lockable for MonitorState {
    #[inline]
    fn lock_core(&self) -> &LockCore {
        self.shared_core()
    }

    fn exit(&self, ctx: ContextId) -> MonitorResult<()> {
        match self.core.get() {
            Some(core) => core.exit(ctx),
            None => {
                warn!(context = %ctx, "exit on a monitor that was never entered");
                Err(Self::unowned(ctx))
            }
        }
    }

    fn check_owner(&self, ctx: ContextId) -> MonitorResult<()> {
        match self.core.get() {
            Some(core) => core.check_owner(ctx),
            None => Err(Self::unowned(ctx)),
        }
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.core.get().is_some_and(|core| core.is_locked())
    }

    #[inline]
    fn is_owned(&self, ctx: ContextId) -> bool {
        self.core.get().is_some_and(|core| core.is_owned(ctx))
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MonitorState {
    fn clone(&self) -> Self {
        Self::with_config(self.config.clone())
    }
}

impl fmt::Debug for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorState")
            .field("phase", &self.phase())
            .field("core", &self.core.get())
            .finish()
    }
}
