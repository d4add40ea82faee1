/*!
 * Monitor Configuration
 *
 * Runtime tuning for lock acquisition
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding [`MonitorConfig::spin_limit`]
pub const SPIN_LIMIT_ENV: &str = "MONITOR_SPIN_LIMIT";

/// Environment variable overriding [`MonitorConfig::slow_acquire_threshold`] (milliseconds)
pub const SLOW_ACQUIRE_ENV: &str = "MONITOR_SLOW_ACQUIRE_MS";

/// Lock acquisition configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum try-acquire attempts on a contended lock before parking
    pub spin_limit: u32,
    /// Blocking acquisitions longer than this are logged at `warn`
    pub slow_acquire_threshold: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            spin_limit: 40,
            slow_acquire_threshold: Duration::from_millis(100),
        }
    }
}

impl MonitorConfig {
    /// Configuration for critical sections that are typically very short
    pub const fn low_latency() -> Self {
        Self {
            spin_limit: 200,
            slow_acquire_threshold: Duration::from_millis(10),
        }
    }

    /// Configuration for locks held across long operations
    pub const fn long_wait() -> Self {
        Self {
            spin_limit: 4,
            slow_acquire_threshold: Duration::from_secs(1),
        }
    }

    /// Park immediately on contention
    pub const fn no_spin() -> Self {
        Self {
            spin_limit: 0,
            slow_acquire_threshold: Duration::from_millis(100),
        }
    }

    /// Defaults overridden by `MONITOR_SPIN_LIMIT` and `MONITOR_SLOW_ACQUIRE_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MonitorConfig::from_env`] with a caller-supplied lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(SPIN_LIMIT_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(limit) => config.spin_limit = limit,
                Err(e) => warn!(var = SPIN_LIMIT_ENV, value = %raw, error = %e, "Ignoring invalid monitor setting"),
            }
        }

        if let Some(raw) = lookup(SLOW_ACQUIRE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.slow_acquire_threshold = Duration::from_millis(ms),
                Err(e) => warn!(var = SLOW_ACQUIRE_ENV, value = %raw, error = %e, "Ignoring invalid monitor setting"),
            }
        }

        config
    }
}
