/*!
 * Structured Tracing
 * Subscriber setup and blocking-wait spans using the tracing crate
 */

use crate::core::types::{ContextId, MonitorId};
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Whole microseconds in `duration`, saturating at `u64::MAX`
#[inline]
pub(crate) fn micros_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

#[inline]
pub(crate) fn millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Environment variable selecting JSON output
pub const TRACE_JSON_ENV: &str = "MONITOR_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - MONITOR_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        debug!(json = use_json, "Monitor tracing initialized");
    }
    installed
}

/// What a context is blocked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    /// Contended `enter()`
    Acquire,
    /// Condition variable `wait()`, including reacquisition
    Condition,
}

impl WaitKind {
    fn as_str(self) -> &'static str {
        match self {
            WaitKind::Acquire => "acquire",
            WaitKind::Condition => "condition",
        }
    }
}

/// Span covering one blocking wait on a monitor
///
/// Records how long the context was blocked when dropped. Acquisitions
/// slower than the configured threshold are reported at `warn`; condition
/// waits are expected to be long and only logged at `debug`.
pub struct WaitSpan {
    span: Span,
    start: Instant,
    kind: WaitKind,
    monitor: MonitorId,
    context: ContextId,
    slow_threshold: Duration,
}

impl WaitSpan {
    pub fn new(
        kind: WaitKind,
        monitor: MonitorId,
        context: ContextId,
        slow_threshold: Duration,
    ) -> Self {
        let span = span!(
            Level::DEBUG,
            "monitor_wait",
            kind = kind.as_str(),
            monitor = %monitor,
            context = %context,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            kind,
            monitor,
            context,
            slow_threshold,
        }
    }

    #[inline]
    pub fn kind(&self) -> WaitKind {
        self.kind
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for WaitSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", micros_u64(duration));

        if self.kind == WaitKind::Acquire && duration > self.slow_threshold {
            warn!(
                monitor = %self.monitor,
                context = %self.context,
                duration_ms = millis_u64(duration),
                slow = true,
                "slow monitor acquisition"
            );
        } else {
            debug!(
                monitor = %self.monitor,
                context = %self.context,
                kind = self.kind.as_str(),
                duration_us = micros_u64(duration),
                "monitor wait completed"
            );
        }
    }
}
