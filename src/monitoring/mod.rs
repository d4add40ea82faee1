/*!
 * Monitoring
 * Structured tracing for monitor contention and waits
 */

mod tracer;

pub use tracer::{init_tracing, WaitKind, WaitSpan, TRACE_JSON_ENV};
pub(crate) use tracer::micros_u64;
