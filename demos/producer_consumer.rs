/*!
 * Producer/Consumer Demo
 *
 * A buffer that adopts the monitor mixin, one producer and one consumer.
 *
 * Run with: RUST_LOG=monitor_sync=trace cargo run --example producer_consumer
 */

use monitor_sync::{init_tracing, ContextId, MonitorConfig, MonitorMixin, MonitorState};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use tracing::info;

struct LineBuffer {
    monitor: MonitorState,
    lines: parking_lot::Mutex<VecDeque<String>>,
}

impl MonitorMixin for LineBuffer {
    fn monitor_state(&self) -> &MonitorState {
        &self.monitor
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let buffer = Arc::new(LineBuffer {
        monitor: MonitorState::with_config(MonitorConfig::from_env()),
        lines: parking_lot::Mutex::new(VecDeque::new()),
    });
    // Condition requested before explicit setup: initialization is forgiven
    let not_empty = Arc::new(buffer.new_condition());
    buffer.mon_initialize()?;

    let consumer = {
        let buffer = buffer.clone();
        let not_empty = not_empty.clone();
        thread::spawn(move || -> monitor_sync::MonitorResult<Vec<String>> {
            let ctx = ContextId::current();
            let mut received = Vec::new();
            while received.len() < 5 {
                let line = buffer.mon_synchronize(ctx, || {
                    not_empty.wait_while(ctx, || buffer.lines.lock().is_empty())?;
                    Ok::<_, monitor_sync::MonitorError>(buffer.lines.lock().pop_front())
                })?;
                if let Some(line) = line {
                    info!(line = %line, "consumed");
                    received.push(line);
                }
            }
            Ok(received)
        })
    };

    let ctx = ContextId::current();
    for i in 0..5 {
        buffer.mon_synchronize(ctx, || {
            buffer.lines.lock().push_back(format!("line {}", i));
            not_empty.signal(ctx)
        })?;
    }

    let received = consumer.join().map_err(|_| "consumer panicked")??;
    info!(count = received.len(), "all lines delivered");
    Ok(())
}
