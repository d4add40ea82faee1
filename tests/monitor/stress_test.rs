/*!
 * Mutual Exclusion Stress Tests
 */

use monitor_sync::{ContextId, Lockable, Monitor, MonitorConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn run_counter(config: MonitorConfig, threads: usize, iterations: u64) -> u64 {
    let monitor = Arc::new(Monitor::with_config(config));
    // Deliberately non-atomic read-modify-write: only the monitor keeps it exact
    let counter = Arc::new(AtomicU64::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let (monitor, counter) = (monitor.clone(), counter.clone());
            thread::spawn(move || {
                let ctx = ContextId::current();
                for _ in 0..iterations {
                    monitor.synchronize(ctx, || {
                        let value = counter.load(Ordering::Relaxed);
                        thread::yield_now();
                        counter.store(value + 1, Ordering::Relaxed);
                    });
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    counter.load(Ordering::Relaxed)
}

#[test]
fn test_counter_default_config() {
    assert_eq!(run_counter(MonitorConfig::default(), 8, 500), 8 * 500);
}

#[test]
fn test_counter_without_spinning() {
    assert_eq!(run_counter(MonitorConfig::no_spin(), 8, 500), 8 * 500);
}

#[test]
fn test_no_two_contexts_inside() {
    let monitor = Arc::new(Monitor::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..6)
        .map(|seed| {
            let (monitor, inside, max_seen) = (monitor.clone(), inside.clone(), max_seen.clone());
            thread::spawn(move || {
                let ctx = ContextId::current();
                let mut rng = StdRng::seed_from_u64(seed);
                for _ in 0..200 {
                    let nesting = rng.gen_range(1..=3);
                    for _ in 0..nesting {
                        monitor.enter(ctx);
                    }
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    if rng.gen_bool(0.2) {
                        thread::yield_now();
                    }
                    inside.fetch_sub(1, Ordering::SeqCst);
                    for _ in 0..nesting {
                        monitor.exit(ctx).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    assert!(!monitor.is_locked());
}
