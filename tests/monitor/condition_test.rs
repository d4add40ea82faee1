/*!
 * Condition Variable Tests
 */

use monitor_sync::{ContextId, Lockable, Monitor, MonitorError, Monitored};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_wait_releases_lock_to_other_thread() {
    let monitor = Arc::new(Monitor::new());
    let cond = Arc::new(monitor.new_condition());
    let waiting = Arc::new(AtomicBool::new(false));
    let done = Arc::new(AtomicBool::new(false));

    let (m, c, w, d) = (monitor.clone(), cond.clone(), waiting.clone(), done.clone());
    let waiter = thread::spawn(move || {
        let ctx = ContextId::current();
        m.synchronize(ctx, || {
            w.store(true, Ordering::SeqCst);
            c.wait_until(ctx, || d.load(Ordering::SeqCst))?;
            assert!(m.is_owned(ctx));
            Ok::<_, MonitorError>(())
        })
    });

    while !waiting.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    // The waiter holds the monitor until it parks; enter() gets in once it does
    let ctx = ContextId::current();
    monitor.enter(ctx);
    assert!(monitor.is_owned(ctx));
    done.store(true, Ordering::SeqCst);
    cond.signal(ctx).unwrap();
    monitor.exit(ctx).unwrap();

    waiter.join().unwrap().unwrap();
    assert!(!monitor.is_locked());
}

#[test]
fn test_waiter_resumes_only_after_signaller_releases() {
    let monitor = Arc::new(Monitor::new());
    let cond = Arc::new(monitor.new_condition());
    let released = Arc::new(AtomicBool::new(false));
    let ready = Arc::new(AtomicBool::new(false));

    let (m, c, r, rd) = (monitor.clone(), cond.clone(), released.clone(), ready.clone());
    let waiter = thread::spawn(move || {
        let ctx = ContextId::current();
        m.synchronize(ctx, || {
            c.wait_until(ctx, || rd.load(Ordering::SeqCst)).unwrap();
            r.load(Ordering::SeqCst)
        })
    });

    thread::sleep(Duration::from_millis(50));

    let ctx = ContextId::current();
    monitor.synchronize(ctx, || {
        ready.store(true, Ordering::SeqCst);
        cond.signal(ctx).unwrap();
        thread::sleep(Duration::from_millis(50));
        released.store(true, Ordering::SeqCst);
    });

    // Waiter could only observe `released` once the signaller left
    assert!(waiter.join().unwrap());
}

#[test]
fn test_producer_consumer_delivers_once() {
    let queue = Arc::new(Monitored::new(Mutex::new(VecDeque::new())));
    let not_empty = Arc::new(queue.new_condition());
    let delivered = Arc::new(AtomicUsize::new(0));

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let (q, cond, count) = (queue.clone(), not_empty.clone(), delivered.clone());
            thread::spawn(move || {
                let ctx = ContextId::current();
                let mut got = Vec::new();
                loop {
                    let item = {
                        let guard = q.lock(ctx);
                        cond.wait_while(ctx, || guard.lock().is_empty()).unwrap();
                        let item = guard.lock().pop_front();
                        item
                    };
                    match item {
                        Some(None) => break,
                        Some(Some(value)) => {
                            count.fetch_add(1, Ordering::SeqCst);
                            got.push(value);
                        }
                        None => unreachable!("woke with an empty queue"),
                    }
                }
                got
            })
        })
        .collect();

    let ctx = ContextId::current();
    for value in 0..100u32 {
        let guard = queue.lock(ctx);
        guard.lock().push_back(Some(value));
        not_empty.signal(ctx).unwrap();
    }
    for _ in 0..2 {
        let guard = queue.lock(ctx);
        guard.lock().push_back(None);
        not_empty.signal(ctx).unwrap();
    }

    let mut all: Vec<u32> = consumers
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();

    assert_eq!(all, (0..100).collect::<Vec<_>>());
    assert_eq!(delivered.load(Ordering::SeqCst), 100);
}

#[test]
fn test_broadcast_wakes_all_one_at_a_time() {
    const WAITERS: usize = 5;

    let monitor = Arc::new(Monitor::new());
    let cond = Arc::new(monitor.new_condition());
    let go = Arc::new(AtomicBool::new(false));
    let parked = Arc::new(AtomicUsize::new(0));
    let inside = Arc::new(AtomicUsize::new(0));
    let overlap = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..WAITERS)
        .map(|_| {
            let (m, c, g, p, i, o) = (
                monitor.clone(),
                cond.clone(),
                go.clone(),
                parked.clone(),
                inside.clone(),
                overlap.clone(),
            );
            thread::spawn(move || {
                let ctx = ContextId::current();
                m.synchronize(ctx, || {
                    p.fetch_add(1, Ordering::SeqCst);
                    c.wait_until(ctx, || g.load(Ordering::SeqCst)).unwrap();

                    if i.fetch_add(1, Ordering::SeqCst) != 0 {
                        o.store(true, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(5));
                    i.fetch_sub(1, Ordering::SeqCst);
                    assert!(m.is_owned(ctx));
                });
            })
        })
        .collect();

    let ctx = ContextId::current();
    while monitor.synchronize(ctx, || parked.load(Ordering::SeqCst)) < WAITERS {
        thread::sleep(Duration::from_millis(5));
    }

    monitor.synchronize(ctx, || {
        go.store(true, Ordering::SeqCst);
        cond.broadcast(ctx).unwrap();
    });

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(!overlap.load(Ordering::SeqCst));
    assert!(!monitor.is_locked());
}

#[test]
fn test_signal_without_waiters_is_not_queued() {
    let monitor = Monitor::new();
    let cond = monitor.new_condition();
    let ctx = ContextId::fresh();

    monitor.synchronize(ctx, || {
        cond.signal(ctx).unwrap();
        let start = Instant::now();
        cond.wait(ctx, Some(Duration::from_millis(50))).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    });
}

#[test]
fn test_signal_and_broadcast_require_owner() {
    let monitor = Monitor::new();
    let cond = monitor.new_condition();
    let owner = ContextId::fresh();
    let other = ContextId::fresh();

    monitor.enter(owner);
    assert!(matches!(
        cond.signal(other),
        Err(MonitorError::OwnershipViolation { .. })
    ));
    assert!(matches!(
        cond.broadcast(other),
        Err(MonitorError::OwnershipViolation { .. })
    ));
    assert!(cond.wait(other, Some(Duration::from_millis(1))).is_err());

    assert_eq!(monitor.lock_core().owner(), Some(owner));
    assert_eq!(monitor.lock_core().depth(), 1);
    monitor.exit(owner).unwrap();
}

#[test]
fn test_wait_restores_reentrant_depth() {
    let monitor = Arc::new(Monitor::new());
    let cond = Arc::new(monitor.new_condition());
    let flag = Arc::new(AtomicBool::new(false));

    let (m, c, f) = (monitor.clone(), cond.clone(), flag.clone());
    let waiter = thread::spawn(move || {
        let ctx = ContextId::current();
        m.enter(ctx);
        m.enter(ctx);
        m.enter(ctx);
        c.wait_until(ctx, || f.load(Ordering::SeqCst)).unwrap();
        let depth = m.lock_core().depth();
        for _ in 0..3 {
            m.exit(ctx).unwrap();
        }
        depth
    });

    thread::sleep(Duration::from_millis(50));
    let ctx = ContextId::current();
    monitor.synchronize(ctx, || {
        // The waiter gave up all three levels while parked
        assert_eq!(monitor.lock_core().depth(), 1);
        flag.store(true, Ordering::SeqCst);
        cond.signal(ctx).unwrap();
    });

    assert_eq!(waiter.join().unwrap(), 3);
    assert!(!monitor.is_locked());
}

#[test]
fn test_conditions_share_exclusion() {
    let monitor = Arc::new(Monitor::new());
    let first = Arc::new(monitor.new_condition());
    let second = Arc::new(monitor.new_condition());
    let stage = Arc::new(AtomicUsize::new(0));

    let (m, f, s, st) = (monitor.clone(), first.clone(), second.clone(), stage.clone());
    let worker = thread::spawn(move || {
        let ctx = ContextId::current();
        m.synchronize(ctx, || {
            f.wait_until(ctx, || st.load(Ordering::SeqCst) == 1).unwrap();
            st.store(2, Ordering::SeqCst);
            s.signal(ctx).unwrap();
        });
    });

    let ctx = ContextId::current();
    monitor.synchronize(ctx, || {
        stage.store(1, Ordering::SeqCst);
        first.signal(ctx).unwrap();
        second
            .wait_until(ctx, || stage.load(Ordering::SeqCst) == 2)
            .unwrap();
    });

    worker.join().unwrap();
    assert_eq!(stage.load(Ordering::SeqCst), 2);
}
