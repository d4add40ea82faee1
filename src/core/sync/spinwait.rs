/*!
 * Bounded Spin Phase
 *
 * Contended acquisitions retry for a short while before parking. Most
 * critical sections guarded by a monitor are a handful of instructions, so a
 * brief spin avoids a park/unpark round trip.
 *
 * Two phases:
 *
 * 1. **Tight spin** (first iterations): `parking_lot_core::SpinWait`, which
 *    issues CPU spin hints with exponential growth and then yields
 * 2. **Yield phase**: `yield_now()` until the budget is spent
 */

use parking_lot_core::SpinWait;
use std::thread;

/// Spin budget for one contended acquisition
pub(crate) struct Backoff {
    spin: SpinWait,
    remaining: u32,
}

impl Backoff {
    #[inline]
    pub(crate) fn new(limit: u32) -> Self {
        Self {
            spin: SpinWait::new(),
            remaining: limit,
        }
    }

    /// Back off once
    ///
    /// Returns `false` once the budget is spent and the caller should park.
    #[inline]
    pub(crate) fn snooze(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;

        if !self.spin.spin() {
            thread::yield_now();
        }
        true
    }
}
