//! Pause between probe attempts.

use std::thread;
use std::time::Duration;

/// Decides how long to wait before the next attempt.
pub trait RetryPolicy: Send + Sync {
    /// Called after a failed attempt; `remaining` is the time left before
    /// the wait may time out.
    fn pause(&self, remaining: Duration);
}

/// Sleep a fixed interval, never past the timeout.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        Self(Duration::from_secs(1))
    }
}

impl RetryPolicy for FixedInterval {
    fn pause(&self, remaining: Duration) {
        let nap = self.0.min(remaining);
        if !nap.is_zero() {
            thread::sleep(nap);
        }
    }
}

/// Retry immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl RetryPolicy for NoDelay {
    fn pause(&self, _remaining: Duration) {
        thread::yield_now();
    }
}
