//! Availability polling.
//!
//! Repeatedly probes a target until it answers or a timeout elapses. The same
//! [`PollState`] machine backs both drivers:
//!
//! ```text
//!   WAITING --probe ok--------------------> SUCCEEDED
//!   WAITING --probe fail, time left-------> WAITING (pause)
//!   WAITING --probe fail, time exhausted--> TIMED_OUT
//!   WAITING --cancel----------------------> CANCELLED
//! ```
//!
//! [`AvailabilityPoller::wait_for_accessible`] blocks the caller.
//! [`AvailabilityPoller::spawn`] runs the loop on a worker thread and hands
//! back an [`AccessibilityHandle`] whose outcome can be awaited.

pub mod policy;
pub mod probe;
pub mod state;

pub use policy::{FixedInterval, NoDelay, RetryPolicy};
pub use probe::{address_of, host_of, DnsProbe, Probe, TcpProbe, DEFAULT_PORT};
pub use state::{PollOutcome, PollReport, PollState, Step};

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::errors::ClientError;

const RUNNING: u8 = 0;
const CANCELLED: u8 = 1;
const DONE: u8 = 2;

/// Shared cancellation flag for one wait.
///
/// A wait ends exactly once: either `cancel` or the worker's completion
/// wins the transition out of `RUNNING`, never both.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicU8>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `false` if the wait already ended.
    pub fn cancel(&self) -> bool {
        self.0
            .compare_exchange(RUNNING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst) == CANCELLED
    }

    /// Whether the wait has left `RUNNING`.
    pub fn is_finished(&self) -> bool {
        self.0.load(Ordering::SeqCst) != RUNNING
    }

    fn complete(&self) -> bool {
        self.0
            .compare_exchange(RUNNING, DONE, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Probes a target with a pluggable probe and pause policy.
#[derive(Debug, Clone)]
pub struct AvailabilityPoller<P = DnsProbe, R = FixedInterval> {
    probe: P,
    policy: R,
}

impl Default for AvailabilityPoller {
    fn default() -> Self {
        Self::new(DnsProbe, FixedInterval::default())
    }
}

impl<P: Probe, R: RetryPolicy> AvailabilityPoller<P, R> {
    pub fn new(probe: P, policy: R) -> Self {
        Self { probe, policy }
    }

    /// Block until `target` answers or `timeout` elapses.
    pub fn wait_for_accessible(&self, target: &str, timeout: Duration) -> bool {
        self.run(target, timeout, &CancelToken::new()).succeeded()
    }

    /// Drive the poll loop on the calling thread.
    ///
    /// At least one attempt is always made, even with a zero timeout.
    pub fn run(&self, target: &str, timeout: Duration, cancel: &CancelToken) -> PollReport {
        let mut state = PollState::start(timeout);
        log::debug!("Waiting up to {:?} for {} to become accessible", timeout, target);

        loop {
            if cancel.is_cancelled() {
                log::debug!("Availability wait for {} cancelled", target);
                return state.finish(PollOutcome::Cancelled);
            }

            let reachable = self.probe.probe(target);
            log::trace!(
                "Probe #{} of {}: {}",
                state.attempts() + 1,
                target,
                if reachable { "reachable" } else { "unreachable" }
            );
            match state.record(reachable) {
                Step::Continue => self.policy.pause(state.remaining()),
                Step::Done(outcome) => {
                    let outcome = if cancel.complete() {
                        outcome
                    } else {
                        PollOutcome::Cancelled
                    };
                    log::debug!(
                        "Availability wait for {} ended {:?} after {} attempt(s)",
                        target,
                        outcome,
                        state.attempts()
                    );
                    return state.finish(outcome);
                }
            }
        }
    }
}

impl<P, R> AvailabilityPoller<P, R>
where
    P: Probe + 'static,
    R: RetryPolicy + 'static,
{
    /// Run the wait on a dedicated worker thread.
    ///
    /// The caller is not blocked; the result is delivered through the
    /// returned handle.
    pub fn spawn(
        self,
        target: impl Into<String>,
        timeout: Duration,
    ) -> Result<AccessibilityHandle, ClientError> {
        let target = target.into();
        let token = CancelToken::new();
        let worker_token = token.clone();
        let (tx, rx) = oneshot::channel();

        thread::Builder::new()
            .name("availability-poller".to_string())
            .spawn(move || {
                let report = self.run(&target, timeout, &worker_token);
                // Receiver gone means nobody is listening any more.
                let _ = tx.send(report);
            })?;

        Ok(AccessibilityHandle {
            token,
            receiver: rx,
            started: Instant::now(),
        })
    }
}

/// Pending result of an asynchronous availability wait.
#[derive(Debug)]
pub struct AccessibilityHandle {
    token: CancelToken,
    receiver: oneshot::Receiver<PollReport>,
    started: Instant,
}

impl AccessibilityHandle {
    /// Request cancellation. Returns `false` if the wait already ended.
    pub fn cancel(&self) -> bool {
        self.token.cancel()
    }

    pub fn is_finished(&self) -> bool {
        self.token.is_finished()
    }

    /// Await the final report.
    pub async fn outcome(self) -> PollReport {
        let started = self.started;
        self.receiver
            .await
            .unwrap_or_else(|_| Self::abandoned(started))
    }

    /// Block until the final report is available.
    ///
    /// Must not be called from within an async runtime.
    pub fn wait(self) -> PollReport {
        let started = self.started;
        self.receiver
            .blocking_recv()
            .unwrap_or_else(|_| Self::abandoned(started))
    }

    fn abandoned(started: Instant) -> PollReport {
        log::warn!("Availability worker exited without reporting");
        PollReport {
            outcome: PollOutcome::Cancelled,
            attempts: 0,
            elapsed: started.elapsed(),
        }
    }
}
