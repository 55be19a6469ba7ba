//! The polling state machine shared by the sync and async drivers.

use std::time::{Duration, Instant};

/// Terminal state of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A probe succeeded before the timeout.
    Succeeded,
    /// The timeout elapsed without a successful probe.
    TimedOut,
    /// The wait was cancelled before it completed.
    Cancelled,
}

/// What the driver should do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done(PollOutcome),
}

/// Summary handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    pub attempts: u32,
    pub elapsed: Duration,
}

impl PollReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == PollOutcome::Succeeded
    }
}

/// State of a single wait invocation (`WAITING` until a terminal step).
#[derive(Debug, Clone)]
pub struct PollState {
    started: Instant,
    timeout: Duration,
    attempts: u32,
    last_attempt: Option<bool>,
}

impl PollState {
    /// Start the clock.
    pub fn start(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
            attempts: 0,
            last_attempt: None,
        }
    }

    /// Feed the result of one probe.
    ///
    /// Success ends the wait immediately. Failure ends it only once the
    /// elapsed time has reached the timeout, so a `TimedOut` step is never
    /// produced early.
    pub fn record(&mut self, reachable: bool) -> Step {
        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt = Some(reachable);
        if reachable {
            Step::Done(PollOutcome::Succeeded)
        } else if self.elapsed() >= self.timeout {
            Step::Done(PollOutcome::TimedOut)
        } else {
            Step::Continue
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the wait may time out.
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_attempt(&self) -> Option<bool> {
        self.last_attempt
    }

    pub fn finish(&self, outcome: PollOutcome) -> PollReport {
        PollReport {
            outcome,
            attempts: self.attempts,
            elapsed: self.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_ends_immediately() {
        let mut state = PollState::start(Duration::from_secs(60));
        assert_eq!(state.record(false), Step::Continue);
        assert_eq!(state.record(true), Step::Done(PollOutcome::Succeeded));
        assert_eq!(state.attempts(), 2);
        assert_eq!(state.last_attempt(), Some(true));
    }

    #[test]
    fn test_zero_timeout_times_out_after_first_attempt() {
        let mut state = PollState::start(Duration::ZERO);
        assert_eq!(state.record(false), Step::Done(PollOutcome::TimedOut));
        assert_eq!(state.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_timed_out_only_after_timeout() {
        let timeout = Duration::from_millis(30);
        let mut state = PollState::start(timeout);
        loop {
            match state.record(false) {
                Step::Continue => assert!(state.elapsed() < timeout + Duration::from_secs(1)),
                Step::Done(outcome) => {
                    assert_eq!(outcome, PollOutcome::TimedOut);
                    assert!(state.elapsed() >= timeout);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_attempt_counter_saturates() {
        let mut state = PollState::start(Duration::from_secs(60));
        state.attempts = u32::MAX;
        assert_eq!(state.record(false), Step::Continue);
        assert_eq!(state.attempts(), u32::MAX);
    }
}
