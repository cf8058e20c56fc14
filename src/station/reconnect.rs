use std::time::{Duration, Instant};

/// Bounded, delayed retry schedule for a failed live stream.
///
/// Time is always passed in, so the schedule can be driven from any loop.
#[derive(Debug)]
pub struct Reconnect {
    max_attempts: u32,
    delay: Duration,
    attempts: u32,
    due: Option<Instant>,
}

impl Reconnect {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Reconnect {
            max_attempts,
            delay,
            attempts: 0,
            due: None,
        }
    }

    /// Schedules the next attempt. Returns false once attempts are exhausted.
    pub fn schedule(&mut self, now: Instant) -> bool {
        if self.attempts >= self.max_attempts {
            self.due = None;
            return false;
        }

        self.attempts += 1;
        self.due = Some(now + self.delay);
        true
    }

    /// True exactly once when the scheduled attempt comes due
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// A stream started successfully; later failures get a fresh budget
    pub fn succeeded(&mut self) {
        self.attempts = 0;
    }

    pub fn cancel(&mut self) {
        self.attempts = 0;
        self.due = None;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.due
    }
}
