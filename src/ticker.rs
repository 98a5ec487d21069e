use std::time::{Duration, Instant};

/// Fixed period timer. It only fires while armed; arming again starts a
/// fresh period.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    frame_start_time: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            frame_start_time: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.frame_start_time.is_some()
    }

    pub fn arm(&mut self, now: Instant) {
        self.frame_start_time = Some(now);
    }

    pub fn disarm(&mut self) {
        self.frame_start_time = None;
    }

    /// True once per elapsed period. A late call fires a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.frame_start_time {
            Some(start) if now.saturating_duration_since(start) >= self.period => {
                // reset start
                self.frame_start_time = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, `None` while disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.frame_start_time
            .map(|start| self.period.saturating_sub(now.saturating_duration_since(start)))
    }
}
