use std::time::{Duration, Instant};

/// Schedules the synthetic 1-second progress ticks.
///
/// The timer is armed only while the caller reports it active; the moment it
/// is polled inactive the pending deadline is dropped, so no tick from an
/// earlier run can fire later.
#[derive(Debug)]
pub struct FallbackTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Default for FallbackTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FallbackTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm/disarm according to `active` and return how many ticks are due at `now`.
    pub fn poll(&mut self, active: bool, now: Instant) -> u32 {
        if !active {
            self.next_due = None;
            return 0;
        }

        let Some(mut due) = self.next_due else {
            self.next_due = Some(now + self.interval);
            return 0;
        };

        let mut ticks = 0;
        while now >= due {
            ticks += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        ticks
    }

    /// Drop the pending deadline; the next active poll starts a full interval.
    pub fn reset(&mut self) {
        self.next_due = None;
    }

    /// How long the event loop may sleep before the next tick is due.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
