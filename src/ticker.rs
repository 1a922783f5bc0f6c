use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate tick source. Deadlines advance by whole periods so time
/// spent inside a tick does not stretch the cadence.
pub struct Ticker {
    period: Duration,
    next: Instant,
    overruns: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            next: Instant::now() + period,
            overruns: 0,
        }
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            // Late: skip the missed boundaries instead of bursting to catch up.
            self.overruns += 1;
            self.next = now + self.period;
        }
    }
}
