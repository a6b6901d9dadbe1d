mod time_primitives;
pub use time_primitives::*;

mod stopwatch;
pub use stopwatch::*;

use std::time::{Duration, Instant};
use parking_lot::RwLock;

// A snapshot of the clock, taken once per tick
#[derive(Debug, Clone, Copy)]
pub struct Time
{
    pub now: Instant,
    pub delta: Duration,
    pub since_start: Duration,
}
impl Time
{
    #[inline] #[must_use]
    pub fn now_nanos(&self) -> TimeNanos { self.since_start.as_nanos() as TimeNanos }

    #[inline] #[must_use]
    pub fn total_secs(&self) -> FSeconds { FSeconds::from(self.since_start) }
}

// Ticked by the driver loop. Readers on other threads see the last tick
pub struct Clock
{
    started: Instant,
    latest: RwLock<Time>,
}
impl Clock
{
    #[must_use]
    pub fn new() -> Self
    {
        let now = Instant::now();
        Self
        {
            started: now,
            latest: RwLock::new(Time { now, delta: Duration::ZERO, since_start: Duration::ZERO }),
        }
    }

    pub fn tick(&self) -> Time
    {
        let now = Instant::now();
        let mut latest = self.latest.write();
        *latest = Time
        {
            now,
            delta: now.saturating_duration_since(latest.now),
            since_start: now.saturating_duration_since(self.started),
        };
        *latest
    }

    #[must_use]
    pub fn time(&self) -> Time { *self.latest.read() }
}
impl Default for Clock
{
    fn default() -> Self { Self::new() }
}
