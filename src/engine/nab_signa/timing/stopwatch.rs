use std::time::Duration;

pub type TimeNanos = u64; // nanoseconds since the owning clock started

// A timer driven by externally supplied timestamps, so it can be stepped deterministically
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Stopwatch
{
    started_at: Option<TimeNanos>,
}
impl Stopwatch
{
    #[inline] #[must_use]
    pub fn started(now: TimeNanos) -> Self
    {
        Self { started_at: Some(now) }
    }

    #[inline] #[must_use]
    pub fn is_running(&self) -> bool { self.started_at.is_some() }

    // Start timing from `now`. Does nothing if already running
    #[inline]
    pub fn start(&mut self, now: TimeNanos)
    {
        self.started_at.get_or_insert(now);
    }

    // Start timing from `now`, discarding any previous start
    #[inline]
    pub fn restart(&mut self, now: TimeNanos)
    {
        self.started_at = Some(now);
    }

    #[inline]
    pub fn reset(&mut self)
    {
        self.started_at = None;
    }

    // Zero if not running. A clock that went backwards counts as no time passing
    #[inline] #[must_use]
    pub fn elapsed(&self, now: TimeNanos) -> Duration
    {
        self.started_at.map_or(Duration::ZERO, |start| Duration::from_nanos(now.saturating_sub(start)))
    }

    // How many whole periods have elapsed, i.e. how many times a repeating timer would have fired
    #[must_use]
    pub fn elapsed_periods(&self, now: TimeNanos, period: Duration) -> u64
    {
        match period.as_nanos()
        {
            0 => 0,
            period_nanos => (self.elapsed(now).as_nanos() / period_nanos) as u64,
        }
    }
}
