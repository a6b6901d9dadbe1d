use std::cmp::Ordering;
use std::ops::{Add, Sub};
use std::time::Duration;

// Fractional seconds, used where time feeds straight into float math (e.g. oscillators)
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct FSeconds(pub f32);
impl FSeconds
{
    pub const ZERO: Self = Self(0.0);

    #[inline] #[must_use]
    pub fn as_f32(self) -> f32 { self.0 }
}
impl Eq for FSeconds { }
impl Ord for FSeconds
{
    fn cmp(&self, other: &Self) -> Ordering { self.0.total_cmp(&other.0) }
}
impl Add for FSeconds
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Self(self.0 + rhs.0) }
}
impl Sub for FSeconds
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Self(self.0 - rhs.0) }
}
impl From<Duration> for FSeconds
{
    fn from(duration: Duration) -> Self { Self(duration.as_secs_f32()) }
}
impl From<FSeconds> for Duration
{
    // negative or non-finite seconds become zero
    fn from(secs: FSeconds) -> Self { Self::try_from_secs_f32(secs.0).unwrap_or(Duration::ZERO) }
}
