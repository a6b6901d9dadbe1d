use std::fmt::{Display, Formatter};

// Counts driver loop iterations, starting at 1 for the first rendered frame
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderFrameNumber(pub u64);
impl RenderFrameNumber
{
    pub fn increment(&mut self) -> Self
    {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}
impl Display for RenderFrameNumber
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}
