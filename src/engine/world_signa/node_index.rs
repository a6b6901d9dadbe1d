use std::fmt::{Debug, Formatter};

// Non-owning handle to a node inside a Scene
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);
impl NodeIndex
{
    const NONE: usize = usize::MAX;

    #[inline] #[must_use] pub const fn none() -> Self { Self(Self::NONE) }
    #[inline] #[must_use] pub const fn some(n: usize) -> Self { Self(n) }

    #[inline] #[must_use] pub const fn is_none(self) -> bool { self.0 == Self::NONE }
    #[inline] #[must_use] pub const fn is_some(self) -> bool { self.0 != Self::NONE }

    #[inline] #[must_use]
    pub const fn get(self) -> Option<usize>
    {
        match self.is_some()
        {
            true => Some(self.0),
            false => None,
        }
    }
}
impl Default for NodeIndex
{
    fn default() -> Self { Self::none() }
}
impl Debug for NodeIndex
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self.get()
        {
            Some(n) => write!(f, "#{n}"),
            None => f.write_str("#none"),
        }
    }
}
