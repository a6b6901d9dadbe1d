use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use arc_swap::ArcSwapOption;
use crate::KeypointFrame;

struct FrameSlotInner
{
    current: ArcSwapOption<KeypointFrame>,
    writes: AtomicU64,
}

// Holds the most recent keypoint frame. Frames are swapped in whole, readers see the old frame or the new one
// Clones share the same slot
#[derive(Clone)]
pub struct FrameSlot
{
    inner: Arc<FrameSlotInner>,
}
impl FrameSlot
{
    #[must_use]
    pub fn new() -> Self
    {
        Self
        {
            inner: Arc::new(FrameSlotInner
            {
                current: ArcSwapOption::empty(),
                writes: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self, frame: Arc<KeypointFrame>)
    {
        self.inner.current.store(Some(frame));
        self.inner.writes.fetch_add(1, Ordering::Release);
    }

    #[must_use]
    pub fn load(&self) -> Option<Arc<KeypointFrame>>
    {
        self.inner.current.load_full()
    }

    pub fn clear(&self)
    {
        self.inner.current.store(None);
    }

    // Total number of frames ever stored
    #[must_use]
    pub fn writes(&self) -> u64
    {
        self.inner.writes.load(Ordering::Acquire)
    }
}
impl Default for FrameSlot
{
    fn default() -> Self { Self::new() }
}
impl std::fmt::Debug for FrameSlot
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("FrameSlot")
            .field("Has frame", &self.inner.current.load().is_some())
            .field("Writes", &self.writes())
            .finish()
    }
}
