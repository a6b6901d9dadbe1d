use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use nab_signa::timing::{Stopwatch, TimeNanos};
use crate::{FrameSlot, KeypointFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState
{
    Idle,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEvent
{
    // nothing is playing
    Idle,
    // playing, but no step was due
    Waiting,
    // one or more frames were written, index is the last one written
    Advanced { index: usize },
    // the sequence ran out and the schedule was cancelled. The last frame stays in the slot
    Finished,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PlayError
{
    EmptyFrameSequence,
}
impl Error for PlayError { }
impl Display for PlayError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}

struct AnimationSession
{
    frames: Box<[Arc<KeypointFrame>]>,
    next_index: usize,
    fired: u64, // timer steps already handled
    timer: Stopwatch,
}

// Steps through a keypoint sequence at a fixed period, writing each frame to the slot in turn
// Step k (1-based) is due `k * period` after play. The step after the last frame ends the session
pub struct FrameScheduler
{
    slot: FrameSlot,
    period: Duration,
    session: Option<AnimationSession>,
    state: SchedulerState,
}
impl FrameScheduler
{
    #[must_use]
    pub fn new(slot: FrameSlot, period: Duration) -> Self
    {
        debug_assert!(!period.is_zero());
        Self
        {
            slot,
            period,
            session: None,
            state: SchedulerState::Idle,
        }
    }

    #[inline] #[must_use] pub fn state(&self) -> SchedulerState { self.state }
    #[inline] #[must_use] pub fn is_playing(&self) -> bool { self.state == SchedulerState::Playing }
    #[inline] #[must_use] pub fn period(&self) -> Duration { self.period }
    #[inline] #[must_use] pub fn slot(&self) -> &FrameSlot { &self.slot }

    // (frames written, total frames) of the current session
    #[must_use]
    pub fn progress(&self) -> Option<(usize, usize)>
    {
        self.session.as_ref().map(|s| (s.next_index, s.frames.len()))
    }

    // Start a new sequence, cancelling any in flight. An empty sequence leaves the current schedule untouched
    pub fn play(&mut self, frames: Vec<KeypointFrame>, now: TimeNanos) -> Result<(), PlayError>
    {
        if frames.is_empty()
        {
            return Err(PlayError::EmptyFrameSequence);
        }

        if let Some(previous) = self.session.take()
        {
            log::info!("Cancelling playback at frame {}/{}", previous.next_index, previous.frames.len());
        }

        log::info!("Playing {} frames every {:?}", frames.len(), self.period);
        self.session = Some(AnimationSession
        {
            frames: frames.into_iter().map(Arc::new).collect(),
            next_index: 0,
            fired: 0,
            timer: Stopwatch::started(now),
        });
        self.state = SchedulerState::Playing;
        Ok(())
    }

    // Cancel playback. Whatever frame is in the slot stays there
    pub fn stop(&mut self)
    {
        if self.session.take().is_some()
        {
            log::info!("Playback stopped");
        }
        self.state = SchedulerState::Idle;
    }

    // Run every step that has come due by `now`, in order
    pub fn tick(&mut self, now: TimeNanos) -> ScheduleEvent
    {
        puffin::profile_function!();

        let Some(session) = &mut self.session else
        {
            return ScheduleEvent::Idle;
        };

        let due = session.timer.elapsed_periods(now, self.period);
        let mut event = ScheduleEvent::Waiting;
        while session.fired < due
        {
            session.fired += 1;
            let Some(frame) = session.frames.get(session.next_index) else
            {
                log::info!("Playback finished after {} frames", session.frames.len());
                self.session = None;
                self.state = SchedulerState::Finished;
                return ScheduleEvent::Finished;
            };
            self.slot.store(frame.clone());
            event = ScheduleEvent::Advanced { index: session.next_index };
            session.next_index += 1;
        }
        event
    }
}
impl Debug for FrameScheduler
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("FrameScheduler")
            .field("State", &self.state)
            .field("Period", &self.period)
            .field("Progress", &self.progress())
            .finish()
    }
}
