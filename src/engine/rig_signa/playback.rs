use std::fmt::{Display, Formatter};
use nab_signa::timing::TimeNanos;
use crate::frame_scheduler::{PlayError, ScheduleEvent};
use crate::keypoints::KeypointLoadError;
use crate::{FrameScheduler, FrameSlot, KeypointFrame};

// User facing state of animation playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus
{
    Ready,
    Playing(String),
    Finished,
    NoAnimationFound(String),
    LoadFailed,
}
impl Display for PlaybackStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            PlaybackStatus::Ready => f.write_str("Ready"),
            PlaybackStatus::Playing(word) => write!(f, "Playing \"{word}\"..."),
            PlaybackStatus::Finished => f.write_str("Finished"),
            PlaybackStatus::NoAnimationFound(word) => write!(f, "No animation found for \"{word}\""),
            PlaybackStatus::LoadFailed => f.write_str("Error loading animation"),
        }
    }
}

// Turns animation requests into scheduled playback and tracks the status to show for them
#[derive(Debug)]
pub struct Playback
{
    scheduler: FrameScheduler,
    status: PlaybackStatus,
}
impl Playback
{
    #[must_use]
    pub fn new(scheduler: FrameScheduler) -> Self
    {
        Self
        {
            scheduler,
            status: PlaybackStatus::Ready,
        }
    }

    #[inline] #[must_use] pub fn status(&self) -> &PlaybackStatus { &self.status }
    #[inline] #[must_use] pub fn scheduler(&self) -> &FrameScheduler { &self.scheduler }
    #[inline] #[must_use] pub fn slot(&self) -> &FrameSlot { self.scheduler.slot() }

    // Handle the result of loading the animation for a word
    pub fn request(&mut self, word: &str, frames: Result<Vec<KeypointFrame>, KeypointLoadError>, now: TimeNanos) -> &PlaybackStatus
    {
        let word = word.trim().to_string();
        self.status = match frames
        {
            Ok(frames) => match self.scheduler.play(frames, now)
            {
                Ok(()) => PlaybackStatus::Playing(word),
                Err(PlayError::EmptyFrameSequence) => PlaybackStatus::NoAnimationFound(word),
            },
            Err(KeypointLoadError::NotFound(_) | KeypointLoadError::EmptyWord) => PlaybackStatus::NoAnimationFound(word),
            Err(err) =>
            {
                log::error!("Failed to load animation for '{word}': {err}");
                PlaybackStatus::LoadFailed
            }
        };
        log::info!("{}", self.status);
        &self.status
    }

    pub fn stop(&mut self)
    {
        self.scheduler.stop();
        self.status = PlaybackStatus::Ready;
    }

    pub fn tick(&mut self, now: TimeNanos) -> ScheduleEvent
    {
        let event = self.scheduler.tick(now);
        if event == ScheduleEvent::Finished
        {
            self.status = PlaybackStatus::Finished;
            log::info!("{}", self.status);
        }
        event
    }
}
