pub mod config;
pub use config::RetargetConfig;

mod bone_aliases;
pub use bone_aliases::*;

mod bone_registry;
pub use bone_registry::*;

mod bone_resolver;
pub use bone_resolver::*;

pub mod keypoints;
pub use keypoints::{BoneSample, KeypointFrame, KeypointLibrary};

mod frame_slot;
pub use frame_slot::FrameSlot;

pub mod frame_scheduler;
pub use frame_scheduler::FrameScheduler;

pub mod pose_applicator;
pub use pose_applicator::PoseApplicator;

mod avatar;
pub use avatar::*;

pub mod playback;
pub use playback::{Playback, PlaybackStatus};
