//! Skeletal Animation
//!
//! - [`KeyframeTrack`]: time-sorted keyframes with Linear/Step/CubicSpline sampling
//! - [`AnimationClip`]: named tracks addressed by bone name
//! - [`Skeleton`]: bone hierarchy with local pose and derived world matrices
//! - [`Binder`]: resolves clip tracks against a skeleton
//! - [`AnimationAction`]: playback cursor with loop handling
//! - [`AnimationMixer`]: the `Idle → Loading → Bound → Playing` state machine
//!   the frame loop drives every tick

pub mod action;
pub mod binder;
pub mod clip;
pub mod mixer;
pub mod skeleton;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, TrackValue};
pub use binder::{Binder, PropertyBinding};
pub use clip::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
pub use mixer::{AnimationMixer, MixerState};
pub use skeleton::{Bone, BonePose, Skeleton, SkeletonError};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
