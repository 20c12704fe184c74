//! Animation runtime: keyframe tracks, clips, actions and mixers.
//!
//! A [`AnimationMixer`] belongs to one model root and owns one
//! [`AnimationAction`] per bound [`AnimationClip`]. Each frame
//! [`AnimationSystem::update`] advances every mixer in the scene.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod system;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionKey, AnimationMixer};
pub use system::AnimationSystem;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
