//! # Kinema
//!
//! Plays the skeletal animation clips of a glTF model, one at a time, and
//! lets the pointer steer the model's head while selected clips run.
//!
//! The pieces, bottom-up:
//!
//! - [`scene`]: node hierarchy with TRS transforms, cameras and lights
//! - [`animation`]: keyframe tracks, clips, actions and mixers
//! - [`assets`]: background glTF/GLB loading into a [`Prefab`](assets::Prefab)
//! - [`driver`]: the [`ClipDriver`] that owns a model's clips
//! - [`app`]: [`DemoApp`], the frame clock and the optional window front end
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kinema::{DemoApp, DemoSettings};
//!
//! let mut app = DemoApp::new(DemoSettings::default());
//! app.wait_for_loads();
//! app.select_clip(1)?;
//! for frame in 0..60 {
//!     app.frame(f64::from(frame) * 16.7);
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod driver;
pub mod errors;
pub mod scene;

pub use animation::{
    ActionKey, AnimationAction, AnimationClip, AnimationMixer, AnimationSystem, LoopMode,
};
pub use app::{DemoApp, DemoSettings, FrameClock};
pub use assets::{AssetServer, GltfLoader, LoadTask, Prefab};
pub use driver::{ClipDriver, HeadTracking};
pub use errors::{Error, Result};
pub use scene::{Camera, Light, Node, NodeHandle, Scene, Transform};
