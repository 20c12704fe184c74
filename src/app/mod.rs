//! Demo application layer.
//!
//! - [`DemoApp`]: scene setup, model loading and per-frame entry points
//! - [`FrameClock`]: millisecond timestamps to elapsed seconds
//! - [`Input`]: pointer tracking and NDC mapping
//! - [`OrbitControls`]: mouse-driven camera orbit
//! - [`DemoSettings`]: JSON-loadable configuration
//!
//! The optional [`winit`] front end drives a [`DemoApp`] from window events.

pub mod clock;
pub mod input;
pub mod orbit;
pub mod settings;
pub mod state;

#[cfg(feature = "winit")]
pub mod winit;

pub use clock::FrameClock;
pub use input::{Input, PointerButton, normalized_pointer};
pub use orbit::{OrbitControls, OrbitSettings};
pub use settings::DemoSettings;
pub use state::DemoApp;
