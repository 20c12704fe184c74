//! Scene graph.
//!
//! - [`Node`]: named node with parent/child links and a [`Transform`]
//! - [`Scene`]: node storage plus cameras, lights and animation mixers
//! - [`Camera`]: perspective projection settings
//! - [`Light`]: directional and ambient lights with shadow settings

pub mod camera;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind, ShadowConfig};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct MixerKey;
}
