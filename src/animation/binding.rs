use serde::{Deserialize, Serialize};

use crate::scene::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
}

impl TargetPath {
    /// Property segment used in track names.
    #[must_use]
    pub fn property_name(self) -> &'static str {
        match self {
            TargetPath::Translation => "position",
            TargetPath::Rotation => "quaternion",
            TargetPath::Scale => "scale",
        }
    }
}

/// Binding relationship: maps track `track_index` from a Clip to the target property
/// of `node_handle` in the scene.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
