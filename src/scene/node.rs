use crate::scene::{CameraKey, LightKey, NodeHandle};
use crate::scene::transform::Transform;

/// A scene node: name, hierarchy links, local transform and shadow flags.
///
/// Cameras and lights live in the [`Scene`](crate::scene::Scene)'s
/// component maps; the node only stores their keys.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    /// Local TRS relative to the parent
    pub transform: Transform,

    // === Components ===
    pub camera: Option<CameraKey>,
    pub light: Option<LightKey>,

    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            camera: None,
            light: None,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
