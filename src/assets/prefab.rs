use crate::animation::clip::AnimationClip;
use crate::scene::transform::Transform;

/// Prefab node: plain data, children referenced by index into `Prefab::nodes`.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    pub children_indices: Vec<usize>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            children_indices: Vec::new(),
        }
    }
}

/// Parsed model: node hierarchy plus animation clips.
///
/// A `Prefab` holds no scene handles, so it can be produced on a loader
/// thread and handed to the main thread, where
/// [`Scene::instantiate`](crate::scene::Scene::instantiate) turns it into
/// live nodes.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
    pub root_indices: Vec<usize>,
    /// In source order (index `i` is the file's `animations[i]`).
    pub animations: Vec<AnimationClip>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }
}
