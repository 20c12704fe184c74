use glam::{Affine3A, Quat, Vec3};
use slotmap::SlotMap;

use crate::animation::AnimationMixer;
use crate::assets::prefab::Prefab;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::transform::look_rotation;
use crate::scene::{CameraKey, LightKey, MixerKey, NodeHandle};

/// Scene graph plus its component pools.
///
/// Nodes are addressed by [`NodeHandle`]; a removed or foreign handle simply
/// resolves to `None` everywhere.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub animation_mixers: SlotMap<MixerKey, AnimationMixer>,

    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            animation_mixers: SlotMap::with_key(),
            active_camera: None,
        }
    }

    /// Adds a node at the top level of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        self.root_nodes.push(handle);
        self.attach(handle, parent);
        handle
    }

    /// Moves `child` under `parent`, detaching it from its previous parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach a node below its own descendant");
            return;
        }

        // 1. Detach from old
        match self.nodes[child].parent {
            Some(old) => {
                if let Some(n) = self.nodes.get_mut(old) {
                    n.children.retain(|&c| c != child);
                }
            }
            None => self.root_nodes.retain(|&r| r != child),
        }

        // 2. Attach to new
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    fn is_ancestor(&self, ancestor: NodeHandle, mut node: NodeHandle) -> bool {
        while let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first search for a node called `name` in the subtree at `root`
    /// (the root included). The first match in pre-order wins.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.name == name {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Handles of the subtree at `root` in depth-first pre-order.
    #[must_use]
    pub fn subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.get(handle) {
                out.push(handle);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Calls `f` on every node of the subtree at `root`.
    pub fn traverse_mut(&mut self, root: NodeHandle, mut f: impl FnMut(&mut Node)) {
        for handle in self.subtree(root) {
            if let Some(node) = self.nodes.get_mut(handle) {
                f(node);
            }
        }
    }

    // ========================================================================
    // Spatial queries
    // ========================================================================

    /// World matrix of `handle`, composed along its parent chain.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut matrix = node.transform.local_matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            matrix = parent.transform.local_matrix() * matrix;
            node = parent;
        }
        Some(matrix)
    }

    /// Rotates `handle` so its +Z axis faces `target` (world space), keeping
    /// world +Y as the up direction. Returns `false` when nothing changed.
    pub fn look_at_world(&mut self, handle: NodeHandle, target: Vec3) -> bool {
        let Some(world) = self.world_matrix(handle) else {
            return false;
        };
        let position = Vec3::from(world.translation);
        let Some(world_rotation) = look_rotation(target - position, Vec3::Y) else {
            return false;
        };

        let parent_rotation = self
            .nodes
            .get(handle)
            .and_then(|n| n.parent)
            .and_then(|p| self.world_matrix(p))
            .map_or(Quat::IDENTITY, |m| m.to_scale_rotation_translation().1);

        match self.nodes.get_mut(handle) {
            Some(node) => {
                node.transform.rotation = (parent_rotation.inverse() * world_rotation).normalize();
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Component API
    // ========================================================================

    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let mut node = Node::new(camera.name.clone());
        node.camera = Some(self.cameras.insert(camera));
        self.add_node(node)
    }

    /// The camera attached to [`Scene::active_camera`], if any.
    pub fn main_camera_mut(&mut self) -> Option<&mut Camera> {
        let key = self.nodes.get(self.active_camera?)?.camera?;
        self.cameras.get_mut(key)
    }

    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let mut node = Node::new("Light");
        node.light = Some(self.lights.insert(light));
        self.add_node(node)
    }

    pub fn add_mixer(&mut self, mixer: AnimationMixer) -> MixerKey {
        self.animation_mixers.insert(mixer)
    }

    #[must_use]
    pub fn mixer(&self, key: MixerKey) -> Option<&AnimationMixer> {
        self.animation_mixers.get(key)
    }

    pub fn mixer_mut(&mut self, key: MixerKey) -> Option<&mut AnimationMixer> {
        self.animation_mixers.get_mut(key)
    }

    // ========================================================================
    // Prefab instantiation
    // ========================================================================

    /// Copies the prefab hierarchy into the scene below a fresh `gltf_root`
    /// node and returns that node.
    pub fn instantiate(&mut self, prefab: &Prefab) -> NodeHandle {
        let root = self.create_node_with_name("gltf_root");

        let handles: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut node = Node::new(p.name.clone());
                node.transform = p.transform;
                self.nodes.insert(node)
            })
            .collect();

        for (idx, prefab_node) in prefab.nodes.iter().enumerate() {
            for &child_idx in &prefab_node.children_indices {
                if let Some(&child) = handles.get(child_idx) {
                    self.link(child, handles[idx]);
                }
            }
        }

        for &root_idx in &prefab.root_indices {
            if let Some(&handle) = handles.get(root_idx) {
                self.link(handle, root);
            }
        }

        root
    }

    /// Wires a freshly inserted (parentless, non-root) node under `parent`.
    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if self.nodes[child].parent.is_some() {
            log::warn!("Prefab node has more than one parent; keeping the first");
            return;
        }
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Prefab hierarchy contains a cycle; dropping the back edge");
            return;
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }
}
