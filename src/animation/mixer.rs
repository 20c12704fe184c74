use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionKey;
}

/// Advances the actions bound under one model root.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionKey, AnimationAction>,
    /// Global mixer time in seconds, scaled by `time_scale`.
    pub time: f32,
    pub time_scale: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            time: 0.0,
            time_scale: 1.0,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Creates an idle action for `clip`, bound to nodes under the mixer root.
    pub fn clip_action(&mut self, scene: &Scene, clip: Arc<AnimationClip>) -> ActionKey {
        let bindings = Binder::bind(scene, self.root, &clip);
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        self.actions.insert(action)
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionKey, &AnimationAction)> {
        self.actions.iter()
    }

    pub fn running_actions(&self) -> impl Iterator<Item = (ActionKey, &AnimationAction)> {
        self.actions.iter().filter(|(_, action)| action.is_running())
    }

    /// Stops every action.
    pub fn stop_all_actions(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances all running actions by `dt` seconds and writes the sampled
    /// values into the bound node transforms.
    ///
    /// Negative or non-finite `dt` is treated as 0.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let dt = dt * self.time_scale;
        self.time += dt;

        for action in self.actions.values_mut() {
            action.update(dt);
        }

        for action in self.actions.values_mut() {
            if !action.is_running() || action.weight <= 0.0 {
                continue;
            }

            for binding_idx in 0..action.bindings.len() {
                let (track_index, node_handle) = {
                    let binding = &action.bindings[binding_idx];
                    (binding.track_index, binding.node_handle)
                };
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };
                let Some(node) = scene.get_node_mut(node_handle) else {
                    continue;
                };

                match (value, action.bindings[binding_idx].target) {
                    (TrackValue::Vector3(v), TargetPath::Translation) => {
                        node.transform.position = v;
                    }
                    (TrackValue::Vector3(v), TargetPath::Scale) => {
                        node.transform.scale = v;
                    }
                    (TrackValue::Quaternion(q), TargetPath::Rotation) => {
                        node.transform.rotation = q;
                    }
                    _ => {}
                }
            }
        }
    }
}
