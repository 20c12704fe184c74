//! Animation clip driver.
//!
//! Sits between the clips of one loaded model and the frame loop:
//!
//! - trims the neck rotation track from head-controllable clips, once, so the
//!   pointer-driven look-at owns that joint while those clips play
//! - keeps exactly one of its actions running and switches on request
//! - aims the neck joint at the pointer while a head-controllable clip plays
//!
//! Advancing time is shared by every model in the scene and lives in
//! [`AnimationSystem::update`]; [`ClipDriver::advance`] forwards to it.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::animation::binding::TargetPath;
use crate::animation::{ActionKey, AnimationClip, AnimationMixer, AnimationSystem};
use crate::errors::{Error, Result};
use crate::scene::{MixerKey, NodeHandle, Scene};

/// Which clips hand the neck joint over to the pointer, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadTracking {
    /// Joint whose `.quaternion` track is removed and which is aimed at the pointer.
    pub neck_joint: String,
    /// Clip indices that allow the override.
    pub controllable_clips: Vec<usize>,
    /// Added to `(pointer.x, pointer.y, 0)` to build the look target in model space.
    pub look_offset: Vec3,
}

impl Default for HeadTracking {
    fn default() -> Self {
        Self {
            neck_joint: "mixamorigNeck".to_string(),
            controllable_clips: vec![0, 3],
            look_offset: Vec3::new(-0.1, 1.1, 1.0),
        }
    }
}

impl HeadTracking {
    /// Identity of the neck rotation track, e.g. `mixamorigNeck.quaternion`.
    #[must_use]
    pub fn neck_track_name(&self) -> String {
        format!("{}.{}", self.neck_joint, TargetPath::Rotation.property_name())
    }
}

/// Owns the clip set of one model and enforces single-clip playback.
pub struct ClipDriver {
    model_root: NodeHandle,
    mixer: MixerKey,
    clips: Vec<Arc<AnimationClip>>,
    actions: Vec<ActionKey>,
    head_controllable: FxHashSet<usize>,
    neck: Option<NodeHandle>,
    look_offset: Vec3,
    playing: usize,
}

impl ClipDriver {
    /// Builds the driver for a model instantiated at `model_root`.
    ///
    /// Head-controllable clips lose their neck rotation tracks, a mixer is
    /// registered in `scene`, one action is bound per clip in input order and
    /// clip 0 starts playing.
    pub fn initialize(
        scene: &mut Scene,
        model_root: NodeHandle,
        mut clips: Vec<AnimationClip>,
        head_tracking: &HeadTracking,
    ) -> Result<Self> {
        if clips.is_empty() {
            return Err(Error::EmptyClipSet);
        }

        let neck_track = head_tracking.neck_track_name();
        let mut head_controllable = FxHashSet::default();
        for &index in &head_tracking.controllable_clips {
            let Some(clip) = clips.get_mut(index) else {
                log::warn!(
                    "Head-controllable clip index {index} is out of range ({} clips)",
                    clips.len()
                );
                continue;
            };
            if head_controllable.insert(index) {
                let removed = clip.remove_tracks_named(&neck_track);
                log::debug!("Clip {index} '{}': removed {removed} '{neck_track}' track(s)", clip.name);
            }
        }

        let neck = scene.find_node_by_name(model_root, &head_tracking.neck_joint);
        if neck.is_none() {
            log::debug!(
                "Neck joint '{}' not found; head tracking disabled",
                head_tracking.neck_joint
            );
        }

        let clips: Vec<Arc<AnimationClip>> = clips.into_iter().map(Arc::new).collect();

        let mut mixer = AnimationMixer::new(model_root);
        let actions: Vec<ActionKey> = clips
            .iter()
            .map(|clip| mixer.clip_action(scene, Arc::clone(clip)))
            .collect();
        if let Some(first) = mixer.action_mut(actions[0]) {
            first.play();
        }
        let mixer = scene.add_mixer(mixer);

        log::info!(
            "Clip driver ready: {} clips, playing '{}'",
            clips.len(),
            clips[0].name
        );

        Ok(Self {
            model_root,
            mixer,
            clips,
            actions,
            head_controllable,
            neck,
            look_offset: head_tracking.look_offset,
            playing: 0,
        })
    }

    /// Advances every mixer in the scene by `elapsed_seconds`.
    pub fn advance(scene: &mut Scene, elapsed_seconds: f32) {
        AnimationSystem::update(scene, elapsed_seconds);
    }

    /// Stops the current clip and starts clip `index`.
    ///
    /// An out-of-range index fails with [`Error::InvalidClipIndex`] before
    /// anything is touched.
    pub fn select_clip(&mut self, scene: &mut Scene, index: usize) -> Result<()> {
        let len = self.clips.len();
        let Some(&next) = self.actions.get(index) else {
            return Err(Error::InvalidClipIndex { index, len });
        };
        let current = self.actions[self.playing];

        let mixer = scene.mixer_mut(self.mixer).ok_or(Error::NotLoaded)?;
        if let Some(action) = mixer.action_mut(current) {
            action.stop();
        }
        if let Some(action) = mixer.action_mut(next) {
            action.play();
        }
        self.playing = index;

        log::info!("Playing clip {index} '{}'", self.clips[index].name);
        Ok(())
    }

    /// Turns the neck towards the pointer (normalized device coordinates).
    ///
    /// Does nothing unless the current clip is head-controllable and the neck
    /// joint exists. Returns whether the joint was rotated.
    pub fn look_at(&self, scene: &mut Scene, pointer: Vec2) -> bool {
        if !self.is_head_controllable(self.playing) {
            return false;
        }
        let Some(neck) = self.neck else {
            return false;
        };

        let local_target = Vec3::new(pointer.x, pointer.y, 0.0) + self.look_offset;
        let Some(model_matrix) = scene.world_matrix(self.model_root) else {
            return false;
        };
        let world_target = model_matrix.transform_point3(local_target);

        scene.look_at_world(neck, world_target)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn playing_index(&self) -> usize {
        self.playing
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    #[must_use]
    pub fn action_key(&self, index: usize) -> Option<ActionKey> {
        self.actions.get(index).copied()
    }

    #[must_use]
    pub fn mixer_key(&self) -> MixerKey {
        self.mixer
    }

    #[must_use]
    pub fn model_root(&self) -> NodeHandle {
        self.model_root
    }

    #[must_use]
    pub fn neck(&self) -> Option<NodeHandle> {
        self.neck
    }

    #[must_use]
    pub fn is_head_controllable(&self, index: usize) -> bool {
        self.head_controllable.contains(&index)
    }
}
