use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Playback state of one clip inside a mixer.
///
/// A freshly created action is idle: it takes part in [`AnimationMixer::update`]
/// only after [`play`](Self::play). [`stop`](Self::stop) deactivates it and
/// rewinds it to the start.
///
/// [`AnimationMixer::update`]: crate::animation::AnimationMixer::update
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    /// Scheduled in the mixer (set by `play`, cleared by `stop`).
    active: bool,
    /// Unfolded position inside a `[0, 2 * duration)` ping-pong cycle.
    pingpong_phase: f32,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            active: false,
            pingpong_phase: 0.0,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Schedules the action and clears any pause.
    pub fn play(&mut self) -> &mut Self {
        self.active = true;
        self.enabled = true;
        self.paused = false;
        self
    }

    /// Unschedules the action and rewinds it.
    pub fn stop(&mut self) -> &mut Self {
        self.active = false;
        self.reset()
    }

    /// Rewinds to time 0 without changing the scheduled state.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.pingpong_phase = 0.0;
        self.paused = false;
        self.track_cursors.fill(KeyframeCursor::default());
        self
    }

    /// Whether this action currently drives its bound nodes.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active && self.enabled && !self.paused
    }

    /// Advance local time by `dt` seconds, honouring the loop mode.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        let delta = dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                self.time += delta;
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                self.time += delta;
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut phase = (self.pingpong_phase + delta) % double_duration;
                if phase < 0.0 {
                    phase += double_duration;
                }
                self.pingpong_phase = phase;
                // Second half of the cycle plays backwards
                self.time = if phase > duration {
                    double_duration - phase
                } else {
                    phase
                };
            }
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
