use std::fmt;

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

impl TrackMeta {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath) -> Self {
        Self {
            node_name: node_name.into(),
            target,
        }
    }
}

/// Track identity in `<NodeName>.<property>` form, e.g. `mixamorigNeck.quaternion`.
impl fmt::Display for TrackMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_name, self.target.property_name())
    }
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }
}

/// One animated channel: which node property it drives plus its keyframes.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn new(meta: TrackMeta, data: TrackData) -> Self {
        Self { meta, data }
    }

    /// Full track name, see [`TrackMeta`]'s `Display`.
    #[must_use]
    pub fn name(&self) -> String {
        self.meta.to_string()
    }

    /// Compares against a `<NodeName>.<property>` string without allocating.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        name.strip_prefix(self.meta.node_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|property| property == self.meta.target.property_name())
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds. Fixed at construction; removing tracks keeps it.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Indices of every track whose identity equals `name`.
    #[must_use]
    pub fn find_tracks_named(&self, name: &str) -> SmallVec<[usize; 4]> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| track.is_named(name))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Removes every track named `name` and returns how many were dropped.
    ///
    /// All matches are collected before the list is touched, then the track
    /// list is rebuilt in one `retain` pass.
    pub fn remove_tracks_named(&mut self, name: &str) -> usize {
        let matched = self.find_tracks_named(name);
        if matched.is_empty() {
            return 0;
        }

        let mut idx = 0;
        self.tracks.retain(|_| {
            let keep = !matched.contains(&idx);
            idx += 1;
            keep
        });

        matched.len()
    }
}
