use std::fs;
use std::path::Path;

use base64::Engine;
use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::animation::values::Interpolatable;
use crate::assets::prefab::{Prefab, PrefabNode};
use crate::errors::{Error, Result};
use crate::scene::transform::Transform;

/// glTF 2.0 / GLB parser producing a [`Prefab`].
///
/// Only the node hierarchy and the animations are read. Meshes, materials and
/// skins are left to whatever renders the model.
pub struct GltfLoader;

impl GltfLoader {
    /// Reads and parses the file at `path`. External buffers resolve relative
    /// to the file's directory.
    pub fn load(path: &Path) -> Result<Prefab> {
        let bytes = fs::read(path)?;
        let base_path = path.parent().unwrap_or(Path::new("./"));
        Self::load_from_slice(&bytes, base_path)
    }

    /// Parses an in-memory `.gltf` or `.glb` document.
    pub fn load_from_slice(bytes: &[u8], base_path: &Path) -> Result<Prefab> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let required: Vec<_> = gltf.extensions_required().collect();
        if !required.is_empty() {
            log::warn!("glTF file requires extensions {required:?}; animation data may still load");
        }

        let buffers = Self::load_buffers(&gltf, base_path)?;

        let mut prefab = Prefab::new();
        prefab.nodes = gltf.nodes().map(|node| Self::read_node(&node)).collect();

        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            prefab.root_indices = scene.nodes().map(|n| n.index()).collect();
        } else {
            // No scene list: every node without a parent is a root.
            let mut has_parent = vec![false; prefab.nodes.len()];
            for node in &prefab.nodes {
                for &child in &node.children_indices {
                    if let Some(flag) = has_parent.get_mut(child) {
                        *flag = true;
                    }
                }
            }
            prefab.root_indices = (0..prefab.nodes.len()).filter(|&i| !has_parent[i]).collect();
        }

        prefab.animations = Self::load_animations(&gltf, &buffers);

        log::info!(
            "Parsed glTF: {} nodes, {} animation clips",
            prefab.nodes.len(),
            prefab.animations.len()
        );
        Ok(prefab)
    }

    fn read_node(node: &gltf::Node) -> PrefabNode {
        let name = node
            .name()
            .map_or_else(|| format!("Node_{}", node.index()), str::to_string);

        let (t, r, s) = node.transform().decomposed();
        let mut prefab_node = PrefabNode::new(name);
        prefab_node.transform = Transform::from_trs(
            Vec3::from_array(t),
            Quat::from_array(r),
            Vec3::from_array(s),
        );
        prefab_node.children_indices = node.children().map(|c| c.index()).collect();
        prefab_node
    }

    fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_deref()
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| Error::GltfError("Missing GLB binary chunk".to_string()))?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => {
                    let buffer_path = base_path.join(uri);
                    fs::read(&buffer_path).map_err(|e| {
                        Error::GltfError(format!(
                            "Failed to read buffer file {}: {e}",
                            buffer_path.display()
                        ))
                    })?
                }
            };
            if data.len() < buffer.length() {
                return Err(Error::GltfError(format!(
                    "Buffer {} holds {} bytes, expected {}",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let clip_name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let gltf_node = target.node();

                let node_name = gltf_node
                    .name()
                    .map_or_else(|| format!("Node_{}", gltf_node.index()), str::to_string);

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("Clip '{clip_name}': channel on '{node_name}' has no input data");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let outputs = reader.read_outputs();
                let (target_path, data) = match (target.property(), outputs) {
                    (
                        gltf::animation::Property::Translation,
                        Some(gltf::animation::util::ReadOutputs::Translations(iter)),
                    ) => {
                        let values = iter.map(Vec3::from_array).collect();
                        (
                            TargetPath::Translation,
                            build_track(times, values, interpolation).map(TrackData::Vector3),
                        )
                    }
                    (
                        gltf::animation::Property::Rotation,
                        Some(gltf::animation::util::ReadOutputs::Rotations(iter)),
                    ) => {
                        let values = iter.into_f32().map(Quat::from_array).collect();
                        (
                            TargetPath::Rotation,
                            build_track(times, values, interpolation).map(TrackData::Quaternion),
                        )
                    }
                    (
                        gltf::animation::Property::Scale,
                        Some(gltf::animation::util::ReadOutputs::Scales(iter)),
                    ) => {
                        let values = iter.map(Vec3::from_array).collect();
                        (
                            TargetPath::Scale,
                            build_track(times, values, interpolation).map(TrackData::Vector3),
                        )
                    }
                    (gltf::animation::Property::MorphTargetWeights, _) => {
                        log::debug!("Clip '{clip_name}': skipping morph weights on '{node_name}'");
                        continue;
                    }
                    (property, _) => {
                        log::warn!(
                            "Clip '{clip_name}': unreadable {property:?} output on '{node_name}'"
                        );
                        continue;
                    }
                };

                let Some(data) = data else {
                    log::warn!(
                        "Clip '{clip_name}': keyframe count mismatch on '{node_name}', track dropped"
                    );
                    continue;
                };

                tracks.push(Track::new(TrackMeta::new(node_name, target_path), data));
            }

            animations.push(AnimationClip::new(clip_name, tracks));
        }

        animations
    }
}

/// Builds a keyframe track if the value count fits the interpolation mode.
fn build_track<T: Interpolatable>(
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
) -> Option<KeyframeTrack<T>> {
    let track = KeyframeTrack::new(times, values, interpolation);
    track.is_well_formed().then_some(track)
}

/// Decodes a base64 `data:` URI.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(Error::DataUriError(format!(
            "only base64 data URIs are supported, got '{header}'"
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
