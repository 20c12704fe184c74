//! Builds small glTF characters in memory for the asset and app tests.

#![allow(dead_code)]

use std::path::Path;

use base64::Engine;
use serde_json::{Value, json};

pub const CLIP_NAMES: [Option<&str>; 4] = [Some("Idle"), Some("Walk"), Some("Run"), None];

/// `Armature → mixamorigHips → mixamorigSpine → mixamorigNeck`, with four
/// one-second clips that each move the hips and rotate the neck.
pub struct Character {
    pub json: Value,
    pub bin: Vec<u8>,
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

impl Character {
    #[must_use]
    pub fn new() -> Self {
        let half = 0.25_f32;
        let mut bin = f32_bytes(&[0.0, 1.0]);
        bin.extend(f32_bytes(&[0.0, 1.0, 0.0, 0.0, 1.1, 0.0]));
        bin.extend(f32_bytes(&[0.0, 0.0, 0.0, 1.0, half.sin(), 0.0, 0.0, half.cos()]));
        assert_eq!(bin.len(), 64);

        let animations: Vec<Value> = CLIP_NAMES
            .iter()
            .map(|name| {
                let mut anim = json!({
                    "samplers": [
                        { "input": 0, "output": 1, "interpolation": "LINEAR" },
                        { "input": 0, "output": 2, "interpolation": "LINEAR" }
                    ],
                    "channels": [
                        { "sampler": 0, "target": { "node": 1, "path": "translation" } },
                        { "sampler": 1, "target": { "node": 3, "path": "rotation" } }
                    ]
                });
                if let Some(name) = name {
                    anim["name"] = json!(name);
                }
                anim
            })
            .collect();

        let json = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [ { "nodes": [0] } ],
            "nodes": [
                { "name": "Armature", "children": [1] },
                { "name": "mixamorigHips", "translation": [0.0, 1.0, 0.0], "children": [2] },
                { "name": "mixamorigSpine", "translation": [0.0, 0.3, 0.0], "children": [3] },
                { "name": "mixamorigNeck", "translation": [0.0, 0.2, 0.0] }
            ],
            "buffers": [ { "byteLength": 64 } ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
                { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
                { "buffer": 0, "byteOffset": 32, "byteLength": 32 }
            ],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
                  "min": [0.0], "max": [1.0] },
                { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
                { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC4" }
            ],
            "animations": animations
        });

        Self { json, bin }
    }

    /// `.gltf` text with the buffer embedded as a base64 data URI.
    #[must_use]
    pub fn gltf_with_data_uri(&self) -> Vec<u8> {
        let mut json = self.json.clone();
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.bin);
        json["buffers"][0]["uri"] = json!(format!("data:application/octet-stream;base64,{payload}"));
        serde_json::to_vec(&json).unwrap()
    }

    /// `.gltf` text that references an external buffer file.
    #[must_use]
    pub fn gltf_with_external_buffer(&self, uri: &str) -> Vec<u8> {
        let mut json = self.json.clone();
        json["buffers"][0]["uri"] = json!(uri);
        serde_json::to_vec(&json).unwrap()
    }

    /// Binary container: JSON chunk followed by the BIN chunk.
    #[must_use]
    pub fn glb(&self) -> Vec<u8> {
        let mut json_chunk = serde_json::to_vec(&self.json).unwrap();
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        let mut bin_chunk = self.bin.clone();
        while bin_chunk.len() % 4 != 0 {
            bin_chunk.push(0);
        }

        let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2_u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend(json_chunk);
        out.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend(bin_chunk);
        out
    }

    /// Writes the GLB to `dir/name`.
    pub fn write_glb(&self, dir: &Path, name: &str) {
        std::fs::write(dir.join(name), self.glb()).unwrap();
    }
}
