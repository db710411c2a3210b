//! Document tree construction
//!
//! Builds an ordered `serde_json::Value` tree from the Bedrock types. Keys are
//! inserted in the order the engine's own files use, and unset optional fields
//! are never inserted, so the tree contains no nulls.

use glam::{Vec2, Vec3};
use rig_common::FaceUv;
use serde_json::{Map, Number, Value};

use super::types::{
    BedrockBone, BedrockCube, BedrockDescription, BedrockGeometry, BedrockPolyMesh, BedrockUv,
};

pub const KEY_FORMAT_VERSION: &str = "format_version";
pub const KEY_GEOMETRY: &str = "minecraft:geometry";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_IDENTIFIER: &str = "identifier";
pub const KEY_TEXTURE_WIDTH: &str = "texture_width";
pub const KEY_TEXTURE_HEIGHT: &str = "texture_height";
pub const KEY_VISIBLE_BOUNDS_WIDTH: &str = "visible_bounds_width";
pub const KEY_VISIBLE_BOUNDS_HEIGHT: &str = "visible_bounds_height";
pub const KEY_VISIBLE_BOUNDS_OFFSET: &str = "visible_bounds_offset";
pub const KEY_BONES: &str = "bones";
pub const KEY_NAME: &str = "name";
pub const KEY_PARENT: &str = "parent";
pub const KEY_PIVOT: &str = "pivot";
pub const KEY_ROTATION: &str = "rotation";
pub const KEY_CUBES: &str = "cubes";
pub const KEY_ORIGIN: &str = "origin";
pub const KEY_SIZE: &str = "size";
pub const KEY_INFLATE: &str = "inflate";
pub const KEY_MIRROR: &str = "mirror";
pub const KEY_UV: &str = "uv";
pub const KEY_UV_SIZE: &str = "uv_size";
pub const KEY_POLY_MESH: &str = "poly_mesh";
pub const KEY_NORMALIZED_UVS: &str = "normalized_uvs";
pub const KEY_POSITIONS: &str = "positions";
pub const KEY_NORMALS: &str = "normals";
pub const KEY_UVS: &str = "uvs";
pub const KEY_POLYS: &str = "polys";

impl BedrockGeometry {
    /// Full document: `format_version` plus a one-entry `minecraft:geometry` list
    pub fn to_document(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(
            KEY_DESCRIPTION.to_string(),
            Value::Object(self.description.to_json_map()),
        );
        entry.insert(
            KEY_BONES.to_string(),
            Value::Array(
                self.bones
                    .iter()
                    .map(|b| Value::Object(b.to_json_map()))
                    .collect(),
            ),
        );

        let mut root = Map::new();
        root.insert(
            KEY_FORMAT_VERSION.to_string(),
            Value::String(self.format_version.clone()),
        );
        root.insert(
            KEY_GEOMETRY.to_string(),
            Value::Array(vec![Value::Object(entry)]),
        );
        Value::Object(root)
    }
}

impl BedrockDescription {
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            KEY_IDENTIFIER.to_string(),
            Value::String(self.identifier.clone()),
        );
        map.insert(KEY_TEXTURE_WIDTH.to_string(), Value::from(self.texture_width));
        map.insert(
            KEY_TEXTURE_HEIGHT.to_string(),
            Value::from(self.texture_height),
        );
        map.insert(
            KEY_VISIBLE_BOUNDS_WIDTH.to_string(),
            number(self.visible_bounds_width),
        );
        map.insert(
            KEY_VISIBLE_BOUNDS_HEIGHT.to_string(),
            number(self.visible_bounds_height),
        );
        map.insert(
            KEY_VISIBLE_BOUNDS_OFFSET.to_string(),
            vec3(self.visible_bounds_offset),
        );
        map
    }
}

impl BedrockBone {
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(KEY_NAME.to_string(), Value::String(self.name.clone()));
        if let Some(parent) = &self.parent {
            map.insert(KEY_PARENT.to_string(), Value::String(parent.clone()));
        }
        map.insert(KEY_PIVOT.to_string(), vec3(self.pivot));
        if self.rotation != Vec3::ZERO {
            map.insert(KEY_ROTATION.to_string(), vec3(self.rotation));
        }
        if !self.cubes.is_empty() {
            map.insert(
                KEY_CUBES.to_string(),
                Value::Array(
                    self.cubes
                        .iter()
                        .map(|c| Value::Object(c.to_json_map()))
                        .collect(),
                ),
            );
        }
        if let Some(poly_mesh) = &self.poly_mesh {
            map.insert(
                KEY_POLY_MESH.to_string(),
                Value::Object(poly_mesh.to_json_map()),
            );
        }
        map
    }
}

impl BedrockCube {
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(KEY_ORIGIN.to_string(), vec3(self.origin));
        map.insert(KEY_SIZE.to_string(), vec3(self.size));
        if let Some(pivot) = self.pivot {
            map.insert(KEY_PIVOT.to_string(), vec3(pivot));
        }
        if let Some(rotation) = self.rotation {
            map.insert(KEY_ROTATION.to_string(), vec3(rotation));
        }
        if let Some(inflate) = self.inflate {
            map.insert(KEY_INFLATE.to_string(), number(inflate));
        }
        if let Some(mirror) = self.mirror {
            map.insert(KEY_MIRROR.to_string(), Value::Bool(mirror));
        }
        map.insert(KEY_UV.to_string(), self.uv.to_value());
        map
    }
}

impl BedrockUv {
    /// `[u, v]` for box UVs, a face-keyed map otherwise
    pub fn to_value(&self) -> Value {
        match self {
            Self::Box(offset) => vec2(*offset),
            Self::PerFace(faces) => Value::Object(
                faces
                    .iter()
                    .map(|(face, rect)| (face.name().to_string(), face_uv(rect)))
                    .collect(),
            ),
        }
    }
}

impl BedrockPolyMesh {
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            KEY_NORMALIZED_UVS.to_string(),
            Value::Bool(self.normalized_uvs),
        );
        map.insert(
            KEY_POSITIONS.to_string(),
            Value::Array(self.positions.iter().copied().map(vec3).collect()),
        );
        if !self.normals.is_empty() {
            map.insert(
                KEY_NORMALS.to_string(),
                Value::Array(self.normals.iter().copied().map(vec3).collect()),
            );
        }
        if !self.uvs.is_empty() {
            map.insert(
                KEY_UVS.to_string(),
                Value::Array(self.uvs.iter().copied().map(vec2).collect()),
            );
        }
        map.insert(
            KEY_POLYS.to_string(),
            Value::Array(
                self.polys
                    .iter()
                    .map(|poly| {
                        Value::Array(
                            poly.iter()
                                .map(|corner| {
                                    Value::Array(corner.iter().map(|&i| Value::from(i)).collect())
                                })
                                .collect(),
                        )
                    })
                    .collect(),
            ),
        );
        map
    }
}

fn face_uv(rect: &FaceUv) -> Value {
    let mut map = Map::new();
    map.insert(KEY_UV.to_string(), vec2(rect.uv));
    map.insert(KEY_UV_SIZE.to_string(), vec2(rect.uv_size));
    Value::Object(map)
}

fn vec3(v: Vec3) -> Value {
    Value::Array(v.to_array().into_iter().map(number).collect())
}

fn vec2(v: Vec2) -> Value {
    Value::Array(v.to_array().into_iter().map(number).collect())
}

/// Float as a JSON floating-point number in its shortest decimal form
///
/// Widening an `f32` directly would print `0.1` as `0.10000000149011612`, so the
/// value goes through its shortest round-trip string first. Whole values stay
/// floats (`1.0`, not `1`).
fn number(value: f32) -> Value {
    if !value.is_finite() {
        tracing::warn!("Non-finite value {} written as 0.0", value);
        return Value::from(0.0);
    }

    let widened = value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value));
    Number::from_f64(widened).map_or_else(|| Value::from(0.0), Value::Number)
}
