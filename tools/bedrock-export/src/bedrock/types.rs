//! Target-shaped geometry types
//!
//! These mirror the `minecraft:geometry` layout field for field. Optional
//! fields are `Option`s (or empty collections) and are left out of the
//! document entirely when unset.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use rig_common::{Face, FaceUv};

/// Geometry format version written when none is configured
pub const DEFAULT_FORMAT_VERSION: &str = "1.12.0";

/// Default texture width and height in pixels
pub const DEFAULT_TEXTURE_SIZE: u32 = 64;

/// Default visible bounds width and height in blocks
pub const DEFAULT_VISIBLE_BOUNDS: f32 = 1.0;

/// A complete geometry entry ready for document construction
#[derive(Debug, Clone, PartialEq)]
pub struct BedrockGeometry {
    pub format_version: String,
    pub description: BedrockDescription,
    pub bones: Vec<BedrockBone>,
}

impl BedrockGeometry {
    pub fn new(description: BedrockDescription, bones: Vec<BedrockBone>) -> Self {
        Self {
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            description,
            bones,
        }
    }

    pub fn bone(&self, name: &str) -> Option<&BedrockBone> {
        self.bones.iter().find(|b| b.name == name)
    }
}

/// Identifier, texture size and culling hints
#[derive(Debug, Clone, PartialEq)]
pub struct BedrockDescription {
    pub identifier: String,
    pub texture_width: u32,
    pub texture_height: u32,
    pub visible_bounds_width: f32,
    pub visible_bounds_height: f32,
    pub visible_bounds_offset: Vec3,
}

impl BedrockDescription {
    /// Description with default texture size and visible bounds
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            texture_width: DEFAULT_TEXTURE_SIZE,
            texture_height: DEFAULT_TEXTURE_SIZE,
            visible_bounds_width: DEFAULT_VISIBLE_BOUNDS,
            visible_bounds_height: DEFAULT_VISIBLE_BOUNDS,
            visible_bounds_offset: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BedrockBone {
    pub name: String,
    /// Parent bone by name; roots have none
    pub parent: Option<String>,
    pub pivot: Vec3,
    /// Euler degrees; written only when non-zero
    pub rotation: Vec3,
    pub cubes: Vec<BedrockCube>,
    pub poly_mesh: Option<BedrockPolyMesh>,
}

impl BedrockBone {
    pub fn new(name: impl Into<String>, pivot: Vec3) -> Self {
        Self {
            name: name.into(),
            parent: None,
            pivot,
            rotation: Vec3::ZERO,
            cubes: Vec::new(),
            poly_mesh: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BedrockCube {
    pub origin: Vec3,
    pub size: Vec3,
    pub pivot: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub inflate: Option<f32>,
    pub mirror: Option<bool>,
    pub uv: BedrockUv,
}

/// The two mutually exclusive UV encodings of a cube
#[derive(Debug, Clone, PartialEq)]
pub enum BedrockUv {
    /// Written as `[u, v]`
    Box(Vec2),
    /// Written as `{ face: { uv, uv_size } }`
    PerFace(BTreeMap<Face, FaceUv>),
}

/// Free-form triangle mesh attached to a bone
///
/// Each poly is three `[position, normal, uv]` index triples.
#[derive(Debug, Clone, PartialEq)]
pub struct BedrockPolyMesh {
    pub normalized_uvs: bool,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub polys: Vec<[[u32; 3]; 3]>,
}
