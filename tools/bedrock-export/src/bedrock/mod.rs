//! Bedrock `minecraft:geometry` model (rig -> target types -> document tree)

mod document;
mod mapping;
mod types;

pub use document::*;
pub use mapping::{map_bone, map_bones, map_cube, map_geometry, map_mesh, map_poly_mesh};
pub use types::{
    BedrockBone, BedrockCube, BedrockDescription, BedrockGeometry, BedrockPolyMesh, BedrockUv,
    DEFAULT_FORMAT_VERSION, DEFAULT_TEXTURE_SIZE, DEFAULT_VISIBLE_BOUNDS,
};
