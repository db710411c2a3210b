//! bedrock-export library
//!
//! Maps a `rig_common::Geometry` to a Bedrock `minecraft:geometry` document tree.
//! Reading models and writing files is left to the caller (see the
//! `bedrock-export` binary).

pub mod bedrock;
pub mod options;
pub mod pipeline;

// Re-export key types for conversion
pub use bedrock::{
    BedrockBone, BedrockCube, BedrockDescription, BedrockGeometry, BedrockPolyMesh, BedrockUv,
};
pub use options::{ExportOptions, OptionsError};
pub use pipeline::{export, export_document, prepare};

// Re-export the input model so callers need only this crate
pub use rig_common;
