//! Construction-time validation errors
//!
//! Transformations on valid values never fail; these errors only surface when a
//! collaborator builds a malformed `Mesh` or `Geometry`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("mesh '{mesh}': vertex buffer length {len} is not a multiple of 3")]
    VertexBufferLength { mesh: String, len: usize },

    #[error("mesh '{mesh}': normal buffer has {len} floats, expected {expected}")]
    NormalBufferLength {
        mesh: String,
        len: usize,
        expected: usize,
    },

    #[error("mesh '{mesh}': UV buffer has {len} floats, expected {expected}")]
    UvBufferLength {
        mesh: String,
        len: usize,
        expected: usize,
    },

    #[error("mesh '{mesh}': index buffer length {len} is not a multiple of 3")]
    IndexBufferLength { mesh: String, len: usize },

    #[error("mesh '{mesh}': index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        mesh: String,
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh '{mesh}': skinning needs both bone weights and bone indices")]
    PartialSkinning { mesh: String },

    #[error("mesh '{mesh}': skinning buffers have {weights} weights and {indices} indices, expected {expected} each")]
    SkinningBufferLength {
        mesh: String,
        weights: usize,
        indices: usize,
        expected: usize,
    },

    #[error("root bone index {index} is out of range ({bone_count} bones)")]
    RootBoneOutOfRange { index: usize, bone_count: usize },

    #[error("bone '{bone}' references parent {parent}, but only {bone_count} bones exist")]
    ParentOutOfRange {
        bone: String,
        parent: usize,
        bone_count: usize,
    },

    #[error("bone '{bone}' is part of a parent cycle")]
    CyclicHierarchy { bone: String },

    #[error("bone '{bone}': cube {cube} has per-face UVs with no faces")]
    EmptyFaceUv { bone: String, cube: usize },
}
