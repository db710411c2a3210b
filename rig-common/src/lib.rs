//! Engine-agnostic model types shared by the export tools
//!
//! This crate holds the generic model an importer produces and an exporter
//! consumes:
//! - [`mesh`] - Indexed triangle meshes with flat attribute buffers
//! - [`skeleton`] - Bone/cube rig description with box or per-face UVs
//! - [`geometry`] - The aggregate (meshes + rig) and whole-model operations
//! - [`math`] - Bounding boxes plus the glam types used throughout
//!
//! Every operation is a pure function from one value to a new value, so
//! independent models can be processed on separate threads without locking.

pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod skeleton;

pub use error::GeometryError;
pub use geometry::{Geometry, GeometryData, COMBINED_MESH_NAME};
pub use math::{BoundingBox, Transform, Vector2, Vector3};
pub use mesh::{Mesh, MeshData, MAX_BONE_INFLUENCES};
pub use skeleton::{Bone, Cube, CubeUv, Face, FaceUv};
