//! Geometry aggregate: meshes plus an optional rig

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::math::BoundingBox;
use crate::mesh::Mesh;
use crate::skeleton::{Bone, CubeUv};

/// Name given to the merged mesh of a multi-mesh geometry
pub const COMBINED_MESH_NAME: &str = "combined";

/// A complete model: ordered meshes and an optional bone hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryData")]
pub struct Geometry {
    id: String,
    meshes: Vec<Mesh>,
    bones: Vec<Bone>,
    root_bone: Option<usize>,
}

/// Unvalidated geometry fields, the interchange form of [`Geometry`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryData {
    pub id: String,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub root_bone: Option<usize>,
}

impl TryFrom<GeometryData> for Geometry {
    type Error = GeometryError;

    fn try_from(data: GeometryData) -> Result<Self, Self::Error> {
        Self::new(data.id, data.meshes, data.bones, data.root_bone)
    }
}

impl Geometry {
    /// Build a geometry, validating the bone hierarchy
    ///
    /// Meshes are already valid by construction. Bones must reference parents
    /// inside `bones`, every parent chain must reach a root, and per-face cube
    /// UVs must name at least one face.
    pub fn new(
        id: impl Into<String>,
        meshes: Vec<Mesh>,
        bones: Vec<Bone>,
        root_bone: Option<usize>,
    ) -> Result<Self, GeometryError> {
        let geometry = Self {
            id: id.into(),
            meshes,
            bones,
            root_bone,
        };
        geometry.validate_hierarchy()?;
        Ok(geometry)
    }

    /// Mesh-only geometry with no rig
    pub fn from_meshes(id: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            id: id.into(),
            meshes,
            bones: Vec::new(),
            root_bone: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn root_bone_index(&self) -> Option<usize> {
        self.root_bone
    }

    pub fn root_bone(&self) -> Option<&Bone> {
        self.root_bone.map(|i| &self.bones[i])
    }

    pub fn has_skeleton(&self) -> bool {
        self.root_bone.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Merge every mesh into one for simple (rig-less) export
    ///
    /// No meshes give an empty mesh named [`COMBINED_MESH_NAME`]; a single mesh
    /// is returned as-is. Otherwise buffers are concatenated in mesh order and
    /// indices are shifted by the number of vertices already appended. Normals
    /// and UVs are kept if any mesh has them, zero-filled for meshes that don't.
    /// Material and skinning data are not carried over.
    pub fn combined_mesh(&self) -> Mesh {
        match self.meshes.as_slice() {
            [] => return Mesh::empty(self.combined_id(), COMBINED_MESH_NAME),
            [mesh] => return mesh.clone(),
            _ => {}
        }

        let total_vertices = self.vertex_count();
        let total_indices: usize = self.meshes.iter().map(|m| m.indices.len()).sum();

        let has_any_normals = self.meshes.iter().any(Mesh::has_normals);
        let has_any_uvs = self.meshes.iter().any(Mesh::has_uvs);

        let mut combined = Mesh::empty(self.combined_id(), COMBINED_MESH_NAME);
        combined.vertices.reserve(total_vertices * 3);
        combined.indices.reserve(total_indices);
        if has_any_normals {
            combined.normals.reserve(total_vertices * 3);
        }
        if has_any_uvs {
            combined.uvs.reserve(total_vertices * 2);
        }

        let mut index_offset = 0u32;
        for mesh in &self.meshes {
            combined.vertices.extend_from_slice(&mesh.vertices);

            // Meshes missing an attribute are padded with zeros
            if has_any_normals {
                if mesh.has_normals() {
                    combined.normals.extend_from_slice(&mesh.normals);
                } else {
                    combined.normals.resize(combined.vertices.len(), 0.0);
                }
            }
            if has_any_uvs {
                if mesh.has_uvs() {
                    combined.uvs.extend_from_slice(&mesh.uvs);
                } else {
                    combined.uvs.resize(combined.vertex_count() * 2, 0.0);
                }
            }

            combined
                .indices
                .extend(mesh.indices.iter().map(|&i| i + index_offset));

            index_offset += mesh.vertex_count() as u32;
        }

        tracing::debug!(
            "Combined {} meshes into {} vertices, {} triangles",
            self.meshes.len(),
            combined.vertex_count(),
            combined.triangle_count()
        );

        combined
    }

    /// Bounds of every vertex of every mesh
    pub fn calculate_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(
            self.meshes
                .iter()
                .flat_map(|m| (0..m.vertex_count()).map(move |i| m.vertex(i))),
        )
    }

    /// Scale every mesh; bone pivots and cubes are left as they are
    pub fn scaled(&self, factor: f32) -> Self {
        self.map_meshes(|m| m.scaled(factor))
    }

    pub fn with_generated_normals(&self) -> Self {
        self.map_meshes(Mesh::with_generated_normals)
    }

    pub fn with_flipped_uvs(&self) -> Self {
        self.map_meshes(Mesh::with_flipped_uvs)
    }

    fn map_meshes(&self, f: impl Fn(&Mesh) -> Mesh) -> Self {
        Self {
            id: self.id.clone(),
            meshes: self.meshes.iter().map(f).collect(),
            bones: self.bones.clone(),
            root_bone: self.root_bone,
        }
    }

    fn combined_id(&self) -> String {
        format!("{}/{}", self.id, COMBINED_MESH_NAME)
    }

    fn validate_hierarchy(&self) -> Result<(), GeometryError> {
        let bone_count = self.bones.len();

        if let Some(index) = self.root_bone.filter(|&i| i >= bone_count) {
            return Err(GeometryError::RootBoneOutOfRange { index, bone_count });
        }

        for bone in &self.bones {
            if let Some(parent) = bone.parent.filter(|&p| p >= bone_count) {
                return Err(GeometryError::ParentOutOfRange {
                    bone: bone.name.clone(),
                    parent,
                    bone_count,
                });
            }
        }

        for (bone_index, bone) in self.bones.iter().enumerate() {
            if let Some(cube) = bone
                .cubes
                .iter()
                .position(|c| matches!(&c.uv, CubeUv::PerFace(faces) if faces.is_empty()))
            {
                return Err(GeometryError::EmptyFaceUv {
                    bone: bone.name.clone(),
                    cube,
                });
            }

            // A chain longer than the bone count must revisit a bone
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if steps > bone_count || parent == bone_index {
                    return Err(GeometryError::CyclicHierarchy {
                        bone: bone.name.clone(),
                    });
                }
                current = self.bones[parent].parent;
            }
        }

        Ok(())
    }
}
