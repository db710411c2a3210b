//! Indexed triangle mesh with flat attribute buffers
//!
//! Buffers are flat `f32`/`u32` vectors: 3 floats per position or normal,
//! 2 floats per UV, 3 indices per triangle. An empty optional buffer means the
//! attribute is absent.

use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::math::BoundingBox;

/// Bone influences stored per vertex when a mesh is skinned (glTF `JOINTS_0`/`WEIGHTS_0` layout)
pub const MAX_BONE_INFLUENCES: usize = 4;

/// A single indexed triangle mesh
///
/// Values are immutable: every operation returns a new mesh. Construct with
/// [`Mesh::new`] and the fallible `with_*` setters, which enforce the buffer
/// invariants once so later transformations never have to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MeshData")]
pub struct Mesh {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) vertices: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) normals: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) uvs: Vec<f32>,
    pub(crate) indices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) material: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) bone_weights: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) bone_indices: Vec<u32>,
}

/// Unvalidated mesh fields, the interchange form of [`Mesh`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshData {
    pub id: String,
    pub name: String,
    pub vertices: Vec<f32>,
    #[serde(default)]
    pub normals: Vec<f32>,
    #[serde(default)]
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub bone_weights: Vec<f32>,
    #[serde(default)]
    pub bone_indices: Vec<u32>,
}

impl TryFrom<MeshData> for Mesh {
    type Error = GeometryError;

    fn try_from(data: MeshData) -> Result<Self, Self::Error> {
        let mesh = Self {
            id: data.id,
            name: data.name,
            vertices: data.vertices,
            normals: data.normals,
            uvs: data.uvs,
            indices: data.indices,
            material: data.material,
            bone_weights: data.bone_weights,
            bone_indices: data.bone_indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

impl Mesh {
    /// Create a mesh from positions and triangle indices
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        vertices: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<Self, GeometryError> {
        let mesh = Self {
            vertices,
            indices,
            ..Self::empty(id, name)
        };
        mesh.validate_positions()?;
        mesh.validate_indices()?;
        Ok(mesh)
    }

    /// Mesh with no vertices and no triangles
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vertices: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            material: None,
            bone_weights: Vec::new(),
            bone_indices: Vec::new(),
        }
    }

    /// Attach a normal buffer (3 floats per vertex, or empty to clear)
    pub fn with_normals(self, normals: Vec<f32>) -> Result<Self, GeometryError> {
        let mesh = Self { normals, ..self };
        mesh.validate_normals()?;
        Ok(mesh)
    }

    /// Attach a UV buffer (2 floats per vertex, or empty to clear)
    pub fn with_uvs(self, uvs: Vec<f32>) -> Result<Self, GeometryError> {
        let mesh = Self { uvs, ..self };
        mesh.validate_uvs()?;
        Ok(mesh)
    }

    pub fn with_material(self, material: impl Into<String>) -> Self {
        Self {
            material: Some(material.into()),
            ..self
        }
    }

    /// Attach skinning data, [`MAX_BONE_INFLUENCES`] weights and bone indices per vertex
    pub fn with_skinning(
        self,
        bone_weights: Vec<f32>,
        bone_indices: Vec<u32>,
    ) -> Result<Self, GeometryError> {
        let mesh = Self {
            bone_weights,
            bone_indices,
            ..self
        };
        mesh.validate_skinning()?;
        Ok(mesh)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn normals(&self) -> Option<&[f32]> {
        self.has_normals().then_some(self.normals.as_slice())
    }

    pub fn uvs(&self) -> Option<&[f32]> {
        self.has_uvs().then_some(self.uvs.as_slice())
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Skinning buffers as `(weights, bone indices)`
    pub fn bone_data(&self) -> Option<(&[f32], &[u32])> {
        self.has_bone_data()
            .then_some((self.bone_weights.as_slice(), self.bone_indices.as_slice()))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    pub fn has_bone_data(&self) -> bool {
        !self.bone_weights.is_empty() && !self.bone_indices.is_empty()
    }

    /// Position of vertex `i`
    ///
    /// # Panics
    /// Panics if `i >= vertex_count()`.
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[i * 3..i * 3 + 3])
    }

    /// Normal of vertex `i`, if the mesh has normals
    pub fn normal(&self, i: usize) -> Option<Vec3> {
        self.normals
            .get(i * 3..i * 3 + 3)
            .map(Vec3::from_slice)
    }

    /// UV of vertex `i`, if the mesh has UVs
    pub fn uv(&self, i: usize) -> Option<Vec2> {
        self.uvs.get(i * 2..i * 2 + 2).map(Vec2::from_slice)
    }

    /// Triangles as vertex-number triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    pub fn calculate_bounds(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Smooth vertex normals from unweighted face normals
    ///
    /// Each triangle's unit face normal is added to its three vertices, then
    /// every sum is normalized. Vertices touched by no (or only degenerate)
    /// triangles keep a zero normal. Meshes that already carry normals are
    /// returned unchanged.
    pub fn with_generated_normals(&self) -> Self {
        if self.has_normals() {
            return self.clone();
        }

        let mut accumulated = vec![Vec3::ZERO; self.vertex_count()];
        let mut degenerate = 0usize;

        for [i0, i1, i2] in self.triangles() {
            let v0 = self.vertex(i0);
            let edge1 = self.vertex(i1) - v0;
            let edge2 = self.vertex(i2) - v0;
            let face_normal = edge1.cross(edge2).normalize_or_zero();
            if face_normal == Vec3::ZERO {
                degenerate += 1;
            }

            accumulated[i0] += face_normal;
            accumulated[i1] += face_normal;
            accumulated[i2] += face_normal;
        }

        if degenerate > 0 {
            tracing::debug!(
                "Mesh '{}': {} degenerate triangles contributed no normal",
                self.name,
                degenerate
            );
        }

        let normals = accumulated
            .into_iter()
            .flat_map(|n| n.normalize_or_zero().to_array())
            .collect();

        Self {
            normals,
            ..self.clone()
        }
    }

    /// Uniformly scale every vertex position
    ///
    /// Scaling is isotropic, so normals, UVs and indices are carried over as-is.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v * factor).collect(),
            ..self.clone()
        }
    }

    /// Flip the V axis of every UV (`v -> 1 - v`)
    pub fn with_flipped_uvs(&self) -> Self {
        if !self.has_uvs() {
            return self.clone();
        }

        let uvs = self
            .uvs
            .chunks_exact(2)
            .flat_map(|uv| [uv[0], 1.0 - uv[1]])
            .collect();

        Self {
            uvs,
            ..self.clone()
        }
    }

    /// Check every buffer invariant
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.validate_positions()?;
        self.validate_normals()?;
        self.validate_uvs()?;
        self.validate_indices()?;
        self.validate_skinning()
    }

    fn validate_positions(&self) -> Result<(), GeometryError> {
        if self.vertices.len() % 3 != 0 {
            return Err(GeometryError::VertexBufferLength {
                mesh: self.name.clone(),
                len: self.vertices.len(),
            });
        }
        Ok(())
    }

    fn validate_normals(&self) -> Result<(), GeometryError> {
        if self.has_normals() && self.normals.len() != self.vertices.len() {
            return Err(GeometryError::NormalBufferLength {
                mesh: self.name.clone(),
                len: self.normals.len(),
                expected: self.vertices.len(),
            });
        }
        Ok(())
    }

    fn validate_uvs(&self) -> Result<(), GeometryError> {
        let expected = self.vertex_count() * 2;
        if self.has_uvs() && self.uvs.len() != expected {
            return Err(GeometryError::UvBufferLength {
                mesh: self.name.clone(),
                len: self.uvs.len(),
                expected,
            });
        }
        Ok(())
    }

    fn validate_indices(&self) -> Result<(), GeometryError> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IndexBufferLength {
                mesh: self.name.clone(),
                len: self.indices.len(),
            });
        }

        let vertex_count = self.vertex_count();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                mesh: self.name.clone(),
                position,
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    fn validate_skinning(&self) -> Result<(), GeometryError> {
        match (self.bone_weights.is_empty(), self.bone_indices.is_empty()) {
            (true, true) => Ok(()),
            (false, false) => {
                let expected = self.vertex_count() * MAX_BONE_INFLUENCES;
                if self.bone_weights.len() != expected || self.bone_indices.len() != expected {
                    return Err(GeometryError::SkinningBufferLength {
                        mesh: self.name.clone(),
                        weights: self.bone_weights.len(),
                        indices: self.bone_indices.len(),
                        expected,
                    });
                }
                Ok(())
            }
            _ => Err(GeometryError::PartialSkinning {
                mesh: self.name.clone(),
            }),
        }
    }
}

/// Float buffers compare by bit pattern so equality agrees with `Hash`
fn same_bits(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn hash_bits<H: Hasher>(values: &[f32], state: &mut H) {
    values.len().hash(state);
    for v in values {
        v.to_bits().hash(state);
    }
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && same_bits(&self.vertices, &other.vertices)
            && same_bits(&self.normals, &other.normals)
            && same_bits(&self.uvs, &other.uvs)
            && self.indices == other.indices
            && self.material == other.material
            && same_bits(&self.bone_weights, &other.bone_weights)
            && self.bone_indices == other.bone_indices
    }
}

impl Eq for Mesh {}

impl Hash for Mesh {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
        hash_bits(&self.vertices, state);
        hash_bits(&self.normals, state);
        hash_bits(&self.uvs, state);
        self.indices.hash(state);
        self.material.hash(state);
        hash_bits(&self.bone_weights, state);
        self.bone_indices.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn triangle() -> Mesh {
        Mesh::new(
            "tri",
            "triangle",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    /// Unit quad in the XY plane split into two triangles
    fn quad() -> Mesh {
        Mesh::new(
            "quad",
            "quad",
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap()
        .with_uvs(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])
        .unwrap()
    }

    #[test]
    fn test_counts_and_presence() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_normals());
        assert!(mesh.has_uvs());
        assert!(!mesh.has_bone_data());
        assert_eq!(mesh.normals(), None);
    }

    #[test]
    fn test_flat_triangle_normal() {
        let mesh = triangle().with_generated_normals();
        for i in 0..3 {
            assert_eq!(mesh.normal(i), Some(Vec3::Z));
        }
    }

    #[test]
    fn test_shared_vertex_normals_are_averaged() {
        // Two faces folded along the Y axis: one facing +Z, one facing +X
        let mesh = Mesh::new(
            "fold",
            "fold",
            vec![
                0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                -1.0, 0.0, 0.0, //
                0.0, 0.0, -1.0,
            ],
            vec![0, 1, 2, 0, 3, 1],
        )
        .unwrap()
        .with_generated_normals();

        let shared = mesh.normal(0).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((shared - expected).length() < 1e-6, "got {shared:?}");

        // Unshared vertices keep their single face normal
        assert!((mesh.normal(2).unwrap() - Vec3::Z).length() < 1e-6);
        assert!((mesh.normal(3).unwrap() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_isolated_vertex_keeps_zero_normal() {
        let mesh = Mesh::new(
            "iso",
            "isolated",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0],
            vec![0, 1, 2],
        )
        .unwrap()
        .with_generated_normals();
        assert_eq!(mesh.normal(3), Some(Vec3::ZERO));
        assert_eq!(mesh.normals().unwrap().len(), mesh.vertices().len());
    }

    #[test]
    fn test_degenerate_triangle_gives_zero_normals() {
        let mesh = Mesh::new(
            "line",
            "collinear",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            vec![0, 1, 2],
        )
        .unwrap()
        .with_generated_normals();
        assert!(mesh.normals().unwrap().iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_generated_normals_idempotent() {
        let once = quad().with_generated_normals();
        let twice = once.with_generated_normals();
        assert_eq!(once.normals(), twice.normals());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_normals_untouched() {
        let mesh = triangle()
            .with_normals(vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap();
        let generated = mesh.with_generated_normals();
        assert_eq!(generated.normal(0), Some(Vec3::Y));
    }

    #[test]
    fn test_scale_round_trip() {
        let mesh = quad();
        for k in [2.0f32, 0.3, -7.5, 1e-3] {
            let restored = mesh.scaled(k).scaled(1.0 / k);
            for (a, b) in restored.vertices().iter().zip(mesh.vertices()) {
                assert!((a - b).abs() < 1e-5, "k={k}: {a} vs {b}");
            }
            assert_eq!(restored.uvs(), mesh.uvs());
            assert_eq!(restored.indices(), mesh.indices());
        }
    }

    #[test]
    fn test_scale_is_uniform() {
        let scaled = quad().scaled(3.0);
        assert_eq!(scaled.vertex(2), Vec3::new(3.0, 3.0, 0.0));
        let bounds = scaled.calculate_bounds();
        assert_eq!(bounds.max, Vec3::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_flip_uvs() {
        let mesh = quad()
            .with_uvs(vec![0.25, 0.0, 0.5, 0.25, 0.75, 1.0, 0.0, 0.875])
            .unwrap();
        let flipped = mesh.with_flipped_uvs();
        assert_eq!(
            flipped.uvs().unwrap(),
            &[0.25f32, 1.0, 0.5, 0.75, 0.75, 0.0, 0.0, 0.125]
        );
        assert_eq!(flipped.with_flipped_uvs().uvs(), mesh.uvs());
    }

    #[test]
    fn test_flip_without_uvs_is_noop() {
        let mesh = triangle();
        assert_eq!(mesh.with_flipped_uvs(), mesh);
    }

    #[test]
    fn test_operations_do_not_touch_input() {
        let mesh = quad();
        let before = mesh.clone();
        let _ = mesh.scaled(4.0);
        let _ = mesh.with_flipped_uvs();
        let _ = mesh.with_generated_normals();
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let mesh = Mesh::empty("e", "empty");
        assert_eq!(mesh.calculate_bounds(), BoundingBox::ZERO);
        assert_eq!(mesh.with_generated_normals().normals(), None);
    }

    #[test]
    fn test_rejects_bad_vertex_buffer() {
        let err = Mesh::new("m", "bad", vec![0.0, 1.0], vec![]).unwrap_err();
        assert!(matches!(err, GeometryError::VertexBufferLength { len: 2, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = Mesh::new("m", "bad", vec![0.0; 9], vec![0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                mesh: "bad".into(),
                position: 2,
                index: 3,
                vertex_count: 3,
            }
        );
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let err = Mesh::new("m", "bad", vec![0.0; 9], vec![0, 1]).unwrap_err();
        assert!(matches!(err, GeometryError::IndexBufferLength { len: 2, .. }));
    }

    #[test]
    fn test_rejects_mismatched_attributes() {
        let err = triangle().with_normals(vec![0.0; 6]).unwrap_err();
        assert!(matches!(err, GeometryError::NormalBufferLength { expected: 9, .. }));

        let err = triangle().with_uvs(vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, GeometryError::UvBufferLength { expected: 6, .. }));
    }

    #[test]
    fn test_skinning_validation() {
        let err = triangle().with_skinning(vec![1.0; 12], vec![]).unwrap_err();
        assert!(matches!(err, GeometryError::PartialSkinning { .. }));

        let err = triangle()
            .with_skinning(vec![1.0; 12], vec![0; 8])
            .unwrap_err();
        assert!(matches!(err, GeometryError::SkinningBufferLength { expected: 12, .. }));

        let skinned = triangle().with_skinning(vec![0.25; 12], vec![0; 12]).unwrap();
        assert!(skinned.has_bone_data());
        assert_eq!(skinned.bone_data().unwrap().0.len(), 12);
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let mut set = HashSet::new();
        set.insert(quad());
        assert!(set.contains(&quad()));
        assert!(!set.contains(&quad().scaled(2.0)));
        assert_ne!(quad(), quad().with_material("skin"));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"id":"a","name":"a","vertices":[0,0,0,1,0,0,0,1,0],"indices":[0,1,5]}"#;
        assert!(serde_json::from_str::<Mesh>(json).is_err());

        let json = r#"{"id":"a","name":"a","vertices":[0,0,0,1,0,0,0,1,0],"indices":[0,1,2]}"#;
        let mesh: Mesh = serde_json::from_str(json).unwrap();
        assert_eq!(mesh, triangle_named("a"));
    }

    fn triangle_named(name: &str) -> Mesh {
        Mesh::new(
            name,
            name,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        )
        .unwrap()
    }
}
