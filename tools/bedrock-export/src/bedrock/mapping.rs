//! Generic rig -> Bedrock mapping
//!
//! Rigged geometry maps bone for bone. Geometry without a root bone is exported
//! as a single root bone carrying the combined mesh as a `poly_mesh`; any bones
//! it lists are left out.

use glam::Vec3;
use rig_common::{Bone, Cube, CubeUv, Geometry, Mesh};

use super::types::{
    BedrockBone, BedrockCube, BedrockDescription, BedrockGeometry, BedrockPolyMesh, BedrockUv,
};

/// Map a whole geometry, choosing the rig or simple path
pub fn map_geometry(geometry: &Geometry, description: BedrockDescription) -> BedrockGeometry {
    let bones = if geometry.has_skeleton() {
        map_bones(geometry.bones())
    } else {
        if !geometry.bones().is_empty() {
            tracing::warn!(
                "Geometry '{}' has {} bones but no root bone; exporting meshes only",
                geometry.id(),
                geometry.bones().len()
            );
        }
        vec![map_mesh(&geometry.combined_mesh())]
    };

    tracing::debug!(
        "Mapped geometry '{}' to {} bones ({})",
        geometry.id(),
        bones.len(),
        if geometry.has_skeleton() { "rig" } else { "simple" }
    );

    BedrockGeometry::new(description, bones)
}

/// Map every bone, resolving parent indices to parent names
pub fn map_bones(bones: &[Bone]) -> Vec<BedrockBone> {
    bones.iter().map(|bone| map_bone(bone, bones)).collect()
}

/// Map one bone; `bones` is the list its parent index points into
pub fn map_bone(bone: &Bone, bones: &[Bone]) -> BedrockBone {
    BedrockBone {
        name: bone.name.clone(),
        parent: bone.parent.map(|p| bones[p].name.clone()),
        pivot: bone.pivot,
        rotation: bone.rotation,
        cubes: bone.cubes.iter().map(map_cube).collect(),
        poly_mesh: None,
    }
}

/// Map one cube, dropping optional fields that hold their default
pub fn map_cube(cube: &Cube) -> BedrockCube {
    BedrockCube {
        origin: cube.origin,
        size: cube.size,
        pivot: cube.pivot,
        rotation: cube.rotation.filter(|r| *r != Vec3::ZERO),
        inflate: (cube.inflate != 0.0).then_some(cube.inflate),
        mirror: cube.mirror.then_some(true),
        uv: match &cube.uv {
            CubeUv::Box(offset) => BedrockUv::Box(*offset),
            CubeUv::PerFace(faces) => BedrockUv::PerFace(faces.clone()),
        },
    }
}

/// Root bone holding `mesh` as a poly mesh
pub fn map_mesh(mesh: &Mesh) -> BedrockBone {
    BedrockBone {
        poly_mesh: Some(map_poly_mesh(mesh)),
        ..BedrockBone::new(mesh.name(), Vec3::ZERO)
    }
}

/// Poly mesh from a triangle mesh
///
/// Attributes are per vertex, so a corner uses its vertex number for position,
/// normal and UV alike.
pub fn map_poly_mesh(mesh: &Mesh) -> BedrockPolyMesh {
    let vertices = 0..mesh.vertex_count();

    BedrockPolyMesh {
        normalized_uvs: true,
        positions: vertices.clone().map(|i| mesh.vertex(i)).collect(),
        normals: vertices.clone().filter_map(|i| mesh.normal(i)).collect(),
        uvs: vertices.filter_map(|i| mesh.uv(i)).collect(),
        polys: mesh
            .triangles()
            .map(|t| t.map(|i| [i as u32; 3]))
            .collect(),
    }
}
