//! Bone/cube rig description
//!
//! Bones are addressed by their position in `Geometry::bones`; a bone names its
//! parent by that index. Each bone carries zero or more axis-aligned cubes.

use std::collections::BTreeMap;
use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::Transform;

/// A node in the rig hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, `None` for roots
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub pivot: Vec3,
    /// Euler rotation in degrees
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub bind_pose: Transform,
    #[serde(default)]
    pub cubes: Vec<Cube>,
}

impl Bone {
    /// Root bone at the origin with no cubes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            pivot: Vec3::ZERO,
            rotation: Vec3::ZERO,
            bind_pose: Transform::IDENTITY,
            cubes: Vec::new(),
        }
    }

    pub fn with_parent(self, parent: usize) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    pub fn with_pivot(self, pivot: Vec3) -> Self {
        Self { pivot, ..self }
    }

    pub fn with_rotation(self, rotation: Vec3) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_bind_pose(self, bind_pose: Transform) -> Self {
        Self { bind_pose, ..self }
    }

    pub fn with_cube(mut self, cube: Cube) -> Self {
        self.cubes.push(cube);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Axis-aligned box attached to a bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// Minimum corner in model space
    pub origin: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub pivot: Option<Vec3>,
    /// Euler rotation in degrees about `pivot`
    #[serde(default)]
    pub rotation: Option<Vec3>,
    /// Uniform outward expansion
    #[serde(default)]
    pub inflate: f32,
    #[serde(default)]
    pub mirror: bool,
    pub uv: CubeUv,
}

impl Cube {
    pub fn new(origin: Vec3, size: Vec3, uv: CubeUv) -> Self {
        Self {
            origin,
            size,
            pivot: None,
            rotation: None,
            inflate: 0.0,
            mirror: false,
            uv,
        }
    }

    /// Rotate the cube by `rotation` degrees about `pivot`
    pub fn with_rotation(self, pivot: Vec3, rotation: Vec3) -> Self {
        Self {
            pivot: Some(pivot),
            rotation: Some(rotation),
            ..self
        }
    }

    pub fn with_inflate(self, inflate: f32) -> Self {
        Self { inflate, ..self }
    }

    pub fn with_mirror(self, mirror: bool) -> Self {
        Self { mirror, ..self }
    }
}

/// Texture mapping of a cube, either box layout or one rectangle per face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeUv {
    /// Offset of the standard box-UV template
    Box(Vec2),
    /// Independent rectangle per face; must name at least one face
    PerFace(BTreeMap<Face, FaceUv>),
}

impl CubeUv {
    pub fn is_box_uv(&self) -> bool {
        matches!(self, Self::Box(_))
    }

    /// Per-face mapping built from `(face, rect)` pairs
    pub fn per_face<I>(faces: I) -> Self
    where
        I: IntoIterator<Item = (Face, FaceUv)>,
    {
        Self::PerFace(faces.into_iter().collect())
    }
}

/// Cube face, ordered as the target format lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::North,
        Face::East,
        Face::South,
        Face::West,
        Face::Up,
        Face::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Face::North => "north",
            Face::East => "east",
            Face::South => "south",
            Face::West => "west",
            Face::Up => "up",
            Face::Down => "down",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Texture rectangle for one face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceUv {
    pub uv: Vec2,
    pub uv_size: Vec2,
}

impl FaceUv {
    pub fn new(uv: Vec2, uv_size: Vec2) -> Self {
        Self { uv, uv_size }
    }
}
