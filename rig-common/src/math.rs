//! Math primitives used by the rig model
//!
//! Vectors and transforms come from glam; only the bounding box is defined here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use glam::{Affine3A as Transform, Vec2 as Vector2, Vec3 as Vector3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ZERO
    }
}

impl BoundingBox {
    /// Degenerate box at the origin, the bounds of an empty point set
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set; an empty set gives [`BoundingBox::ZERO`]
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::ZERO;
        };

        points.fold(Self::new(first, first), |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        })
    }

    /// Bounds of a flat `x, y, z` buffer. A trailing partial triple is ignored.
    pub fn from_vertices(vertices: &[f32]) -> Self {
        Self::from_points(vertices.chunks_exact(3).map(Vec3::from_slice))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}
