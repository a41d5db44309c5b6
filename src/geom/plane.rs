use serde::{Deserialize, Serialize};

use super::core::Vec3;

/// Degenerate geometric input to a plane construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("plane normal must be finite and non-zero")]
    ZeroLengthNormal,
    #[error("points are collinear and span no plane")]
    CollinearPoints,
    #[error("direction hint is parallel to the line between the points")]
    ParallelDirections,
}

/// Implicit plane `normal · P + distance = 0` with a unit normal.
///
/// The fields stay private so the unit-normal invariant survives every
/// construction path; degenerate normals are rejected instead of stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    normal: Vec3,
    distance: f64,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f64) -> Result<Self, GeometryError> {
        let normal = normal
            .normalized()
            .ok_or(GeometryError::ZeroLengthNormal)?;
        Ok(Self { normal, distance })
    }

    /// Plane with the given normal passing through `point`, storing
    /// `distance = -normal · point`.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Result<Self, GeometryError> {
        let normal = normal
            .normalized()
            .ok_or(GeometryError::ZeroLengthNormal)?;
        Ok(Self {
            normal,
            distance: -normal.dot(point),
        })
    }

    #[must_use]
    pub const fn normal(self) -> Vec3 {
        self.normal
    }

    #[must_use]
    pub const fn distance(self) -> f64 {
        self.distance
    }

    /// Signed distance of a point under the `normal · P + distance` form:
    /// positive on the side the normal points into.
    #[must_use]
    pub fn signed_distance_to(self, point: Vec3) -> f64 {
        self.normal.dot(point) + self.distance
    }

    /// Closest point on the plane, i.e. the orthogonal projection.
    #[must_use]
    pub fn project_point(self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance_to(point)
    }
}

/// Normal of the plane spanned by three points:
/// `normalize(cross(p2 - p1, p1 - p0))`. Collinear points (including
/// coincident ones) yield no plane.
pub fn three_point_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Result<Vec3, GeometryError> {
    (p2 - p1)
        .cross(p1 - p0)
        .normalized()
        .ok_or(GeometryError::CollinearPoints)
}

/// Normal perpendicular to the line `p1 - p0` lying in the plane spanned by
/// that line and `hint`, via a double cross product. Fails when `hint` is
/// parallel to the line.
pub fn two_point_normal(p0: Vec3, p1: Vec3, hint: Vec3) -> Result<Vec3, GeometryError> {
    let line = p1 - p0;
    let first = hint
        .cross(line)
        .normalized()
        .ok_or(GeometryError::ParallelDirections)?;
    first
        .cross(line)
        .normalized()
        .ok_or(GeometryError::ParallelDirections)
}
