use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::core::{Axis, Tolerance, Vec3};

// ─────────────────────────────────────────────────────────────────────────────
// RotationOrder
// ─────────────────────────────────────────────────────────────────────────────

/// The six Tait-Bryan rotation orders. `Xyz` means the X rotation is applied
/// first, so the combined matrix is `Rz · Ry · Rx` (column vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yzx,
    Zxy,
    Xzy,
    Yxz,
    Zyx,
}

impl RotationOrder {
    /// All orders, in a stable order. Handy for exhaustive tests.
    pub const ALL: [Self; 6] = [
        Self::Xyz,
        Self::Yzx,
        Self::Zxy,
        Self::Xzy,
        Self::Yxz,
        Self::Zyx,
    ];
}

// ─────────────────────────────────────────────────────────────────────────────
// EulerRotation
// ─────────────────────────────────────────────────────────────────────────────

/// An orientation as three Euler angles (radians) with an explicit rotation
/// order. The order participates in composition, so it always travels with
/// the angles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub order: RotationOrder,
}

impl EulerRotation {
    pub const IDENTITY: Self = Self::identity(RotationOrder::Xyz);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, order: RotationOrder) -> Self {
        Self { x, y, z, order }
    }

    #[must_use]
    pub const fn identity(order: RotationOrder) -> Self {
        Self::new(0.0, 0.0, 0.0, order)
    }

    #[must_use]
    pub fn to_quat(self) -> Quat {
        let qx = Quat::about_x(self.x);
        let qy = Quat::about_y(self.y);
        let qz = Quat::about_z(self.z);
        // Multiply in reverse application order: the first-applied axis sits
        // rightmost in the product.
        match self.order {
            RotationOrder::Xyz => qz * qy * qx,
            RotationOrder::Yzx => qx * qz * qy,
            RotationOrder::Zxy => qy * qx * qz,
            RotationOrder::Xzy => qy * qz * qx,
            RotationOrder::Yxz => qz * qx * qy,
            RotationOrder::Zyx => qx * qy * qz,
        }
    }

    #[must_use]
    pub fn from_quat(quat: Quat, order: RotationOrder) -> Self {
        quat.to_mat3().to_euler(order)
    }

    /// The unit direction a frame with this orientation faces along `axis`:
    /// rotate the signed unit vector and renormalize.
    #[must_use]
    pub fn direction_along(self, axis: Axis) -> Vec3 {
        let unit = axis.unit_vector();
        let rotated = self.to_quat().rotate_vec(unit);
        rotated.normalized().unwrap_or(unit)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quat
// ─────────────────────────────────────────────────────────────────────────────

/// Unit quaternion used for orientation composition. Euler angles stay the
/// boundary representation; everything in between runs through quaternions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation about an arbitrary axis. Returns `None` when the axis is
    /// degenerate (zero length or non-finite).
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Option<Self> {
        let axis = axis.normalized()?;
        let half = angle * 0.5;
        let sin_half = half.sin();
        Some(Self::new(
            half.cos(),
            axis.x * sin_half,
            axis.y * sin_half,
            axis.z * sin_half,
        ))
    }

    #[must_use]
    pub fn about_x(angle: f64) -> Self {
        let half = angle * 0.5;
        Self::new(half.cos(), half.sin(), 0.0, 0.0)
    }

    #[must_use]
    pub fn about_y(angle: f64) -> Self {
        let half = angle * 0.5;
        Self::new(half.cos(), 0.0, half.sin(), 0.0)
    }

    #[must_use]
    pub fn about_z(angle: f64) -> Self {
        let half = angle * 0.5;
        Self::new(half.cos(), 0.0, 0.0, half.sin())
    }

    /// Inverse of a unit quaternion.
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Renormalize against floating-point drift after long compositions.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if len.is_finite() && len > Tolerance::ZERO_LENGTH.eps {
            Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
        } else {
            Self::IDENTITY
        }
    }

    #[must_use]
    pub fn rotate_vec(self, v: Vec3) -> Vec3 {
        let q_vec = Vec3::new(self.x, self.y, self.z);
        let uv = q_vec.cross(v);
        let uuv = q_vec.cross(uv);
        v + uv * (2.0 * self.w) + uuv * 2.0
    }

    #[must_use]
    pub fn to_mat3(self) -> Mat3 {
        let Self { w, x, y, z } = self;
        Mat3 {
            m: [
                [
                    1.0 - 2.0 * (y * y + z * z),
                    2.0 * (x * y - w * z),
                    2.0 * (x * z + w * y),
                ],
                [
                    2.0 * (x * y + w * z),
                    1.0 - 2.0 * (x * x + z * z),
                    2.0 * (y * z - w * x),
                ],
                [
                    2.0 * (x * z - w * y),
                    2.0 * (y * z + w * x),
                    1.0 - 2.0 * (x * x + y * y),
                ],
            ],
        }
    }
}

impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mat3
// ─────────────────────────────────────────────────────────────────────────────

/// Row-major 3x3 rotation matrix, column-vector convention. Exists to build
/// orientation frames from explicit basis vectors and to extract Euler angles
/// in any rotation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Matrix whose columns are the given basis vectors, so it maps the
    /// standard basis onto `(a, b, c)`.
    #[must_use]
    pub const fn from_columns(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            m: [[a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z]],
        }
    }

    #[must_use]
    pub fn rotation_x(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    #[must_use]
    pub fn rotation_y(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            m: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    #[must_use]
    pub fn rotation_z(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Compose the per-axis rotations in the order's application sequence.
    #[must_use]
    pub fn from_euler(euler: EulerRotation) -> Self {
        let rx = Self::rotation_x(euler.x);
        let ry = Self::rotation_y(euler.y);
        let rz = Self::rotation_z(euler.z);
        match euler.order {
            RotationOrder::Xyz => rz * ry * rx,
            RotationOrder::Yzx => rx * rz * ry,
            RotationOrder::Zxy => ry * rx * rz,
            RotationOrder::Xzy => ry * rz * rx,
            RotationOrder::Yxz => rz * rx * ry,
            RotationOrder::Zyx => rx * ry * rz,
        }
    }

    #[must_use]
    pub const fn transpose(self) -> Self {
        let m = self.m;
        Self {
            m: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    #[must_use]
    pub fn apply_vec(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }

    /// Extract Euler angles in the requested rotation order. Near gimbal
    /// lock the first-applied angle absorbs the free degree and the
    /// last-applied angle is pinned to zero.
    #[must_use]
    pub fn to_euler(self, order: RotationOrder) -> EulerRotation {
        let m = &self.m;
        // Above this threshold the middle angle counts as a full ±90°.
        const LOCK: f64 = 1.0 - 1e-9;

        let (x, y, z) = match order {
            RotationOrder::Xyz => {
                let sy = clamp_unit(-m[2][0]);
                if sy.abs() < LOCK {
                    (
                        m[2][1].atan2(m[2][2]),
                        sy.asin(),
                        m[1][0].atan2(m[0][0]),
                    )
                } else {
                    ((-m[1][2]).atan2(m[1][1]), sy.asin(), 0.0)
                }
            }
            RotationOrder::Yzx => {
                let sz = clamp_unit(-m[0][1]);
                if sz.abs() < LOCK {
                    (
                        m[2][1].atan2(m[1][1]),
                        m[0][2].atan2(m[0][0]),
                        sz.asin(),
                    )
                } else {
                    (0.0, (-m[2][0]).atan2(m[2][2]), sz.asin())
                }
            }
            RotationOrder::Zxy => {
                let sx = clamp_unit(-m[1][2]);
                if sx.abs() < LOCK {
                    (
                        sx.asin(),
                        m[0][2].atan2(m[2][2]),
                        m[1][0].atan2(m[1][1]),
                    )
                } else {
                    (sx.asin(), (-m[2][0]).atan2(m[0][0]), 0.0)
                }
            }
            RotationOrder::Xzy => {
                let sz = clamp_unit(m[1][0]);
                if sz.abs() < LOCK {
                    (
                        (-m[1][2]).atan2(m[1][1]),
                        (-m[2][0]).atan2(m[0][0]),
                        sz.asin(),
                    )
                } else {
                    (m[2][1].atan2(m[2][2]), 0.0, sz.asin())
                }
            }
            RotationOrder::Yxz => {
                let sx = clamp_unit(m[2][1]);
                if sx.abs() < LOCK {
                    (
                        sx.asin(),
                        (-m[2][0]).atan2(m[2][2]),
                        (-m[0][1]).atan2(m[1][1]),
                    )
                } else {
                    (sx.asin(), m[0][2].atan2(m[0][0]), 0.0)
                }
            }
            RotationOrder::Zyx => {
                let sy = clamp_unit(m[0][2]);
                if sy.abs() < LOCK {
                    (
                        (-m[1][2]).atan2(m[2][2]),
                        sy.asin(),
                        (-m[0][1]).atan2(m[0][0]),
                    )
                } else {
                    // Only x±z is determined here; the sign of sy decides which.
                    ((sy.signum() * m[1][0]).atan2(m[1][1]), sy.asin(), 0.0)
                }
            }
        };

        EulerRotation::new(x, y, z, order)
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut result = Self::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * rhs.m[0][j]
                    + self.m[i][1] * rhs.m[1][j]
                    + self.m[i][2] * rhs.m[2][j];
            }
        }
        result
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}
