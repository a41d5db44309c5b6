use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

/// 3D vector used for both positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Vec3 from an array.
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Returns `None` when the length is not finite or essentially zero,
    /// so degenerate directions never normalize silently.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > Tolerance::ZERO_LENGTH.eps {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// An arbitrary unit vector perpendicular to `self`, built by crossing
    /// against the smallest component. Callers must pass a non-zero vector.
    #[must_use]
    pub fn any_orthogonal(self) -> Self {
        let abs = Self::new(self.x.abs(), self.y.abs(), self.z.abs());
        let candidate = if abs.x <= abs.y && abs.x <= abs.z {
            Self::new(0.0, -self.z, self.y)
        } else if abs.y <= abs.x && abs.y <= abs.z {
            Self::new(-self.z, 0.0, self.x)
        } else {
            Self::new(-self.y, self.x, 0.0)
        };
        candidate.normalized().unwrap_or(Self::X)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// One of the three coordinate components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisComponent {
    X,
    Y,
    Z,
}

/// Selects one of the six signed unit directions: a component plus an
/// optional negation. Used to pick which local joint axis aims along the
/// chain, which one turns toward the plane normal, and to parameterize
/// axis-aligned plane construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub component: AxisComponent,
    pub negative: bool,
}

impl Axis {
    pub const X: Self = Self::positive(AxisComponent::X);
    pub const Y: Self = Self::positive(AxisComponent::Y);
    pub const Z: Self = Self::positive(AxisComponent::Z);

    #[must_use]
    pub const fn new(component: AxisComponent, negative: bool) -> Self {
        Self {
            component,
            negative,
        }
    }

    #[must_use]
    pub const fn positive(component: AxisComponent) -> Self {
        Self::new(component, false)
    }

    /// The unit vector with one component ±1 and the others 0.
    #[must_use]
    pub const fn unit_vector(self) -> Vec3 {
        let magnitude = if self.negative { -1.0 } else { 1.0 };
        match self.component {
            AxisComponent::X => Vec3::new(magnitude, 0.0, 0.0),
            AxisComponent::Y => Vec3::new(0.0, magnitude, 0.0),
            AxisComponent::Z => Vec3::new(0.0, 0.0, magnitude),
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::X
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric comparisons.
///
/// Use the named constants to avoid epsilon scatter:
/// - `Tolerance::DEFAULT` - general geometry comparisons (1e-9)
/// - `Tolerance::ZERO_LENGTH` - detecting degenerate/zero-length vectors (1e-12)
/// - `Tolerance::LOOSE` - coarse comparisons after long compositions (1e-6)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting zero-length/degenerate vectors (1e-12).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Loose tolerance for coarse comparisons (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_vec3(self, a: Vec3, b: Vec3) -> bool {
        (a - b).length_squared() <= self.eps_squared()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisComponent, Tolerance, Vec3};

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
    }

    #[test]
    fn normalized_rejects_degenerate_input() {
        assert!(Vec3::ZERO.normalized().is_none());
        assert!(Vec3::new(f64::NAN, 0.0, 0.0).normalized().is_none());
        let unit = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_f64(unit.length(), 1.0));
    }

    #[test]
    fn any_orthogonal_is_perpendicular_and_unit() {
        for v in [
            Vec3::X,
            Vec3::new(0.3, -2.0, 5.5),
            Vec3::new(-1.0, -1.0, -1.0),
        ] {
            let ortho = v.any_orthogonal();
            assert!(Tolerance::DEFAULT.approx_eq_f64(ortho.length(), 1.0));
            assert!(Tolerance::DEFAULT.approx_eq_f64(v.dot(ortho), 0.0));
        }
    }

    #[test]
    fn axis_unit_vectors_cover_all_six_directions() {
        assert_eq!(Axis::X.unit_vector(), Vec3::X);
        assert_eq!(
            Axis::new(AxisComponent::Y, true).unit_vector(),
            Vec3::new(0.0, -1.0, 0.0)
        );
        assert_eq!(
            Axis::new(AxisComponent::Z, true).unit_vector(),
            Vec3::new(0.0, 0.0, -1.0)
        );
    }
}
