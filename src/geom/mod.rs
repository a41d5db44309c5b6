mod core;
mod plane;
mod rotation;

pub use self::core::{Axis, AxisComponent, Tolerance, Vec3};
pub use self::plane::{GeometryError, Plane, three_point_normal, two_point_normal};
pub use self::rotation::{EulerRotation, Mat3, Quat, RotationOrder};
