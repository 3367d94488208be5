//! End-effector pose and its Euler angle view

use std::f64::consts::FRAC_PI_2;

use nalgebra::Isometry3;

use crate::linalg::{Matrix3, Vector3};
use crate::transform::Transform;

/// Below this value of `sqrt(R21² + R22²)` (the cosine of pitch) the ZYX extraction is
/// treated as gimbal locked.
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-9;

/// Position and orientation of a frame relative to the robot base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position, in the length units of the DH parameters (meters for the bundled robots).
    pub position: Vector3,
    /// Orientation as a rotation matrix
    pub orientation: Matrix3,
}

/// ZYX (yaw-pitch-roll) Euler angles in radians: `R = Rz(yaw) · Ry(pitch) · Rx(roll)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        EulerAngles { yaw, pitch, roll }
    }

    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        EulerAngles::new(yaw.to_radians(), pitch.to_radians(), roll.to_radians())
    }

    /// Extracts the angles from a rotation matrix.
    ///
    /// ```text
    /// yaw   = atan2(R10, R00)
    /// pitch = atan2(-R20, sqrt(R21² + R22²))
    /// roll  = atan2(R21, R22)
    /// ```
    ///
    /// At pitch = ±90° yaw and roll describe the same axis and cannot be separated.
    /// When `sqrt(R21² + R22²) <= GIMBAL_LOCK_EPSILON`, yaw is set to 0, pitch to ±90°
    /// by the sign of `-R20`, and the whole rotation about the vertical is returned as roll:
    /// `roll = atan2(R01, R11)` for +90° and `roll = atan2(-R01, R11)` for -90°.
    /// The result still reproduces `r` through [`EulerAngles::to_rotation`].
    pub fn from_rotation(r: &Matrix3) -> Self {
        let cos_pitch = (r[(2, 1)] * r[(2, 1)] + r[(2, 2)] * r[(2, 2)]).sqrt();
        if cos_pitch <= GIMBAL_LOCK_EPSILON {
            if -r[(2, 0)] > 0.0 {
                // R01 = sin(roll - yaw), R11 = cos(roll - yaw)
                EulerAngles::new(0.0, FRAC_PI_2, r[(0, 1)].atan2(r[(1, 1)]))
            } else {
                // R01 = -sin(roll + yaw), R11 = cos(roll + yaw)
                EulerAngles::new(0.0, -FRAC_PI_2, (-r[(0, 1)]).atan2(r[(1, 1)]))
            }
        } else {
            EulerAngles::new(
                r[(1, 0)].atan2(r[(0, 0)]),
                (-r[(2, 0)]).atan2(cos_pitch),
                r[(2, 1)].atan2(r[(2, 2)]),
            )
        }
    }

    /// Rotation matrix `Rz(yaw) · Ry(pitch) · Rx(roll)`.
    pub fn to_rotation(&self) -> Matrix3 {
        Matrix3::rotation_z(self.yaw) * Matrix3::rotation_y(self.pitch) * Matrix3::rotation_x(self.roll)
    }

    /// Angles as `[yaw, pitch, roll]` in degrees, for reporting.
    pub fn to_degrees(&self) -> [f64; 3] {
        [self.yaw.to_degrees(), self.pitch.to_degrees(), self.roll.to_degrees()]
    }
}

impl Pose {
    pub fn new(position: Vector3, orientation: Matrix3) -> Self {
        Pose { position, orientation }
    }

    pub fn from_transform(t: &Transform) -> Self {
        Pose { position: t.translation(), orientation: t.rotation() }
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_parts(&self.orientation, &self.position)
    }

    /// Yaw, pitch and roll of the orientation.
    pub fn euler_angles(&self) -> EulerAngles {
        EulerAngles::from_rotation(&self.orientation)
    }

    /// Distance between positions plus Frobenius norm of the orientation difference.
    ///
    /// This is the cost that inverse kinematics minimizes. The two terms are added without
    /// any weighting even though one is a length and the other is dimensionless.
    pub fn error_to(&self, target: &Pose) -> f64 {
        (self.position - target.position).norm() + (target.orientation - self.orientation).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        self.to_transform().to_isometry()
    }
}

impl From<&Transform> for Pose {
    fn from(t: &Transform) -> Self {
        Pose::from_transform(t)
    }
}
