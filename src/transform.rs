//! Homogeneous transform `[[R, t], [0, 0, 0, 1]]`

use std::ops::Mul;

use nalgebra::{Isometry3, Rotation3, Translation3, UnitQuaternion};

use crate::linalg::{Matrix3, Matrix4, Vector3};

/// Rigid transform stored as a 4x4 homogeneous matrix.
///
/// The bottom row is always exactly `[0, 0, 0, 1]`: the only way to build a `Transform` is
/// from a rotation and a translation, and composition writes the bottom row literally
/// instead of computing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4,
}

impl Transform {
    pub const fn identity() -> Self {
        Transform { matrix: Matrix4::identity() }
    }

    /// Builds the transform from the rotation block and the translation column.
    pub fn from_parts(rotation: &Matrix3, translation: &Vector3) -> Self {
        let r = &rotation.m;
        Transform {
            matrix: Matrix4::from_rows([
                [r[0][0], r[0][1], r[0][2], translation.x],
                [r[1][0], r[1][1], r[1][2], translation.y],
                [r[2][0], r[2][1], r[2][2], translation.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Upper-left 3x3 block
    pub fn rotation(&self) -> Matrix3 {
        self.matrix.fixed_block3()
    }

    /// Translation column
    pub fn translation(&self) -> Vector3 {
        self.matrix.last_column3()
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// Applies the transform to a point.
    pub fn transform_point(&self, p: &Vector3) -> Vector3 {
        self.rotation() * *p + self.translation()
    }

    /// Inverse of a rigid transform, `[[Rᵀ, -Rᵀt], [0, 1]]`.
    pub fn inverse(&self) -> Transform {
        let rt = self.rotation().transpose();
        Transform::from_parts(&rt, &-(rt * self.translation()))
    }

    /// Converts into nalgebra isometry. The rotation block is assumed to be a proper rotation.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let rotation = Rotation3::from_matrix_unchecked(self.rotation().into());
        let t = self.translation();
        Isometry3::from_parts(
            Translation3::new(t.x, t.y, t.z),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let rotation = self.rotation() * rhs.rotation();
        let translation = self.rotation() * rhs.translation() + self.translation();
        Transform::from_parts(&rotation, &translation)
    }
}

impl From<&Isometry3<f64>> for Transform {
    fn from(isometry: &Isometry3<f64>) -> Self {
        let r = isometry.rotation.to_rotation_matrix();
        let m = r.matrix();
        let rotation = Matrix3::from_rows([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]);
        let t = isometry.translation.vector;
        Transform::from_parts(&rotation, &Vector3::new(t.x, t.y, t.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: f64 = 1e-12;

    fn sample() -> Transform {
        let rotation = Matrix3::rotation_z(0.4) * Matrix3::rotation_x(-1.2);
        Transform::from_parts(&rotation, &Vector3::new(0.3, -0.1, 0.7))
    }

    #[test]
    fn test_composition_keeps_bottom_row() {
        let mut t = Transform::identity();
        for _ in 0..50 {
            t = t * sample();
        }
        assert_eq!(t.matrix().m[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_composition_matches_matrix_product() {
        let a = sample();
        let b = sample().inverse();
        let composed = a * sample();
        let product = *a.matrix() * *sample().matrix();
        for r in 0..4 {
            for c in 0..4 {
                assert!((composed.matrix()[(r, c)] - product[(r, c)]).abs() < SMALL);
            }
        }
        let back = composed * b;
        assert!((back.translation() - a.translation()).norm() < SMALL);
    }

    #[test]
    fn test_inverse_gives_identity() {
        let t = sample();
        let i = t * t.inverse();
        assert!((i.rotation() - Matrix3::identity()).norm() < SMALL);
        assert!(i.translation().norm() < SMALL);
    }

    #[test]
    fn test_isometry_round_trip() {
        let t = sample();
        let iso = t.to_isometry();
        let p = Vector3::new(1.0, 2.0, 3.0);
        let ours = t.transform_point(&p);
        let theirs = iso.transform_point(&nalgebra::Point3::new(1.0, 2.0, 3.0));
        assert!((ours.x - theirs.x).abs() < SMALL);
        assert!((ours.y - theirs.y).abs() < SMALL);
        assert!((ours.z - theirs.z).abs() < SMALL);

        let back = Transform::from(&iso);
        assert!((back.rotation() - t.rotation()).norm() < 1e-9);
        assert!((back.translation() - t.translation()).norm() < SMALL);
    }
}
