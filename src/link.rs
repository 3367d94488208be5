//! Local transform of a single DH joint

use crate::linalg::{Matrix3, Vector3};
use crate::parameters::dh_kinematics::DhLink;
use crate::transform::Transform;

/// Transform of the joint frame relative to the previous one,
/// `Rz(θ) · Tz(d) · Tx(a) · Rx(α)` with `θ = theta_cmd + link.theta_offset`.
///
/// The offset is applied here and nowhere else, so callers pass the commanded angle.
/// ```text
/// [ cosθ  -sinθ·cosα   sinθ·sinα  a·cosθ ]
/// [ sinθ   cosθ·cosα  -cosθ·sinα  a·sinθ ]
/// [ 0      sinα        cosα       d      ]
/// [ 0      0           0          1      ]
/// ```
pub fn local_transform(theta_cmd: f64, link: &DhLink) -> Transform {
    let (st, ct) = (theta_cmd + link.theta_offset).sin_cos();
    let (sa, ca) = link.alpha.sin_cos();

    let rotation = Matrix3::from_rows([
        [ct, -st * ca, st * sa],
        [st, ct * ca, -ct * sa],
        [0.0, sa, ca],
    ]);
    let translation = Vector3::new(link.a * ct, link.a * st, link.d);
    Transform::from_parts(&rotation, &translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const SMALL: f64 = 1e-12;

    #[test]
    fn test_zero_link_is_identity() {
        let t = local_transform(0.0, &DhLink::default());
        assert_eq!(t, Transform::identity());
    }

    #[test]
    fn test_matches_elementary_product() {
        let link = DhLink::new(0.7, 0.25, -0.4, 0.3);
        let theta = -1.1;
        let t = local_transform(theta, &link);

        // Rz(θ) · Tz(d) · Tx(a) · Rx(α)
        let rz = Transform::from_parts(&Matrix3::rotation_z(theta + link.theta_offset), &Vector3::zeros());
        let tz = Transform::from_parts(&Matrix3::identity(), &Vector3::new(0.0, 0.0, link.d));
        let tx = Transform::from_parts(&Matrix3::identity(), &Vector3::new(link.a, 0.0, 0.0));
        let rx = Transform::from_parts(&Matrix3::rotation_x(link.alpha), &Vector3::zeros());
        let expected = rz * tz * tx * rx;

        assert!((t.rotation() - expected.rotation()).norm() < SMALL);
        assert!((t.translation() - expected.translation()).norm() < SMALL);
        assert_eq!(t.matrix().m[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_offset_is_added_to_commanded_angle() {
        let with_offset = local_transform(0.2, &DhLink::new(0.1, 0.5, 0.3, 0.4));
        let pre_added = local_transform(0.6, &DhLink::new(0.1, 0.5, 0.3, 0.0));
        assert!((with_offset.rotation() - pre_added.rotation()).norm() < SMALL);
        assert!((with_offset.translation() - pre_added.translation()).norm() < SMALL);
    }

    #[test]
    fn test_link_length_rotates_with_joint() {
        let t = local_transform(FRAC_PI_2, &DhLink::new(0.0, 2.0, 1.0, 0.0));
        assert!((t.translation() - Vector3::new(0.0, 2.0, 1.0)).norm() < SMALL);
    }

    #[test]
    fn test_twist_only() {
        // Twist of 180 degrees flips y and z
        let t = local_transform(0.0, &DhLink::new(PI, 0.0, 0.0, 0.0));
        let r = t.rotation();
        assert!((r[(1, 1)] + 1.0).abs() < SMALL);
        assert!((r[(2, 2)] + 1.0).abs() < SMALL);
        assert!((r.determinant() - 1.0).abs() < SMALL);
    }

    #[test]
    fn test_nan_propagates() {
        let t = local_transform(f64::NAN, &DhLink::new(0.0, 1.0, 0.0, 0.0));
        assert!(t.translation().x.is_nan());
        assert!(t.rotation()[(0, 0)].is_nan());
    }
}
