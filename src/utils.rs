//! Helper functions: unit conversions at the reporting boundary and dumps for the console.

use crate::kinematic_traits::Joints;
use crate::linalg::Vector3;
use crate::pose::Pose;

/// Checks the joint values for validity.
pub(crate) mod dh_kinematics {
    use crate::kinematic_traits::Joints;

    /// Checks if all elements in the array are finite
    pub fn is_valid(qs: &Joints) -> bool {
        qs.iter().all(|&q| q.is_finite())
    }
}

/// Convert array of f64's in degrees to Joints that are array of f64's in radians
pub fn joints(angles: &[f64; 6]) -> Joints {
    angles.map(f64::to_radians)
}

/// Convert joints that are array of f64's in radians to degrees
pub fn to_degrees(angles: &Joints) -> [f64; 6] {
    angles.map(f64::to_degrees)
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: [i32; 6]) -> Joints {
    std::array::from_fn(|i| (degrees[i] as f64).to_radians())
}

/// Meters to millimeters, for display only.
pub fn to_millimeters(v: &Vector3) -> [f64; 3] {
    [v.x * 1000.0, v.y * 1000.0, v.z * 1000.0]
}

/// Print joint values, converting radians to degrees.
pub fn dump_joints(joints: &Joints) {
    let mut row_str = String::new();
    for joint_idx in 0..6 {
        let computed = joints[joint_idx];
        row_str.push_str(&format!("{:5.2} ", computed.to_degrees()));
    }
    println!("[{}]", row_str.trim_end());
}

/// Print position in millimeters and yaw, pitch, roll in degrees.
pub fn dump_pose(pose: &Pose) {
    let [x, y, z] = to_millimeters(&pose.position);
    let [u, v, w] = pose.euler_angles().to_degrees();
    println!("x: {:.3} mm, y: {:.3} mm, z: {:.3} mm, yaw: {:.3}°, pitch: {:.3}°, roll: {:.3}°",
             x, y, z, u, v, w);
}

/// Print the origins of all joint frames (base first), in millimeters.
pub fn dump_joint_positions(positions: &[Vector3]) {
    for (i, p) in positions.iter().enumerate() {
        let [x, y, z] = to_millimeters(p);
        let label = if i == 0 { "base".to_string() } else { format!("J{}", i) };
        println!("{:>4}: {:10.3} {:10.3} {:10.3}", label, x, y, z);
    }
}

/// Formatting of angles for YAML output. Reads back to exactly the same radians:
/// short degrees when they convert back exactly, full precision degrees otherwise,
/// and plain radians if no degree value converts back.
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    let degrees = x.to_degrees();
    let short = (degrees * 1e6).round() / 1e6;
    if short.to_radians() == *x {
        format!("deg({})", short)
    } else if degrees.to_radians() == *x {
        format!("deg({})", degrees)
    } else {
        format!("{}", x)
    }
}
