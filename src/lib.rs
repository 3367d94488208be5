//! Rust implementation of forward and numerical inverse kinematics for six-axis serial robots
//! described by Denavit-Hartenberg (DH) parameters.
//!
//! # Features
//!
//! - Forward kinematics returns the pose of the end effector and, on request, the cumulative
//!   frames of all joints (to draw the robot skeleton).
//! - Inverse kinematics minimizes the pose error with a derivative-free Nelder-Mead search
//!   starting from a caller supplied guess. The optimizer is pluggable through the
//!   [`optimizer::Minimizer`] trait.
//! - Inverse kinematics never fails: it returns the best joints found together with their
//!   residual, and the caller decides whether the residual is good enough.
//! - Euler angle (yaw, pitch, roll) extraction with well defined behavior at gimbal lock.
//! - DH parameters can be read from YAML (feature `allow_filesystem`).
//! - Independent targets can be solved in parallel (feature `parallel`).
//!
//! # Parameters
//!
//! Each of the six joints is described by a [`parameters::dh_kinematics::DhLink`]: link twist
//! α, link length a, link offset d, and a fixed joint angle offset. The local transform of a
//! joint is `Rz(θ + offset) · Tz(d) · Tx(a) · Rx(α)`, and the chain is composed from the base
//! to the tool flange. All angles are radians and all lengths share the unit of the parameters
//! (meters for the bundled robots). Degrees and millimeters are only used for display.
//!
//! ```
//! use rs_dh_kinematics::kinematic_traits::{Kinematics, JOINTS_AT_ZERO};
//! use rs_dh_kinematics::kinematics_impl::DhKinematics;
//! use rs_dh_kinematics::parameters::dh_kinematics::DhParameters;
//!
//! let robot = DhKinematics::new(DhParameters::epson_vt6());
//! let joints = [0.1, -0.2, 0.3, 0.0, 0.4, 0.0];
//! let pose = robot.forward(&joints);
//!
//! let solution = robot.inverse(&pose, &joints);
//! assert!(solution.within(1e-6));
//!
//! let skeleton = robot.joint_positions(&JOINTS_AT_ZERO);
//! assert_eq!(skeleton.len(), 7);
//! ```

pub mod linalg;
pub mod transform;
pub mod pose;

pub mod parameters;
pub mod parameters_robots;
pub mod parameter_error;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

pub mod utils;
pub mod link;
pub mod optimizer;
pub mod kinematic_traits;
pub mod kinematics_impl;

#[cfg(test)]
mod tests;
