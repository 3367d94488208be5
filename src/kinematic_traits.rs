//! The kinematics interface and the types it works with

pub use crate::optimizer::Termination;
pub use crate::pose::Pose;
use crate::linalg::Vector3;
use crate::transform::Transform;

/// Joint angles of the six axes, in radians. Alias of [f64; 6].
pub type Joints = [f64; 6];

/// All joints at zero.
pub const JOINTS_AT_ZERO: Joints = [0.0; 6];

/// Result of the numerical inverse kinematics.
///
/// The solver never decides whether this is a success. `final_cost` is the residual
/// `‖p(q) − p*‖ + ‖R* − R(q)‖_F` of the returned joints; compare it against your own
/// tolerance (see [`IkSolution::within`]), or re-run forward kinematics on `joints`.
/// The pose may be reachable by other joint configurations too (elbow up / down,
/// wrist flip); which one is returned depends on the initial guess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkSolution {
    /// Best joint angles found, radians.
    pub joints: Joints,
    /// Pose error of `joints`.
    pub final_cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// Why the optimizer stopped. `Converged` only means the simplex collapsed, possibly
    /// into a local minimum or far from an unreachable target.
    pub termination: Termination,
}

impl IkSolution {
    /// True if the residual is not above the caller's tolerance.
    pub fn within(&self, tolerance: f64) -> bool {
        self.final_cost <= tolerance
    }
}

pub trait Kinematics {
    /// Find joint angles that bring the end effector to `pose`, starting the search at
    /// `initial_guess`. Returns the best configuration found with its residual.
    fn inverse(&self, pose: &Pose, initial_guess: &Joints) -> IkSolution;

    /// Find the pose of the end effector for the given joint angles.
    fn forward(&self, qs: &Joints) -> Pose;

    /// Cumulative transforms of all six joint frames relative to the base:
    /// `T1`, `T1·T2`, ..., `T1·...·T6`. The last one is the end effector.
    fn forward_with_joint_poses(&self, qs: &Joints) -> [Transform; 6];

    /// Origins of all frames, starting with the base origin followed by the six
    /// cumulative joint frames. This is the skeleton a plotting tool would draw.
    fn joint_positions(&self, qs: &Joints) -> [Vector3; 7] {
        let poses = self.forward_with_joint_poses(qs);
        let mut positions = [Vector3::zeros(); 7];
        for (i, pose) in poses.iter().enumerate() {
            positions[i + 1] = pose.translation();
        }
        positions
    }
}
