//! Forward kinematics as a product of DH link transforms, and inverse kinematics
//! by minimizing the pose error.

use std::f64::consts::FRAC_PI_4;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::kinematic_traits::{IkSolution, Joints, Kinematics, Pose};
use crate::link::local_transform;
use crate::linalg::{Matrix3, Vector3};
use crate::optimizer::{Minimizer, NelderMead};
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{DhLink, DhParameters};
use crate::transform::Transform;
use crate::utils::dh_kinematics::is_valid;

/// Retry policy for the inverse kinematics: when the residual stays above `threshold`,
/// restart the optimizer from the best joints found so far, each joint moved by a random
/// amount within `±spread` radians. The best result of all attempts is returned.
///
/// A `spread` of zero restarts from the best joints unchanged, with a fresh simplex.
/// This often gets the optimizer out of a collapsed simplex. Negative spreads act as
/// their absolute value and a non-finite spread acts as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restarts {
    pub count: usize,
    pub threshold: f64,
    pub spread: f64,
    pub seed: u64,
}

impl Restarts {
    pub fn new(count: usize, threshold: f64, seed: u64) -> Self {
        Restarts { count, threshold, spread: FRAC_PI_4, seed }
    }

    pub fn with_spread(self, spread: f64) -> Self {
        Restarts { spread, ..self }
    }

    fn effective_spread(&self) -> f64 {
        if self.spread.is_finite() { self.spread.abs() } else { 0.0 }
    }
}

/// Forward and numerical inverse kinematics of a six joint chain given by DH parameters.
#[derive(Debug, Clone)]
pub struct DhKinematics<M: Minimizer = NelderMead> {
    parameters: DhParameters,
    minimizer: M,
    restarts: Option<Restarts>,
}

impl DhKinematics {
    /// Creates a new `DhKinematics` instance with the given parameters and the default
    /// Nelder-Mead optimizer.
    pub fn new(parameters: DhParameters) -> Self {
        DhKinematics { parameters, minimizer: NelderMead::default(), restarts: None }
    }
}

impl<M: Minimizer> DhKinematics<M> {
    /// Creates a new instance that uses the given optimizer for the inverse kinematics.
    pub fn with_minimizer(parameters: DhParameters, minimizer: M) -> Self {
        DhKinematics { parameters, minimizer, restarts: None }
    }

    /// Enables random restarts of the inverse kinematics.
    pub fn with_restarts(self, restarts: Restarts) -> Self {
        DhKinematics { restarts: Some(restarts), ..self }
    }

    pub fn parameters(&self) -> &DhParameters {
        &self.parameters
    }

    /// Pose error of the given joints against the target, the same value the inverse
    /// kinematics minimizes. Use it to verify a returned solution.
    pub fn pose_error(&self, qs: &Joints, target: &Pose) -> f64 {
        self.forward(qs).error_to(target)
    }

    fn solve_once(&self, target: &Pose, start: &Joints) -> IkSolution {
        let minimum = self.minimizer.minimize(|q: &Joints| self.pose_error(q, target), start);
        IkSolution {
            joints: minimum.point,
            final_cost: minimum.value,
            iterations: minimum.iterations,
            evaluations: minimum.evaluations,
            termination: minimum.termination,
        }
    }

    fn restart(&self, target: &Pose, mut best: IkSolution, restarts: &Restarts) -> IkSolution {
        let mut rng = StdRng::seed_from_u64(restarts.seed);
        let spread = restarts.effective_spread();
        for attempt in 0..restarts.count {
            if best.final_cost <= restarts.threshold {
                break;
            }
            let start: Joints = if spread > 0.0 {
                best.joints.map(|q| q + rng.random_range(-spread..=spread))
            } else {
                best.joints
            };
            let candidate = self.solve_once(target, &start);
            trace!(attempt, cost = candidate.final_cost, best = best.final_cost, "IK restart");
            let iterations = best.iterations + candidate.iterations;
            let evaluations = best.evaluations + candidate.evaluations;
            let improved = candidate.final_cost < best.final_cost;
            if improved {
                best = candidate;
            }
            best.iterations = iterations;
            best.evaluations = evaluations;
            if !improved && spread == 0.0 {
                // The next attempt would start from the same point again
                break;
            }
        }
        best
    }
}

impl<M: Minimizer> Kinematics for DhKinematics<M> {
    fn inverse(&self, pose: &Pose, initial_guess: &Joints) -> IkSolution {
        if !is_valid(initial_guess) || !pose.is_finite() {
            warn!(?initial_guess, "IK started from non-finite input, the cost will not be finite");
        }
        let mut solution = self.solve_once(pose, initial_guess);
        if let Some(restarts) = &self.restarts {
            solution = self.restart(pose, solution, restarts);
        }
        debug!(
            cost = solution.final_cost,
            iterations = solution.iterations,
            evaluations = solution.evaluations,
            termination = ?solution.termination,
            "IK finished"
        );
        solution
    }

    fn forward(&self, qs: &Joints) -> Pose {
        let transforms = self.forward_with_joint_poses(qs);
        Pose::from_transform(&transforms[5])
    }

    fn forward_with_joint_poses(&self, qs: &Joints) -> [Transform; 6] {
        let mut poses = [Transform::identity(); 6];
        let mut accumulated = Transform::identity();
        for (i, link) in self.parameters.links().iter().enumerate() {
            // Order matters: each joint is expressed in the frame of the previous one.
            accumulated = accumulated * local_transform(qs[i], link);
            poses[i] = accumulated;
        }
        poses
    }
}

#[cfg(feature = "parallel")]
impl<M: Minimizer + Sync> DhKinematics<M> {
    /// Solves independent targets in parallel, all from the same initial guess.
    /// The result has the same order as `targets` and equals calling `inverse` one by one.
    pub fn inverse_batch(&self, targets: &[Pose], initial_guess: &Joints) -> Vec<IkSolution> {
        use rayon::prelude::*;
        targets.par_iter().map(|target| self.inverse(target, initial_guess)).collect()
    }
}

/// Forward kinematics for the given joint angles (radians) and six DH records.
/// Fails only if `links` is not a valid DH parameter set.
pub fn solve_fk(qs: &Joints, links: &[DhLink]) -> Result<Pose, ParameterError> {
    let parameters = DhParameters::from_slice(links)?;
    Ok(DhKinematics::new(parameters).forward(qs))
}

/// Inverse kinematics with the default optimizer. Fails only if `links` is not a valid DH
/// parameter set; an unreachable target is reported through `final_cost`.
pub fn solve_ik(
    target_position: &Vector3,
    target_orientation: &Matrix3,
    links: &[DhLink],
    initial_guess: &Joints,
) -> Result<IkSolution, ParameterError> {
    let parameters = DhParameters::from_slice(links)?;
    let target = Pose::new(*target_position, *target_orientation);
    Ok(DhKinematics::new(parameters).inverse(&target, initial_guess))
}
