use crate::kinematic_traits::{Kinematics, Pose, Termination, JOINTS_AT_ZERO};
use crate::kinematics_impl::{solve_fk, solve_ik, DhKinematics, Restarts};
use crate::linalg::{Matrix3, Vector3};
use crate::optimizer::NelderMead;
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{DhLink, DhParameters};
use crate::tests::test_utils::{are_poses_close, create_parameter_map, random_joints, seeded_rng};

#[test]
fn test_round_trip_from_true_joints() {
    let mut rng = seeded_rng();
    for (name, parameters) in create_parameter_map() {
        let robot = DhKinematics::new(parameters);
        for _ in 0..10 {
            let qs = random_joints(&mut rng);
            let target = robot.forward(&qs);
            let solution = robot.inverse(&target, &qs);

            assert!(solution.within(1e-6), "{}: cost {}", name, solution.final_cost);
            // Verify the way callers are expected to: forward kinematics of the result
            let reached = robot.forward(&solution.joints);
            assert!(are_poses_close(&reached, &target, 1e-6, 1e-6), "{}: {:?}", name, qs);
        }
    }
}

#[test]
fn test_round_trip_free_functions() {
    let links = *DhParameters::epson_vt6().links();
    let qs = [0.4, -0.3, 0.2, 1.0, -0.7, 0.3];
    let pose = solve_fk(&qs, &links).unwrap();
    let solution = solve_ik(&pose.position, &pose.orientation, &links, &qs).unwrap();
    assert!(solution.within(1e-6));
    let reached = solve_fk(&solution.joints, &links).unwrap();
    assert!(are_poses_close(&reached, &pose, 1e-6, 1e-6));
}

#[test]
fn test_final_cost_is_residual_of_returned_joints() {
    let robot = DhKinematics::new(DhParameters::elbow_manipulator());
    let target = robot.forward(&[0.3, 0.2, -0.4, 0.1, 0.5, -0.2]);
    let solution = robot.inverse(&target, &JOINTS_AT_ZERO);
    assert_eq!(solution.final_cost, robot.pose_error(&solution.joints, &target));
    assert!(solution.evaluations > 0);
    assert!(solution.iterations > 0);
}

#[test]
fn test_improves_on_initial_guess() {
    let robot = DhKinematics::new(DhParameters::elbow_manipulator());
    let qs = [0.3, 0.2, -0.4, 0.1, 0.5, -0.2];
    let target = robot.forward(&qs);
    let guess = [0.32, 0.18, -0.38, 0.1, 0.5, -0.2];

    let initial_cost = robot.pose_error(&guess, &target);
    let solution = robot.inverse(&target, &guess);
    assert!(solution.final_cost < 0.5 * initial_cost,
            "cost {} not much better than initial {}", solution.final_cost, initial_cost);
}

#[test]
fn test_unreachable_target_reports_cost() {
    let parameters = DhParameters::epson_vt6();
    let robot = DhKinematics::new(parameters);
    let far = Vector3::new(3.0, -2.0, 4.0);
    let target = Pose::new(far, Matrix3::identity());

    let solution = robot.inverse(&target, &JOINTS_AT_ZERO);
    // No configuration gets closer than the distance beyond the maximum reach
    let lower_bound = far.norm() - parameters.max_reach();
    assert!(lower_bound > 1.0);
    assert!(solution.final_cost >= lower_bound, "cost {} below {}", solution.final_cost, lower_bound);
    assert!(!solution.within(1e-3));
    assert!(solution.final_cost.is_finite());
}

#[test]
fn test_iteration_cap_is_reported() {
    let nm = NelderMead::default().with_max_iterations(5);
    let robot = DhKinematics::with_minimizer(DhParameters::epson_vt6(), nm);
    let target = robot.forward(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
    let solution = robot.inverse(&target, &JOINTS_AT_ZERO);
    assert_eq!(solution.termination, Termination::MaxIterations);
    assert_eq!(solution.iterations, 5);
}

#[test]
fn test_restarts_never_worse() {
    let parameters = DhParameters::epson_vt6();
    let target = DhKinematics::new(parameters).forward(&[1.0, -0.5, 0.7, 0.2, -1.2, 0.4]);

    let plain = DhKinematics::new(parameters).inverse(&target, &JOINTS_AT_ZERO);
    let restarted = DhKinematics::new(parameters)
        .with_restarts(Restarts::new(3, 1e-9, 42))
        .inverse(&target, &JOINTS_AT_ZERO);

    assert!(restarted.final_cost <= plain.final_cost);
    assert!(restarted.evaluations >= plain.evaluations);

    // Same seed, same answer
    let again = DhKinematics::new(parameters)
        .with_restarts(Restarts::new(3, 1e-9, 42))
        .inverse(&target, &JOINTS_AT_ZERO);
    assert_eq!(restarted, again);
}

#[test]
fn test_restarts_skipped_below_threshold() {
    let parameters = DhParameters::epson_vt6();
    let qs = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
    let target = DhKinematics::new(parameters).forward(&qs);
    let plain = DhKinematics::new(parameters).inverse(&target, &qs);
    let restarted = DhKinematics::new(parameters)
        .with_restarts(Restarts::new(5, 1e-6, 7))
        .inverse(&target, &qs);
    assert_eq!(plain, restarted);
}

#[test]
fn test_solve_ik_rejects_bad_parameters() {
    let mut links = *DhParameters::epson_vt6().links();
    links[0].theta_offset = f64::NAN;
    let result = solve_ik(&Vector3::zeros(), &Matrix3::identity(), &links, &JOINTS_AT_ZERO);
    assert!(matches!(result, Err(ParameterError::InvalidInput(_))));

    let result = solve_ik(&Vector3::zeros(), &Matrix3::identity(), &[DhLink::default(); 7], &JOINTS_AT_ZERO);
    assert!(matches!(result, Err(ParameterError::InvalidInput(_))));
}

#[cfg(feature = "parallel")]
#[test]
fn test_batch_matches_sequential() {
    let mut rng = seeded_rng();
    let robot = DhKinematics::new(DhParameters::elbow_manipulator());
    let targets: Vec<Pose> = (0..8).map(|_| robot.forward(&random_joints(&mut rng))).collect();
    let guess = [0.1; 6];

    let batch = robot.inverse_batch(&targets, &guess);
    assert_eq!(batch.len(), targets.len());
    for (target, solution) in targets.iter().zip(batch.iter()) {
        assert_eq!(*solution, robot.inverse(target, &guess));
    }
}

/// Settings for solving to a tight residual: adaptive coefficients, tolerances well below
/// the residual we check, and caps that do not cut the search short.
fn tight_minimizer() -> NelderMead {
    NelderMead::default()
        .adaptive()
        .with_tolerances(1e-10, 1e-12)
        .with_max_iterations(6000)
        .with_max_evaluations(12000)
}

#[test]
fn test_single_run_converges_from_nearby_guess() {
    let robot = DhKinematics::with_minimizer(DhParameters::epson_vt6(), tight_minimizer());
    let qs = [0.4, -0.3, 0.2, 1.0, -0.7, 0.3];
    let target = robot.forward(&qs);
    for offset in [0.05, -0.05] {
        let guess = qs.map(|q| q + offset);
        assert!(robot.pose_error(&guess, &target) > 1e-3);

        let solution = robot.inverse(&target, &guess);
        assert!(solution.within(1e-6), "offset {}: {:?}", offset, solution);
        assert_eq!(solution.termination, Termination::Converged);
        let reached = robot.forward(&solution.joints);
        assert!(are_poses_close(&reached, &target, 1e-6, 1e-6));
    }
}

#[test]
fn test_refinement_restarts_converge_from_nearby_guess() {
    let cases = [
        (DhParameters::epson_vt6(), [0.4, -0.3, 0.2, 1.0, -0.7, 0.3]),
        (DhParameters::elbow_manipulator(), [0.3, 0.2, -0.4, 0.1, 0.5, -0.2]),
        (DhParameters::epson_vt6(), [1.0, -0.5, 0.7, 0.2, -1.2, 0.4]),
    ];
    for (parameters, qs) in cases {
        // Zero spread: every restart continues from the best joints with a fresh simplex
        let robot = DhKinematics::with_minimizer(parameters, tight_minimizer())
            .with_restarts(Restarts::new(10, 1e-9, 0).with_spread(0.0));
        let target = robot.forward(&qs);
        for offset in [0.05, -0.05] {
            let guess = qs.map(|q| q + offset);
            let solution = robot.inverse(&target, &guess);
            assert!(solution.within(1e-6), "{:?} offset {}: {:?}", qs, offset, solution);
            let reached = robot.forward(&solution.joints);
            assert!(are_poses_close(&reached, &target, 1e-6, 1e-6), "{:?} offset {}", qs, offset);
        }
    }
}

#[test]
fn test_nan_guess_reports_undefined_cost() {
    let robot = DhKinematics::new(DhParameters::epson_vt6());
    let target = robot.forward(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    let guess = [0.0, f64::NAN, 0.0, 0.0, 0.0, 0.0];

    let solution = robot.inverse(&target, &guess);
    assert!(solution.final_cost.is_nan());
    assert!(!solution.within(1e-3));
    assert_ne!(solution.termination, Termination::Converged);

    let restarted = DhKinematics::new(DhParameters::epson_vt6())
        .with_restarts(Restarts::new(2, 1e-9, 5))
        .inverse(&target, &guess);
    assert!(restarted.final_cost.is_nan());
    assert!(!restarted.within(1e-3));
}

#[test]
fn test_restart_spread_sign_and_nan() {
    let parameters = DhParameters::epson_vt6();
    let target = DhKinematics::new(parameters).forward(&[1.0, -0.5, 0.7, 0.2, -1.2, 0.4]);
    let solve = |spread: f64| {
        DhKinematics::new(parameters)
            .with_restarts(Restarts::new(2, 1e-12, 1).with_spread(spread))
            .inverse(&target, &JOINTS_AT_ZERO)
    };
    let plain = DhKinematics::new(parameters).inverse(&target, &JOINTS_AT_ZERO);

    let negative = solve(-0.1);
    assert_eq!(negative, solve(0.1));
    assert!(negative.final_cost <= plain.final_cost);

    for spread in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let solution = solve(spread);
        assert_eq!(solution, solve(0.0), "spread {}", spread);
        assert!(solution.final_cost.is_finite());
        assert!(solution.final_cost <= plain.final_cost);
    }
}
