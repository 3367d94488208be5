use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rs_dh_kinematics::kinematic_traits::{Joints, Kinematics, JOINTS_AT_ZERO};
use rs_dh_kinematics::kinematics_impl::{DhKinematics, Restarts};
use rs_dh_kinematics::linalg::Vector3;
use rs_dh_kinematics::optimizer::NelderMead;
use rs_dh_kinematics::parameters::dh_kinematics::DhParameters;
use rs_dh_kinematics::pose::{EulerAngles, Pose};
use rs_dh_kinematics::utils::{dump_joint_positions, dump_joints, dump_pose, joints, to_degrees};

/// Forward and inverse kinematics of six axis robots given by DH parameters.
/// Positions are printed in millimeters and angles in degrees.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Bundled robot: zero, epson_vt6, epson_vt6_alternative, elbow_manipulator, planar_six_link
    #[arg(long, default_value = "epson_vt6", conflicts_with = "params")]
    robot: String,

    /// YAML file with DH parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Log solver progress (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pose of the end effector and the skeleton for joint angles in degrees
    Fk {
        #[arg(num_args = 6, allow_negative_numbers = true, value_names = ["J1", "J2", "J3", "J4", "J5", "J6"])]
        joints: Vec<f64>,
    },
    /// Joint angles reaching a pose given as X Y Z in mm and YAW PITCH ROLL in degrees
    Ik {
        #[arg(num_args = 6, allow_negative_numbers = true,
              value_names = ["X", "Y", "Z", "YAW", "PITCH", "ROLL"])]
        pose: Vec<f64>,

        /// Initial guess, degrees (zero if not given)
        #[arg(long, num_args = 6, allow_negative_numbers = true)]
        guess: Option<Vec<f64>>,

        /// Residual below which the result is reported as reached
        #[arg(long, default_value_t = 1e-3)]
        tolerance: f64,

        /// Random restarts while the residual is above the tolerance
        #[arg(long, default_value_t = 0)]
        restarts: usize,

        /// Random offset of restarts, degrees per joint; 0 restarts from the best joints
        #[arg(long, default_value_t = 45.0)]
        spread: f64,

        /// Iteration limit of the optimizer (default 1200)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Cost evaluation limit of the optimizer (default 1200)
        #[arg(long)]
        max_evaluations: Option<usize>,

        /// Dimension dependent Nelder-Mead coefficients
        #[arg(long)]
        adaptive: bool,
    },
    /// Print the DH parameters as YAML
    Show,
}

fn six(values: &[f64], what: &str) -> Result<[f64; 6]> {
    values.try_into().map_err(|_| anyhow!("{} needs 6 values, got {}", what, values.len()))
}

fn load_parameters(cli: &Cli) -> Result<DhParameters> {
    match &cli.params {
        Some(path) => DhParameters::from_yaml_file(path)
            .with_context(|| format!("Cannot read DH parameters from {}", path.display())),
        None => DhParameters::by_name(&cli.robot).ok_or_else(|| {
            anyhow!("Unknown robot '{}', known robots: {}", cli.robot, DhParameters::NAMES.join(", "))
        }),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let parameters = load_parameters(&cli)?;

    match &cli.command {
        Command::Fk { joints: degrees } => {
            let qs = joints(&six(degrees, "fk")?);
            let robot = DhKinematics::new(parameters);
            println!("End-effector pose:");
            dump_pose(&robot.forward(&qs));
            println!("Joint positions (mm):");
            dump_joint_positions(&robot.joint_positions(&qs));
        }
        Command::Ik { pose, guess, tolerance, restarts, spread, max_iterations, max_evaluations, adaptive } => {
            let [x, y, z, yaw, pitch, roll] = six(pose, "ik")?;
            if !tolerance.is_finite() || *tolerance < 0.0 {
                bail!("Tolerance must be a non-negative number, got {}", tolerance);
            }
            let target = Pose::new(
                Vector3::new(x, y, z).scale(0.001),
                EulerAngles::from_degrees(yaw, pitch, roll).to_rotation(),
            );
            let initial: Joints = match guess {
                Some(g) => joints(&six(g, "--guess")?),
                None => JOINTS_AT_ZERO,
            };

            let mut minimizer = NelderMead::default();
            if let Some(n) = max_iterations {
                minimizer = minimizer.with_max_iterations(*n);
            }
            if let Some(n) = max_evaluations {
                minimizer = minimizer.with_max_evaluations(*n);
            }
            if *adaptive {
                minimizer = minimizer.adaptive();
            }
            let mut robot = DhKinematics::with_minimizer(parameters, minimizer);
            if *restarts > 0 {
                robot = robot.with_restarts(Restarts::new(*restarts, *tolerance, 0).with_spread(spread.to_radians()));
            }

            let solution = robot.inverse(&target, &initial);
            println!("Joint angles (degrees):");
            dump_joints(&solution.joints);
            println!("Final cost: {:.6e} after {} iterations, {} evaluations ({:?})",
                     solution.final_cost, solution.iterations, solution.evaluations, solution.termination);

            let reached = robot.forward(&solution.joints);
            println!("Reached pose:");
            dump_pose(&reached);
            println!("Position error: {:.3} mm", (reached.position - target.position).norm() * 1000.0);

            if solution.within(*tolerance) {
                println!("Target reached within tolerance {}", tolerance);
            } else {
                println!("Target NOT reached: residual {:.6} above tolerance {}", solution.final_cost, tolerance);
                println!("Raw joints (degrees): {:?}", to_degrees(&solution.joints));
            }
        }
        Command::Show => {
            print!("{}", parameters.to_yaml());
            println!("# maximal reach: {:.3} mm", parameters.max_reach() * 1000.0);
        }
    }
    Ok(())
}
