//! Derivative-free minimization used by the inverse kinematics.
//!
//! The solver only needs "minimize this function starting from here", expressed by the
//! [`Minimizer`] trait. [`NelderMead`] is the provided implementation.

use std::cell::Cell;

use tracing::trace;

/// Why the minimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Both the simplex size and the spread of function values fell below the tolerances.
    /// This says nothing about how good the minimum is.
    Converged,
    /// Iteration limit reached first.
    MaxIterations,
    /// Function evaluation limit reached first.
    MaxEvaluations,
}

/// Best point found by a minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum<const N: usize> {
    pub point: [f64; N],
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub termination: Termination,
}

/// Unconstrained minimization of a scalar function of `N` variables.
pub trait Minimizer {
    /// Minimizes `cost` starting from `initial`. The returned value must never be worse than
    /// the cost of `initial` itself.
    fn minimize<const N: usize, F>(&self, cost: F, initial: &[f64; N]) -> Minimum<N>
    where
        F: FnMut(&[f64; N]) -> f64;
}

/// Nelder-Mead downhill simplex with the classic coefficients (reflection 1, expansion 2,
/// contraction 0.5, shrink 0.5).
///
/// The initial simplex steps 5% away from every non-zero coordinate of the starting point
/// and 0.00025 from every zero coordinate. Iteration stops when all vertices lie within
/// `xatol` of the best one in every coordinate and their values within `fatol`, or when
/// a limit is reached. Unset limits default to `200 * N`.
///
/// With `adaptive` set, expansion, contraction and shrink scale with the dimension
/// (Gao and Han), which helps in six and more dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    pub xatol: f64,
    pub fatol: f64,
    pub max_iterations: Option<usize>,
    pub max_evaluations: Option<usize>,
    pub adaptive: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;
const NONZERO_STEP: f64 = 0.05;
const ZERO_STEP: f64 = 0.00025;

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead {
            xatol: 1e-4,
            fatol: 1e-4,
            max_iterations: None,
            max_evaluations: None,
            adaptive: false,
        }
    }
}

impl NelderMead {
    pub fn with_tolerances(self, xatol: f64, fatol: f64) -> Self {
        NelderMead { xatol, fatol, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        NelderMead { max_iterations: Some(max_iterations), ..self }
    }

    pub fn with_max_evaluations(self, max_evaluations: usize) -> Self {
        NelderMead { max_evaluations: Some(max_evaluations), ..self }
    }

    /// Use dimension dependent coefficients.
    pub fn adaptive(self) -> Self {
        NelderMead { adaptive: true, ..self }
    }

    /// Expansion, contraction and shrink coefficients for `n` variables.
    fn coefficients(&self, n: usize) -> (f64, f64, f64) {
        if self.adaptive && n > 0 {
            let n = n as f64;
            (1.0 + 2.0 / n, 0.75 - 1.0 / (2.0 * n), 1.0 - 1.0 / n)
        } else {
            (EXPANSION, CONTRACTION, SHRINK)
        }
    }
}

/// Vertex of the simplex with its function value.
type Vertex<const N: usize> = ([f64; N], f64);

/// `(1 + t) * centroid - t * worst`, the point on the line through the worst vertex and
/// the centroid of the others. `t = 1` reflects, `t = 2` expands, `t = ±0.5` contracts.
fn along<const N: usize>(centroid: &[f64; N], worst: &[f64; N], t: f64) -> [f64; N] {
    std::array::from_fn(|i| (1.0 + t) * centroid[i] - t * worst[i])
}

fn rank(f: f64) -> f64 {
    if f.is_nan() { f64::INFINITY } else { f }
}

impl Minimizer for NelderMead {
    fn minimize<const N: usize, F>(&self, mut cost: F, initial: &[f64; N]) -> Minimum<N>
    where
        F: FnMut(&[f64; N]) -> f64,
    {
        let max_iterations = self.max_iterations.unwrap_or(200 * N);
        let max_evaluations = self.max_evaluations.unwrap_or(200 * N);
        let (expansion, contraction, shrink_by) = self.coefficients(N);
        let evaluations = Cell::new(0usize);
        let mut eval = |x: &[f64; N]| {
            evaluations.set(evaluations.get() + 1);
            cost(x)
        };

        let mut simplex: Vec<Vertex<N>> = Vec::with_capacity(N + 1);
        simplex.push((*initial, eval(initial)));
        for k in 0..N {
            let mut x = *initial;
            x[k] = if x[k] != 0.0 { (1.0 + NONZERO_STEP) * x[k] } else { ZERO_STEP };
            let f = eval(&x);
            simplex.push((x, f));
        }
        // NaN of either sign sorts last, so a vertex with undefined cost is replaced first.
        simplex.sort_by(|a, b| rank(a.1).total_cmp(&rank(b.1)));

        let mut iterations = 1;
        let mut termination = Termination::MaxIterations;
        loop {
            if evaluations.get() >= max_evaluations {
                termination = Termination::MaxEvaluations;
                break;
            }
            if iterations >= max_iterations {
                break;
            }

            let (best, best_f) = simplex[0];
            let x_spread = simplex[1..].iter()
                .flat_map(|(x, _)| x.iter().zip(best.iter()).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = simplex[1..].iter()
                .map(|(_, f)| (f - best_f).abs())
                .fold(0.0, f64::max);
            // An undefined best value is never reported as converged.
            if best_f.is_finite() && x_spread <= self.xatol && f_spread <= self.fatol {
                termination = Termination::Converged;
                break;
            }

            let centroid: [f64; N] = std::array::from_fn(|i| {
                simplex[..N].iter().map(|(x, _)| x[i]).sum::<f64>() / N as f64
            });
            let (worst, worst_f) = simplex[N];
            let second_worst_f = simplex[N - 1].1;

            let xr = along(&centroid, &worst, REFLECTION);
            let fr = eval(&xr);

            let mut shrink = false;
            if fr < best_f {
                let xe = along(&centroid, &worst, REFLECTION * expansion);
                let fe = eval(&xe);
                simplex[N] = if fe < fr { (xe, fe) } else { (xr, fr) };
            } else if fr < second_worst_f {
                simplex[N] = (xr, fr);
            } else if fr < worst_f {
                // Outside contraction
                let xc = along(&centroid, &worst, contraction * REFLECTION);
                let fc = eval(&xc);
                if fc <= fr {
                    simplex[N] = (xc, fc);
                } else {
                    shrink = true;
                }
            } else {
                // Inside contraction
                let xcc = along(&centroid, &worst, -contraction);
                let fcc = eval(&xcc);
                if fcc < worst_f {
                    simplex[N] = (xcc, fcc);
                } else {
                    shrink = true;
                }
            }

            if shrink {
                for j in 1..=N {
                    let x: [f64; N] = std::array::from_fn(|i| best[i] + shrink_by * (simplex[j].0[i] - best[i]));
                    let f = eval(&x);
                    simplex[j] = (x, f);
                }
            }

            simplex.sort_by(|a, b| rank(a.1).total_cmp(&rank(b.1)));
            iterations += 1;
        }

        let (point, value) = simplex[0];
        let evaluations = evaluations.get();
        trace!(value, iterations, evaluations, ?termination, "Nelder-Mead finished");
        Minimum { point, value, iterations, evaluations, termination }
    }
}
