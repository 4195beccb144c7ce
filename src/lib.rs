//! # sinkloss
//!
//! Entropic optimal-transport cost between two finite point clouds, computed by
//! fixed-round Sinkhorn scaling. This is the loss a generator can be trained on
//! in place of a GAN discriminator: compare a batch of generated samples with a
//! batch of data samples by how expensive it is to move one onto the other.
//!
//! ## The Problem
//!
//! Given points \(x_1..x_m\) and \(y_1..y_n\) in \(\mathbb{R}^d\), with ground
//! cost \(C_{ij} = \|x_i - y_j\|^2\), find scalings \(u, v\) such that the plan
//! \(P = \mathrm{diag}(u)\,K\,\mathrm{diag}(v)\), \(K = \exp(-C/\varepsilon)\),
//! has the prescribed marginals, and report \(\langle C, P \rangle\).
//!
//! ## Key Functions
//!
//! | Function | Use Case |
//! |----------|----------|
//! | [`transport_cost`] | Fixed-round cost, unit mass per point |
//! | [`weighted_transport_cost`] | Same, with per-point masses |
//! | [`transport_cost_with_convergence`] | Early stop on marginal error |
//! | [`transport_plan`] | The coupling itself |
//! | [`sinkhorn_divergence`] | Debiased cost, zero on identical batches |
//!
//! ## Quick Start
//!
//! ```rust
//! use sinkloss::{transport_cost, sinkhorn_divergence};
//! use ndarray::array;
//!
//! let real = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
//! let fake = array![[0.1, 0.0], [0.9, 0.2], [0.2, 1.1]];
//!
//! let w = transport_cost(&real, &fake, 0.5, 10).unwrap();
//! let s = sinkhorn_divergence(&real, &fake, 0.5, 10).unwrap();
//! assert!(w >= 0.0 && s >= 0.0);
//! ```
//!
//! ## What Can Go Wrong
//!
//! 1. **Kernel underflow**: far-apart points under a small ε give
//!    \(K_{ij} \approx 0\). The division floor keeps every round finite, but those
//!    pairs contribute almost nothing, so the cost can read near zero for batches
//!    that are in fact far apart. Scale the data or raise ε.
//! 2. **No convergence check by default**: [`transport_cost`] always runs exactly
//!    the requested rounds. `iterations == 0` returns \(\sum K \odot C\), which is
//!    not an approximation of anything.
//! 3. **Unequal batch sizes**: every point carries unit mass, so with `m != n`
//!    the marginals cannot both hold and the iteration oscillates instead of
//!    converging. Use equal batches, or [`weighted_transport_cost`] with
//!    balanced masses.
//!
//! ## References
//!
//! - Cuturi (2013). "Sinkhorn Distances: Lightspeed Computation of Optimal Transport"
//! - Genevay, Peyré, Cuturi (2018). "Learning Generative Models with Sinkhorn Divergences"
//! - Feydy et al. (2018). "Interpolating between Optimal Transport and MMD using Sinkhorn Divergences"

use ndarray::{Array1, Array2};
use thiserror::Error;

pub mod config;
pub mod cost;
pub mod scaling;

pub use config::SinkhornConfig;
pub use cost::{affinity_kernel, point_set, squared_euclidean_cost_matrix};
pub use scaling::ScalingVectors;

/// Entropic transport error variants.
#[derive(Debug, Error)]
pub enum Error {
    /// A point set has no points.
    #[error("point set `{0}` is empty")]
    EmptyPointSet(&'static str),

    /// Points have different feature dimensions.
    #[error("point dimensions differ: {0} vs {1}")]
    DimensionMismatch(usize, usize),

    /// Mass weights do not match the number of points.
    #[error("weights length mismatch: {0} points vs {1} weights")]
    LengthMismatch(usize, usize),

    /// Invalid kernel temperature.
    #[error("regularization parameter must be positive and finite, got {0}")]
    InvalidRegularization(f64),

    /// Invalid division floor.
    #[error("division floor must be positive and finite, got {0}")]
    InvalidFloor(f64),

    /// Invalid convergence tolerance.
    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    /// Sinkhorn did not reach the tolerance within the iteration limit.
    #[error("Sinkhorn did not converge in {0} iterations")]
    SinkhornNotConverged(usize),

    /// Domain error (invalid inputs for the mathematical definition).
    #[error("{0}")]
    Domain(&'static str),
}

/// Result type for entropic transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Added to every row/column sum before it is inverted.
pub const DIVISION_FLOOR: f64 = 1e-12;

/// Everything a solve produces, before it is reduced to a scalar.
#[derive(Debug, Clone)]
pub struct SinkhornSolution {
    /// Pairwise squared distances (m × n).
    pub cost: Array2<f64>,
    /// exp(-cost / ε) (m × n).
    pub kernel: Array2<f64>,
    /// Final scaling factors.
    pub scaling: ScalingVectors,
    /// Rounds actually run.
    pub iterations: usize,
}

impl SinkhornSolution {
    /// Σ_ij K_ij C_ij u_i v_j.
    pub fn transport_cost(&self) -> f64 {
        self.scaling.contract(&self.kernel, &self.cost)
    }

    /// P = diag(u) K diag(v).
    pub fn plan(&self) -> Array2<f64> {
        self.scaling.plan(&self.kernel)
    }
}

/// Entropic transport solver bound to a validated [`SinkhornConfig`].
///
/// # Example
///
/// ```rust
/// use sinkloss::{EntropicTransport, SinkhornConfig};
/// use ndarray::array;
///
/// let solver = EntropicTransport::new(SinkhornConfig::new(0.5, 50)).unwrap();
/// let a = array![[0.0, 0.0], [1.0, 1.0]];
/// let b = array![[0.0, 0.5], [1.0, 0.5]];
/// let cost = solver.cost(&a, &b).unwrap();
/// assert!(cost > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EntropicTransport {
    config: SinkhornConfig,
}

impl EntropicTransport {
    /// Validate `config` once and keep it for every solve.
    pub fn new(config: SinkhornConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SinkhornConfig {
        &self.config
    }

    /// Solve with unit mass on every point.
    pub fn solve(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<SinkhornSolution> {
        let a_mass = Array1::ones(a.nrows());
        let b_mass = Array1::ones(b.nrows());
        self.solve_inner(a, &a_mass, b, &b_mass)
    }

    /// Solve with explicit per-point masses.
    pub fn solve_weighted(
        &self,
        a: &Array2<f64>,
        a_weights: &Array1<f64>,
        b: &Array2<f64>,
        b_weights: &Array1<f64>,
    ) -> Result<SinkhornSolution> {
        check_weights(a, a_weights, "a")?;
        check_weights(b, b_weights, "b")?;
        self.solve_inner(a, a_weights, b, b_weights)
    }

    /// Scalar transport cost with unit masses.
    pub fn cost(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
        Ok(self.solve(a, b)?.transport_cost())
    }

    /// Transport plan (m × n) with unit masses.
    pub fn plan(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(self.solve(a, b)?.plan())
    }

    /// Debiased cost: W(a,b) - ½ (W(a,a) + W(b,b)), clamped at zero.
    ///
    /// Exactly zero when `a` and `b` are the same batch in the same order.
    pub fn divergence(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
        let ab = self.cost(a, b)?;
        let aa = self.cost(a, a)?;
        let bb = self.cost(b, b)?;

        // In exact arithmetic this is >= 0 at convergence, but allow tiny negative drift.
        Ok((ab - 0.5 * (aa + bb)).max(0.0))
    }

    fn solve_inner(
        &self,
        a: &Array2<f64>,
        a_mass: &Array1<f64>,
        b: &Array2<f64>,
        b_mass: &Array1<f64>,
    ) -> Result<SinkhornSolution> {
        let SinkhornConfig {
            epsilon,
            iterations,
            floor,
            tolerance,
        } = self.config;

        let cost = squared_euclidean_cost_matrix(a, b)?;
        let kernel = affinity_kernel(&cost, epsilon)?;
        let (m, n) = cost.dim();
        log::debug!(
            "sinkhorn: {}x{} points, epsilon={}, rounds={}, tolerance={:?}",
            m,
            n,
            epsilon,
            iterations,
            tolerance
        );

        let mut scaling = ScalingVectors::ones(m, n);
        let rounds = match tolerance {
            None => {
                for _ in 0..iterations {
                    scaling.step(&kernel, a_mass, b_mass, floor);
                }
                iterations
            }
            Some(tol) => {
                let mut converged_at = None;
                for iter in 0..iterations {
                    scaling.step(&kernel, a_mass, b_mass, floor);
                    let err = scaling.row_marginal_error(&kernel, a_mass);
                    log::trace!("sinkhorn round {}: row marginal error {:e}", iter + 1, err);
                    if err < tol {
                        converged_at = Some(iter + 1);
                        break;
                    }
                }
                converged_at.ok_or(Error::SinkhornNotConverged(iterations))?
            }
        };

        Ok(SinkhornSolution {
            cost,
            kernel,
            scaling,
            iterations: rounds,
        })
    }
}

fn check_weights(points: &Array2<f64>, weights: &Array1<f64>, side: &'static str) -> Result<()> {
    cost::check_points(points, side)?;
    if weights.len() != points.nrows() {
        return Err(Error::LengthMismatch(points.nrows(), weights.len()));
    }
    if weights.iter().any(|&w| w < 0.0 || !w.is_finite()) {
        return Err(Error::Domain("weights must be nonnegative and finite"));
    }
    if weights.sum() <= 0.0 {
        return Err(Error::Domain("weights must have positive total mass"));
    }
    Ok(())
}

/// Entropic transport cost between two point clouds.
///
/// Builds \(C_{ij} = \|a_i - b_j\|^2\) and \(K = \exp(-C/\varepsilon)\), starts
/// from \(u = \mathbf{1}_m, v = \mathbf{1}_n\), runs exactly `iterations` rounds of
///
/// u_i = 1 / (Σ_j K_ij v_j + δ),  v_j = 1 / (Σ_i K_ij u_i + δ)
///
/// with δ = [`DIVISION_FLOOR`], and returns Σ_ij K_ij C_ij u_i v_j.
///
/// # Arguments
///
/// * `a` - Source points (m × d), m ≥ 1
/// * `b` - Target points (n × d), n ≥ 1, same d
/// * `epsilon` - Kernel temperature ε > 0 (smaller = closer to exact, less stable)
/// * `iterations` - Number of scaling rounds L; no early exit
///
/// # Returns
///
/// A finite, non-negative scalar. Bit-for-bit reproducible for identical inputs.
///
/// # Complexity
///
/// O(m × n × (d + iterations))
///
/// # Example
///
/// ```rust
/// use sinkloss::transport_cost;
/// use ndarray::array;
///
/// let a = array![[0.0, 0.0]];
/// let cost = transport_cost(&a, &a, 0.5, 10).unwrap();
/// assert_eq!(cost, 0.0);
/// ```
pub fn transport_cost(
    a: &Array2<f64>,
    b: &Array2<f64>,
    epsilon: f64,
    iterations: usize,
) -> Result<f64> {
    EntropicTransport::new(SinkhornConfig::new(epsilon, iterations))?.cost(a, b)
}

/// [`transport_cost`] with per-point masses.
///
/// Rounds become u_i = wa_i / ((K v)_i + δ), v_j = wb_j / ((Kᵀ u)_j + δ).
/// All-ones weights give exactly the unweighted result. A zero weight removes
/// that point from the plan.
pub fn weighted_transport_cost(
    a: &Array2<f64>,
    a_weights: &Array1<f64>,
    b: &Array2<f64>,
    b_weights: &Array1<f64>,
    epsilon: f64,
    iterations: usize,
) -> Result<f64> {
    EntropicTransport::new(SinkhornConfig::new(epsilon, iterations))?
        .solve_weighted(a, a_weights, b, b_weights)
        .map(|s| s.transport_cost())
}

/// Transport plan (m × n) after `iterations` rounds.
///
/// The plan's inner product with the squared-distance matrix is [`transport_cost`].
pub fn transport_plan(
    a: &Array2<f64>,
    b: &Array2<f64>,
    epsilon: f64,
    iterations: usize,
) -> Result<Array2<f64>> {
    EntropicTransport::new(SinkhornConfig::new(epsilon, iterations))?.plan(a, b)
}

/// Transport cost with a convergence check on the row marginals.
///
/// Returns `(cost, rounds)` as soon as max_i |u_i (K v)_i - 1| < `tol`, or
/// [`Error::SinkhornNotConverged`] after `max_iter` rounds. The cost equals
/// `transport_cost(a, b, epsilon, rounds)`. `max_iter == 0` is rejected as
/// [`Error::Domain`], since no round could ever be checked.
pub fn transport_cost_with_convergence(
    a: &Array2<f64>,
    b: &Array2<f64>,
    epsilon: f64,
    max_iter: usize,
    tol: f64,
) -> Result<(f64, usize)> {
    let cfg = SinkhornConfig::new(epsilon, max_iter).with_tolerance(tol);
    let solution = EntropicTransport::new(cfg)?.solve(a, b)?;
    Ok((solution.transport_cost(), solution.iterations))
}

/// Sinkhorn divergence between two batches.
///
/// Formula: S_ε(a, b) = W_ε(a, b) - 1/2 * (W_ε(a, a) + W_ε(b, b))
///
/// The self-costs remove the entropic bias, so identical batches score exactly
/// zero. Each term is a [`transport_cost`] with the same `epsilon` and
/// `iterations`.
///
/// # Warning
///
/// Unit masses only balance when both batches have the same size.
pub fn sinkhorn_divergence(
    a: &Array2<f64>,
    b: &Array2<f64>,
    epsilon: f64,
    iterations: usize,
) -> Result<f64> {
    EntropicTransport::new(SinkhornConfig::new(epsilon, iterations))?.divergence(a, b)
}
