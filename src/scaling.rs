//! Sinkhorn scaling rounds.
//!
//! One round alternates a row and a column rescaling of a fixed kernel:
//!
//! \[
//! u_i \leftarrow \frac{w^a_i}{(K v)_i + \delta},\quad
//! v_j \leftarrow \frac{w^b_j}{(K^\top u)_j + \delta}
//! \]
//!
//! Each reduction is a sequential dot product over one kernel row (or column),
//! so the `parallel` feature only changes which thread computes it, not the result.

use ndarray::{Array1, Array2, ArrayView2, Zip};

/// Dual scaling factors of the entropic transport problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingVectors {
    /// One factor per source point (length m).
    pub u: Array1<f64>,
    /// One factor per target point (length n).
    pub v: Array1<f64>,
}

impl ScalingVectors {
    /// All-ones start.
    pub fn ones(m: usize, n: usize) -> Self {
        Self {
            u: Array1::ones(m),
            v: Array1::ones(n),
        }
    }

    /// Run one round: rows first, then columns against the fresh `u`.
    pub fn step(
        &mut self,
        kernel: &Array2<f64>,
        a_mass: &Array1<f64>,
        b_mass: &Array1<f64>,
        floor: f64,
    ) {
        debug_assert_eq!(kernel.dim(), (self.u.len(), self.v.len()));
        rescale(kernel.view(), &self.v, a_mass, floor, &mut self.u);
        rescale(kernel.t(), &self.u, b_mass, floor, &mut self.v);
    }

    /// max_i |u_i (K v)_i - w^a_i|.
    ///
    /// Right after a round the column marginals hold up to the floor, so the
    /// row side is the one left to check.
    pub fn row_marginal_error(&self, kernel: &Array2<f64>, a_mass: &Array1<f64>) -> f64 {
        Zip::from(kernel.rows())
            .and(&self.u)
            .and(a_mass)
            .fold(0.0f64, |acc, row, &u, &w| {
                acc.max((u * row.dot(&self.v) - w).abs())
            })
    }

    /// Σ_ij (K_ij C_ij) v_j u_i.
    pub fn contract(&self, kernel: &Array2<f64>, cost: &Array2<f64>) -> f64 {
        let (m, n) = kernel.dim();
        let mut total = 0.0;
        for i in 0..m {
            for j in 0..n {
                total += kernel[[i, j]] * cost[[i, j]] * self.v[j] * self.u[i];
            }
        }
        total
    }

    /// Transport plan P = diag(u) K diag(v).
    pub fn plan(&self, kernel: &Array2<f64>) -> Array2<f64> {
        let (m, n) = kernel.dim();
        let mut plan = Array2::zeros((m, n));
        for i in 0..m {
            for j in 0..n {
                plan[[i, j]] = self.u[i] * kernel[[i, j]] * self.v[j];
            }
        }
        plan
    }
}

/// out_i = mass_i / (⟨kernel_i, other⟩ + floor)
fn rescale(
    kernel: ArrayView2<f64>,
    other: &Array1<f64>,
    mass: &Array1<f64>,
    floor: f64,
    out: &mut Array1<f64>,
) {
    let zip = Zip::from(out).and(kernel.rows()).and(mass);

    #[cfg(feature = "parallel")]
    zip.par_for_each(|o, row, &w| *o = w / (row.dot(other) + floor));

    #[cfg(not(feature = "parallel"))]
    zip.for_each(|o, row, &w| *o = w / (row.dot(other) + floor));
}
