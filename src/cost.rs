//! Point sets, pairwise costs and the affinity kernel.
//!
//! A point set is an `(m, d)` matrix, one row per point. The ground cost is the
//! squared Euclidean distance (no square root), and the kernel is its Gibbs
//! transform \(K_{ij} = \exp(-C_{ij}/\varepsilon)\).

use crate::{Error, Result};
use ndarray::{Array2, Zip};

/// Build a point set from rows of coordinates.
///
/// Every row must have the same, positive, length.
///
/// ```rust
/// use sinkloss::cost::point_set;
///
/// let pts = point_set(&[vec![0.0, 0.0], vec![1.0, 2.0]]).unwrap();
/// assert_eq!(pts.dim(), (2, 2));
/// ```
pub fn point_set(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let first = rows.first().ok_or(Error::EmptyPointSet("rows"))?;
    let d = first.len();
    if d == 0 {
        return Err(Error::Domain("points must have positive dimension"));
    }

    let mut flat = Vec::with_capacity(rows.len() * d);
    for row in rows {
        if row.len() != d {
            return Err(Error::DimensionMismatch(d, row.len()));
        }
        flat.extend_from_slice(row);
    }

    Array2::from_shape_vec((rows.len(), d), flat)
        .map_err(|_| Error::Domain("point rows do not form a matrix"))
}

/// Reject empty, zero-dimensional or non-finite point sets.
pub(crate) fn check_points(points: &Array2<f64>, side: &'static str) -> Result<()> {
    if points.nrows() == 0 {
        return Err(Error::EmptyPointSet(side));
    }
    if points.ncols() == 0 {
        return Err(Error::Domain("points must have positive dimension"));
    }
    if points.iter().any(|x| !x.is_finite()) {
        return Err(Error::Domain("point coordinates must be finite"));
    }
    Ok(())
}

/// Pairwise squared Euclidean cost matrix.
///
/// C[i,j] = ||x_i - y_j||₂²
///
/// # Arguments
///
/// * `x` - Source points (m × d)
/// * `y` - Target points (n × d)
///
/// # Returns
///
/// Cost matrix (m × n). Symmetric only when `x` and `y` are the same set.
pub fn squared_euclidean_cost_matrix(x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
    check_points(x, "a")?;
    check_points(y, "b")?;

    let m = x.nrows();
    let n = y.nrows();
    let d = x.ncols();
    if y.ncols() != d {
        return Err(Error::DimensionMismatch(d, y.ncols()));
    }

    let mut cost = Array2::zeros((m, n));
    for (mut out, xi) in cost.rows_mut().into_iter().zip(x.rows()) {
        Zip::from(&mut out).and(y.rows()).for_each(|c, yj| {
            *c = Zip::from(&xi).and(&yj).fold(0.0, |acc, &p, &q| {
                let diff = p - q;
                acc + diff * diff
            });
        });
    }

    // Finite coordinates can still square past f64::MAX; exp(-inf) * inf is NaN downstream.
    if cost.iter().any(|c| !c.is_finite()) {
        return Err(Error::Domain("squared distance overflows f64"));
    }

    Ok(cost)
}

/// Gibbs kernel K = exp(-C / ε).
///
/// Entries lie in `(0, 1]` mathematically. For `C / ε` beyond roughly 745 the
/// f64 exponential underflows to exactly zero; the scaling rounds stay finite
/// thanks to the division floor, but those pairs stop carrying any signal.
pub fn affinity_kernel(cost: &Array2<f64>, epsilon: f64) -> Result<Array2<f64>> {
    if epsilon <= 0.0 || !epsilon.is_finite() {
        return Err(Error::InvalidRegularization(epsilon));
    }

    let kernel = cost.mapv(|c| (-c / epsilon).exp());

    let underflowed = kernel.iter().filter(|&&k| k == 0.0).count();
    if underflowed > 0 {
        log::debug!(
            "kernel underflow: {} of {} entries are zero at epsilon={}",
            underflowed,
            kernel.len(),
            epsilon
        );
    }

    Ok(kernel)
}
