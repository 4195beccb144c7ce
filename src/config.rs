//! Solver configuration.

use crate::{Error, Result, DIVISION_FLOOR};

/// Configuration for entropic transport cost evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SinkhornConfig {
    /// Kernel temperature ε. Smaller is sharper (closer to exact OT) but less stable.
    pub epsilon: f64,
    /// Number of scaling rounds. With no tolerance, exactly this many are run.
    pub iterations: usize,
    /// Added to every row/column sum before inversion.
    pub floor: f64,
    /// Stop once the row-marginal error drops below this. `None` runs the fixed budget.
    pub tolerance: Option<f64>,
}

impl Default for SinkhornConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            iterations: 10,
            floor: DIVISION_FLOOR,
            tolerance: None,
        }
    }
}

impl SinkhornConfig {
    /// Fixed-round configuration with the default division floor.
    pub fn new(epsilon: f64, iterations: usize) -> Self {
        Self {
            epsilon,
            iterations,
            ..Default::default()
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Turn on early stopping; `iterations` becomes the cap.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Check parameter domains.
    pub fn validate(&self) -> Result<()> {
        if self.epsilon <= 0.0 || !self.epsilon.is_finite() {
            return Err(Error::InvalidRegularization(self.epsilon));
        }
        if self.floor <= 0.0 || !self.floor.is_finite() {
            return Err(Error::InvalidFloor(self.floor));
        }
        if let Some(tol) = self.tolerance {
            if tol <= 0.0 || !tol.is_finite() {
                return Err(Error::InvalidTolerance(tol));
            }
            if self.iterations == 0 {
                return Err(Error::Domain("convergence check needs at least one round"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sane() {
        let cfg = SinkhornConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.floor, 1e-12);
        assert!(cfg.tolerance.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = SinkhornConfig::new(0.1, 50)
            .with_floor(1e-9)
            .with_tolerance(1e-6)
            .with_iterations(200);
        assert_eq!(cfg.epsilon, 0.1);
        assert_eq!(cfg.iterations, 200);
        assert_eq!(cfg.floor, 1e-9);
        assert_eq!(cfg.tolerance, Some(1e-6));
    }

    #[test]
    fn rejects_out_of_domain() {
        assert!(matches!(
            SinkhornConfig::new(0.0, 10).validate(),
            Err(Error::InvalidRegularization(_))
        ));
        assert!(matches!(
            SinkhornConfig::new(-0.5, 10).validate(),
            Err(Error::InvalidRegularization(_))
        ));
        assert!(matches!(
            SinkhornConfig::default().with_floor(0.0).validate(),
            Err(Error::InvalidFloor(_))
        ));
        assert!(matches!(
            SinkhornConfig::default().with_tolerance(f64::NAN).validate(),
            Err(Error::InvalidTolerance(_))
        ));
    }

    #[test]
    fn tolerance_with_zero_rounds_is_rejected() {
        assert!(matches!(
            SinkhornConfig::new(0.5, 0).with_tolerance(1e-6).validate(),
            Err(Error::Domain(_))
        ));
        assert!(SinkhornConfig::new(0.5, 0).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reads_from_json() {
        let cfg: SinkhornConfig = serde_json::from_str(
            r#"{"epsilon": 0.05, "iterations": 100, "floor": 1e-12, "tolerance": null}"#,
        )
        .unwrap();
        assert_eq!(cfg, SinkhornConfig::new(0.05, 100));
    }
}
