//! Solver contract and hyperparameters.
//!
//! A solver time-steps a network's spin state and returns a
//! [`Trajectory`]. Solvers depend only on the [`Network`] capability
//! trait, never on circuit or module internals.

pub mod relaxation;

pub use relaxation::RelaxationSolver;

use serde::{Deserialize, Serialize};

use crate::circuit::Network;
use crate::error::{Error, Result};
use crate::trajectory::Trajectory;

/// Hyperparameters shared by all solvers.
///
/// All fields are required; construction validates them eagerly, so a
/// solver never starts with an out-of-range configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverParams {
    /// Number of discrete time steps (`Nt`), must be positive
    pub steps: usize,

    /// Integration time increment, must be positive and finite
    pub dt: f64,

    /// Current gain; acts as an inverse-temperature-like scaling on
    /// currents and energies. Must be finite.
    pub i0: f64,

    /// Target long-run mean activation in the open interval (-1, 1);
    /// its `atanh` becomes the per-run bias threshold.
    pub expected_mean: f64,

    /// Seed for the random generator. A fixed seed makes runs
    /// bit-identical; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SolverParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if any field is out of range.
    pub fn new(steps: usize, dt: f64, i0: f64, expected_mean: f64) -> Result<Self> {
        let params = Self {
            steps,
            dt,
            i0,
            expected_mean,
            seed: None,
        };
        params.validate()?;
        Ok(params)
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks all fields against their ranges.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(Error::InvalidParameter(
                "steps must be positive".to_string(),
            ));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !self.i0.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "i0 must be finite, got {}",
                self.i0
            )));
        }
        if !(self.expected_mean.is_finite() && self.expected_mean.abs() < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "expected_mean must lie in the open interval (-1, 1), got {}",
                self.expected_mean
            )));
        }
        Ok(())
    }
}

/// The operation every solver implements.
pub trait Solver {
    /// Runs the configured number of time steps on `network` and returns
    /// the current, state, and energy trajectories.
    fn solve(&mut self, network: &dyn Network) -> Trajectory;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        let params = SolverParams::new(1000, 0.1667, 0.9, 0.0).unwrap();
        assert_eq!(params.steps, 1000);
        assert!(params.seed.is_none());
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(SolverParams::new(0, 0.1, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_nonpositive_dt_rejected() {
        assert!(SolverParams::new(10, 0.0, 1.0, 0.0).is_err());
        assert!(SolverParams::new(10, -0.5, 1.0, 0.0).is_err());
        assert!(SolverParams::new(10, f64::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_expected_mean_open_interval() {
        assert!(SolverParams::new(10, 0.1, 1.0, 1.0).is_err());
        assert!(SolverParams::new(10, 0.1, 1.0, -1.0).is_err());
        assert!(SolverParams::new(10, 0.1, 1.0, 0.999).is_ok());
    }

    #[test]
    fn test_params_serde_roundtrip() {
        let params = SolverParams::new(25, 0.1, 0.9, 0.2).unwrap().with_seed(7);
        let json = serde_json::to_string(&params).unwrap();
        let restored: SolverParams = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.steps, 25);
        assert_eq!(restored.seed, Some(7));
    }
}
