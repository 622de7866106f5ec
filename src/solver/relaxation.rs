//! Stochastic relaxation solver for p-bit networks.
//!
//! Implements the continuous-time p-bit update rule of Camsari, Sutton,
//! and Datta ("p-bits for probabilistic spin logic", Appl. Phys. Rev. 6,
//! 011305, 2019): per step, every unit's input current is computed
//! synchronously from the pre-step spin vector, a stochastic survival
//! value
//!
//! ```text
//! s_i = exp(-dt * exp(-m_i * (I_i + atanh(expected_mean))))
//! ```
//!
//! decides whether the unit keeps its sign, and the scaled Ising energy
//! of the post-update state is recorded.
//!
//! The double exponential is deliberate. It is not a logistic sigmoid and
//! must not be replaced by one: its saturation shape at extreme arguments
//! differs, which affects convergence. At floating-point limits the inner
//! `exp` over/underflows and the outer `exp` saturates `s_i` to exactly
//! `0.0` or `1.0`; both are well-defined boundary values, never NaN, and
//! never abort a run. Saturations are counted and reported through
//! [`RunStats`].

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::circuit::Network;
use crate::error::Result;
use crate::solver::{Solver, SolverParams};
use crate::stats::{RunStats, Timer};
use crate::trajectory::Trajectory;

/// The concrete stochastic relaxation solver.
///
/// Randomness is the only mutable state carried across a run: a seedable
/// ChaCha generator advanced exactly `units` times at initialization and
/// `units` times per step, in unit-index order, so a fixed seed replays a
/// run bit-identically.
///
/// # Example
///
/// ```
/// use pbitnet::circuit::Circuit;
/// use pbitnet::solver::{RelaxationSolver, Solver, SolverParams};
///
/// let mut c = Circuit::new("pair", 2).unwrap();
/// c.couple(0, 1, 1.0).unwrap();
///
/// let params = SolverParams::new(100, 0.1667, 0.9, 0.0).unwrap().with_seed(42);
/// let mut solver = RelaxationSolver::new(params).unwrap();
/// let trajectory = solver.solve(&c);
///
/// assert_eq!(trajectory.states().shape(), [100, 2]);
/// ```
pub struct RelaxationSolver {
    params: SolverParams,
    rng: ChaCha8Rng,
    last_run: Option<RunStats>,
}

impl RelaxationSolver {
    /// Creates a solver from validated parameters.
    ///
    /// The generator is seeded from `params.seed` when present, from
    /// entropy otherwise.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidParameter`] if the
    /// parameters fail validation (they may have been deserialized
    /// without going through [`SolverParams::new`]).
    pub fn new(params: SolverParams) -> Result<Self> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            params,
            rng,
            last_run: None,
        })
    }

    /// Returns the solver parameters.
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Reseeds the generator, making the next run replayable.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Statistics of the most recent run, if any.
    pub fn last_run(&self) -> Option<&RunStats> {
        self.last_run.as_ref()
    }

    /// Draws the initial spin vector: per unit, `u ~ U(0,1)` and
    /// `m_i = +1` if `u < 0.5`, else `-1` (a draw of exactly 0.5 breaks
    /// to -1).
    fn initial_states(&mut self, units: usize) -> Array1<f64> {
        let mut m = Array1::zeros(units);
        for i in 0..units {
            let u: f64 = self.rng.gen();
            m[i] = if u < 0.5 { 1.0 } else { -1.0 };
        }
        m
    }

    /// Computes `I = i0 * (J.m + h)` from the pre-step spin vector.
    ///
    /// Data-parallel across units; with the `parallel` feature the rows
    /// are mapped on the rayon pool. Either path produces identical
    /// values, and the stochastic draws stay sequential regardless.
    fn input_currents(
        &self,
        j: &Array2<f64>,
        h: &Array1<f64>,
        m: &Array1<f64>,
    ) -> Array1<f64> {
        #[cfg(feature = "parallel")]
        {
            let i0 = self.params.i0;
            let values: Vec<f64> = (0..h.len())
                .into_par_iter()
                .map(|i| i0 * (j.row(i).dot(m) + h[i]))
                .collect();
            Array1::from_vec(values)
        }
        #[cfg(not(feature = "parallel"))]
        {
            (j.dot(m) + h) * self.params.i0
        }
    }
}

impl Solver for RelaxationSolver {
    fn solve(&mut self, network: &dyn Network) -> Trajectory {
        let n = network.units();
        let steps = self.params.steps;
        let j = network.coupling();
        let h = network.bias();
        let dt = self.params.dt;
        let i0 = self.params.i0;
        let threshold = self.params.expected_mean.atanh();

        info!(units = n, steps, "starting relaxation run");
        let timer = Timer::start();

        let mut currents = Array2::zeros((steps, n));
        let mut states = Array2::zeros((steps, n));
        let mut energies = Vec::with_capacity(steps);

        let mut m = self.initial_states(n);
        let mut flips: u64 = 0;
        let mut saturations: u64 = 0;

        for t in 0..steps {
            // Synchronous current computation from the pre-step snapshot.
            let current = self.input_currents(j, h, &m);

            // Flip decisions read only the unit's own pre-step sign, so
            // updating in place preserves the synchronous semantics. One
            // draw per unit, in index order.
            for i in 0..n {
                let s = (-dt * (-m[i] * (current[i] + threshold)).exp()).exp();
                if s == 0.0 || s == 1.0 {
                    saturations += 1;
                }
                let v: f64 = self.rng.gen();
                // Flip exactly when v > s; a tie keeps the sign.
                if v > s {
                    m[i] = -m[i];
                    flips += 1;
                }
            }

            currents.row_mut(t).assign(&current);
            states.row_mut(t).assign(&m);
            energies.push(i0 * (m.dot(h) + 0.5 * m.dot(&j.dot(&m))));
        }

        let trajectory = Trajectory::new(currents, states, energies);
        let stats = RunStats {
            units: n,
            steps,
            wall_time_ms: timer.elapsed_ms(),
            flips,
            saturations,
            final_energy: trajectory.final_energy(),
            min_energy: trajectory.min_energy(),
        };
        if saturations > 0 {
            debug!(saturations, "activation saturated to a limit value");
        }
        info!(
            final_energy = stats.final_energy,
            min_energy = stats.min_energy,
            flips,
            wall_time_ms = stats.wall_time_ms,
            "relaxation run complete"
        );
        self.last_run = Some(stats);

        trajectory
    }
}
