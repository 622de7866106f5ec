//! Trajectory outputs of a simulation run.
//!
//! A [`Trajectory`] holds the three time-indexed collections produced by a
//! solve call: per-step input currents, per-step spin states, and the
//! energy sequence. It also provides the accessors downstream consumers
//! (e.g., histogram plotting of one state column) rely on, plus JSON/CSV
//! export.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;
use crate::types::UnitIndex;

/// Time-indexed outputs of a single solve call.
///
/// All three collections are created fresh per run and are not retained
/// by the solver afterward. `currents` and `states` are `steps x units`;
/// every entry of `states` is exactly `+1.0` or `-1.0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryRepr")]
pub struct Trajectory {
    currents: Array2<f64>,
    states: Array2<f64>,
    energies: Vec<f64>,
}

/// Wire form of [`Trajectory`].
///
/// Deserialization re-validates what a solve call guarantees by
/// construction: the three collections agree in step count and every
/// state entry is exactly ±1.
#[derive(Deserialize)]
struct TrajectoryRepr {
    currents: Array2<f64>,
    states: Array2<f64>,
    energies: Vec<f64>,
}

impl TryFrom<TrajectoryRepr> for Trajectory {
    type Error = Error;

    fn try_from(repr: TrajectoryRepr) -> Result<Self, Error> {
        if repr.currents.shape() != repr.states.shape()
            || repr.energies.len() != repr.states.nrows()
        {
            return Err(Error::ShapeMismatch {
                expected: format!(
                    "{rows}x{cols} currents, {rows}x{cols} states, {rows} energies",
                    rows = repr.states.nrows(),
                    cols = repr.states.ncols()
                ),
                found: format!(
                    "{}x{} currents, {}x{} states, {} energies",
                    repr.currents.nrows(),
                    repr.currents.ncols(),
                    repr.states.nrows(),
                    repr.states.ncols(),
                    repr.energies.len()
                ),
            });
        }
        if let Some(bad) = repr.states.iter().find(|&&m| m != 1.0 && m != -1.0) {
            return Err(Error::InvalidParameter(format!(
                "state entries must be +1 or -1, got {bad}"
            )));
        }
        Ok(Self {
            currents: repr.currents,
            states: repr.states,
            energies: repr.energies,
        })
    }
}

impl Trajectory {
    /// Assembles a trajectory from its parts.
    ///
    /// # Panics
    /// Panics if the row counts of `currents`, `states`, and the length
    /// of `energies` disagree. Solvers construct these together, so a
    /// disagreement is a programming error.
    pub fn new(currents: Array2<f64>, states: Array2<f64>, energies: Vec<f64>) -> Self {
        assert_eq!(currents.nrows(), states.nrows());
        assert_eq!(currents.nrows(), energies.len());
        Self {
            currents,
            states,
            energies,
        }
    }

    /// Number of recorded time steps.
    pub fn steps(&self) -> usize {
        self.energies.len()
    }

    /// Number of units.
    pub fn units(&self) -> usize {
        self.states.ncols()
    }

    /// The `steps x units` input-current history.
    pub fn currents(&self) -> &Array2<f64> {
        &self.currents
    }

    /// The `steps x units` spin-state history (entries are ±1).
    pub fn states(&self) -> &Array2<f64> {
        &self.states
    }

    /// The per-step energy sequence.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// The state history of one unit across all steps.
    pub fn state_column(&self, unit: UnitIndex) -> ArrayView1<'_, f64> {
        self.states.column(unit)
    }

    /// The spin vector after the last step.
    pub fn final_states(&self) -> ArrayView1<'_, f64> {
        self.states.row(self.states.nrows() - 1)
    }

    /// The final-step energy.
    pub fn final_energy(&self) -> f64 {
        *self.energies.last().expect("trajectory has at least one step")
    }

    /// The lowest energy reached during the run.
    pub fn min_energy(&self) -> f64 {
        self.energies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Fraction of steps on which two units held the same sign.
    pub fn alignment_fraction(&self, a: UnitIndex, b: UnitIndex) -> f64 {
        let col_a = self.states.column(a);
        let col_b = self.states.column(b);
        let aligned = col_a
            .iter()
            .zip(col_b.iter())
            .filter(|(x, y)| x == y)
            .count();
        aligned as f64 / self.steps() as f64
    }

    /// Per-unit mean state over the run (the empirical magnetization).
    pub fn mean_states(&self) -> Array1<f64> {
        self.states.mean_axis(ndarray::Axis(0)).unwrap_or_default()
    }

    /// Exports the trajectory to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the trajectory to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Exports the state history to CSV, one row per step.
    pub fn states_to_csv(&self) -> String {
        let mut csv = String::new();
        let header: Vec<String> = (0..self.units()).map(|i| format!("m{i}")).collect();
        csv.push_str(&header.join(","));
        csv.push('\n');
        for row in self.states.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }

    /// Exports the energy sequence to CSV.
    pub fn energies_to_csv(&self) -> String {
        let mut csv = String::from("step,energy\n");
        for (step, energy) in self.energies.iter().enumerate() {
            csv.push_str(&format!("{step},{energy}\n"));
        }
        csv
    }

    /// Writes the state history CSV to a file.
    pub fn states_to_csv_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.states_to_csv())
    }

    /// Writes the energy CSV to a file.
    pub fn energies_to_csv_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.energies_to_csv())
    }
}
