//! Run statistics and timing.
//!
//! Solvers record a [`RunStats`] per solve call: size of the problem,
//! wall-clock time, flip and saturation counters, and the energies
//! reached. Export goes through JSON like the rest of the crate.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Statistics for a single solve call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of units in the solved network
    pub units: usize,

    /// Number of time steps executed
    pub steps: usize,

    /// Wall-clock duration of the run in milliseconds
    pub wall_time_ms: f64,

    /// Total spin flips across all units and steps
    pub flips: u64,

    /// Activation evaluations that saturated to exactly 0 or 1.
    ///
    /// Saturation is a documented limit behavior of the double
    /// exponential, not an error; the counter exists for diagnostics.
    pub saturations: u64,

    /// Energy after the final step
    pub final_energy: f64,

    /// Lowest energy reached during the run
    pub min_energy: f64,
}

impl RunStats {
    /// Steps simulated per wall-clock second.
    pub fn steps_per_second(&self) -> f64 {
        if self.wall_time_ms > 0.0 {
            self.steps as f64 / (self.wall_time_ms / 1000.0)
        } else {
            0.0
        }
    }

    /// Mean flips per step across the whole run.
    pub fn flips_per_step(&self) -> f64 {
        if self.steps > 0 {
            self.flips as f64 / self.steps as f64
        } else {
            0.0
        }
    }

    /// Exports the statistics to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the statistics to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// A simple timer for measuring wall-clock time.
#[derive(Debug)]
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Returns elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = RunStats {
            units: 4,
            steps: 1000,
            wall_time_ms: 500.0,
            flips: 2500,
            ..Default::default()
        };
        assert_eq!(stats.steps_per_second(), 2000.0);
        assert_eq!(stats.flips_per_step(), 2.5);
    }

    #[test]
    fn test_zero_guards() {
        let stats = RunStats::default();
        assert_eq!(stats.steps_per_second(), 0.0);
        assert_eq!(stats.flips_per_step(), 0.0);
    }

    #[test]
    fn test_json_export() {
        let stats = RunStats {
            units: 2,
            steps: 100,
            final_energy: -1.5,
            ..Default::default()
        };
        let json = stats.to_json().unwrap();
        assert!(json.contains("-1.5"));
        assert!(json.contains("\"steps\": 100"));
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10.0);
    }
}
