//! # pbitnet
//!
//! Modeling and stochastic simulation of probabilistic-bit (p-bit)
//! networks: collections of binary ±1 units coupled through a symmetric
//! weight matrix `J` and biased by a vector `h`, relaxing toward
//! low-energy Ising configurations. Energy minima can encode the truth
//! tables of logic gates, which makes the same machinery usable for
//! combinatorial and probabilistic-logic problems.
//!
//! ## Design Principles
//!
//! - **Explicit construction**: circuits are built through validated
//!   constructors and builders; shapes and port counts are checked
//!   eagerly, never patched up silently.
//! - **Block composition**: a [`module::ModuleContext`] registers
//!   sub-circuits at running offsets and synthesizes one global `(J, h)`
//!   in dense or sparse form; cross-circuit coupling exists only where a
//!   symmetric `connect` was declared.
//! - **Capability seam**: solvers consume any [`circuit::Network`]
//!   implementor; they never look at ports or module internals.
//! - **Reproducibility**: the relaxation solver draws from a seedable
//!   ChaCha generator in a fixed unit order, so a fixed seed replays a
//!   run bit-identically.
//!
//! ## Features
//!
//! - `parallel` - Parallelize the per-step current computation using rayon
//!   (results are identical; the stochastic draws stay sequential)
//!
//! ## Quick Start
//!
//! ```rust
//! use pbitnet::circuit::Circuit;
//! use pbitnet::solver::{RelaxationSolver, Solver, SolverParams};
//!
//! // A ferromagnetic pair: positive coupling favors aligned spins.
//! let mut circuit = Circuit::new("pair", 2).unwrap();
//! circuit.couple(0, 1, 1.0).unwrap();
//!
//! let params = SolverParams::new(1000, 0.1667, 0.9, 0.0)
//!     .unwrap()
//!     .with_seed(42);
//! let mut solver = RelaxationSolver::new(params).unwrap();
//!
//! let trajectory = solver.solve(&circuit);
//! println!("final energy: {}", trajectory.final_energy());
//! ```
//!
//! ## Configuration-Driven Setup
//!
//! ```rust,ignore
//! use pbitnet::config::SimConfig;
//!
//! let config = SimConfig::from_yaml_file("experiment.yaml")?;
//! let module = config.build_module()?;
//! let circuit = module.as_circuit("experiment")?;
//! let trajectory = config.build_solver()?.solve(&circuit);
//! ```

pub mod types;
pub mod error;
pub mod port;
pub mod circuit;
pub mod module;
pub mod solver;
pub mod trajectory;
pub mod stats;
pub mod config;

// Re-export commonly used types
pub use types::{SparseBias, SparseCoupling, Step, UnitIndex, Weight};
pub use error::{Error, Result};
pub use port::Port;
pub use circuit::{Circuit, CircuitBuilder, Network};
pub use module::{ModuleContext, Synthesis};
pub use solver::{RelaxationSolver, Solver, SolverParams};
pub use trajectory::Trajectory;
pub use stats::{RunStats, Timer};
pub use config::{ConfigError, SimConfig, SimConfigBuilder};

/// Initialize the tracing subscriber for logging.
///
/// Call this at the start of your program to enable logging.
///
/// # Example
///
/// ```rust,ignore
/// pbitnet::init_logging("info");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
