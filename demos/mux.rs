//! 2:1 multiplexer as an energy landscape.
//!
//! A six-unit circuit whose Hamiltonian encodes the truth table of a 2:1
//! MUX: low-energy configurations correspond to consistent
//! (input, select, output) assignments. Running the relaxation solver and
//! histogramming the visited states shows the valid rows dominating.
//!
//! Run with: `cargo run --example mux`

use std::collections::BTreeMap;

use ndarray::array;
use pbitnet::{CircuitBuilder, RelaxationSolver, Solver, SolverParams};

const STEPS: usize = 25_000;

fn main() {
    pbitnet::init_logging("info");

    let circuit = CircuitBuilder::new("mux", 6)
        .coupling(array![
            [0.0, 1.0, 0.0, 0.0, 2.0, 0.0],
            [1.0, 0.0, -1.0, 2.0, -2.0, 0.0],
            [0.0, -1.0, 0.0, 2.0, 0.0, 0.0],
            [0.0, 2.0, 2.0, 0.0, -1.0, 2.0],
            [2.0, -2.0, 0.0, -1.0, 0.0, 2.0],
            [0.0, 0.0, 0.0, 2.0, 2.0, 0.0]
        ])
        .bias(array![1.0, 0.0, 1.0, -3.0, -3.0, 2.0])
        .ports(["in_a", "in_b", "sel", "aux0", "aux1", "out"])
        .build()
        .expect("valid MUX circuit");

    let params = SolverParams::new(STEPS, 0.1667, 0.9, 0.0)
        .expect("valid solver parameters")
        .with_seed(7);
    let mut solver = RelaxationSolver::new(params).expect("valid solver");

    let trajectory = solver.solve(&circuit);

    // Histogram of full 6-bit configurations over the run.
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in trajectory.states().rows() {
        let key: String = row
            .iter()
            .map(|&m| if m > 0.0 { '1' } else { '0' })
            .collect();
        *counts.entry(key).or_default() += 1;
    }

    println!("top configurations over {STEPS} steps (in_a in_b sel aux0 aux1 out):");
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    for (config, count) in ranked.iter().take(10) {
        let bar = "#".repeat(count * 60 / STEPS);
        println!("  {config}  {count:>6}  {bar}");
    }

    if let Some(stats) = solver.last_run() {
        println!(
            "\nmin energy {:.3}, final energy {:.3}, {:.0} steps/s",
            stats.min_energy,
            stats.final_energy,
            stats.steps_per_second()
        );
    }
}
