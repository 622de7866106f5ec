//! Two ferromagnetically coupled p-bits.
//!
//! The smallest interesting network: a positive coupling makes aligned
//! states (+1,+1) and (-1,-1) the energy minima, so over a long run the
//! pair spends most of its time aligned. Prints the time spent in each
//! of the four joint states and the alignment fraction.
//!
//! Run with: `cargo run --example coupled_pair`

use pbitnet::{Circuit, RelaxationSolver, Solver, SolverParams};

const STEPS: usize = 10_000;

fn main() {
    pbitnet::init_logging("info");

    let mut circuit = Circuit::new("pair", 2).expect("two units");
    circuit.couple(0, 1, 1.0).expect("valid coupling");

    let params = SolverParams::new(STEPS, 0.1667, 1.5, 0.0)
        .expect("valid solver parameters")
        .with_seed(42);
    let mut solver = RelaxationSolver::new(params).expect("valid solver");

    let trajectory = solver.solve(&circuit);

    let mut counts = [0usize; 4]; // (--, -+, +-, ++)
    for row in trajectory.states().rows() {
        let a = row[0] > 0.0;
        let b = row[1] > 0.0;
        counts[(a as usize) << 1 | b as usize] += 1;
    }

    println!("joint state occupancy over {STEPS} steps:");
    for (label, count) in ["--", "-+", "+-", "++"].iter().zip(counts) {
        let bar = "#".repeat(count * 60 / STEPS);
        println!("  {label}  {count:>6}  {bar}");
    }
    println!(
        "alignment fraction: {:.3}",
        trajectory.alignment_fraction(0, 1)
    );
}
