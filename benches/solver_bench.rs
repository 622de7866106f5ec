//! Performance benchmarks for the relaxation solver.
//!
//! Run with: `cargo bench`
//! Or for a specific bench: `cargo bench --bench solver_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pbitnet::{Circuit, RelaxationSolver, Solver, SolverParams};

/// Builds a ring of `n` units with alternating ±1 couplings and small
/// biases, a cheap stand-in for a realistic logic circuit.
fn ring_circuit(n: usize) -> Circuit {
    let mut circuit = Circuit::new("ring", n).unwrap();
    for i in 0..n {
        let next = (i + 1) % n;
        if i != next {
            let w = if i % 2 == 0 { 1.0 } else { -1.0 };
            circuit.couple(i, next, w).unwrap();
        }
        circuit.set_bias_at(i, 0.1 * (i as f64 - n as f64 / 2.0)).unwrap();
    }
    circuit
}

fn solver(steps: usize) -> RelaxationSolver {
    let params = SolverParams::new(steps, 0.1667, 0.9, 0.0)
        .unwrap()
        .with_seed(42);
    RelaxationSolver::new(params).unwrap()
}

fn bench_solve_by_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_by_units");
    for units in [4, 16, 64, 256] {
        let circuit = ring_circuit(units);
        group.throughput(Throughput::Elements(units as u64));
        group.bench_with_input(BenchmarkId::from_parameter(units), &circuit, |b, circuit| {
            b.iter(|| {
                let mut s = solver(100);
                black_box(s.solve(circuit))
            });
        });
    }
    group.finish();
}

fn bench_solve_by_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_by_steps");
    let circuit = ring_circuit(16);
    for steps in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut s = solver(steps);
                black_box(s.solve(&circuit))
            });
        });
    }
    group.finish();
}

fn bench_synthesis(c: &mut Criterion) {
    use pbitnet::ModuleContext;

    c.bench_function("synthesize_dense_8x32", |b| {
        let mut module = ModuleContext::new();
        for _ in 0..8 {
            module.register(ring_circuit(32));
        }
        b.iter(|| black_box(module.synthesize_dense()));
    });

    c.bench_function("synthesize_sparse_8x32", |b| {
        let mut module = ModuleContext::new();
        for _ in 0..8 {
            module.register(ring_circuit(32));
        }
        b.iter(|| black_box(module.synthesize_sparse()));
    });
}

criterion_group!(
    benches,
    bench_solve_by_units,
    bench_solve_by_steps,
    bench_synthesis
);
criterion_main!(benches);
