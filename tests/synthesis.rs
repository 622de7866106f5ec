//! Integration tests for module composition and synthesis.

use ndarray::array;
use pbitnet::{Circuit, CircuitBuilder, Error, ModuleContext, Network, Synthesis};

fn two_unit() -> Circuit {
    CircuitBuilder::new("two", 2)
        .coupling(array![[0.0, 1.0], [1.0, 0.0]])
        .bias(array![1.0, -1.0])
        .ports(["a", "b"])
        .build()
        .unwrap()
}

fn three_unit() -> Circuit {
    CircuitBuilder::new("three", 3)
        .coupling(array![
            [0.0, -1.0, 2.0],
            [-1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0]
        ])
        .bias(array![0.0, 0.5, 0.0])
        .ports(["x", "y", "z"])
        .build()
        .unwrap()
}

#[test]
fn test_dense_blocks_land_at_offsets() {
    let mut module = ModuleContext::new();
    module.register(two_unit());
    module.register(three_unit());

    let (j, h) = module.synthesize_dense();
    assert_eq!(j.shape(), [5, 5]);
    assert_eq!(h.len(), 5);

    // First circuit's 2x2 block at [0:2, 0:2].
    assert_eq!(j[[0, 1]], 1.0);
    assert_eq!(j[[1, 0]], 1.0);
    assert_eq!(h[0], 1.0);
    assert_eq!(h[1], -1.0);

    // Second circuit's 3x3 block at [2:5, 2:5].
    assert_eq!(j[[2, 3]], -1.0);
    assert_eq!(j[[2, 4]], 2.0);
    assert_eq!(j[[4, 2]], 2.0);
    assert_eq!(h[3], 0.5);

    // Zeros everywhere outside the blocks.
    for row in 0..2 {
        for col in 2..5 {
            assert_eq!(j[[row, col]], 0.0);
            assert_eq!(j[[col, row]], 0.0);
        }
    }
}

#[test]
fn test_sparse_and_dense_encode_identical_values() {
    let mut module = ModuleContext::new();
    let a = module.register(two_unit());
    let b = module.register(three_unit());
    module.connect(a, "b", b, "x", -2.5).unwrap();

    let (dense_j, dense_h) = module.synthesize_dense();
    let (sparse_j, sparse_h) = module.synthesize_sparse();

    for ((row, col), &w) in dense_j.indexed_iter() {
        let sparse_w = sparse_j
            .get(&row)
            .and_then(|neighbors| neighbors.get(&col))
            .copied()
            .unwrap_or(0.0);
        assert_eq!(w, sparse_w, "J[{row}][{col}]");
    }
    for (i, &b) in dense_h.iter().enumerate() {
        assert_eq!(b, sparse_h.get(&i).copied().unwrap_or(0.0), "h[{i}]");
    }

    // Sparse form stores no explicit zeros.
    for neighbors in sparse_j.values() {
        assert!(neighbors.values().all(|&w| w != 0.0));
    }
    assert!(sparse_h.values().all(|&b| b != 0.0));
}

#[test]
fn test_synthesize_by_format_string() {
    let mut module = ModuleContext::new();
    module.register(two_unit());

    match module.synthesize("dense").unwrap() {
        Synthesis::Dense { coupling, bias } => {
            assert_eq!(coupling.shape(), [2, 2]);
            assert_eq!(bias.len(), 2);
        }
        Synthesis::Sparse { .. } => panic!("expected dense"),
    }

    match module.synthesize("sparse").unwrap() {
        Synthesis::Sparse { coupling, .. } => {
            assert_eq!(coupling[&0][&1], 1.0);
        }
        Synthesis::Dense { .. } => panic!("expected sparse"),
    }

    let err = module.synthesize("diagonal").unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(f) if f == "diagonal"));
}

#[test]
fn test_connect_adds_symmetric_offdiagonal_coupling() {
    let mut module = ModuleContext::new();
    let a = module.register(two_unit());
    let b = module.register(three_unit());

    // "b" is global index 1, "z" is global index 4.
    module.connect(a, "b", b, "z", 1.25).unwrap();

    let (j, _) = module.synthesize_dense();
    assert_eq!(j[[1, 4]], 1.25);
    assert_eq!(j[[4, 1]], 1.25);
}

#[test]
fn test_empty_module_synthesizes_empty() {
    let module = ModuleContext::new();
    let (j, h) = module.synthesize_dense();
    assert_eq!(j.shape(), [0, 0]);
    assert_eq!(h.len(), 0);

    let (sparse_j, sparse_h) = module.synthesize_sparse();
    assert!(sparse_j.is_empty());
    assert!(sparse_h.is_empty());
}

#[test]
fn test_registration_order_fixes_offsets() {
    let mut module = ModuleContext::new();
    let first = module.register(three_unit());
    let second = module.register(two_unit());

    assert_eq!(module.offset_of(first), Some(0));
    assert_eq!(module.offset_of(second), Some(3));
    assert_eq!(module.global_port_index(second, "a").unwrap(), 3);
    assert_eq!(module.global_port_index(first, "z").unwrap(), 2);
}

#[test]
fn test_flattened_module_circuit_preserves_matrices() {
    let mut module = ModuleContext::new();
    module.register(two_unit());
    module.register(three_unit());

    let circuit = module.as_circuit("combined").unwrap();
    let (j, h) = module.synthesize_dense();
    assert_eq!(circuit.coupling(), &j);
    assert_eq!(circuit.bias(), &h);
}
