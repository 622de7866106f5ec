//! Core type definitions for the p-bit network crate.
//!
//! This module defines the fundamental types shared across the circuit
//! model, the composition layer, and the solvers.

use std::collections::BTreeMap;

/// Index of a unit (p-bit) within a circuit or a synthesized network.
///
/// Within a single circuit, unit indices are local and equal the position
/// of the unit's row/column in that circuit's coupling matrix. After module
/// synthesis, indices are global across all registered circuits.
pub type UnitIndex = usize;

/// Coupling weight or bias value.
pub type Weight = f64;

/// Discrete time step counter of a simulation run.
pub type Step = usize;

/// Sparse coupling matrix: unit index to a map of neighbor index to weight.
///
/// Only nonzero entries are stored. `BTreeMap` keeps iteration order
/// deterministic, which matters for reproducible export and testing.
pub type SparseCoupling = BTreeMap<UnitIndex, BTreeMap<UnitIndex, Weight>>;

/// Sparse bias vector: unit index to bias, nonzero entries only.
pub type SparseBias = BTreeMap<UnitIndex, Weight>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_aliases() {
        let unit: UnitIndex = 3;
        let weight: Weight = -1.5;
        let step: Step = 100;

        let mut sparse: SparseCoupling = SparseCoupling::new();
        sparse.entry(unit).or_default().insert(0, weight);

        assert_eq!(unit, 3);
        assert_eq!(weight, -1.5);
        assert_eq!(step, 100);
        assert_eq!(sparse[&3][&0], -1.5);
    }
}
