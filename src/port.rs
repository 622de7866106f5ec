//! Port definitions.
//!
//! A port is a named, indexed terminal of a circuit. Ports carry no
//! mutable state of their own; they exist to address a specific unit when
//! composing or connecting circuits.

use serde::{Deserialize, Serialize};

use crate::types::UnitIndex;

/// A named terminal of a circuit.
///
/// The index equals the position of the corresponding row/column in the
/// owning circuit's coupling matrix and bias vector, and is unique within
/// that circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Name of the port (e.g., "input1", "sel", "out")
    pub name: String,
    /// Index of the unit this port addresses
    pub index: UnitIndex,
}

impl Port {
    /// Creates a new `Port` with the given name and unit index.
    pub fn new(name: impl Into<String>, index: UnitIndex) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_creation() {
        let port = Port::new("input1", 0);
        assert_eq!(port.name, "input1");
        assert_eq!(port.index, 0);
    }

    #[test]
    fn test_port_serialization() {
        let port = Port::new("out", 5);
        let json = serde_json::to_string(&port).unwrap();
        let restored: Port = serde_json::from_str(&json).unwrap();
        assert_eq!(port, restored);
    }
}
