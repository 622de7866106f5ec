//! Error types for circuit construction, composition, and solver setup.
//!
//! Structural errors (shapes, ports, formats) are fail-fast: they surface
//! immediately at construction or synthesis and are never silently
//! corrected. Numeric saturation inside a running solve is *not* an error;
//! see the relaxation solver documentation for the limit behavior.

use thiserror::Error;

/// Errors raised by the circuit model, module composition, and solver
/// parameter validation.
#[derive(Error, Debug)]
pub enum Error {
    /// A coupling matrix or bias vector does not match the declared unit
    /// count.
    #[error("shape mismatch: expected {expected}, got {found}")]
    ShapeMismatch {
        /// The shape required by the unit count, e.g. "6x6" or "6"
        expected: String,
        /// The shape actually supplied
        found: String,
    },

    /// The declared port list does not have exactly one port per unit.
    #[error(
        "circuit '{circuit}' must declare exactly {expected} ports \
         (one per unit), found {} ports: {found:?}",
        found.len()
    )]
    PortCountMismatch {
        /// Name of the offending circuit
        circuit: String,
        /// The unit count the port list must match
        expected: usize,
        /// The port names actually supplied
        found: Vec<String>,
    },

    /// Two ports of the same circuit share a name.
    #[error("duplicate port name '{0}'")]
    DuplicatePort(String),

    /// A port name could not be resolved on the addressed circuit.
    #[error("unknown port '{port}' on circuit instance {instance}")]
    UnknownPort {
        /// Registration index of the addressed instance
        instance: usize,
        /// The port name that failed to resolve
        port: String,
    },

    /// Unsupported synthesis format string.
    #[error("invalid synthesis format '{0}': must be 'sparse' or 'dense'")]
    InvalidFormat(String),

    /// A solver hyperparameter or connection argument is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for circuit and solver operations.
pub type Result<T> = std::result::Result<T, Error>;
