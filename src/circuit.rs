//! Circuit model: units, coupling matrix, bias vector, ports.
//!
//! A circuit owns a fixed number of p-bit units, an `n x n` coupling
//! matrix `J`, a length-`n` bias vector `h`, and exactly one named port
//! per unit. All shape and port invariants are enforced eagerly at
//! construction time; once a circuit is handed to a solver its matrices
//! are treated as read-only.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::port::Port;
use crate::types::{UnitIndex, Weight};

/// Capability trait for anything the solver or module context can consume.
///
/// A network is any object exposing a unit count, a square coupling
/// matrix, and a bias vector. The solvers depend only on this trait, not
/// on [`Circuit`] or the composition machinery.
pub trait Network {
    /// Number of p-bit units.
    fn units(&self) -> usize;

    /// The `units x units` coupling matrix `J`.
    fn coupling(&self) -> &Array2<f64>;

    /// The length-`units` bias vector `h`.
    fn bias(&self) -> &Array1<f64>;

    /// Resolves a port name to its unit index.
    ///
    /// Implementors without named ports keep the default, in which case
    /// port-based wiring is unavailable for them.
    fn port_index(&self, _name: &str) -> Option<UnitIndex> {
        None
    }
}

/// A p-bit circuit: `n` units coupled by `J` and biased by `h`.
///
/// # Example
///
/// ```
/// use pbitnet::circuit::{Circuit, Network};
///
/// let mut c = Circuit::new("pair", 2).unwrap();
/// c.couple(0, 1, 1.0).unwrap();
/// c.declare_ports(["left", "right"]).unwrap();
///
/// assert_eq!(c.port("left").unwrap().index, 0);
/// assert_eq!(c.coupling()[[1, 0]], 1.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "CircuitRepr")]
pub struct Circuit {
    name: String,
    n: usize,
    j: Array2<f64>,
    h: Array1<f64>,
    ports: Vec<Port>,
}

/// Wire form of [`Circuit`].
///
/// Deserialization funnels through the same checks as the validated
/// constructors, so a payload whose matrices, port count, or port
/// indices disagree with `n` is rejected instead of producing a circuit
/// that violates the model invariants.
#[derive(Deserialize)]
struct CircuitRepr {
    name: String,
    n: usize,
    j: Array2<f64>,
    h: Array1<f64>,
    ports: Vec<Port>,
}

impl TryFrom<CircuitRepr> for Circuit {
    type Error = Error;

    fn try_from(repr: CircuitRepr) -> Result<Self> {
        for (position, port) in repr.ports.iter().enumerate() {
            if port.index != position {
                return Err(Error::InvalidParameter(format!(
                    "port '{}' declares index {} but sits at position {position}",
                    port.name, port.index
                )));
            }
        }
        let mut circuit = Circuit::with_matrices(repr.name, repr.n, repr.j, repr.h)?;
        circuit.declare_ports(repr.ports.into_iter().map(|p| p.name))?;
        Ok(circuit)
    }
}

impl Circuit {
    /// Creates a circuit with `n` units, zero matrices, and default port
    /// names `p0 .. p{n-1}`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if `n` is zero.
    pub fn new(name: impl Into<String>, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidParameter(
                "unit count must be positive".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            n,
            j: Array2::zeros((n, n)),
            h: Array1::zeros(n),
            ports: (0..n).map(|i| Port::new(format!("p{i}"), i)).collect(),
        })
    }

    /// Creates a circuit with explicit coupling and bias matrices.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if `j` is not `n x n` or `h` is
    /// not length `n`.
    pub fn with_matrices(
        name: impl Into<String>,
        n: usize,
        j: Array2<f64>,
        h: Array1<f64>,
    ) -> Result<Self> {
        let mut circuit = Self::new(name, n)?;
        circuit.set_coupling(j)?;
        circuit.set_bias(h)?;
        Ok(circuit)
    }

    /// Replaces the coupling matrix.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if `j` is not `n x n`.
    pub fn set_coupling(&mut self, j: Array2<f64>) -> Result<()> {
        if j.shape() != [self.n, self.n] {
            return Err(Error::ShapeMismatch {
                expected: format!("{}x{}", self.n, self.n),
                found: format!("{}x{}", j.nrows(), j.ncols()),
            });
        }
        self.j = j;
        Ok(())
    }

    /// Replaces the bias vector.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if `h` is not length `n`.
    pub fn set_bias(&mut self, h: Array1<f64>) -> Result<()> {
        if h.len() != self.n {
            return Err(Error::ShapeMismatch {
                expected: format!("{}", self.n),
                found: format!("{}", h.len()),
            });
        }
        self.h = h;
        Ok(())
    }

    /// Sets a symmetric coupling between two distinct units.
    ///
    /// Writes `w` to both `J[a][b]` and `J[b][a]`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if the indices are out of range
    /// or equal (a diagonal entry has no Ising meaning).
    pub fn couple(&mut self, a: UnitIndex, b: UnitIndex, w: Weight) -> Result<()> {
        if a >= self.n || b >= self.n {
            return Err(Error::InvalidParameter(format!(
                "unit index out of range: ({a}, {b}) in a {}-unit circuit",
                self.n
            )));
        }
        if a == b {
            return Err(Error::InvalidParameter(format!(
                "cannot couple unit {a} to itself"
            )));
        }
        self.j[[a, b]] = w;
        self.j[[b, a]] = w;
        Ok(())
    }

    /// Sets the bias of a single unit.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if the index is out of range.
    pub fn set_bias_at(&mut self, i: UnitIndex, w: Weight) -> Result<()> {
        if i >= self.n {
            return Err(Error::InvalidParameter(format!(
                "unit index {i} out of range in a {}-unit circuit",
                self.n
            )));
        }
        self.h[i] = w;
        Ok(())
    }

    /// Declares named ports, one per unit, in index order.
    ///
    /// Replaces the default port names. The list must contain exactly `n`
    /// distinct names; the position of each name becomes its unit index.
    ///
    /// # Errors
    /// Returns [`Error::PortCountMismatch`] if the count differs from `n`,
    /// or [`Error::DuplicatePort`] if a name repeats.
    pub fn declare_ports<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.n {
            return Err(Error::PortCountMismatch {
                circuit: self.name.clone(),
                expected: self.n,
                found: names,
            });
        }
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicatePort(name.clone()));
            }
        }
        self.ports = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Port::new(name, i))
            .collect();
        Ok(())
    }

    /// Returns the circuit's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ports in unit-index order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }
}

impl Network for Circuit {
    fn units(&self) -> usize {
        self.n
    }

    fn coupling(&self) -> &Array2<f64> {
        &self.j
    }

    fn bias(&self) -> &Array1<f64> {
        &self.h
    }

    fn port_index(&self, name: &str) -> Option<UnitIndex> {
        self.port(name).map(|p| p.index)
    }
}

/// Builder for constructing a validated circuit in one expression.
///
/// All fields are explicit; nothing is materialized lazily. Validation
/// happens once, in [`CircuitBuilder::build`].
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use pbitnet::circuit::CircuitBuilder;
///
/// let c = CircuitBuilder::new("pair", 2)
///     .coupling(array![[0.0, 1.0], [1.0, 0.0]])
///     .bias(array![0.5, -0.5])
///     .ports(["a", "b"])
///     .build()
///     .unwrap();
/// assert_eq!(c.port("b").unwrap().index, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder {
    name: String,
    n: usize,
    j: Option<Array2<f64>>,
    h: Option<Array1<f64>>,
    ports: Option<Vec<String>>,
}

impl CircuitBuilder {
    /// Starts a builder for a circuit with `n` units.
    pub fn new(name: impl Into<String>, n: usize) -> Self {
        Self {
            name: name.into(),
            n,
            j: None,
            h: None,
            ports: None,
        }
    }

    /// Sets the initial coupling matrix (defaults to all zeros).
    pub fn coupling(mut self, j: Array2<f64>) -> Self {
        self.j = Some(j);
        self
    }

    /// Sets the initial bias vector (defaults to all zeros).
    pub fn bias(mut self, h: Array1<f64>) -> Self {
        self.h = Some(h);
        self
    }

    /// Sets the port names, one per unit, in index order.
    pub fn ports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ports = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validates all fields and builds the circuit.
    ///
    /// # Errors
    /// Propagates the same errors as the corresponding [`Circuit`]
    /// setters: [`Error::InvalidParameter`], [`Error::ShapeMismatch`],
    /// [`Error::PortCountMismatch`], [`Error::DuplicatePort`].
    pub fn build(self) -> Result<Circuit> {
        let mut circuit = Circuit::new(self.name, self.n)?;
        if let Some(j) = self.j {
            circuit.set_coupling(j)?;
        }
        if let Some(h) = self.h {
            circuit.set_bias(h)?;
        }
        if let Some(ports) = self.ports {
            circuit.declare_ports(ports)?;
        }
        Ok(circuit)
    }
}
