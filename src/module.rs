//! Module composition: registering sub-circuits and synthesizing the
//! combined coupling matrix and bias vector.
//!
//! A [`ModuleContext`] holds an ordered list of registered networks. Each
//! registration is placed block-diagonally: the k-th network's units start
//! at the running total of all previously registered unit counts, so the
//! offsets tile `[0, total_units)` with no gaps or overlaps.
//!
//! Cross-circuit coupling is never implicit. It is introduced only through
//! [`ModuleContext::connect`], which resolves two ports to global indices
//! and records a symmetric link applied at synthesis time.

use ndarray::{Array1, Array2};

use crate::circuit::{Circuit, Network};
use crate::error::{Error, Result};
use crate::types::{SparseBias, SparseCoupling, UnitIndex, Weight};

/// A registered sub-network and its global index offset.
struct Registered {
    network: Box<dyn Network>,
    offset: usize,
}

/// A symmetric cross-circuit coupling between two global unit indices.
#[derive(Clone, Copy, Debug)]
struct Link {
    a: UnitIndex,
    b: UnitIndex,
    weight: Weight,
}

/// Result of synthesizing a module's combined matrices.
#[derive(Clone, Debug)]
pub enum Synthesis {
    /// Dense `total x total` coupling matrix and length-`total` bias.
    Dense {
        coupling: Array2<f64>,
        bias: Array1<f64>,
    },
    /// Adjacency-map coupling and bias, nonzero entries only.
    Sparse {
        coupling: SparseCoupling,
        bias: SparseBias,
    },
}

impl Synthesis {
    /// Returns the dense matrices, if this is a dense synthesis.
    pub fn into_dense(self) -> Option<(Array2<f64>, Array1<f64>)> {
        match self {
            Synthesis::Dense { coupling, bias } => Some((coupling, bias)),
            Synthesis::Sparse { .. } => None,
        }
    }

    /// Returns the sparse maps, if this is a sparse synthesis.
    pub fn into_sparse(self) -> Option<(SparseCoupling, SparseBias)> {
        match self {
            Synthesis::Sparse { coupling, bias } => Some((coupling, bias)),
            Synthesis::Dense { .. } => None,
        }
    }
}

/// Composition context for building a global network out of sub-circuits.
///
/// # Example
///
/// ```
/// use pbitnet::circuit::Circuit;
/// use pbitnet::module::ModuleContext;
///
/// let mut module = ModuleContext::new();
/// let a = module.register(Circuit::new("a", 2).unwrap());
/// let b = module.register(Circuit::new("b", 3).unwrap());
///
/// module.connect(a, "p0", b, "p1", 1.5).unwrap();
/// let (j, h) = module.synthesize_dense();
/// assert_eq!(j.shape(), [5, 5]);
/// assert_eq!(j[[0, 3]], 1.5);
/// assert_eq!(j[[3, 0]], 1.5);
/// assert_eq!(h.len(), 5);
/// ```
#[derive(Default)]
pub struct ModuleContext {
    registered: Vec<Registered>,
    links: Vec<Link>,
    total_units: usize,
}

impl ModuleContext {
    /// Creates an empty module context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a network and returns its registration index.
    ///
    /// The network's units are placed at global indices
    /// `[offset, offset + units)`, where `offset` is the sum of all
    /// previously registered unit counts.
    pub fn register<N: Network + 'static>(&mut self, network: N) -> usize {
        let offset = self.total_units;
        self.total_units += network.units();
        self.registered.push(Registered {
            network: Box::new(network),
            offset,
        });
        self.registered.len() - 1
    }

    /// Returns the number of registered networks.
    pub fn instance_count(&self) -> usize {
        self.registered.len()
    }

    /// Returns the total number of units across all registrations.
    pub fn total_units(&self) -> usize {
        self.total_units
    }

    /// Returns the global index offset of a registered network.
    pub fn offset_of(&self, instance: usize) -> Option<usize> {
        self.registered.get(instance).map(|r| r.offset)
    }

    /// Resolves a port on a registered network to its global unit index.
    ///
    /// # Errors
    /// Returns [`Error::UnknownPort`] if the instance does not exist or
    /// the port name does not resolve on it.
    pub fn global_port_index(&self, instance: usize, port: &str) -> Result<UnitIndex> {
        let registered =
            self.registered
                .get(instance)
                .ok_or_else(|| Error::UnknownPort {
                    instance,
                    port: port.to_string(),
                })?;
        let local = registered
            .network
            .port_index(port)
            .ok_or_else(|| Error::UnknownPort {
                instance,
                port: port.to_string(),
            })?;
        Ok(registered.offset + local)
    }

    /// Connects two ports of (usually different) registered networks with
    /// a symmetric coupling weight.
    ///
    /// At synthesis time the weight is *added* to both `J[i][j]` and
    /// `J[j][i]`, so repeated connects accumulate.
    ///
    /// # Errors
    /// Returns [`Error::UnknownPort`] if either port fails to resolve, or
    /// [`Error::InvalidParameter`] if both ports resolve to the same
    /// global unit.
    pub fn connect(
        &mut self,
        instance_a: usize,
        port_a: &str,
        instance_b: usize,
        port_b: &str,
        weight: Weight,
    ) -> Result<()> {
        let a = self.global_port_index(instance_a, port_a)?;
        let b = self.global_port_index(instance_b, port_b)?;
        self.connect_indices(a, b, weight)
    }

    /// Connects two global unit indices directly.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if an index is out of range or
    /// the indices are equal.
    pub fn connect_indices(&mut self, a: UnitIndex, b: UnitIndex, weight: Weight) -> Result<()> {
        if a >= self.total_units || b >= self.total_units {
            return Err(Error::InvalidParameter(format!(
                "global unit index out of range: ({a}, {b}) with {} total units",
                self.total_units
            )));
        }
        if a == b {
            return Err(Error::InvalidParameter(format!(
                "cannot connect global unit {a} to itself"
            )));
        }
        self.links.push(Link { a, b, weight });
        Ok(())
    }

    /// Synthesizes the combined matrices in the requested format.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] for any format other than
    /// `"sparse"` or `"dense"`.
    pub fn synthesize(&self, format: &str) -> Result<Synthesis> {
        match format {
            "dense" => {
                let (coupling, bias) = self.synthesize_dense();
                Ok(Synthesis::Dense { coupling, bias })
            }
            "sparse" => {
                let (coupling, bias) = self.synthesize_sparse();
                Ok(Synthesis::Sparse { coupling, bias })
            }
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }

    /// Synthesizes the dense global coupling matrix and bias vector.
    ///
    /// Each registered network's `J` lands in the block
    /// `[offset .. offset+n, offset .. offset+n]` and its `h` in
    /// `h_global[offset .. offset+n]`; links add their weight at both
    /// off-diagonal positions.
    pub fn synthesize_dense(&self) -> (Array2<f64>, Array1<f64>) {
        let total = self.total_units;
        let mut j = Array2::zeros((total, total));
        let mut h = Array1::zeros(total);

        for registered in &self.registered {
            let n = registered.network.units();
            let offset = registered.offset;
            let block = registered.network.coupling();
            for row in 0..n {
                for col in 0..n {
                    j[[offset + row, offset + col]] = block[[row, col]];
                }
            }
            let bias = registered.network.bias();
            for (i, &b) in bias.iter().enumerate() {
                h[offset + i] = b;
            }
        }

        for link in &self.links {
            j[[link.a, link.b]] += link.weight;
            j[[link.b, link.a]] += link.weight;
        }

        (j, h)
    }

    /// Synthesizes the sparse (adjacency-map) global coupling and bias.
    ///
    /// Holds only nonzero entries; entries cancelled out by accumulated
    /// links are pruned.
    pub fn synthesize_sparse(&self) -> (SparseCoupling, SparseBias) {
        let mut j = SparseCoupling::new();
        let mut h = SparseBias::new();

        for registered in &self.registered {
            let n = registered.network.units();
            let offset = registered.offset;
            let block = registered.network.coupling();
            for row in 0..n {
                for col in 0..n {
                    let w = block[[row, col]];
                    if w != 0.0 {
                        j.entry(offset + row).or_default().insert(offset + col, w);
                    }
                }
            }
            for (i, &b) in registered.network.bias().iter().enumerate() {
                if b != 0.0 {
                    h.insert(offset + i, b);
                }
            }
        }

        for link in &self.links {
            for (row, col) in [(link.a, link.b), (link.b, link.a)] {
                let entry = j.entry(row).or_default().entry(col).or_insert(0.0);
                *entry += link.weight;
            }
        }

        // Prune entries that accumulated to exactly zero.
        for neighbors in j.values_mut() {
            neighbors.retain(|_, w| *w != 0.0);
        }
        j.retain(|_, neighbors| !neighbors.is_empty());

        (j, h)
    }

    /// Builds a flat [`Circuit`] from the dense synthesis.
    ///
    /// Units are given ports named `u{global_index}`. The result can be
    /// handed straight to a solver.
    pub fn as_circuit(&self, name: impl Into<String>) -> Result<Circuit> {
        let (j, h) = self.synthesize_dense();
        let total = self.total_units;
        let mut circuit = Circuit::with_matrices(name, total, j, h)?;

        circuit.declare_ports((0..total).map(|i| format!("u{i}")))?;
        Ok(circuit)
    }
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("instances", &self.registered.len())
            .field("total_units", &self.total_units)
            .field("links", &self.links.len())
            .finish()
    }
}
