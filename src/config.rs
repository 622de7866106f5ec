//! Declarative simulation setup from YAML/JSON files.
//!
//! A configuration names the circuits (unit counts, ports, matrices),
//! the cross-circuit connections, and the solver hyperparameters, so a
//! whole experiment can be described in one file.
//!
//! # Configuration File Structure
//!
//! ```yaml
//! solver:
//!   steps: 25000
//!   dt: 0.1667
//!   i0: 0.9
//!   expected_mean: 0.0
//!   seed: 42
//!
//! circuits:
//!   - name: pair
//!     units: 2
//!     ports: [left, right]
//!     coupling:
//!       - [0.0, 1.0]
//!       - [1.0, 0.0]
//!     bias: [0.5, -0.5]
//!
//! connections:
//!   - from: [pair, right]
//!     to: [other, left]
//!     weight: 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use ndarray::{Array1, Array2};

use crate::circuit::{Circuit, CircuitBuilder};
use crate::module::ModuleContext;
use crate::solver::{RelaxationSolver, SolverParams};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Model(#[from] crate::error::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration for a single circuit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Circuit name, unique within the configuration
    pub name: String,

    /// Number of p-bit units
    pub units: usize,

    /// Port names, one per unit (defaults to `p0 .. p{n-1}`)
    #[serde(default)]
    pub ports: Option<Vec<String>>,

    /// Coupling matrix rows (defaults to all zeros)
    #[serde(default)]
    pub coupling: Option<Vec<Vec<f64>>>,

    /// Bias vector (defaults to all zeros)
    #[serde(default)]
    pub bias: Option<Vec<f64>>,
}

impl CircuitConfig {
    /// Builds the described [`Circuit`], validating shapes and ports.
    pub fn build(&self) -> ConfigResult<Circuit> {
        let mut builder = CircuitBuilder::new(&self.name, self.units);

        if let Some(rows) = &self.coupling {
            if rows.len() != self.units {
                return Err(ConfigError::Validation(format!(
                    "circuit '{}': coupling has {} rows, expected {}",
                    self.name,
                    rows.len(),
                    self.units
                )));
            }
            let mut flat = Vec::with_capacity(self.units * self.units);
            for (i, row) in rows.iter().enumerate() {
                if row.len() != self.units {
                    return Err(ConfigError::Validation(format!(
                        "circuit '{}': coupling row {} has {} entries, expected {}",
                        self.name,
                        i,
                        row.len(),
                        self.units
                    )));
                }
                flat.extend_from_slice(row);
            }
            let j = Array2::from_shape_vec((self.units, self.units), flat)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
            builder = builder.coupling(j);
        }

        if let Some(bias) = &self.bias {
            builder = builder.bias(Array1::from_vec(bias.clone()));
        }

        if let Some(ports) = &self.ports {
            builder = builder.ports(ports.clone());
        }

        Ok(builder.build()?)
    }
}

/// Configuration for a symmetric cross-circuit connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Source endpoint as `[circuit, port]`
    pub from: (String, String),

    /// Destination endpoint as `[circuit, port]`
    pub to: (String, String),

    /// Coupling weight added symmetrically at both global positions
    pub weight: f64,
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Solver hyperparameters (all required; no hidden defaults)
    pub solver: SolverParams,

    /// Circuit definitions, registered in order
    #[serde(default)]
    pub circuits: Vec<CircuitConfig>,

    /// Cross-circuit connections
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

impl SimConfig {
    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting the format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.solver
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let mut names = HashSet::new();
        for circuit in &self.circuits {
            if circuit.units == 0 {
                return Err(ConfigError::Validation(format!(
                    "circuit '{}' has zero units",
                    circuit.name
                )));
            }
            if !names.insert(circuit.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate circuit name: '{}'",
                    circuit.name
                )));
            }
        }

        for conn in &self.connections {
            for endpoint in [&conn.from.0, &conn.to.0] {
                if !names.contains(endpoint.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "connection references unknown circuit: '{endpoint}'"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Builds the module context: circuits registered in declaration
    /// order, connections applied through their ports.
    pub fn build_module(&self) -> ConfigResult<ModuleContext> {
        let mut module = ModuleContext::new();
        let mut instances = std::collections::HashMap::new();

        for circuit_config in &self.circuits {
            let circuit = circuit_config.build()?;
            let instance = module.register(circuit);
            instances.insert(circuit_config.name.clone(), instance);
        }

        for conn in &self.connections {
            let a = instances[&conn.from.0];
            let b = instances[&conn.to.0];
            module.connect(a, &conn.from.1, b, &conn.to.1, conn.weight)?;
        }

        Ok(module)
    }

    /// Builds the configured relaxation solver.
    pub fn build_solver(&self) -> ConfigResult<RelaxationSolver> {
        Ok(RelaxationSolver::new(self.solver.clone())?)
    }

    /// Converts to a YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to a pretty-printed JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Saves the configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Finds a circuit configuration by name.
    pub fn find_circuit(&self, name: &str) -> Option<&CircuitConfig> {
        self.circuits.iter().find(|c| c.name == name)
    }

    /// Returns the number of configured circuits.
    pub fn circuit_count(&self) -> usize {
        self.circuits.len()
    }

    /// Returns the number of configured connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Builder for creating a [`SimConfig`] programmatically.
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Starts a builder with the given solver parameters.
    pub fn new(solver: SolverParams) -> Self {
        Self {
            config: SimConfig {
                solver,
                circuits: Vec::new(),
                connections: Vec::new(),
            },
        }
    }

    /// Adds a circuit definition.
    pub fn add_circuit(mut self, circuit: CircuitConfig) -> Self {
        self.config.circuits.push(circuit);
        self
    }

    /// Adds a connection between two circuit ports.
    pub fn add_connection(
        mut self,
        from: (impl Into<String>, impl Into<String>),
        to: (impl Into<String>, impl Into<String>),
        weight: f64,
    ) -> Self {
        self.config.connections.push(ConnectionConfig {
            from: (from.0.into(), from.1.into()),
            to: (to.0.into(), to.1.into()),
            weight,
        });
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Network;

    fn solver_params() -> SolverParams {
        SolverParams::new(100, 0.1667, 0.9, 0.0).unwrap()
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
solver:
  steps: 5000
  dt: 0.1667
  i0: 0.9
  expected_mean: 0.0
  seed: 42

circuits:
  - name: pair
    units: 2
    ports: [left, right]
    coupling:
      - [0.0, 1.0]
      - [1.0, 0.0]
    bias: [0.5, -0.5]
  - name: single
    units: 1

connections:
  - from: [pair, right]
    to: [single, p0]
    weight: 2.0
"#;
        let config = SimConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.solver.steps, 5000);
        assert_eq!(config.solver.seed, Some(42));
        assert_eq!(config.circuit_count(), 2);
        assert_eq!(config.connection_count(), 1);
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{
            "solver": {"steps": 100, "dt": 0.1, "i0": 1.0, "expected_mean": 0.0},
            "circuits": [{"name": "c", "units": 3}],
            "connections": []
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.circuit_count(), 1);
        assert!(config.solver.seed.is_none());
    }

    #[test]
    fn test_duplicate_circuit_name_rejected() {
        let yaml = r#"
solver: {steps: 10, dt: 0.1, i0: 1.0, expected_mean: 0.0}
circuits:
  - {name: a, units: 1}
  - {name: a, units: 2}
"#;
        assert!(matches!(
            SimConfig::from_yaml(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_connection_circuit_rejected() {
        let yaml = r#"
solver: {steps: 10, dt: 0.1, i0: 1.0, expected_mean: 0.0}
circuits:
  - {name: a, units: 1}
connections:
  - {from: [a, p0], to: [ghost, p0], weight: 1.0}
"#;
        assert!(matches!(
            SimConfig::from_yaml(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_solver_params_rejected() {
        let yaml = r#"
solver: {steps: 0, dt: 0.1, i0: 1.0, expected_mean: 0.0}
"#;
        assert!(SimConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_ragged_coupling_rejected() {
        let config = CircuitConfig {
            name: "bad".to_string(),
            units: 2,
            ports: None,
            coupling: Some(vec![vec![0.0, 1.0], vec![1.0]]),
            bias: None,
        };
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_build_module() {
        let yaml = r#"
solver: {steps: 10, dt: 0.1, i0: 1.0, expected_mean: 0.0}
circuits:
  - name: pair
    units: 2
    ports: [left, right]
    coupling:
      - [0.0, 1.0]
      - [1.0, 0.0]
  - name: single
    units: 1
connections:
  - {from: [pair, right], to: [single, p0], weight: -0.5}
"#;
        let config = SimConfig::from_yaml(yaml).unwrap();
        let module = config.build_module().unwrap();
        assert_eq!(module.total_units(), 3);

        let (j, _) = module.synthesize_dense();
        assert_eq!(j[[1, 2]], -0.5);
        assert_eq!(j[[2, 1]], -0.5);
    }

    #[test]
    fn test_build_solver_and_run() {
        use crate::solver::Solver;

        let config = SimConfigBuilder::new(solver_params().with_seed(1))
            .add_circuit(CircuitConfig {
                name: "pair".to_string(),
                units: 2,
                ports: None,
                coupling: Some(vec![vec![0.0, 1.0], vec![1.0, 0.0]]),
                bias: None,
            })
            .build()
            .unwrap();

        let module = config.build_module().unwrap();
        let circuit = module.as_circuit("combined").unwrap();
        let mut solver = config.build_solver().unwrap();
        let trajectory = solver.solve(&circuit);
        assert_eq!(trajectory.units(), circuit.units());
        assert_eq!(trajectory.steps(), 100);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = SimConfigBuilder::new(solver_params())
            .add_circuit(CircuitConfig {
                name: "c".to_string(),
                units: 2,
                ports: Some(vec!["a".to_string(), "b".to_string()]),
                coupling: None,
                bias: Some(vec![0.1, -0.1]),
            })
            .build()
            .unwrap();

        let yaml = config.to_yaml().unwrap();
        let restored = SimConfig::from_yaml(&yaml).unwrap();
        assert_eq!(restored.circuit_count(), 1);
        assert_eq!(restored.solver.steps, config.solver.steps);
    }
}
