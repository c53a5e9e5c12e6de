//! Configuration types for ecplace
//!
//! This module defines the configuration of a simulation run. Every section
//! has a default, so a TOML file only needs to name what it overrides.
//!
//! ```toml
//! [cluster]
//! nodes = 100
//! expansion_rate_limit = 1
//!
//! [code]
//! family = "lrc"
//! total_shards = 12
//! data_shards = 10
//! local_groups = 2
//!
//! [run]
//! steps = 1001
//! seed = 42
//! expansions = [1, 2]
//! ```

use crate::error::{Error, Result};
use crate::types::ErasureCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default data-balance slack of the greedy selector (2%)
pub const DEFAULT_EPSILON: f64 = 0.02;

/// Root configuration for a simulation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cluster configuration
    pub cluster: ClusterConfig,
    /// Erasure code placed on the cluster
    pub code: ErasureCode,
    /// Selector tuning
    pub placement: PlacementConfig,
    /// Run length, seed and expansion schedule
    pub run: RunConfig,
    /// Report output
    pub report: ReportConfig,
}

impl SimulationConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check all sections for values the planner cannot run with
    pub fn validate(&self) -> Result<()> {
        self.code.validate_for_cluster(self.cluster.nodes)?;

        if !self.placement.epsilon.is_finite() || self.placement.epsilon < 0.0 {
            return Err(Error::configuration(format!(
                "placement.epsilon must be a non-negative number, got {}",
                self.placement.epsilon
            )));
        }
        if self.run.steps == 0 {
            return Err(Error::configuration("run.steps must be > 0"));
        }
        if self.run.expansions.contains(&0) {
            return Err(Error::configuration("run.expansions entries must be > 0"));
        }
        if self.run.expansion_step() >= self.run.steps {
            return Err(Error::configuration(format!(
                "run.expand_after ({}) must be below run.steps ({})",
                self.run.expansion_step(),
                self.run.steps
            )));
        }
        if self.report.stride == 0 {
            return Err(Error::configuration("report.stride must be > 0"));
        }
        Ok(())
    }
}

/// Cluster configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Initial number of storage nodes (N)
    pub nodes: usize,
    /// Maximum number of newly added nodes in one placement group (c)
    pub expansion_rate_limit: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            nodes: 100,
            expansion_rate_limit: 1,
        }
    }
}

/// Placement selector configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Data-balance slack of the greedy selector
    pub epsilon: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Run configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Placement groups inserted per run
    pub steps: usize,
    /// Seed for the random selector
    pub seed: u64,
    /// Expansion sizes to simulate, one run each
    pub expansions: Vec<usize>,
    /// Step after which the cluster expands (defaults to `steps / 2`)
    pub expand_after: Option<usize>,
}

impl RunConfig {
    /// Step after which expansion runs grow the cluster
    #[must_use]
    pub fn expansion_step(&self) -> usize {
        self.expand_after.unwrap_or(self.steps / 2)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 1001,
            seed: 0,
            expansions: vec![1, 2],
            expand_after: None,
        }
    }
}

/// Report configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the CSV files are written to
    pub output_dir: PathBuf,
    /// Only every `stride`-th step is written
    pub stride: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            stride: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CodeFamily;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.cluster.nodes, 100);
        assert_eq!(config.cluster.expansion_rate_limit, 1);
        assert_eq!(config.code, ErasureCode::RS_14_10);
        assert_eq!(config.run.steps, 1001);
        assert_eq!(config.run.expansion_step(), 500);
        assert_eq!(config.report.stride, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [cluster]
            nodes = 40

            [code]
            family = "lrc"
            total_shards = 12
            data_shards = 10
            local_groups = 2

            [run]
            steps = 200
            expansions = [4]
            "#,
        )
        .unwrap();

        assert_eq!(config.cluster.nodes, 40);
        assert_eq!(config.cluster.expansion_rate_limit, 1);
        assert_eq!(config.code.family, CodeFamily::Lrc);
        assert_eq!(config.code, ErasureCode::LRC_12_10_2);
        assert_eq!(config.run.expansions, vec![4]);
        assert_eq!(config.run.expansion_step(), 100);
        assert!((config.placement.epsilon - DEFAULT_EPSILON).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let err = SimulationConfig::from_toml_str("[cluster]\nnodes = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.cluster.nodes = 8;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InsufficientNodes { .. }
        ));

        let mut config = SimulationConfig::default();
        config.placement.epsilon = -0.5;
        assert!(config.validate().unwrap_err().is_configuration());

        let mut config = SimulationConfig::default();
        config.run.expansions = vec![0];
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.run.expand_after = Some(2000);
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.report.stride = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecplace.toml");
        std::fs::write(&path, "[placement]\nepsilon = 0.1\n").unwrap();

        let config = SimulationConfig::load(&path).unwrap();
        assert!((config.placement.epsilon - 0.1).abs() < f64::EPSILON);

        let err = SimulationConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
