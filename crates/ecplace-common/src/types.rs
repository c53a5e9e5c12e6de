//! Core type definitions for ecplace
//!
//! This module defines the identifiers and the erasure code descriptor shared
//! by the repair-cost model, the cluster state and the simulation driver.

use crate::error::{Error, Result};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a storage node in the cluster (0-based, dense)
///
/// Nodes are never removed or renumbered, so an index stays valid for the
/// lifetime of a cluster. Nodes added by expansion take the highest indices.
pub type NodeIndex = usize;

/// Identifier of a placement group: its insertion index in the cluster
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    From, Into,
)]
#[display("pg{_0}")]
pub struct PgId(usize);

impl PgId {
    /// Create a placement group ID from its insertion index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the insertion index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Erasure code family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeFamily {
    /// Reed-Solomon (MDS), any surviving fragment helps repair any other
    Rs,
    /// Locally Repairable Code with `l` local groups over the data fragments
    Lrc,
    /// Clay (coupled-layer MSR) code, modeled with the RS repair cost
    Clay,
}

impl fmt::Display for CodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rs => write!(f, "rs"),
            Self::Lrc => write!(f, "lrc"),
            Self::Clay => write!(f, "clay"),
        }
    }
}

impl FromStr for CodeFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rs" | "reed-solomon" => Ok(Self::Rs),
            "lrc" => Ok(Self::Lrc),
            "clay" => Ok(Self::Clay),
            other => Err(Error::invalid_argument(format!(
                "unknown code family: {other} (expected rs, lrc or clay)"
            ))),
        }
    }
}

/// Erasure code descriptor
///
/// A stripe of this code has `total_shards` (n) fragments, `data_shards` (k)
/// of which carry data. For LRC the data fragments are split into
/// `local_groups` (l) contiguous groups of `k / l` fragments each; the field
/// is ignored by the other families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErasureCode {
    /// Code family
    pub family: CodeFamily,
    /// Fragments per stripe (n)
    pub total_shards: usize,
    /// Data fragments per stripe (k)
    pub data_shards: usize,
    /// Number of local groups (l), LRC only
    #[serde(default)]
    pub local_groups: usize,
}

impl ErasureCode {
    /// Create a Reed-Solomon descriptor
    #[must_use]
    pub const fn rs(total_shards: usize, data_shards: usize) -> Self {
        Self {
            family: CodeFamily::Rs,
            total_shards,
            data_shards,
            local_groups: 0,
        }
    }

    /// Create an LRC descriptor
    ///
    /// `data_shards` must be divisible by `local_groups`; this is checked by
    /// [`ErasureCode::validate`], not here.
    #[must_use]
    pub const fn lrc(total_shards: usize, data_shards: usize, local_groups: usize) -> Self {
        Self {
            family: CodeFamily::Lrc,
            total_shards,
            data_shards,
            local_groups,
        }
    }

    /// Create a Clay descriptor
    #[must_use]
    pub const fn clay(total_shards: usize, data_shards: usize) -> Self {
        Self {
            family: CodeFamily::Clay,
            total_shards,
            data_shards,
            local_groups: 0,
        }
    }

    /// Check the descriptor is internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.total_shards == 0 {
            return Err(Error::InvalidCode(format!("{self}: total_shards must be > 0")));
        }
        if self.data_shards == 0 {
            return Err(Error::InvalidCode(format!("{self}: data_shards must be > 0")));
        }
        if self.data_shards > self.total_shards {
            return Err(Error::InvalidCode(format!(
                "{self}: data_shards exceeds total_shards"
            )));
        }
        if self.family == CodeFamily::Lrc {
            if self.local_groups == 0 {
                return Err(Error::InvalidCode(format!("{self}: local_groups must be > 0")));
            }
            if self.data_shards % self.local_groups != 0 {
                return Err(Error::InvalidCode(format!(
                    "{self}: data_shards must be divisible by local_groups"
                )));
            }
        }
        Ok(())
    }

    /// Check the descriptor can be placed on a cluster of `node_count` nodes
    pub fn validate_for_cluster(&self, node_count: usize) -> Result<()> {
        self.validate()?;
        if self.total_shards > node_count {
            return Err(Error::InsufficientNodes {
                available: node_count,
                required: self.total_shards,
            });
        }
        Ok(())
    }

    /// RS(14,10), the default code
    pub const RS_14_10: Self = Self::rs(14, 10);

    /// LRC(12,10,2): two local groups of 5 data fragments, 2 global parities
    pub const LRC_12_10_2: Self = Self::lrc(12, 10, 2);

    /// Clay(14,10)
    pub const CLAY_14_10: Self = Self::clay(14, 10);
}

impl Default for ErasureCode {
    fn default() -> Self {
        Self::RS_14_10
    }
}

impl fmt::Display for ErasureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            CodeFamily::Rs => write!(f, "RS({},{})", self.total_shards, self.data_shards),
            CodeFamily::Lrc => write!(
                f,
                "LRC({},{},{})",
                self.total_shards, self.data_shards, self.local_groups
            ),
            CodeFamily::Clay => write!(f, "Clay({},{})", self.total_shards, self.data_shards),
        }
    }
}
