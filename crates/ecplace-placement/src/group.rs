//! Placement group representation

use ecplace_common::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nodes hosting one stripe, in stripe-position order
///
/// `nodes()[p]` stores the fragment at position `p`. Groups produced by the
/// selectors never repeat a node; groups built by hand are checked when they
/// are inserted into a cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementGroup(Vec<NodeIndex>);

impl PlacementGroup {
    /// Create a group from nodes in stripe-position order
    #[must_use]
    pub const fn new(nodes: Vec<NodeIndex>) -> Self {
        Self(nodes)
    }

    /// Nodes in stripe-position order
    #[must_use]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.0
    }

    /// Stripe width of this group
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(position, node)` pairs
    pub fn positions(&self) -> impl Iterator<Item = (usize, NodeIndex)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

impl From<Vec<NodeIndex>> for PlacementGroup {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        Self(nodes)
    }
}

impl fmt::Display for PlacementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, node) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, "]")
    }
}
