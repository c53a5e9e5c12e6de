//! Cluster state: recovery-load accounting and expansion bookkeeping
//!
//! [`ClusterState`] is the only owner of the load and membership data. It is
//! changed by exactly two operations, [`ClusterState::insert`] and
//! [`ClusterState::expand`]; everything else reads it through `&self`.

use crate::group::PlacementGroup;
use crate::load::LoadMatrix;
use ecplace_common::{ErasureCode, Error, NodeIndex, PgId, Result};
use ecplace_erasure::RepairMatrix;
use std::ops::Range;
use tracing::{debug, info};

/// In-memory state of a simulated cluster
#[derive(Clone, Debug)]
pub struct ClusterState {
    code: ErasureCode,
    repair: RepairMatrix,
    /// Max newly added nodes per placement group (c)
    expansion_rate_limit: usize,
    recovery_load: LoadMatrix,
    /// Load each node takes part in, as failed or serving node
    weighted_load: Vec<u64>,
    /// Placement groups hosted by each node
    memberships: Vec<Vec<PgId>>,
    /// Nodes added by expansion
    new_nodes: Vec<bool>,
    groups: Vec<PlacementGroup>,
}

impl ClusterState {
    /// Create an empty cluster of `node_count` nodes storing `code`
    ///
    /// Fails if the code is inconsistent or wider than the cluster.
    pub fn new(node_count: usize, code: ErasureCode, expansion_rate_limit: usize) -> Result<Self> {
        code.validate_for_cluster(node_count)?;
        let repair = RepairMatrix::new(&code)?;

        debug!(
            "New cluster: {} nodes, code {}, expansion rate limit {}",
            node_count, code, expansion_rate_limit
        );

        Ok(Self {
            code,
            repair,
            expansion_rate_limit,
            recovery_load: LoadMatrix::new(node_count),
            weighted_load: vec![0; node_count],
            memberships: vec![Vec::new(); node_count],
            new_nodes: vec![false; node_count],
            groups: Vec::new(),
        })
    }

    /// Current number of nodes (N)
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.new_nodes.len()
    }

    /// Erasure code of every stripe
    #[must_use]
    pub const fn code(&self) -> &ErasureCode {
        &self.code
    }

    /// Stripe width (n)
    #[must_use]
    pub const fn group_width(&self) -> usize {
        self.code.total_shards
    }

    /// Repair-cost table for the code
    #[must_use]
    pub const fn repair_matrix(&self) -> &RepairMatrix {
        &self.repair
    }

    /// Max newly added nodes per placement group
    #[must_use]
    pub const fn expansion_rate_limit(&self) -> usize {
        self.expansion_rate_limit
    }

    /// Pairwise recovery-load graph
    #[must_use]
    pub const fn recovery_load(&self) -> &LoadMatrix {
        &self.recovery_load
    }

    /// Weighted load of every node
    #[must_use]
    pub fn weighted_load(&self) -> &[u64] {
        &self.weighted_load
    }

    /// Placement groups hosted by `node`
    ///
    /// # Panics
    /// Panics if `node` is not below [`ClusterState::node_count`].
    #[must_use]
    pub fn memberships(&self, node: NodeIndex) -> &[PgId] {
        &self.memberships[node]
    }

    /// Number of placement groups hosted by `node`
    ///
    /// # Panics
    /// Panics if `node` is not below [`ClusterState::node_count`].
    #[must_use]
    pub fn membership_count(&self, node: NodeIndex) -> usize {
        self.memberships[node].len()
    }

    /// Number of placement groups hosted by each node
    pub fn membership_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.memberships.iter().map(Vec::len)
    }

    /// Whether `node` joined through expansion
    ///
    /// # Panics
    /// Panics if `node` is not below [`ClusterState::node_count`].
    #[must_use]
    pub fn is_new_node(&self, node: NodeIndex) -> bool {
        self.new_nodes[node]
    }

    /// Indices of all nodes added through expansion
    pub fn new_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.new_nodes
            .iter()
            .enumerate()
            .filter_map(|(node, &is_new)| is_new.then_some(node))
    }

    /// All placement groups, indexed by [`PgId`]
    #[must_use]
    pub fn groups(&self) -> &[PlacementGroup] {
        &self.groups
    }

    /// Look up a placement group
    #[must_use]
    pub fn group(&self, id: PgId) -> Option<&PlacementGroup> {
        self.groups.get(id.index())
    }

    /// Number of placement groups inserted so far
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Check that `group` can be inserted
    pub fn validate_group(&self, group: &PlacementGroup) -> Result<()> {
        if group.len() != self.group_width() {
            return Err(Error::GroupLengthMismatch {
                expected: self.group_width(),
                actual: group.len(),
            });
        }

        let mut seen = vec![false; self.node_count()];
        for &node in group.nodes() {
            if node >= self.node_count() {
                return Err(Error::NodeOutOfRange {
                    node,
                    node_count: self.node_count(),
                });
            }
            if seen[node] {
                return Err(Error::DuplicateNode { node });
            }
            seen[node] = true;
        }
        Ok(())
    }

    /// Commit a placement group
    ///
    /// Every ordered pair of positions `(a, b)` adds the repair cost of `b`
    /// for `a` to `recovery_load[group[a]][group[b]]` and to the weighted load
    /// of both nodes. A rejected group leaves the state untouched.
    pub fn insert(&mut self, group: PlacementGroup) -> Result<PgId> {
        self.validate_group(&group)?;

        for (a, failed) in group.positions() {
            for (b, source) in group.positions() {
                if a == b {
                    continue;
                }
                let cost = self.repair.cost(a, b);
                self.recovery_load.add(failed, source, cost);
                self.weighted_load[failed] += cost;
                self.weighted_load[source] += cost;
            }
        }

        let id = PgId::new(self.groups.len());
        for &node in group.nodes() {
            self.memberships[node].push(id);
        }

        debug!("Inserted {} on nodes {}", id, group);
        self.groups.push(group);
        Ok(id)
    }

    /// Add `added` empty nodes and mark them as new
    ///
    /// Existing nodes keep their indices and accumulated state; the new nodes
    /// take the indices returned.
    pub fn expand(&mut self, added: usize) -> Result<Range<NodeIndex>> {
        if added == 0 {
            return Err(Error::invalid_argument("expansion must add at least one node"));
        }

        let first = self.node_count();
        let node_count = first + added;

        self.recovery_load.grow(node_count);
        self.weighted_load.resize(node_count, 0);
        self.memberships.resize_with(node_count, Vec::new);
        self.new_nodes.resize(node_count, true);

        info!(
            "Expanded cluster from {} to {} nodes after {} placement groups",
            first,
            node_count,
            self.groups.len()
        );
        Ok(first..node_count)
    }
}
