//! Greedy load-aware selection
//!
//! The group is built one stripe position at a time. For position `p`:
//!
//! 1. `min` is the smallest membership count among nodes that are neither in
//!    the group yet nor newly added.
//! 2. Candidates are the unused nodes whose membership count does not exceed
//!    `floor(min * (1 + epsilon))`. A newly added node is a candidate only while
//!    the group holds fewer than `c` new nodes.
//! 3. Each candidate is scored with the recovery load it would see against the
//!    nodes already chosen: `sum(load[candidate][group[m]] + cost(p, m))`.
//! 4. The lowest score wins, then the lowest weighted load, then the lowest
//!    node index.
//!
//! When no old node is left to define `min`, the data-balance band is not
//! applied.

use crate::cluster::ClusterState;
use crate::group::PlacementGroup;
use ecplace_common::{Error, NodeIndex, Result};
use tracing::debug;

/// Best node found for one stripe position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    node: NodeIndex,
    /// Projected recovery load at this position
    load: u64,
    /// Weighted load, the tie-breaker
    weight: u64,
}

/// Nodes already placed in the group under construction
struct PartialGroup {
    nodes: Vec<NodeIndex>,
    used: Vec<bool>,
    new_selected: usize,
}

impl PartialGroup {
    fn new(node_count: usize, width: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(width),
            used: vec![false; node_count],
            new_selected: 0,
        }
    }

    fn push(&mut self, node: NodeIndex, is_new: bool) {
        self.used[node] = true;
        self.nodes.push(node);
        if is_new {
            self.new_selected += 1;
        }
    }
}

/// Build a placement group for `state` with data-balance slack `epsilon`
pub fn select(state: &ClusterState, epsilon: f64) -> Result<PlacementGroup> {
    let width = state.group_width();
    let mut partial = PartialGroup::new(state.node_count(), width);

    for position in 0..width {
        let best = best_candidate(state, &partial, epsilon)
            .ok_or(Error::NoEligibleNode { position })?;
        partial.push(best.node, state.is_new_node(best.node));
    }

    let group = PlacementGroup::new(partial.nodes);
    debug!("Greedy selected {}", group);
    Ok(group)
}

/// Membership count above which a node is skipped, `None` for no limit
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn membership_ceiling(state: &ClusterState, used: &[bool], epsilon: f64) -> Option<usize> {
    let min = (0..state.node_count())
        .filter(|&node| !used[node] && !state.is_new_node(node))
        .map(|node| state.membership_count(node))
        .min()?;
    Some((min as f64 * (1.0 + epsilon)).floor() as usize)
}

fn best_candidate(state: &ClusterState, partial: &PartialGroup, epsilon: f64) -> Option<Candidate> {
    let position = partial.nodes.len();
    let ceiling = membership_ceiling(state, &partial.used, epsilon);
    let load = state.recovery_load();
    let repair = state.repair_matrix();
    let mut best: Option<Candidate> = None;

    for node in 0..state.node_count() {
        if partial.used[node] {
            continue;
        }
        if state.is_new_node(node) && partial.new_selected >= state.expansion_rate_limit() {
            continue;
        }
        if ceiling.is_some_and(|ceiling| state.membership_count(node) > ceiling) {
            continue;
        }

        let projected: u64 = partial
            .nodes
            .iter()
            .enumerate()
            .map(|(m, &peer)| load.get(node, peer) + repair.cost(position, m))
            .sum();
        let weight = state.weighted_load()[node];

        let better = best.is_none_or(|current| {
            projected < current.load || (projected == current.load && weight < current.weight)
        });
        if better {
            best = Some(Candidate {
                node,
                load: projected,
                weight,
            });
        }
    }

    best
}
