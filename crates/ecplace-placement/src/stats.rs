//! Balance statistics
//!
//! Both metrics are population variances (divided by the count, not by
//! count - 1) over the current state and never change it.

use crate::cluster::ClusterState;
use ecplace_common::NodeIndex;
use serde::{Deserialize, Serialize};

/// Population variance of `values`, 0.0 for an empty population
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_variance<I>(values: I) -> f64
where
    I: IntoIterator<Item = u64>,
{
    // Welford's single-pass update
    let mut count = 0_u64;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for value in values {
        count += 1;
        let x = value as f64;
        let delta = x - mean;
        mean += delta / count as f64;
        m2 += delta * (x - mean);
    }

    if count == 0 { 0.0 } else { m2 / count as f64 }
}

/// Spread of the recovery-load graph
///
/// Every cell of the N x N matrix counts, including the zero diagonal and
/// pairs that share no placement group.
#[must_use]
pub fn recovery_load_spread(state: &ClusterState) -> f64 {
    population_variance(state.recovery_load().cells().iter().copied())
}

/// Spread of the number of placement groups per node
#[must_use]
pub fn data_spread(state: &ClusterState) -> f64 {
    population_variance(state.membership_counts().map(|count| count as u64))
}

/// Both balance metrics at one point of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Variance of per-node placement-group counts
    pub data_spread: f64,
    /// Variance of the recovery-load graph
    pub load_spread: f64,
}

impl BalanceSnapshot {
    /// Measure `state`
    #[must_use]
    pub fn of(state: &ClusterState) -> Self {
        Self {
            data_spread: data_spread(state),
            load_spread: recovery_load_spread(state),
        }
    }
}

/// Nodes carrying the most recovery traffic
///
/// Ties go to the lower node index. On a cluster without load both entries
/// are node 0 with 0 reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryHotspots {
    /// Node whose rebuild reads the most, and that total
    pub rebuild: (NodeIndex, u64),
    /// Node read from the most while other nodes rebuild, and that total
    pub served: (NodeIndex, u64),
}

impl RecoveryHotspots {
    /// Find the busiest nodes of `state`
    #[must_use]
    pub fn of(state: &ClusterState) -> Self {
        let load = state.recovery_load();
        Self {
            rebuild: heaviest(load.dim(), |node| load.rebuild_reads(node)),
            served: heaviest(load.dim(), |node| load.served_reads(node)),
        }
    }
}

fn heaviest(node_count: usize, reads: impl Fn(NodeIndex) -> u64) -> (NodeIndex, u64) {
    (0..node_count).fold((0, 0), |best, node| {
        let total = reads(node);
        if total > best.1 { (node, total) } else { best }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::PlacementGroup;
    use ecplace_common::ErasureCode;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_population_variance() {
        assert!(approx_eq(population_variance([1, 1, 0, 0]), 0.25));
        assert!(approx_eq(population_variance([2, 4, 4, 4, 5, 5, 7, 9]), 4.0));
        assert!(approx_eq(population_variance([3, 3, 3]), 0.0));
        assert!(approx_eq(population_variance(std::iter::empty()), 0.0));
    }

    #[test]
    fn test_end_to_end_small_cluster() {
        let mut state = ClusterState::new(4, ErasureCode::rs(2, 2), 1).unwrap();
        assert!(approx_eq(data_spread(&state), 0.0));
        assert!(approx_eq(recovery_load_spread(&state), 0.0));

        state.insert(PlacementGroup::from(vec![0, 1])).unwrap();

        assert_eq!(state.recovery_load().get(0, 1), 1);
        assert_eq!(state.recovery_load().get(1, 0), 1);
        assert!(approx_eq(data_spread(&state), 0.25));
        // Two ones among 16 cells: mean 1/8, variance 1/8 - 1/64
        assert!(approx_eq(recovery_load_spread(&state), 7.0 / 64.0));
    }

    #[test]
    fn test_snapshot_matches_metrics() {
        let mut state = ClusterState::new(6, ErasureCode::rs(3, 2), 1).unwrap();
        state.insert(PlacementGroup::from(vec![0, 2, 4])).unwrap();

        let snapshot = BalanceSnapshot::of(&state);
        assert!(approx_eq(snapshot.data_spread, data_spread(&state)));
        assert!(approx_eq(snapshot.load_spread, recovery_load_spread(&state)));
    }

    #[test]
    fn test_spread_counts_new_nodes() {
        let mut state = ClusterState::new(4, ErasureCode::rs(2, 1), 1).unwrap();
        state.insert(PlacementGroup::from(vec![0, 1])).unwrap();
        state.insert(PlacementGroup::from(vec![2, 3])).unwrap();
        assert!(approx_eq(data_spread(&state), 0.0));

        state.expand(4).unwrap();
        // Counts [1, 1, 1, 1, 0, 0, 0, 0]
        assert!(approx_eq(data_spread(&state), 0.25));
        assert_eq!(state.recovery_load().cells().len(), 64);
    }

    #[test]
    fn test_recovery_hotspots() {
        let mut state = ClusterState::new(6, ErasureCode::lrc(4, 2, 1), 1).unwrap();
        assert_eq!(RecoveryHotspots::of(&state), RecoveryHotspots::default());

        // Positions 0 and 1 read each other; 2 and 3 read both data positions
        state.insert(PlacementGroup::from(vec![5, 3, 1, 0])).unwrap();
        let hotspots = RecoveryHotspots::of(&state);
        assert_eq!(hotspots.rebuild, (0, 2));
        assert_eq!(hotspots.served, (3, 3));
    }
}
