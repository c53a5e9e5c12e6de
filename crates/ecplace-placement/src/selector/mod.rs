//! Placement-group selection strategies
//!
//! Both strategies read a [`ClusterState`] and return a new
//! [`PlacementGroup`] without changing the state; committing the group is the
//! caller's job ([`ClusterState::insert`]).
//!
//! - **Greedy**: builds the group position by position, keeping per-node data
//!   within a slack band of the least loaded node and picking the candidate
//!   that adds the least recovery load
//! - **Random**: uniform sampling without replacement, the baseline the greedy
//!   strategy is measured against

pub mod greedy;
pub mod random;

use crate::cluster::ClusterState;
use crate::group::PlacementGroup;
use ecplace_common::Result;
use ecplace_common::config::DEFAULT_EPSILON;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement-group selection strategy
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Strategy {
    /// Load-aware greedy selection with data-balance slack `epsilon`
    Greedy { epsilon: f64 },
    /// Uniform random selection
    Random,
}

impl Strategy {
    /// Greedy selection with the default 2% slack
    #[must_use]
    pub const fn greedy() -> Self {
        Self::Greedy {
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Short name used in logs and report headers
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Greedy { .. } => "greedy",
            Self::Random => "random",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::greedy()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the nodes for the next placement group
///
/// `rng` is only drawn from by [`Strategy::Random`].
pub fn select_group<R: Rng + ?Sized>(
    state: &ClusterState,
    strategy: Strategy,
    rng: &mut R,
) -> Result<PlacementGroup> {
    match strategy {
        Strategy::Greedy { epsilon } => greedy::select(state, epsilon),
        Strategy::Random => random::select(state, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecplace_common::ErasureCode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_select_group_does_not_mutate() {
        let mut state = ClusterState::new(12, ErasureCode::rs(4, 3), 1).unwrap();
        state.insert(PlacementGroup::from(vec![0, 1, 2, 3])).unwrap();
        let before = state.clone();

        let mut rng = StdRng::seed_from_u64(7);
        for strategy in [Strategy::greedy(), Strategy::Random] {
            let group = select_group(&state, strategy, &mut rng).unwrap();
            assert_eq!(group.len(), 4);
            assert!(state.validate_group(&group).is_ok());
        }

        assert_eq!(state.recovery_load(), before.recovery_load());
        assert_eq!(state.weighted_load(), before.weighted_load());
        assert_eq!(state.group_count(), 1);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::greedy().to_string(), "greedy");
        assert_eq!(Strategy::Random.name(), "random");
        assert_eq!(Strategy::default(), Strategy::greedy());
    }
}
