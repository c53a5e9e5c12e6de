//! Simulation runner
//!
//! A [`Simulation`] owns one [`ClusterState`] and repeatedly selects, inserts
//! and measures. Runs that should be compared each get their own simulation;
//! nothing is shared between them.

use crate::cluster::ClusterState;
use crate::selector::{Strategy, select_group};
use crate::stats::BalanceSnapshot;
use ecplace_common::{PgId, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Grow the cluster once during a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionPlan {
    /// Step (0-based) after whose snapshot the cluster grows
    pub after_step: usize,
    /// Nodes to add
    pub added: usize,
}

/// Balance metrics recorded after every step of a run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSeries {
    /// Data spread per step
    pub data_spread: Vec<f64>,
    /// Recovery-load spread per step
    pub load_spread: Vec<f64>,
}

impl BalanceSeries {
    /// Create an empty series with room for `steps` entries
    #[must_use]
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            data_spread: Vec::with_capacity(steps),
            load_spread: Vec::with_capacity(steps),
        }
    }

    /// Append one step
    pub fn push(&mut self, snapshot: BalanceSnapshot) {
        self.data_spread.push(snapshot.data_spread);
        self.load_spread.push(snapshot.load_spread);
    }

    /// Number of recorded steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.data_spread.len()
    }

    /// Whether no step was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_spread.is_empty()
    }

    /// Metrics of the last recorded step
    #[must_use]
    pub fn last(&self) -> Option<BalanceSnapshot> {
        Some(BalanceSnapshot {
            data_spread: *self.data_spread.last()?,
            load_spread: *self.load_spread.last()?,
        })
    }
}

/// One placement run over a private cluster state
#[derive(Clone, Debug)]
pub struct Simulation {
    state: ClusterState,
    strategy: Strategy,
}

impl Simulation {
    /// Start a run on `state`
    #[must_use]
    pub const fn new(state: ClusterState, strategy: Strategy) -> Self {
        Self { state, strategy }
    }

    /// Current cluster state
    #[must_use]
    pub const fn state(&self) -> &ClusterState {
        &self.state
    }

    /// Selection strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// End the run and keep the final state
    #[must_use]
    pub fn into_state(self) -> ClusterState {
        self.state
    }

    /// Select and insert one placement group, then measure
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(PgId, BalanceSnapshot)> {
        let group = select_group(&self.state, self.strategy, rng)?;
        let id = self.state.insert(group)?;
        Ok((id, BalanceSnapshot::of(&self.state)))
    }

    /// Run `steps` steps, expanding the cluster once if `expansion` is set
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        steps: usize,
        rng: &mut R,
        expansion: Option<ExpansionPlan>,
    ) -> Result<BalanceSeries> {
        info!(
            "Running {} steps with {} strategy on {} nodes, code {}",
            steps,
            self.strategy,
            self.state.node_count(),
            self.state.code()
        );

        let mut series = BalanceSeries::with_capacity(steps);
        for step in 0..steps {
            let (id, snapshot) = self.step(rng)?;
            series.push(snapshot);

            if let Some(plan) = expansion.filter(|plan| plan.after_step == step) {
                self.state.expand(plan.added)?;
            }
            debug!(
                "Step {}: {} data spread {:.3} load spread {:.3}",
                step, id, snapshot.data_spread, snapshot.load_spread
            );
        }

        if let Some(last) = series.last() {
            info!(
                "Finished {} run: data spread {:.3}, load spread {:.3}",
                self.strategy, last.data_spread, last.load_spread
            );
        }
        Ok(series)
    }
}
