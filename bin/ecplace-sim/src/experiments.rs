//! Experiment runs
//!
//! Every run starts from its own copy of the initial cluster and its own
//! seeded generator, so compared runs never share state and can execute on
//! separate threads.

use anyhow::{Context, Result, anyhow};
use ecplace_common::SimulationConfig;
use ecplace_placement::{
    BalanceSeries, ClusterState, ExpansionPlan, RecoveryHotspots, Simulation, Strategy,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use tracing::info;

/// Random baseline next to the greedy selector
#[derive(Debug)]
pub struct Comparison {
    pub random: BalanceSeries,
    pub greedy: BalanceSeries,
}

/// Greedy runs with and without one expansion
#[derive(Debug)]
pub struct ExpansionRun {
    pub added: usize,
    pub baseline: BalanceSeries,
    pub expanded: BalanceSeries,
}

fn initial_state(config: &SimulationConfig) -> Result<ClusterState> {
    ClusterState::new(
        config.cluster.nodes,
        config.code,
        config.cluster.expansion_rate_limit,
    )
    .context("Failed to create cluster state")
}

fn run_one(
    state: ClusterState,
    strategy: Strategy,
    config: &SimulationConfig,
    expansion: Option<ExpansionPlan>,
) -> Result<BalanceSeries> {
    let mut rng = StdRng::seed_from_u64(config.run.seed);
    let mut simulation = Simulation::new(state, strategy);
    let series = simulation
        .run(config.run.steps, &mut rng, expansion)
        .with_context(|| format!("{strategy} run failed"))?;

    let strategy = simulation.strategy();
    let state = simulation.into_state();
    let hotspots = RecoveryHotspots::of(&state);
    info!(
        "{} run: {} groups on {} nodes, heaviest rebuild node {} ({} reads), heaviest serving node {} ({} reads)",
        strategy,
        state.group_count(),
        state.node_count(),
        hotspots.rebuild.0,
        hotspots.rebuild.1,
        hotspots.served.0,
        hotspots.served.1
    );
    Ok(series)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>, name: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("{name} run panicked"))?
}

/// Run the random and greedy selectors side by side
pub fn compare(config: &SimulationConfig) -> Result<Comparison> {
    let state = initial_state(config)?;
    let strategy = Strategy::Greedy {
        epsilon: config.placement.epsilon,
    };

    info!(
        "Comparing random and greedy placement: {} nodes, code {}, {} steps",
        config.cluster.nodes, config.code, config.run.steps
    );

    thread::scope(|scope| -> Result<Comparison> {
        let random = scope.spawn(|| run_one(state.clone(), Strategy::Random, config, None));
        let greedy = scope.spawn(|| run_one(state.clone(), strategy, config, None));
        Ok(Comparison {
            random: join(random, "random")?,
            greedy: join(greedy, "greedy")?,
        })
    })
}

/// Run the greedy selector once without expansion and once per configured
/// expansion size
pub fn expand(config: &SimulationConfig) -> Result<Vec<ExpansionRun>> {
    let state = initial_state(config)?;
    let strategy = Strategy::Greedy {
        epsilon: config.placement.epsilon,
    };
    let after_step = config.run.expansion_step();

    info!(
        "Expansion runs: {} nodes, code {}, adding {:?} nodes after step {}",
        config.cluster.nodes, config.code, config.run.expansions, after_step
    );

    thread::scope(|scope| -> Result<Vec<ExpansionRun>> {
        let baseline = scope.spawn(|| run_one(state.clone(), strategy, config, None));
        let expanded: Vec<_> = config
            .run
            .expansions
            .iter()
            .map(|&added| {
                let plan = ExpansionPlan { after_step, added };
                let state = state.clone();
                (added, scope.spawn(move || run_one(state, strategy, config, Some(plan))))
            })
            .collect();

        let baseline = join(baseline, "baseline")?;
        expanded
            .into_iter()
            .map(|(added, handle)| -> Result<ExpansionRun> {
                Ok(ExpansionRun {
                    added,
                    baseline: baseline.clone(),
                    expanded: join(handle, "expansion")?,
                })
            })
            .collect()
    })
}
