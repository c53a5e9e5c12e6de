//! ecplace simulation driver
//!
//! Runs the placement experiments and writes their balance series as CSV:
//!
//! - `compare`: random vs greedy selection on the same initial cluster
//! - `expand`: greedy selection with and without a mid-run expansion
//! - `all`: both

mod experiments;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ecplace_common::{CodeFamily, SimulationConfig};
use report::Column;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ecplace-sim")]
#[command(about = "Erasure-coded placement balance simulator")]
#[command(version)]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of storage nodes
    #[arg(long)]
    nodes: Option<usize>,

    /// Erasure code family (rs, lrc, clay)
    #[arg(long)]
    code: Option<CodeFamily>,

    /// Stripe width (n)
    #[arg(short = 'n', long)]
    total_shards: Option<usize>,

    /// Data fragments per stripe (k)
    #[arg(short = 'k', long)]
    data_shards: Option<usize>,

    /// LRC local groups (l)
    #[arg(short = 'l', long)]
    local_groups: Option<usize>,

    /// Max newly added nodes per placement group (c)
    #[arg(long)]
    rate_limit: Option<usize>,

    /// Placement groups inserted per run
    #[arg(long)]
    steps: Option<usize>,

    /// Random selector seed
    #[arg(long, env = "ECPLACE_SEED")]
    seed: Option<u64>,

    /// Greedy data-balance slack
    #[arg(long)]
    epsilon: Option<f64>,

    /// Directory the CSV reports are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write every n-th step to the reports
    #[arg(long)]
    stride: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare random and greedy selection
    Compare,
    /// Greedy selection with a mid-run expansion
    Expand {
        /// Nodes to add, one run per value
        #[arg(long, value_delimiter = ',')]
        added: Vec<usize>,

        /// Step after which the cluster grows (default: steps / 2)
        #[arg(long)]
        after: Option<usize>,
    },
    /// Run every experiment
    All,
}

impl Args {
    /// Load the configuration file, if any, and apply command-line overrides
    fn build_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(nodes) = self.nodes {
            config.cluster.nodes = nodes;
        }
        if let Some(family) = self.code {
            config.code.family = family;
        }
        if let Some(n) = self.total_shards {
            config.code.total_shards = n;
        }
        if let Some(k) = self.data_shards {
            config.code.data_shards = k;
        }
        if let Some(l) = self.local_groups {
            config.code.local_groups = l;
        }
        if let Some(c) = self.rate_limit {
            config.cluster.expansion_rate_limit = c;
        }
        if let Some(steps) = self.steps {
            config.run.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.run.seed = seed;
        }
        if let Some(epsilon) = self.epsilon {
            config.placement.epsilon = epsilon;
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir.clone_from(dir);
        }
        if let Some(stride) = self.stride {
            config.report.stride = stride;
        }
        if let Commands::Expand { added, after } = &self.command {
            if !added.is_empty() {
                config.run.expansions.clone_from(added);
            }
            if after.is_some() {
                config.run.expand_after = *after;
            }
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn run_compare(config: &SimulationConfig) -> Result<()> {
    let result = experiments::compare(config)?;
    let dir = &config.report.output_dir;
    let stride = config.report.stride;

    report::write_file(
        &dir.join("data_spread.csv"),
        &[
            Column::new("random", &result.random.data_spread),
            Column::new("greedy", &result.greedy.data_spread),
        ],
        stride,
    )?;
    report::write_file(
        &dir.join("load_spread.csv"),
        &[
            Column::new("random", &result.random.load_spread),
            Column::new("greedy", &result.greedy.load_spread),
        ],
        stride,
    )?;

    if let (Some(random), Some(greedy)) = (result.random.last(), result.greedy.last()) {
        info!(
            "Final data spread: random {:.3}, greedy {:.3}",
            random.data_spread, greedy.data_spread
        );
        info!(
            "Final load spread: random {:.3}, greedy {:.3}",
            random.load_spread, greedy.load_spread
        );
    }
    Ok(())
}

fn run_expand(config: &SimulationConfig) -> Result<()> {
    let runs = experiments::expand(config)?;
    let dir = &config.report.output_dir;

    for run in &runs {
        report::write_file(
            &dir.join(format!("load_spread_expand_{}.csv", run.added)),
            &[
                Column::new("greedy", &run.baseline.load_spread),
                Column::new("greedy_expanded", &run.expanded.load_spread),
            ],
            config.report.stride,
        )?;

        if let Some(last) = run.expanded.last() {
            info!(
                "Expansion by {} node(s): final load spread {:.3}",
                run.added, last.load_spread
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.build_config()?;
    std::fs::create_dir_all(&config.report.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.report.output_dir.display()
        )
    })?;

    info!(
        "Simulating {} nodes with {}, c={}, epsilon={}, seed={}",
        config.cluster.nodes,
        config.code,
        config.cluster.expansion_rate_limit,
        config.placement.epsilon,
        config.run.seed
    );

    match args.command {
        Commands::Compare => run_compare(&config)?,
        Commands::Expand { .. } => run_expand(&config)?,
        Commands::All => {
            run_compare(&config)?;
            run_expand(&config)?;
        }
    }

    info!("Reports written to {}", config.report.output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecplace_common::ErasureCode;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ecplace-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = parse(&["compare"]).build_config().unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_code_overrides() {
        let config = parse(&["--code", "lrc", "-n", "12", "-k", "10", "-l", "2", "compare"])
            .build_config()
            .unwrap();
        assert_eq!(config.code, ErasureCode::LRC_12_10_2);
    }

    #[test]
    fn test_expand_overrides() {
        let config = parse(&["--steps", "200", "expand", "--added", "3,5", "--after", "50"])
            .build_config()
            .unwrap();
        assert_eq!(config.run.expansions, vec![3, 5]);
        assert_eq!(config.run.expansion_step(), 50);
    }

    #[test]
    fn test_config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        std::fs::write(&path, "[cluster]\nnodes = 40\n\n[run]\nseed = 9\n").unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--seed", "11", "all"])
            .build_config()
            .unwrap();
        assert_eq!(config.cluster.nodes, 40);
        assert_eq!(config.run.seed, 11);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = parse(&["--nodes", "5", "compare"]).build_config().unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_reports_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let config = parse(&[
            "--nodes", "20", "-n", "6", "-k", "4", "--steps", "30", "--output-dir", out, "expand",
            "--added", "2",
        ])
        .build_config()
        .unwrap();

        run_compare(&config).unwrap();
        run_expand(&config).unwrap();

        for name in ["data_spread.csv", "load_spread.csv", "load_spread_expand_2.csv"] {
            let text = std::fs::read_to_string(dir.path().join(name)).unwrap();
            // Header plus steps 0, 10 and 20
            assert_eq!(text.lines().count(), 4, "{name}");
        }
    }
}
