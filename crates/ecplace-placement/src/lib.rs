//! ecplace Placement - Recovery-load aware placement-group selection
//!
//! This crate decides which nodes host each stripe of an erasure-coded
//! cluster so that both the data per node and the load of rebuilding a failed
//! node stay balanced.
//!
//! # Components
//!
//! - [`ClusterState`]: recovery-load graph, weighted load, per-node
//!   membership and expansion bookkeeping
//! - [`select_group`]: greedy load-aware or uniform random selection
//! - [`stats`]: population variance of the load graph and of per-node data,
//!   and the nodes carrying the most recovery traffic
//! - [`Simulation`]: select, insert and measure in a loop
//!
//! # Example
//!
//! ```
//! use ecplace_common::ErasureCode;
//! use ecplace_placement::{ClusterState, Strategy, data_spread, select_group};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut state = ClusterState::new(20, ErasureCode::rs(6, 4), 1).unwrap();
//! let mut rng = StdRng::seed_from_u64(0);
//! for _ in 0..10 {
//!     let group = select_group(&state, Strategy::greedy(), &mut rng).unwrap();
//!     state.insert(group).unwrap();
//! }
//! assert_eq!(data_spread(&state), 0.0);
//! ```

pub mod cluster;
pub mod group;
pub mod load;
pub mod selector;
pub mod simulation;
pub mod stats;

pub use cluster::ClusterState;
pub use group::PlacementGroup;
pub use load::LoadMatrix;
pub use selector::{Strategy, select_group};
pub use simulation::{BalanceSeries, ExpansionPlan, Simulation};
pub use stats::{
    BalanceSnapshot, RecoveryHotspots, data_spread, population_variance, recovery_load_spread,
};
