//! Uniform random selection
//!
//! Draws node indices uniformly from `0..N` and rejects duplicates until the
//! group is full. Load and membership are ignored, which makes this the
//! baseline for the greedy strategy.

use crate::cluster::ClusterState;
use crate::group::PlacementGroup;
use ecplace_common::{Error, Result};
use rand::Rng;

/// Draw a placement group for `state` from `rng`
pub fn select<R: Rng + ?Sized>(state: &ClusterState, rng: &mut R) -> Result<PlacementGroup> {
    let node_count = state.node_count();
    let width = state.group_width();
    if width > node_count {
        return Err(Error::InsufficientNodes {
            available: node_count,
            required: width,
        });
    }

    let mut used = vec![false; node_count];
    let mut nodes = Vec::with_capacity(width);
    while nodes.len() < width {
        let node = rng.gen_range(0..node_count);
        if !used[node] {
            used[node] = true;
            nodes.push(node);
        }
    }

    Ok(PlacementGroup::new(nodes))
}
