//! Per-family repair cost
//!
//! All functions take fragment positions within a stripe (`0..n`), never node
//! indices, and return the unit cost of reading fragment `source` while
//! rebuilding fragment `failed`. A fragment never repairs itself, so
//! `failed == source` always costs 0.

use ecplace_common::{CodeFamily, ErasureCode};

/// Repair cost of `source` for `failed` under `code`
#[must_use]
pub fn repair_cost(code: &ErasureCode, failed: usize, source: usize) -> u64 {
    match code.family {
        CodeFamily::Rs => rs_repair_cost(code.total_shards, code.data_shards, failed, source),
        CodeFamily::Lrc => lrc_repair_cost(
            code.total_shards,
            code.data_shards,
            code.local_groups,
            failed,
            source,
        ),
        CodeFamily::Clay => clay_repair_cost(code.total_shards, code.data_shards, failed, source),
    }
}

/// RS(n,k): every other fragment is read
#[must_use]
pub const fn rs_repair_cost(_n: usize, _k: usize, failed: usize, source: usize) -> u64 {
    if failed == source { 0 } else { 1 }
}

/// LRC(n,k,l) with `l` contiguous local groups of `k / l` fragments
///
/// Position `x` belongs to group `x / (k / l)`. A fragment in one of the `l`
/// local groups reads only its group mates. Positions whose group index is
/// exactly `l` form the global-parity region and read every fragment outside
/// that region instead.
///
/// An LRC without usable local groups (`l == 0` or `k < l`) degenerates to RS.
#[must_use]
pub fn lrc_repair_cost(n: usize, k: usize, l: usize, failed: usize, source: usize) -> u64 {
    if failed == source {
        return 0;
    }
    let Some(group_size) = k.checked_div(l).filter(|&size| size > 0) else {
        return rs_repair_cost(n, k, failed, source);
    };

    let failed_group = failed / group_size;
    let source_group = source / group_size;
    let same_group = failed_group == source_group;

    if failed_group == l {
        u64::from(!same_group)
    } else {
        u64::from(same_group)
    }
}

/// Clay(n,k): same unified model as RS
#[must_use]
pub const fn clay_repair_cost(n: usize, k: usize, failed: usize, source: usize) -> u64 {
    rs_repair_cost(n, k, failed, source)
}
