//! Precomputed repair-cost table
//!
//! Insertion and greedy selection look up the cost of every position pair of
//! every stripe they touch. The table is built once per cluster so those loops
//! never re-dispatch on the code family.

use crate::repair::repair_cost;
use ecplace_common::{ErasureCode, Result};

/// n x n table of repair costs for one erasure code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairMatrix {
    width: usize,
    /// Row-major, `costs[failed * n + source]`
    costs: Vec<u64>,
}

impl RepairMatrix {
    /// Build the table for a validated code
    pub fn new(code: &ErasureCode) -> Result<Self> {
        code.validate()?;

        let n = code.total_shards;
        let mut costs = Vec::with_capacity(n * n);
        for failed in 0..n {
            for source in 0..n {
                costs.push(repair_cost(code, failed, source));
            }
        }

        Ok(Self { width: n, costs })
    }

    /// Stripe width (n)
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Cost of reading `source` to rebuild `failed`
    ///
    /// # Panics
    /// Panics if either position is not below [`RepairMatrix::width`].
    #[must_use]
    pub fn cost(&self, failed: usize, source: usize) -> u64 {
        assert!(
            failed < self.width() && source < self.width(),
            "stripe position out of range"
        );
        self.costs[failed * self.width() + source]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecplace_common::Error;

    #[test]
    fn test_matrix_matches_cost_function() {
        for code in [
            ErasureCode::RS_14_10,
            ErasureCode::LRC_12_10_2,
            ErasureCode::CLAY_14_10,
        ] {
            let matrix = RepairMatrix::new(&code).unwrap();
            assert_eq!(matrix.width(), code.total_shards);
            for i in 0..code.total_shards {
                for j in 0..code.total_shards {
                    assert_eq!(matrix.cost(i, j), repair_cost(&code, i, j));
                }
            }
        }
    }

    #[test]
    fn test_repair_reads_per_position() {
        let reads = |matrix: &RepairMatrix, failed: usize| -> u64 {
            (0..matrix.width()).map(|source| matrix.cost(failed, source)).sum()
        };

        let rs = RepairMatrix::new(&ErasureCode::rs(6, 4)).unwrap();
        assert_eq!(reads(&rs, 0), 5);

        let lrc = RepairMatrix::new(&ErasureCode::LRC_12_10_2).unwrap();
        // Data fragment reads its 4 group mates
        assert_eq!(reads(&lrc, 3), 4);
        // Global parity reads the 10 data fragments
        assert_eq!(reads(&lrc, 10), 10);
        assert_eq!(lrc.cost(10, 11), 0);
    }

    #[test]
    fn test_invalid_code_rejected() {
        let err = RepairMatrix::new(&ErasureCode::lrc(12, 10, 4)).unwrap_err();
        assert!(matches!(err, Error::InvalidCode(_)));
    }
}
