//! Pairwise recovery-load graph

use ecplace_common::NodeIndex;

/// Square matrix of accumulated repair reads between nodes
///
/// `get(i, j)` is the total read cost node `j` serves when node `i` fails,
/// summed over every placement group both belong to. Storage is row-major and
/// always `dim * dim` cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadMatrix {
    dim: usize,
    cells: Vec<u64>,
}

impl LoadMatrix {
    /// Create a zeroed `dim x dim` matrix
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![0; dim * dim],
        }
    }

    /// Number of rows (and columns)
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Load on `source` when `failed` is rebuilt
    #[must_use]
    pub fn get(&self, failed: NodeIndex, source: NodeIndex) -> u64 {
        self.cells[failed * self.dim + source]
    }

    /// Loads served by every node when `failed` is rebuilt
    #[must_use]
    pub fn row(&self, failed: NodeIndex) -> &[u64] {
        &self.cells[failed * self.dim..(failed + 1) * self.dim]
    }

    /// All cells, row-major
    #[must_use]
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Total reads needed to rebuild everything on `failed`
    #[must_use]
    pub fn rebuild_reads(&self, failed: NodeIndex) -> u64 {
        self.row(failed).iter().sum()
    }

    /// Total reads `source` serves across the failure of every other node
    #[must_use]
    pub fn served_reads(&self, source: NodeIndex) -> u64 {
        (0..self.dim).map(|failed| self.get(failed, source)).sum()
    }

    pub(crate) fn add(&mut self, failed: NodeIndex, source: NodeIndex, cost: u64) {
        self.cells[failed * self.dim + source] += cost;
    }

    /// Resize to `dim x dim`, keeping existing cells in the top-left corner
    pub(crate) fn grow(&mut self, dim: usize) {
        if dim <= self.dim {
            return;
        }
        let mut cells = vec![0; dim * dim];
        for (row, old) in self.cells.chunks_exact(self.dim.max(1)).enumerate() {
            cells[row * dim..row * dim + old.len()].copy_from_slice(old);
        }
        self.dim = dim;
        self.cells = cells;
    }
}
