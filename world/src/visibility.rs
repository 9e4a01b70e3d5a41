//! Per-cell visibility storage with chunk-level structural sharing.

use std::sync::Arc;

use jewel_sweep_core::{BoardDimensions, CellId, Visibility};

/// Number of cells held by one shared chunk, independent of board shape.
const CHUNK_CELLS: usize = 1024;

/// Dense visibility map split into fixed-size copy-on-write chunks.
///
/// Cloning the map only clones chunk handles. Writing to a cell copies the
/// touched chunk if it is still shared, so earlier frames never observe the
/// write. A fresh map holds a single chunk allocation however large the board.
#[derive(Clone, PartialEq, Eq)]
pub struct VisibilityMap {
    dimensions: BoardDimensions,
    cell_count: usize,
    chunks: Vec<Arc<Vec<Visibility>>>,
}

impl VisibilityMap {
    /// Creates a map with every cell [`Visibility::Unknown`].
    #[must_use]
    pub fn unknown(dimensions: BoardDimensions) -> Self {
        let cell_count = usize::try_from(dimensions.cell_count()).unwrap_or(usize::MAX);
        let chunk = Arc::new(vec![Visibility::Unknown; CHUNK_CELLS]);
        Self {
            dimensions,
            cell_count,
            chunks: vec![chunk; cell_count.div_ceil(CHUNK_CELLS)],
        }
    }

    /// Visibility of a cell. Identifiers outside the board read as unknown.
    #[must_use]
    pub fn get(&self, cell: CellId) -> Visibility {
        if cell.index() >= self.cell_count {
            return Visibility::Unknown;
        }
        let (chunk, offset) = split(cell);
        self.chunks
            .get(chunk)
            .and_then(|values| values.get(offset))
            .copied()
            .unwrap_or_default()
    }

    /// Marks the cell as known to hold no uncollected jewel.
    pub fn confirm(&mut self, cell: CellId) {
        self.raise(cell, Visibility::Confirmed);
    }

    /// Raises the cell to at least `level`; never lowers it.
    pub fn raise(&mut self, cell: CellId, level: Visibility) {
        if cell.index() >= self.cell_count || self.get(cell) >= level {
            return;
        }
        let (chunk, offset) = split(cell);
        if let Some(values) = self.chunks.get_mut(chunk) {
            if let Some(value) = Arc::make_mut(values).get_mut(offset) {
                *value = level;
            }
        }
    }

    /// Iterator over every cell and its visibility in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, Visibility)> + '_ {
        self.chunks
            .iter()
            .flat_map(|values| values.iter().copied())
            .take(self.cell_count)
            .enumerate()
            .map(|(index, value)| (CellId::new(index as u32), value))
    }

    /// Number of cells at exactly `level`.
    #[must_use]
    pub fn count(&self, level: Visibility) -> usize {
        self.iter().filter(|(_, value)| *value == level).count()
    }
}

fn split(cell: CellId) -> (usize, usize) {
    (cell.index() / CHUNK_CELLS, cell.index() % CHUNK_CELLS)
}

impl std::fmt::Debug for VisibilityMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityMap")
            .field("dimensions", &self.dimensions)
            .field("confirmed", &self.count(Visibility::Confirmed))
            .field("possible", &self.count(Visibility::Possible))
            .finish_non_exhaustive()
    }
}
