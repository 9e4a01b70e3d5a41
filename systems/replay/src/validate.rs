//! Semantic checks applied to a parsed board before replay.

use std::collections::BTreeSet;

use jewel_sweep_core::{BoardDimensions, CellId, Position};
use jewel_sweep_parser::BoardDescription;

/// Reasons a syntactically valid board cannot be replayed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Height or width is zero, negative or too large.
    #[error("board dimensions {height}x{width} must be positive 32-bit integers")]
    NonPositiveDimensions {
        /// Declared height.
        height: i64,
        /// Declared width.
        width: i64,
    },
    /// The board has more cells than can be addressed.
    #[error("board {height}x{width} has too many cells")]
    TooManyCells {
        /// Declared height.
        height: u32,
        /// Declared width.
        width: u32,
    },
    /// A jewel lies outside `[0, H) x [0, W)`.
    #[error("jewel #{index} at ({}, {}) is outside the board", .position.row(), .position.column())]
    JewelOutOfBounds {
        /// Zero-based index of the jewel line.
        index: usize,
        /// Declared position.
        position: Position,
    },
    /// Two jewel lines name the same cell.
    #[error("jewel #{index} at ({}, {}) duplicates an earlier jewel", .position.row(), .position.column())]
    DuplicateJewel {
        /// Zero-based index of the repeated jewel line.
        index: usize,
        /// Declared position.
        position: Position,
    },
}

/// Checks dimensions and jewel placement, returning the linearized jewel set.
pub(crate) fn validate_board(
    board: &BoardDescription,
) -> Result<(BoardDimensions, BTreeSet<CellId>), BoardError> {
    let dimensions = match (u32::try_from(board.height()), u32::try_from(board.width())) {
        (Ok(height), Ok(width)) if height > 0 && width > 0 => BoardDimensions::new(height, width),
        _ => {
            return Err(BoardError::NonPositiveDimensions {
                height: board.height(),
                width: board.width(),
            })
        }
    };
    if u32::try_from(dimensions.cell_count()).is_err() {
        return Err(BoardError::TooManyCells {
            height: dimensions.height(),
            width: dimensions.width(),
        });
    }

    let mut jewels = BTreeSet::new();
    for (index, &position) in board.jewels().iter().enumerate() {
        let Some(cell) = dimensions.cell_id(position) else {
            return Err(BoardError::JewelOutOfBounds { index, position });
        };
        if !jewels.insert(cell) {
            return Err(BoardError::DuplicateJewel { index, position });
        }
    }

    Ok((dimensions, jewels))
}
