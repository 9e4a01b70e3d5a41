#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Jewel Sweep replay engine.
//!
//! This crate defines the value types that connect the parser, the frame
//! transition rule, the replay engine and the read-only adapters. Boards are
//! addressed by signed [`Position`] values so that moves which leave the grid
//! remain representable; only in-bounds positions are ever linearized into a
//! [`CellId`].

use serde::{Deserialize, Serialize};

/// Location of the player or of a sensed cell, expressed as row and column.
///
/// Positions are signed because a permitted move may walk off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i64,
    column: i64,
}

impl Position {
    /// Top-left cell where every replay starts.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new position.
    #[must_use]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i64 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i64 {
        self.column
    }

    /// Returns the position displaced by the provided offset.
    #[must_use]
    pub const fn offset_by(self, offset: Offset) -> Self {
        Self {
            row: self.row.saturating_add(offset.row()),
            column: self.column.saturating_add(offset.column()),
        }
    }

    /// Returns the position reached after a single step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset_by(direction.delta())
    }
}

/// Relative displacement between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offset {
    row: i64,
    column: i64,
}

impl Offset {
    /// Creates a new offset from row and column deltas.
    #[must_use]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Row delta.
    #[must_use]
    pub const fn row(&self) -> i64 {
        self.row
    }

    /// Column delta.
    #[must_use]
    pub const fn column(&self) -> i64 {
        self.column
    }
}

/// Linearized identifier of an in-bounds board cell (`row * width + column`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier as an index into dense per-cell storage.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Height and width of the rectangular board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDimensions {
    height: u32,
    width: u32,
}

impl BoardDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Total number of cells, computed without overflow.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.height as u64 * self.width as u64
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row() >= 0
            && position.column() >= 0
            && position.row() < self.height as i64
            && position.column() < self.width as i64
    }

    /// Linearizes an in-bounds position into its cell identifier.
    ///
    /// Returns `None` for positions off the board or when the board is too
    /// large for the identifier space.
    #[must_use]
    pub fn cell_id(&self, position: Position) -> Option<CellId> {
        if !self.contains(position) {
            return None;
        }
        let row = u64::try_from(position.row()).ok()?;
        let column = u64::try_from(position.column()).ok()?;
        let linear = row * u64::from(self.width) + column;
        u32::try_from(linear).ok().map(CellId::new)
    }
}

/// Cardinal movement commands available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices (`U`).
    Up,
    /// Movement toward increasing row indices (`D`).
    Down,
    /// Movement toward decreasing column indices (`L`).
    Left,
    /// Movement toward increasing column indices (`R`).
    Right,
}

impl Direction {
    /// Every direction in script-symbol order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit displacement applied by the command.
    #[must_use]
    pub const fn delta(self) -> Offset {
        match self {
            Self::Up => Offset::new(-1, 0),
            Self::Down => Offset::new(1, 0),
            Self::Left => Offset::new(0, -1),
            Self::Right => Offset::new(0, 1),
        }
    }

    /// Single-letter symbol used by action scripts.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// Parses a script token. Only the exact upper-case letters are accepted.
    #[must_use]
    pub fn from_symbol(token: &str) -> Option<Self> {
        match token {
            "U" => Some(Self::Up),
            "D" => Some(Self::Down),
            "L" => Some(Self::Left),
            "R" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Confidence the observer has about the contents of a cell.
///
/// The derived ordering is `Unknown < Possible < Confirmed`; a cell's value
/// never decreases over the course of a replay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Visibility {
    /// Nothing is known about the cell.
    #[default]
    Unknown = 0,
    /// The sensor reported a jewel somewhere in a footprint covering the cell.
    Possible = 1,
    /// The cell is known to be free of uncollected jewels.
    Confirmed = 2,
}

impl Visibility {
    /// Numeric level (`0`, `1` or `2`).
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }
}

/// Fixed list of relative offsets checked around the player after each move.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorPattern {
    offsets: Vec<Offset>,
}

impl SensorPattern {
    /// Creates a pattern from offsets in declaration order.
    #[must_use]
    pub fn new(offsets: Vec<Offset>) -> Self {
        Self { offsets }
    }

    /// Offsets in declaration order.
    #[must_use]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Number of declared offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Reports whether the pattern declares no offsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Absolute in-bounds cells covered by the pattern around `center`.
    pub fn footprint(
        &self,
        center: Position,
        dimensions: BoardDimensions,
    ) -> impl Iterator<Item = CellId> + '_ {
        self.offsets
            .iter()
            .filter_map(move |offset| dimensions.cell_id(center.offset_by(*offset)))
    }
}

/// Ordered movement commands, one per replay step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandSequence {
    directions: Vec<Direction>,
}

impl CommandSequence {
    /// Creates a command sequence from directions in execution order.
    #[must_use]
    pub fn new(directions: Vec<Direction>) -> Self {
        Self { directions }
    }

    /// Directions in execution order.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of replay steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Reports whether the script contains no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// How the replay treats a command that would move the player off the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePolicy {
    /// Abort the replay with an out-of-bounds error.
    #[default]
    Reject,
    /// Apply the move; the player collects and confirms nothing while off the board.
    Permit,
}

/// What the sensor announced after a single move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepReport {
    /// A jewel was picked up on entering the cell.
    pub collected: bool,
    /// At least one in-bounds pattern cell still holds a jewel.
    pub close: bool,
}
