#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable replay frames and the Jewel Sweep transition rule.
//!
//! A [`ReplayFrame`] is one snapshot of the game: player position, remaining
//! jewels and what the observer knows about every cell. Frames are built
//! either as the [initial](ReplayFrame::initial) frame of a replay or as the
//! [successor](ReplayFrame::successor) of an existing frame, and are never
//! mutated afterwards. Successors share unchanged state with their
//! predecessor through [`Arc`], copying only what the move touches.

mod visibility;

use std::{collections::BTreeSet, fmt, sync::Arc};

use jewel_sweep_core::{
    BoardDimensions, CellId, Direction, MovePolicy, Position, SensorPattern, StepReport,
    Visibility,
};

pub use visibility::VisibilityMap;

/// Static configuration shared by every frame of a replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaySetup {
    dimensions: BoardDimensions,
    pattern: SensorPattern,
}

impl ReplaySetup {
    /// Creates a setup from validated board dimensions and a sensor pattern.
    #[must_use]
    pub fn new(dimensions: BoardDimensions, pattern: SensorPattern) -> Self {
        Self {
            dimensions,
            pattern,
        }
    }

    /// Board dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    /// Sensor pattern applied after every move.
    #[must_use]
    pub fn pattern(&self) -> &SensorPattern {
        &self.pattern
    }
}

/// A move that would leave the board while [`MovePolicy::Reject`] is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "step {step}: moving {direction:?} from ({}, {}) leaves the board",
    .from.row(),
    .from.column()
)]
pub struct OutOfBoundsMove {
    /// Age of the frame the move would have produced.
    pub step: usize,
    /// Position before the move.
    pub from: Position,
    /// Offending command.
    pub direction: Direction,
}

/// One immutable snapshot of the replay.
pub struct ReplayFrame {
    setup: Arc<ReplaySetup>,
    predecessor: Option<Arc<ReplayFrame>>,
    age: usize,
    position: Position,
    command: Option<Direction>,
    report: Option<StepReport>,
    jewels: Arc<BTreeSet<CellId>>,
    visibility: VisibilityMap,
}

impl ReplayFrame {
    /// Builds the frame at age zero: player at the origin, every jewel in
    /// place, every cell unknown.
    #[must_use]
    pub fn initial(setup: Arc<ReplaySetup>, jewels: BTreeSet<CellId>) -> Self {
        let visibility = VisibilityMap::unknown(setup.dimensions());
        Self {
            setup,
            predecessor: None,
            age: 0,
            position: Position::ORIGIN,
            command: None,
            report: None,
            jewels: Arc::new(jewels),
            visibility,
        }
    }

    /// Applies `direction` to `previous` and returns the resulting frame.
    ///
    /// The player moves one cell and collects the jewel it lands on. The
    /// sensor then checks every in-bounds pattern cell: if none holds a jewel
    /// the whole footprint becomes [`Visibility::Confirmed`], otherwise each
    /// footprint cell is raised to at least [`Visibility::Possible`]. The
    /// player's own cell is always confirmed.
    pub fn successor(
        previous: &Arc<ReplayFrame>,
        direction: Direction,
        policy: MovePolicy,
    ) -> Result<Self, OutOfBoundsMove> {
        let setup = Arc::clone(&previous.setup);
        let dimensions = setup.dimensions();
        let age = previous.age + 1;
        let position = previous.position.step(direction);
        let cell = dimensions.cell_id(position);

        if cell.is_none() && policy == MovePolicy::Reject {
            return Err(OutOfBoundsMove {
                step: age,
                from: previous.position,
                direction,
            });
        }

        let mut jewels = Arc::clone(&previous.jewels);
        let collected = match cell {
            Some(cell) if jewels.contains(&cell) => Arc::make_mut(&mut jewels).remove(&cell),
            _ => false,
        };

        let close = setup
            .pattern()
            .footprint(position, dimensions)
            .any(|sensed| jewels.contains(&sensed));

        let mut visibility = previous.visibility.clone();
        if let Some(cell) = cell {
            visibility.confirm(cell);
        }
        let level = if close {
            Visibility::Possible
        } else {
            Visibility::Confirmed
        };
        for sensed in setup.pattern().footprint(position, dimensions) {
            visibility.raise(sensed, level);
        }

        Ok(Self {
            setup,
            predecessor: Some(Arc::clone(previous)),
            age,
            position,
            command: Some(direction),
            report: Some(StepReport { collected, close }),
            jewels,
            visibility,
        })
    }

    /// Step index; zero for the initial frame.
    #[must_use]
    pub const fn age(&self) -> usize {
        self.age
    }

    /// Player position, possibly off the board under [`MovePolicy::Permit`].
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Cell occupied by the player, if the player is on the board.
    #[must_use]
    pub fn cell(&self) -> Option<CellId> {
        self.dimensions().cell_id(self.position)
    }

    /// Command that produced this frame.
    #[must_use]
    pub const fn command(&self) -> Option<Direction> {
        self.command
    }

    /// Index of [`ReplayFrame::command`] within the command sequence.
    #[must_use]
    pub const fn command_index(&self) -> Option<usize> {
        match self.command {
            Some(_) => Some(self.age - 1),
            None => None,
        }
    }

    /// Sensor announcement for the move that produced this frame.
    #[must_use]
    pub const fn report(&self) -> Option<StepReport> {
        self.report
    }

    /// Jewels not yet collected.
    #[must_use]
    pub fn remaining_jewels(&self) -> &BTreeSet<CellId> {
        &self.jewels
    }

    /// Reports whether an uncollected jewel lies at `position`.
    #[must_use]
    pub fn jewel_at(&self, position: Position) -> bool {
        self.dimensions()
            .cell_id(position)
            .is_some_and(|cell| self.jewels.contains(&cell))
    }

    /// Reports whether every jewel has been collected.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.jewels.is_empty()
    }

    /// Visibility of every cell.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    /// Visibility of the cell at `position`, or `None` off the board.
    #[must_use]
    pub fn visibility_at(&self, position: Position) -> Option<Visibility> {
        self.dimensions()
            .cell_id(position)
            .map(|cell| self.visibility.get(cell))
    }

    /// In-bounds cells covered by the sensor around the player.
    #[must_use]
    pub fn sensor_cells(&self) -> Vec<CellId> {
        self.setup
            .pattern()
            .footprint(self.position, self.dimensions())
            .collect()
    }

    /// Frame this one was derived from.
    #[must_use]
    pub fn predecessor(&self) -> Option<&Arc<ReplayFrame>> {
        self.predecessor.as_ref()
    }

    /// Board dimensions shared by every frame of the replay.
    #[must_use]
    pub fn dimensions(&self) -> BoardDimensions {
        self.setup.dimensions()
    }

    /// Sensor pattern shared by every frame of the replay.
    #[must_use]
    pub fn pattern(&self) -> &SensorPattern {
        self.setup.pattern()
    }

    /// Static setup shared by every frame of the replay.
    #[must_use]
    pub fn setup(&self) -> &Arc<ReplaySetup> {
        &self.setup
    }
}

/// Frames compare by their own state; predecessors are not visited.
impl PartialEq for ReplayFrame {
    fn eq(&self, other: &Self) -> bool {
        self.age == other.age
            && self.position == other.position
            && self.command == other.command
            && self.report == other.report
            && self.jewels == other.jewels
            && self.visibility == other.visibility
            && self.setup == other.setup
    }
}

impl Eq for ReplayFrame {}

impl fmt::Debug for ReplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayFrame")
            .field("age", &self.age)
            .field("position", &self.position)
            .field("command", &self.command)
            .field("report", &self.report)
            .field("remaining_jewels", &self.jewels.len())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

// Unlink the chain iteratively; the default recursive drop overflows the
// stack on long replays.
impl Drop for ReplayFrame {
    fn drop(&mut self) {
        let mut next = self.predecessor.take();
        while let Some(frame) = next {
            match Arc::try_unwrap(frame) {
                Ok(mut frame) => next = frame.predecessor.take(),
                Err(_) => break,
            }
        }
    }
}
