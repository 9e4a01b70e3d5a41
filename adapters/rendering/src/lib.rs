#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only presentation contracts for Jewel Sweep replays.
//!
//! Adapters never touch frames directly when drawing. They convert a
//! [`ReplayFrame`] into a [`FramePresentation`] and draw that, and they track
//! the displayed frame with a [`SeekCursor`].

use std::fmt::Write as _;

use jewel_sweep_core::{Position, StepReport, Visibility};
use jewel_sweep_world::ReplayFrame;

/// What a single board cell shows, in drawing priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellPresentation {
    /// The player occupies the cell.
    Player,
    /// An uncollected jewel lies in the cell.
    Jewel,
    /// The cell is known to be empty.
    Confirmed,
    /// The sensor reported a jewel somewhere in a footprint covering the cell.
    Possible,
    /// Nothing is known about the cell.
    Unknown,
}

impl CellPresentation {
    /// Glyph used by [`render_ascii`].
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Player => '@',
            Self::Jewel => '*',
            Self::Confirmed => '.',
            Self::Possible => '~',
            Self::Unknown => '?',
        }
    }
}

/// Glyph drawn over empty cells covered by the sensor footprint.
pub const SENSOR_GLYPH: char = '!';

/// Presentation of one board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellView {
    /// Base content of the cell.
    pub kind: CellPresentation,
    /// The cell lies under the sensor footprint around the player.
    pub sensed: bool,
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePresentation {
    /// Step index of the frame.
    pub age: usize,
    /// Player position, possibly off the board.
    pub position: Position,
    /// Number of rows.
    pub height: u32,
    /// Number of columns.
    pub width: u32,
    /// Row-major cell views.
    pub cells: Vec<CellView>,
    /// Jewels not yet collected.
    pub remaining_jewels: usize,
    /// Sensor announcement for the move that produced the frame.
    pub report: Option<StepReport>,
}

impl FramePresentation {
    /// Captures the presentation of a frame.
    #[must_use]
    pub fn from_frame(frame: &ReplayFrame) -> Self {
        let dimensions = frame.dimensions();
        let player = frame.cell();
        let sensed = frame.sensor_cells();
        let jewels = frame.remaining_jewels();

        let cells = frame
            .visibility()
            .iter()
            .map(|(cell, visibility)| {
                let kind = if Some(cell) == player {
                    CellPresentation::Player
                } else if jewels.contains(&cell) {
                    CellPresentation::Jewel
                } else {
                    match visibility {
                        Visibility::Confirmed => CellPresentation::Confirmed,
                        Visibility::Possible => CellPresentation::Possible,
                        Visibility::Unknown => CellPresentation::Unknown,
                    }
                };
                CellView {
                    kind,
                    sensed: sensed.contains(&cell),
                }
            })
            .collect();

        Self {
            age: frame.age(),
            position: frame.position(),
            height: dimensions.height(),
            width: dimensions.width(),
            cells,
            remaining_jewels: jewels.len(),
            report: frame.report(),
        }
    }

    /// Cell view at `row`, `column`, if on the board.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> Option<CellView> {
        if row >= self.height || column >= self.width {
            return None;
        }
        let index = row as usize * self.width as usize + column as usize;
        self.cells.get(index).copied()
    }

    /// Iterator over the board rows.
    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

/// Draws the frame as text, one line per board row.
///
/// The player is `@`, jewels are `*`, empty sensed cells are `!`, confirmed
/// cells are `.`, possible cells are `~` and unknown cells are `?`.
#[must_use]
pub fn render_ascii(presentation: &FramePresentation) -> String {
    let mut out = String::with_capacity(presentation.cells.len() + presentation.height as usize);
    for row in presentation.rows() {
        for view in row {
            let glyph = match view.kind {
                CellPresentation::Player | CellPresentation::Jewel => view.kind.glyph(),
                _ if view.sensed => SENSOR_GLYPH,
                kind => kind.glyph(),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// One-line textual header describing the frame.
#[must_use]
pub fn render_header(presentation: &FramePresentation) -> String {
    let mut out = format!(
        "move {} at ({}, {}), {} jewel(s) left",
        presentation.age,
        presentation.position.row(),
        presentation.position.column(),
        presentation.remaining_jewels
    );
    if let Some(report) = presentation.report {
        let announcement = match (report.collected, report.close) {
            _ if presentation.remaining_jewels == 0 => "clear",
            (true, true) => "get-close",
            (true, false) => "get-far",
            (false, true) => "close",
            (false, false) => "far",
        };
        let _ = write!(out, ", sensor: {announcement}");
    }
    out
}

/// Clamped cursor over a frame range, mirroring a seek bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeekCursor {
    min: usize,
    max: usize,
    value: usize,
}

impl SeekCursor {
    /// Creates a cursor over `0..frame_count`, positioned at the first frame.
    ///
    /// An empty range collapses to the single value zero.
    #[must_use]
    pub const fn new(frame_count: usize) -> Self {
        let max = frame_count.saturating_sub(1);
        Self {
            min: 0,
            max,
            value: 0,
        }
    }

    /// Smallest reachable value.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Largest reachable value.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> usize {
        self.value
    }

    /// Moves to `value`, clamped into range, and returns the result.
    pub fn set(&mut self, value: usize) -> usize {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Moves to the first frame.
    pub fn first(&mut self) -> usize {
        self.set(self.min)
    }

    /// Moves to the last frame.
    pub fn last(&mut self) -> usize {
        self.set(self.max)
    }

    /// Moves one frame forward, stopping at the end.
    pub fn next(&mut self) -> usize {
        self.set(self.value.saturating_add(1))
    }

    /// Moves one frame back, stopping at the start.
    pub fn previous(&mut self) -> usize {
        self.set(self.value.saturating_sub(1))
    }

    /// Prepares playback: rewinds when sitting on the last frame.
    pub fn start_playback(&mut self) -> usize {
        if self.value == self.max {
            return self.first();
        }
        self.value
    }

    /// Playback tick. Returns `false` once the last frame is reached.
    pub fn advance_for_playback(&mut self) -> bool {
        if self.value == self.max {
            return false;
        }
        let _ = self.next();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_cursor_clamps_into_range() {
        let mut cursor = SeekCursor::new(5);
        assert_eq!(cursor.set(10), 4);
        assert_eq!(cursor.next(), 4);
        assert_eq!(cursor.first(), 0);
        assert_eq!(cursor.previous(), 0);
        assert_eq!(cursor.last(), 4);
        assert_eq!(cursor.min(), 0);
        assert_eq!(cursor.max(), 4);
    }

    #[test]
    fn playback_rewinds_from_the_end_and_stops_at_the_last_frame() {
        let mut cursor = SeekCursor::new(3);
        let _ = cursor.last();
        assert_eq!(cursor.start_playback(), 0);

        let mut ticks = 0;
        while cursor.advance_for_playback() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert_eq!(cursor.value(), 2);
    }

    #[test]
    fn empty_range_collapses_to_zero() {
        let mut cursor = SeekCursor::new(0);
        assert_eq!(cursor.next(), 0);
        assert!(!cursor.advance_for_playback());
    }

    #[test]
    fn glyphs_are_distinct() {
        let glyphs = [
            CellPresentation::Player,
            CellPresentation::Jewel,
            CellPresentation::Confirmed,
            CellPresentation::Possible,
            CellPresentation::Unknown,
        ]
        .map(CellPresentation::glyph);
        for (index, glyph) in glyphs.iter().enumerate() {
            assert!(!glyphs[index + 1..].contains(glyph));
            assert_ne!(*glyph, SENSOR_GLYPH);
        }
    }
}
