#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Replay engine that turns a board description and an action script into
//! the full, immutable frame sequence.
//!
//! Construction is a single synchronous pass. Any parse, validation or move
//! error aborts it and no partial sequence escapes. Callers that want to stop
//! early can drive [`FrameSteps`] themselves and drop it at any point.

mod config;
mod validate;

use std::sync::Arc;

use jewel_sweep_core::{Direction, MovePolicy};
use jewel_sweep_parser::{ActionScript, BoardDescription, ParseError};
use jewel_sweep_world::{OutOfBoundsMove, ReplayFrame, ReplaySetup};
use tracing::{debug, info, warn};

pub use config::{ReplayConfig, JUDGE_PATTERN_LIMIT};
pub use validate::BoardError;

/// Errors that abort replay construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The board or script text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The board parsed but cannot be replayed.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The sensor pattern exceeds the configured cap.
    #[error("sensor pattern has {len} offsets, limit is {limit}")]
    PatternTooLarge {
        /// Declared pattern length.
        len: usize,
        /// Configured cap.
        limit: usize,
    },
    /// A command walks off the board under [`MovePolicy::Reject`].
    #[error(transparent)]
    OutOfBoundsMove(#[from] OutOfBoundsMove),
}

/// Complete frame sequence: the initial frame plus one frame per command.
#[derive(Clone, Debug)]
pub struct Replay {
    frames: Vec<Arc<ReplayFrame>>,
}

impl Replay {
    /// Frames ordered by age.
    #[must_use]
    pub fn frames(&self) -> &[Arc<ReplayFrame>] {
        &self.frames
    }

    /// Frame at `age`, if it exists.
    #[must_use]
    pub fn frame(&self, age: usize) -> Option<&Arc<ReplayFrame>> {
        self.frames.get(age)
    }

    /// Number of frames; always the command count plus one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; a replay holds at least its initial frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at age zero.
    #[must_use]
    pub fn initial(&self) -> &Arc<ReplayFrame> {
        &self.frames[0]
    }

    /// Frame after the last command.
    #[must_use]
    pub fn last(&self) -> &Arc<ReplayFrame> {
        &self.frames[self.frames.len() - 1]
    }

    /// Iterator over frames ordered by age.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReplayFrame>> {
        self.frames.iter()
    }
}

/// Builds frame sequences under a fixed configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplayEngine {
    config: ReplayConfig,
}

impl ReplayEngine {
    /// Creates an engine with the provided configuration.
    #[must_use]
    pub const fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Parses both texts and builds the complete replay.
    pub fn replay_text(
        &self,
        board_label: &str,
        board_text: &str,
        script_label: &str,
        script_text: &str,
    ) -> Result<Replay, ReplayError> {
        let board = BoardDescription::from_text(board_label, board_text)?;
        let script = ActionScript::from_text(script_label, script_text)?;
        self.build(&board, &script)
    }

    /// Validates the inputs and builds the complete replay.
    pub fn build(
        &self,
        board: &BoardDescription,
        script: &ActionScript,
    ) -> Result<Replay, ReplayError> {
        let frames = self
            .steps(board, script)?
            .collect::<Result<Vec<_>, _>>()?;
        let last = &frames[frames.len() - 1];
        info!(
            frames = frames.len(),
            remaining_jewels = last.remaining_jewels().len(),
            cleared = last.is_cleared(),
            "replay built"
        );
        Ok(Replay { frames })
    }

    /// Validates the inputs and returns a lazy iterator over the frames.
    ///
    /// The iterator yields the initial frame first, then one frame per
    /// command. It yields at most one error and then stops.
    pub fn steps(
        &self,
        board: &BoardDescription,
        script: &ActionScript,
    ) -> Result<FrameSteps, ReplayError> {
        let (dimensions, jewels) = validate::validate_board(board)?;
        let pattern = script.pattern();
        if let Some(limit) = self.config.max_pattern_len {
            if pattern.len() > limit {
                return Err(ReplayError::PatternTooLarge {
                    len: pattern.len(),
                    limit,
                });
            }
        }

        debug!(
            height = dimensions.height(),
            width = dimensions.width(),
            jewels = jewels.len(),
            pattern = pattern.len(),
            commands = script.commands().len(),
            policy = ?self.config.move_policy,
            "starting replay"
        );

        let setup = Arc::new(ReplaySetup::new(dimensions, pattern.clone()));
        let initial = Arc::new(ReplayFrame::initial(setup, jewels));
        Ok(FrameSteps {
            policy: self.config.move_policy,
            commands: script.commands().directions().to_vec().into_iter(),
            current: initial,
            started: false,
            finished: false,
        })
    }
}

/// Lazy frame sequence produced by [`ReplayEngine::steps`].
#[derive(Debug)]
pub struct FrameSteps {
    policy: MovePolicy,
    commands: std::vec::IntoIter<Direction>,
    current: Arc<ReplayFrame>,
    started: bool,
    finished: bool,
}

impl Iterator for FrameSteps {
    type Item = Result<Arc<ReplayFrame>, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(Ok(Arc::clone(&self.current)));
        }
        if self.finished {
            return None;
        }
        let Some(direction) = self.commands.next() else {
            self.finished = true;
            return None;
        };

        match ReplayFrame::successor(&self.current, direction, self.policy) {
            Ok(frame) => {
                let frame = Arc::new(frame);
                if frame.cell().is_none() {
                    warn!(
                        age = frame.age(),
                        row = frame.position().row(),
                        column = frame.position().column(),
                        "player left the board"
                    );
                }
                if let Some(report) = frame.report() {
                    debug!(
                        age = frame.age(),
                        row = frame.position().row(),
                        column = frame.position().column(),
                        collected = report.collected,
                        close = report.close,
                        "applied step"
                    );
                }
                self.current = Arc::clone(&frame);
                Some(Ok(frame))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error.into()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.finished {
            0
        } else {
            self.commands.len() + usize::from(!self.started)
        };
        (0, Some(remaining))
    }
}

/// Replays board and script texts with the default configuration.
pub fn replay(board_text: &str, script_text: &str) -> Result<Replay, ReplayError> {
    ReplayEngine::default().replay_text(
        BoardDescription::DEFAULT_LABEL,
        board_text,
        ActionScript::DEFAULT_LABEL,
        script_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_sweep_core::{CellId, Position, Visibility};
    use jewel_sweep_parser::ParseErrorKind;

    #[test]
    fn single_move_collects_adjacent_jewel() {
        let replay = replay("2 2 1\n0 1\n", "0\nR\n").expect("valid replay");

        assert_eq!(replay.len(), 2);
        let first = replay.initial();
        assert_eq!(first.position(), Position::ORIGIN);
        assert_eq!(
            first.remaining_jewels().iter().copied().collect::<Vec<_>>(),
            vec![CellId::new(1)]
        );

        let second = replay.last();
        assert_eq!(second.position(), Position::new(0, 1));
        assert!(second.remaining_jewels().is_empty());
        assert_eq!(
            second.visibility_at(Position::new(0, 1)),
            Some(Visibility::Confirmed)
        );
    }

    #[test]
    fn clear_sensor_certifies_its_footprint() {
        let replay = replay("3 3 1\n0 2\n", "1\n0 1\nD\n").expect("valid replay");
        let frame = replay.last();

        assert_eq!(frame.position(), Position::new(1, 0));
        assert!(!frame.report().expect("report").close);
        assert_eq!(
            frame.visibility_at(Position::new(1, 0)),
            Some(Visibility::Confirmed)
        );
        assert_eq!(
            frame.visibility_at(Position::new(1, 1)),
            Some(Visibility::Confirmed)
        );
    }

    #[test]
    fn triggered_sensor_leaves_jewel_cell_possible() {
        let replay = replay("3 3 1\n1 1\n", "1\n0 1\nD\n").expect("valid replay");
        let frame = replay.last();

        assert!(frame.report().expect("report").close);
        assert_eq!(
            frame.visibility_at(Position::new(1, 0)),
            Some(Visibility::Confirmed)
        );
        assert_eq!(
            frame.visibility_at(Position::new(1, 1)),
            Some(Visibility::Possible)
        );
    }

    #[test]
    fn missing_jewel_lines_abort_with_line_number() {
        let error = match replay("2 2 1\n", "0\nR\n") {
            Err(ReplayError::Parse(error)) => error,
            other => panic!("expected a parse error, got {other:?}"),
        };
        assert_eq!(error.kind(), &ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(error.line(), 2);
        assert_eq!(error.to_string(), "<board>: line 2: a word expected, but EOF");
    }

    #[test]
    fn out_of_bounds_move_is_rejected_by_default() {
        let error = replay("2 2 0\n", "0\nR\nR\n").expect_err("second move leaves the board");
        assert_eq!(
            error,
            ReplayError::OutOfBoundsMove(OutOfBoundsMove {
                step: 2,
                from: Position::new(0, 1),
                direction: Direction::Right,
            })
        );
    }

    #[test]
    fn permit_policy_replays_off_board_moves() {
        let engine =
            ReplayEngine::new(ReplayConfig::default().with_move_policy(MovePolicy::Permit));
        let replay = engine
            .replay_text("<b>", "2 2 0\n", "<s>", "0\nU\nD\n")
            .expect("permitted");

        assert_eq!(replay.len(), 3);
        assert_eq!(replay.frame(1).expect("frame").position(), Position::new(-1, 0));
        assert_eq!(replay.last().position(), Position::ORIGIN);
    }

    #[test]
    fn pattern_cap_is_enforced() {
        let engine = ReplayEngine::new(ReplayConfig::default().with_max_pattern_len(Some(1)));
        let error = engine
            .replay_text("<b>", "2 2 0\n", "<s>", "2\n0 1\n1 0\n")
            .expect_err("pattern too long");
        assert_eq!(error, ReplayError::PatternTooLarge { len: 2, limit: 1 });
    }

    #[test]
    fn board_errors_surface_before_any_frame() {
        let error = replay("2 2 1\n2 2\n", "0\n").expect_err("jewel off the board");
        assert!(matches!(
            error,
            ReplayError::Board(BoardError::JewelOutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn steps_stop_after_the_first_error() {
        let board = BoardDescription::from_text("<b>", "1 1 0\n").expect("board");
        let script = ActionScript::from_text("<s>", "0\nR\nL\nL\n").expect("script");
        let mut steps = ReplayEngine::default()
            .steps(&board, &script)
            .expect("valid inputs");

        assert!(matches!(steps.next(), Some(Ok(_))));
        assert!(matches!(
            steps.next(),
            Some(Err(ReplayError::OutOfBoundsMove(_)))
        ));
        assert!(steps.next().is_none());
    }

    #[test]
    fn steps_can_be_abandoned_midway() {
        let board = BoardDescription::from_text("<b>", "1 3 1\n0 2\n").expect("board");
        let script = ActionScript::from_text("<s>", "0\nR\nR\nL\n").expect("script");
        let steps = ReplayEngine::default()
            .steps(&board, &script)
            .expect("valid inputs");

        let partial: Vec<_> = steps.take(2).collect::<Result<_, _>>().expect("frames");
        assert_eq!(partial.len(), 2);
        assert_eq!(partial[1].position(), Position::new(0, 1));
    }

    #[test]
    fn empty_script_yields_only_the_initial_frame() {
        let replay = replay("1 1 0\n", "0\n").expect("valid replay");
        assert_eq!(replay.len(), 1);
        assert!(replay.initial().predecessor().is_none());
    }

    #[test]
    fn tall_narrow_board_replays_without_exhausting_memory() {
        let replay = replay("2147483648 1 0\n", "0\nD\n").expect("valid replay");
        assert_eq!(replay.len(), 2);
        assert_eq!(replay.last().position(), Position::new(1, 0));
        assert_eq!(
            replay.last().visibility_at(Position::new(1, 0)),
            Some(Visibility::Confirmed)
        );
        assert_eq!(
            replay.last().visibility_at(Position::new(2_147_483_647, 0)),
            Some(Visibility::Unknown)
        );
    }
}
