//! Replay configuration.

use jewel_sweep_core::MovePolicy;
use serde::{Deserialize, Serialize};

/// Limit the contest judge places on the sensor pattern length.
pub const JUDGE_PATTERN_LIMIT: usize = 500;

/// Knobs controlling how a replay is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Treatment of commands that would leave the board.
    pub move_policy: MovePolicy,
    /// Optional cap on the number of sensor pattern offsets.
    pub max_pattern_len: Option<usize>,
}

impl ReplayConfig {
    /// Configuration matching the contest judge: strict moves and a
    /// pattern of at most [`JUDGE_PATTERN_LIMIT`] offsets.
    #[must_use]
    pub const fn judge() -> Self {
        Self {
            move_policy: MovePolicy::Reject,
            max_pattern_len: Some(JUDGE_PATTERN_LIMIT),
        }
    }

    /// Overrides the move policy.
    #[must_use]
    pub const fn with_move_policy(mut self, move_policy: MovePolicy) -> Self {
        self.move_policy = move_policy;
        self
    }

    /// Overrides the pattern length cap.
    #[must_use]
    pub const fn with_max_pattern_len(mut self, max_pattern_len: Option<usize>) -> Self {
        self.max_pattern_len = max_pattern_len;
        self
    }
}
