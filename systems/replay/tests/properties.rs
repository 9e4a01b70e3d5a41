use jewel_sweep_core::{
    CommandSequence, Direction, MovePolicy, Offset, Position, SensorPattern, Visibility,
};
use jewel_sweep_parser::{ActionScript, BoardDescription};
use jewel_sweep_system_replay::{ReplayConfig, ReplayEngine};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Case {
    board: BoardDescription,
    script: ActionScript,
}

fn arb_case() -> impl Strategy<Value = Case> {
    (1i64..8, 1i64..8)
        .prop_flat_map(|(height, width)| {
            let cells = (height * width) as usize;
            (
                Just((height, width)),
                prop::sample::subsequence((0..cells).collect::<Vec<_>>(), 0..=cells),
                prop::collection::vec((-3i64..=3, -3i64..=3), 0..6),
                prop::collection::vec(prop::sample::select(Direction::ALL.to_vec()), 0..60),
            )
        })
        .prop_map(|((height, width), jewels, offsets, directions)| {
            let jewels = jewels
                .into_iter()
                .map(|index| Position::new(index as i64 / width, index as i64 % width))
                .collect();
            let offsets = offsets
                .into_iter()
                .map(|(row, column)| Offset::new(row, column))
                .collect();
            Case {
                board: BoardDescription::new(height, width, jewels),
                script: ActionScript::new(
                    SensorPattern::new(offsets),
                    CommandSequence::new(directions),
                ),
            }
        })
}

fn permissive() -> ReplayEngine {
    ReplayEngine::new(ReplayConfig::default().with_move_policy(MovePolicy::Permit))
}

proptest! {
    #[test]
    fn frame_count_is_commands_plus_one(case in arb_case()) {
        let replay = permissive().build(&case.board, &case.script).expect("permissive replay");
        prop_assert_eq!(replay.len(), case.script.commands().len() + 1);
    }

    #[test]
    fn visibility_never_decreases(case in arb_case()) {
        let replay = permissive().build(&case.board, &case.script).expect("permissive replay");
        for pair in replay.frames().windows(2) {
            for ((cell, before), (_, after)) in pair[0].visibility().iter().zip(pair[1].visibility().iter()) {
                prop_assert!(before <= after, "cell {} dropped at age {}", cell.get(), pair[1].age());
            }
        }
    }

    #[test]
    fn jewels_only_disappear_where_the_player_steps(case in arb_case()) {
        let replay = permissive().build(&case.board, &case.script).expect("permissive replay");
        for pair in replay.frames().windows(2) {
            let before = pair[0].remaining_jewels();
            let after = pair[1].remaining_jewels();
            prop_assert!(after.is_subset(before));
            let removed: Vec<_> = before.difference(after).copied().collect();
            prop_assert!(removed.len() <= 1);
            if let Some(cell) = removed.first() {
                prop_assert_eq!(Some(*cell), pair[1].cell());
            }
            let collected = pair[1].report().expect("successor report").collected;
            prop_assert_eq!(collected, removed.len() == 1);
        }
    }

    #[test]
    fn confirmed_cells_never_hold_jewels(case in arb_case()) {
        let replay = permissive().build(&case.board, &case.script).expect("permissive replay");
        for frame in replay.iter() {
            for (cell, value) in frame.visibility().iter() {
                if value == Visibility::Confirmed {
                    prop_assert!(!frame.remaining_jewels().contains(&cell));
                }
            }
        }
    }

    #[test]
    fn close_flag_matches_the_sensor_footprint(case in arb_case()) {
        let replay = permissive().build(&case.board, &case.script).expect("permissive replay");
        for frame in replay.iter().skip(1) {
            let expected = frame
                .sensor_cells()
                .iter()
                .any(|cell| frame.remaining_jewels().contains(cell));
            prop_assert_eq!(frame.report().expect("successor report").close, expected);
        }
    }

    #[test]
    fn replays_are_deterministic(case in arb_case()) {
        let first = permissive().build(&case.board, &case.script).expect("permissive replay");
        let second = permissive().build(&case.board, &case.script).expect("permissive replay");
        prop_assert_eq!(first.len(), second.len());
        for (left, right) in first.iter().zip(second.iter()) {
            prop_assert_eq!(left.as_ref(), right.as_ref());
        }
    }
}
