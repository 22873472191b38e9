//! The zero-move game: the start diagram reached in zero plies.

mod common;

use proof_game::core::board::Board;
use proof_game::solver::{SolveError, SolveStatus};
use proof_game::strategy::Strategy;

#[test]
fn zero_move_game_has_exactly_the_empty_solution() {
    let mut strategy = Strategy::initial();
    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 0, &common::options(8))
        .expect("identity strategy is solvable");
    assert_eq!(report.status, SolveStatus::Exhausted);
    assert_eq!(report.solutions.len(), 1);
    assert!(report.solutions[0].moves.is_empty());
    assert_eq!(
        report.solutions[0].replay().expect("empty game replays"),
        Board::start_position()
    );
}

#[test]
fn zero_commitments_cannot_fill_a_longer_game() {
    let mut strategy = Strategy::initial();
    let mut ctx = common::solver();
    let err = ctx
        .solve(&mut strategy, 2, &common::options(1))
        .unwrap_err();
    assert!(matches!(err, SolveError::InvalidStrategy { .. }));
}
