//! A fully committed two-ply game has exactly one realization: 1. e4 e5.

mod common;

use proof_game::core::piece::PieceKind;
use proof_game::solution::Solution;
use proof_game::solver::SolveStatus;
use proof_game::strategy::Strategy;

#[test]
fn double_steps_to_e4_and_e5_are_forced() {
    let mut strategy = Strategy::initial();
    common::commit_pawn(&mut strategy, &["e2", "e4"], 1, 1);
    common::commit_pawn(&mut strategy, &["e7", "e5"], 1, 1);

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 2, &common::options(8))
        .expect("schedulable strategy");
    assert_eq!(report.status, SolveStatus::Exhausted);
    assert_eq!(report.solutions.len(), 1);

    let solution = &report.solutions[0];
    assert_eq!(solution.to_string(), "1. e2e4 e7e5");

    let board = solution.replay().expect("found line must replay");
    let white_pawn = board.get(common::sq("e4")).expect("white pawn on e4");
    assert_eq!(white_pawn.kind, PieceKind::Pawn);
    assert_eq!(white_pawn.life, common::life_at("e2"));
    let black_pawn = board.get(common::sq("e5")).expect("black pawn on e5");
    assert_eq!(black_pawn.life, common::life_at("e7"));
    assert!(board.get(common::sq("e2")).is_none());
    assert!(board.get(common::sq("e7")).is_none());
}

#[test]
fn solutions_round_trip_through_json() {
    let mut strategy = Strategy::initial();
    common::commit_pawn(&mut strategy, &["e2", "e4"], 1, 1);
    common::commit_pawn(&mut strategy, &["e7", "e5"], 1, 1);

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 2, &common::options(1))
        .expect("schedulable strategy");
    let solution = &report.solutions[0];
    let json = solution.to_json().expect("serializes");
    let back: Solution = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(&back, solution);
}
