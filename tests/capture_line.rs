//! A committed capture: 1. e4 d5 2. exd5, forced at every ply.
//!
//! The capture slot must wait for its victim's chain (the d-pawn reaching d5)
//! and the schedule pins all three moves to their only feasible plies.

mod common;

use proof_game::core::piece::PieceKind;
use proof_game::solver::SolveStatus;
use proof_game::strategy::Strategy;

#[test]
fn pawn_capture_line_is_unique_and_replays() {
    let mut strategy = Strategy::initial();
    let white_pawn = common::commit_pawn(&mut strategy, &["e2", "e4", "d5"], 2, 2);
    let black_pawn = common::commit_pawn(&mut strategy, &["d7", "d5"], 1, 1);
    common::commit_capture(&mut strategy, white_pawn, black_pawn);

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 3, &common::options(8))
        .expect("schedulable strategy");
    assert_eq!(report.status, SolveStatus::Exhausted);
    assert_eq!(report.solutions.len(), 1);

    let solution = &report.solutions[0];
    assert_eq!(solution.to_string(), "1. e2e4 d7d5 2. e4xd5");

    let board = solution.replay().expect("found line must replay");
    let pawn = board.get(common::sq("d5")).expect("capturer stands on d5");
    assert_eq!(pawn.kind, PieceKind::Pawn);
    assert_eq!(pawn.life, white_pawn);
    assert!(board.get(common::sq("e2")).is_none());
    assert!(board.get(common::sq("e4")).is_none());
    assert!(board.get(common::sq("d7")).is_none());
}

#[test]
fn capture_slot_schedule_is_pinned_after_the_victim() {
    let mut strategy = Strategy::initial();
    let white_pawn = common::commit_pawn(&mut strategy, &["e2", "e4", "d5"], 2, 2);
    let black_pawn = common::commit_pawn(&mut strategy, &["d7", "d5"], 1, 1);
    common::commit_capture(&mut strategy, white_pawn, black_pawn);

    let mut ctx = common::solver();
    ctx.solve(&mut strategy, 3, &common::options(1))
        .expect("schedulable strategy");

    let pseudo = ctx.pseudo_game();
    let chain = pseudo.chain(white_pawn);
    assert_eq!(chain.len(), 2);
    let advance = &pseudo.slots[chain[0]];
    let capture = &pseudo.slots[chain[1]];
    assert_eq!((advance.earliest, advance.latest), (1, 1));
    assert_eq!((capture.earliest, capture.latest), (3, 3));
    assert_eq!(capture.victim, Some(black_pawn));

    let victim_chain = pseudo.chain(black_pawn);
    assert_eq!(victim_chain.len(), 1);
    assert_eq!(
        (pseudo.slots[victim_chain[0]].earliest, pseudo.slots[victim_chain[0]].latest),
        (2, 2)
    );
}
