//! Rebuilding the same strategy in the same context must produce an
//! identical pseudo game: no stale slots, edges, or windows survive a
//! previous attempt.

mod common;

use proof_game::strategy::Strategy;

#[test]
fn repeated_attempts_rebuild_identical_pseudo_games() {
    let mut strategy = Strategy::initial();
    let white_pawn = common::commit_pawn(&mut strategy, &["e2", "e4", "d5"], 2, 2);
    let black_pawn = common::commit_pawn(&mut strategy, &["d7", "d5"], 1, 1);
    common::commit_capture(&mut strategy, white_pawn, black_pawn);

    let mut ctx = common::solver();
    ctx.solve(&mut strategy, 3, &common::options(1))
        .expect("schedulable strategy");
    let first = ctx.pseudo_game().clone();

    ctx.solve(&mut strategy, 3, &common::options(1))
        .expect("same strategy stays schedulable");
    assert_eq!(ctx.pseudo_game(), &first);
}

#[test]
fn a_rejected_attempt_does_not_poison_the_next_one() {
    let mut rejected = Strategy::initial();
    let queen = common::life_at("d1");
    rejected.life_mut(queen).target = common::sq("a4");
    rejected.life_mut(queen).moves = 1;

    let mut good = Strategy::initial();
    common::commit_pawn(&mut good, &["e2", "e4"], 1, 1);
    common::commit_pawn(&mut good, &["e7", "e5"], 1, 1);

    let mut ctx = common::solver();
    assert!(ctx.solve(&mut rejected, 1, &common::options(1)).is_err());
    let report = ctx
        .solve(&mut good, 2, &common::options(8))
        .expect("fresh strategy solves");
    assert_eq!(report.solutions.len(), 1);
}
