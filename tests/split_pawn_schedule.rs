//! A pawn whose first step may be single or double, with one free move to
//! spend: in four plies the single-step reading is forced, because a ply-one
//! double step leaves White without any legal tempo move at ply three.

mod common;

use proof_game::strategy::Strategy;

#[test]
fn single_step_reading_is_forced_when_tempo_is_needed() {
    let mut strategy = Strategy::initial();
    let pawn = common::commit_pawn(&mut strategy, &["e2", "e4"], 1, 2);
    strategy.free_moves = [1, 2];

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 4, &common::options(100))
        .expect("schedulable strategy");

    // Four black knight dances; one forced white line.
    assert_eq!(report.solutions.len(), 4);
    for solution in &report.solutions {
        assert_eq!(solution.moves[0].to, common::sq("e3"));
        assert_eq!(solution.moves[2].to, common::sq("e4"));
        assert!(solution.replay().is_some());
    }

    // The flexible first step became an unresolved two-slot leg spanning the
    // white plies.
    let pseudo = ctx.pseudo_game();
    let chain = pseudo.chain(pawn);
    assert_eq!(chain.len(), 2);
    let depart = &pseudo.slots[chain[0]];
    let arrive = &pseudo.slots[chain[1]];
    assert!(depart.to.is_none());
    assert!(arrive.pair_arrive);
    assert_eq!(depart.earliest, 1);
    assert_eq!(arrive.latest, 3);
}
