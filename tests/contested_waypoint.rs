//! Penalty propagation must reject a committed leg that runs through a square
//! held for the whole game, before any search effort is spent.

mod common;

use proof_game::plan::RejectReason;
use proof_game::solver::SolveError;
use proof_game::strategy::Strategy;

#[test]
fn one_move_queen_leg_through_a_stationary_pawn_is_rejected() {
    let mut strategy = Strategy::initial();
    // Qd1-a4 in one committed move crosses c2 and b3; the c2 pawn never
    // moves, so the leg is dead and no budget exists to detour around it.
    let queen = common::life_at("d1");
    strategy.life_mut(queen).target = common::sq("a4");
    strategy.life_mut(queen).moves = 1;

    let mut ctx = common::solver();
    let err = ctx
        .solve(&mut strategy, 1, &common::options(1))
        .unwrap_err();
    match err {
        SolveError::Rejected(RejectReason::ContestedSquare { square }) => {
            assert_eq!(square, common::sq("c2"));
        }
        other => panic!("expected a contested-square rejection, got {other}"),
    }
}

#[test]
fn the_same_leg_with_budget_is_charged_instead_of_rejected() {
    let mut strategy = Strategy::initial();
    // Once the d2 pawn clears the file the queen has a two-move detour
    // (d1-d4-a4, or longer ones paid from the budget), so the penalty pass
    // charges instead of rejecting and the search finds a line.
    let queen = common::life_at("d1");
    strategy.life_mut(queen).target = common::sq("a4");
    strategy.life_mut(queen).moves = 1;
    common::commit_pawn(&mut strategy, &["d2", "d4"], 1, 2);
    strategy.free_moves = [2, 4];

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 8, &common::options(1))
        .expect("budgeted detour must reach the search");
    assert_eq!(report.solutions.len(), 1);
    assert!(report.solutions[0].replay().is_some());

    // Blocking c2 alone forces the two-move detour; the charge must land on
    // the slot's committed leg cost, not just on the budgets.
    let pseudo = ctx.pseudo_game();
    let depart = &pseudo.slots[pseudo.chain(queen)[0]];
    assert_eq!(depart.cost_if_blocked[common::sq("c2").index()], Some(2));
    assert_eq!(depart.leg_moves, 2);
}
