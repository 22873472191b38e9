//! A committed round trip with zero net displacement: the resolver must pick
//! a concrete detour square and the search must play it both ways.

mod common;

use proof_game::solver::SolveStatus;
use proof_game::strategy::Strategy;

#[test]
fn knight_switchback_resolves_to_the_first_open_detour() {
    let mut strategy = Strategy::initial();
    let knight = common::life_at("b1");
    strategy.life_mut(knight).moves = 2;
    strategy.life_mut(knight).switchback = true;
    strategy.free_moves = [0, 2];

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 4, &common::options(100))
        .expect("schedulable strategy");
    assert_eq!(report.status, SolveStatus::Exhausted);

    // d2 is permanently occupied, so a3 is the first usable detour in square
    // order; White's two plies are pinned to the round trip.
    let pseudo = ctx.pseudo_game();
    let chain = pseudo.chain(knight);
    assert_eq!(chain.len(), 2);
    assert_eq!(pseudo.slots[chain[0]].to, Some(common::sq("a3")));
    assert_eq!(pseudo.slots[chain[1]].from, Some(common::sq("a3")));

    // One white line, four black knight dances.
    assert_eq!(report.solutions.len(), 4);
    for solution in &report.solutions {
        assert_eq!(solution.moves[0].to, common::sq("a3"));
        assert_eq!(solution.moves[2].to, common::sq("b1"));
        assert!(solution.replay().is_some());
    }
}
