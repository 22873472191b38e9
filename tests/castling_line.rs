//! A committed kingside castling: the synthetic king slot subsumes the rook's
//! move, and the precedence builder forces the f1/g1 men out first.

mod common;

use proof_game::core::piece::CastleSide;
use proof_game::solver::SolveStatus;
use proof_game::strategy::Strategy;

#[test]
fn kingside_castling_line_is_found_and_replays() {
    let mut strategy = Strategy::initial();
    common::commit_pawn(&mut strategy, &["e2", "e4"], 1, 1);
    let knight = common::life_at("g1");
    strategy.life_mut(knight).target = common::sq("f3");
    strategy.life_mut(knight).moves = 1;
    let bishop = common::life_at("f1");
    strategy.life_mut(bishop).target = common::sq("c4");
    strategy.life_mut(bishop).moves = 1;
    let king = common::life_at("e1");
    strategy.life_mut(king).target = common::sq("g1");
    strategy.life_mut(king).moves = 1;
    let rook = common::life_at("h1");
    strategy.life_mut(rook).target = common::sq("f1");
    strategy.castling[0] = Some(CastleSide::Kingside);
    strategy.free_moves = [0, 4];

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 8, &common::options(1))
        .expect("schedulable strategy");
    assert_eq!(report.status, SolveStatus::CapReached);

    let solution = &report.solutions[0];
    assert!(solution
        .moves
        .iter()
        .any(|m| m.castle == Some(CastleSide::Kingside)));

    let board = solution.replay().expect("found line must replay");
    assert_eq!(board.get(common::sq("g1")).map(|o| o.life), Some(king));
    assert_eq!(board.get(common::sq("f1")).map(|o| o.life), Some(rook));
    assert_eq!(board.get(common::sq("c4")).map(|o| o.life), Some(bishop));
    assert_eq!(board.get(common::sq("f3")).map(|o| o.life), Some(knight));
    assert!(board.get(common::sq("e1")).is_none());
    assert!(board.get(common::sq("h1")).is_none());
}
