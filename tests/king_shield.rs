//! A king stepping onto a square a stationary enemy rook bears on: legal
//! exactly because another man is committed to stand on the ray for good.

mod common;

use proof_game::core::piece::PieceKind;
use proof_game::solver::SolveStatus;
use proof_game::strategy::Strategy;

/// Both e-pawns advance and the white king follows to e2. The e8 rook never
/// moves and its file is cleared while the king travels, but the pawns'
/// final squares screen it, so planning must order the king behind them
/// instead of rejecting the strategy.
#[test]
fn committed_interposer_licenses_the_king_step() {
    let mut strategy = Strategy::initial();
    common::commit_pawn(&mut strategy, &["e2", "e4"], 1, 1);
    common::commit_pawn(&mut strategy, &["e7", "e5"], 1, 1);
    let king = common::life_at("e1");
    strategy.life_mut(king).target = common::sq("e2");
    strategy.life_mut(king).moves = 1;

    let mut ctx = common::solver();
    let report = ctx
        .solve(&mut strategy, 3, &common::options(8))
        .expect("the committed pawns shield e2 from the e8 rook");
    assert_eq!(report.status, SolveStatus::Exhausted);
    assert_eq!(report.solutions.len(), 1);
    assert_eq!(report.solutions[0].to_string(), "1. e2e4 e7e5 2. e1e2");

    let board = report.solutions[0].replay().expect("found line must replay");
    let occ = board.get(common::sq("e2")).expect("king stands on e2");
    assert_eq!(occ.kind, PieceKind::King);
    assert_eq!(occ.life, king);

    // The king slot waits for a screening pawn's arrival.
    let pseudo = ctx.pseudo_game();
    let king_slot = pseudo.chain(king)[0];
    let shields: Vec<_> = [common::life_at("e2"), common::life_at("e7")]
        .into_iter()
        .filter_map(|p| pseudo.last_slot(p))
        .collect();
    assert!(pseudo.slots[king_slot]
        .must_follow
        .iter()
        .any(|s| shields.contains(s)));
}
