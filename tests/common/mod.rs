//! Shared fixtures: hand-built strategies standing in for the external
//! strategy generator.

#![allow(dead_code)]

use proof_game::core::board::{Board, LifeId};
use proof_game::core::square::Square;
use proof_game::oracle::tables::BoardTables;
use proof_game::solver::{SolveOptions, SolverContext};
use proof_game::strategy::{PawnRoute, Strategy};

pub fn sq(s: &str) -> Square {
    Square::parse(s)
}

/// Life id of the man starting on `square`.
pub fn life_at(square: &str) -> LifeId {
    Board::start_life_at(sq(square)).expect("start square is occupied")
}

/// Commit a pawn to the given route (start square included). `min`/`max`
/// differ when the first step may be single or double; `min` is the committed
/// move count.
pub fn commit_pawn(strategy: &mut Strategy, route: &[&str], min: u32, max: u32) -> LifeId {
    let squares: Vec<Square> = route.iter().map(|s| Square::parse(s)).collect();
    let id = Board::start_life_at(squares[0]).expect("route starts on a start square");
    let life = strategy.life_mut(id);
    life.target = *squares.last().expect("route is non-empty");
    life.moves = min;
    life.pawn_route = Some(PawnRoute {
        squares,
        min_moves: min,
        max_moves: max,
    });
    id
}

/// Commit `assassin` to capture `victim`, with back-references.
pub fn commit_capture(strategy: &mut Strategy, assassin: LifeId, victim: LifeId) {
    strategy.life_mut(assassin).victims.push(victim);
    let v = strategy.life_mut(victim);
    v.captured = true;
    v.assassin = Some(assassin);
}

pub fn solver() -> SolverContext<BoardTables> {
    SolverContext::new(BoardTables::new())
}

pub fn options(max_solutions: usize) -> SolveOptions {
    SolveOptions {
        max_solutions,
        ..SolveOptions::default()
    }
}
