//! One strategy attempt, end to end.
//!
//! [`SolverContext::solve`] validates the commitment, runs the planning
//! pipeline (chains, penalties, precedence, cycle check, schedule, switchback
//! resolution) and then the tree search. The context owns the movement oracle
//! and the slot arena so repeated attempts reuse their allocations; the
//! strategy's mutable counters are snapshotted on entry and restored on every
//! exit path.

use std::error::Error;
use std::fmt;

use crate::core::square::Color;
use crate::oracle::MovementOracle;
use crate::plan::{self, PseudoGame, RejectReason};
use crate::search;
use crate::solution::Solution;
use crate::strategy::{Strategy, StrategySnapshot};

pub use crate::search::{SearchOptions as SolveOptions, SearchStatus as SolveStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The strategy cannot be realized. Not a failure of the solver: control
    /// returns to the strategy generator for the next candidate.
    Rejected(RejectReason),
    /// The commitment was malformed before planning even started.
    InvalidStrategy { reason: String },
    /// An internal invariant broke. This is a bug, never a bad strategy.
    InvariantViolation { detail: &'static str },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Rejected(reason) => write!(f, "strategy rejected: {reason}"),
            SolveError::InvalidStrategy { reason } => {
                write!(f, "invalid strategy: {reason}")
            }
            SolveError::InvariantViolation { detail } => {
                write!(f, "internal invariant violated: {detail}")
            }
        }
    }
}

impl Error for SolveError {}

/// The result of a completed (not rejected) strategy attempt. Zero solutions
/// with [`SolveStatus::Exhausted`] is the common case: a schedulable strategy
/// that no legal game realizes.
#[derive(Debug)]
pub struct SolveReport {
    pub solutions: Vec<Solution>,
    pub status: SolveStatus,
    /// Search nodes visited.
    pub nodes: u64,
}

/// Reusable solving state: the oracle and the slot arena survive across
/// strategy attempts.
pub struct SolverContext<O: MovementOracle> {
    oracle: O,
    pseudo: PseudoGame,
}

impl<O: MovementOracle> SolverContext<O> {
    pub fn new(oracle: O) -> SolverContext<O> {
        SolverContext {
            oracle,
            pseudo: PseudoGame::new(),
        }
    }

    /// The scheduled pseudo game of the last attempt. Only meaningful right
    /// after a `solve` call that got past chain expansion.
    pub fn pseudo_game(&self) -> &PseudoGame {
        &self.pseudo
    }

    /// Solve one strategy attempt for an exact game of `n` half-moves.
    ///
    /// `strategy`'s counters may be adjusted while the attempt is live; they
    /// are restored before this returns, on success and failure alike.
    pub fn solve(
        &mut self,
        strategy: &mut Strategy,
        n: u32,
        options: &SolveOptions,
    ) -> Result<SolveReport, SolveError> {
        strategy
            .check_consistency()
            .map_err(|reason| SolveError::InvalidStrategy { reason })?;
        validate_ply_totals(strategy, n)?;

        let snapshot = StrategySnapshot::take(strategy);
        let result = self.solve_inner(strategy, n, options);
        snapshot.restore(strategy);
        result
    }

    fn solve_inner(
        &mut self,
        strategy: &mut Strategy,
        n: u32,
        options: &SolveOptions,
    ) -> Result<SolveReport, SolveError> {
        self.pseudo.clear();
        plan::chain::build_chains(&self.oracle, strategy, &mut self.pseudo)
            .map_err(SolveError::Rejected)?;
        plan::penalty::propagate(&mut self.oracle, strategy, &mut self.pseudo)
            .map_err(SolveError::Rejected)?;
        plan::precedence::build(&self.oracle, strategy, &mut self.pseudo)
            .map_err(SolveError::Rejected)?;
        plan::cycle::detect(&self.pseudo).map_err(SolveError::Rejected)?;
        plan::schedule::schedule(&mut self.pseudo, n)?;
        plan::switchback::resolve(&self.oracle, strategy, &mut self.pseudo)
            .map_err(SolveError::Rejected)?;

        let outcome = search::run(&self.oracle, strategy, &self.pseudo, n, options);
        Ok(SolveReport {
            solutions: outcome.solutions,
            status: outcome.status,
            nodes: outcome.nodes,
        })
    }
}

/// Each color's committed moves plus its free budget must fill its plies
/// exactly; a proof game in exactly `n` half-moves has no ply to spare.
fn validate_ply_totals(strategy: &Strategy, n: u32) -> Result<(), SolveError> {
    for color in [Color::White, Color::Black] {
        let committed: u32 = strategy.lives_of(color).map(|l| l.moves).sum::<u32>()
            + strategy.free_moves[color.index()];
        let plies = color.plies_in(1, n);
        if committed != plies {
            return Err(SolveError::InvalidStrategy {
                reason: format!(
                    "{color:?} commits {committed} moves but plays {plies} plies"
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::LifeId;
    use crate::oracle::tables::BoardTables;

    #[test]
    fn mismatched_ply_totals_are_invalid() {
        let mut strategy = Strategy::initial();
        strategy.free_moves = [1, 0];
        let mut ctx = SolverContext::new(BoardTables::new());
        let err = ctx
            .solve(&mut strategy, 0, &SolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidStrategy { .. }));
    }

    #[test]
    fn broken_victim_back_reference_is_invalid() {
        let mut strategy = Strategy::initial();
        // A victim whose assassin pointer does not point back.
        strategy.life_mut(LifeId::new(8)).victims.push(LifeId::new(24));
        let mut ctx = SolverContext::new(BoardTables::new());
        let err = ctx
            .solve(&mut strategy, 0, &SolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidStrategy { .. }));
    }

    #[test]
    fn counters_are_restored_after_a_rejected_attempt() {
        let mut strategy = Strategy::initial();
        // White queen to a4 in one committed move, but c2 stays home for the
        // whole game, so the only one-move route is permanently blocked.
        let queen = LifeId::new(3);
        strategy.life_mut(queen).target = crate::core::square::Square::parse("a4");
        strategy.life_mut(queen).moves = 1;
        let before = strategy.clone();
        let mut ctx = SolverContext::new(BoardTables::new());
        let result = ctx.solve(&mut strategy, 1, &SolveOptions::default());
        assert!(matches!(result, Err(SolveError::Rejected(_))));
        assert_eq!(strategy, before);
    }
}
