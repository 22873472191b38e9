//! Committed per-piece strategies, as delivered by the external strategy
//! generator.
//!
//! A [`Strategy`] fixes, for all 32 men, where each ends up, what it has
//! become, whom it captures and who captures it, plus per-color free-move and
//! free-capture budgets. The generator guarantees each piece's own minimum
//! route is affordable in isolation; cross-piece interaction is this crate's
//! job to verify.
//!
//! The planning stages may reduce budgets and raise per-piece move counts
//! while a strategy attempt is live; [`StrategySnapshot`] restores every
//! counter once the attempt ends, successfully or not.

use crate::core::board::{start_kind, start_square, LifeId, LIFE_COUNT};
use crate::core::piece::{CastleSide, PieceKind};
use crate::core::square::{Color, Square};

/// Precomputed square-by-square route of a pawn, from its start square to the
/// end of its pawn phase (its final square, or its promotion square).
///
/// Consecutive squares differ by one pawn step; a file change marks a capture
/// step. `min_moves`/`max_moves` differ exactly when the first step may be
/// played either as a single or a double step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnRoute {
    pub squares: Vec<Square>,
    pub min_moves: u32,
    pub max_moves: u32,
}

/// One of the 32 men of one color, for the life of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceLife {
    pub id: LifeId,
    /// Start square in the initial position.
    pub start: Square,
    /// Kind in the initial position.
    pub start_kind: PieceKind,
    /// Committed final square. For a captured man, the square it dies on.
    pub target: Square,
    /// Kind on the final square (differs from `start_kind` on promotion).
    pub final_kind: PieceKind,
    /// Committed number of moves this man plays.
    pub moves: u32,
    /// Whether this man is captured during the game.
    pub captured: bool,
    /// Victims this man captures, in committed order.
    pub victims: Vec<LifeId>,
    /// The man that captures this one, when `captured`.
    pub assassin: Option<LifeId>,
    /// Pawn phase detail, present iff the man is or was a pawn that moves.
    pub pawn_route: Option<PawnRoute>,
    /// Forced zero-net-displacement round trip.
    pub switchback: bool,
    /// Detour square of the round trip, decided by the switchback resolver.
    pub switchback_square: Option<Square>,
}

impl PieceLife {
    /// A man that never leaves its start square.
    pub fn at_home(id: LifeId) -> PieceLife {
        let start = start_square(id);
        let kind = start_kind(id);
        PieceLife {
            id,
            start,
            start_kind: kind,
            target: start,
            final_kind: kind,
            moves: 0,
            captured: false,
            victims: Vec::new(),
            assassin: None,
            pawn_route: None,
            switchback: false,
            switchback_square: None,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.id.color()
    }

    /// A man committed to stand on its start square for the whole game.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.moves == 0 && !self.captured
    }
}

/// The full 32-man commitment plus per-color budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Indexed by [`LifeId::index`]; always 32 entries.
    pub lives: Vec<PieceLife>,
    /// Spare moves per color, available to absorb forced detours and tempo.
    pub free_moves: [u32; 2],
    /// Spare captures per color beyond the committed victim lists, as
    /// delivered by the generator. Every capture the core schedules is a
    /// committed one, so this widens what the generator may propose rather
    /// than what the search plays.
    pub free_captures: [u32; 2],
    /// Committed castling per color, realized as a synthetic king slot.
    pub castling: [Option<CastleSide>; 2],
}

impl Strategy {
    /// The everyone-stays-home strategy: the identity diagram with all
    /// budgets zero. Tests and the external generator both build on this.
    pub fn initial() -> Strategy {
        Strategy {
            lives: LifeId::all().map(PieceLife::at_home).collect(),
            free_moves: [0, 0],
            free_captures: [0, 0],
            castling: [None, None],
        }
    }

    #[inline]
    pub fn life(&self, id: LifeId) -> &PieceLife {
        &self.lives[id.index()]
    }

    #[inline]
    pub fn life_mut(&mut self, id: LifeId) -> &mut PieceLife {
        &mut self.lives[id.index()]
    }

    pub fn lives_of(&self, color: Color) -> impl Iterator<Item = &PieceLife> {
        self.lives.iter().filter(move |l| l.color() == color)
    }

    /// Life id of the king of `color`.
    pub fn king(&self, color: Color) -> LifeId {
        LifeId::new(color.index() * 16 + 4)
    }

    /// Basic structural consistency of the commitment: 32 lives in id order,
    /// victim/assassin back-references agreeing, captured men having
    /// assassins. Deeper feasibility is the pipeline's job.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.lives.len() != LIFE_COUNT {
            return Err(format!("expected {LIFE_COUNT} lives, got {}", self.lives.len()));
        }
        for (i, life) in self.lives.iter().enumerate() {
            if life.id.index() != i {
                return Err(format!("life at index {i} carries id {}", life.id.index()));
            }
            if life.captured != life.assassin.is_some() {
                return Err(format!("life {i}: captured flag and assassin disagree"));
            }
            if let Some(a) = life.assassin {
                if a.color() == life.color() {
                    return Err(format!("life {i}: assassin has the same color"));
                }
                if !self.lives[a.index()].victims.contains(&life.id) {
                    return Err(format!("life {i}: not in its assassin's victim list"));
                }
            }
            for &v in &life.victims {
                if v.color() == life.color() {
                    return Err(format!("life {i}: victim has the same color"));
                }
                if self.lives[v.index()].assassin != Some(life.id) {
                    return Err(format!("life {i}: victim's assassin does not point back"));
                }
            }
        }
        Ok(())
    }
}

/// Every counter the planning stages are allowed to touch, captured at solve
/// entry and restored on every exit path.
#[derive(Debug, Clone)]
pub struct StrategySnapshot {
    free_moves: [u32; 2],
    free_captures: [u32; 2],
    moves: Vec<u32>,
    switchback_squares: Vec<Option<Square>>,
}

impl StrategySnapshot {
    pub fn take(s: &Strategy) -> StrategySnapshot {
        StrategySnapshot {
            free_moves: s.free_moves,
            free_captures: s.free_captures,
            moves: s.lives.iter().map(|l| l.moves).collect(),
            switchback_squares: s.lives.iter().map(|l| l.switchback_square).collect(),
        }
    }

    pub fn restore(&self, s: &mut Strategy) {
        s.free_moves = self.free_moves;
        s.free_captures = self.free_captures;
        for (life, (&m, &sw)) in s
            .lives
            .iter_mut()
            .zip(self.moves.iter().zip(self.switchback_squares.iter()))
        {
            life.moves = m;
            life.switchback_square = sw;
        }
    }
}
