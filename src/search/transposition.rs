//! Memoization of refuted positions.
//!
//! Only negative results are stored: a key goes in once its whole subtree has
//! been searched without yielding a new solution. The key must therefore pin
//! down everything the rest of the search depends on, including the live free
//! budgets and the per-slot progress. Positions with a pending en passant
//! right are never keyed; the right rarely survives a ply and encoding it is
//! not worth the extra misses.

use rustc_hash::FxHashSet;

use crate::core::board::{LifeId, LIFE_COUNT};
use crate::search::state::GameState;

/// Slots are packed into two 64-bit words, so larger pseudo games simply run
/// without memoization.
pub const MAX_KEYED_SLOTS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    /// Square index per life, 64 when captured.
    squares: [u8; LIFE_COUNT],
    played: [u64; 2],
    /// Castling rights, one bit per color and side.
    castle: u8,
    free_moves: [u32; 2],
    ply: u32,
}

/// Built fresh for every strategy attempt; keys carry no strategy id, so a
/// table must never outlive the attempt it was filled under.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    dead: FxHashSet<PositionKey>,
}

impl TranspositionTable {
    pub fn new() -> TranspositionTable {
        TranspositionTable::default()
    }

    /// The key of `state`, or `None` when the position cannot be soundly
    /// memoized.
    pub fn key_of(state: &GameState) -> Option<PositionKey> {
        if state.ep_file.is_some() || state.played.len() > MAX_KEYED_SLOTS {
            return None;
        }
        let mut squares = [64u8; LIFE_COUNT];
        for life in LifeId::all() {
            if let Some(sq) = state.loc[life.index()] {
                squares[life.index()] = sq.index() as u8;
            }
        }
        let mut played = [0u64; 2];
        for (i, &p) in state.played.iter().enumerate() {
            if p {
                played[i / 64] |= 1u64 << (i % 64);
            }
        }
        let mut castle = 0u8;
        for color in 0..2 {
            for side in 0..2 {
                if state.castle_rights[color][side] {
                    castle |= 1 << (color * 2 + side);
                }
            }
        }
        Some(PositionKey {
            squares,
            played,
            castle,
            free_moves: state.free_moves,
            ply: state.ply,
        })
    }

    #[inline]
    pub fn is_dead(&self, key: &PositionKey) -> bool {
        self.dead.contains(key)
    }

    pub fn insert_dead(&mut self, key: PositionKey) {
        self.dead.insert(key);
    }
}
