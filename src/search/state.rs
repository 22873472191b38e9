//! Live search state: the board plus every counter the tree search mutates.
//!
//! All fields are only ever changed through [`UndoLog`] helpers so that
//! backtracking restores them bit for bit.
//!
//! [`UndoLog`]: crate::search::undo::UndoLog

use crate::core::board::{Board, LifeId, LIFE_COUNT};
use crate::core::square::{Color, Square};
use crate::plan::PseudoGame;
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Current square per life; `None` once captured.
    pub loc: [Option<Square>; LIFE_COUNT],
    /// Consumed slots per life (index into its chain).
    pub cursor: [u8; LIFE_COUNT],
    /// Whether the life currently stands on its committed final square with
    /// its chain complete.
    pub reached_final: [bool; LIFE_COUNT],
    /// `[color][side]`, chess castling rights (not the strategy commitment).
    pub castle_rights: [[bool; 2]; 2],
    /// File of a double step played on the previous ply, if any.
    pub ep_file: Option<u8>,
    /// Half-moves played so far.
    pub ply: u32,
    /// Per-slot "already played" flags, including mid-leg departing heads.
    pub played: Vec<bool>,
    /// Live free-move budgets per color.
    pub free_moves: [u32; 2],
}

impl GameState {
    /// The state before the first ply of a strategy attempt.
    pub fn initial(strategy: &Strategy, pseudo: &PseudoGame) -> GameState {
        let board = Board::start_position();
        let mut loc = [None; LIFE_COUNT];
        let mut reached = [false; LIFE_COUNT];
        for life in LifeId::all() {
            let start = strategy.life(life).start;
            loc[life.index()] = Some(start);
            reached[life.index()] =
                pseudo.chain(life).is_empty() && strategy.life(life).target == start;
        }
        // Committed moves above a chain's minimum are slack; they pool with
        // the color's free budget and pay for tempo the same way.
        let mut free_moves = strategy.free_moves;
        for life in LifeId::all() {
            let committed = strategy.life(life);
            let slack = committed
                .moves
                .saturating_sub(pseudo.chain_min_moves(life));
            free_moves[committed.color().index()] += slack;
        }
        GameState {
            board,
            loc,
            cursor: [0; LIFE_COUNT],
            reached_final: reached,
            castle_rights: [[true; 2]; 2],
            ep_file: None,
            ply: 0,
            played: vec![false; pseudo.slots.len()],
            free_moves,
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        Color::at_ply(self.ply + 1)
    }
}
