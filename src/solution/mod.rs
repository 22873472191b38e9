//! Completed proof games: recording, independent replay verification, and
//! JSON export.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::piece::{CastleSide, PieceKind};
use crate::core::square::{Color, Square};
use crate::rules::movegen::{apply_to_board, ep_after, legal_moves, rights_after, Move};

/// One played move, stripped of search bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub kind: PieceKind,
    pub from: Square,
    pub to: Square,
    pub capture: bool,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
}

impl MoveRecord {
    pub fn of(mv: &Move) -> MoveRecord {
        MoveRecord {
            kind: mv.kind,
            from: mv.from,
            to: mv.to,
            capture: mv.capture.is_some(),
            en_passant: mv.en_passant,
            castle: mv.castle,
            promotion: mv.promotion,
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle {
            Some(CastleSide::Kingside) => return write!(f, "O-O"),
            Some(CastleSide::Queenside) => return write!(f, "O-O-O"),
            None => {}
        }
        write!(
            f,
            "{}{}{}",
            self.from,
            if self.capture { "x" } else { "" },
            self.to
        )?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.letter())?;
        }
        Ok(())
    }
}

/// One full proof game, White's first move first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub moves: Vec<MoveRecord>,
}

impl Solution {
    pub fn ply_count(&self) -> u32 {
        self.moves.len() as u32
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Replay from the start position through the full rules of chess,
    /// independent of every structure the search used to find the line.
    /// Returns the final board, or `None` if any move is illegal.
    pub fn replay(&self) -> Option<Board> {
        let mut board = Board::start_position();
        let mut rights = [[true; 2]; 2];
        let mut ep_file: Option<u8> = None;
        let mut moves: Vec<Move> = Vec::new();
        for (i, record) in self.moves.iter().enumerate() {
            let side = Color::at_ply(i as u32 + 1);
            legal_moves(&board, side, &rights, ep_file, &mut moves);
            let mv = *moves.iter().find(|m| {
                m.from == record.from
                    && m.to == record.to
                    && m.castle == record.castle
                    && m.promotion == record.promotion
            })?;
            board = apply_to_board(&board, &mv);
            rights = rights_after(&rights, side, &mv);
            ep_file = ep_after(side, &mv);
        }
        Some(board)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}.", i / 2 + 1)?;
            }
            write!(f, " {record}")?;
        }
        Ok(())
    }
}
