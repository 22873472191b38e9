use std::fmt;

use serde::{Deserialize, Serialize};

/// A board square packed into a single byte, `rank * 8 + file`.
///
/// `a1` is index 0, `h8` is index 63. Files run a..h, ranks 1..8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    #[inline]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    #[inline]
    pub const fn from_index(idx: usize) -> Square {
        debug_assert!(idx < 64);
        Square(idx as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// One-bit occupancy mask for this square.
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Offset by file/rank deltas, `None` when falling off the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square::new(f as u8, r as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }

    /// Parse algebraic notation like `"e4"`. Test helper, panics on bad input.
    pub fn parse(s: &str) -> Square {
        let b = s.as_bytes();
        assert!(b.len() == 2, "bad square {s:?}");
        let file = b[0].checked_sub(b'a').filter(|&f| f < 8);
        let rank = b[1].checked_sub(b'1').filter(|&r| r < 8);
        match (file, rank) {
            (Some(f), Some(r)) => Square::new(f, r),
            _ => panic!("bad square {s:?}"),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// The color moving at 1-based ply `p` (White moves at odd plies).
    #[inline]
    pub const fn at_ply(p: u32) -> Color {
        if p % 2 == 1 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Forward rank direction for pawns of this color.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank (0-based) pawns of this color start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank (0-based) pawns of this color promote on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Back rank (0-based) of this color.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Number of plies this color plays among plies `lo..=hi` (1-based).
    pub fn plies_in(self, lo: u32, hi: u32) -> u32 {
        if lo > hi {
            return 0;
        }
        let total = hi - lo + 1;
        let first_is_ours = Color::at_ply(lo) == self;
        if first_is_ours {
            total / 2 + total % 2
        } else {
            total / 2
        }
    }
}
