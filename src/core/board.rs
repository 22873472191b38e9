use serde::{Deserialize, Serialize};

use crate::core::piece::PieceKind;
use crate::core::square::{Color, Square};

/// Identity of one of the 32 men of the game, stable for the life of a
/// strategy attempt. White lives are 0..16, black lives 16..32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LifeId(u8);

pub const LIFE_COUNT: usize = 32;

impl LifeId {
    #[inline]
    pub const fn new(idx: usize) -> LifeId {
        debug_assert!(idx < LIFE_COUNT);
        LifeId(idx as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 < 16 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn all() -> impl Iterator<Item = LifeId> {
        (0..LIFE_COUNT).map(LifeId::new)
    }
}

/// One occupied board cell: which man stands there and what it currently is.
///
/// `kind` tracks promotion, so it can differ from the man's starting kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub life: LifeId,
    pub color: Color,
    pub kind: PieceKind,
}

/// The live 64-square board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Occupant>; 64],
}

/// Piece kinds on the back rank, files a..h.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    pub fn empty() -> Board {
        Board { cells: [None; 64] }
    }

    /// The standard chess starting position. Life ids follow file order: for
    /// each color, ids 0..8 are the back rank a..h, ids 8..16 the pawns a..h.
    pub fn start_position() -> Board {
        let mut b = Board::empty();
        for (color, base) in [(Color::White, 0usize), (Color::Black, 16usize)] {
            for file in 0..8u8 {
                b.set(
                    Square::new(file, color.home_rank()),
                    Some(Occupant {
                        life: LifeId::new(base + file as usize),
                        color,
                        kind: BACK_RANK[file as usize],
                    }),
                );
                b.set(
                    Square::new(file, color.pawn_rank()),
                    Some(Occupant {
                        life: LifeId::new(base + 8 + file as usize),
                        color,
                        kind: PieceKind::Pawn,
                    }),
                );
            }
        }
        b
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Occupant> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, v: Option<Occupant>) {
        self.cells[sq.index()] = v;
    }

    /// Occupancy bitboard of all pieces.
    pub fn occupied(&self) -> u64 {
        let mut occ = 0u64;
        for (i, c) in self.cells.iter().enumerate() {
            if c.is_some() {
                occ |= 1u64 << i;
            }
        }
        occ
    }

    pub fn iter_pieces(&self) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|o| (Square::from_index(i), o)))
    }

    /// Life id stationed on the given start square in the initial position.
    pub fn start_life_at(sq: Square) -> Option<LifeId> {
        Board::start_position().get(sq).map(|o| o.life)
    }
}

/// Start square of a life in the standard initial position.
pub fn start_square(life: LifeId) -> Square {
    let idx = life.index() % 16;
    let color = life.color();
    let (file, rank) = if idx < 8 {
        (idx as u8, color.home_rank())
    } else {
        ((idx - 8) as u8, color.pawn_rank())
    };
    Square::new(file, rank)
}

/// Starting piece kind of a life.
pub fn start_kind(life: LifeId) -> PieceKind {
    let idx = life.index() % 16;
    if idx < 8 {
        BACK_RANK[idx]
    } else {
        PieceKind::Pawn
    }
}
