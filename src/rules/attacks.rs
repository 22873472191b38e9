use crate::core::board::Board;
use crate::core::piece::PieceKind;
use crate::core::square::{Color, Square};
use crate::oracle::tables::{BISHOP_DIRS, KING_STEPS, KNIGHT_STEPS, ROOK_DIRS};

/// True iff `target` is attacked by any man of `by`, with the full board as
/// interposition blockers.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    let occupied = board.occupied();
    board
        .iter_pieces()
        .any(|(sq, occ)| occ.color == by && piece_attacks(occ.kind, by, sq, target, occupied))
}

/// Geometric attack test for one man, `occupied` blocking slider rays.
pub fn piece_attacks(
    kind: PieceKind,
    color: Color,
    from: Square,
    target: Square,
    occupied: u64,
) -> bool {
    if from == target {
        return false;
    }
    let df = target.file() as i8 - from.file() as i8;
    let dr = target.rank() as i8 - from.rank() as i8;
    match kind {
        PieceKind::Pawn => df.abs() == 1 && dr == color.forward(),
        PieceKind::Knight => (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
        PieceKind::Rook => (df == 0 || dr == 0) && ray_clear(from, target, occupied),
        PieceKind::Bishop => df.abs() == dr.abs() && ray_clear(from, target, occupied),
        PieceKind::Queen => {
            (df == 0 || dr == 0 || df.abs() == dr.abs()) && ray_clear(from, target, occupied)
        }
    }
}

fn ray_clear(from: Square, to: Square, occupied: u64) -> bool {
    let df = (to.file() as i8 - from.file() as i8).signum();
    let dr = (to.rank() as i8 - from.rank() as i8).signum();
    let mut cur = from.offset(df, dr);
    while let Some(sq) = cur {
        if sq == to {
            return true;
        }
        if occupied & sq.bit() != 0 {
            return false;
        }
        cur = sq.offset(df, dr);
    }
    false
}

/// The king square of `color`, or `None` on a board without that king
/// (only possible in hand-built test positions).
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board
        .iter_pieces()
        .find(|(_, o)| o.color == color && o.kind == PieceKind::King)
        .map(|(sq, _)| sq)
}

/// Step tables shared with the movement oracle, re-exported for move
/// generation.
pub fn knight_steps() -> &'static [(i8, i8); 8] {
    &KNIGHT_STEPS
}

pub fn king_steps() -> &'static [(i8, i8); 8] {
    &KING_STEPS
}

pub fn rook_dirs() -> &'static [(i8, i8); 4] {
    &ROOK_DIRS
}

pub fn bishop_dirs() -> &'static [(i8, i8); 4] {
    &BISHOP_DIRS
}
