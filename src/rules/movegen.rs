//! Legal move generation for the side to move.
//!
//! Pseudo-legal moves per piece, then a make-and-test filter discarding moves
//! that leave the mover's king attacked. Castling and en passant take their
//! extra context (rights, en-passant file) as explicit arguments so the
//! generator stays independent of the search state.

use crate::core::board::{Board, LifeId, Occupant};
use crate::core::piece::{CastleSide, PieceKind};
use crate::core::square::{Color, Square};
use crate::rules::attacks::{
    bishop_dirs, is_attacked, king_square, king_steps, knight_steps, rook_dirs,
};

/// King and rook squares of a castling move for `color`/`side`:
/// `(king_from, king_to, rook_from, rook_to)`.
pub fn castle_squares(color: Color, side: CastleSide) -> (Square, Square, Square, Square) {
    let r = color.home_rank();
    match side {
        CastleSide::Kingside => (
            Square::new(4, r),
            Square::new(6, r),
            Square::new(7, r),
            Square::new(5, r),
        ),
        CastleSide::Queenside => (
            Square::new(4, r),
            Square::new(2, r),
            Square::new(0, r),
            Square::new(3, r),
        ),
    }
}

/// The rook life subsumed by a committed castling of `color`/`side`.
pub fn castling_rook(color: Color, side: CastleSide) -> LifeId {
    let base = color.index() * 16;
    match side {
        CastleSide::Kingside => LifeId::new(base + 7),
        CastleSide::Queenside => LifeId::new(base),
    }
}

/// One legal chess move, fully described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub life: LifeId,
    /// Kind before the move (a promoting pawn is still a pawn here).
    pub kind: PieceKind,
    pub from: Square,
    pub to: Square,
    pub capture: Option<LifeId>,
    /// Square the captured man stood on; differs from `to` for en passant.
    pub capture_square: Option<Square>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
}

pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// All legal moves for `side`.
pub fn legal_moves(
    board: &Board,
    side: Color,
    castle_rights: &[[bool; 2]; 2],
    ep_file: Option<u8>,
    out: &mut Vec<Move>,
) {
    out.clear();
    let mut pseudo: Vec<Move> = Vec::with_capacity(64);
    for (sq, occ) in board.iter_pieces() {
        if occ.color != side {
            continue;
        }
        match occ.kind {
            PieceKind::Pawn => pawn_moves(board, side, sq, occ, ep_file, &mut pseudo),
            PieceKind::Knight => step_moves(board, side, sq, occ, knight_steps(), &mut pseudo),
            PieceKind::King => step_moves(board, side, sq, occ, king_steps(), &mut pseudo),
            PieceKind::Rook => slide_moves(board, side, sq, occ, rook_dirs(), &mut pseudo),
            PieceKind::Bishop => slide_moves(board, side, sq, occ, bishop_dirs(), &mut pseudo),
            PieceKind::Queen => {
                slide_moves(board, side, sq, occ, rook_dirs(), &mut pseudo);
                slide_moves(board, side, sq, occ, bishop_dirs(), &mut pseudo);
            }
        }
    }
    castling_moves(board, side, castle_rights, &mut pseudo);

    for mv in pseudo {
        let after = apply_to_board(board, &mv);
        match king_square(&after, side) {
            Some(k) if !is_attacked(&after, k, side.opposite()) => out.push(mv),
            Some(_) => {}
            None => out.push(mv),
        }
    }
}

fn base_move(life: LifeId, kind: PieceKind, from: Square, to: Square) -> Move {
    Move {
        life,
        kind,
        from,
        to,
        capture: None,
        capture_square: None,
        en_passant: false,
        castle: None,
        promotion: None,
    }
}

fn step_moves(
    board: &Board,
    side: Color,
    from: Square,
    occ: Occupant,
    steps: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in steps {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        match board.get(to) {
            Some(t) if t.color == side => {}
            Some(t) => {
                let mut mv = base_move(occ.life, occ.kind, from, to);
                mv.capture = Some(t.life);
                mv.capture_square = Some(to);
                out.push(mv);
            }
            None => out.push(base_move(occ.life, occ.kind, from, to)),
        }
    }
}

fn slide_moves(
    board: &Board,
    side: Color,
    from: Square,
    occ: Occupant,
    dirs: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in dirs {
        let mut cur = from.offset(df, dr);
        while let Some(to) = cur {
            match board.get(to) {
                Some(t) if t.color == side => break,
                Some(t) => {
                    let mut mv = base_move(occ.life, occ.kind, from, to);
                    mv.capture = Some(t.life);
                    mv.capture_square = Some(to);
                    out.push(mv);
                    break;
                }
                None => {
                    out.push(base_move(occ.life, occ.kind, from, to));
                    cur = to.offset(df, dr);
                }
            }
        }
    }
}

fn push_pawn_move(side: Color, template: Move, out: &mut Vec<Move>) {
    if template.to.rank() == side.promotion_rank() {
        for kind in PROMOTION_KINDS {
            let mut mv = template;
            mv.promotion = Some(kind);
            out.push(mv);
        }
    } else {
        out.push(template);
    }
}

fn pawn_moves(
    board: &Board,
    side: Color,
    from: Square,
    occ: Occupant,
    ep_file: Option<u8>,
    out: &mut Vec<Move>,
) {
    let dir = side.forward();

    if let Some(one) = from.offset(0, dir) {
        if board.get(one).is_none() {
            push_pawn_move(side, base_move(occ.life, occ.kind, from, one), out);
            if from.rank() == side.pawn_rank() {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.get(two).is_none() {
                        out.push(base_move(occ.life, occ.kind, from, two));
                    }
                }
            }
        }
    }

    for df in [-1i8, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match board.get(to) {
            Some(t) if t.color != side => {
                let mut mv = base_move(occ.life, occ.kind, from, to);
                mv.capture = Some(t.life);
                mv.capture_square = Some(to);
                push_pawn_move(side, mv, out);
            }
            _ => {}
        }
    }

    // En passant: the enemy pawn just double-stepped past our capture square.
    if let Some(f) = ep_file {
        let victim_rank = match side {
            Color::White => 4,
            Color::Black => 3,
        };
        if from.rank() == victim_rank && (from.file() as i8 - f as i8).abs() == 1 {
            let to = Square::new(f, (victim_rank as i8 + dir) as u8);
            let victim_sq = Square::new(f, victim_rank);
            if board.get(to).is_none() {
                if let Some(v) = board.get(victim_sq) {
                    if v.color != side && v.kind == PieceKind::Pawn {
                        let mut mv = base_move(occ.life, occ.kind, from, to);
                        mv.capture = Some(v.life);
                        mv.capture_square = Some(victim_sq);
                        mv.en_passant = true;
                        out.push(mv);
                    }
                }
            }
        }
    }
}

fn castling_moves(
    board: &Board,
    side: Color,
    castle_rights: &[[bool; 2]; 2],
    out: &mut Vec<Move>,
) {
    for cs in [CastleSide::Kingside, CastleSide::Queenside] {
        if !castle_rights[side.index()][cs.index()] {
            continue;
        }
        let (k_from, k_to, r_from, _) = castle_squares(side, cs);
        let (Some(king), Some(rook)) = (board.get(k_from), board.get(r_from)) else {
            continue;
        };
        if king.kind != PieceKind::King
            || king.color != side
            || rook.kind != PieceKind::Rook
            || rook.color != side
        {
            continue;
        }
        let rank = side.home_rank();
        let empties: &[u8] = match cs {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        };
        if empties
            .iter()
            .any(|&f| board.get(Square::new(f, rank)).is_some())
        {
            continue;
        }
        let crossed = match cs {
            CastleSide::Kingside => Square::new(5, rank),
            CastleSide::Queenside => Square::new(3, rank),
        };
        let enemy = side.opposite();
        if is_attacked(board, k_from, enemy)
            || is_attacked(board, crossed, enemy)
            || is_attacked(board, k_to, enemy)
        {
            continue;
        }
        let mut mv = base_move(king.life, PieceKind::King, k_from, k_to);
        mv.castle = Some(cs);
        out.push(mv);
    }
}

/// Castling rights after `side` plays `mv`: a king move forfeits both of its
/// color's rights, and a rook leaving (or being captured on) its corner
/// forfeits that corner's right.
pub fn rights_after(rights: &[[bool; 2]; 2], side: Color, mv: &Move) -> [[bool; 2]; 2] {
    let mut out = *rights;
    if mv.kind == PieceKind::King {
        out[side.index()] = [false, false];
    }
    for color in [Color::White, Color::Black] {
        for cs in [CastleSide::Kingside, CastleSide::Queenside] {
            let (_, _, r_from, _) = castle_squares(color, cs);
            if mv.from == r_from || mv.capture_square == Some(r_from) {
                out[color.index()][cs.index()] = false;
            }
        }
    }
    out
}

/// En-passant file offered to the opponent after `side` plays `mv`.
pub fn ep_after(side: Color, mv: &Move) -> Option<u8> {
    if mv.kind == PieceKind::Pawn
        && mv.from.rank() == side.pawn_rank()
        && (mv.to.rank() as i8 - mv.from.rank() as i8).abs() == 2
    {
        Some(mv.from.file())
    } else {
        None
    }
}

/// Apply a move to a copy of the board. Pure; the search applies moves
/// through its undo log instead, but move legality tests and solution replay
/// both want this.
pub fn apply_to_board(board: &Board, mv: &Move) -> Board {
    let mut b = *board;
    if let Some(cap_sq) = mv.capture_square {
        b.set(cap_sq, None);
    }
    let mut moved = b.get(mv.from).expect("moving piece is on its square");
    if let Some(kind) = mv.promotion {
        moved.kind = kind;
    }
    b.set(mv.from, None);
    b.set(mv.to, Some(moved));
    if let Some(cs) = mv.castle {
        let color = moved.color;
        let (_, _, r_from, r_to) = castle_squares(color, cs);
        let rook = b.get(r_from).expect("castling rook is on its square");
        b.set(r_from, None);
        b.set(r_to, Some(rook));
    }
    b
}
