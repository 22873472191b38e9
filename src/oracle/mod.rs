//! Piece-movement legality and shortest-path queries.
//!
//! The planning stages never touch the live board; they reason about routes on
//! an otherwise empty board with a set of *blocked* squares (squares known to
//! be occupied for the whole relevant window). The [`MovementOracle`] trait is
//! that boundary; [`tables::BoardTables`] is the default implementation.
//!
//! Blocking is scoped: every `block_square` must be paired with an
//! `unblock_square`, including on early-rejection paths. [`BlockScope`] is the
//! guard enforcing that discipline.

pub mod tables;

use crate::core::piece::PieceKind;
use crate::core::square::{Color, Square};

pub trait MovementOracle {
    /// Minimum number of moves for a piece of `kind` to go `from -> to` on an
    /// empty board avoiding blocked squares. `None` when unreachable.
    ///
    /// Pawn distances are quiet forward distances on the pawn's own file;
    /// captures (file changes) are the strategy generator's business and are
    /// delivered as precomputed routes.
    fn shortest_distance(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
    ) -> Option<u32>;

    /// Whether `from -> to` is a single legal move for the piece, honoring
    /// blocked squares on slider transits. `capture` selects pawn geometry
    /// (diagonal vs forward); other kinds move and capture alike.
    fn is_legal_atomic_move(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
        capture: bool,
    ) -> bool;

    /// The unique shortest path `from -> to` (inclusive of both endpoints), or
    /// `None` when unreachable or when several shortest paths exist.
    fn unique_shortest_path(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
    ) -> Option<Vec<Square>>;

    /// Whether a piece of `kind`/`color` on `attacker` attacks `target` given
    /// the occupancy bitboard `occupied` as interposition blockers.
    fn attacks_with_interposition_check(
        &self,
        kind: PieceKind,
        color: Color,
        attacker: Square,
        target: Square,
        occupied: u64,
    ) -> bool;

    fn block_square(&mut self, sq: Square);

    fn unblock_square(&mut self, sq: Square);

    fn is_blocked(&self, sq: Square) -> bool;
}

/// RAII guard releasing a set of blocked squares when dropped.
///
/// Rejection paths return early with `?`; the guard guarantees the oracle is
/// left clean regardless.
pub struct BlockScope<'a, O: MovementOracle> {
    oracle: &'a mut O,
    blocked: Vec<Square>,
}

impl<'a, O: MovementOracle> BlockScope<'a, O> {
    pub fn new(oracle: &'a mut O) -> Self {
        Self {
            oracle,
            blocked: Vec::new(),
        }
    }

    pub fn block(&mut self, sq: Square) {
        self.oracle.block_square(sq);
        self.blocked.push(sq);
    }

    pub fn oracle(&mut self) -> &mut O {
        self.oracle
    }
}

impl<O: MovementOracle> Drop for BlockScope<'_, O> {
    fn drop(&mut self) {
        for &sq in self.blocked.iter().rev() {
            self.oracle.unblock_square(sq);
        }
    }
}

/// Squares a move passes over without stopping: the strictly-between squares
/// of slider moves and the skipped square of a pawn double step.
pub fn transit_squares(kind: PieceKind, from: Square, to: Square) -> Vec<Square> {
    let mut out = Vec::new();
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    match kind {
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            if df == 0 || dr == 0 || df.abs() == dr.abs() {
                let sf = df.signum();
                let sr = dr.signum();
                let mut cur = from.offset(sf, sr);
                while let Some(sq) = cur {
                    if sq == to {
                        break;
                    }
                    out.push(sq);
                    cur = sq.offset(sf, sr);
                }
            }
        }
        PieceKind::Pawn => {
            if df == 0 && dr.abs() == 2 {
                if let Some(mid) = from.offset(0, dr / 2) {
                    out.push(mid);
                }
            }
        }
        PieceKind::Knight | PieceKind::King => {}
    }
    out
}
