//! Default [`MovementOracle`] over the standard 64-square board.
//!
//! Distances are breadth-first searches over atomic quiet moves, honoring the
//! current blocked-square set (a slider may neither land on nor pass over a
//! blocked square). Nothing here is cached across calls; the planning stages
//! query these a bounded number of times per strategy.

use crate::core::piece::PieceKind;
use crate::core::square::{Color, Square};
use crate::oracle::MovementOracle;

pub const KNIGHT_STEPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Default)]
pub struct BoardTables {
    blocked: u64,
}

impl BoardTables {
    pub fn new() -> BoardTables {
        BoardTables { blocked: 0 }
    }

    #[inline]
    fn square_free(&self, sq: Square) -> bool {
        self.blocked & sq.bit() == 0
    }

    /// All destinations of a single quiet move from `from`, honoring blocking.
    fn quiet_targets(&self, kind: PieceKind, color: Color, from: Square, out: &mut Vec<Square>) {
        out.clear();
        match kind {
            PieceKind::Knight => {
                for (df, dr) in KNIGHT_STEPS {
                    if let Some(to) = from.offset(df, dr) {
                        if self.square_free(to) {
                            out.push(to);
                        }
                    }
                }
            }
            PieceKind::King => {
                for (df, dr) in KING_STEPS {
                    if let Some(to) = from.offset(df, dr) {
                        if self.square_free(to) {
                            out.push(to);
                        }
                    }
                }
            }
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
                let dirs: &[(i8, i8)] = match kind {
                    PieceKind::Rook => &ROOK_DIRS,
                    PieceKind::Bishop => &BISHOP_DIRS,
                    _ => &[
                        (-1, 0),
                        (1, 0),
                        (0, -1),
                        (0, 1),
                        (-1, -1),
                        (-1, 1),
                        (1, -1),
                        (1, 1),
                    ],
                };
                for &(df, dr) in dirs {
                    let mut cur = from.offset(df, dr);
                    while let Some(to) = cur {
                        if !self.square_free(to) {
                            break;
                        }
                        out.push(to);
                        cur = to.offset(df, dr);
                    }
                }
            }
            PieceKind::Pawn => {
                let dir = color.forward();
                if let Some(one) = from.offset(0, dir) {
                    if self.square_free(one) {
                        out.push(one);
                        if from.rank() == color.pawn_rank() {
                            if let Some(two) = from.offset(0, 2 * dir) {
                                if self.square_free(two) {
                                    out.push(two);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// BFS distances from `from`; `dist[i] == u8::MAX` means unreachable.
    /// `ways` counts shortest paths (saturating), `parent` records one
    /// predecessor per square.
    fn bfs(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
    ) -> ([u8; 64], [u32; 64], [Option<Square>; 64]) {
        let mut dist = [u8::MAX; 64];
        let mut ways = [0u32; 64];
        let mut parent: [Option<Square>; 64] = [None; 64];
        dist[from.index()] = 0;
        ways[from.index()] = 1;

        let mut frontier = vec![from];
        let mut scratch = Vec::with_capacity(28);
        let mut d = 0u8;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &sq in &frontier {
                self.quiet_targets(kind, color, sq, &mut scratch);
                for &to in scratch.iter() {
                    let i = to.index();
                    if dist[i] == u8::MAX {
                        dist[i] = d + 1;
                        ways[i] = ways[sq.index()];
                        parent[i] = Some(sq);
                        next.push(to);
                    } else if dist[i] == d + 1 {
                        ways[i] = ways[i].saturating_add(ways[sq.index()]);
                    }
                }
            }
            frontier = next;
            d += 1;
        }
        (dist, ways, parent)
    }
}

impl MovementOracle for BoardTables {
    fn shortest_distance(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
    ) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        if !self.square_free(from) || !self.square_free(to) {
            return None;
        }
        let (dist, _, _) = self.bfs(kind, color, from);
        let d = dist[to.index()];
        if d == u8::MAX {
            None
        } else {
            Some(d as u32)
        }
    }

    fn is_legal_atomic_move(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
        capture: bool,
    ) -> bool {
        if from == to || !self.square_free(to) {
            return false;
        }
        let df = to.file() as i8 - from.file() as i8;
        let dr = to.rank() as i8 - from.rank() as i8;
        let geometric = match kind {
            PieceKind::Knight => (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1),
            PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
            PieceKind::Rook => df == 0 || dr == 0,
            PieceKind::Bishop => df.abs() == dr.abs(),
            PieceKind::Queen => df == 0 || dr == 0 || df.abs() == dr.abs(),
            PieceKind::Pawn => {
                if capture {
                    df.abs() == 1 && dr == color.forward()
                } else {
                    df == 0
                        && (dr == color.forward()
                            || (dr == 2 * color.forward() && from.rank() == color.pawn_rank()))
                }
            }
        };
        geometric
            && crate::oracle::transit_squares(kind, from, to)
                .iter()
                .all(|&sq| self.square_free(sq))
    }

    fn unique_shortest_path(
        &self,
        kind: PieceKind,
        color: Color,
        from: Square,
        to: Square,
    ) -> Option<Vec<Square>> {
        if from == to {
            return Some(vec![from]);
        }
        if !self.square_free(from) || !self.square_free(to) {
            return None;
        }
        let (dist, ways, parent) = self.bfs(kind, color, from);
        if dist[to.index()] == u8::MAX || ways[to.index()] != 1 {
            return None;
        }
        let mut path = vec![to];
        let mut cur = to;
        while let Some(p) = parent[cur.index()] {
            path.push(p);
            cur = p;
        }
        debug_assert_eq!(cur, from);
        path.reverse();
        Some(path)
    }

    fn attacks_with_interposition_check(
        &self,
        kind: PieceKind,
        color: Color,
        attacker: Square,
        target: Square,
        occupied: u64,
    ) -> bool {
        if attacker == target {
            return false;
        }
        let df = target.file() as i8 - attacker.file() as i8;
        let dr = target.rank() as i8 - attacker.rank() as i8;
        let geometric = match kind {
            PieceKind::Knight => (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1),
            PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
            PieceKind::Rook => df == 0 || dr == 0,
            PieceKind::Bishop => df.abs() == dr.abs(),
            PieceKind::Queen => df == 0 || dr == 0 || df.abs() == dr.abs(),
            PieceKind::Pawn => df.abs() == 1 && dr == color.forward(),
        };
        if !geometric {
            return false;
        }
        crate::oracle::transit_squares(kind, attacker, target)
            .iter()
            .all(|&sq| occupied & sq.bit() == 0)
    }

    fn block_square(&mut self, sq: Square) {
        self.blocked |= sq.bit();
    }

    fn unblock_square(&mut self, sq: Square) {
        self.blocked &= !sq.bit();
    }

    fn is_blocked(&self, sq: Square) -> bool {
        !self.square_free(sq)
    }
}
