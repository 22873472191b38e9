//! Switchback resolution: forced round trips with zero net displacement.
//!
//! A man that ends where it started yet is committed to two moves must step
//! out to some square and come straight back. The candidate detours are the
//! single-step destinations of the piece; one must be free of permanently
//! occupied squares in both directions. Resolution rewrites the placeholder
//! pair into two resolved slots; if any flagged man has no detour, every
//! allocation made earlier in the pass is rolled back before the strategy is
//! rejected.

use crate::core::piece::PieceKind;
use crate::core::square::Square;
use crate::oracle::{transit_squares, MovementOracle};
use crate::plan::penalty::dead_squares;
use crate::plan::{PseudoGame, RejectReason, SlotId};
use crate::strategy::Strategy;

struct Allocation {
    life: crate::core::board::LifeId,
    depart: SlotId,
    arrive: SlotId,
}

pub fn resolve<O: MovementOracle>(
    oracle: &O,
    strategy: &mut Strategy,
    pseudo: &mut PseudoGame,
) -> Result<(), RejectReason> {
    let dead = dead_squares(strategy);
    let mut allocations: Vec<Allocation> = Vec::new();

    let heads: Vec<SlotId> = (0..pseudo.slots.len())
        .filter(|&id| pseudo.slots[id].switchback && !pseudo.slots[id].pair_arrive)
        .collect();

    for depart in heads {
        let life = pseudo.slots[depart].life;
        let kind = pseudo.slots[depart].kind;
        let color = life.color();
        let Some(home) = pseudo.slots[depart].from else {
            continue;
        };
        let Some(arrive) = pseudo.chain_next(depart) else {
            continue;
        };

        // Pawns cannot come back; a flagged pawn is a generator bug upstream,
        // a blocked piece a plain rejection.
        let detour = if kind == PieceKind::Pawn {
            None
        } else {
            pick_detour(oracle, kind, color, home, &dead)
        };

        match detour {
            Some(d) => {
                pseudo.slots[depart].to = Some(d);
                pseudo.slots[depart].goal = d;
                pseudo.slots[depart].leg_moves = 1;
                pseudo.slots[arrive].from = Some(d);
                pseudo.slots[arrive].pair_arrive = false;
                strategy.life_mut(life).switchback_square = Some(d);
                allocations.push(Allocation {
                    life,
                    depart,
                    arrive,
                });
            }
            None => {
                rollback(strategy, pseudo, &allocations);
                return Err(RejectReason::SwitchbackBlocked { life });
            }
        }
    }
    Ok(())
}

/// First single-step detour square clear of permanently occupied squares, in
/// square order.
fn pick_detour<O: MovementOracle>(
    oracle: &O,
    kind: PieceKind,
    color: crate::core::square::Color,
    home: Square,
    dead: &[Square],
) -> Option<Square> {
    Square::all().find(|&d| {
        d != home
            && !dead.contains(&d)
            && oracle.is_legal_atomic_move(kind, color, home, d, false)
            && oracle.is_legal_atomic_move(kind, color, d, home, false)
            && transit_squares(kind, home, d)
                .iter()
                .all(|t| !dead.contains(t))
    })
}

fn rollback(strategy: &mut Strategy, pseudo: &mut PseudoGame, allocations: &[Allocation]) {
    for a in allocations.iter().rev() {
        pseudo.slots[a.depart].to = None;
        pseudo.slots[a.depart].goal = pseudo.slots[a.arrive].goal;
        pseudo.slots[a.depart].leg_moves = 2;
        pseudo.slots[a.arrive].from = None;
        pseudo.slots[a.arrive].pair_arrive = true;
        strategy.life_mut(a.life).switchback_square = None;
    }
}
