//! Penalty propagation: forced extra move costs caused by occupied squares.
//!
//! Chains are expanded on an empty board, so a committed leg may run straight
//! through a square some other man occupies for the whole game. This pass
//! first fills every slot's `cost_if_blocked` table (the leg cost if a given
//! square were unusable as origin, destination, or transit), then repeatedly
//! charges each slot whose table entry for a permanently occupied square
//! exceeds its committed cost; the difference comes out of the color's
//! free-move budget. A charge the budget cannot absorb rejects the strategy,
//! as does a table entry with no route at all.
//!
//! Squares occupied only until a capture are *not* blocked here; whether a
//! transit happens before or after the capture is an ordering question and
//! belongs to the precedence builder.

use crate::core::square::Square;
use crate::oracle::{BlockScope, MovementOracle};
use crate::plan::{slot_transit, PseudoGame, RejectReason, SlotId};
use crate::strategy::Strategy;

/// Squares occupied for the whole game: men that never move and are never
/// captured.
pub fn dead_squares(strategy: &Strategy) -> Vec<Square> {
    strategy
        .lives
        .iter()
        .filter(|l| l.is_stationary())
        .map(|l| l.start)
        .collect()
}

pub fn propagate<O: MovementOracle>(
    oracle: &mut O,
    strategy: &mut Strategy,
    pseudo: &mut PseudoGame,
) -> Result<(), RejectReason> {
    let dead = dead_squares(strategy);

    build_cost_tables(oracle, pseudo);

    // Fixpoint: charge forced detours off the cost tables until no slot's
    // committed cost changes.
    loop {
        let mut changed = false;
        for id in 0..pseudo.slots.len() {
            changed |= charge_slot(strategy, pseudo, id, &dead)?;
        }
        if !changed {
            break;
        }
    }
    Ok(())
}

/// For every square, the cost each slot's leg would incur if that square were
/// hypothetically unusable as origin, destination, or transit.
fn build_cost_tables<O: MovementOracle>(oracle: &mut O, pseudo: &mut PseudoGame) {
    for slot in &mut pseudo.slots {
        slot.cost_if_blocked = vec![Some(slot.leg_moves); 64];
    }
    for sq in Square::all() {
        let mut scope = BlockScope::new(oracle);
        scope.block(sq);
        let o = scope.oracle();
        for slot in &mut pseudo.slots {
            if slot.pair_arrive {
                continue;
            }
            slot.cost_if_blocked[sq.index()] = slot_cost(o, slot);
        }
    }
}

/// Leg cost of one slot under the oracle's current blocking.
fn slot_cost<O: MovementOracle>(oracle: &O, slot: &crate::plan::MoveSlot) -> Option<u32> {
    match (slot.from, slot.to) {
        (Some(from), Some(to)) => {
            // A committed atomic move: unusable squares on it kill the leg.
            let hit = oracle.is_blocked(from)
                || oracle.is_blocked(to)
                || slot_transit(slot).iter().any(|&t| oracle.is_blocked(t));
            if hit {
                None
            } else {
                Some(slot.leg_moves)
            }
        }
        (Some(from), None) => oracle.shortest_distance(slot.kind, slot.life.color(), from, slot.goal),
        _ => Some(0),
    }
}

/// Charge one slot for the dearest of its dead-square table entries.
fn charge_slot(
    strategy: &mut Strategy,
    pseudo: &mut PseudoGame,
    id: SlotId,
    dead: &[Square],
) -> Result<bool, RejectReason> {
    let slot = &pseudo.slots[id];
    if slot.pair_arrive {
        return Ok(false);
    }
    let mut needed = slot.leg_moves;
    for &sq in dead {
        match slot.cost_if_blocked[sq.index()] {
            Some(c) => needed = needed.max(c),
            None => return Err(RejectReason::ContestedSquare { square: sq }),
        }
    }
    if needed <= slot.leg_moves {
        return Ok(false);
    }
    let extra = needed - slot.leg_moves;
    let color = slot.life.color();
    let life = slot.life;
    if strategy.free_moves[color.index()] < extra {
        return Err(RejectReason::BudgetExhausted {
            color,
            needed: extra,
        });
    }
    strategy.free_moves[color.index()] -= extra;
    strategy.life_mut(life).moves += extra;
    pseudo.slots[id].leg_moves = needed;
    Ok(true)
}
