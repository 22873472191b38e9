//! Ply scheduling: critical-path relaxation of earliest/latest feasible plies.
//!
//! Plies are 1-based; White plays the odd ones. A hard predecessor of the
//! same color pushes a slot two plies later, one of the other color only one
//! (half-move alternation). The two halves of an unresolved leg are spaced by
//! `2 * (leg_moves - 1)` plies: the intermediate moves of the leg itself.
//!
//! The relaxation runs to fixpoint; an acyclic graph settles within one pass
//! per slot, so a bound on iterations doubles as an internal-consistency
//! check (the cycle detector has already vouched for acyclicity).

use crate::plan::{PseudoGame, RejectReason, SlotId};
use crate::solver::SolveError;

/// Ply distance implied by a hard edge `before -> after`.
fn edge_delta(pseudo: &PseudoGame, before: SlotId, after: SlotId) -> u32 {
    let b = &pseudo.slots[before];
    let a = &pseudo.slots[after];
    if b.life == a.life && a.pair_arrive && pseudo.chain_next(before) == Some(after) {
        return 2 * b.leg_moves.saturating_sub(1);
    }
    if b.life.color() == a.life.color() {
        2
    } else {
        1
    }
}

pub fn schedule(pseudo: &mut PseudoGame, n: u32) -> Result<(), SolveError> {
    let count = pseudo.slots.len();
    if count == 0 {
        return Ok(());
    }
    if n == 0 {
        return Err(SolveError::Rejected(RejectReason::UnschedulableSlot {
            slot: 0,
        }));
    }

    // Last ply each color can move on.
    let last_white = if n % 2 == 1 { n } else { n - 1 };
    let last_black = if n % 2 == 0 { n } else { n.saturating_sub(1) };

    for slot in &mut pseudo.slots {
        match slot.life.color() {
            crate::core::square::Color::White => {
                slot.earliest = 1;
                slot.latest = last_white;
            }
            crate::core::square::Color::Black => {
                slot.earliest = 2;
                slot.latest = last_black;
            }
        }
    }
    if last_black == 0 {
        // n == 1 with black slots present.
        for slot in &pseudo.slots {
            if slot.life.color() == crate::core::square::Color::Black {
                return Err(SolveError::Rejected(RejectReason::UnschedulableSlot {
                    slot: 0,
                }));
            }
        }
    }

    // Forward and backward relaxation to fixpoint.
    let max_rounds = count + 2;
    let mut rounds = 0;
    loop {
        let mut changed = false;
        for id in 0..count {
            for p in pseudo.slots[id].must_follow.clone() {
                let e = pseudo.slots[p].earliest + edge_delta(pseudo, p, id);
                if e > pseudo.slots[id].earliest {
                    pseudo.slots[id].earliest = e;
                    changed = true;
                }
            }
            for s in pseudo.slots[id].must_precede.clone() {
                let d = edge_delta(pseudo, id, s);
                let l = pseudo.slots[s].latest.saturating_sub(d);
                if l < pseudo.slots[id].latest {
                    pseudo.slots[id].latest = l;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
        rounds += 1;
        if rounds > max_rounds {
            // Relaxation on an acyclic graph must settle; a runaway here
            // means the graph the cycle detector accepted was not acyclic.
            return Err(SolveError::InvariantViolation {
                detail: "ply relaxation did not reach a fixpoint on an acyclic graph",
            });
        }
    }

    for (id, slot) in pseudo.slots.iter().enumerate() {
        if slot.earliest > n || slot.earliest > slot.latest || slot.latest == 0 {
            return Err(SolveError::Rejected(RejectReason::UnschedulableSlot {
                slot: id,
            }));
        }
    }
    Ok(())
}
