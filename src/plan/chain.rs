//! Chain expansion: one committed [`PieceLife`] into an ordered run of
//! [`MoveSlot`]s.
//!
//! Pawns walk their precomputed route square by square. Other pieces (and
//! promoted pawns) visit each committed victim's final square and then their
//! own final square; a leg is unrolled into resolved one-move slots only when
//! its shortest path is unique and the budget forces the minimum, otherwise it
//! becomes a two-slot unresolved depart/arrive placeholder.
//!
//! [`PieceLife`]: crate::strategy::PieceLife

use crate::core::board::LifeId;
use crate::core::piece::PieceKind;
use crate::core::square::{Color, Square};
use crate::oracle::MovementOracle;
use crate::rules::movegen::{castle_squares, castling_rook};
use crate::plan::{MoveSlot, PseudoGame, RejectReason};
use crate::strategy::{PieceLife, Strategy};

/// Expand every life of both colors into the pseudo game, whites first.
pub fn build_chains<O: MovementOracle>(
    oracle: &O,
    strategy: &Strategy,
    pseudo: &mut PseudoGame,
) -> Result<(), RejectReason> {
    for id in crate::core::board::LifeId::all() {
        build_chain(oracle, strategy, strategy.life(id), pseudo)?;
    }
    Ok(())
}

fn build_chain<O: MovementOracle>(
    oracle: &O,
    strategy: &Strategy,
    life: &PieceLife,
    pseudo: &mut PseudoGame,
) -> Result<(), RejectReason> {
    let color = life.color();
    let free = strategy.free_moves[color.index()];
    let mut emitted: Vec<MoveSlot> = Vec::new();
    let mut cur = life.start;
    let mut kind = life.start_kind;
    let mut suppress_first = false;

    // Castling: a synthetic king slot anchors the whole maneuver; the rook's
    // own first move is subsumed by it.
    if let Some(side) = strategy.castling[color.index()] {
        let (k_from, k_to, r_from, r_to) = castle_squares(color, side);
        if life.id == strategy.king(color) {
            debug_assert_eq!(life.start, k_from);
            let mut slot = MoveSlot::new(life.id, PieceKind::King, k_from, k_to);
            slot.castle = Some(side);
            emitted.push(slot);
            cur = k_to;
        } else if life.id == castling_rook(color, side) {
            debug_assert_eq!(life.start, r_from);
            cur = r_to;
            suppress_first = true;
        }
    }

    // Pawn phase.
    let mut consumed_victims: Vec<LifeId> = Vec::new();
    if let Some(route) = &life.pawn_route {
        let sq = &route.squares;
        debug_assert!(sq.len() >= 2 && sq[0] == life.start);
        for i in 0..sq.len() - 1 {
            let (from, to) = (sq[i], sq[i + 1]);
            let is_capture = from.file() != to.file();
            let victim = if is_capture {
                Some(resolve_pawn_victim(
                    strategy,
                    life,
                    &consumed_victims,
                    to,
                    color,
                )?)
            } else {
                None
            };
            if let Some(v) = victim {
                consumed_victims.push(v);
            }

            let split_first = i == 0 && route.min_moves != route.max_moves && free >= 1;
            if split_first {
                // Single vs double first step stays open; commit only the
                // destination, not the step count.
                emitted.push(MoveSlot::unresolved_depart(life.id, kind, from, to, 1));
                let mut arrive = MoveSlot::unresolved_arrive(life.id, kind, to);
                arrive.victim = victim;
                emitted.push(arrive);
            } else {
                let mut slot = MoveSlot::new(life.id, kind, from, to);
                slot.victim = victim;
                emitted.push(slot);
            }

            if to.rank() == color.promotion_rank() {
                let slot = emitted.last_mut().expect("promotion step just emitted");
                slot.promotion = Some(life.final_kind);
            }
        }
        cur = *sq.last().expect("route is non-empty");
        if cur.rank() == color.promotion_rank() {
            kind = life.final_kind;
        }
    }

    // Translation phase: remaining victims' final squares, then home.
    let mut waypoints: Vec<(Square, Option<LifeId>)> = Vec::new();
    for &v in &life.victims {
        if !consumed_victims.contains(&v) {
            waypoints.push((strategy.life(v).target, Some(v)));
        }
    }
    let end_of_victims = waypoints.last().map(|&(w, _)| w).unwrap_or(cur);
    if end_of_victims != life.target {
        waypoints.push((life.target, None));
    }

    for (goal, victim) in waypoints {
        if kind == PieceKind::Pawn {
            // A pawn's travel is fully described by its route.
            return Err(RejectReason::NoRoute {
                life: life.id,
                from: cur,
                to: goal,
            });
        }
        let d = oracle
            .shortest_distance(kind, color, cur, goal)
            .ok_or(RejectReason::NoRoute {
                life: life.id,
                from: cur,
                to: goal,
            })?;
        if d == 0 {
            // Capturing on the square the piece already occupies needs a
            // round trip; only the switchback resolver can license that.
            if victim.is_some() {
                return Err(RejectReason::NoRoute {
                    life: life.id,
                    from: cur,
                    to: goal,
                });
            }
            continue;
        }
        if free == 0 {
            // No budget to deviate: the leg is pinned to a minimum route,
            // and to the exact squares when that route is unique.
            if d == 1 {
                let mut slot = MoveSlot::new(life.id, kind, cur, goal);
                slot.victim = victim;
                emitted.push(slot);
            } else if let Some(path) = oracle.unique_shortest_path(kind, color, cur, goal) {
                for w in path.windows(2) {
                    emitted.push(MoveSlot::new(life.id, kind, w[0], w[1]));
                }
                let slot = emitted.last_mut().expect("path has at least one edge");
                slot.victim = victim;
            } else {
                emit_unresolved_leg(&mut emitted, life.id, kind, cur, goal, d, victim);
            }
        } else {
            // With budget in hand even a one-move leg may detour, so the
            // intermediate squares stay open.
            emit_unresolved_leg(&mut emitted, life.id, kind, cur, goal, d, victim);
        }
        cur = goal;
    }

    // A forced round trip with no visible displacement.
    if life.switchback && emitted.is_empty() {
        let mut depart = MoveSlot::unresolved_depart(life.id, kind, life.start, life.start, 2);
        depart.switchback = true;
        let mut arrive = MoveSlot::unresolved_arrive(life.id, kind, life.start);
        arrive.switchback = true;
        emitted.push(depart);
        emitted.push(arrive);
    }

    if emitted.is_empty() {
        return Ok(());
    }

    emitted.first_mut().expect("non-empty").first = !suppress_first;
    emitted.last_mut().expect("non-empty").last = true;

    let min_total: u32 = emitted
        .iter()
        .map(|s| if s.pair_arrive { 0 } else { s.leg_moves })
        .sum();
    if min_total > life.moves + free {
        return Err(RejectReason::BudgetExhausted {
            color,
            needed: min_total - life.moves - free,
        });
    }

    for slot in emitted {
        pseudo.push_slot(slot);
    }
    Ok(())
}

fn emit_unresolved_leg(
    emitted: &mut Vec<MoveSlot>,
    life: LifeId,
    kind: PieceKind,
    from: Square,
    goal: Square,
    leg_moves: u32,
    victim: Option<LifeId>,
) {
    emitted.push(MoveSlot::unresolved_depart(life, kind, from, goal, leg_moves));
    let mut arrive = MoveSlot::unresolved_arrive(life, kind, goal);
    arrive.victim = victim;
    emitted.push(arrive);
}

/// Match a pawn capture step to the committed victim dying on `square`,
/// disambiguating several candidates by committed capture order. An en
/// passant victim's final square is the one directly behind the capture
/// destination, so that square is accepted too when the victim is a pawn.
fn resolve_pawn_victim(
    strategy: &Strategy,
    life: &PieceLife,
    consumed: &[LifeId],
    square: Square,
    color: Color,
) -> Result<LifeId, RejectReason> {
    let ep_square = square.offset(0, -color.forward());
    life.victims
        .iter()
        .copied()
        .find(|&v| {
            let victim = strategy.life(v);
            if consumed.contains(&v) || victim.assassin != Some(life.id) {
                return false;
            }
            victim.target == square
                || (victim.start_kind == PieceKind::Pawn
                    && victim.final_kind == PieceKind::Pawn
                    && ep_square == Some(victim.target))
        })
        .ok_or(RejectReason::VictimMismatch {
            life: life.id,
            square,
        })
}
