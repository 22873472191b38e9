//! Precedence derivation: which slot must (or should) be played before which.
//!
//! Hard edges (`must_follow` / `must_precede`) come from chain order, capture
//! dependencies, check geometry around king transits, and square contention
//! with no alternative ordering. Soft edges (`may_follow` / `may_precede`)
//! record contention that admits both orders, one of them at detour cost; a
//! later tightening pass hardens a soft edge when a hard edge to an adjacent
//! slot of the same chain already pins the order.
//!
//! Square occupancy reasoning works in windows: a square is held from a
//! slot's arrival until the chain's next departure, or forever when the man
//! stays, or until the capture slot when the man dies there.

use crate::core::piece::{CastleSide, PieceKind};
use crate::core::square::Square;
use crate::oracle::MovementOracle;
use crate::rules::movegen::{castle_squares, castling_rook};
use crate::plan::{slot_transit, PseudoGame, RejectReason, SlotId};
use crate::strategy::Strategy;

/// How the occupancy window opened by a slot's arrival closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OccupancyEnd {
    /// The man departs with this later slot.
    Departs(SlotId),
    /// The man is captured on the square by this slot.
    Captured(SlotId),
    /// The man stays for the rest of the game.
    Permanent,
}

pub fn build<O: MovementOracle>(
    oracle: &O,
    strategy: &Strategy,
    pseudo: &mut PseudoGame,
) -> Result<(), RejectReason> {
    let capture_slot = capture_slot_map(pseudo);

    chain_edges(strategy, pseudo);
    capture_edges(pseudo, &capture_slot);
    king_safety_edges(oracle, strategy, pseudo, &capture_slot)?;
    contention_edges(strategy, pseudo, &capture_slot)?;
    stationary_occupant_edges(strategy, pseudo, &capture_slot)?;
    pawn_corridor_edges(pseudo);

    deduplicate(pseudo);
    tighten(pseudo);
    deduplicate(pseudo);
    normalize(pseudo);
    Ok(())
}

/// Slot capturing each life, indexed by life.
fn capture_slot_map(pseudo: &PseudoGame) -> Vec<Option<SlotId>> {
    let mut map = vec![None; crate::core::board::LIFE_COUNT];
    for (id, slot) in pseudo.slots.iter().enumerate() {
        if let Some(v) = slot.victim {
            debug_assert!(map[v.index()].is_none(), "life captured twice");
            map[v.index()] = Some(id);
        }
    }
    map
}

/// Total order within each chain, plus the castling anchor for the rook whose
/// first move is subsumed by the king's castling slot.
fn chain_edges(strategy: &Strategy, pseudo: &mut PseudoGame) {
    for life in crate::core::board::LifeId::all() {
        let chain: Vec<SlotId> = pseudo.chain(life).to_vec();
        for w in chain.windows(2) {
            pseudo.add_must(w[1], w[0]);
        }
    }
    for color in [crate::core::square::Color::White, crate::core::square::Color::Black] {
        if let Some(side) = strategy.castling[color.index()] {
            let king = strategy.king(color);
            let Some(anchor) = pseudo.first_slot(king) else {
                continue;
            };
            debug_assert_eq!(pseudo.slots[anchor].castle, Some(side));
            if let Some(rook_first) = pseudo.first_slot(castling_rook(color, side)) {
                pseudo.add_must(rook_first, anchor);
            }
        }
    }
}

/// A capture can only land once its victim has finished its own chain.
fn capture_edges(pseudo: &mut PseudoGame, capture_slot: &[Option<SlotId>]) {
    for life in crate::core::board::LifeId::all() {
        let Some(cap) = capture_slot[life.index()] else {
            continue;
        };
        if let Some(last) = pseudo.last_slot(life) {
            pseudo.add_must(cap, last);
        }
    }
}

/// A king may not transit a square an enemy man attacks. Enemies attacking
/// from their start square must have departed (or been captured at home)
/// first; failing both, a man committed to stand permanently on the attack
/// ray licenses the transit once it has arrived. Enemies attacking the
/// vacated square from their final square may only arrive afterwards.
fn king_safety_edges<O: MovementOracle>(
    oracle: &O,
    strategy: &Strategy,
    pseudo: &mut PseudoGame,
    capture_slot: &[Option<SlotId>],
) -> Result<(), RejectReason> {
    // Interposition blockers: men that never move at all.
    let mut blockers = 0u64;
    for life in &strategy.lives {
        if life.moves == 0 {
            blockers |= life.start.bit();
        }
    }

    let king_slots: Vec<SlotId> = (0..pseudo.slots.len())
        .filter(|&id| pseudo.slots[id].kind == PieceKind::King && !pseudo.slots[id].pair_arrive)
        .collect();

    for k_id in king_slots {
        let slot = pseudo.slots[k_id].clone();
        let color = slot.life.color();

        // Squares the king occupies or crosses during this move.
        let mut exposed: Vec<Square> = Vec::new();
        if let Some(to) = slot.to {
            exposed.push(to);
        }
        if let Some(side) = slot.castle {
            let rank = color.home_rank();
            exposed.push(match side {
                CastleSide::Kingside => Square::new(5, rank),
                CastleSide::Queenside => Square::new(3, rank),
            });
        }

        for enemy in strategy.lives_of(color.opposite()) {
            for &sq in &exposed {
                let start_attack = enemy.start != sq
                    && oracle.attacks_with_interposition_check(
                        enemy.start_kind,
                        enemy.color(),
                        enemy.start,
                        sq,
                        blockers & !enemy.start.bit() & !slot.from.map_or(0, Square::bit),
                    );
                if start_attack {
                    if let Some(first) = pseudo.first_slot(enemy.id) {
                        pseudo.add_must(k_id, first);
                    } else if let Some(cap) = capture_slot[enemy.id.index()] {
                        pseudo.add_must(k_id, cap);
                    } else if let Some(shield) =
                        committed_shield(strategy, pseudo, enemy.start_kind, enemy.start, sq)
                    {
                        pseudo.add_must(k_id, shield);
                    } else {
                        return Err(RejectReason::PermanentCheck { king_square: sq });
                    }
                }
            }

            // Arrival side: attacking the square the king is vacating.
            if let Some(from) = slot.from {
                if enemy.moves > 0
                    && enemy.target != enemy.start
                    && oracle.attacks_with_interposition_check(
                        enemy.final_kind,
                        enemy.color(),
                        enemy.target,
                        from,
                        blockers,
                    )
                {
                    if let Some(last) = pseudo.last_slot(enemy.id) {
                        pseudo.add_must(last, k_id);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Last slot of a man committed to stand for good on the ray between a
/// stationary attacker and the attacked square. Once such a man arrives it
/// screens the ray for the rest of the game, so the king move only has to
/// wait for it instead of rejecting the strategy.
fn committed_shield(
    strategy: &Strategy,
    pseudo: &PseudoGame,
    attacker_kind: PieceKind,
    attacker: Square,
    target: Square,
) -> Option<SlotId> {
    let ray = crate::oracle::transit_squares(attacker_kind, attacker, target);
    if ray.is_empty() {
        return None;
    }
    strategy
        .lives
        .iter()
        .find(|l| l.moves > 0 && !l.captured && ray.contains(&l.target))
        .and_then(|l| pseudo.last_slot(l.id))
}

/// When the occupancy window opened by `arrival` closes.
fn occupancy_end(
    strategy: &Strategy,
    pseudo: &PseudoGame,
    capture_slot: &[Option<SlotId>],
    arrival: SlotId,
) -> OccupancyEnd {
    if let Some(next) = pseudo.chain_next(arrival) {
        return OccupancyEnd::Departs(next);
    }
    let life = pseudo.slots[arrival].life;
    if strategy.life(life).captured {
        match capture_slot[life.index()] {
            Some(cap) => OccupancyEnd::Captured(cap),
            None => OccupancyEnd::Permanent,
        }
    } else {
        OccupancyEnd::Permanent
    }
}

/// Shared-square contention between resolved slots of any two men.
fn contention_edges(
    strategy: &Strategy,
    pseudo: &mut PseudoGame,
    capture_slot: &[Option<SlotId>],
) -> Result<(), RejectReason> {
    let n = pseudo.slots.len();
    for a in 0..n {
        for b in 0..n {
            if a == b || pseudo.slots[a].life == pseudo.slots[b].life {
                continue;
            }
            // Captures of one another are already hard-ordered.
            if pseudo.slots[a].victim == Some(pseudo.slots[b].life)
                || pseudo.slots[b].victim == Some(pseudo.slots[a].life)
            {
                continue;
            }
            let (a_from, a_to) = (pseudo.slots[a].from, pseudo.slots[a].to);
            let (b_from, b_to) = (pseudo.slots[b].from, pseudo.slots[b].to);

            // Arrival vs occupied-before-departure.
            if let (Some(at), Some(bf)) = (a_to, b_from) {
                if at == bf {
                    let hard = pseudo.slots[b].first
                        || occupancy_end(strategy, pseudo, capture_slot, a)
                            == OccupancyEnd::Permanent;
                    if hard {
                        pseudo.add_must(a, b);
                    } else {
                        pseudo.add_may(a, b);
                    }
                }
            }

            // Two arrivals on the same square.
            if let (Some(at), Some(bt)) = (a_to, b_to) {
                if at == bt {
                    let ea = occupancy_end(strategy, pseudo, capture_slot, a);
                    let eb = occupancy_end(strategy, pseudo, capture_slot, b);
                    match eb {
                        OccupancyEnd::Permanent => {
                            if ea == OccupancyEnd::Permanent {
                                if a < b {
                                    return Err(RejectReason::ContestedSquare { square: at });
                                }
                            }
                            // handled from the other side: b waits for a's end
                        }
                        OccupancyEnd::Departs(e) | OccupancyEnd::Captured(e) => {
                            if ea == OccupancyEnd::Permanent {
                                pseudo.add_must(a, e);
                            } else {
                                pseudo.add_may(a, e);
                            }
                        }
                    }
                }
            }

            // Two departures from the same square: the second man's arrival
            // must wait for the first man's departure.
            if let (Some(af), Some(bf)) = (a_from, b_from) {
                if af == bf {
                    if let Some(pb) = pseudo.chain_prev(b) {
                        if pseudo.slots[a].first {
                            pseudo.add_must(pb, a);
                        } else {
                            pseudo.add_may(pb, a);
                        }
                    }
                }
            }

            // Slider / double-step transit vs stationed men.
            for t in slot_transit(&pseudo.slots[a]) {
                if b_from == Some(t) {
                    if pseudo.slots[b].first {
                        pseudo.add_must(a, b);
                    } else {
                        pseudo.add_may(a, b);
                    }
                }
                if b_to == Some(t) {
                    match occupancy_end(strategy, pseudo, capture_slot, b) {
                        OccupancyEnd::Permanent => pseudo.add_must(b, a),
                        OccupancyEnd::Departs(e) | OccupancyEnd::Captured(e) => {
                            pseudo.add_may(a, e)
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Squares held from the game start by men with no chain of their own: men
/// captured at home, and the castling rook's corner (its departure is the
/// king's castling slot).
fn stationary_occupant_edges(
    strategy: &Strategy,
    pseudo: &mut PseudoGame,
    capture_slot: &[Option<SlotId>],
) -> Result<(), RejectReason> {
    let mut held: Vec<(Square, SlotId)> = Vec::new();

    for life in &strategy.lives {
        if life.moves == 0 && life.captured {
            if let Some(cap) = capture_slot[life.id.index()] {
                held.push((life.start, cap));
            }
        }
    }
    for color in [crate::core::square::Color::White, crate::core::square::Color::Black] {
        if let Some(side) = strategy.castling[color.index()] {
            if let Some(anchor) = pseudo.first_slot(strategy.king(color)) {
                let (_, _, r_from, _) = castle_squares(color, side);
                held.push((r_from, anchor));
            }
        }
    }

    for (sq, release) in held {
        for a in 0..pseudo.slots.len() {
            if a == release || pseudo.slots[a].life == pseudo.slots[release].life {
                continue;
            }
            let touches = pseudo.slots[a].to == Some(sq)
                || slot_transit(&pseudo.slots[a]).contains(&sq);
            if touches {
                pseudo.add_must(a, release);
            }
        }
    }
    Ok(())
}

/// Soft ordering for the skipped square of a still-unresolved pawn double
/// step: an enemy man stationed there forces the single-step reading unless
/// it clears out first.
fn pawn_corridor_edges(pseudo: &mut PseudoGame) {
    let n = pseudo.slots.len();
    for a in 0..n {
        let slot = &pseudo.slots[a];
        if slot.kind != PieceKind::Pawn || slot.to.is_some() || slot.switchback {
            continue;
        }
        let Some(from) = slot.from else { continue };
        let goal = slot.goal;
        if from.file() != goal.file() || (goal.rank() as i8 - from.rank() as i8).abs() != 2 {
            continue;
        }
        let Some(mid) = from.offset(0, (goal.rank() as i8 - from.rank() as i8) / 2) else {
            continue;
        };
        for b in 0..n {
            if pseudo.slots[b].life.color() == pseudo.slots[a].life.color() {
                continue;
            }
            if pseudo.slots[b].from == Some(mid) {
                pseudo.add_may(a, b);
            }
            if pseudo.slots[b].to == Some(mid) {
                pseudo.add_may(b, a);
            }
        }
    }
}

/// Keep, per predecessor life, only the chain-farthest hard predecessor (and
/// symmetrically the chain-nearest successor); earlier ones are implied by
/// the chain's own order. Soft lists drop entries a hard edge already covers.
fn deduplicate(pseudo: &mut PseudoGame) {
    let n = pseudo.slots.len();
    for id in 0..n {
        let mut keep: Vec<SlotId> = Vec::new();
        for &p in pseudo.slots[id].must_follow.clone().iter() {
            let p_life = pseudo.slots[p].life;
            let p_pos = pseudo.chain_index(p);
            match keep
                .iter()
                .position(|&q| pseudo.slots[q].life == p_life)
            {
                Some(i) => {
                    if pseudo.chain_index(keep[i]) < p_pos {
                        keep[i] = p;
                    }
                }
                None => keep.push(p),
            }
        }
        pseudo.slots[id].must_follow = keep;

        let must = pseudo.slots[id].must_follow.clone();
        pseudo.slots[id]
            .may_follow
            .retain(|p| !must.contains(p));
    }

    // Rebuild the mirror lists from the deduplicated forward lists.
    for id in 0..n {
        pseudo.slots[id].must_precede.clear();
        pseudo.slots[id].may_precede.clear();
    }
    for id in 0..n {
        for p in pseudo.slots[id].must_follow.clone() {
            if !pseudo.slots[p].must_precede.contains(&id) {
                pseudo.slots[p].must_precede.push(id);
            }
        }
        for p in pseudo.slots[id].may_follow.clone() {
            if !pseudo.slots[p].may_precede.contains(&id) {
                pseudo.slots[p].may_precede.push(id);
            }
        }
    }
}

/// Harden a soft edge whose order is already pinned by a hard edge to an
/// adjacent slot of the same chain: if `s` must follow the slot right before
/// `t` in `t`'s chain is not enough, but if `s` must follow a slot at or past
/// `t`, the soft edge is implied; if `s` must follow `t`'s immediate chain
/// predecessor, the soft predecessor is adjacent and the edge hardens.
fn tighten(pseudo: &mut PseudoGame) {
    let n = pseudo.slots.len();
    for id in 0..n {
        let soft = pseudo.slots[id].may_follow.clone();
        for t in soft {
            let t_life = pseudo.slots[t].life;
            let t_pos = pseudo.chain_index(t);
            let mut implied = false;
            let mut adjacent = false;
            for &u in &pseudo.slots[id].must_follow {
                if pseudo.slots[u].life != t_life {
                    continue;
                }
                let u_pos = pseudo.chain_index(u);
                if u_pos >= t_pos {
                    implied = true;
                } else if u_pos + 1 == t_pos {
                    adjacent = true;
                }
            }
            if implied || adjacent {
                pseudo.slots[id].may_follow.retain(|&x| x != t);
                pseudo.add_must(id, t);
            }
        }
    }
}

/// Deterministic edge order so identical rebuilds compare equal.
fn normalize(pseudo: &mut PseudoGame) {
    for slot in &mut pseudo.slots {
        slot.must_follow.sort_unstable();
        slot.must_precede.sort_unstable();
        slot.may_follow.sort_unstable();
        slot.may_precede.sort_unstable();
    }
}
