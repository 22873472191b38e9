//! The move-scheduling pipeline: from a committed [`Strategy`] to a fully
//! scheduled [`PseudoGame`] the search can execute against.
//!
//! Stages run in order and each may reject the strategy:
//! chain expansion → penalty propagation → precedence derivation → cycle
//! detection → ply scheduling → switchback resolution.
//!
//! Slots live in a single arena (`Vec<MoveSlot>`); every cross-reference is a
//! [`SlotId`] index, never a pointer.
//!
//! [`Strategy`]: crate::strategy::Strategy

pub mod chain;
pub mod cycle;
pub mod penalty;
pub mod precedence;
pub mod schedule;
pub mod switchback;

use std::fmt;

use crate::core::board::{LifeId, LIFE_COUNT};
use crate::core::piece::{CastleSide, PieceKind};
use crate::core::square::{Color, Square};

pub type SlotId = usize;

/// Why a candidate strategy was found unschedulable.
///
/// A rejection is not an error: control returns to the strategy generator,
/// which proposes the next candidate. The same strategy is never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A committed leg has no route at all under current blocking.
    NoRoute {
        life: LifeId,
        from: Square,
        to: Square,
    },
    /// A pawn capture step found no matching committed victim.
    VictimMismatch { life: LifeId, square: Square },
    /// A forced detour cost exceeds the color's free-move budget.
    BudgetExhausted { color: Color, needed: u32 },
    /// Two men are committed to the same square at incompatible times.
    ContestedSquare { square: Square },
    /// A king transit is attacked by a man that can never get out of the way.
    PermanentCheck { king_square: Square },
    /// The hard-edge precedence graph contains a directed cycle.
    CyclicPrecedence { slot: SlotId },
    /// A slot's feasible ply window is empty or exceeds the move count.
    UnschedulableSlot { slot: SlotId },
    /// A forced round trip has no reachable detour square.
    SwitchbackBlocked { life: LifeId },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoRoute { life, from, to } => {
                write!(f, "life {} has no route {from} -> {to}", life.index())
            }
            RejectReason::VictimMismatch { life, square } => write!(
                f,
                "life {} captures on {square} but no committed victim dies there",
                life.index()
            ),
            RejectReason::BudgetExhausted { color, needed } => {
                write!(f, "{color:?} needs {needed} more free moves than budgeted")
            }
            RejectReason::ContestedSquare { square } => {
                write!(f, "square {square} is contested at incompatible times")
            }
            RejectReason::PermanentCheck { king_square } => {
                write!(f, "king transit over {king_square} is permanently attacked")
            }
            RejectReason::CyclicPrecedence { slot } => {
                write!(f, "slot {slot} participates in a precedence cycle")
            }
            RejectReason::UnschedulableSlot { slot } => {
                write!(f, "slot {slot} has an empty feasible ply window")
            }
            RejectReason::SwitchbackBlocked { life } => {
                write!(f, "life {} has no reachable switchback detour", life.index())
            }
        }
    }
}

/// One atomic candidate move of one man.
///
/// A slot with `to == None` is the departing half of an unresolved two-slot
/// leg: the piece leaves `from` towards `goal`, but the intermediate squares
/// (and possibly the number of moves) are decided during search. Its partner
/// is the next slot of the same chain, with `from == None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSlot {
    pub life: LifeId,
    /// Kind while making this move (post-promotion slots carry the new kind).
    pub kind: PieceKind,
    pub from: Option<Square>,
    pub to: Option<Square>,
    /// Final square of the leg this slot belongs to; equals `to` when resolved.
    pub goal: Square,
    /// Man captured by this move.
    pub victim: Option<LifeId>,
    /// First move of this man's chain (suppressed on a rook subsumed by its
    /// king's castling slot).
    pub first: bool,
    /// Last move of this man's chain.
    pub last: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub switchback: bool,
    /// Arriving half of a two-slot leg; its moves are counted by the head.
    pub pair_arrive: bool,
    /// Minimum moves the leg headed by this slot requires. 1 for resolved
    /// slots; the full leg minimum on an unresolved departing slot.
    pub leg_moves: u32,
    /// Moves this slot's leg would require if the indexed square were blocked
    /// as both origin and destination. `None` means no route at all.
    pub cost_if_blocked: Vec<Option<u32>>,
    /// Earliest feasible 1-based ply, after scheduling.
    pub earliest: u32,
    /// Latest feasible 1-based ply, after scheduling.
    pub latest: u32,
    pub must_follow: Vec<SlotId>,
    pub must_precede: Vec<SlotId>,
    pub may_follow: Vec<SlotId>,
    pub may_precede: Vec<SlotId>,
}

impl MoveSlot {
    pub fn new(life: LifeId, kind: PieceKind, from: Square, to: Square) -> MoveSlot {
        MoveSlot {
            life,
            kind,
            from: Some(from),
            to: Some(to),
            goal: to,
            victim: None,
            first: false,
            last: false,
            castle: None,
            promotion: None,
            switchback: false,
            pair_arrive: false,
            leg_moves: 1,
            cost_if_blocked: Vec::new(),
            earliest: 0,
            latest: 0,
            must_follow: Vec::new(),
            must_precede: Vec::new(),
            may_follow: Vec::new(),
            may_precede: Vec::new(),
        }
    }

    /// Departing half of an unresolved leg towards `goal`.
    pub fn unresolved_depart(
        life: LifeId,
        kind: PieceKind,
        from: Square,
        goal: Square,
        leg_moves: u32,
    ) -> MoveSlot {
        MoveSlot {
            from: Some(from),
            to: None,
            goal,
            leg_moves,
            ..MoveSlot::new(life, kind, from, goal)
        }
    }

    /// Arriving half of an unresolved leg.
    pub fn unresolved_arrive(life: LifeId, kind: PieceKind, goal: Square) -> MoveSlot {
        MoveSlot {
            from: None,
            to: Some(goal),
            goal,
            pair_arrive: true,
            ..MoveSlot::new(life, kind, goal, goal)
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Squares a resolved slot passes over without stopping.
///
/// For a castling slot these are the squares that must be vacant for the
/// maneuver (including b1/b8 on the queenside, which the king never touches).
pub fn slot_transit(slot: &MoveSlot) -> Vec<Square> {
    let (Some(from), Some(to)) = (slot.from, slot.to) else {
        return Vec::new();
    };
    if let Some(side) = slot.castle {
        let rank = slot.life.color().home_rank();
        return match side {
            CastleSide::Kingside => vec![Square::new(5, rank)],
            CastleSide::Queenside => vec![Square::new(3, rank), Square::new(1, rank)],
        };
    }
    crate::oracle::transit_squares(slot.kind, from, to)
}

/// The full slot arena for one strategy attempt: both colors' chains plus the
/// precedence graph and scheduling bounds attached to each slot.
///
/// One `PseudoGame` is reused across strategy attempts; [`PseudoGame::clear`]
/// must run before every rebuild so no stale state survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoGame {
    pub slots: Vec<MoveSlot>,
    /// Slot ids per life, in chain order. Indexed by [`LifeId::index`].
    pub chains: Vec<Vec<SlotId>>,
}

impl PseudoGame {
    pub fn new() -> PseudoGame {
        PseudoGame {
            slots: Vec::new(),
            chains: vec![Vec::new(); LIFE_COUNT],
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        for c in &mut self.chains {
            c.clear();
        }
    }

    pub fn push_slot(&mut self, slot: MoveSlot) -> SlotId {
        let id = self.slots.len();
        self.chains[slot.life.index()].push(id);
        self.slots.push(slot);
        id
    }

    #[inline]
    pub fn chain(&self, life: LifeId) -> &[SlotId] {
        &self.chains[life.index()]
    }

    /// Position of a slot within its own chain.
    pub fn chain_index(&self, id: SlotId) -> usize {
        let life = self.slots[id].life;
        self.chain(life)
            .iter()
            .position(|&s| s == id)
            .expect("slot not in its own chain")
    }

    /// The slot after `id` in its chain.
    pub fn chain_next(&self, id: SlotId) -> Option<SlotId> {
        let life = self.slots[id].life;
        let chain = self.chain(life);
        let i = self.chain_index(id);
        chain.get(i + 1).copied()
    }

    /// The slot before `id` in its chain.
    pub fn chain_prev(&self, id: SlotId) -> Option<SlotId> {
        let i = self.chain_index(id);
        if i == 0 {
            None
        } else {
            Some(self.chain(self.slots[id].life)[i - 1])
        }
    }

    /// Last slot of a life's chain.
    pub fn last_slot(&self, life: LifeId) -> Option<SlotId> {
        self.chain(life).last().copied()
    }

    /// First slot of a life's chain.
    pub fn first_slot(&self, life: LifeId) -> Option<SlotId> {
        self.chain(life).first().copied()
    }

    /// Record a hard edge: `after` must be played strictly after `before`.
    pub fn add_must(&mut self, after: SlotId, before: SlotId) {
        if after == before {
            return;
        }
        if !self.slots[after].must_follow.contains(&before) {
            self.slots[after].must_follow.push(before);
        }
        if !self.slots[before].must_precede.contains(&after) {
            self.slots[before].must_precede.push(after);
        }
    }

    /// Record a soft edge: playing `after` before `before` requires a detour.
    pub fn add_may(&mut self, after: SlotId, before: SlotId) {
        if after == before {
            return;
        }
        if !self.slots[after].may_follow.contains(&before) {
            self.slots[after].may_follow.push(before);
        }
        if !self.slots[before].may_precede.contains(&after) {
            self.slots[before].may_precede.push(after);
        }
    }

    /// Sum of minimum move counts over a life's chain.
    pub fn chain_min_moves(&self, life: LifeId) -> u32 {
        self.chain(life)
            .iter()
            .map(|&s| {
                let slot = &self.slots[s];
                if slot.pair_arrive {
                    0
                } else {
                    slot.leg_moves
                }
            })
            .sum()
    }
}
