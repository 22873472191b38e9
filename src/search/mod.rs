//! The constrained game tree search.
//!
//! A depth-first walk over legal moves, with an admission filter in front:
//! a move is searched only when it advances its man's slot chain within the
//! scheduled ply windows and precedence constraints, or when it is a free
//! excursion the live budget can still pay for. State changes go through the
//! undo log; refuted positions are memoized.

pub mod state;
pub mod transposition;
pub mod undo;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::board::LifeId;
use crate::core::square::Color;
use crate::oracle::MovementOracle;
use crate::plan::{MoveSlot, PseudoGame, SlotId};
use crate::rules::movegen::{castle_squares, ep_after, legal_moves, rights_after, Move};
use crate::search::state::GameState;
use crate::search::transposition::{TranspositionTable, MAX_KEYED_SLOTS};
use crate::search::undo::UndoLog;
use crate::solution::{MoveRecord, Solution};
use crate::strategy::Strategy;

/// Sentinel for "this branch can never finish"; large but safe to add to.
const UNREACHABLE_MOVES: u32 = u32::MAX / 4;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Stop after this many solutions.
    pub max_solutions: usize,
    pub use_transposition: bool,
    /// Checked at every node; setting it stops the search promptly.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for SearchOptions {
    fn default() -> SearchOptions {
        SearchOptions {
            max_solutions: 1,
            use_transposition: true,
            abort: None,
        }
    }
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every admissible line was examined.
    Exhausted,
    /// The solution cap was reached; more lines may exist.
    CapReached,
    /// The abort flag was raised.
    Aborted,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub solutions: Vec<Solution>,
    pub status: SearchStatus,
    /// Nodes visited, including pruned ones.
    pub nodes: u64,
}

enum Interrupt {
    CapReached,
    Aborted,
}

/// What playing an admitted move does to the slot bookkeeping.
struct AdmitPlan {
    play_head: Option<SlotId>,
    play_arrive: Option<SlotId>,
    cursor_advance: u8,
    charge_free: u32,
}

/// Search the full tree of admissible lines for one scheduled strategy.
pub fn run<O: MovementOracle>(
    oracle: &O,
    strategy: &Strategy,
    pseudo: &PseudoGame,
    n: u32,
    options: &SearchOptions,
) -> SearchOutcome {
    let mut deadline_order: Vec<SlotId> = (0..pseudo.slots.len()).collect();
    deadline_order.sort_by_key(|&id| pseudo.slots[id].latest);

    let mut search = GameTreeSearch {
        oracle,
        strategy,
        pseudo,
        n,
        deadline_order,
        use_tt: options.use_transposition && pseudo.slots.len() <= MAX_KEYED_SLOTS,
        max_solutions: options.max_solutions.max(1),
        abort: options.abort.clone(),
        state: GameState::initial(strategy, pseudo),
        undo: UndoLog::new(),
        table: TranspositionTable::new(),
        line: Vec::with_capacity(n as usize),
        solutions: Vec::new(),
        nodes: 0,
    };
    let status = match search.dfs() {
        Ok(()) => SearchStatus::Exhausted,
        Err(Interrupt::CapReached) => SearchStatus::CapReached,
        Err(Interrupt::Aborted) => SearchStatus::Aborted,
    };
    SearchOutcome {
        solutions: search.solutions,
        status,
        nodes: search.nodes,
    }
}

struct GameTreeSearch<'a, O: MovementOracle> {
    oracle: &'a O,
    strategy: &'a Strategy,
    pseudo: &'a PseudoGame,
    n: u32,
    /// Slot ids sorted by ascending latest ply.
    deadline_order: Vec<SlotId>,
    use_tt: bool,
    max_solutions: usize,
    abort: Option<Arc<AtomicBool>>,
    state: GameState,
    undo: UndoLog,
    table: TranspositionTable,
    line: Vec<MoveRecord>,
    solutions: Vec<Solution>,
    nodes: u64,
}

impl<O: MovementOracle> GameTreeSearch<'_, O> {
    fn dfs(&mut self) -> Result<(), Interrupt> {
        self.nodes += 1;
        if let Some(flag) = &self.abort {
            if flag.load(Ordering::Relaxed) {
                return Err(Interrupt::Aborted);
            }
        }
        if self.state.ply == self.n {
            if self.final_position_reached() {
                self.solutions.push(Solution {
                    moves: self.line.clone(),
                });
                if self.solutions.len() >= self.max_solutions {
                    return Err(Interrupt::CapReached);
                }
            }
            return Ok(());
        }

        let ply = self.state.ply + 1;
        if self.deadline_missed(ply) || self.progress_infeasible(ply) {
            return Ok(());
        }
        let key = if self.use_tt {
            TranspositionTable::key_of(&self.state)
        } else {
            None
        };
        if let Some(k) = &key {
            if self.table.is_dead(k) {
                return Ok(());
            }
        }
        let found_before = self.solutions.len();

        let side = self.state.side_to_move();
        let mut moves = Vec::new();
        legal_moves(
            &self.state.board,
            side,
            &self.state.castle_rights,
            self.state.ep_file,
            &mut moves,
        );
        for mv in moves {
            let Some(plan) = self.admit(&mv, ply) else {
                continue;
            };
            let mark = self.undo.mark();
            self.apply(&mv, &plan);
            self.line.push(MoveRecord::of(&mv));
            let result = self.dfs();
            self.line.pop();
            self.undo.rewind(&mut self.state, mark);
            result?;
        }

        // Only a fully examined, solution-free subtree is memoized.
        if let Some(k) = key {
            if self.solutions.len() == found_before {
                self.table.insert_dead(k);
            }
        }
        Ok(())
    }

    /// Does the position after the last ply match every commitment?
    fn final_position_reached(&self) -> bool {
        for life in LifeId::all() {
            let committed = self.strategy.life(life);
            if (self.state.cursor[life.index()] as usize) != self.pseudo.chain(life).len() {
                return false;
            }
            if committed.captured {
                if self.state.loc[life.index()].is_some() {
                    return false;
                }
            } else {
                if !self.state.reached_final[life.index()] {
                    return false;
                }
                match self.state.board.get(committed.target) {
                    Some(occ) if occ.life == life && occ.kind == committed.final_kind => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// True when some slot's latest ply has already passed unplayed.
    fn deadline_missed(&self, ply: u32) -> bool {
        for &id in &self.deadline_order {
            if self.pseudo.slots[id].latest >= ply {
                break;
            }
            if !self.state.played[id] {
                return true;
            }
        }
        false
    }

    /// True when either color's remaining minimum move count no longer fits
    /// into its remaining plies.
    fn progress_infeasible(&self, ply: u32) -> bool {
        let mut needed = [0u32; 2];
        for life in LifeId::all() {
            needed[life.color().index()] =
                needed[life.color().index()].saturating_add(self.remaining_min(life));
        }
        for color in [Color::White, Color::Black] {
            if needed[color.index()] > color.plies_in(ply, self.n) {
                return true;
            }
        }
        false
    }

    /// Lower bound on the moves this life still has to make.
    fn remaining_min(&self, life: LifeId) -> u32 {
        let chain = self.pseudo.chain(life);
        let cursor = self.state.cursor[life.index()] as usize;
        let mut rem = 0u32;
        let mut i = cursor;
        if i < chain.len() && self.state.played[chain[i]] {
            // Mid-leg: distance from the current square to the leg goal.
            let head = &self.pseudo.slots[chain[i]];
            if let Some(sq) = self.state.loc[life.index()] {
                match self
                    .oracle
                    .shortest_distance(head.kind, life.color(), sq, head.goal)
                {
                    Some(d) => rem += d,
                    None => return UNREACHABLE_MOVES,
                }
            }
            i += 2;
        }
        while i < chain.len() {
            let slot = &self.pseudo.slots[chain[i]];
            if !slot.pair_arrive {
                rem += slot.leg_moves;
            }
            i += 1;
        }
        if cursor == chain.len() {
            // Chain done but out on an excursion: it still has to come home.
            if let Some(sq) = self.state.loc[life.index()] {
                let target = self.strategy.life(life).target;
                if sq != target {
                    let kind = match self.state.board.get(sq) {
                        Some(occ) => occ.kind,
                        None => return UNREACHABLE_MOVES,
                    };
                    match self.oracle.shortest_distance(kind, life.color(), sq, target) {
                        Some(d) => rem += d,
                        None => return UNREACHABLE_MOVES,
                    }
                }
            }
        }
        rem
    }

    fn preds_played(&self, id: SlotId) -> bool {
        self.pseudo.slots[id]
            .must_follow
            .iter()
            .all(|&p| self.state.played[p])
    }

    fn admit(&self, mv: &Move, ply: u32) -> Option<AdmitPlan> {
        let chain = self.pseudo.chain(mv.life);
        let cursor = self.state.cursor[mv.life.index()] as usize;
        if cursor >= chain.len() {
            return self.admit_excursion(mv, ply);
        }
        let head_id = chain[cursor];
        let head = &self.pseudo.slots[head_id];
        if head.is_resolved() {
            self.admit_resolved(mv, ply, head_id, head)
        } else {
            // A departing head always has its arriving partner right behind it.
            self.admit_leg(mv, ply, head_id, chain[cursor + 1])
        }
    }

    fn admit_resolved(
        &self,
        mv: &Move,
        ply: u32,
        head_id: SlotId,
        head: &MoveSlot,
    ) -> Option<AdmitPlan> {
        if head.from != Some(mv.from)
            || head.to != Some(mv.to)
            || head.castle != mv.castle
            || head.promotion != mv.promotion
            || head.victim != mv.capture
        {
            return None;
        }
        if ply < head.earliest || ply > head.latest {
            return None;
        }
        if !self.preds_played(head_id) {
            return None;
        }
        Some(AdmitPlan {
            play_head: Some(head_id),
            play_arrive: None,
            cursor_advance: 1,
            charge_free: 0,
        })
    }

    fn admit_leg(
        &self,
        mv: &Move,
        ply: u32,
        head_id: SlotId,
        arrive_id: SlotId,
    ) -> Option<AdmitPlan> {
        if mv.castle.is_some() {
            return None;
        }
        let head = &self.pseudo.slots[head_id];
        let arrive = &self.pseudo.slots[arrive_id];
        let goal = head.goal;
        let color = mv.life.color();
        let head_played = self.state.played[head_id];
        if !head_played {
            if head.from != Some(mv.from) || !self.preds_played(head_id) || ply < head.earliest {
                return None;
            }
        }

        let d_before = self
            .oracle
            .shortest_distance(head.kind, color, mv.from, goal);
        if mv.to == goal {
            if mv.promotion != arrive.promotion || mv.capture != arrive.victim {
                return None;
            }
            if ply < arrive.earliest || ply > arrive.latest || !self.preds_played(arrive_id) {
                return None;
            }
            let charge = if d_before.is_some_and(|d| d > 0) { 0 } else { 1 };
            if charge > self.state.free_moves[color.index()] {
                return None;
            }
            Some(AdmitPlan {
                play_head: (!head_played).then_some(head_id),
                play_arrive: Some(arrive_id),
                cursor_advance: 2,
                charge_free: charge,
            })
        } else {
            // Intermediate leg move; unplanned captures and promotions are
            // never admitted.
            if mv.capture.is_some() || mv.promotion.is_some() {
                return None;
            }
            let d_after = self
                .oracle
                .shortest_distance(head.kind, color, mv.to, goal)?;
            // The piece still needs d_after own moves, two plies apart.
            if ply + 2 * d_after > arrive.latest {
                return None;
            }
            let productive = match d_before {
                Some(d) => d_after < d,
                None => false,
            };
            let charge = if productive { 0 } else { 1 };
            if charge > self.state.free_moves[color.index()] {
                return None;
            }
            Some(AdmitPlan {
                play_head: (!head_played).then_some(head_id),
                play_arrive: None,
                cursor_advance: 0,
                charge_free: charge,
            })
        }
    }

    /// A move past the end of the chain: pure tempo, paid from the free-move
    /// budget, and only if the man can still be home by the end.
    fn admit_excursion(&self, mv: &Move, ply: u32) -> Option<AdmitPlan> {
        if mv.capture.is_some() || mv.castle.is_some() || mv.promotion.is_some() {
            return None;
        }
        let color = mv.life.color();
        let free = self.state.free_moves[color.index()];
        if free == 0 {
            return None;
        }
        let target = self.strategy.life(mv.life).target;
        let d_back = self
            .oracle
            .shortest_distance(mv.kind, color, mv.to, target)?;
        if d_back > color.plies_in(ply + 1, self.n) {
            return None;
        }
        // This move plus the whole way home all come out of the budget.
        if d_back + 1 > free {
            return None;
        }
        Some(AdmitPlan {
            play_head: None,
            play_arrive: None,
            cursor_advance: 0,
            charge_free: 1,
        })
    }

    fn apply(&mut self, mv: &Move, plan: &AdmitPlan) {
        let st = &mut self.state;
        let undo = &mut self.undo;
        let color = st.side_to_move();

        if let (Some(victim), Some(cap_sq)) = (mv.capture, mv.capture_square) {
            undo.set_cell(st, cap_sq, None);
            undo.set_loc(st, victim, None);
        }

        if let Some(mut moved) = st.board.get(mv.from) {
            debug_assert_eq!(moved.life, mv.life);
            if let Some(kind) = mv.promotion {
                moved.kind = kind;
            }
            undo.set_cell(st, mv.from, None);
            undo.set_cell(st, mv.to, Some(moved));
            undo.set_loc(st, mv.life, Some(mv.to));
        }

        if let Some(cs) = mv.castle {
            let (_, _, r_from, r_to) = castle_squares(color, cs);
            if let Some(rook) = st.board.get(r_from) {
                undo.set_cell(st, r_from, None);
                undo.set_cell(st, r_to, Some(rook));
                undo.set_loc(st, rook.life, Some(r_to));
                if self.pseudo.chain(rook.life).is_empty()
                    && self.strategy.life(rook.life).target == r_to
                {
                    undo.set_reached(st, rook.life, true);
                }
            }
        }

        let new_rights = rights_after(&st.castle_rights, color, mv);
        for c in [Color::White, Color::Black] {
            for side in 0..2 {
                if !new_rights[c.index()][side] {
                    undo.clear_castle_right(st, c, side);
                }
            }
        }
        undo.set_ep_file(st, ep_after(color, mv));

        if let Some(id) = plan.play_head {
            undo.set_played(st, id);
        }
        if let Some(id) = plan.play_arrive {
            undo.set_played(st, id);
        }
        if plan.cursor_advance > 0 {
            let cur = st.cursor[mv.life.index()];
            undo.set_cursor(st, mv.life, cur + plan.cursor_advance);
        }
        if plan.charge_free > 0 {
            let free = st.free_moves[color.index()];
            undo.set_free_moves(st, color, free - plan.charge_free);
        }

        let chain_done =
            (st.cursor[mv.life.index()] as usize) == self.pseudo.chain(mv.life).len();
        undo.set_reached(
            st,
            mv.life,
            chain_done && mv.to == self.strategy.life(mv.life).target,
        );

        undo.bump_ply(st);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::tables::BoardTables;
    use crate::plan::PseudoGame;
    use crate::strategy::Strategy;

    #[test]
    fn zero_ply_game_with_no_commitments_is_its_own_solution() {
        let oracle = BoardTables::new();
        let strategy = Strategy::initial();
        let pseudo = PseudoGame::new();
        let outcome = run(&oracle, &strategy, &pseudo, 0, &SearchOptions::default());
        assert_eq!(outcome.solutions.len(), 1);
        assert!(outcome.solutions[0].moves.is_empty());
        assert_eq!(outcome.status, SearchStatus::CapReached);
    }

    #[test]
    fn abort_flag_stops_the_search() {
        let oracle = BoardTables::new();
        let strategy = Strategy::initial();
        let pseudo = PseudoGame::new();
        let flag = Arc::new(AtomicBool::new(true));
        let options = SearchOptions {
            abort: Some(Arc::clone(&flag)),
            ..SearchOptions::default()
        };
        let outcome = run(&oracle, &strategy, &pseudo, 4, &options);
        assert_eq!(outcome.status, SearchStatus::Aborted);
        assert!(outcome.solutions.is_empty());
    }
}
