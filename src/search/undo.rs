//! Tagged undo records for the tree search.
//!
//! Every mutation of [`GameState`] goes through a helper here that records the
//! overwritten value first; [`UndoLog::rewind`] pops back to a mark and
//! restores in exact reverse order. Mutations that would not change the state
//! push nothing.

use crate::core::board::{LifeId, Occupant};
use crate::core::square::{Color, Square};
use crate::plan::SlotId;
use crate::search::state::GameState;

#[derive(Debug, Clone, Copy)]
enum UndoRecord {
    Cell { square: Square, old: Option<Occupant> },
    Loc { life: LifeId, old: Option<Square> },
    Cursor { life: LifeId, old: u8 },
    Reached { life: LifeId, old: bool },
    Castle { color: Color, side: usize, old: bool },
    EpFile { old: Option<u8> },
    Played { slot: SlotId },
    FreeMoves { color: Color, old: u32 },
    Ply { old: u32 },
}

/// Position of a mark in the log; everything pushed after it belongs to one
/// searched move.
pub type UndoMark = usize;

#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> UndoLog {
        UndoLog::default()
    }

    #[inline]
    pub fn mark(&self) -> UndoMark {
        self.records.len()
    }

    /// Pop every record above `mark`, restoring the state in reverse.
    pub fn rewind(&mut self, state: &mut GameState, mark: UndoMark) {
        while self.records.len() > mark {
            let Some(record) = self.records.pop() else {
                break;
            };
            match record {
                UndoRecord::Cell { square, old } => state.board.set(square, old),
                UndoRecord::Loc { life, old } => state.loc[life.index()] = old,
                UndoRecord::Cursor { life, old } => state.cursor[life.index()] = old,
                UndoRecord::Reached { life, old } => state.reached_final[life.index()] = old,
                UndoRecord::Castle { color, side, old } => {
                    state.castle_rights[color.index()][side] = old
                }
                UndoRecord::EpFile { old } => state.ep_file = old,
                UndoRecord::Played { slot } => state.played[slot] = false,
                UndoRecord::FreeMoves { color, old } => state.free_moves[color.index()] = old,
                UndoRecord::Ply { old } => state.ply = old,
            }
        }
    }

    pub fn set_cell(&mut self, state: &mut GameState, square: Square, value: Option<Occupant>) {
        let old = state.board.get(square);
        if old != value {
            self.records.push(UndoRecord::Cell { square, old });
            state.board.set(square, value);
        }
    }

    pub fn set_loc(&mut self, state: &mut GameState, life: LifeId, value: Option<Square>) {
        let old = state.loc[life.index()];
        if old != value {
            self.records.push(UndoRecord::Loc { life, old });
            state.loc[life.index()] = value;
        }
    }

    pub fn set_cursor(&mut self, state: &mut GameState, life: LifeId, value: u8) {
        let old = state.cursor[life.index()];
        if old != value {
            self.records.push(UndoRecord::Cursor { life, old });
            state.cursor[life.index()] = value;
        }
    }

    pub fn set_reached(&mut self, state: &mut GameState, life: LifeId, value: bool) {
        let old = state.reached_final[life.index()];
        if old != value {
            self.records.push(UndoRecord::Reached { life, old });
            state.reached_final[life.index()] = value;
        }
    }

    pub fn clear_castle_right(&mut self, state: &mut GameState, color: Color, side: usize) {
        let old = state.castle_rights[color.index()][side];
        if old {
            self.records.push(UndoRecord::Castle { color, side, old });
            state.castle_rights[color.index()][side] = false;
        }
    }

    pub fn set_ep_file(&mut self, state: &mut GameState, value: Option<u8>) {
        let old = state.ep_file;
        if old != value {
            self.records.push(UndoRecord::EpFile { old });
            state.ep_file = value;
        }
    }

    pub fn set_played(&mut self, state: &mut GameState, slot: SlotId) {
        if !state.played[slot] {
            self.records.push(UndoRecord::Played { slot });
            state.played[slot] = true;
        }
    }

    pub fn set_free_moves(&mut self, state: &mut GameState, color: Color, value: u32) {
        let old = state.free_moves[color.index()];
        if old != value {
            self.records.push(UndoRecord::FreeMoves { color, old });
            state.free_moves[color.index()] = value;
        }
    }

    pub fn bump_ply(&mut self, state: &mut GameState) {
        self.records.push(UndoRecord::Ply { old: state.ply });
        state.ply += 1;
    }
}
