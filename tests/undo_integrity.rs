//! The undo log must restore the search state bit for bit, including across
//! nested marks, and must push nothing for mutations that change nothing.

mod common;

use proof_game::core::board::LifeId;
use proof_game::core::piece::PieceKind;
use proof_game::core::square::Color;
use proof_game::plan::{MoveSlot, PseudoGame};
use proof_game::search::state::GameState;
use proof_game::search::undo::UndoLog;
use proof_game::strategy::Strategy;

fn fixture() -> (GameState, PseudoGame) {
    let strategy = Strategy::initial();
    let mut pseudo = PseudoGame::new();
    pseudo.push_slot(MoveSlot::new(
        LifeId::new(1),
        PieceKind::Knight,
        common::sq("b1"),
        common::sq("c3"),
    ));
    let state = GameState::initial(&strategy, &pseudo);
    (state, pseudo)
}

#[test]
fn rewind_restores_the_exact_state() {
    let (mut state, _pseudo) = fixture();
    let pristine = state.clone();
    let mut undo = UndoLog::new();

    let outer = undo.mark();
    let knight = state.board.get(common::sq("b1"));
    undo.set_cell(&mut state, common::sq("b1"), None);
    undo.set_cell(&mut state, common::sq("c3"), knight);
    undo.set_loc(&mut state, LifeId::new(1), Some(common::sq("c3")));
    undo.set_cursor(&mut state, LifeId::new(1), 1);
    undo.set_played(&mut state, 0);
    undo.set_reached(&mut state, LifeId::new(1), false);
    undo.clear_castle_right(&mut state, Color::White, 0);
    undo.set_ep_file(&mut state, Some(4));
    undo.set_free_moves(&mut state, Color::White, 7);
    undo.bump_ply(&mut state);

    let inner = undo.mark();
    undo.set_cell(&mut state, common::sq("c3"), None);
    undo.set_loc(&mut state, LifeId::new(1), None);
    undo.bump_ply(&mut state);
    undo.rewind(&mut state, inner);
    assert_eq!(state.loc[1], Some(common::sq("c3")));
    assert_eq!(state.ply, 1);

    undo.rewind(&mut state, outer);
    assert_eq!(state, pristine);
}

#[test]
fn no_op_mutations_push_no_records() {
    let (mut state, _pseudo) = fixture();
    let mut undo = UndoLog::new();
    let mark = undo.mark();

    let b1 = state.board.get(common::sq("b1"));
    undo.set_cell(&mut state, common::sq("b1"), b1);
    undo.set_loc(&mut state, LifeId::new(1), Some(common::sq("b1")));
    undo.set_cursor(&mut state, LifeId::new(1), 0);
    undo.set_ep_file(&mut state, None);
    let free = state.free_moves[0];
    undo.set_free_moves(&mut state, Color::White, free);

    assert_eq!(undo.mark(), mark);
}
