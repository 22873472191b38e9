//! Full-rules move generation: opening move count, en passant, castling.

mod common;

use proof_game::core::board::Board;
use proof_game::core::piece::{CastleSide, PieceKind};
use proof_game::core::square::Color;
use proof_game::rules::movegen::{apply_to_board, ep_after, legal_moves, rights_after, Move};

const ALL_RIGHTS: [[bool; 2]; 2] = [[true; 2]; 2];

fn play(board: &Board, side: Color, rights: &[[bool; 2]; 2], ep: Option<u8>, uci: (&str, &str)) -> (Board, [[bool; 2]; 2], Option<u8>) {
    let mut moves: Vec<Move> = Vec::new();
    legal_moves(board, side, rights, ep, &mut moves);
    let mv = *moves
        .iter()
        .find(|m| m.from == common::sq(uci.0) && m.to == common::sq(uci.1))
        .unwrap_or_else(|| panic!("{}-{} should be legal", uci.0, uci.1));
    (apply_to_board(board, &mv), rights_after(rights, side, &mv), ep_after(side, &mv))
}

#[test]
fn twenty_moves_from_the_start_position() {
    let mut moves = Vec::new();
    legal_moves(&Board::start_position(), Color::White, &ALL_RIGHTS, None, &mut moves);
    assert_eq!(moves.len(), 20);
}

#[test]
fn en_passant_appears_exactly_when_offered() {
    let board = Board::start_position();
    let (board, rights, ep) = play(&board, Color::White, &ALL_RIGHTS, None, ("e2", "e4"));
    let (board, rights, ep) = play(&board, Color::Black, &rights, ep, ("a7", "a6"));
    let (board, rights, ep) = play(&board, Color::White, &rights, ep, ("e4", "e5"));
    let (board, rights, ep) = play(&board, Color::Black, &rights, ep, ("d7", "d5"));
    assert_eq!(ep, Some(3));

    let mut moves = Vec::new();
    legal_moves(&board, Color::White, &rights, ep, &mut moves);
    let capture = moves
        .iter()
        .find(|m| m.en_passant)
        .expect("en passant capture available");
    assert_eq!(capture.from, common::sq("e5"));
    assert_eq!(capture.to, common::sq("d6"));
    assert_eq!(capture.capture_square, Some(common::sq("d5")));

    // The right lapses after any other reply.
    let (board, rights, ep) = play(&board, Color::White, &rights, ep, ("b1", "c3"));
    let (board, rights, ep) = play(&board, Color::Black, &rights, ep, ("a6", "a5"));
    legal_moves(&board, Color::White, &rights, ep, &mut moves);
    assert!(moves.iter().all(|m| !m.en_passant));
}

#[test]
fn kingside_castling_requires_rights_and_empty_squares() {
    let mut board = Board::start_position();
    board.set(common::sq("f1"), None);
    board.set(common::sq("g1"), None);

    let mut moves = Vec::new();
    legal_moves(&board, Color::White, &ALL_RIGHTS, None, &mut moves);
    let castle = moves
        .iter()
        .find(|m| m.castle == Some(CastleSide::Kingside))
        .expect("castling available");
    assert_eq!(castle.to, common::sq("g1"));

    let after = apply_to_board(&board, castle);
    assert_eq!(after.get(common::sq("g1")).map(|o| o.kind), Some(PieceKind::King));
    assert_eq!(after.get(common::sq("f1")).map(|o| o.kind), Some(PieceKind::Rook));
    assert!(after.get(common::sq("e1")).is_none());
    assert!(after.get(common::sq("h1")).is_none());

    // Without the right the same position offers no castling move.
    let mut rights = ALL_RIGHTS;
    rights[Color::White.index()][CastleSide::Kingside.index()] = false;
    legal_moves(&board, Color::White, &rights, None, &mut moves);
    assert!(moves.iter().all(|m| m.castle.is_none()));
}
