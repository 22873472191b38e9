//! Pure chess rules over the live board: attack detection and full legal
//! move generation (check, castling, en passant, promotion).
//!
//! Nothing in here knows about strategies or schedules; the search layers
//! slot admission on top of the raw legal move list.

pub mod attacks;
pub mod movegen;
