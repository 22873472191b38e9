//! Board-level vocabulary shared by every stage: squares, colors, piece kinds,
//! and the 64-cell board.

pub mod board;
pub mod piece;
pub mod square;
