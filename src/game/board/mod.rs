// src/game/board/mod.rs

pub mod attacks;
pub mod bitboard;
pub mod position;
pub mod zobrist;

// Re-exports to keep the public API flat.
pub use attacks::{pawn_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
pub use bitboard::{BitBoard, SquareIter, BOARD_MASK};
pub use position::{MoveFilter, Position};
pub use zobrist::{zobrist, ZobristKeys};
