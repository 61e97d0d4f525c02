// src/game/board/zobrist.rs

use std::sync::OnceLock;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::game::defs::{Piece, Square};

/// Keys are drawn once from a fixed seed so that two runs of the engine
/// hash identical positions identically.
const ZOBRIST_SEED: u64 = 1_804_289_383;

pub struct ZobristKeys {
    piece: [[u64; 40]; 6],
    en_passant: [u64; 40],
    side: u64,
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

#[inline]
pub fn zobrist() -> &'static ZobristKeys {
    KEYS.get_or_init(|| ZobristKeys::new_with_seed(ZOBRIST_SEED))
}

impl ZobristKeys {
    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut piece = [[0u64; 40]; 6];
        for keys in piece.iter_mut() {
            for key in keys.iter_mut() {
                *key = rng.next_u64();
            }
        }

        let mut en_passant = [0u64; 40];
        for key in en_passant.iter_mut() {
            *key = rng.next_u64();
        }

        let side = rng.next_u64();

        Self { piece, en_passant, side }
    }

    #[inline]
    pub fn piece(&self, p: Piece, sq: Square) -> u64 {
        self.piece[p as usize][sq.0 as usize]
    }

    #[inline]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[sq.0 as usize]
    }

    #[inline]
    pub fn side(&self) -> u64 {
        self.side
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::defs::squarename as sq;

    #[test]
    fn keys_are_deterministic() {
        let a = ZobristKeys::new_with_seed(42);
        let b = ZobristKeys::new_with_seed(42);
        assert_eq!(a.piece(Piece::WhiteRook, sq::C4), b.piece(Piece::WhiteRook, sq::C4));
        assert_eq!(a.en_passant(sq::B3), b.en_passant(sq::B3));
        assert_eq!(a.side(), b.side());
    }

    #[test]
    fn keys_are_distinct() {
        let keys = zobrist();
        // A cheap sanity check that no two piece-square keys collide.
        let mut seen = std::collections::HashSet::new();
        for p in Piece::ALL {
            for s in 0..40u8 {
                assert!(seen.insert(keys.piece(p, Square(s))), "duplicate key {p:?}/{s}");
            }
        }
        assert!(!seen.contains(&keys.side()));
    }
}
