// src/game/board/position.rs

use std::fmt;
use colored::*;

use crate::game::board::bitboard::BitBoard;
use crate::game::board::zobrist::zobrist;
use crate::game::defs::{Piece, Side, Square, NO_SQUARE};
use crate::game::moves::Move;

/// The five squares of rank 1. A Black pawn landing here ends the game.
pub const RANK_1: BitBoard = BitBoard(0x1f << 35);

#[derive(Clone, Copy)]
pub enum MoveFilter {
    AllMoves,
    OnlyCaptures,
}

/// Everything needed to reverse one move. The piece bitboards themselves
/// are reconstructed by reversing the motion, not copied.
#[derive(Clone, Copy)]
struct UndoRecord {
    mv: Move,
    en_passant: Square,
    side_to_move: Side,
    occupancies: [BitBoard; 3],
    hash_key: u64,
}

/// Snapshot taken around a null move; the side toggles back by itself.
#[derive(Clone, Copy)]
pub struct NullUndo {
    en_passant: Square,
    hash_key: u64,
}

/// The single mutable board state the search operates on.
pub struct Position {
    pub bitboards: [BitBoard; 6],
    pub occupancies: [BitBoard; 3],
    pub side_to_move: Side,
    pub en_passant: Square,
    pub hash_key: u64,
    /// Current search depth counter, root = 0.
    pub ply: usize,
    repetition_table: Vec<u64>,
    repetition_index: usize,
    move_stack: Vec<UndoRecord>,
}

impl Position {
    pub fn empty() -> Self {
        Self {
            bitboards: [BitBoard::EMPTY; 6],
            occupancies: [BitBoard::EMPTY; 3],
            side_to_move: Side::White,
            en_passant: NO_SQUARE,
            hash_key: 0,
            ply: 0,
            // Slot 0 of the repetition stack is never read.
            repetition_table: vec![0],
            repetition_index: 0,
            move_stack: Vec::with_capacity(256),
        }
    }

    #[inline]
    pub fn pieces(&self, p: Piece) -> BitBoard {
        self.bitboards[p as usize]
    }

    pub fn piece_at(&self, sq: Square) -> Piece {
        for p in Piece::ALL {
            if self.bitboards[p as usize].get_bit(sq) {
                return p;
            }
        }
        Piece::NoPiece
    }

    /// White occupancy is the OR of the five White piece boards; Black is
    /// just the pawn board.
    pub fn rederive_occupancies(&mut self) {
        self.occupancies = [BitBoard::EMPTY; 3];
        for p in Piece::WHITE {
            self.occupancies[Side::White as usize] |= self.bitboards[p as usize];
        }
        self.occupancies[Side::Black as usize] |= self.bitboards[Piece::BlackPawn as usize];
        self.occupancies[Side::Both as usize] =
            self.occupancies[Side::White as usize] | self.occupancies[Side::Black as usize];
    }

    /// Zobrist hash folded from scratch; the incremental `hash_key` must
    /// always agree with this.
    pub fn position_key(&self) -> u64 {
        let keys = zobrist();
        let mut key = 0u64;
        for p in Piece::ALL {
            for sq in self.bitboards[p as usize].iter_squares() {
                key ^= keys.piece(p, sq);
            }
        }
        if self.en_passant != NO_SQUARE {
            key ^= keys.en_passant(self.en_passant);
        }
        if self.side_to_move == Side::Black {
            key ^= keys.side();
        }
        key
    }

    /// Applies a move. Under `OnlyCaptures` a quiet move is rejected and
    /// the position is left untouched; the caller skips it.
    pub fn make_move(&mut self, mv: Move, filter: MoveFilter) -> bool {
        if let MoveFilter::OnlyCaptures = filter {
            if mv.captured() == Piece::NoPiece {
                return false;
            }
            return self.make_move(mv, MoveFilter::AllMoves);
        }

        let source = mv.source();
        let target = mv.target();
        let piece = mv.piece();
        let promoted = mv.promoted();
        let captured = mv.captured();

        self.move_stack.push(UndoRecord {
            mv,
            en_passant: self.en_passant,
            side_to_move: self.side_to_move,
            occupancies: self.occupancies,
            hash_key: self.hash_key,
        });

        let keys = zobrist();

        // Move the piece.
        self.bitboards[piece as usize].pop_bit(source);
        self.bitboards[piece as usize].set_bit(target);
        self.hash_key ^= keys.piece(piece, source);
        self.hash_key ^= keys.piece(piece, target);

        if captured != Piece::NoPiece && self.bitboards[captured as usize].get_bit(target) {
            self.bitboards[captured as usize].pop_bit(target);
            self.hash_key ^= keys.piece(captured, target);
        }

        if promoted != Piece::NoPiece {
            self.bitboards[piece as usize].pop_bit(target);
            self.hash_key ^= keys.piece(piece, target);
            self.bitboards[promoted as usize].set_bit(target);
            self.hash_key ^= keys.piece(promoted, target);
        }

        // Only Black captures en passant; the victim sits behind the
        // landing square.
        if mv.is_en_passant() && self.side_to_move == Side::Black {
            let victim = Square(target.0 - 5);
            self.bitboards[Piece::WhitePawn as usize].pop_bit(victim);
            self.hash_key ^= keys.piece(Piece::WhitePawn, victim);
        }

        if self.en_passant != NO_SQUARE {
            self.hash_key ^= keys.en_passant(self.en_passant);
        }
        self.en_passant = NO_SQUARE;

        if mv.is_double_push() && self.side_to_move == Side::White {
            let ep = Square(target.0 + 5);
            self.en_passant = ep;
            self.hash_key ^= keys.en_passant(ep);
        }

        self.rederive_occupancies();

        self.side_to_move = !self.side_to_move;
        self.hash_key ^= keys.side();

        true
    }

    pub fn unmake_move(&mut self) {
        let Some(rec) = self.move_stack.pop() else { return };
        let mv = rec.mv;
        let source = mv.source();
        let target = mv.target();
        let piece = mv.piece();
        let promoted = mv.promoted();
        let captured = mv.captured();

        self.side_to_move = rec.side_to_move;
        self.en_passant = rec.en_passant;
        self.occupancies = rec.occupancies;
        self.hash_key = rec.hash_key;

        if promoted != Piece::NoPiece {
            self.bitboards[promoted as usize].pop_bit(target);
            self.bitboards[piece as usize].set_bit(source);
        } else {
            self.bitboards[piece as usize].pop_bit(target);
            self.bitboards[piece as usize].set_bit(source);
        }

        if captured != Piece::NoPiece {
            if mv.is_en_passant() {
                if self.side_to_move == Side::Black {
                    self.bitboards[Piece::WhitePawn as usize].set_bit(Square(target.0 - 5));
                }
            } else {
                self.bitboards[captured as usize].set_bit(target);
            }
        }
    }

    /// "Pass": clear the en-passant square and hand the move to the
    /// opponent, keeping the hash key in sync.
    pub fn make_null(&mut self) -> NullUndo {
        let undo = NullUndo { en_passant: self.en_passant, hash_key: self.hash_key };
        let keys = zobrist();
        if self.en_passant != NO_SQUARE {
            self.hash_key ^= keys.en_passant(self.en_passant);
        }
        self.en_passant = NO_SQUARE;
        self.side_to_move = !self.side_to_move;
        self.hash_key ^= keys.side();
        undo
    }

    pub fn unmake_null(&mut self, undo: NullUndo) {
        self.side_to_move = !self.side_to_move;
        self.en_passant = undo.en_passant;
        self.hash_key = undo.hash_key;
    }

    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.move_stack.len()
    }

    // The repetition stack mirrors a flat array with a monotone top index;
    // slot 0 stays unused and the scan excludes the top slot.

    #[inline]
    pub fn push_repetition(&mut self) {
        self.repetition_index += 1;
        if self.repetition_index < self.repetition_table.len() {
            self.repetition_table[self.repetition_index] = self.hash_key;
        } else {
            self.repetition_table.push(self.hash_key);
        }
    }

    #[inline]
    pub fn pop_repetition(&mut self) {
        self.repetition_index -= 1;
    }

    #[inline]
    pub fn is_repetition(&self) -> bool {
        self.repetition_table[..self.repetition_index]
            .iter()
            .any(|&key| key == self.hash_key)
    }

    /// Black wins with a pawn on rank 1 or by emptying the White army;
    /// White wins by taking every Black pawn.
    pub fn is_terminal(&self) -> bool {
        if !(self.bitboards[Piece::BlackPawn as usize] & RANK_1).is_empty() {
            return true;
        }
        if self.occupancies[Side::White as usize].is_empty() {
            return true;
        }
        if self.occupancies[Side::Black as usize].is_empty() {
            return true;
        }
        false
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let light = (240, 217, 181);
        let dark = (181, 136, 99);

        for rank in 0..8u8 {
            write!(f, "{} ", (8 - rank).to_string().red())?;
            for file in 0..5u8 {
                let sq = Square::from_file_rank(file, rank);
                let symbol = self.piece_at(sq).unicode();
                let (r, g, b) = if (rank + file) % 2 == 0 { light } else { dark };
                let cell = format!(" {} ", symbol)
                    .on_truecolor(r, g, b)
                    .truecolor(0, 0, 0);
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   {}", " a  b  c  d  e".red())?;
        writeln!(
            f,
            "side: {}  en-passant: {}  hash: {:016x}",
            if self.side_to_move == Side::White { "white" } else { "black" },
            self.en_passant,
            self.hash_key,
        )
    }
}

impl Default for Position {
    /// The fixed reference start: Black pawns on the top three ranks,
    /// White pawns on rank 2 and the RNK1B back row.
    fn default() -> Self {
        crate::game::fen::position_from_fen(crate::game::fen::DEFAULT_START_FEN)
    }
}
