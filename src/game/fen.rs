// src/game/fen.rs
//
// The compact position format: eight 5-column rank rows from rank 8 down,
// `PNBRK` for White, `p` for Black, digits for runs of empty files, then
// the side to move and the en-passant square. Parsing is deliberately
// permissive: unknown characters are skipped and a truncated string leaves
// the remaining state at its defaults.

use rand::Rng;

use crate::game::board::position::Position;
use crate::game::defs::{Piece, Side, Square, NO_SQUARE, START_ROWS};

/// The reference start used by tests and `Position::default()`.
pub const DEFAULT_START_FEN: &str = "ppppp/ppppp/ppppp/5/5/5/PPPPP/RNK1B w -";

pub const EMPTY_FEN: &str = "5/5/5/5/5/5/5/5 w -";

/// A fresh game: Black pawns fill the top three ranks, White pawns rank 2,
/// and the back row is drawn from the fixed list of 120 arrangements.
pub fn start_position_fen() -> String {
    let row = START_ROWS[rand::thread_rng().gen_range(0..START_ROWS.len())];
    format!("ppppp/ppppp/ppppp/5/5/5/PPPPP/{row} w -")
}

pub fn position_from_fen(fen: &str) -> Position {
    let mut pos = Position::empty();
    let bytes = fen.as_bytes();
    let mut idx = 0usize;

    for rank in 0..8u8 {
        let mut file = 0i32;
        while file < 5 {
            let Some(&ch) = bytes.get(idx) else { break };
            match ch {
                b'A'..=b'Z' | b'a'..=b'z' => {
                    if let Some(piece) = Piece::from_fen_char(ch as char) {
                        pos.bitboards[piece as usize]
                            .set_bit(Square::from_file_rank(file as u8, rank));
                    }
                    idx += 1;
                }
                b'0'..=b'9' => {
                    file += (ch - b'0') as i32 - 1;
                    idx += 1;
                }
                // Anything else burns a file slot without advancing.
                _ => {}
            }
            file += 1;
        }
        if bytes.get(idx) == Some(&b'/') {
            idx += 1;
        }
    }

    // Side to move, one char past the separating space.
    idx += 1;
    match bytes.get(idx) {
        Some(&b'w') => pos.side_to_move = Side::White,
        Some(&b'b') => pos.side_to_move = Side::Black,
        _ => {}
    }

    // En-passant square or '-'.
    idx += 2;
    if let (Some(&fc), Some(&rc)) = (bytes.get(idx), bytes.get(idx + 1)) {
        if fc != b'-' {
            let file = fc.wrapping_sub(b'a') as i32;
            let rank = 8 - rc.wrapping_sub(b'0') as i32;
            if (0..5).contains(&file) && (0..8).contains(&rank) {
                pos.en_passant = Square((rank * 5 + file) as u8);
            }
        }
    }

    pos.rederive_occupancies();
    pos.hash_key = pos.position_key();
    pos
}

/// Writes the current board back out in the compact format.
pub fn position_to_fen(pos: &Position) -> String {
    let mut placement = String::with_capacity(48);
    for rank in 0..8u8 {
        let mut empty_run = 0;
        for file in 0..5u8 {
            let piece = pos.piece_at(Square::from_file_rank(file, rank));
            if piece == Piece::NoPiece {
                empty_run += 1;
                continue;
            }
            if empty_run > 0 {
                placement.push(char::from(b'0' + empty_run));
                empty_run = 0;
            }
            placement.push(piece.fen_char());
        }
        if empty_run > 0 {
            placement.push(char::from(b'0' + empty_run));
        }
        if rank != 7 {
            placement.push('/');
        }
    }

    let side = if pos.side_to_move == Side::White { "w" } else { "b" };
    let ep = if pos.en_passant == NO_SQUARE {
        "-".to_string()
    } else {
        pos.en_passant.to_string()
    };

    format!("{placement} {side} {ep}")
}
