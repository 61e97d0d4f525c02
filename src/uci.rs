// src/uci.rs
//
// Line-oriented driver protocol. The engine prints only protocol output
// here; board rendering is left to the Display impls.

use std::io::BufRead;

use anyhow::Result;

use crate::game::board::position::{MoveFilter, Position};
use crate::game::defs::Piece;
use crate::game::fen::{position_from_fen, start_position_fen};
use crate::game::moves::{generate_moves, Move, MoveList};
use crate::search::Searcher;

const ENGINE_ID: &str = "Pawnstorm 1.0";

/// Matches a move text (`a2a4`, `b7b8R`) against the legal move list.
/// Returns `Move::NONE` when nothing matches; callers skip it.
pub fn parse_move(pos: &Position, text: &str) -> Move {
    let bytes = text.as_bytes();
    if bytes.len() < 4 {
        return Move::NONE;
    }
    let source = (bytes[0].wrapping_sub(b'a') as i32) + (8 - bytes[1].wrapping_sub(b'0') as i32) * 5;
    let target = (bytes[2].wrapping_sub(b'a') as i32) + (8 - bytes[3].wrapping_sub(b'0') as i32) * 5;

    let mut list = MoveList::new();
    generate_moves(pos, &mut list);
    for mv in list.iter().copied() {
        if mv.source().0 as i32 != source || mv.target().0 as i32 != target {
            continue;
        }
        let promoted = mv.promoted();
        if promoted != Piece::NoPiece {
            // A promotion needs its fifth character to pick the piece.
            if bytes.len() == 5 {
                let matches = match promoted {
                    Piece::WhiteKnight => bytes[4] == b'N',
                    Piece::WhiteBishop => bytes[4] == b'B',
                    Piece::WhiteRook => bytes[4] == b'R',
                    Piece::WhiteKing => bytes[4] == b'K',
                    _ => false,
                };
                if matches {
                    return mv;
                }
            }
            continue;
        }
        return mv;
    }
    Move::NONE
}

/// Handles `position startpos|fen <fen> [moves ...]` and `position undo`.
/// Without `startpos` or `fen` the current board is kept and the moves are
/// played on top of it.
pub fn parse_position(pos: &mut Position, command: &str) {
    let rest = command.strip_prefix("position").unwrap_or(command).trim_start();

    if rest.starts_with("startpos") {
        *pos = position_from_fen(&start_position_fen());
    } else if let Some(idx) = rest.find("fen") {
        *pos = position_from_fen(rest.get(idx + 4..).unwrap_or("").trim_start());
    }

    if let Some(idx) = rest.find("moves") {
        for text in rest.get(idx + 6..).unwrap_or("").split_whitespace() {
            let mv = parse_move(pos, text);
            if mv == Move::NONE {
                break;
            }
            pos.push_repetition();
            pos.make_move(mv, MoveFilter::AllMoves);
        }
    }

    if rest.contains("undo") && pos.undo_depth() > 0 {
        pos.unmake_move();
    }
}

/// Handles `go [depth <n>]`.
pub fn parse_go(searcher: &mut Searcher, pos: &mut Position, command: &str) {
    let mut depth = Searcher::default_depth();
    if let Some(idx) = command.find("depth") {
        if let Some(value) = command.get(idx + 6..) {
            if let Ok(n) = value.trim().parse::<i32>() {
                depth = n;
            }
        }
    }
    searcher.search_position(pos, depth);
}

/// Blocking command loop over stdin until `quit` or end of input.
pub fn main_loop() -> Result<()> {
    let stdin = std::io::stdin();
    let mut searcher = Searcher::new();
    let mut pos = position_from_fen(&start_position_fen());

    println!("{ENGINE_ID}");
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.starts_with("isready") {
            println!("readyok");
        } else if input.starts_with("position") {
            parse_position(&mut pos, input);
            searcher.clear_tt();
        } else if input.starts_with("ucinewgame") {
            parse_position(&mut pos, "position startpos");
            searcher.clear_tt();
        } else if input.starts_with("go") {
            parse_go(&mut searcher, &mut pos, input);
        } else if input.starts_with("uci") {
            println!("id name {ENGINE_ID}");
            println!("uciok");
        } else if input.starts_with("quit") {
            break;
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::defs::{squarename as sq, Side, NO_SQUARE};
    use crate::game::fen::DEFAULT_START_FEN;

    #[test]
    fn parses_plain_moves() {
        let pos = position_from_fen(DEFAULT_START_FEN);
        let mv = parse_move(&pos, "a2a4");
        assert_ne!(mv, Move::NONE);
        assert_eq!(mv.source(), sq::A2);
        assert_eq!(mv.target(), sq::A4);
        assert!(mv.is_double_push());
    }

    #[test]
    fn rejects_illegal_and_malformed_text() {
        let pos = position_from_fen(DEFAULT_START_FEN);
        assert_eq!(parse_move(&pos, "a2a5"), Move::NONE);
        assert_eq!(parse_move(&pos, "e7e6"), Move::NONE, "not White's move");
        assert_eq!(parse_move(&pos, "xyz"), Move::NONE);
        assert_eq!(parse_move(&pos, ""), Move::NONE);
    }

    #[test]
    fn promotion_text_must_name_the_piece() {
        let pos = position_from_fen("5/P4/5/5/5/5/5/5 w -");
        assert_eq!(parse_move(&pos, "a7a8"), Move::NONE);
        let mv = parse_move(&pos, "a7a8R");
        assert_eq!(mv.promoted(), Piece::WhiteRook);
        let mv = parse_move(&pos, "a7a8K");
        assert_eq!(mv.promoted(), Piece::WhiteKing);
    }

    #[test]
    fn position_command_plays_moves() {
        let mut pos = position_from_fen(DEFAULT_START_FEN);
        parse_position(&mut pos, "position fen ppppp/ppppp/ppppp/5/5/5/PPPPP/RNK1B w - moves c2c4 b6b5");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C4));
        assert!(pos.pieces(Piece::BlackPawn).get_bit(sq::B5));
        assert_eq!(pos.side_to_move, Side::White);
        // The double push's en-passant square expired with Black's reply.
        assert_eq!(pos.en_passant, NO_SQUARE);
    }

    #[test]
    fn position_command_stops_at_the_first_bad_move() {
        let mut pos = position_from_fen(DEFAULT_START_FEN);
        parse_position(&mut pos, "position fen ppppp/ppppp/ppppp/5/5/5/PPPPP/RNK1B w - moves c2c3 zz b6b5");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C3));
        assert_eq!(pos.side_to_move, Side::Black, "bad move must stop the replay");
    }

    #[test]
    fn undo_pops_one_move() {
        let mut pos = position_from_fen(DEFAULT_START_FEN);
        parse_position(&mut pos, "position moves c2c4");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C4));
        parse_position(&mut pos, "position undo");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C2));
        // A second undo on an empty stack is a no-op.
        parse_position(&mut pos, "position undo");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C2));
    }

    #[test]
    fn truncated_position_commands_do_not_panic() {
        let mut pos = position_from_fen(DEFAULT_START_FEN);
        parse_position(&mut pos, "position");
        parse_position(&mut pos, "position moves");
        // A bare `fen` keyword resets to an empty board.
        parse_position(&mut pos, "position fen");
        assert_eq!(pos.undo_depth(), 0);
    }

    #[test]
    fn bare_moves_keep_the_current_board() {
        let mut pos = position_from_fen("5/5/5/5/5/5/2P2/2K2 w -");
        parse_position(&mut pos, "position moves c2c4");
        assert!(pos.pieces(Piece::WhitePawn).get_bit(sq::C4));
        assert!(pos.pieces(Piece::WhiteKing).get_bit(sq::C1));
    }
}
