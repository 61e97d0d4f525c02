// src/game/moves/generator.rs

use crate::game::board::attacks::{pawn_attacks, KING_ATTACKS, KNIGHT_ATTACKS};
use crate::game::board::bitboard::BitBoard;
use crate::game::board::position::Position;
use crate::game::defs::{squarename, Piece, Side, Square, NO_SQUARE};
use crate::game::moves::definitions::{Move, MoveList};
use crate::game::moves::magics::magics;

/// Enumerates pseudo-legal moves for the side to move. King safety is not
/// checked: on this board the king is an ordinary capturable piece and the
/// game ends when one side's occupancy empties.
pub fn generate_moves(pos: &Position, out: &mut MoveList) {
    out.len = 0;
    match pos.side_to_move {
        Side::White => generate_white_moves(pos, out),
        Side::Black => generate_black_moves(pos, out),
        Side::Both => {}
    }
}

fn generate_white_moves(pos: &Position, out: &mut MoveList) {
    let own = pos.occupancies[Side::White as usize];
    let enemy = pos.occupancies[Side::Black as usize];
    let both = pos.occupancies[Side::Both as usize];

    // Pawns: pushes, double pushes, promotions, captures.
    let mut pawns = pos.pieces(Piece::WhitePawn);
    while let Some(source) = pawns.lsb() {
        let target = source.0 as i32 - 5;
        if target >= squarename::A8.0 as i32 && !both.get_bit(Square(target as u8)) {
            let target = Square(target as u8);
            if source.0 >= squarename::A7.0 && source.0 <= squarename::E7.0 {
                for promoted in Piece::PROMOTIONS {
                    out.push(Move::encode(
                        source, target, Piece::WhitePawn, promoted, Piece::NoPiece, false, false,
                    ));
                }
            } else {
                out.push(Move::encode(
                    source, target, Piece::WhitePawn, Piece::NoPiece, Piece::NoPiece, false, false,
                ));
                let double = Square(target.0 - 5);
                if source.0 >= squarename::A2.0
                    && source.0 <= squarename::E2.0
                    && !both.get_bit(double)
                {
                    out.push(Move::encode(
                        source, double, Piece::WhitePawn, Piece::NoPiece, Piece::NoPiece, true, false,
                    ));
                }
            }
        }

        // Every White capture takes a pawn; Black has nothing else.
        let mut attacks = pawn_attacks(Side::White, source) & enemy;
        while let Some(target) = attacks.lsb() {
            if source.0 >= squarename::A7.0 && source.0 <= squarename::E7.0 {
                for promoted in Piece::PROMOTIONS {
                    out.push(Move::encode(
                        source, target, Piece::WhitePawn, promoted, Piece::BlackPawn, false, false,
                    ));
                }
            } else {
                out.push(Move::encode(
                    source, target, Piece::WhitePawn, Piece::NoPiece, Piece::BlackPawn, false, false,
                ));
            }
            attacks.pop_bit(target);
        }
        pawns.pop_bit(source);
    }

    let mut leapers_and_sliders = |piece: Piece| {
        let mut bitboard = pos.pieces(piece);
        while let Some(source) = bitboard.lsb() {
            let attack_set = match piece {
                Piece::WhiteKnight => KNIGHT_ATTACKS[source.0 as usize],
                Piece::WhiteKing => KING_ATTACKS[source.0 as usize],
                Piece::WhiteBishop => magics().bishop_attacks(source, both),
                Piece::WhiteRook => magics().rook_attacks(source, both),
                _ => BitBoard::EMPTY,
            };
            let mut attacks = attack_set & !own;
            while let Some(target) = attacks.lsb() {
                let captured = if enemy.get_bit(target) { Piece::BlackPawn } else { Piece::NoPiece };
                out.push(Move::encode(source, target, piece, Piece::NoPiece, captured, false, false));
                attacks.pop_bit(target);
            }
            bitboard.pop_bit(source);
        }
    };

    leapers_and_sliders(Piece::WhiteKnight);
    leapers_and_sliders(Piece::WhiteBishop);
    leapers_and_sliders(Piece::WhiteRook);
    leapers_and_sliders(Piece::WhiteKing);
}

fn generate_black_moves(pos: &Position, out: &mut MoveList) {
    let white = pos.occupancies[Side::White as usize];
    let both = pos.occupancies[Side::Both as usize];

    // Black has only pawns, pushing down the board. No double push.
    let mut pawns = pos.pieces(Piece::BlackPawn);
    while let Some(source) = pawns.lsb() {
        let target = source.0 as i32 + 5;
        if target <= squarename::E1.0 as i32 && !both.get_bit(Square(target as u8)) {
            out.push(Move::encode(
                source,
                Square(target as u8),
                Piece::BlackPawn,
                Piece::NoPiece,
                Piece::NoPiece,
                false,
                false,
            ));
        }

        let mut attacks = pawn_attacks(Side::Black, source) & white;
        while let Some(target) = attacks.lsb() {
            // Any of the five White piece kinds may be standing here.
            let mut captured = Piece::NoPiece;
            for p in Piece::WHITE {
                if pos.pieces(p).get_bit(target) {
                    captured = p;
                    break;
                }
            }
            out.push(Move::encode(
                source, target, Piece::BlackPawn, Piece::NoPiece, captured, false, false,
            ));
            attacks.pop_bit(target);
        }

        if pos.en_passant != NO_SQUARE {
            let ep_attacks =
                pawn_attacks(Side::Black, source) & BitBoard::from_square(pos.en_passant);
            let victim_square = Square(pos.en_passant.0.wrapping_sub(5));
            if !ep_attacks.is_empty() && pos.pieces(Piece::WhitePawn).get_bit(victim_square) {
                out.push(Move::encode(
                    source,
                    pos.en_passant,
                    Piece::BlackPawn,
                    Piece::NoPiece,
                    Piece::WhitePawn,
                    false,
                    true,
                ));
            }
        }
        pawns.pop_bit(source);
    }
}
