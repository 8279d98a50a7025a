//! Long-algebraic move text (`e2e4`, `e7e8q`).
//!
//! Rendering needs only the packed move; parsing resolves the text against
//! the move generator so capture, en-passant, castle, and double-push
//! details come out exactly as generation would pack them.

use crate::board::board_state::BoardState;
use crate::board::board_types::Piece;
use crate::move_generation::move_generator::generate_all_moves;
use crate::moves::move_description::{move_from, move_to, promoted_piece, Move};
use crate::moves::move_list::MoveList;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Render a packed move as `fromto[promotion]`.
pub fn move_to_long_algebraic(mv: Move) -> Result<String, String> {
    let mut out = String::new();
    out.push_str(&square_to_algebraic(move_from(mv))?);
    out.push_str(&square_to_algebraic(move_to(mv))?);

    match promoted_piece(mv) {
        Piece::Empty => {}
        Piece::LightQueen | Piece::DarkQueen => out.push('q'),
        Piece::LightRook | Piece::DarkRook => out.push('r'),
        Piece::LightBishop | Piece::DarkBishop => out.push('b'),
        Piece::LightKnight | Piece::DarkKnight => out.push('n'),
        other => return Err(format!("Invalid promotion piece in move: {other:?}")),
    }

    Ok(out)
}

/// Resolve move text against the pseudo-legal move set of `board`.
pub fn parse_long_algebraic(text: &str, board: &BoardState) -> Result<Move, String> {
    let bytes = text.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return Err(format!("Invalid long algebraic move: {text}"));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion_char = if bytes.len() == 5 {
        Some(bytes[4].to_ascii_lowercase())
    } else {
        None
    };

    let mut list = MoveList::new();
    generate_all_moves(board, &mut list);

    for entry in list.iter() {
        let mv = entry.mv;
        if move_from(mv) != from || move_to(mv) != to {
            continue;
        }

        let promoted = promoted_piece(mv);
        let matches = match (promotion_char, promoted) {
            (None, Piece::Empty) => true,
            (Some(b'q'), Piece::LightQueen | Piece::DarkQueen) => true,
            (Some(b'r'), Piece::LightRook | Piece::DarkRook) => true,
            (Some(b'b'), Piece::LightBishop | Piece::DarkBishop) => true,
            (Some(b'n'), Piece::LightKnight | Piece::DarkKnight) => true,
            _ => false,
        };
        if matches {
            return Ok(mv);
        }
    }

    Err(format!("Move {text} is not available in this position"))
}
