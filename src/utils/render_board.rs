//! Terminal-oriented Unicode board renderer for debugging and tests.

use crate::board::board_state::BoardState;
use crate::board::board_types::*;

/// Render the board to a Unicode string for terminal output.
pub fn render_board(board: &BoardState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (RANK_1..=RANK_8).rev() {
        out.push(char::from(b'1' + rank as u8));
        out.push(' ');

        for file in FILE_A..=FILE_H {
            let piece = board.pieces[file_rank_to_square(file, rank)];
            match piece_to_unicode(piece) {
                Some(ch) => out.push(ch),
                None => out.push('·'),
            }
            if file < FILE_H {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank as u8));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}

fn piece_to_unicode(piece: Piece) -> Option<char> {
    match piece {
        Piece::LightPawn => Some('♙'),
        Piece::LightKnight => Some('♘'),
        Piece::LightBishop => Some('♗'),
        Piece::LightRook => Some('♖'),
        Piece::LightQueen => Some('♕'),
        Piece::LightKing => Some('♔'),
        Piece::DarkPawn => Some('♟'),
        Piece::DarkKnight => Some('♞'),
        Piece::DarkBishop => Some('♝'),
        Piece::DarkRook => Some('♜'),
        Piece::DarkQueen => Some('♛'),
        Piece::DarkKing => Some('♚'),
        Piece::Empty | Piece::Offboard => None,
    }
}
