//! BoardState-to-FEN serialization, the inverse of the parser.

use crate::board::board_state::BoardState;
use crate::board::board_types::*;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(board: &BoardState) -> String {
    let mut out = String::new();

    for rank in (RANK_1..=RANK_8).rev() {
        let mut empty_run = 0;
        for file in FILE_A..=FILE_H {
            let piece = board.pieces[file_rank_to_square(file, rank)];
            match piece.to_fen_char() {
                Some(ch) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(ch);
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if rank != RANK_1 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match board.side {
        Color::Light => 'w',
        Color::Dark => 'b',
    });

    out.push(' ');
    if board.castle_perm == 0 {
        out.push('-');
    } else {
        if board.castle_perm & CASTLE_LIGHT_KINGSIDE != 0 {
            out.push('K');
        }
        if board.castle_perm & CASTLE_LIGHT_QUEENSIDE != 0 {
            out.push('Q');
        }
        if board.castle_perm & CASTLE_DARK_KINGSIDE != 0 {
            out.push('k');
        }
        if board.castle_perm & CASTLE_DARK_QUEENSIDE != 0 {
            out.push('q');
        }
    }

    out.push(' ');
    match board.en_passant.and_then(|sq| square_to_algebraic(sq).ok()) {
        Some(coord) => out.push_str(&coord),
        None => out.push('-'),
    }

    let fullmove = board.his_ply / 2 + 1;
    out.push_str(&format!(" {} {}", board.fifty_move, fullmove));

    out
}
