//! Square-attack detection over the mailbox board.
//!
//! Pawns use the two diagonal offsets of the attacking color, knights and
//! kings use fixed offset tables, and sliders walk rays until the first
//! occupied cell. The sentinel border terminates every walk without bounds
//! arithmetic. No allocation; this is the legality oracle's inner loop.

use crate::board::board_state::BoardState;
use crate::board::board_types::{shifted, Color, Piece, Square};

pub const KNIGHT_DIRECTIONS: [isize; 8] = [-8, -19, -21, -12, 8, 19, 21, 12];
pub const ROOK_DIRECTIONS: [isize; 4] = [-1, -10, 1, 10];
pub const BISHOP_DIRECTIONS: [isize; 4] = [-9, -11, 11, 9];
pub const KING_DIRECTIONS: [isize; 8] = [-1, -10, 1, 10, -9, -11, 11, 9];

/// True when `attacker` attacks `sq` in the given position.
pub fn is_square_attacked(board: &BoardState, sq: Square, attacker: Color) -> bool {
    debug_assert!(board.pieces[sq] != Piece::Offboard);

    // Pawns attack diagonally toward their direction of travel.
    match attacker {
        Color::Light => {
            if board.pieces[shifted(sq, -11)] == Piece::LightPawn
                || board.pieces[shifted(sq, -9)] == Piece::LightPawn
            {
                return true;
            }
        }
        Color::Dark => {
            if board.pieces[shifted(sq, 11)] == Piece::DarkPawn
                || board.pieces[shifted(sq, 9)] == Piece::DarkPawn
            {
                return true;
            }
        }
    }

    let knight = Piece::knight_of(attacker);
    for dir in KNIGHT_DIRECTIONS {
        if board.pieces[shifted(sq, dir)] == knight {
            return true;
        }
    }

    let king = Piece::king_of(attacker);
    for dir in KING_DIRECTIONS {
        if board.pieces[shifted(sq, dir)] == king {
            return true;
        }
    }

    let rook = Piece::rook_of(attacker);
    let queen = Piece::queen_of(attacker);
    for dir in ROOK_DIRECTIONS {
        let mut target = shifted(sq, dir);
        loop {
            let piece = board.pieces[target];
            if piece == Piece::Offboard {
                break;
            }
            if piece != Piece::Empty {
                if piece == rook || piece == queen {
                    return true;
                }
                break;
            }
            target = shifted(target, dir);
        }
    }

    let bishop = Piece::bishop_of(attacker);
    for dir in BISHOP_DIRECTIONS {
        let mut target = shifted(sq, dir);
        loop {
            let piece = board.pieces[target];
            if piece == Piece::Offboard {
                break;
            }
            if piece != Piece::Empty {
                if piece == bishop || piece == queen {
                    return true;
                }
                break;
            }
            target = shifted(target, dir);
        }
    }

    false
}
