//! Zobrist hashing for position identity and repetition tracking.
//!
//! Keys cover every (piece, square) pair over the full mailbox index space,
//! the side to move, the 16 castling-rights values, and an en-passant
//! contribution taken from the empty-piece row keyed by the target square.
//! The keys are generated from a fixed seed so hashes are deterministic
//! across runs, which is useful for testing and debugging.

use std::sync::OnceLock;

use crate::board::board_state::BoardState;
use crate::board::board_types::{
    CastlingRights, Color, Piece, Square, BOARD_SQUARE_COUNT, PIECE_CODE_COUNT,
};

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; BOARD_SQUARE_COUNT]; PIECE_CODE_COUNT],
    side_to_move: u64,
    castling: [u64; 16],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut piece_square = [[0u64; BOARD_SQUARE_COUNT]; PIECE_CODE_COUNT];
    for piece_row in &mut piece_square {
        for key in piece_row.iter_mut() {
            *key = next_random_u64(&mut seed);
        }
    }

    let side_to_move = next_random_u64(&mut seed);

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = next_random_u64(&mut seed);
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Key for a `(piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(piece: Piece, sq: Square) -> u64 {
    debug_assert!(piece != Piece::Offboard);
    tables().piece_square[piece.index()][sq]
}

/// Key contribution for an active en-passant target square.
#[inline]
pub fn en_passant_key(sq: Square) -> u64 {
    tables().piece_square[Piece::Empty.index()][sq]
}

/// Side-to-move toggle key (xor in when dark is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Key contribution for a castling-rights mask (`0..=15`).
#[inline]
pub fn castling_key(castle_perm: CastlingRights) -> u64 {
    tables().castling[(castle_perm & 0x0F) as usize]
}

/// Compute the full position key from scratch. Must always equal the
/// incrementally maintained key.
pub fn compute_pos_key(board: &BoardState) -> u64 {
    let mut key = 0u64;

    for sq in 0..BOARD_SQUARE_COUNT {
        let piece = board.pieces[sq];
        if piece != Piece::Empty && piece != Piece::Offboard {
            key ^= piece_square_key(piece, sq);
        }
    }

    if board.side == Color::Dark {
        key ^= side_to_move_key();
    }

    if let Some(ep_sq) = board.en_passant {
        key ^= en_passant_key(ep_sq);
    }

    key ^= castling_key(board.castle_perm);

    key
}
