//! Move application and reversal with full incremental bookkeeping.
//!
//! `make_move` mutates the position in place, keeping the Zobrist key,
//! material totals, piece lists, pawn bitboards, and king caches exact at
//! every step, and discovers legality by attempting the move: if the mover's
//! own king ends up attacked the whole mutation is rolled back. `take_move`
//! reverses piece placement mechanically and then restores rights, clocks,
//! and the hash verbatim from the history snapshot so no drift can
//! accumulate across millions of cycles.

use crate::board::attacks::is_square_attacked;
use crate::board::board_state::BoardState;
use crate::board::board_types::*;
use crate::board::undo_state::UndoState;
use crate::moves::move_description::{
    captured_piece, move_from, move_to, promoted_piece, Move, FLAG_CASTLE, FLAG_EN_PASSANT,
    FLAG_PAWN_START,
};
use crate::search::zobrist;

/// Castling-permission mask per square: moving from or to a square ANDs the
/// rights with its entry, so rights only ever narrow as king/rook squares
/// are touched.
#[rustfmt::skip]
pub const CASTLE_PERM_MASK: [CastlingRights; BOARD_SQUARE_COUNT] = [
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 13, 15, 15, 15, 12, 15, 15, 14, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15,  7, 15, 15, 15,  3, 15, 15, 11, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
];

#[inline]
fn hash_piece(board: &mut BoardState, piece: Piece, sq: Square) {
    board.pos_key ^= zobrist::piece_square_key(piece, sq);
}

#[inline]
fn hash_castle(board: &mut BoardState) {
    board.pos_key ^= zobrist::castling_key(board.castle_perm);
}

#[inline]
fn hash_side(board: &mut BoardState) {
    board.pos_key ^= zobrist::side_to_move_key();
}

#[inline]
fn hash_en_passant(board: &mut BoardState) {
    if let Some(sq) = board.en_passant {
        board.pos_key ^= zobrist::en_passant_key(sq);
    }
}

/// Remove the piece on `sq`, updating hash, material, counters, bitboards,
/// and the piece list (swap-with-last removal).
fn clear_piece(board: &mut BoardState, sq: Square) {
    let piece = board.pieces[sq];
    debug_assert!(piece.color().is_some(), "clearing an empty square");
    let color_idx = piece.color().map(Color::index).unwrap_or(0);

    hash_piece(board, piece, sq);

    board.pieces[sq] = Piece::Empty;
    board.material[color_idx] -= piece.value();

    if piece.is_big() {
        board.big_piece_count[color_idx] -= 1;
        if piece.is_major() {
            board.major_piece_count[color_idx] -= 1;
        } else {
            board.minor_piece_count[color_idx] -= 1;
        }
    } else {
        let sq64 = SQ120_TO_SQ64[sq];
        board.pawns[color_idx] &= !(1u64 << sq64);
        board.pawns[BOTH_SIDES] &= !(1u64 << sq64);
    }

    let code = piece.index();
    let mut removed = None;
    for slot in 0..board.piece_count[code] {
        if board.piece_list[code][slot] == sq {
            removed = Some(slot);
            break;
        }
    }
    let slot = removed.expect("piece list out of sync with board");
    board.piece_count[code] -= 1;
    board.piece_list[code][slot] = board.piece_list[code][board.piece_count[code]];
}

/// Place `piece` on `sq`, updating hash, material, counters, bitboards, and
/// the piece list.
fn add_piece(board: &mut BoardState, sq: Square, piece: Piece) {
    debug_assert!(piece.color().is_some());
    debug_assert!(board.pieces[sq] == Piece::Empty);
    let color_idx = piece.color().map(Color::index).unwrap_or(0);

    hash_piece(board, piece, sq);
    board.pieces[sq] = piece;

    if piece.is_big() {
        board.big_piece_count[color_idx] += 1;
        if piece.is_major() {
            board.major_piece_count[color_idx] += 1;
        } else {
            board.minor_piece_count[color_idx] += 1;
        }
    } else {
        let sq64 = SQ120_TO_SQ64[sq];
        board.pawns[color_idx] |= 1u64 << sq64;
        board.pawns[BOTH_SIDES] |= 1u64 << sq64;
    }

    board.material[color_idx] += piece.value();

    let code = piece.index();
    board.piece_list[code][board.piece_count[code]] = sq;
    board.piece_count[code] += 1;
}

/// Relocate the piece on `from` to the empty square `to`.
fn move_piece(board: &mut BoardState, from: Square, to: Square) {
    let piece = board.pieces[from];
    debug_assert!(piece.color().is_some());
    debug_assert!(board.pieces[to] == Piece::Empty);
    let color_idx = piece.color().map(Color::index).unwrap_or(0);

    hash_piece(board, piece, from);
    board.pieces[from] = Piece::Empty;
    hash_piece(board, piece, to);
    board.pieces[to] = piece;

    if !piece.is_big() {
        let from64 = SQ120_TO_SQ64[from];
        let to64 = SQ120_TO_SQ64[to];
        board.pawns[color_idx] &= !(1u64 << from64);
        board.pawns[color_idx] |= 1u64 << to64;
        board.pawns[BOTH_SIDES] &= !(1u64 << from64);
        board.pawns[BOTH_SIDES] |= 1u64 << to64;
    }

    let code = piece.index();
    let mut found = false;
    for slot in 0..board.piece_count[code] {
        if board.piece_list[code][slot] == from {
            board.piece_list[code][slot] = to;
            found = true;
            break;
        }
    }
    debug_assert!(found, "piece list out of sync with board");

    if piece.is_king() {
        board.king_sq[color_idx] = to;
    }
}

/// Apply `mv` to the position.
///
/// Returns `false` and leaves the position untouched when the move would
/// leave the mover's own king attacked; legality is discovered by
/// attempting the move, not by pre-filtering.
pub fn make_move(board: &mut BoardState, mv: Move) -> bool {
    debug_assert!(board.is_consistent());

    let from = move_from(mv);
    let to = move_to(mv);
    let side = board.side;

    debug_assert!(board.pieces[from].color() == Some(side));
    assert!(
        board.his_ply < MAX_GAME_MOVES,
        "game length exceeds history capacity"
    );

    // Snapshot everything take_move restores verbatim.
    board.history[board.his_ply] = UndoState {
        mv,
        castle_perm: board.castle_perm,
        en_passant: board.en_passant,
        fifty_move: board.fifty_move,
        pos_key: board.pos_key,
    };

    // Special captures and rook relocation come before the main piece move.
    if mv & FLAG_EN_PASSANT != 0 {
        match side {
            Color::Light => clear_piece(board, shifted(to, -10)),
            Color::Dark => clear_piece(board, shifted(to, 10)),
        }
    } else if mv & FLAG_CASTLE != 0 {
        match to {
            C1 => move_piece(board, A1, D1),
            G1 => move_piece(board, H1, F1),
            C8 => move_piece(board, A8, D8),
            G8 => move_piece(board, H8, F8),
            _ => debug_assert!(false, "castle move to a non-castle square"),
        }
    }

    hash_en_passant(board);
    hash_castle(board);

    board.castle_perm &= CASTLE_PERM_MASK[from];
    board.castle_perm &= CASTLE_PERM_MASK[to];
    board.en_passant = None;

    hash_castle(board);

    board.fifty_move += 1;
    let captured = captured_piece(mv);
    if captured != Piece::Empty {
        clear_piece(board, to);
        board.fifty_move = 0;
    }

    board.his_ply += 1;
    board.ply += 1;

    if board.pieces[from].is_pawn() {
        board.fifty_move = 0;
        if mv & FLAG_PAWN_START != 0 {
            board.en_passant = Some(match side {
                Color::Light => shifted(from, 10),
                Color::Dark => shifted(from, -10),
            });
            hash_en_passant(board);
        }
    }

    move_piece(board, from, to);

    let promoted = promoted_piece(mv);
    if promoted != Piece::Empty {
        clear_piece(board, to);
        add_piece(board, to, promoted);
    }

    board.side = side.opposite();
    hash_side(board);

    if is_square_attacked(board, board.king_sq[side.index()], board.side) {
        take_move(board);
        return false;
    }

    debug_assert!(board.is_consistent());
    true
}

/// Reverse the most recent successful `make_move`.
pub fn take_move(board: &mut BoardState) {
    debug_assert!(board.his_ply > 0 && board.ply > 0);

    board.his_ply -= 1;
    board.ply -= 1;

    let undo = board.history[board.his_ply];
    let mv = undo.mv;
    let from = move_from(mv);
    let to = move_to(mv);

    // Reverse the physical placement first. The hash is corrupted by these
    // primitives and overwritten from the snapshot below.
    if mv & FLAG_EN_PASSANT != 0 {
        match board.side {
            // Side has not flipped back yet, so Light here means Dark moved.
            Color::Light => add_piece(board, shifted(to, 10), Piece::LightPawn),
            Color::Dark => add_piece(board, shifted(to, -10), Piece::DarkPawn),
        }
    } else if mv & FLAG_CASTLE != 0 {
        match to {
            C1 => move_piece(board, D1, A1),
            G1 => move_piece(board, F1, H1),
            C8 => move_piece(board, D8, A8),
            G8 => move_piece(board, F8, H8),
            _ => debug_assert!(false, "castle move to a non-castle square"),
        }
    }

    move_piece(board, to, from);

    let captured = captured_piece(mv);
    if captured != Piece::Empty {
        add_piece(board, to, captured);
    }

    if promoted_piece(mv) != Piece::Empty {
        clear_piece(board, from);
        let pawn = match board.side {
            Color::Light => Piece::DarkPawn,
            Color::Dark => Piece::LightPawn,
        };
        add_piece(board, from, pawn);
    }

    board.side = board.side.opposite();

    // Counters and key come back verbatim from the snapshot rather than
    // being re-derived on the reverse walk.
    board.castle_perm = undo.castle_perm;
    board.fifty_move = undo.fifty_move;
    board.en_passant = undo.en_passant;
    board.pos_key = undo.pos_key;

    debug_assert!(board.is_consistent());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::move_generator::generate_all_moves;
    use crate::moves::move_description::pack_move;
    use crate::moves::move_list::MoveList;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn play(board: &mut BoardState, text: &str) {
        let mv = parse_long_algebraic(text, board).expect("move should parse");
        assert!(make_move(board, mv), "move {text} should be legal");
    }

    #[test]
    fn apply_then_undo_restores_position_bit_for_bit() {
        let fens = [
            crate::board::board_rules::STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ];

        for fen in fens {
            let mut board = BoardState::from_fen(fen).expect("FEN should parse");
            let reference = board.clone();
            let mut list = MoveList::new();
            generate_all_moves(&board, &mut list);

            for entry in list.iter() {
                if !make_move(&mut board, entry.mv) {
                    continue;
                }
                take_move(&mut board);

                assert_eq!(board.pieces, reference.pieces);
                assert_eq!(board.piece_count, reference.piece_count);
                assert_eq!(board.king_sq, reference.king_sq);
                assert_eq!(board.castle_perm, reference.castle_perm);
                assert_eq!(board.en_passant, reference.en_passant);
                assert_eq!(board.fifty_move, reference.fifty_move);
                assert_eq!(board.pawns, reference.pawns);
                assert_eq!(board.material, reference.material);
                assert_eq!(board.pos_key, reference.pos_key);
            }
        }
    }

    #[test]
    fn rejects_moves_that_leave_king_in_check() {
        // The e-file knight is pinned by the rook.
        let mut board =
            BoardState::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let before = board.pos_key;
        let e2 = file_rank_to_square(4, 1);
        let c3 = file_rank_to_square(2, 2);
        let mv = pack_move(e2, c3, Piece::Empty, Piece::Empty, 0);

        assert!(!make_move(&mut board, mv));
        assert_eq!(board.pos_key, before);
        assert_eq!(board.side, Color::Light);
        assert!(board.is_consistent());
    }

    #[test]
    fn en_passant_capture_removes_the_bypassed_pawn() {
        let mut board = BoardState::new_game();
        play(&mut board, "e2e4");
        play(&mut board, "a7a6");
        play(&mut board, "e4e5");
        play(&mut board, "d7d5");

        let e5 = file_rank_to_square(4, 4);
        let d6 = file_rank_to_square(3, 5);
        let d5 = file_rank_to_square(3, 4);
        assert_eq!(board.en_passant, Some(d6));

        let mv = pack_move(e5, d6, Piece::Empty, Piece::Empty, FLAG_EN_PASSANT);
        assert!(make_move(&mut board, mv));
        assert_eq!(board.pieces[d5], Piece::Empty);
        assert_eq!(board.pieces[d6], Piece::LightPawn);

        take_move(&mut board);
        assert_eq!(board.pieces[d5], Piece::DarkPawn);
        assert_eq!(board.pieces[d6], Piece::Empty);
        assert_eq!(board.en_passant, Some(d6));
    }

    #[test]
    fn castling_relocates_rook_and_narrows_rights() {
        let mut board = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");

        let mv = pack_move(E1, G1, Piece::Empty, Piece::Empty, FLAG_CASTLE);
        assert!(make_move(&mut board, mv));
        assert_eq!(board.pieces[F1], Piece::LightRook);
        assert_eq!(board.pieces[G1], Piece::LightKing);
        assert_eq!(
            board.castle_perm & (CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            0
        );

        take_move(&mut board);
        assert_eq!(board.pieces[H1], Piece::LightRook);
        assert_eq!(board.pieces[E1], Piece::LightKing);
        assert_eq!(board.castle_perm, 0b1111);
    }

    #[test]
    fn promotion_replaces_pawn_and_reverses() {
        let mut board =
            BoardState::from_fen("8/P6k/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let a7 = file_rank_to_square(0, 6);
        let a8 = file_rank_to_square(0, 7);
        let mv = pack_move(a7, a8, Piece::Empty, Piece::LightQueen, 0);

        assert!(make_move(&mut board, mv));
        assert_eq!(board.pieces[a8], Piece::LightQueen);
        assert_eq!(board.piece_count[Piece::LightPawn.index()], 0);

        take_move(&mut board);
        assert_eq!(board.pieces[a7], Piece::LightPawn);
        assert_eq!(board.piece_count[Piece::LightQueen.index()], 0);
    }

    #[test]
    fn seeded_random_walk_keeps_every_invariant_exact() {
        use rand::rngs::StdRng;
        use rand::{RngExt, SeedableRng};

        let mut board = BoardState::new_game();
        let snapshot = board.clone();
        let mut rng = StdRng::seed_from_u64(0x1D0_C0DE);
        let mut list = MoveList::new();
        let mut played = 0usize;

        while played < 120 {
            generate_all_moves(&board, &mut list);

            let mut candidates: Vec<u32> = Vec::with_capacity(list.count);
            for index in 0..list.count {
                if make_move(&mut board, list.moves[index].mv) {
                    take_move(&mut board);
                    candidates.push(list.moves[index].mv);
                }
            }
            if candidates.is_empty() {
                break;
            }

            let mv = candidates[rng.random_range(0..candidates.len())];
            assert!(make_move(&mut board, mv));
            played += 1;

            assert!(board.is_consistent());
            assert_eq!(
                board.pos_key,
                crate::search::zobrist::compute_pos_key(&board)
            );
        }

        for _ in 0..played {
            take_move(&mut board);
        }
        assert_eq!(board.pieces, snapshot.pieces);
        assert_eq!(board.pos_key, snapshot.pos_key);
        assert_eq!(board.castle_perm, snapshot.castle_perm);
        assert_eq!(board.material, snapshot.material);
    }

    #[test]
    fn fifty_move_clock_resets_on_pawn_moves_and_captures() {
        let mut board = BoardState::new_game();
        play(&mut board, "g1f3");
        assert_eq!(board.fifty_move, 1);
        play(&mut board, "b8c6");
        assert_eq!(board.fifty_move, 2);
        play(&mut board, "e2e4");
        assert_eq!(board.fifty_move, 0);
    }
}
