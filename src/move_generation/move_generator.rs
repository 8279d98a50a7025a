//! Pseudo-legal move generation into a fixed-capacity buffer.
//!
//! Produces the full pseudo-legal move set for the side to move. Leaving
//! one's own king in check is deliberately not filtered here; `make_move`
//! is the single legality oracle, so generation stays branch-light and
//! allocation-free.

use crate::board::attacks::{
    is_square_attacked, BISHOP_DIRECTIONS, KING_DIRECTIONS, KNIGHT_DIRECTIONS, ROOK_DIRECTIONS,
};
use crate::board::board_state::BoardState;
use crate::board::board_types::*;
use crate::move_generation::make_move::{make_move, take_move};
use crate::moves::move_description::{
    move_from, pack_move, Move, FLAG_CASTLE, FLAG_EN_PASSANT, FLAG_PAWN_START,
};
use crate::moves::move_list::MoveList;

/// Victim values for most-valuable-victim / least-valuable-attacker capture
/// ordering, indexed by piece code.
const VICTIM_SCORE: [i32; PIECE_CODE_COUNT] =
    [0, 100, 200, 300, 400, 500, 600, 100, 200, 300, 400, 500, 600];

/// Base ordering score for an en-passant capture (pawn takes pawn).
const EN_PASSANT_SCORE: i32 = 105;

#[inline]
fn mvv_lva_score(victim: Piece, attacker: Piece) -> i32 {
    VICTIM_SCORE[victim.index()] + 6 - VICTIM_SCORE[attacker.index()] / 100
}

#[inline]
fn add_quiet_move(list: &mut MoveList, mv: Move) {
    list.push(mv, 0);
}

#[inline]
fn add_capture_move(board: &BoardState, list: &mut MoveList, mv: Move) {
    let victim = crate::moves::move_description::captured_piece(mv);
    let attacker = board.pieces[move_from(mv)];
    list.push(mv, mvv_lva_score(victim, attacker));
}

#[inline]
fn add_en_passant_move(list: &mut MoveList, mv: Move) {
    list.push(mv, EN_PASSANT_SCORE);
}

/// Promotion rank expansion for quiet pawn moves.
fn add_pawn_quiet_move(list: &mut MoveList, color: Color, from: Square, to: Square, flags: Move) {
    let promotion_rank = match color {
        Color::Light => RANK_7,
        Color::Dark => RANK_2,
    };
    if RANKS_BOARD[from] == promotion_rank {
        for promoted in [
            Piece::queen_of(color),
            Piece::rook_of(color),
            Piece::bishop_of(color),
            Piece::knight_of(color),
        ] {
            add_quiet_move(list, pack_move(from, to, Piece::Empty, promoted, flags));
        }
    } else {
        add_quiet_move(list, pack_move(from, to, Piece::Empty, Piece::Empty, flags));
    }
}

/// Promotion rank expansion for pawn captures.
fn add_pawn_capture_move(
    board: &BoardState,
    list: &mut MoveList,
    color: Color,
    from: Square,
    to: Square,
    captured: Piece,
) {
    let promotion_rank = match color {
        Color::Light => RANK_7,
        Color::Dark => RANK_2,
    };
    if RANKS_BOARD[from] == promotion_rank {
        for promoted in [
            Piece::queen_of(color),
            Piece::rook_of(color),
            Piece::bishop_of(color),
            Piece::knight_of(color),
        ] {
            add_capture_move(board, list, pack_move(from, to, captured, promoted, 0));
        }
    } else {
        add_capture_move(board, list, pack_move(from, to, captured, Piece::Empty, 0));
    }
}

fn generate_pawn_moves(board: &BoardState, list: &mut MoveList, captures_only: bool) {
    let side = board.side;
    let enemy = side.opposite();
    let pawn = Piece::pawn_of(side);
    let (forward, home_rank): (isize, usize) = match side {
        Color::Light => (10, RANK_2),
        Color::Dark => (-10, RANK_7),
    };

    for slot in 0..board.piece_count[pawn.index()] {
        let sq = board.piece_list[pawn.index()][slot];
        debug_assert!(board.pieces[sq] == pawn);

        if !captures_only && board.pieces[shifted(sq, forward)] == Piece::Empty {
            add_pawn_quiet_move(list, side, sq, shifted(sq, forward), 0);
            if RANKS_BOARD[sq] == home_rank
                && board.pieces[shifted(sq, forward * 2)] == Piece::Empty
            {
                add_quiet_move(
                    list,
                    pack_move(
                        sq,
                        shifted(sq, forward * 2),
                        Piece::Empty,
                        Piece::Empty,
                        FLAG_PAWN_START,
                    ),
                );
            }
        }

        for capture_dir in [forward - 1, forward + 1] {
            let target = shifted(sq, capture_dir);
            let target_piece = board.pieces[target];
            if target_piece.color() == Some(enemy) {
                add_pawn_capture_move(board, list, side, sq, target, target_piece);
            }
            if let Some(ep_sq) = board.en_passant {
                if target == ep_sq {
                    add_en_passant_move(
                        list,
                        pack_move(sq, target, Piece::Empty, Piece::Empty, FLAG_EN_PASSANT),
                    );
                }
            }
        }
    }
}

fn generate_castling_moves(board: &BoardState, list: &mut MoveList) {
    match board.side {
        Color::Light => {
            if board.castle_perm & CASTLE_LIGHT_KINGSIDE != 0
                && board.pieces[F1] == Piece::Empty
                && board.pieces[G1] == Piece::Empty
                && !is_square_attacked(board, E1, Color::Dark)
                && !is_square_attacked(board, F1, Color::Dark)
                && !is_square_attacked(board, G1, Color::Dark)
            {
                add_quiet_move(
                    list,
                    pack_move(E1, G1, Piece::Empty, Piece::Empty, FLAG_CASTLE),
                );
            }
            if board.castle_perm & CASTLE_LIGHT_QUEENSIDE != 0
                && board.pieces[D1] == Piece::Empty
                && board.pieces[C1] == Piece::Empty
                && board.pieces[B1] == Piece::Empty
                && !is_square_attacked(board, E1, Color::Dark)
                && !is_square_attacked(board, D1, Color::Dark)
                && !is_square_attacked(board, C1, Color::Dark)
            {
                add_quiet_move(
                    list,
                    pack_move(E1, C1, Piece::Empty, Piece::Empty, FLAG_CASTLE),
                );
            }
        }
        Color::Dark => {
            if board.castle_perm & CASTLE_DARK_KINGSIDE != 0
                && board.pieces[F8] == Piece::Empty
                && board.pieces[G8] == Piece::Empty
                && !is_square_attacked(board, E8, Color::Light)
                && !is_square_attacked(board, F8, Color::Light)
                && !is_square_attacked(board, G8, Color::Light)
            {
                add_quiet_move(
                    list,
                    pack_move(E8, G8, Piece::Empty, Piece::Empty, FLAG_CASTLE),
                );
            }
            if board.castle_perm & CASTLE_DARK_QUEENSIDE != 0
                && board.pieces[D8] == Piece::Empty
                && board.pieces[C8] == Piece::Empty
                && board.pieces[B8] == Piece::Empty
                && !is_square_attacked(board, E8, Color::Light)
                && !is_square_attacked(board, D8, Color::Light)
                && !is_square_attacked(board, C8, Color::Light)
            {
                add_quiet_move(
                    list,
                    pack_move(E8, C8, Piece::Empty, Piece::Empty, FLAG_CASTLE),
                );
            }
        }
    }
}

fn slider_directions(piece: Piece) -> &'static [isize] {
    match piece {
        Piece::LightBishop | Piece::DarkBishop => &BISHOP_DIRECTIONS,
        Piece::LightRook | Piece::DarkRook => &ROOK_DIRECTIONS,
        _ => &KING_DIRECTIONS,
    }
}

fn generate_slider_moves(board: &BoardState, list: &mut MoveList, captures_only: bool) {
    let side = board.side;
    let enemy = side.opposite();

    for piece in [
        Piece::bishop_of(side),
        Piece::rook_of(side),
        Piece::queen_of(side),
    ] {
        let directions = slider_directions(piece);
        for slot in 0..board.piece_count[piece.index()] {
            let sq = board.piece_list[piece.index()][slot];
            debug_assert!(board.pieces[sq] == piece);

            for &dir in directions {
                let mut target = shifted(sq, dir);
                loop {
                    let target_piece = board.pieces[target];
                    if target_piece == Piece::Offboard {
                        break;
                    }
                    if target_piece != Piece::Empty {
                        if target_piece.color() == Some(enemy) {
                            add_capture_move(
                                board,
                                list,
                                pack_move(sq, target, target_piece, Piece::Empty, 0),
                            );
                        }
                        break;
                    }
                    if !captures_only {
                        add_quiet_move(
                            list,
                            pack_move(sq, target, Piece::Empty, Piece::Empty, 0),
                        );
                    }
                    target = shifted(target, dir);
                }
            }
        }
    }
}

fn generate_offset_moves(board: &BoardState, list: &mut MoveList, captures_only: bool) {
    let side = board.side;
    let enemy = side.opposite();

    for (piece, directions) in [
        (Piece::knight_of(side), &KNIGHT_DIRECTIONS),
        (Piece::king_of(side), &KING_DIRECTIONS),
    ] {
        for slot in 0..board.piece_count[piece.index()] {
            let sq = board.piece_list[piece.index()][slot];
            debug_assert!(board.pieces[sq] == piece);

            for &dir in directions {
                let target = shifted(sq, dir);
                let target_piece = board.pieces[target];
                if target_piece == Piece::Offboard {
                    continue;
                }
                if target_piece != Piece::Empty {
                    if target_piece.color() == Some(enemy) {
                        add_capture_move(
                            board,
                            list,
                            pack_move(sq, target, target_piece, Piece::Empty, 0),
                        );
                    }
                    continue;
                }
                if !captures_only {
                    add_quiet_move(list, pack_move(sq, target, Piece::Empty, Piece::Empty, 0));
                }
            }
        }
    }
}

/// Fill `list` with every pseudo-legal move for the side to move.
pub fn generate_all_moves(board: &BoardState, list: &mut MoveList) {
    list.clear();
    generate_pawn_moves(board, list, false);
    generate_castling_moves(board, list);
    generate_slider_moves(board, list, false);
    generate_offset_moves(board, list, false);
}

/// Fill `list` with pseudo-legal captures only (including en passant), used
/// by the quiescence extension.
pub fn generate_capture_moves(board: &BoardState, list: &mut MoveList) {
    list.clear();
    generate_pawn_moves(board, list, true);
    generate_slider_moves(board, list, true);
    generate_offset_moves(board, list, true);
}

/// True when `mv` is generatable and legal in the current position. Guards
/// best-line probes against hash collisions.
pub fn move_exists(board: &mut BoardState, mv: Move) -> bool {
    let mut list = MoveList::new();
    generate_all_moves(board, &mut list);

    for index in 0..list.count {
        if list.moves[index].mv != mv {
            continue;
        }
        if make_move(board, mv) {
            take_move(board);
            return true;
        }
        return false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::move_description::{is_capture, move_to, promoted_piece};

    fn legal_move_count(fen: &str) -> usize {
        let mut board = BoardState::from_fen(fen).expect("FEN should parse");
        let mut list = MoveList::new();
        generate_all_moves(&board, &mut list);

        let mut legal = 0;
        for index in 0..list.count {
            if make_move(&mut board, list.moves[index].mv) {
                legal += 1;
                take_move(&mut board);
            }
        }
        legal
    }

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        assert_eq!(
            legal_move_count(crate::board::board_rules::STARTING_POSITION_FEN),
            20
        );
    }

    #[test]
    fn complex_middlegame_move_count() {
        assert_eq!(
            legal_move_count("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            48
        );
    }

    #[test]
    fn promotion_moves_expand_to_four_pieces() {
        let board = BoardState::from_fen("8/P6k/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut list = MoveList::new();
        generate_all_moves(&board, &mut list);

        let promotions = list
            .iter()
            .filter(|entry| promoted_piece(entry.mv) != Piece::Empty)
            .count();
        assert_eq!(promotions, 4);
    }

    #[test]
    fn castling_requires_empty_and_unattacked_squares() {
        let open = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let mut list = MoveList::new();
        generate_all_moves(&open, &mut list);
        let castles = list
            .iter()
            .filter(|entry| entry.mv & FLAG_CASTLE != 0)
            .count();
        assert_eq!(castles, 2);

        // A rook eyeing f1 forbids kingside castling but not queenside.
        let guarded = BoardState::from_fen("r4k2/8/8/8/8/8/5r2/R3K2R w KQ - 0 1")
            .expect("FEN should parse");
        generate_all_moves(&guarded, &mut list);
        let castle_targets: Vec<_> = list
            .iter()
            .filter(|entry| entry.mv & FLAG_CASTLE != 0)
            .map(|entry| move_to(entry.mv))
            .collect();
        assert_eq!(castle_targets, vec![C1]);
    }

    #[test]
    fn capture_generation_is_a_subset_of_all_moves() {
        let board = BoardState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");

        let mut all = MoveList::new();
        generate_all_moves(&board, &mut all);
        let mut caps = MoveList::new();
        generate_capture_moves(&board, &mut caps);

        assert!(caps.count > 0);
        for entry in caps.iter() {
            assert!(is_capture(entry.mv));
            assert!(all.iter().any(|other| other.mv == entry.mv));
        }
        let all_captures = all.iter().filter(|entry| is_capture(entry.mv)).count();
        assert_eq!(all_captures, caps.count);
    }

    #[test]
    fn en_passant_is_generated_against_active_target_only() {
        let with_target =
            BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let mut list = MoveList::new();
        generate_all_moves(&with_target, &mut list);
        assert!(list.iter().any(|entry| entry.mv & FLAG_EN_PASSANT != 0));

        let without_target =
            BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        generate_all_moves(&without_target, &mut list);
        assert!(!list.iter().any(|entry| entry.mv & FLAG_EN_PASSANT != 0));
    }

    #[test]
    fn move_exists_accepts_generated_and_rejects_foreign_moves() {
        let mut board = BoardState::new_game();
        let mut list = MoveList::new();
        generate_all_moves(&board, &mut list);
        let first = list.moves[0].mv;
        assert!(move_exists(&mut board, first));

        let bogus = pack_move(E1, E8, Piece::Empty, Piece::Empty, 0);
        assert!(!move_exists(&mut board, bogus));
    }
}
