//! FEN-to-BoardState parser: the position-record reset path.
//!
//! Builds a fully populated incremental position from a Forsyth-Edwards
//! Notation string: mailbox cells, piece lists and counters, pawn
//! bitboards, king caches, rights, clocks, and the Zobrist key.

use crate::board::board_state::BoardState;
use crate::board::board_types::*;
use crate::search::zobrist::compute_pos_key;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<BoardState, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut board = BoardState::new_empty();

    parse_placement(board_part, &mut board)?;
    board.side = parse_side_to_move(side_part)?;
    board.castle_perm = sanitize_castling_rights(&board, parse_castling_rights(castling_part)?);
    board.en_passant = parse_en_passant_square(en_passant_part)?;
    board.fifty_move = halfmove_part
        .parse::<u32>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    if board.fifty_move as usize > MAX_GAME_MOVES {
        return Err(format!("Halfmove clock out of range: {halfmove_part}"));
    }
    fullmove_part
        .parse::<u32>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;

    board.update_lists_material();
    board.pos_key = compute_pos_key(&board);

    Ok(board)
}

fn parse_placement(board_part: &str, board: &mut BoardState) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_index, rank_str) in ranks.iter().enumerate() {
        let rank = RANK_8 - fen_rank_index;
        let mut file = FILE_A;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                let step = empty_count as usize;
                if !(1..=8).contains(&step) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                file += step;
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if file > FILE_H {
                return Err("Board rank has too many files".to_owned());
            }
            board.pieces[file_rank_to_square(file, rank)] = piece;
            file += 1;
        }

        if file != FILE_H + 1 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }
    Ok(rights)
}

/// Drop any right whose king or rook is no longer on its home square, so
/// move generation can trust the rights bits against the placement.
fn sanitize_castling_rights(board: &BoardState, mut rights: CastlingRights) -> CastlingRights {
    if board.pieces[E1] != Piece::LightKing {
        rights &= !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE);
    }
    if board.pieces[H1] != Piece::LightRook {
        rights &= !CASTLE_LIGHT_KINGSIDE;
    }
    if board.pieces[A1] != Piece::LightRook {
        rights &= !CASTLE_LIGHT_QUEENSIDE;
    }
    if board.pieces[E8] != Piece::DarkKing {
        rights &= !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
    }
    if board.pieces[H8] != Piece::DarkRook {
        rights &= !CASTLE_DARK_KINGSIDE;
    }
    if board.pieces[A8] != Piece::DarkRook {
        rights &= !CASTLE_DARK_QUEENSIDE;
    }
    rights
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    Ok(Some(algebraic_to_square(en_passant_part)?))
}
