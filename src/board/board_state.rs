//! Core incremental board state representation.
//!
//! `BoardState` is the central model for the engine: the mailbox square
//! array, per-code piece lists, pawn bitboards, king caches, rights and
//! clocks, the incremental Zobrist key, and the bounded undo history that
//! backs make/unmake workflows. All mutation goes through the move
//! application layer; nothing here is global or shared.

use crate::board::board_rules::STARTING_POSITION_FEN;
use crate::board::board_types::*;
use crate::board::undo_state::UndoState;
use crate::search::zobrist;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Exclusively-owned mutable position, optimized for fast make/unmake.
#[derive(Debug, Clone)]
pub struct BoardState {
    /// Mailbox cells: playable squares hold `Empty` or a piece, the border
    /// holds `Offboard`.
    pub pieces: [Piece; BOARD_SQUARE_COUNT],

    /// Pawn occupancy bitboards over dense 0..64 squares: light, dark, both.
    pub pawns: [u64; 3],

    /// Cached king squares per color for O(1) check tests.
    pub king_sq: [Square; 2],

    pub side: Color,
    pub en_passant: Option<Square>,

    /// Fifty-move-rule half-move clock.
    pub fifty_move: u32,

    /// Ply depth within the current search.
    pub ply: usize,

    /// Total half-moves applied to this position instance.
    pub his_ply: usize,

    pub castle_perm: CastlingRights,

    /// Incrementally maintained Zobrist key.
    pub pos_key: u64,

    /// Piece counts and square lists indexed by piece code.
    pub piece_count: [usize; PIECE_CODE_COUNT],
    pub piece_list: [[Square; MAX_PIECES_PER_CODE]; PIECE_CODE_COUNT],

    /// Non-pawn, rook/queen/king, and knight/bishop counters per color.
    pub big_piece_count: [usize; 2],
    pub major_piece_count: [usize; 2],
    pub minor_piece_count: [usize; 2],

    /// Incremental material totals per color, in centipawns.
    pub material: [i32; 2],

    /// Bounded undo arena indexed by `his_ply`.
    pub history: Box<[UndoState; MAX_GAME_MOVES]>,
}

impl BoardState {
    pub fn new_empty() -> Self {
        let mut board = Self {
            pieces: [Piece::Offboard; BOARD_SQUARE_COUNT],
            pawns: [0; 3],
            king_sq: [NO_SQUARE; 2],
            side: Color::Light,
            en_passant: None,
            fifty_move: 0,
            ply: 0,
            his_ply: 0,
            castle_perm: 0,
            pos_key: 0,
            piece_count: [0; PIECE_CODE_COUNT],
            piece_list: [[NO_SQUARE; MAX_PIECES_PER_CODE]; PIECE_CODE_COUNT],
            big_piece_count: [0; 2],
            major_piece_count: [0; 2],
            minor_piece_count: [0; 2],
            material: [0; 2],
            history: Box::new([UndoState::default(); MAX_GAME_MOVES]),
        };
        board.reset_board();
        board
    }

    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn fen(&self) -> String {
        generate_fen(self)
    }

    /// Clear every derived field back to the empty-board baseline.
    pub fn reset_board(&mut self) {
        for cell in self.pieces.iter_mut() {
            *cell = Piece::Offboard;
        }
        for sq64 in 0..PLAYABLE_SQUARE_COUNT {
            self.pieces[SQ64_TO_SQ120[sq64]] = Piece::Empty;
        }

        self.pawns = [0; 3];
        self.king_sq = [NO_SQUARE; 2];
        self.side = Color::Light;
        self.en_passant = None;
        self.fifty_move = 0;
        self.ply = 0;
        self.his_ply = 0;
        self.castle_perm = 0;
        self.pos_key = 0;
        self.piece_count = [0; PIECE_CODE_COUNT];
        self.piece_list = [[NO_SQUARE; MAX_PIECES_PER_CODE]; PIECE_CODE_COUNT];
        self.big_piece_count = [0; 2];
        self.major_piece_count = [0; 2];
        self.minor_piece_count = [0; 2];
        self.material = [0; 2];
    }

    /// Rebuild lists, counters, bitboards, and king caches from the mailbox
    /// cells. Used by the position-record reset path after placement.
    pub fn update_lists_material(&mut self) {
        self.piece_count = [0; PIECE_CODE_COUNT];
        self.piece_list = [[NO_SQUARE; MAX_PIECES_PER_CODE]; PIECE_CODE_COUNT];
        self.big_piece_count = [0; 2];
        self.major_piece_count = [0; 2];
        self.minor_piece_count = [0; 2];
        self.material = [0; 2];
        self.pawns = [0; 3];

        for sq64 in 0..PLAYABLE_SQUARE_COUNT {
            let sq = SQ64_TO_SQ120[sq64];
            let piece = self.pieces[sq];
            let Some(color) = piece.color() else {
                continue;
            };
            let color_idx = color.index();

            if piece.is_big() {
                self.big_piece_count[color_idx] += 1;
                if piece.is_major() {
                    self.major_piece_count[color_idx] += 1;
                } else {
                    self.minor_piece_count[color_idx] += 1;
                }
            } else {
                self.pawns[color_idx] |= 1u64 << sq64;
                self.pawns[BOTH_SIDES] |= 1u64 << sq64;
            }

            self.material[color_idx] += piece.value();

            let code = piece.index();
            self.piece_list[code][self.piece_count[code]] = sq;
            self.piece_count[code] += 1;

            if piece.is_king() {
                self.king_sq[color_idx] = sq;
            }
        }
    }

    /// True when the side to move's king is attacked.
    #[inline]
    pub fn in_check(&self) -> bool {
        crate::board::attacks::is_square_attacked(
            self,
            self.king_sq[self.side.index()],
            self.side.opposite(),
        )
    }

    /// True when the current key already occurred since the last
    /// irreversible move (pawn push or capture).
    pub fn is_repetition(&self) -> bool {
        let start = self.his_ply.saturating_sub(self.fifty_move as usize);
        for i in start..self.his_ply {
            if self.history[i].pos_key == self.pos_key {
                return true;
            }
        }
        false
    }

    /// Full structural audit of the incremental fields against the mailbox
    /// cells. Any mismatch means the state is no longer trustworthy; callers
    /// use this behind `debug_assert!`.
    pub fn is_consistent(&self) -> bool {
        let mut piece_count = [0usize; PIECE_CODE_COUNT];
        let mut big = [0usize; 2];
        let mut major = [0usize; 2];
        let mut minor = [0usize; 2];
        let mut material = [0i32; 2];
        let mut pawns = [0u64; 3];

        // Every listed square must hold exactly the listed piece.
        for code in 1..PIECE_CODE_COUNT {
            let piece = match Piece::from_index(code) {
                Some(piece) => piece,
                None => return false,
            };
            for slot in 0..self.piece_count[code] {
                let sq = self.piece_list[code][slot];
                if self.pieces[sq] != piece {
                    return false;
                }
            }
        }

        for sq64 in 0..PLAYABLE_SQUARE_COUNT {
            let sq = SQ64_TO_SQ120[sq64];
            let piece = self.pieces[sq];
            if piece == Piece::Offboard {
                return false;
            }
            let Some(color) = piece.color() else {
                continue;
            };
            let color_idx = color.index();
            piece_count[piece.index()] += 1;
            material[color_idx] += piece.value();
            if piece.is_big() {
                big[color_idx] += 1;
                if piece.is_major() {
                    major[color_idx] += 1;
                } else {
                    minor[color_idx] += 1;
                }
            } else {
                pawns[color_idx] |= 1u64 << sq64;
                pawns[BOTH_SIDES] |= 1u64 << sq64;
            }
            if piece.is_king() && self.king_sq[color_idx] != sq {
                return false;
            }
        }

        piece_count == self.piece_count
            && big == self.big_piece_count
            && major == self.major_piece_count
            && minor == self.minor_piece_count
            && material == self.material
            && pawns == self.pawns
            && self.fifty_move as usize <= MAX_GAME_MOVES
            && self.pos_key == zobrist::compute_pos_key(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_populates_all_derived_state() {
        let board = BoardState::new_game();

        assert_eq!(board.side, Color::Light);
        assert_eq!(board.castle_perm, 0b1111);
        assert_eq!(board.en_passant, None);
        assert_eq!(board.piece_count[Piece::LightPawn.index()], 8);
        assert_eq!(board.piece_count[Piece::DarkKnight.index()], 2);
        assert_eq!(board.king_sq[Color::Light.index()], E1);
        assert_eq!(board.king_sq[Color::Dark.index()], E8);
        assert_eq!(board.material[0], board.material[1]);
        assert_eq!(board.pawns[BOTH_SIDES].count_ones(), 16);
        assert!(board.is_consistent());
    }

    #[test]
    fn reset_board_clears_playable_cells_only() {
        let mut board = BoardState::new_game();
        board.reset_board();

        assert_eq!(board.pieces[E1], Piece::Empty);
        assert_eq!(board.pieces[0], Piece::Offboard);
        assert_eq!(board.pieces[NO_SQUARE], Piece::Offboard);
        assert_eq!(board.piece_count, [0; PIECE_CODE_COUNT]);
        assert_eq!(board.pos_key, 0);
    }

    #[test]
    fn repetition_scan_respects_fifty_move_window() {
        let mut board = BoardState::new_game();
        board.history[0].pos_key = board.pos_key;
        board.his_ply = 1;
        board.fifty_move = 1;
        assert!(board.is_repetition());

        // A reset clock hides the earlier occurrence.
        board.fifty_move = 0;
        assert!(!board.is_repetition());
    }
}
