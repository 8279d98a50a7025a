use crate::board::board_types::{CastlingRights, Square};
use crate::moves::move_description::Move;

/// Single history record for `make_move` / `take_move`.
///
/// Holds exactly the state that cannot be re-derived by replaying the move
/// backward; everything else is reversed mechanically.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndoState {
    pub mv: Move,
    pub castle_perm: CastlingRights,
    pub en_passant: Option<Square>,
    pub fifty_move: u32,
    pub pos_key: u64,
}
