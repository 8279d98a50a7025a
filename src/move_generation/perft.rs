//! Perft: exhaustive generate/apply/undo leaf counting.
//!
//! Validates the move generator and the legality filter together, since a
//! single wrong count at any depth exposes a generation or make/unmake bug.

use crate::board::board_state::BoardState;
use crate::move_generation::make_move::{make_move, take_move};
use crate::move_generation::move_generator::generate_all_moves;
use crate::moves::move_description::Move;
use crate::moves::move_list::MoveList;

/// Count legal leaf nodes at `depth` half-moves below the position.
pub fn perft(board: &mut BoardState, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_all_moves(board, &mut list);

    let mut nodes = 0u64;
    for index in 0..list.count {
        if !make_move(board, list.moves[index].mv) {
            continue;
        }
        nodes += perft(board, depth - 1);
        take_move(board);
    }

    nodes
}

/// Per-root-move breakdown of the leaf count, for narrowing down a
/// divergence against known totals.
pub fn perft_divide(board: &mut BoardState, depth: usize) -> Vec<(Move, u64)> {
    let mut list = MoveList::new();
    generate_all_moves(board, &mut list);

    let mut breakdown = Vec::new();
    for index in 0..list.count {
        let mv = list.moves[index].mv;
        if !make_move(board, mv) {
            continue;
        }
        let nodes = if depth > 0 { perft(board, depth - 1) } else { 1 };
        take_move(board);
        breakdown.push((mv, nodes));
    }

    breakdown
}
