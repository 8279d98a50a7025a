//! Baseline random-move engine.
//!
//! Selects uniformly from legal moves; used for diagnostics, integration
//! testing, and as the weakest rung of the strength ladder.

use rand::prelude::IndexedRandom;

use crate::board::board_state::BoardState;
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::move_generation::make_move::{make_move, take_move};
use crate::move_generation::move_generator::generate_all_moves;
use crate::moves::move_description::Move;
use crate::moves::move_list::MoveList;

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub fn new() -> Self {
        Self
    }
}

fn collect_legal_moves(board: &BoardState) -> Vec<Move> {
    let mut work_board = board.clone();
    let mut list = MoveList::new();
    generate_all_moves(&work_board, &mut list);

    let mut legal = Vec::with_capacity(list.count);
    for index in 0..list.count {
        let mv = list.moves[index].mv;
        if make_move(&mut work_board, mv) {
            take_move(&mut work_board);
            legal.push(mv);
        }
    }
    legal
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Ivory Random"
    }

    fn choose_move(
        &mut self,
        board: &BoardState,
        _params: &GoParams,
    ) -> Result<EngineOutput, String> {
        let legal_moves = collect_legal_moves(board);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        if legal_moves.is_empty() {
            out.best_move = None;
            return Ok(out);
        }

        let mut rng = rand::rng();
        let picked = legal_moves
            .as_slice()
            .choose(&mut rng)
            .ok_or("failed to choose a random move")?;

        out.best_move = Some(*picked);
        Ok(out)
    }
}
