//! Pluggable position scoring interface.
//!
//! The search delegates every static evaluation to this trait so scoring
//! heuristics can be swapped without touching search code. Scores are
//! centipawns from the side-to-move's perspective and must not mutate the
//! position.

use crate::board::board_state::BoardState;
use crate::board::board_types::Color;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, board: &BoardState) -> i32;
}

/// Baseline scorer over the incrementally maintained material totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &BoardState) -> i32 {
        let light_minus_dark =
            board.material[Color::Light.index()] - board.material[Color::Dark.index()];
        match board.side {
            Color::Light => light_minus_dark,
            Color::Dark => -light_minus_dark,
        }
    }
}
