//! Search-backed engine facade.
//!
//! Wires go-parameter resolution, the optional opening-book probe, and the
//! iterative-deepening search into the common `Engine` interface. The book
//! is consulted before any search runs; when it supplies a playable move
//! the search is skipped entirely for that turn.

use crate::board::board_state::BoardState;
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::engines::time_management::{resolve_go_params, TimeManagementStrategy};
use crate::move_generation::move_generator::move_exists;
use crate::moves::move_description::Move;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::pv_table::PvTable;
use crate::search::search_engine::{
    iterative_deepening_search_with_pv_table, SearchConfig, SearchResult,
};
use crate::utils::long_algebraic::move_to_long_algebraic;

/// External opening knowledge, probed by position.
pub trait OpeningBook: Send {
    fn probe(&self, board: &BoardState) -> Option<Move>;
}

/// Book that never has a move; keeps the probe path exercised without any
/// external data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOpeningBook;

impl OpeningBook for NullOpeningBook {
    fn probe(&self, _board: &BoardState) -> Option<Move> {
        None
    }
}

pub struct IterativeEngine<S: BoardScorer> {
    scorer: S,
    max_depth: usize,
    time_strategy: TimeManagementStrategy,
    book: Option<Box<dyn OpeningBook>>,
    pv_table: PvTable,
}

impl Default for IterativeEngine<MaterialScorer> {
    fn default() -> Self {
        Self::new(MaterialScorer)
    }
}

impl<S: BoardScorer> IterativeEngine<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            max_depth: SearchConfig::default().max_depth,
            time_strategy: TimeManagementStrategy::Adaptive,
            book: None,
            pv_table: PvTable::new_default(),
        }
    }

    pub fn with_book(mut self, book: Box<dyn OpeningBook>) -> Self {
        self.book = Some(book);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn search(&mut self, board: &BoardState, params: &GoParams) -> SearchResult {
        let config = SearchConfig {
            max_depth: params.depth.unwrap_or(self.max_depth),
            movetime_ms: params.movetime_ms,
            stop_flag: params.stop_flag.clone(),
            ..SearchConfig::default()
        };
        let mut search_board = board.clone();
        iterative_deepening_search_with_pv_table(
            &mut search_board,
            &self.scorer,
            &config,
            &mut self.pv_table,
        )
    }
}

impl<S: BoardScorer> Engine for IterativeEngine<S> {
    fn name(&self) -> &str {
        "Ivory Iterative"
    }

    fn new_game(&mut self) {
        self.pv_table.clear();
    }

    fn choose_move(
        &mut self,
        board: &BoardState,
        params: &GoParams,
    ) -> Result<EngineOutput, String> {
        let mut out = EngineOutput::default();

        if let Some(book) = &self.book {
            if let Some(book_move) = book.probe(board) {
                let mut probe_board = board.clone();
                if move_exists(&mut probe_board, book_move) {
                    out.info_lines.push(format!(
                        "info string book move {}",
                        move_to_long_algebraic(book_move)?
                    ));
                    out.best_move = Some(book_move);
                    return Ok(out);
                }
                out.info_lines
                    .push("info string book move rejected as unplayable".to_owned());
            }
        }

        let resolved = resolve_go_params(board, params, self.time_strategy);
        let result = self.search(board, &resolved);

        let mut pv_text = String::new();
        for mv in &result.pv {
            if !pv_text.is_empty() {
                pv_text.push(' ');
            }
            pv_text.push_str(&move_to_long_algebraic(*mv)?);
        }
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {} pv {}",
            result.reached_depth, result.best_score, result.nodes, result.elapsed_ms, pv_text
        ));

        if result.cutoffs > 0 {
            let ordering = result.first_move_cutoffs as f64 / result.cutoffs as f64 * 100.0;
            out.info_lines
                .push(format!("info string move ordering {ordering:.1}%"));
        }

        out.best_move = result.best_move;
        Ok(out)
    }
}
