//! Iterative-deepening negamax alpha-beta search with quiescence.
//!
//! The driver runs depth 1..=max_depth, each depth re-searching the root
//! with a full window. Move ordering combines the best-line store's
//! remembered move, MVV-LVA capture scores, two killer moves per ply, and
//! a (piece, destination) history table for quiets. A non-blocking
//! deadline/stop check runs every 2048 visited nodes; once it trips, every
//! active frame unwinds with a neutral value and the driver keeps the last
//! fully completed depth's result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::board_rules::FIFTY_MOVE_RULE_PLIES;
use crate::board::board_state::BoardState;
use crate::board::board_types::{BOARD_SQUARE_COUNT, PIECE_CODE_COUNT};
use crate::move_generation::make_move::{make_move, take_move};
use crate::move_generation::move_generator::{generate_all_moves, generate_capture_moves};
use crate::moves::move_description::{is_capture, move_from, move_to, Move, MOVE_NONE};
use crate::moves::move_list::MoveList;
use crate::search::board_scoring::BoardScorer;
use crate::search::pv_table::{pv_line, PvTable};

/// Hard recursion ceiling in plies, quiescence included.
pub const MAX_DEPTH: usize = 64;

/// Score window bound; no real score reaches it.
pub const INFINITY_SCORE: i32 = 30_000;

/// Base magnitude of checkmate scores; adjusted by ply so shorter mates
/// score better.
pub const MATE_SCORE: i32 = 29_000;

/// Node-count mask between deadline/stop polls.
const NODE_POLL_MASK: u64 = 2047;

// Move-ordering priority bands.
const BEST_LINE_MOVE_SCORE: i32 = 2_000_000;
const CAPTURE_SCORE_BASE: i32 = 1_000_000;
const FIRST_KILLER_SCORE: i32 = 900_000;
const SECOND_KILLER_SCORE: i32 = 800_000;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub movetime_ms: Option<u64>,
    pub stop_flag: Option<Arc<AtomicBool>>,
    /// Memory budget for the best-line store.
    pub pv_table_mb: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            movetime_ms: None,
            stop_flag: None,
            pv_table_mb: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    /// Deepest fully completed iteration.
    pub reached_depth: usize,
    pub nodes: u64,
    /// Beta cutoffs, and cutoffs produced by the first move searched.
    pub cutoffs: u64,
    pub first_move_cutoffs: u64,
    pub stopped: bool,
    pub pv: Vec<Move>,
    pub elapsed_ms: u64,
}

/// Per-search mutable state: heuristic tables, counters, and the
/// cancellation sources.
struct SearchContext<'a> {
    pv_table: &'a mut PvTable,
    killers: [[Move; MAX_DEPTH]; 2],
    history: [[u32; BOARD_SQUARE_COUNT]; PIECE_CODE_COUNT],
    nodes: u64,
    cutoffs: u64,
    first_move_cutoffs: u64,
    stopped: bool,
    deadline: Option<Instant>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl<'a> SearchContext<'a> {
    fn new(
        pv_table: &'a mut PvTable,
        deadline: Option<Instant>,
        stop_flag: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            pv_table,
            killers: [[MOVE_NONE; MAX_DEPTH]; 2],
            history: [[0; BOARD_SQUARE_COUNT]; PIECE_CODE_COUNT],
            nodes: 0,
            cutoffs: 0,
            first_move_cutoffs: 0,
            stopped: false,
            deadline,
            stop_flag,
        }
    }

    /// Non-blocking deadline/stop poll; only sets a flag, never yields.
    #[inline]
    fn check_up(&mut self) {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stopped = true;
            }
        }
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                self.stopped = true;
            }
        }
    }
}

/// Apply the ordering bands on top of the generation-time capture scores.
fn score_moves(board: &BoardState, list: &mut MoveList, best_line_move: Option<Move>, ctx: &SearchContext) {
    let ply = board.ply.min(MAX_DEPTH - 1);
    for index in 0..list.count {
        let mv = list.moves[index].mv;
        let base = list.moves[index].score;
        list.moves[index].score = if best_line_move == Some(mv) {
            BEST_LINE_MOVE_SCORE
        } else if is_capture(mv) {
            CAPTURE_SCORE_BASE + base
        } else if ctx.killers[0][ply] == mv {
            FIRST_KILLER_SCORE
        } else if ctx.killers[1][ply] == mv {
            SECOND_KILLER_SCORE
        } else {
            ctx.history[board.pieces[move_from(mv)].index()][move_to(mv)] as i32
        };
    }
}

/// Selection step: swap the best-scored remaining move into `move_num`.
fn pick_next_move(list: &mut MoveList, move_num: usize) {
    let mut best_index = move_num;
    let mut best_score = list.moves[move_num].score;

    for index in (move_num + 1)..list.count {
        if list.moves[index].score > best_score {
            best_score = list.moves[index].score;
            best_index = index;
        }
    }

    list.moves.swap(move_num, best_index);
}

fn quiescence<S: BoardScorer>(
    board: &mut BoardState,
    scorer: &S,
    ctx: &mut SearchContext,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if ctx.nodes & NODE_POLL_MASK == 0 {
        ctx.check_up();
    }
    if ctx.stopped {
        return 0;
    }

    ctx.nodes += 1;

    if board.ply > 0 && (board.is_repetition() || board.fifty_move >= FIFTY_MOVE_RULE_PLIES) {
        return 0;
    }
    if board.ply >= MAX_DEPTH - 1 {
        return scorer.score(board);
    }

    // Stand pat: the static score is a lower bound because the side to
    // move may simply decline every capture.
    let stand_pat = scorer.score(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut list = MoveList::new();
    generate_capture_moves(board, &mut list);

    for move_num in 0..list.count {
        pick_next_move(&mut list, move_num);
        let mv = list.moves[move_num].mv;

        if !make_move(board, mv) {
            continue;
        }
        let score = -quiescence(board, scorer, ctx, -beta, -alpha);
        take_move(board);

        if ctx.stopped {
            return 0;
        }

        if score >= beta {
            ctx.cutoffs += 1;
            if move_num == 0 {
                ctx.first_move_cutoffs += 1;
            }
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

fn alpha_beta<S: BoardScorer>(
    board: &mut BoardState,
    scorer: &S,
    ctx: &mut SearchContext,
    mut alpha: i32,
    beta: i32,
    depth: usize,
) -> i32 {
    if ctx.nodes & NODE_POLL_MASK == 0 {
        ctx.check_up();
    }
    if ctx.stopped {
        return 0;
    }

    if depth == 0 {
        return quiescence(board, scorer, ctx, alpha, beta);
    }

    ctx.nodes += 1;

    let ply = board.ply;
    if ply > 0 && (board.is_repetition() || board.fifty_move >= FIFTY_MOVE_RULE_PLIES) {
        return 0;
    }
    if ply >= MAX_DEPTH - 1 {
        return scorer.score(board);
    }

    let mut list = MoveList::new();
    generate_all_moves(board, &mut list);

    let best_line_move = ctx.pv_table.probe(board.pos_key);
    score_moves(board, &mut list, best_line_move, ctx);

    let entry_alpha = alpha;
    let mut best_move = MOVE_NONE;
    let mut legal_moves = 0u32;
    let killer_ply = ply.min(MAX_DEPTH - 1);

    for move_num in 0..list.count {
        pick_next_move(&mut list, move_num);
        let mv = list.moves[move_num].mv;

        if !make_move(board, mv) {
            continue;
        }
        legal_moves += 1;
        let score = -alpha_beta(board, scorer, ctx, -beta, -alpha, depth - 1);
        take_move(board);

        if ctx.stopped {
            return 0;
        }

        if score > alpha {
            if score >= beta {
                ctx.cutoffs += 1;
                if legal_moves == 1 {
                    ctx.first_move_cutoffs += 1;
                }
                if !is_capture(mv) {
                    ctx.killers[1][killer_ply] = ctx.killers[0][killer_ply];
                    ctx.killers[0][killer_ply] = mv;
                }
                return beta;
            }

            alpha = score;
            best_move = mv;
            if !is_capture(mv) {
                let piece = board.pieces[move_from(mv)];
                ctx.history[piece.index()][move_to(mv)] += depth as u32;
            }
        }
    }

    if legal_moves == 0 {
        return if board.in_check() {
            // Deeper mates score closer to zero.
            -MATE_SCORE + ply as i32
        } else {
            0
        };
    }

    if alpha != entry_alpha && best_move != MOVE_NONE {
        ctx.pv_table.store(board.pos_key, best_move);
    }

    alpha
}

/// Run depth 1..=max_depth, keeping the deepest fully completed result.
pub fn iterative_deepening_search<S: BoardScorer>(
    board: &mut BoardState,
    scorer: &S,
    config: &SearchConfig,
) -> SearchResult {
    let mut pv_table = PvTable::new_with_mb(config.pv_table_mb);
    iterative_deepening_search_with_pv_table(board, scorer, config, &mut pv_table)
}

/// Same as [`iterative_deepening_search`], reusing a caller-owned
/// best-line store across calls.
pub fn iterative_deepening_search_with_pv_table<S: BoardScorer>(
    board: &mut BoardState,
    scorer: &S,
    config: &SearchConfig,
    pv_table: &mut PvTable,
) -> SearchResult {
    let started_at = Instant::now();
    let deadline = config
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));

    pv_table.clear();
    board.ply = 0;

    let mut ctx = SearchContext::new(pv_table, deadline, config.stop_flag.clone());
    let mut result = SearchResult {
        best_score: -INFINITY_SCORE,
        ..SearchResult::default()
    };

    let max_depth = config.max_depth.clamp(1, MAX_DEPTH - 1);
    for depth in 1..=max_depth {
        let score = alpha_beta(board, scorer, &mut ctx, -INFINITY_SCORE, INFINITY_SCORE, depth);

        // An interrupted iteration is untrustworthy; keep the previous one.
        if ctx.stopped {
            break;
        }

        let line = pv_line(&*ctx.pv_table, board, depth);
        if let Some(&first) = line.first() {
            result.best_move = Some(first);
            result.pv = line;
        }
        result.best_score = score;
        result.reached_depth = depth;
    }

    result.nodes = ctx.nodes;
    result.cutoffs = ctx.cutoffs;
    result.first_move_cutoffs = ctx.first_move_cutoffs;
    result.stopped = ctx.stopped;
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result
}
