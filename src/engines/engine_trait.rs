//! Engine abstraction layer for protocol front-ends.
//!
//! Defines common input parameters and output payloads so different engine
//! strategies can be selected at runtime behind a single trait interface.
//! Front-ends own the command loop and pass raw go parameters through.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::board::board_state::BoardState;
use crate::moves::move_description::Move;

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<usize>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn choose_move(
        &mut self,
        board: &BoardState,
        params: &GoParams,
    ) -> Result<EngineOutput, String>;
}
