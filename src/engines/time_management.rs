//! Reusable time-management strategies for engine move budgeting.
//!
//! Front-ends pass raw clock data (`wtime/btime/winc/binc/movetime`) and
//! the engine decides the final per-move allocation based on strategy.

use crate::board::board_state::BoardState;
use crate::board::board_types::Color;
use crate::engines::engine_trait::GoParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeManagementStrategy {
    /// Fixed rule: spend 1/20th of the remaining clock.
    Fraction20,
    /// Adaptive rule using clock, increment, and game phase.
    Adaptive,
}

/// Resolve `movetime_ms` from clocks when the caller did not fix it.
pub fn resolve_go_params(
    board: &BoardState,
    params: &GoParams,
    strategy: TimeManagementStrategy,
) -> GoParams {
    if params.movetime_ms.is_some() {
        return params.clone();
    }

    let mut resolved = params.clone();
    let (remaining_opt, inc_opt) = match board.side {
        Color::Light => (params.wtime_ms, params.winc_ms),
        Color::Dark => (params.btime_ms, params.binc_ms),
    };

    if let Some(remaining) = remaining_opt {
        resolved.movetime_ms = Some(match strategy {
            TimeManagementStrategy::Fraction20 => (remaining / 20).max(1),
            TimeManagementStrategy::Adaptive => {
                adaptive_budget_ms(board, remaining, inc_opt, params.movestogo)
            }
        });
    }

    resolved
}

fn adaptive_budget_ms(
    board: &BoardState,
    remaining_ms: u64,
    inc_ms: Option<u64>,
    movestogo: Option<u16>,
) -> u64 {
    let his_ply = board.his_ply as u64;
    let expected_moves_left = if let Some(mtg) = movestogo {
        u64::from(mtg.max(1))
    } else if his_ply < 20 {
        40
    } else if his_ply < 60 {
        28
    } else {
        18
    };

    let reserve = (remaining_ms / 25)
        .max(100)
        .min(remaining_ms.saturating_sub(1).max(1));
    let usable = remaining_ms.saturating_sub(reserve);
    let base = usable / expected_moves_left.max(1);
    let inc_bonus = inc_ms.unwrap_or(0).saturating_mul(3) / 4;
    let panic = if remaining_ms < 2_000 {
        remaining_ms / 12
    } else {
        0
    };
    let target = base.saturating_add(inc_bonus).saturating_add(panic);

    let min_budget = if remaining_ms < 1_000 { 5 } else { 15 };
    let max_budget = (remaining_ms / 4).max(1);
    target.clamp(min_budget, max_budget).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_movetime_passes_through_untouched() {
        let board = BoardState::new_game();
        let params = GoParams {
            movetime_ms: Some(1234),
            wtime_ms: Some(60_000),
            ..GoParams::default()
        };
        let resolved = resolve_go_params(&board, &params, TimeManagementStrategy::Adaptive);
        assert_eq!(resolved.movetime_ms, Some(1234));
    }

    #[test]
    fn fraction_strategy_uses_the_side_to_move_clock() {
        let mut board = BoardState::new_game();
        let params = GoParams {
            wtime_ms: Some(60_000),
            btime_ms: Some(20_000),
            ..GoParams::default()
        };

        let white = resolve_go_params(&board, &params, TimeManagementStrategy::Fraction20);
        assert_eq!(white.movetime_ms, Some(3_000));

        board.side = Color::Dark;
        let black = resolve_go_params(&board, &params, TimeManagementStrategy::Fraction20);
        assert_eq!(black.movetime_ms, Some(1_000));
    }

    #[test]
    fn adaptive_budget_never_exceeds_a_quarter_of_the_clock() {
        let board = BoardState::new_game();
        for remaining in [300u64, 1_500, 10_000, 120_000] {
            let params = GoParams {
                wtime_ms: Some(remaining),
                winc_ms: Some(2_000),
                ..GoParams::default()
            };
            let resolved = resolve_go_params(&board, &params, TimeManagementStrategy::Adaptive);
            let budget = resolved.movetime_ms.expect("budget should be set");
            assert!(budget >= 1);
            assert!(budget <= (remaining / 4).max(1));
        }
    }

    #[test]
    fn no_clock_means_no_budget() {
        let board = BoardState::new_game();
        let resolved =
            resolve_go_params(&board, &GoParams::default(), TimeManagementStrategy::Adaptive);
        assert_eq!(resolved.movetime_ms, None);
    }
}
