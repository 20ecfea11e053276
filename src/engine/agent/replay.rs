use std::collections::VecDeque;

use super::{Agent, BetView, GameSetup, HoleCards, RoundSummary, SeatState, FOLD};

/// An agent that replays a fixed script of bet responses, folding once
/// the script runs out. Scenario tests use it to drive the engine along
/// an exact betting line.
#[derive(Debug, Clone)]
pub struct VecReplayAgent {
    bets: VecDeque<i64>,
    /// Returned when the script is exhausted.
    default: i64,
}

impl VecReplayAgent {
    pub fn new(bets: Vec<i64>) -> Self {
        VecReplayAgent {
            bets: VecDeque::from(bets),
            default: FOLD,
        }
    }

    /// Replace the exhausted-script response (default: fold).
    pub fn with_default(mut self, default: i64) -> Self {
        self.default = default;
        self
    }
}

impl Agent for VecReplayAgent {
    fn init(&mut self, _setup: &GameSetup) {}

    fn start_round(&mut self, _players: &[SeatState], _hand: HoleCards) {}

    fn place_bet(&mut self, _view: &BetView<'_>) -> i64 {
        self.bets.pop_front().unwrap_or(self.default)
    }

    fn end_round(&mut self, _summary: &RoundSummary) {}
}
