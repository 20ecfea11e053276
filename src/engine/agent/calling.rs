use super::{Agent, BetView, GameSetup, HoleCards, RoundSummary, SeatState};

/// An agent that always matches the current bet.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingAgent {}

impl Agent for CallingAgent {
    fn init(&mut self, _setup: &GameSetup) {}

    fn start_round(&mut self, _players: &[SeatState], _hand: HoleCards) {}

    fn place_bet(&mut self, view: &BetView<'_>) -> i64 {
        view.current_bet as i64
    }

    fn end_round(&mut self, _summary: &RoundSummary) {}
}
