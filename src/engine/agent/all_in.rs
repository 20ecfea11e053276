use super::{Agent, BetView, GameSetup, HoleCards, RoundSummary, SeatState};

/// An agent that shoves everything on its first decision. It bets
/// `i64::MAX` and relies on the engine clamping any bet above the stack
/// to an all-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllInAgent {}

impl Agent for AllInAgent {
    fn init(&mut self, _setup: &GameSetup) {}

    fn start_round(&mut self, _players: &[SeatState], _hand: HoleCards) {}

    fn place_bet(&mut self, _view: &BetView<'_>) -> i64 {
        i64::MAX
    }

    fn end_round(&mut self, _summary: &RoundSummary) {}
}
