use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Agent, BetView, GameSetup, HoleCards, RoundSummary, SeatState, FOLD};

/// An agent that mixes folds, calls and raises at fixed frequencies.
/// Useful for exercising the engine with varied action in tests and
/// simulations; it has no concept of hand strength.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
    big_blind: u64,
    /// Percent chance to fold when facing a bet.
    fold_pct: u8,
    /// Percent chance to raise.
    raise_pct: u8,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
            big_blind: 1,
            fold_pct: 15,
            raise_pct: 15,
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(rand::rng().random())
    }
}

impl Agent for RandomAgent {
    fn init(&mut self, setup: &GameSetup) {
        self.big_blind = setup.big_blind;
    }

    fn start_round(&mut self, _players: &[SeatState], _hand: HoleCards) {}

    fn place_bet(&mut self, view: &BetView<'_>) -> i64 {
        let roll: u8 = self.rng.random_range(0..100);

        if roll < self.fold_pct && view.current_bet > 0 {
            FOLD
        } else if roll >= 100 - self.raise_pct {
            // A raise must at least double the current bet; opening a
            // street starts from the big blind.
            let raise = (view.current_bet * 2).max(self.big_blind);
            raise as i64
        } else {
            view.current_bet as i64
        }
    }

    fn end_round(&mut self, _summary: &RoundSummary) {}
}
