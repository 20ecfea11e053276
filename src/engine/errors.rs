use thiserror::Error;

/// Fatal engine failures. Either variant indicates a defect in the
/// engine itself, never bad agent input: agent misbehavior is always
/// normalized into a fold or a clamped bet instead of an error.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EngineError {
    #[error("deck exhausted: requested {requested} cards with {remaining} remaining")]
    ExhaustedDeck { requested: usize, remaining: usize },

    #[error("money conservation violated: {chips_before} chips entered the round, {chips_after} left it")]
    MoneyImbalance { chips_before: u64, chips_after: u64 },

    #[error("pot of {amount} chips has no player left to claim it")]
    UnclaimedPot { amount: u64 },
}
