//! The agent contract and a few baseline agents.
//!
//! `Agent`s are the pluggable players in a tournament. The engine treats
//! their decisions as opaque integers and owns all legality: whatever an
//! agent returns from [`Agent::place_bet`] is normalized into a fold, a
//! call, a raise or an all-in before it touches any chips.
//!
//! The baseline agents are useful as opponents and in tests.
mod all_in;
mod calling;
mod folding;
mod random;
mod replay;

use crate::core::Card;

/// The bet response meaning "fold".
pub const FOLD: i64 = -1;

/// A player's two private hole cards.
pub type HoleCards = (Card, Card);

/// One-time tournament parameters, passed to [`Agent::init`] exactly
/// once per agent before the first round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub player_id: String,
    pub starting_money: u64,
    /// Total number of rounds the tournament will play, barring early
    /// bankruptcies.
    pub rounds: u32,
    pub small_blind: u64,
    pub big_blind: u64,
}

/// A player's public state going into a round: identity, seating and
/// stack. Betting order 0 is the dealer, 1 the big blind, 2 the small
/// blind, 3 and up the remaining players. Heads-up the dealer doubles
/// as the small blind.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatState {
    pub player_id: String,
    pub betting_order: usize,
    pub money: u64,
}

/// A player's public betting state mid-round. `bet` is their current
/// bet on this street; `bet_history` holds one entry per completed
/// street.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub player_id: String,
    pub is_in: bool,
    pub bet: u64,
    pub bet_history: Vec<u64>,
}

/// Everything an agent sees when asked for a bet.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetView<'a> {
    /// Community cards revealed so far: 0, 3, 4 or 5 of them.
    pub table_cards: &'a [Card],
    /// The minimum bet to stay in. Zero when everyone has checked.
    pub current_bet: u64,
    pub players: &'a [PlayerStatus],
}

/// A round winner and what they took.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub player_id: String,
    pub winnings: u64,
}

/// A player's summary at round end. `hand` is disclosed only for
/// players who did not fold and whose cards were actually compared at a
/// contested showdown; it is `None` after a fold or when the round was
/// won uncontested.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOutcome {
    pub player_id: String,
    pub is_in: bool,
    pub hand: Option<HoleCards>,
    pub bet_history: Vec<u64>,
}

/// The full report passed to [`Agent::end_round`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub winners: Vec<Winner>,
    pub pot_size: u64,
    pub table_cards: Vec<Card>,
    pub players: Vec<PlayerOutcome>,
}

/// The four-call contract every tournament player implements. There is
/// no shared behavior to inherit, only the contract: the engine calls
/// these methods and never anything else.
///
/// `init`, `start_round` and `end_round` are one-way notifications; any
/// state an agent wants, it keeps itself. Only `place_bet` returns a
/// value the engine consumes:
///
/// - `-1` folds.
/// - `current_bet` calls (or checks when it is zero).
/// - at least `current_bet * 2` raises.
/// - a bet in the open interval (`current_bet`, `current_bet * 2`) is
///   invalid and is reduced to a call.
/// - betting everything you have left is an all-in, allowed even below
///   `current_bet`; anything above your stack is clamped to the all-in.
/// - any other bet below `current_bet` is invalid and folds.
pub trait Agent {
    /// One-time setup at tournament start.
    fn init(&mut self, setup: &GameSetup);

    /// A new round has started. `players` is every seated player's
    /// state, `hand` this agent's private hole cards.
    fn start_round(&mut self, players: &[SeatState], hand: HoleCards);

    /// Asked once per decision; never called for a folded or all-in
    /// player, and never for forced blinds.
    fn place_bet(&mut self, view: &BetView<'_>) -> i64;

    /// The round is decided.
    fn end_round(&mut self, summary: &RoundSummary);
}

pub use all_in::AllInAgent;
pub use calling::CallingAgent;
pub use folding::FoldingAgent;
pub use random::RandomAgent;
pub use replay::VecReplayAgent;
