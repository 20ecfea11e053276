//! The tournament machinery: agents, chip accounting, betting streets,
//! pots, the round orchestrator and the multi-round tournament driver.
//!
//! A [`Tournament`] seats boxed [`Agent`]s and plays them against each
//! other. Each round runs blinds, hole cards, four betting streets and a
//! settlement that carves contributions into side pots; agent responses
//! are normalized into legal actions, and agent panics or timeouts turn
//! into folds rather than errors. Chips are `u64` and every completed
//! round conserves them exactly.
pub mod agent;

mod betting;
mod errors;
mod ledger;
mod pot;
mod round;
mod tournament;

pub use agent::{
    Agent, AllInAgent, BetView, CallingAgent, FoldingAgent, GameSetup, HoleCards, PlayerOutcome,
    PlayerStatus, RandomAgent, RoundSummary, SeatState, VecReplayAgent, Winner, FOLD,
};
pub use betting::{normalize_bet, BettingState, NormalizedBet, Street};
pub use errors::EngineError;
pub use ledger::{Ledger, PlayerRecord};
pub use pot::{build_pots, return_uncalled, Pot};
pub use round::{Round, RoundOutcome, RoundSeat};
pub use tournament::{
    Standing, Tournament, TournamentBuilder, TournamentBuilderError, TournamentResult, MAX_PLAYERS,
};
