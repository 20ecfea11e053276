//! `holdem_engine` is a Texas Hold'em tournament engine for pluggable
//! betting agents.
//!
//! The engine owns everything rule-shaped: it shuffles and deals, posts
//! blinds, drives the four betting streets, normalizes whatever integer an
//! agent returns into a legal action, carves contributions into side pots
//! when players go all-in for unequal amounts, ranks hands at showdown and
//! pays out winnings with exact integer chip accounting. Agents are opaque
//! collaborators behind the four-call [`engine::Agent`] contract; the
//! engine never trusts them, so a misbehaving agent folds instead of
//! crashing the table.
//!
//! The crate splits into two halves:
//!
//! - [`core`] holds the card domain: [`core::Card`], [`core::Deck`], and
//!   hand evaluation through [`core::Rankable`].
//! - [`engine`] holds the tournament machinery: the agent contract, the
//!   per-round ledger, side pots, the street state machine, the round
//!   orchestrator and the multi-round [`engine::Tournament`] driver.
//!
//! # Example
//!
//! ```
//! use holdem_engine::engine::{CallingAgent, TournamentBuilder};
//!
//! let mut tournament = TournamentBuilder::new()
//!     .agent("alice", Box::new(CallingAgent::default()))
//!     .agent("bob", Box::new(CallingAgent::default()))
//!     .agent("carol", Box::new(CallingAgent::default()))
//!     .starting_stack(100)
//!     .blinds(1, 2)
//!     .rounds(10)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let result = tournament.run().unwrap();
//! let total: u64 = result.standings.iter().map(|s| s.stack).sum();
//! assert_eq!(total, 300);
//! ```
pub mod core;
pub mod engine;
