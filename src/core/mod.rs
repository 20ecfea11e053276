//! The core card domain: cards, decks, and hand evaluation.
mod card;
mod deck;
mod rank;

pub use card::{Card, CardParseError, Power, Suit};
pub use deck::Deck;
pub use rank::{Rank, Rankable};
