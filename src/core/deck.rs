use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::EngineError;

use super::Card;

/// A shuffled deck of the 52 unique cards, owned by one round and consumed
/// by dealing. A fresh deck is shuffled uniformly at random; `deal`
/// removes cards so nothing repeats within a round.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A full deck shuffled with the thread RNG.
    pub fn new() -> Self {
        Self::new_with_rng(&mut rand::rng())
    }

    /// A full deck shuffled with the provided RNG. Useful for
    /// deterministic simulations and tests.
    pub fn new_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Card::all().collect();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// Remove and return the next `n` cards. Asking for more cards than
    /// remain is an engine bug, surfaced as `ExhaustedDeck`.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.cards.len() < n {
            return Err(EngineError::ExhaustedDeck {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        let at = self.cards.len() - n;
        Ok(self.cards.split_off(at))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
