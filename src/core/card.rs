use std::fmt::{self, Display};

use thiserror::Error;

/// The suit of a card.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Club,
    Spade,
    Heart,
    Diamond,
}

impl Suit {
    /// All four suits, in declaration order.
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Heart, Suit::Diamond];
}

/// The power of a card. Discriminants are the poker values:
/// `Two` is 2 up through `Ten` at 10, then Jack 11, Queen 12, King 13
/// and Ace 14. Ace additionally plays low in the A-2-3-4-5 straight,
/// which is handled by the evaluator rather than here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Power {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Power {
    /// All thirteen powers, ascending.
    pub const ALL: [Power; 13] = [
        Power::Two,
        Power::Three,
        Power::Four,
        Power::Five,
        Power::Six,
        Power::Seven,
        Power::Eight,
        Power::Nine,
        Power::Ten,
        Power::Jack,
        Power::Queen,
        Power::King,
        Power::Ace,
    ];

    /// Zero-based index of this power (Two = 0 .. Ace = 12). Used by the
    /// evaluator's bitset encoding.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8 - 2
    }
}

/// A single playing card. Equality is structural; there are 52 distinct
/// values and the engine never puts the same one in play twice per round.
///
/// # Examples
///
/// ```
/// use holdem_engine::core::{Card, Power, Suit};
///
/// let king = Card::new(Power::King, Suit::Spade);
/// assert_eq!(king, Card::try_from("Ks").unwrap());
/// assert_eq!(format!("{king}"), "King of Spades");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub power: Power,
    pub suit: Suit,
}

impl Card {
    pub fn new(power: Power, suit: Suit) -> Self {
        Self { power, suit }
    }

    /// Iterate over every card of the 52-card domain.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Power::ALL.iter().map(move |&power| Card { power, suit }))
    }
}

/// Errors from parsing the compact two-character card notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("expected two characters, got {0:?}")]
    BadLength(String),

    #[error("unknown power character {0:?}")]
    UnknownPower(char),

    #[error("unknown suit character {0:?}")]
    UnknownSuit(char),
}

/// Parse the compact notation used throughout tests: power character
/// (`2`-`9`, `T`, `J`, `Q`, `K`, `A`) followed by suit character
/// (`c`, `s`, `h`, `d`), e.g. `"Ks"` or `"Tc"`.
impl TryFrom<&str> for Card {
    type Error = CardParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        let (power_ch, suit_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(p), Some(s), None) => (p, s),
            _ => return Err(CardParseError::BadLength(s.to_string())),
        };

        let power = match power_ch {
            '2' => Power::Two,
            '3' => Power::Three,
            '4' => Power::Four,
            '5' => Power::Five,
            '6' => Power::Six,
            '7' => Power::Seven,
            '8' => Power::Eight,
            '9' => Power::Nine,
            'T' => Power::Ten,
            'J' => Power::Jack,
            'Q' => Power::Queen,
            'K' => Power::King,
            'A' => Power::Ace,
            other => return Err(CardParseError::UnknownPower(other)),
        };

        let suit = match suit_ch {
            'c' => Suit::Club,
            's' => Suit::Spade,
            'h' => Suit::Heart,
            'd' => Suit::Diamond,
            other => return Err(CardParseError::UnknownSuit(other)),
        };

        Ok(Card { power, suit })
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = match self.power {
            Power::Jack => "Jack".to_string(),
            Power::Queen => "Queen".to_string(),
            Power::King => "King".to_string(),
            Power::Ace => "Ace".to_string(),
            numeric => (numeric as u8).to_string(),
        };
        let suit = match self.suit {
            Suit::Club => "Clubs",
            Suit::Spade => "Spades",
            Suit::Heart => "Hearts",
            Suit::Diamond => "Diamonds",
        };
        write!(f, "{power} of {suit}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_all_cards_distinct() {
        let cards: HashSet<Card> = Card::all().collect();
        assert_eq!(52, cards.len());
    }

    #[test]
    fn test_parse_round_trips_known_cards() {
        assert_eq!(
            Card::new(Power::Ace, Suit::Spade),
            Card::try_from("As").unwrap()
        );
        assert_eq!(
            Card::new(Power::Ten, Suit::Club),
            Card::try_from("Tc").unwrap()
        );
        assert_eq!(
            Card::new(Power::Two, Suit::Diamond),
            Card::try_from("2d").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Err(CardParseError::BadLength("Kss".to_string())),
            Card::try_from("Kss")
        );
        assert_eq!(
            Err(CardParseError::UnknownPower('1')),
            Card::try_from("1s")
        );
        assert_eq!(
            Err(CardParseError::UnknownSuit('x')),
            Card::try_from("Kx")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "King of Spades",
            format!("{}", Card::try_from("Ks").unwrap())
        );
        assert_eq!(
            "10 of Clubs",
            format!("{}", Card::try_from("Tc").unwrap())
        );
        assert_eq!(
            "2 of Diamonds",
            format!("{}", Card::try_from("2d").unwrap())
        );
    }

    #[test]
    fn test_power_index() {
        assert_eq!(0, Power::Two.index());
        assert_eq!(12, Power::Ace.index());
    }
}
