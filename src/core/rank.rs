use super::Card;

/// All the different possible hand ranks.
/// For each rank the `u32` carries the strength of the hand in
/// comparison to others of the same rank, so the derived ordering is a
/// total order over hands: higher category first, then the packed
/// tiebreak value. Equal values are a true tie.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub enum Rank {
    /// The lowest rank. No matches.
    HighCard(u32),
    /// One card matches another.
    OnePair(u32),
    /// Two different pairs of matching cards.
    TwoPair(u32),
    /// Three of the same power.
    ThreeOfAKind(u32),
    /// Five cards in a sequence.
    Straight(u32),
    /// Five cards of the same suit.
    Flush(u32),
    /// Three of one power and two of another.
    FullHouse(u32),
    /// Four of the same power.
    FourOfAKind(u32),
    /// Five cards in a sequence, all of the same suit.
    StraightFlush(u32),
}

/// Bit mask for the wheel (Ace, two, three, four, five).
const WHEEL: u32 = 0b1_0000_0000_1111;

/// Given a bitset of card powers, determine whether there's a straight
/// and give its rank. The wheel is the lowest straight, broadway the
/// highest.
///
/// Returns `None` if the powers don't contain a straight.
fn rank_straight(power_set: u32) -> Option<u32> {
    // Five consecutive bits survive ANDing the set against itself
    // shifted by one through four.
    let run = power_set
        & (power_set << 1)
        & (power_set << 2)
        & (power_set << 3)
        & (power_set << 4);
    let idx = run.leading_zeros();
    if idx < 32 {
        Some(32 - 4 - idx)
    } else if power_set & WHEEL == WHEEL {
        // Ace plays low only here.
        Some(0)
    } else {
        None
    }
}

/// Keep only the most significant bit.
fn keep_highest(bits: u32) -> u32 {
    1 << (32 - bits.leading_zeros() - 1)
}

/// Keep the N most significant bits by clearing from the bottom.
fn keep_n(bits: u32, to_keep: u32) -> u32 {
    let mut result = bits;
    while result.count_ones() > to_keep {
        result &= result - 1;
    }
    result
}

/// Find a suit holding five or more cards, if any.
fn find_flush(suit_power_sets: &[u32; 4]) -> Option<usize> {
    suit_power_sets.iter().position(|sp| sp.count_ones() >= 5)
}

/// Anything that can be ranked as a poker hand. Implementations exist
/// for card slices and vectors; the engine ranks a player's two hole
/// cards together with the community cards.
pub trait Rankable {
    fn cards(&self) -> impl Iterator<Item = Card>;

    /// Rank the cards, finding the best five-card hand. Works on five
    /// through seven visible cards. Deterministic and pure: the same
    /// cards always produce the same `Rank`.
    ///
    /// # Examples
    /// ```
    /// use holdem_engine::core::{Card, Rank, Rankable};
    ///
    /// let cards: Vec<Card> = ["2h", "2d", "8d", "8s", "Kd", "6s", "Th"]
    ///     .iter()
    ///     .map(|s| Card::try_from(*s).unwrap())
    ///     .collect();
    /// let rank = cards.rank();
    /// assert!(Rank::TwoPair(0) <= rank);
    /// assert!(Rank::TwoPair(u32::MAX) >= rank);
    /// ```
    fn rank(&self) -> Rank {
        let mut power_to_count: [u8; 13] = [0; 13];
        let mut count_to_power: [u32; 5] = [0; 5];
        let mut suit_power_sets: [u32; 4] = [0; 4];
        let mut power_set: u32 = 0;

        for c in self.cards() {
            let p = c.power.index();
            let s = match c.suit {
                super::Suit::Club => 0,
                super::Suit::Spade => 1,
                super::Suit::Heart => 2,
                super::Suit::Diamond => 3,
            };
            power_set |= 1 << p;
            power_to_count[p as usize] += 1;
            suit_power_sets[s] |= 1 << p;
        }

        // Rotate the power-to-count map so we can ask "which powers
        // appear exactly N times".
        for (power, &count) in power_to_count.iter().enumerate() {
            count_to_power[count as usize] |= 1 << power;
        }

        let flush = find_flush(&suit_power_sets);

        if let Some(flush_idx) = flush {
            // A flush that contains a straight is a straight flush.
            if let Some(rank) = rank_straight(suit_power_sets[flush_idx]) {
                Rank::StraightFlush(rank)
            } else {
                let rank = keep_n(suit_power_sets[flush_idx], 5);
                Rank::Flush(rank)
            }
        } else if count_to_power[4] != 0 {
            let high = keep_highest(power_set ^ count_to_power[4]);
            Rank::FourOfAKind((count_to_power[4] << 13) | high)
        } else if count_to_power[3] != 0 && count_to_power[3].count_ones() == 2 {
            // Two sets. The best we can make is a full house using the
            // higher set over the lower.
            let set = keep_highest(count_to_power[3]);
            let pair = count_to_power[3] ^ set;
            Rank::FullHouse((set << 13) | pair)
        } else if count_to_power[3] != 0 && count_to_power[2] != 0 {
            let set = count_to_power[3];
            let pair = keep_highest(count_to_power[2]);
            Rank::FullHouse((set << 13) | pair)
        } else if let Some(s_rank) = rank_straight(power_set) {
            Rank::Straight(s_rank)
        } else if count_to_power[3] != 0 {
            // A set plus the two highest kickers outside it.
            let low = keep_n(power_set ^ count_to_power[3], 2);
            Rank::ThreeOfAKind((count_to_power[3] << 13) | low)
        } else if count_to_power[2].count_ones() >= 2 {
            // Two pair. With seven cards there can be three pairs; keep
            // the top two and the best remaining kicker.
            let pairs = keep_n(count_to_power[2], 2);
            let low = keep_highest(power_set ^ pairs);
            Rank::TwoPair((pairs << 13) | low)
        } else if count_to_power[2] == 0 {
            Rank::HighCard(keep_n(power_set, 5))
        } else {
            let pair = count_to_power[2];
            let low = keep_n(power_set ^ count_to_power[2], 3);
            Rank::OnePair((pair << 13) | low)
        }
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for &[Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Power;

    fn hand(cards: &[&str]) -> Vec<Card> {
        cards
            .iter()
            .map(|s| Card::try_from(*s).unwrap())
            .collect()
    }

    #[test]
    fn test_keep_highest() {
        assert_eq!(0b100, keep_highest(0b111));
    }

    #[test]
    fn test_keep_n() {
        assert_eq!(3, keep_n(0b1111, 3).count_ones());
    }

    #[test]
    fn test_category_ordering() {
        assert!(Rank::HighCard(u32::MAX) < Rank::OnePair(0));
        assert!(Rank::OnePair(u32::MAX) < Rank::TwoPair(0));
        assert!(Rank::TwoPair(u32::MAX) < Rank::ThreeOfAKind(0));
        assert!(Rank::ThreeOfAKind(u32::MAX) < Rank::Straight(0));
        assert!(Rank::Straight(u32::MAX) < Rank::Flush(0));
        assert!(Rank::Flush(u32::MAX) < Rank::FullHouse(0));
        assert!(Rank::FullHouse(u32::MAX) < Rank::FourOfAKind(0));
        assert!(Rank::FourOfAKind(u32::MAX) < Rank::StraightFlush(0));
    }

    #[test]
    fn test_high_card() {
        let rank = hand(&["Ad", "8h", "9c", "Tc", "5c"]).rank();
        let expected = (1 << Power::Ace.index())
            | (1 << Power::Eight.index())
            | (1 << Power::Nine.index())
            | (1 << Power::Ten.index())
            | (1 << Power::Five.index());
        assert_eq!(Rank::HighCard(expected), rank);
    }

    #[test]
    fn test_one_pair() {
        let rank = hand(&["Ad", "Ah", "9c", "Tc", "5c"]).rank();
        assert!(matches!(rank, Rank::OnePair(_)));
    }

    #[test]
    fn test_two_pair_beats_one_pair() {
        let two_pair = hand(&["Ad", "Ah", "9c", "9d", "5c"]).rank();
        let one_pair = hand(&["Ad", "Ah", "9c", "Tc", "5c"]).rank();
        assert!(two_pair > one_pair);
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = hand(&["Ad", "2h", "3c", "4c", "5s"]).rank();
        let six_high = hand(&["2h", "3c", "4c", "5s", "6d"]).rank();
        let broadway = hand(&["Td", "Jh", "Qc", "Kc", "As"]).rank();

        assert_eq!(Rank::Straight(0), wheel);
        assert!(wheel < six_high);
        assert!(six_high < broadway);
    }

    #[test]
    fn test_straight_flush() {
        let rank = hand(&["5s", "6s", "7s", "8s", "9s"]).rank();
        assert!(matches!(rank, Rank::StraightFlush(_)));
    }

    #[test]
    fn test_full_house_from_two_sets_uses_higher_set() {
        // Seven cards with two sets: kings full of twos, not twos full
        // of kings.
        let rank = hand(&["Kd", "Kh", "Ks", "2d", "2h", "2s", "7c"]).rank();
        let expected_set = 1u32 << Power::King.index();
        let expected_pair = 1u32 << Power::Two.index();
        assert_eq!(Rank::FullHouse((expected_set << 13) | expected_pair), rank);
    }

    #[test]
    fn test_best_five_of_seven() {
        // Board pairs the nine; the flush in hearts is the best hand.
        let rank = hand(&["2h", "5h", "9h", "Th", "Kh", "9c", "9d"]).rank();
        assert!(matches!(rank, Rank::Flush(_)));
    }

    #[test]
    fn test_three_pairs_keeps_top_two() {
        let three_pairs = hand(&["Ad", "Ah", "Kc", "Kd", "2c", "2s", "7h"]).rank();
        let expected_pairs =
            (1u32 << Power::Ace.index()) | (1u32 << Power::King.index());
        let expected_kicker = 1u32 << Power::Seven.index();
        assert_eq!(
            Rank::TwoPair((expected_pairs << 13) | expected_kicker),
            three_pairs
        );
    }

    #[test]
    fn test_equal_hands_tie() {
        let a = hand(&["Ad", "Kd", "9c", "Tc", "5c"]).rank();
        let b = hand(&["Ah", "Kh", "9s", "Ts", "5s"]).rank();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kicker_breaks_pair_tie() {
        let ace_kicker = hand(&["Qd", "Qh", "Ac", "Tc", "5c"]).rank();
        let king_kicker = hand(&["Qs", "Qc", "Kc", "Td", "5d"]).rank();
        assert!(ace_kicker > king_kicker);
    }

    #[test]
    fn test_ordering_is_transitive_across_samples() {
        // A spread of hands in strictly increasing strength.
        let hands = [
            hand(&["2d", "5h", "9c", "Tc", "Kd"]),
            hand(&["Qd", "Qh", "Ac", "Tc", "5c"]),
            hand(&["Ad", "Ah", "9c", "9d", "5c"]),
            hand(&["9s", "9h", "9c", "Tc", "5c"]),
            hand(&["Ad", "2h", "3c", "4c", "5s"]),
            hand(&["2h", "5h", "9h", "Th", "Kh"]),
            hand(&["Kd", "Kh", "Ks", "2d", "2h"]),
            hand(&["Kd", "Kh", "Ks", "Kc", "2h"]),
            hand(&["5s", "6s", "7s", "8s", "9s"]),
        ];

        let ranks: Vec<Rank> = hands.iter().map(|h| h.rank()).collect();
        for pair in ranks.windows(2) {
            assert!(pair[0] < pair[1], "{:?} not below {:?}", pair[0], pair[1]);
        }
    }
}
