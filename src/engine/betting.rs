use std::fmt::{self, Display};

use super::ledger::Ledger;

/// The four betting phases of a round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn advance(self) -> Option<Street> {
        match self {
            Street::PreFlop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Community cards dealt when this street opens.
    pub fn deal_count(self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::PreFlop => write!(f, "Pre-Flop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

/// What an agent's raw bet response normalizes to: a fold, or a target
/// street bet the ledger should commit up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedBet {
    Fold,
    /// Bring the player's street bet up to this amount.
    To(u64),
}

/// Normalize an agent's raw response into a legal action. `current_bet`
/// is the street's bet to match, `street_bet` what this player has
/// already committed this street, and `stack` their remaining chips.
///
/// The rules, in the order applied:
/// - any negative response folds (`-1` is the explicit fold),
/// - matching `current_bet` calls (or checks at zero),
/// - betting the whole remaining stack, or anything at or beyond it, is
///   an all-in: always permitted, even below `current_bet`, and clamped
///   to everything the player can reach,
/// - a non-all-in bet below `current_bet` is invalid and folds,
/// - a raise short of doubling `current_bet` is invalid and is reduced
///   to a call,
/// - anything else is a raise to the stated amount.
pub fn normalize_bet(response: i64, current_bet: u64, street_bet: u64, stack: u64) -> NormalizedBet {
    if response < 0 {
        return NormalizedBet::Fold;
    }
    let b = response as u64;
    let reach = street_bet + stack;

    if b == current_bet {
        return NormalizedBet::To(current_bet.min(reach));
    }
    if b >= reach || b == stack {
        return NormalizedBet::To(reach);
    }
    if b < current_bet {
        return NormalizedBet::Fold;
    }
    if b < current_bet.saturating_mul(2) {
        return NormalizedBet::To(current_bet);
    }
    NormalizedBet::To(b)
}

/// The state of one street's betting: the bet to match and who still
/// owes an action. A street settles when every non-folded player is
/// either all-in or has matched the current bet and acted since the
/// last raise.
#[derive(Debug, Clone)]
pub struct BettingState {
    pub street: Street,
    pub current_bet: u64,
    needs_action: Vec<bool>,
    cursor: usize,
}

impl BettingState {
    /// Open a street. `opening_bet` is the big blind pre-flop and zero
    /// afterwards. Every player still in and not all-in owes an action.
    pub fn new(street: Street, opening_bet: u64, ledger: &Ledger) -> Self {
        let needs_action = ledger
            .records()
            .iter()
            .map(|r| r.is_in && !r.is_all_in)
            .collect();
        BettingState {
            street,
            current_bet: opening_bet,
            needs_action,
            cursor: 0,
        }
    }

    /// The next seat owing an action, scanning in betting order from
    /// the last actor. `None` once the street is settled.
    pub fn next_to_act(&mut self, ledger: &Ledger) -> Option<usize> {
        let n = self.needs_action.len();
        for step in 0..n {
            let seat = (self.cursor + step) % n;
            let r = ledger.record(seat);
            if self.needs_action[seat] && r.is_in && !r.is_all_in {
                self.cursor = (seat + 1) % n;
                return Some(seat);
            }
        }
        None
    }

    /// The seat has acted without increasing the bet.
    pub fn acted(&mut self, seat: usize) {
        self.needs_action[seat] = false;
    }

    /// The seat raised the bet to `new_bet`: everyone else still in and
    /// not all-in must act again.
    pub fn raise_to(&mut self, seat: usize, new_bet: u64, ledger: &Ledger) {
        self.current_bet = new_bet;
        for (idx, r) in ledger.records().iter().enumerate() {
            self.needs_action[idx] = idx != seat && r.is_in && !r.is_all_in;
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.needs_action.iter().any(|&b| b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_responses() {
        assert_eq!(NormalizedBet::Fold, normalize_bet(-1, 10, 0, 100));
        // Any other negative is invalid and folds too.
        assert_eq!(NormalizedBet::Fold, normalize_bet(-42, 10, 0, 100));
    }

    #[test]
    fn test_call_and_check() {
        assert_eq!(NormalizedBet::To(10), normalize_bet(10, 10, 0, 100));
        // Checking: everyone at zero.
        assert_eq!(NormalizedBet::To(0), normalize_bet(0, 0, 0, 100));
        // Calling from a posted small blind.
        assert_eq!(NormalizedBet::To(2), normalize_bet(2, 2, 1, 99));
    }

    #[test]
    fn test_invalid_raise_reduced_to_call() {
        // current_bet + 1 is neither a legal raise nor the stack.
        assert_eq!(NormalizedBet::To(10), normalize_bet(11, 10, 0, 100));
        assert_eq!(NormalizedBet::To(10), normalize_bet(19, 10, 0, 100));
    }

    #[test]
    fn test_legal_raise() {
        assert_eq!(NormalizedBet::To(20), normalize_bet(20, 10, 0, 100));
        assert_eq!(NormalizedBet::To(75), normalize_bet(75, 10, 0, 100));
        // Opening bet on a checked street is a raise from zero.
        assert_eq!(NormalizedBet::To(5), normalize_bet(5, 0, 0, 100));
    }

    #[test]
    fn test_below_current_bet_folds() {
        assert_eq!(NormalizedBet::Fold, normalize_bet(5, 10, 0, 100));
        // Even matching one's own previous street bet isn't enough.
        assert_eq!(NormalizedBet::Fold, normalize_bet(1, 2, 1, 99));
    }

    #[test]
    fn test_all_in_exemptions() {
        // All-in below the current bet is allowed.
        assert_eq!(NormalizedBet::To(40), normalize_bet(40, 100, 0, 40));
        // Betting the remaining stack with chips already committed.
        assert_eq!(NormalizedBet::To(100), normalize_bet(99, 200, 1, 99));
        // Overbetting the stack clamps to the all-in.
        assert_eq!(
            NormalizedBet::To(100),
            normalize_bet(i64::MAX, 10, 0, 100)
        );
        // An all-in inside the invalid raise window is still an all-in.
        assert_eq!(NormalizedBet::To(15), normalize_bet(15, 10, 0, 15));
    }

    #[test]
    fn test_street_progression() {
        assert_eq!(Some(Street::Flop), Street::PreFlop.advance());
        assert_eq!(Some(Street::Turn), Street::Flop.advance());
        assert_eq!(Some(Street::River), Street::Turn.advance());
        assert_eq!(None, Street::River.advance());

        assert_eq!(0, Street::PreFlop.deal_count());
        assert_eq!(3, Street::Flop.deal_count());
        assert_eq!(1, Street::Turn.deal_count());
        assert_eq!(1, Street::River.deal_count());
    }

    #[test]
    fn test_betting_state_settles_after_calls() {
        let ledger = Ledger::new(vec![
            ("a".to_string(), 100),
            ("b".to_string(), 100),
            ("c".to_string(), 100),
        ]);
        let mut state = BettingState::new(Street::Flop, 0, &ledger);

        // Everyone checks around.
        for expected in [0, 1, 2] {
            let seat = state.next_to_act(&ledger).unwrap();
            assert_eq!(expected, seat);
            state.acted(seat);
        }
        assert!(state.is_settled());
        assert_eq!(None, state.next_to_act(&ledger));
    }

    #[test]
    fn test_raise_reopens_action() {
        let mut ledger = Ledger::new(vec![
            ("a".to_string(), 100),
            ("b".to_string(), 100),
            ("c".to_string(), 100),
        ]);
        let mut state = BettingState::new(Street::Flop, 0, &ledger);

        assert_eq!(Some(0), state.next_to_act(&ledger));
        state.acted(0);
        assert_eq!(Some(1), state.next_to_act(&ledger));
        ledger.commit(1, 10);
        state.raise_to(1, 10, &ledger);
        assert_eq!(10, state.current_bet);

        // Seat 2 then seat 0 owe actions again; seat 1 does not.
        assert_eq!(Some(2), state.next_to_act(&ledger));
        state.acted(2);
        assert_eq!(Some(0), state.next_to_act(&ledger));
        state.acted(0);
        assert!(state.is_settled());
    }

    #[test]
    fn test_folded_and_all_in_skipped() {
        let mut ledger = Ledger::new(vec![
            ("a".to_string(), 100),
            ("b".to_string(), 100),
            ("c".to_string(), 100),
        ]);
        ledger.fold(0);
        ledger.commit(1, 100); // all-in
        let mut state = BettingState::new(Street::Turn, 0, &ledger);

        assert_eq!(Some(2), state.next_to_act(&ledger));
        state.acted(2);
        assert_eq!(None, state.next_to_act(&ledger));
    }
}
