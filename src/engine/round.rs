//! One full deal: blinds, hole cards, four betting streets, settlement.
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::core::{Card, Deck, Rank, Rankable};

use super::agent::{
    Agent, BetView, PlayerOutcome, RoundSummary, SeatState, Winner, FOLD,
};
use super::betting::{normalize_bet, BettingState, NormalizedBet, Street};
use super::errors::EngineError;
use super::ledger::Ledger;
use super::pot::{build_pots, return_uncalled};

/// One seat at the table for a single round: the agent making the
/// decisions and the chips backing them. Seat index is betting order:
/// 0 the dealer, 1 the big blind, 2 the small blind, 3+ the rest.
/// Heads-up the dealer posts the small blind.
pub struct RoundSeat<'a> {
    pub agent: &'a mut dyn Agent,
    pub player_id: String,
    pub stack: u64,
    /// Panics and timeouts accumulated so far; the round adds to it.
    pub faults: u32,
}

/// What a completed round hands back: final stacks and fault counts by
/// seat, and the summary the agents were shown.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub stacks: Vec<u64>,
    pub faults: Vec<u32>,
    pub summary: RoundSummary,
}

/// Orchestrates one deal from blinds to payout. Owns its deck and
/// ledger; borrows the agents and the tournament's RNG.
pub struct Round<'a, R: Rng> {
    seats: Vec<RoundSeat<'a>>,
    ledger: Ledger,
    deck: Deck,
    table_cards: Vec<Card>,
    rng: &'a mut R,
    small_blind: u64,
    big_blind: u64,
    bet_timeout: Duration,
}

impl<'a, R: Rng> Round<'a, R> {
    pub fn new(
        seats: Vec<RoundSeat<'a>>,
        small_blind: u64,
        big_blind: u64,
        bet_timeout: Duration,
        rng: &'a mut R,
    ) -> Self {
        let ledger = Ledger::new(
            seats
                .iter()
                .map(|s| (s.player_id.clone(), s.stack)),
        );
        let deck = Deck::new_with_rng(rng);
        Round {
            seats,
            ledger,
            deck,
            table_cards: Vec::new(),
            rng,
            small_blind,
            big_blind,
            bet_timeout,
        }
    }

    /// Play the round to completion. Consumes the round; the agents get
    /// their `start_round`/`place_bet`/`end_round` calls along the way.
    pub fn run(mut self) -> Result<RoundOutcome, EngineError> {
        let chips_before = self.ledger.total_chips();

        self.post_blinds();
        self.deal_hole_cards()?;
        self.notify_start();

        let mut street = Some(Street::PreFlop);
        while let Some(current) = street {
            let count = current.deal_count();
            if count > 0 {
                let cards = self.deck.deal(count)?;
                self.table_cards.extend(cards);
                trace!(street = %current, table = ?self.table_cards, "community cards");
            }
            let opening_bet = if current == Street::PreFlop {
                self.big_blind
            } else {
                0
            };
            self.run_street(current, opening_bet);
            self.ledger.finish_street();
            if self.ledger.sole_survivor().is_some() {
                break;
            }
            street = current.advance();
        }

        let summary = self.settle(chips_before)?;
        self.notify_end(&summary);

        Ok(RoundOutcome {
            stacks: self.ledger.records().iter().map(|r| r.stack).collect(),
            faults: self.seats.iter().map(|s| s.faults).collect(),
            summary,
        })
    }

    /// Cancel the round before settlement: every contribution goes back
    /// to its originating stack. Returns the restored stacks by seat.
    pub fn abort(mut self) -> Vec<u64> {
        debug!("round aborted, refunding contributions");
        self.ledger.refund_contributions();
        self.ledger.records().iter().map(|r| r.stack).collect()
    }

    fn post_blinds(&mut self) {
        let (sb_seat, bb_seat) = if self.ledger.len() == 2 { (0, 1) } else { (2, 1) };
        let sb = self.ledger.commit(sb_seat, self.small_blind);
        let bb = self.ledger.commit(bb_seat, self.big_blind);
        debug!(sb_seat, sb, bb_seat, bb, "blinds posted");
    }

    fn deal_hole_cards(&mut self) -> Result<(), EngineError> {
        for seat in 0..self.ledger.len() {
            let cards = self.deck.deal(2)?;
            self.ledger.set_hole_cards(seat, (cards[0], cards[1]));
        }
        Ok(())
    }

    fn notify_start(&mut self) {
        let states: Vec<SeatState> = self
            .ledger
            .records()
            .iter()
            .map(|r| SeatState {
                player_id: r.player_id.clone(),
                betting_order: r.betting_order,
                money: r.stack,
            })
            .collect();
        for seat in 0..self.seats.len() {
            if let Some(hand) = self.ledger.record(seat).hole_cards {
                let agent = &mut *self.seats[seat].agent;
                if catch_unwind(AssertUnwindSafe(|| agent.start_round(&states, hand))).is_err() {
                    warn!(
                        player_id = %self.ledger.record(seat).player_id,
                        "agent panicked in start_round"
                    );
                    self.seats[seat].faults += 1;
                }
            }
        }
    }

    fn notify_end(&mut self, summary: &RoundSummary) {
        for seat in 0..self.seats.len() {
            let agent = &mut *self.seats[seat].agent;
            if catch_unwind(AssertUnwindSafe(|| agent.end_round(summary))).is_err() {
                warn!(
                    player_id = %self.ledger.record(seat).player_id,
                    "agent panicked in end_round"
                );
                self.seats[seat].faults += 1;
            }
        }
    }

    /// Drive one street of betting until it settles or the round
    /// collapses to a single player.
    fn run_street(&mut self, street: Street, opening_bet: u64) {
        if self.ledger.num_in() <= 1 {
            return;
        }
        let mut state = BettingState::new(street, opening_bet, &self.ledger);
        while let Some(seat) = state.next_to_act(&self.ledger) {
            if self.ledger.num_in() <= 1 {
                return;
            }
            let response = self.ask_bet(seat, state.current_bet);
            let record = self.ledger.record(seat);
            match normalize_bet(
                response,
                state.current_bet,
                record.current_street_bet,
                record.stack,
            ) {
                NormalizedBet::Fold => {
                    trace!(seat, street = %street, "fold");
                    self.ledger.fold(seat);
                    state.acted(seat);
                }
                NormalizedBet::To(target) => {
                    let already = self.ledger.record(seat).current_street_bet;
                    self.ledger.commit(seat, target.saturating_sub(already));
                    let bet = self.ledger.record(seat).current_street_bet;
                    trace!(seat, street = %street, bet, "bet");
                    if bet > state.current_bet {
                        state.raise_to(seat, bet, &self.ledger);
                    } else {
                        state.acted(seat);
                    }
                }
            }
        }
    }

    /// Ask the seat's agent for a bet, guarding against panics and
    /// overlong deliberation. Either misbehavior folds the decision and
    /// counts a fault.
    fn ask_bet(&mut self, seat: usize, current_bet: u64) -> i64 {
        let statuses = self.ledger.statuses();
        let view = BetView {
            table_cards: &self.table_cards,
            current_bet,
            players: &statuses,
        };
        let agent = &mut *self.seats[seat].agent;
        let started = Instant::now();
        let response = catch_unwind(AssertUnwindSafe(|| agent.place_bet(&view)));
        let elapsed = started.elapsed();

        match response {
            Ok(bet) if elapsed <= self.bet_timeout => bet,
            Ok(_) => {
                warn!(
                    player_id = %self.ledger.record(seat).player_id,
                    ?elapsed,
                    "bet exceeded the time limit, folding"
                );
                self.seats[seat].faults += 1;
                FOLD
            }
            Err(_) => {
                warn!(
                    player_id = %self.ledger.record(seat).player_id,
                    "agent panicked in place_bet, folding"
                );
                self.seats[seat].faults += 1;
                FOLD
            }
        }
    }

    /// Form the pots, decide each one, move the chips and check that
    /// none were created or destroyed along the way.
    fn settle(&mut self, chips_before: u64) -> Result<RoundSummary, EngineError> {
        return_uncalled(&mut self.ledger);
        let pots = build_pots(&self.ledger);
        let pot_size: u64 = pots.iter().map(|p| p.amount).sum();

        let n = self.ledger.len();
        let mut winnings = vec![0u64; n];
        let mut compared = vec![false; n];

        for pot in &pots {
            // A layer's eligibility empties out when everyone who
            // contributed at its threshold later folded; the chips then
            // go to whoever is still in the round.
            let contenders: Vec<usize> = if pot.eligible.is_empty() {
                self.ledger
                    .records()
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.is_in)
                    .map(|(seat, _)| seat)
                    .collect()
            } else {
                pot.eligible.clone()
            };
            if contenders.is_empty() {
                return Err(EngineError::UnclaimedPot { amount: pot.amount });
            }
            if contenders.len() == 1 {
                // Uncontested: no cards are compared or disclosed.
                winnings[contenders[0]] += pot.amount;
                continue;
            }
            let ranked: Vec<(usize, Rank)> = contenders
                .iter()
                .map(|&seat| {
                    let mut cards = self.table_cards.clone();
                    if let Some((a, b)) = self.ledger.record(seat).hole_cards {
                        cards.push(a);
                        cards.push(b);
                    }
                    (seat, cards.rank())
                })
                .collect();
            for &(seat, _) in &ranked {
                compared[seat] = true;
            }
            // ranked is never empty here; a pot always has eligible seats.
            let best = ranked.iter().map(|&(_, rank)| rank).max().unwrap_or(Rank::HighCard(0));
            let winners: Vec<usize> = ranked
                .iter()
                .filter(|&&(_, rank)| rank == best)
                .map(|&(seat, _)| seat)
                .collect();
            debug!(amount = pot.amount, ?winners, ?best, "pot decided");
            split_pot(pot.amount, &winners, &mut winnings, self.rng);
        }

        for (seat, &amount) in winnings.iter().enumerate() {
            if amount > 0 {
                debug!(seat, amount, "awarding winnings");
                self.ledger.award(seat, amount);
            }
        }

        let chips_after = self.ledger.total_stacks();
        if chips_after != chips_before {
            return Err(EngineError::MoneyImbalance {
                chips_before,
                chips_after,
            });
        }

        let winners = self
            .ledger
            .records()
            .iter()
            .zip(&winnings)
            .filter(|(_, &w)| w > 0)
            .map(|(r, &w)| Winner {
                player_id: r.player_id.clone(),
                winnings: w,
            })
            .collect();
        let players = self
            .ledger
            .records()
            .iter()
            .enumerate()
            .map(|(seat, r)| PlayerOutcome {
                player_id: r.player_id.clone(),
                is_in: r.is_in,
                hand: if compared[seat] { r.hole_cards } else { None },
                bet_history: r.bet_history.clone(),
            })
            .collect();

        Ok(RoundSummary {
            winners,
            pot_size,
            table_cards: self.table_cards.clone(),
            players,
        })
    }
}

/// Share a pot among tied winners: integer division, with the odd chips
/// going to one winner chosen uniformly at random.
fn split_pot<R: Rng>(amount: u64, winners: &[usize], winnings: &mut [u64], rng: &mut R) {
    let share = amount / winners.len() as u64;
    let remainder = amount % winners.len() as u64;
    for &seat in winners {
        winnings[seat] += share;
    }
    if remainder > 0 {
        let lucky = winners[rng.random_range(0..winners.len())];
        trace!(lucky, remainder, "odd chips to one tied winner");
        winnings[lucky] += remainder;
    }
}
