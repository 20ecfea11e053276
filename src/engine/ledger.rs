use super::agent::{HoleCards, PlayerStatus};

/// One player's mutable record for the lifetime of a round. Owned by
/// the [`Ledger`]; mutated only through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub player_id: String,
    /// 0 = dealer, 1 = big blind, 2 = small blind, 3+ = normal.
    /// Heads-up the dealer doubles as the small blind.
    pub betting_order: usize,
    /// Chips not yet committed this round.
    pub stack: u64,
    pub hole_cards: Option<HoleCards>,
    /// False once the player folds.
    pub is_in: bool,
    /// True once the player's whole stack is committed.
    pub is_all_in: bool,
    /// Chips committed on the street in progress.
    pub current_street_bet: u64,
    /// One entry per completed street.
    pub bet_history: Vec<u64>,
    /// Everything committed this round, across streets.
    pub round_contribution: u64,
}

/// The per-round betting ledger: every player's stack, bets and status.
/// Chips only ever move between a player's stack and their
/// contribution, so the ledger's total is constant until winnings are
/// awarded at showdown.
#[derive(Debug, Clone)]
pub struct Ledger {
    records: Vec<PlayerRecord>,
}

impl Ledger {
    /// Build a ledger for the given players, in betting order. The
    /// seat index is the betting order.
    pub fn new(players: impl IntoIterator<Item = (String, u64)>) -> Self {
        let records = players
            .into_iter()
            .enumerate()
            .map(|(betting_order, (player_id, stack))| PlayerRecord {
                player_id,
                betting_order,
                stack,
                hole_cards: None,
                is_in: true,
                is_all_in: false,
                current_street_bet: 0,
                bet_history: Vec::new(),
                round_contribution: 0,
            })
            .collect();
        Ledger { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, seat: usize) -> &PlayerRecord {
        &self.records[seat]
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub(crate) fn set_hole_cards(&mut self, seat: usize, hand: HoleCards) {
        self.records[seat].hole_cards = Some(hand);
    }

    /// Move up to `amount` chips from the seat's stack into its street
    /// bet, clamping at the stack. A player whose whole stack is
    /// committed is all-in. Returns the amount actually committed.
    pub fn commit(&mut self, seat: usize, amount: u64) -> u64 {
        let r = &mut self.records[seat];
        let put = amount.min(r.stack);
        r.stack -= put;
        r.current_street_bet += put;
        r.round_contribution += put;
        if r.stack == 0 {
            r.is_all_in = true;
        }
        put
    }

    pub fn fold(&mut self, seat: usize) {
        self.records[seat].is_in = false;
    }

    /// Close out the street: append every player's street bet to their
    /// history and reset it for the next street.
    pub fn finish_street(&mut self) {
        for r in &mut self.records {
            r.bet_history.push(r.current_street_bet);
            r.current_street_bet = 0;
        }
    }

    pub fn award(&mut self, seat: usize, amount: u64) {
        self.records[seat].stack += amount;
    }

    /// The highest street bet this seat could reach: its current street
    /// bet plus everything left in its stack.
    pub fn reach(&self, seat: usize) -> u64 {
        let r = &self.records[seat];
        r.current_street_bet + r.stack
    }

    /// Number of players who have not folded.
    pub fn num_in(&self) -> usize {
        self.records.iter().filter(|r| r.is_in).count()
    }

    /// The one remaining non-folded seat, if the round has collapsed to
    /// a single player.
    pub fn sole_survivor(&self) -> Option<usize> {
        let mut it = self.records.iter().enumerate().filter(|(_, r)| r.is_in);
        match (it.next(), it.next()) {
            (Some((seat, _)), None) => Some(seat),
            _ => None,
        }
    }

    /// Total chips on the table: stacks plus round contributions.
    /// Constant from round start until winnings are awarded.
    pub fn total_chips(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.stack + r.round_contribution)
            .sum()
    }

    pub fn total_stacks(&self) -> u64 {
        self.records.iter().map(|r| r.stack).sum()
    }

    /// Revert every contribution to its originating stack. Used when a
    /// round is cancelled before its pots are distributed, keeping the
    /// monetary invariants intact.
    pub fn refund_contributions(&mut self) {
        for r in &mut self.records {
            r.stack += r.round_contribution;
            r.round_contribution = 0;
            r.current_street_bet = 0;
            r.is_all_in = r.stack == 0;
        }
    }

    /// Return `amount` chips of an already-committed contribution to
    /// the seat's stack. Used for uncalled bets at settlement.
    pub(crate) fn refund(&mut self, seat: usize, amount: u64) {
        let r = &mut self.records[seat];
        debug_assert!(amount <= r.round_contribution);
        r.round_contribution -= amount;
        r.stack += amount;
        if r.stack > 0 {
            r.is_all_in = false;
        }
    }

    /// Snapshot of every player's betting status, as passed to agents.
    pub fn statuses(&self) -> Vec<PlayerStatus> {
        self.records
            .iter()
            .map(|r| PlayerStatus {
                player_id: r.player_id.clone(),
                is_in: r.is_in,
                bet: r.current_street_bet,
                bet_history: r.bet_history.clone(),
            })
            .collect()
    }
}
