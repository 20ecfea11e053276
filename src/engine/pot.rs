use tracing::debug;

use super::ledger::Ledger;

/// One pot produced at settlement: an amount and the seats that can win
/// it. Never mutated after creation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: u64,
    /// Seat indexes of the non-folded players eligible for this pot.
    pub eligible: Vec<usize>,
}

/// Return the uncalled portion of the largest contribution to its
/// owner. When exactly one player has committed more than anyone else
/// could match, the excess was never contested and goes straight back
/// to their stack before pots are formed. Returns the refunded amount.
pub fn return_uncalled(ledger: &mut Ledger) -> u64 {
    let mut max = 0u64;
    let mut second = 0u64;
    let mut max_seat = 0usize;
    let mut at_max = 0usize;

    for (seat, r) in ledger.records().iter().enumerate() {
        let c = r.round_contribution;
        if c > max {
            second = max;
            max = c;
            max_seat = seat;
            at_max = 1;
        } else if c == max && c > 0 {
            at_max += 1;
        } else if c > second {
            second = c;
        }
    }

    if at_max == 1 && max > second {
        let excess = max - second;
        debug!(seat = max_seat, excess, "returning uncalled bet");
        ledger.refund(max_seat, excess);
        excess
    } else {
        0
    }
}

/// Convert the ledger's contributions into pots, one per distinct
/// all-in contribution threshold plus an uncapped top pot if anyone
/// contributed beyond the highest all-in. Each layer takes the
/// incremental contribution between thresholds from every player who
/// reached it; eligibility is the non-folded players at or above the
/// threshold. The sum of pot amounts always equals the sum of
/// contributions.
///
/// Pots are ordered smallest threshold first.
pub fn build_pots(ledger: &Ledger) -> Vec<Pot> {
    let mut thresholds: Vec<u64> = ledger
        .records()
        .iter()
        .filter(|r| r.is_in && r.is_all_in && r.round_contribution > 0)
        .map(|r| r.round_contribution)
        .collect();
    thresholds.sort_unstable();
    thresholds.dedup();

    let max_contribution = ledger
        .records()
        .iter()
        .map(|r| r.round_contribution)
        .max()
        .unwrap_or(0);
    if max_contribution == 0 {
        return Vec::new();
    }
    if thresholds.last() != Some(&max_contribution) {
        thresholds.push(max_contribution);
    }

    let mut pots = Vec::with_capacity(thresholds.len());
    let mut prev = 0u64;
    for &threshold in &thresholds {
        let amount: u64 = ledger
            .records()
            .iter()
            .map(|r| r.round_contribution.min(threshold).saturating_sub(prev))
            .sum();
        let eligible: Vec<usize> = ledger
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_in && r.round_contribution >= threshold)
            .map(|(seat, _)| seat)
            .collect();
        debug!(threshold, amount, ?eligible, "formed pot");
        pots.push(Pot { amount, eligible });
        prev = threshold;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_contributions(entries: &[(u64, u64)]) -> Ledger {
        // (stack, contribution) per seat; contribution is committed so
        // a zero remaining stack marks the seat all-in.
        let mut ledger = Ledger::new(
            entries
                .iter()
                .enumerate()
                .map(|(i, (stack, _))| (format!("p{i}"), *stack)),
        );
        for (seat, (_, contribution)) in entries.iter().enumerate() {
            ledger.commit(seat, *contribution);
        }
        ledger
    }

    #[test]
    fn test_single_pot_when_no_all_ins() {
        let ledger = ledger_with_contributions(&[(100, 10), (100, 10), (100, 10)]);
        let pots = build_pots(&ledger);

        assert_eq!(1, pots.len());
        assert_eq!(30, pots[0].amount);
        assert_eq!(vec![0, 1, 2], pots[0].eligible);
    }

    #[test]
    fn test_three_way_all_in_unequal_stacks() {
        // Stacks 50/100/200, all shoved. The 200 stack's uncalled 100
        // comes back, leaving a 150 main pot for all three and a 100
        // side pot for the two larger stacks.
        let mut ledger = ledger_with_contributions(&[(50, 50), (100, 100), (200, 200)]);

        assert_eq!(100, return_uncalled(&mut ledger));
        assert_eq!(100, ledger.record(2).stack);

        let pots = build_pots(&ledger);
        assert_eq!(2, pots.len());
        assert_eq!(150, pots[0].amount);
        assert_eq!(vec![0, 1, 2], pots[0].eligible);
        assert_eq!(100, pots[1].amount);
        assert_eq!(vec![1, 2], pots[1].eligible);
    }

    #[test]
    fn test_pot_amounts_sum_to_contributions() {
        let mut ledger =
            ledger_with_contributions(&[(30, 30), (80, 80), (80, 80), (200, 120)]);
        let refunded = return_uncalled(&mut ledger);
        let contributions: u64 = ledger
            .records()
            .iter()
            .map(|r| r.round_contribution)
            .sum();

        let pots = build_pots(&ledger);
        let total: u64 = pots.iter().map(|p| p.amount).sum();
        assert_eq!(contributions, total);
        // 120 was matched at 80; the excess 40 went back.
        assert_eq!(40, refunded);
    }

    #[test]
    fn test_folded_contributions_feed_pots_but_not_eligibility() {
        // Seat 1 folds after contributing; their chips stay in the pot
        // but they can't win it.
        let mut ledger = ledger_with_contributions(&[(100, 20), (100, 20), (100, 20)]);
        ledger.fold(1);

        let pots = build_pots(&ledger);
        assert_eq!(1, pots.len());
        assert_eq!(60, pots[0].amount);
        assert_eq!(vec![0, 2], pots[0].eligible);
    }

    #[test]
    fn test_all_in_short_of_folders_bets() {
        // Seat 0 all-in for 10; seats 1 and 2 bet 30, seat 2 folds.
        // Main pot: 10 from each = 30, all eligible except the folder.
        // Side pot: the remaining 20 + 20, only seat 1 eligible.
        let mut ledger = ledger_with_contributions(&[(10, 10), (100, 30), (100, 30)]);
        ledger.fold(2);

        let pots = build_pots(&ledger);
        assert_eq!(2, pots.len());
        assert_eq!(30, pots[0].amount);
        assert_eq!(vec![0, 1], pots[0].eligible);
        assert_eq!(40, pots[1].amount);
        assert_eq!(vec![1], pots[1].eligible);
    }

    #[test]
    fn test_no_refund_when_top_contribution_matched() {
        let mut ledger = ledger_with_contributions(&[(100, 50), (100, 50)]);
        assert_eq!(0, return_uncalled(&mut ledger));
    }

    #[test]
    fn test_empty_ledger_contributions() {
        let ledger = Ledger::new(vec![("a".to_string(), 10), ("b".to_string(), 10)]);
        assert!(build_pots(&ledger).is_empty());
    }
}
