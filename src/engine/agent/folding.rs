use super::{Agent, BetView, GameSetup, HoleCards, RoundSummary, SeatState, FOLD};

/// An agent that gives up on any real decision: it checks when that is
/// free and folds otherwise. Useful as a baseline opponent.
#[derive(Debug, Clone, Default)]
pub struct FoldingAgent {
    player_id: String,
}

impl Agent for FoldingAgent {
    fn init(&mut self, setup: &GameSetup) {
        self.player_id = setup.player_id.clone();
    }

    fn start_round(&mut self, _players: &[SeatState], _hand: HoleCards) {}

    fn place_bet(&mut self, view: &BetView<'_>) -> i64 {
        let own_bet = view
            .players
            .iter()
            .find(|p| p.player_id == self.player_id)
            .map(|p| p.bet)
            .unwrap_or(0);

        if own_bet == view.current_bet {
            // Checking is free.
            view.current_bet as i64
        } else {
            FOLD
        }
    }

    fn end_round(&mut self, _summary: &RoundSummary) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlayerStatus;

    #[test]
    fn test_checks_when_free_folds_otherwise() {
        let mut agent = FoldingAgent::default();
        agent.init(&GameSetup {
            player_id: "f".to_string(),
            starting_money: 100,
            rounds: 1,
            small_blind: 1,
            big_blind: 2,
        });

        let statuses = vec![PlayerStatus {
            player_id: "f".to_string(),
            is_in: true,
            bet: 0,
            bet_history: vec![],
        }];

        let check = BetView {
            table_cards: &[],
            current_bet: 0,
            players: &statuses,
        };
        assert_eq!(0, agent.place_bet(&check));

        let must_pay = BetView {
            table_cards: &[],
            current_bet: 10,
            players: &statuses,
        };
        assert_eq!(FOLD, agent.place_bet(&must_pay));
    }
}
