//! The multi-round tournament driver and its builder.
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::agent::{Agent, GameSetup};
use super::errors::EngineError;
use super::round::{Round, RoundSeat};

/// The most players one table can seat. Two hole cards each plus five
/// community cards fits a single deck with room to spare at nine.
pub const MAX_PLAYERS: usize = 9;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TournamentBuilderError {
    #[error("a tournament needs at least two players, got {0}")]
    TooFewPlayers(usize),

    #[error("a table seats at most {MAX_PLAYERS} players, got {0}")]
    TooManyPlayers(usize),

    #[error("duplicate player id {0:?}")]
    DuplicatePlayerId(String),

    #[error("blinds must satisfy 0 < small <= big, got {small_blind}/{big_blind}")]
    BadBlinds { small_blind: u64, big_blind: u64 },

    #[error("starting stack {stack} cannot cover the big blind {big_blind}")]
    StackTooSmall { stack: u64, big_blind: u64 },

    #[error("the tournament must last at least one round")]
    NoRounds,
}

/// Configures and validates a [`Tournament`]. Seating order is the
/// order of the `agent` calls.
pub struct TournamentBuilder {
    agents: Vec<(String, Box<dyn Agent>)>,
    starting_stack: u64,
    small_blind: u64,
    big_blind: u64,
    rounds: u32,
    bet_timeout: Duration,
    max_faults: u32,
    seed: Option<u64>,
}

impl Default for TournamentBuilder {
    fn default() -> Self {
        TournamentBuilder {
            agents: Vec::new(),
            starting_stack: 100,
            small_blind: 1,
            big_blind: 2,
            rounds: 100,
            bet_timeout: Duration::from_secs(1),
            max_faults: 3,
            seed: None,
        }
    }
}

impl TournamentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat an agent under the given id.
    pub fn agent(mut self, player_id: impl Into<String>, agent: Box<dyn Agent>) -> Self {
        self.agents.push((player_id.into(), agent));
        self
    }

    pub fn starting_stack(mut self, stack: u64) -> Self {
        self.starting_stack = stack;
        self
    }

    pub fn blinds(mut self, small_blind: u64, big_blind: u64) -> Self {
        self.small_blind = small_blind;
        self.big_blind = big_blind;
        self
    }

    /// Upper bound on rounds played; the tournament stops earlier once
    /// fewer than two players can still bet.
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Wall-clock budget for a single `place_bet` call. An agent that
    /// overruns it is folded for that decision and charged a fault.
    pub fn bet_timeout(mut self, timeout: Duration) -> Self {
        self.bet_timeout = timeout;
        self
    }

    /// Faults (panics, timeouts) an agent may accumulate before it is
    /// removed from play.
    pub fn max_faults(mut self, max_faults: u32) -> Self {
        self.max_faults = max_faults;
        self
    }

    /// Fix the RNG seed for reproducible shuffles and tie-breaks.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Tournament, TournamentBuilderError> {
        if self.agents.len() < 2 {
            return Err(TournamentBuilderError::TooFewPlayers(self.agents.len()));
        }
        if self.agents.len() > MAX_PLAYERS {
            return Err(TournamentBuilderError::TooManyPlayers(self.agents.len()));
        }
        let mut seen = HashSet::new();
        for (player_id, _) in &self.agents {
            if !seen.insert(player_id.clone()) {
                return Err(TournamentBuilderError::DuplicatePlayerId(player_id.clone()));
            }
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(TournamentBuilderError::BadBlinds {
                small_blind: self.small_blind,
                big_blind: self.big_blind,
            });
        }
        if self.starting_stack < self.big_blind {
            return Err(TournamentBuilderError::StackTooSmall {
                stack: self.starting_stack,
                big_blind: self.big_blind,
            });
        }
        if self.rounds == 0 {
            return Err(TournamentBuilderError::NoRounds);
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let seats = self
            .agents
            .into_iter()
            .map(|(player_id, agent)| TournamentSeat {
                player_id,
                agent,
                stack: self.starting_stack,
                faults: 0,
                eliminated: false,
            })
            .collect();
        Ok(Tournament {
            seats,
            starting_stack: self.starting_stack,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            rounds: self.rounds,
            bet_timeout: self.bet_timeout,
            max_faults: self.max_faults,
            rng,
            button: 0,
            initialized: false,
        })
    }
}

struct TournamentSeat {
    player_id: String,
    agent: Box<dyn Agent>,
    stack: u64,
    faults: u32,
    /// Removed from play for exceeding the fault limit. The stack is
    /// frozen where it stood.
    eliminated: bool,
}

impl TournamentSeat {
    fn can_play(&self) -> bool {
        self.stack > 0 && !self.eliminated
    }
}

/// One player's final line in the tournament result.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub player_id: String,
    pub stack: u64,
    pub faults: u32,
    pub eliminated: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentResult {
    /// Final stacks, largest first.
    pub standings: Vec<Standing>,
    pub rounds_played: u32,
}

/// Runs agents against each other for a fixed number of rounds, built
/// through [`TournamentBuilder`]. The dealer button rotates among the
/// players who can still bet; bankrupt players sit out.
pub struct Tournament {
    seats: Vec<TournamentSeat>,
    starting_stack: u64,
    small_blind: u64,
    big_blind: u64,
    rounds: u32,
    bet_timeout: Duration,
    max_faults: u32,
    rng: StdRng,
    /// Seat index of the current dealer.
    button: usize,
    initialized: bool,
}

impl Tournament {
    /// Play the tournament: `init` each agent once, then rounds until
    /// the round budget runs out or fewer than two players can bet.
    pub fn run(&mut self) -> Result<TournamentResult, EngineError> {
        if !self.initialized {
            self.init_agents();
            self.initialized = true;
        }

        let mut rounds_played = 0;
        for round_no in 0..self.rounds {
            if self.seats.iter().filter(|s| s.can_play()).count() < 2 {
                info!(round_no, "tournament over early, one player left");
                break;
            }
            self.play_round(round_no)?;
            rounds_played = round_no + 1;
            self.advance_button();
        }

        let mut standings: Vec<Standing> = self
            .seats
            .iter()
            .map(|s| Standing {
                player_id: s.player_id.clone(),
                stack: s.stack,
                faults: s.faults,
                eliminated: s.eliminated,
            })
            .collect();
        standings.sort_by(|a, b| b.stack.cmp(&a.stack).then(a.player_id.cmp(&b.player_id)));
        Ok(TournamentResult {
            standings,
            rounds_played,
        })
    }

    fn init_agents(&mut self) {
        let rounds = self.rounds;
        let (starting_money, small_blind, big_blind) =
            (self.starting_stack, self.small_blind, self.big_blind);
        let max_faults = self.max_faults;
        for seat in &mut self.seats {
            let setup = GameSetup {
                player_id: seat.player_id.clone(),
                starting_money,
                rounds,
                small_blind,
                big_blind,
            };
            let agent = seat.agent.as_mut();
            if catch_unwind(AssertUnwindSafe(|| agent.init(&setup))).is_err() {
                warn!(player_id = %seat.player_id, "agent panicked in init");
                seat.faults += 1;
                if seat.faults > max_faults {
                    seat.eliminated = true;
                }
            }
        }
    }

    fn play_round(&mut self, round_no: u32) -> Result<(), EngineError> {
        let button = self.button;
        let mut active: Vec<(usize, &mut TournamentSeat)> = self
            .seats
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.can_play())
            .collect();
        // Seat the dealer first, then the rest in table order.
        let pivot = active
            .iter()
            .position(|(idx, _)| *idx == button)
            .unwrap_or(0);
        active.rotate_left(pivot);

        debug!(
            round_no,
            dealer = %active[0].1.player_id,
            players = active.len(),
            "starting round"
        );

        let round_seats: Vec<RoundSeat<'_>> = active
            .iter_mut()
            .map(|(_, s)| RoundSeat {
                agent: s.agent.as_mut(),
                player_id: s.player_id.clone(),
                stack: s.stack,
                faults: s.faults,
            })
            .collect();
        let round = Round::new(
            round_seats,
            self.small_blind,
            self.big_blind,
            self.bet_timeout,
            &mut self.rng,
        );
        let outcome = round.run()?;

        for (order, (_, seat)) in active.iter_mut().enumerate() {
            seat.stack = outcome.stacks[order];
            seat.faults = outcome.faults[order];
            if seat.faults > self.max_faults && !seat.eliminated {
                warn!(
                    player_id = %seat.player_id,
                    faults = seat.faults,
                    "agent exceeded the fault limit, removing it from play"
                );
                seat.eliminated = true;
            }
        }
        Ok(())
    }

    /// Move the button to the next seat that can still bet.
    fn advance_button(&mut self) {
        let n = self.seats.len();
        for step in 1..=n {
            let idx = (self.button + step) % n;
            if self.seats[idx].can_play() {
                self.button = idx;
                return;
            }
        }
    }
}
