use crate::board::{BoardConfig, Money, PlayerId};
use crate::card::CardDatabase;
use crate::game::{new_game, GameEvent, GameState, SetupError};
use crate::rng::GameRng;
use crate::simulation::driver::play_turn;
use crate::simulation::policy::FixedPolicy;
use serde::Serialize;

/// Result of a single game simulation
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub seed: u64,
    /// Last player standing (None if the turn limit was hit first)
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub bankruptcies: usize,
    /// Net worth per player at the end, by player id
    pub final_net_worth: Vec<Money>,
}

impl GameResult {
    pub fn finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Player with the highest final net worth
    pub fn leader(&self) -> Option<PlayerId> {
        self.final_net_worth
            .iter()
            .enumerate()
            .max_by_key(|(_, worth)| **worth)
            .map(|(id, _)| id)
    }
}

/// Play one seeded game with every seat driven by the fixed policy
pub fn run_game(
    board: &BoardConfig,
    cards: &CardDatabase,
    seed: u64,
    players: usize,
    max_turns: u32,
    verbose: bool,
) -> Result<GameResult, SetupError> {
    let mut rng = GameRng::new(Some(seed));
    let names: Vec<String> = (1..=players).map(|i| format!("Player {}", i)).collect();
    let mut state = new_game(board, cards, &names, &mut rng)?;
    let mut policy = FixedPolicy::default();

    if verbose {
        println!("=== Game Start (seed: {}, {} players) ===", seed, players);
    }

    while state.running && state.turn <= max_turns {
        match play_turn(&mut state, &mut rng, &mut policy) {
            Ok(events) => {
                if verbose {
                    print_events(&state, &events);
                }
            }
            Err(e) => {
                log::error!("seed {}: turn {} stopped: {}", seed, state.turn, e);
                break;
            }
        }
    }

    if verbose {
        println!("=== Game End after {} turns ===", state.turn);
        for (id, worth) in state.standings() {
            println!("  {:<10} {}", state.players[id].name, state.rules.money(worth));
        }
    }

    Ok(summarize(&state, seed))
}

fn print_events(state: &GameState, events: &[GameEvent]) {
    for event in events {
        println!("  {}", event.describe(state));
    }
}

fn summarize(state: &GameState, seed: u64) -> GameResult {
    GameResult {
        seed,
        winner: state.winner(),
        turns: state.turn,
        bankruptcies: state.players.iter().filter(|p| p.is_bankrupt).count(),
        final_net_worth: state.players.iter().map(|p| state.net_worth(p.id)).collect(),
    }
}

/// Aggregate statistics over a batch of games
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub finished: usize,
    pub wins_by_seat: Vec<usize>,
    pub leads_by_seat: Vec<usize>,
    pub average_turns: f64,
    pub average_bankruptcies: f64,
}

impl SimulationSummary {
    pub fn from_results(results: &[GameResult], players: usize) -> Self {
        let mut summary = SimulationSummary {
            games: results.len(),
            wins_by_seat: vec![0; players],
            leads_by_seat: vec![0; players],
            ..Default::default()
        };
        if results.is_empty() {
            return summary;
        }

        for result in results {
            if let Some(winner) = result.winner {
                summary.finished += 1;
                if let Some(count) = summary.wins_by_seat.get_mut(winner) {
                    *count += 1;
                }
            }
            if let Some(count) = result.leader().and_then(|id| summary.leads_by_seat.get_mut(id)) {
                *count += 1;
            }
        }
        let n = results.len() as f64;
        summary.average_turns = results.iter().map(|r| r.turns as f64).sum::<f64>() / n;
        summary.average_bankruptcies = results.iter().map(|r| r.bankruptcies as f64).sum::<f64>() / n;
        summary
    }

    pub fn finish_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.finished as f64 / self.games as f64
        }
    }
}
