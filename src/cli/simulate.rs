//! Batch simulation command.

use super::{load_data, CliError, DataPaths};
use crate::board::BoardConfig;
use crate::card::CardDatabase;
use crate::game::SetupError;
use crate::simulation::{run_game, GameResult, SimulationSummary};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Options for the `simulate` command
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub games: u64,
    pub players: usize,
    pub max_turns: u32,
    pub seed: Option<u64>,
    pub verbose: bool,
    pub progress: bool,
    pub json: bool,
}

/// Play `options.games` seeded games in parallel, starting at `base_seed`.
/// The first game runs alone so setup errors surface before fanning out;
/// later games that fail are logged and left out.
pub fn run_batch(
    board: &BoardConfig,
    cards: &CardDatabase,
    base_seed: u64,
    options: &SimulateOptions,
    pb: Option<&ProgressBar>,
) -> Result<Vec<GameResult>, SetupError> {
    if options.games == 0 {
        return Ok(Vec::new());
    }

    let first = run_game(
        board,
        cards,
        base_seed,
        options.players,
        options.max_turns,
        options.verbose,
    )?;
    if let Some(pb) = pb {
        pb.inc(1);
    }

    let mut results: Vec<GameResult> = (1..options.games)
        .into_par_iter()
        .filter_map(|i| {
            let seed = base_seed.wrapping_add(i);
            let result = run_game(board, cards, seed, options.players, options.max_turns, false);
            if let Some(pb) = pb {
                pb.inc(1);
            }
            match result {
                Ok(result) => Some(result),
                Err(e) => {
                    log::warn!("seed {} dropped: {}", seed, e);
                    None
                }
            }
        })
        .collect();
    results.insert(0, first);
    Ok(results)
}

/// Run a batch of seeded games in parallel and print the aggregate statistics
pub fn execute(paths: &DataPaths, options: &SimulateOptions) -> Result<(), CliError> {
    let (board, cards) = load_data(paths)?;

    let base_seed = options.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    if !options.json {
        println!("\n=== Bangladeshi Monopoly Simulator ===\n");
        println!("Games: {}", options.games);
        println!("Players: {}", options.players);
        println!("Turn limit: {}", options.max_turns);
        println!("Seed: {}", base_seed);
        println!();
    }

    if options.games == 0 {
        println!("Nothing to simulate.");
        return Ok(());
    }

    let pb = if options.progress && !options.json {
        let pb = ProgressBar::new(options.games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let results = run_batch(&board, &cards, base_seed, options, pb.as_ref())?;
    let elapsed = start.elapsed();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let summary = SimulationSummary::from_results(&results, options.players);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== Results ===\n");
    println!(
        "Finished games: {:.1}% ({}/{})",
        summary.finish_rate() * 100.0,
        summary.finished,
        summary.games
    );
    println!("Average turns: {:.1}", summary.average_turns);
    println!("Average bankruptcies: {:.2}", summary.average_bankruptcies);
    println!();

    println!("Wins by seat:");
    for (seat, wins) in summary.wins_by_seat.iter().enumerate() {
        let pct = *wins as f64 / summary.games.max(1) as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  Player {}: {:5.1}% {} ({})", seat + 1, pct, bar, wins);
    }
    println!();

    println!("Net worth leader by seat:");
    for (seat, leads) in summary.leads_by_seat.iter().enumerate() {
        let pct = *leads as f64 / summary.games.max(1) as f64 * 100.0;
        println!("  Player {}: {:5.1}% ({})", seat + 1, pct, leads);
    }
    println!();
    println!(
        "Time: {:.2}s ({:.0} games/sec)",
        elapsed.as_secs_f64(),
        summary.games as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}
