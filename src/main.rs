use bangla_monopoly::cli::simulate::SimulateOptions;
use bangla_monopoly::cli::{play, simulate, validate, CliError, DataPaths};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bangla-monopoly")]
#[command(about = "Bangladeshi Monopoly rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board configuration JSON (defaults to the built-in board)
    #[arg(short, long, global = true)]
    board: Option<String>,

    /// Event deck JSON
    #[arg(long, global = true)]
    events: Option<String>,

    /// Local news deck JSON
    #[arg(long, global = true)]
    news: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a hot-seat game in the terminal (default)
    Play {
        /// Player names (2-6)
        #[arg(default_values_t = vec!["Player 1".to_string(), "Player 2".to_string()])]
        names: Vec<String>,

        /// Seed for reproducible dice and shuffles
        #[arg(short, long)]
        seed: Option<u64>,

        /// Enable the Free Parking jackpot
        #[arg(short, long)]
        jackpot: bool,

        /// Directory for the saved game
        #[arg(long, default_value = ".")]
        save_dir: String,

        /// Resume the saved game
        #[arg(short, long)]
        resume: bool,
    },

    /// Simulate a batch of games with a fixed policy
    Simulate {
        /// Number of games to simulate
        #[arg(short = 'n', long, default_value = "1000")]
        games: u64,

        /// Players per game
        #[arg(short, long, default_value = "4")]
        players: usize,

        /// Turn limit per game
        #[arg(short, long, default_value = "500")]
        max_turns: u32,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the events of the first game
        #[arg(short, long)]
        verbose: bool,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the board and deck configuration
    Validate,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let paths = DataPaths {
        board: cli.board,
        events: cli.events,
        news: cli.news,
    };

    let result: Result<(), CliError> = match cli.command {
        Some(Commands::Play {
            names,
            seed,
            jackpot,
            save_dir,
            resume,
        }) => play::execute(&paths, names, seed, jackpot, &save_dir, resume),
        Some(Commands::Simulate {
            games,
            players,
            max_turns,
            seed,
            verbose,
            progress,
            json,
        }) => simulate::execute(
            &paths,
            &SimulateOptions {
                games,
                players,
                max_turns,
                seed,
                verbose,
                progress,
                json,
            },
        ),
        Some(Commands::Validate) => validate::execute(&paths),
        None => play::execute(
            &paths,
            vec!["Player 1".to_string(), "Player 2".to_string()],
            None,
            false,
            ".",
            false,
        ),
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
