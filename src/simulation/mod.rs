pub mod driver;
pub mod engine;
pub mod policy;

pub use driver::{play_turn, Prompter};
pub use engine::{run_game, GameResult, SimulationSummary};
pub use policy::FixedPolicy;
