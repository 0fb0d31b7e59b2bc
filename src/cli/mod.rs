//! Command implementations for the terminal front-end.

pub mod play;
pub mod simulate;
pub mod validate;

use crate::board::{BoardConfig, ConfigError};
use crate::card::{parse_deck_file, CardDatabase, DeckKind};
use crate::game::{ActionError, SetupError};
use crate::storage::StorageError;
use thiserror::Error;

/// Failure of a CLI command
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Game error: {0}")]
    Action(#[from] ActionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the board and decks come from. `None` means the built-in data.
#[derive(Debug, Clone, Default)]
pub struct DataPaths {
    pub board: Option<String>,
    pub events: Option<String>,
    pub news: Option<String>,
}

/// Load and cross-check the board and both decks
pub fn load_data(paths: &DataPaths) -> Result<(BoardConfig, CardDatabase), CliError> {
    let board = match &paths.board {
        Some(path) => BoardConfig::from_file(path)?,
        None => BoardConfig::builtin()?,
    };
    let builtin = CardDatabase::builtin()?;
    let event = match &paths.events {
        Some(path) => parse_deck_file(path)?,
        None => builtin.cards(DeckKind::Event).to_vec(),
    };
    let local_news = match &paths.news {
        Some(path) => parse_deck_file(path)?,
        None => builtin.cards(DeckKind::LocalNews).to_vec(),
    };
    let cards = CardDatabase::new(event, local_news);
    cards.validate(&board)?;
    log::info!(
        "Loaded board with {} tiles and {} cards",
        board.len(),
        cards.card_count()
    );
    Ok((board, cards))
}
