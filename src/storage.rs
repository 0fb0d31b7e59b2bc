//! Game save/load
//!
//! A save is a full snapshot of the game state written as JSON under a
//! single fixed key. Loading reconciles the snapshot onto the live board by
//! tile id, so only ownership state is taken from the file.

use crate::game::{GameState, TurnPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Key the save is stored under
pub const SAVE_KEY: &str = "bangladeshi_monopoly_save";

/// Save format version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Save does not fit the current board: {0}")]
    Incompatible(String),
}

/// Minimal string key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and simulations
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Complete save data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: GameState,
}

/// Write a snapshot of the game
pub fn save_game(store: &mut dyn KeyValueStore, state: &GameState) -> Result<(), StorageError> {
    let save = SaveData {
        version: SAVE_VERSION,
        saved_at: Utc::now(),
        state: state.clone(),
    };
    let json = serde_json::to_string_pretty(&save)?;
    store.set(SAVE_KEY, &json)?;
    log::info!("Game saved ({} players, turn {})", state.players.len(), state.turn);
    Ok(())
}

/// Restore the saved game into `state`. Returns false when there is no save.
/// The live state is untouched on any error.
pub fn load_game(store: &dyn KeyValueStore, state: &mut GameState) -> Result<bool, StorageError> {
    let Some(json) = store.get(SAVE_KEY)? else {
        log::info!("No saved game found");
        return Ok(false);
    };
    let save: SaveData = serde_json::from_str(&json)?;
    if save.version != SAVE_VERSION {
        return Err(StorageError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    check_compatible(&save.state, state)?;

    let saved = save.state;
    for tile in &mut state.tiles {
        tile.clear_ownership();
    }
    for saved_tile in &saved.tiles {
        if let Some(tile) = state.tiles.iter_mut().find(|t| t.id == saved_tile.id) {
            tile.owner = saved_tile.owner;
            tile.houses = saved_tile.houses;
            tile.has_hotel = saved_tile.has_hotel;
            tile.is_mortgaged = saved_tile.is_mortgaged;
        }
    }

    let count = saved.players.len();
    state.players.retain(|p| p.id < count);
    for player in saved.players {
        match state.players.iter_mut().find(|p| p.id == player.id) {
            Some(live) => *live = player,
            None => state.players.push(player),
        }
    }
    state.players.sort_by_key(|p| p.id);
    state.current_player_index = saved.current_player_index;
    state.dice = saved.dice;
    state.free_parking_pot = saved.free_parking_pot;
    state.rules = saved.rules;
    state.turn = saved.turn;
    state.event_deck = saved.event_deck;
    state.local_news_deck = saved.local_news_deck;
    state.phase = match saved.phase {
        phase if phase.is_resolving() => TurnPhase::AwaitingRoll,
        TurnPhase::NotStarted => TurnPhase::AwaitingRoll,
        phase => phase,
    };
    state.running = !state.is_game_over();
    state.take_events();

    log::info!("Game loaded (saved {})", save.saved_at.format("%Y-%m-%d %H:%M:%S"));
    Ok(true)
}

/// Delete the saved game, if any
pub fn clear_save(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(SAVE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}

/// Whether a save exists
pub fn has_save(store: &dyn KeyValueStore) -> Result<bool, StorageError> {
    Ok(store.get(SAVE_KEY)?.is_some())
}

fn check_compatible(saved: &GameState, live: &GameState) -> Result<(), StorageError> {
    let incompatible = |reason: String| Err(StorageError::Incompatible(reason));
    let board_len = live.board_len();

    if saved.players.is_empty() {
        return incompatible("no players".to_string());
    }
    let mut ids: Vec<usize> = saved.players.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    if ids.iter().enumerate().any(|(index, id)| index != *id) {
        return incompatible("player ids are not 0..n".to_string());
    }
    if saved.current_player_index >= saved.players.len() {
        return incompatible(format!("current player {} out of range", saved.current_player_index));
    }
    for player in &saved.players {
        if player.position >= board_len {
            return incompatible(format!("{} stands off the board", player.name));
        }
        if player.properties.iter().any(|id| *id >= board_len) {
            return incompatible(format!("{} owns a tile not on the board", player.name));
        }
    }
    for tile in &saved.tiles {
        let Some(live_tile) = live.tile(tile.id) else {
            return incompatible(format!("tile {} not on the board", tile.id));
        };
        if live_tile.kind != tile.kind {
            return incompatible(format!("tile {} changed type", tile.id));
        }
        if tile.owner.map_or(false, |owner| owner >= saved.players.len()) {
            return incompatible(format!("tile {} has an unknown owner", tile.id));
        }
    }

    if let Err(e) = saved.rules.validate() {
        return incompatible(e.to_string());
    }

    let Some(current) = saved.players.iter().find(|p| p.id == saved.current_player_index) else {
        return incompatible(format!("current player {} missing", saved.current_player_index));
    };
    let game_over = matches!(saved.phase, TurnPhase::GameOver { .. });
    if current.is_bankrupt && !game_over {
        return incompatible(format!("current player {} is bankrupt", current.name));
    }
    match saved.phase {
        TurnPhase::AwaitingBuyDecision { tile_id } => {
            let Some(live_tile) = live.tile(tile_id) else {
                return incompatible(format!("pending purchase of tile {} not on the board", tile_id));
            };
            if !live_tile.kind.is_ownable() {
                return incompatible(format!("pending purchase of {} which cannot be bought", live_tile.name));
            }
            let owned = saved
                .tiles
                .iter()
                .find(|t| t.id == tile_id)
                .map_or(false, |t| t.owner.is_some());
            if owned {
                return incompatible(format!("pending purchase of {} which is already owned", live_tile.name));
            }
        }
        TurnPhase::InJail if !current.in_jail => {
            return incompatible(format!("{} awaits a jail decision but is not in Thana", current.name));
        }
        TurnPhase::GameOver { winner: Some(winner) } if winner >= saved.players.len() => {
            return incompatible(format!("winner {} out of range", winner));
        }
        _ => {}
    }
    Ok(())
}
