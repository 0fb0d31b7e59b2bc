use crate::board::types::{Money, Tile, TileId, TileKind, HOTEL_RENT_INDEX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_BOARD: &str = include_str!("../../data/board.json");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid board data: {0}")]
    InvalidBoard(String),
    #[error("Invalid card data: {0}")]
    InvalidCard(String),
}

/// Global rule parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub currency_symbol: String,
    pub go_payout: Money,
    pub house_cost: Money,
    pub hotel_cost: Money,
    /// Fraction of the price credited when mortgaging
    pub mortgage_rate: f64,
    pub jail_fine: Money,
    pub free_parking_jackpot: bool,
    pub starting_cash: Money,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            currency_symbol: "৳".to_string(),
            go_payout: 2000,
            house_cost: 1000,
            hotel_cost: 5000,
            mortgage_rate: 0.5,
            jail_fine: 500,
            free_parking_jackpot: false,
            starting_cash: 15000,
        }
    }
}

impl RuleConfig {
    /// Cash credited for mortgaging a tile of the given price
    pub fn mortgage_value(&self, price: Money) -> Money {
        (price as f64 * self.mortgage_rate).round() as Money
    }

    /// Cash required to lift a mortgage: mortgage value plus 10% interest
    pub fn unmortgage_cost(&self, price: Money) -> Money {
        (price as f64 * self.mortgage_rate * 1.1).round() as Money
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mortgage_rate > 0.0 && self.mortgage_rate <= 1.0) {
            return Err(ConfigError::InvalidBoard(format!(
                "Mortgage rate {} must be in (0, 1]",
                self.mortgage_rate
            )));
        }
        Ok(())
    }

    /// Format an amount with the currency symbol
    pub fn money(&self, amount: Money) -> String {
        format!("{} {}", self.currency_symbol, amount)
    }
}

/// Static board definition: tiles plus rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub rules: RuleConfig,
    pub tiles: Vec<Tile>,
}

impl BoardConfig {
    /// Load a board from a JSON file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a board definition
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: BoardConfig = serde_json::from_str(content)?;
        for tile in &mut config.tiles {
            tile.clear_ownership();
        }
        config.validate()?;
        Ok(config)
    }

    /// The canonical 40-tile board shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_BOARD)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Position of the jail tile
    pub fn jail_index(&self) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|t| t.kind == TileKind::JailVisiting)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiles.is_empty() {
            return Err(ConfigError::InvalidBoard("No tiles defined".to_string()));
        }

        let jail_count = self
            .tiles
            .iter()
            .filter(|t| t.kind == TileKind::JailVisiting)
            .count();
        if jail_count != 1 {
            return Err(ConfigError::InvalidBoard(format!(
                "Expected exactly one jail tile, found {}",
                jail_count
            )));
        }

        self.rules.validate()?;

        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.id != index {
                return Err(ConfigError::InvalidBoard(format!(
                    "Tile '{}' has id {} but sits at position {}",
                    tile.name, tile.id, index
                )));
            }
            if tile.kind.is_ownable() && tile.price <= 0 {
                return Err(ConfigError::InvalidBoard(format!(
                    "Tile '{}' is purchasable but has no price",
                    tile.name
                )));
            }
            match tile.kind {
                TileKind::Property => {
                    if tile.group.is_none() {
                        return Err(ConfigError::InvalidBoard(format!(
                            "Property '{}' has no color group",
                            tile.name
                        )));
                    }
                    if tile.rent.len() != HOTEL_RENT_INDEX + 1 {
                        return Err(ConfigError::InvalidBoard(format!(
                            "Property '{}' needs {} rent entries, found {}",
                            tile.name,
                            HOTEL_RENT_INDEX + 1,
                            tile.rent.len()
                        )));
                    }
                }
                TileKind::Station if tile.base_rent <= 0 => {
                    return Err(ConfigError::InvalidBoard(format!(
                        "Station '{}' has no base rent",
                        tile.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
