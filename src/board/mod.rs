pub mod config;
pub mod types;

pub use config::{BoardConfig, ConfigError, RuleConfig};
pub use types::{Money, PlayerId, Tile, TileId, TileKind, HOTEL_RENT_INDEX, MAX_HOUSES};
