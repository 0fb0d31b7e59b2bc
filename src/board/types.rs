use serde::{Deserialize, Serialize};

/// Amount of currency. Signed because a player may dip below zero
/// until bankruptcy is resolved.
pub type Money = i64;

/// Stable, 0-indexed player identifier
pub type PlayerId = usize;

/// Index of a tile on the board (equal to its position)
pub type TileId = usize;

/// Rent schedule index used when a hotel stands on the property
pub const HOTEL_RENT_INDEX: usize = 5;

/// Maximum number of houses before a hotel replaces them
pub const MAX_HOUSES: u8 = 4;

/// Tile types on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Go,
    Property,
    Station,
    Utility,
    Tax,
    Event,
    LocalNews,
    JailVisiting,
    FreeParking,
    GotoJail,
}

impl TileKind {
    /// Whether a player can buy this tile
    pub fn is_ownable(&self) -> bool {
        matches!(self, TileKind::Property | TileKind::Station | TileKind::Utility)
    }
}

/// One board position: immutable configuration plus mutable ownership state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub name: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub price: Money,
    /// Rent for 0..=4 houses followed by the hotel rent
    #[serde(default)]
    pub rent: Vec<Money>,
    #[serde(default)]
    pub base_rent: Money,
    #[serde(default)]
    pub payout: Money,
    #[serde(default)]
    pub amount: Money,

    // Ownership state
    #[serde(default)]
    pub owner: Option<PlayerId>,
    #[serde(default)]
    pub houses: u8,
    #[serde(default)]
    pub has_hotel: bool,
    #[serde(default)]
    pub is_mortgaged: bool,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind, name: &str) -> Self {
        Tile {
            id,
            kind,
            name: name.to_string(),
            name_bn: None,
            group: None,
            price: 0,
            rent: Vec::new(),
            base_rent: 0,
            payout: 0,
            amount: 0,
            owner: None,
            houses: 0,
            has_hotel: false,
            is_mortgaged: false,
        }
    }

    /// Improvement level used for even-building comparisons: houses, or 5 with a hotel
    pub fn improvement_level(&self) -> u8 {
        if self.has_hotel {
            MAX_HOUSES + 1
        } else {
            self.houses
        }
    }

    pub fn has_improvements(&self) -> bool {
        self.houses > 0 || self.has_hotel
    }

    /// Whether this tile is a property of the given color group
    pub fn in_group(&self, group: &str) -> bool {
        self.kind == TileKind::Property && self.group.as_deref() == Some(group)
    }

    /// Rent schedule entry for the current improvements
    pub fn scheduled_rent(&self) -> Money {
        let index = if self.has_hotel {
            HOTEL_RENT_INDEX
        } else {
            self.houses as usize
        };
        self.rent.get(index).copied().unwrap_or(0)
    }

    /// Return the tile to the bank with no improvements
    pub fn clear_ownership(&mut self) {
        self.owner = None;
        self.houses = 0;
        self.has_hotel = false;
        self.is_mortgaged = false;
    }
}
