use crate::board::{Money, PlayerId, RuleConfig, Tile, TileId, TileKind};
use serde::{Deserialize, Serialize};

/// A participant in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub cash: Money,
    pub position: TileId,
    /// Owned tile ids in purchase order
    pub properties: Vec<TileId>,
    pub in_jail: bool,
    pub jail_turns: u8,
    pub jail_free_cards: u32,
    /// Consecutive doubles this turn
    pub doubles_rolled: u8,
    pub is_bankrupt: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, cash: Money) -> Self {
        Player {
            id,
            name: name.to_string(),
            cash,
            position: 0,
            properties: Vec::new(),
            in_jail: false,
            jail_turns: 0,
            jail_free_cards: 0,
            doubles_rolled: 0,
            is_bankrupt: false,
        }
    }

    pub fn add_cash(&mut self, amount: Money) {
        self.cash += amount;
    }

    /// Unchecked: cash may go negative. Callers resolve insolvency.
    pub fn deduct_cash(&mut self, amount: Money) {
        self.cash -= amount;
    }

    pub fn owns(&self, tile_id: TileId) -> bool {
        self.properties.contains(&tile_id)
    }

    pub fn is_insolvent(&self) -> bool {
        self.cash < 0
    }

    /// Cash plus purchase price and improvement cost of every owned tile
    pub fn net_worth(&self, tiles: &[Tile], rules: &RuleConfig) -> Money {
        let holdings: Money = self
            .properties
            .iter()
            .filter_map(|id| tiles.get(*id))
            .map(|tile| {
                let mut value = tile.price;
                if tile.kind == TileKind::Property {
                    value += tile.houses as Money * rules.house_cost;
                    if tile.has_hotel {
                        value += rules.hotel_cost;
                    }
                }
                value
            })
            .sum();
        self.cash + holdings
    }
}
