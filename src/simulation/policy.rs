use crate::board::{Money, TileId, TileKind, MAX_HOUSES};
use crate::game::{GameState, JailAction};
use crate::simulation::driver::Prompter;

/// Deterministic decisions for batch simulation: buy whatever is affordable,
/// leave jail by card, then by fine, otherwise roll, and build evenly while
/// cash stays above a reserve.
#[derive(Debug, Clone)]
pub struct FixedPolicy {
    /// Cash kept back when buying
    pub purchase_reserve: Money,
    /// Cash kept back when building
    pub build_reserve: Money,
}

impl Default for FixedPolicy {
    fn default() -> Self {
        FixedPolicy {
            purchase_reserve: 0,
            build_reserve: 3000,
        }
    }
}

impl Prompter for FixedPolicy {
    fn confirm_purchase(&mut self, state: &GameState, tile: TileId) -> bool {
        match state.tile(tile) {
            Some(t) => state.current_player().cash - t.price >= self.purchase_reserve,
            None => false,
        }
    }

    fn choose_jail_action(&mut self, state: &GameState) -> JailAction {
        let player = state.current_player();
        if player.jail_free_cards > 0 {
            JailAction::UseCard
        } else if player.cash >= state.rules.jail_fine {
            JailAction::PayFine
        } else {
            JailAction::RollDoubles
        }
    }

    fn choose_build(&mut self, state: &GameState) -> Option<TileId> {
        let player = state.current_player_id();
        let cash = state.current_player().cash;

        // Lowest improvement level first keeps building even
        state
            .owned_tiles(player)
            .into_iter()
            .filter(|t| t.kind == TileKind::Property && !t.has_hotel && !t.is_mortgaged)
            .filter(|t| {
                t.group
                    .as_deref()
                    .map(|g| state.owns_group(player, g) && !state.group_tiles(g).any(|s| s.is_mortgaged))
                    .unwrap_or(false)
            })
            .filter(|t| {
                let cost = if t.houses >= MAX_HOUSES {
                    state.rules.hotel_cost
                } else {
                    state.rules.house_cost
                };
                cash - cost >= self.build_reserve
            })
            .filter(|t| {
                t.group
                    .as_deref()
                    .map(|g| state.group_tiles(g).all(|s| s.improvement_level() >= t.improvement_level()))
                    .unwrap_or(false)
            })
            .min_by_key(|t| (t.improvement_level(), t.id))
            .map(|t| t.id)
    }
}
