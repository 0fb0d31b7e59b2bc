use crate::board::{Money, PlayerId, TileId};
use crate::game::events::GameEvent;
use crate::game::state::GameState;
use crate::game::turns::{advance_turn, check_game_over};

/// Resolve bankruptcy if a payment left the player with negative cash
pub(crate) fn check_solvency(state: &mut GameState, player: PlayerId, creditor: Option<PlayerId>) {
    let p = &state.players[player];
    if p.is_insolvent() && !p.is_bankrupt {
        declare_bankruptcy(state, player, creditor);
    }
}

/// Remove a player from the game.
///
/// Buildings are sold back to the bank at half cost (a hotel is not converted
/// back into houses), properties pass unmortgaged to the creditor or return to
/// the bank, and the remaining cash, negative or not, follows them. The turn
/// advances if the bankrupt player was active.
pub(crate) fn declare_bankruptcy(state: &mut GameState, player: PlayerId, creditor: Option<PlayerId>) {
    if state.players[player].is_bankrupt {
        return;
    }
    log::warn!(
        "{} is bankrupt with {} cash",
        state.players[player].name,
        state.players[player].cash
    );
    state.players[player].is_bankrupt = true;

    let holdings: Vec<TileId> = state
        .tiles
        .iter()
        .filter(|t| t.owner == Some(player))
        .map(|t| t.id)
        .collect();

    for tile_id in holdings {
        let liquidated = liquidate_improvements(state, tile_id);
        if liquidated > 0 {
            state.players[player].add_cash(liquidated);
            state.emit(GameEvent::ImprovementsLiquidated {
                player,
                tile: tile_id,
                amount: liquidated,
            });
        }
        transfer_tile(state, tile_id, player, creditor);
    }

    let remaining = state.players[player].cash;
    if let Some(to) = creditor {
        state.players[to].add_cash(remaining);
    }
    state.emit(GameEvent::CashTransferred {
        from: player,
        to: creditor,
        amount: remaining,
    });

    let p = &mut state.players[player];
    p.cash = 0;
    p.properties.clear();
    p.jail_free_cards = 0;
    p.in_jail = false;
    p.jail_turns = 0;
    p.doubles_rolled = 0;
    state.emit(GameEvent::PlayerBankrupt { player, creditor });

    if player == state.current_player_id() {
        advance_turn(state);
    } else {
        check_game_over(state);
    }
}

/// Strip buildings from a tile, returning the half-cost proceeds
fn liquidate_improvements(state: &mut GameState, tile_id: TileId) -> Money {
    let (house_cost, hotel_cost) = (state.rules.house_cost, state.rules.hotel_cost);
    let tile = &mut state.tiles[tile_id];
    let mut proceeds = 0;
    if tile.has_hotel {
        proceeds += hotel_cost / 2;
        tile.has_hotel = false;
    } else {
        proceeds += tile.houses as Money * (house_cost / 2);
    }
    tile.houses = 0;
    proceeds
}

fn transfer_tile(state: &mut GameState, tile_id: TileId, from: PlayerId, to: Option<PlayerId>) {
    match to {
        Some(creditor) => {
            let tile = &mut state.tiles[tile_id];
            tile.owner = Some(creditor);
            tile.is_mortgaged = false;
            let holdings = &mut state.players[creditor].properties;
            if !holdings.contains(&tile_id) {
                holdings.push(tile_id);
            }
        }
        None => state.tiles[tile_id].clear_ownership(),
    }
    state.emit(GameEvent::PropertyTransferred { tile: tile_id, from, to });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;
    use crate::card::CardDatabase;
    use crate::game::state::{new_game, TurnPhase};
    use crate::rng::GameRng;

    fn setup(players: usize) -> GameState {
        let board = BoardConfig::builtin().expect("board");
        let cards = CardDatabase::builtin().expect("cards");
        let mut rng = GameRng::new(Some(11));
        let names: Vec<String> = (0..players).map(|i| format!("P{}", i)).collect();
        new_game(&board, &cards, &names, &mut rng).expect("game should start")
    }

    fn give(state: &mut GameState, player: PlayerId, tile: TileId) {
        state.tiles[tile].owner = Some(player);
        state.players[player].properties.push(tile);
    }

    #[test]
    fn test_bankruptcy_to_creditor_transfers_everything() {
        let mut state = setup(3);
        give(&mut state, 0, 1);
        give(&mut state, 0, 3);
        give(&mut state, 0, 5);
        state.tiles[1].houses = 2;
        state.tiles[3].has_hotel = true;
        state.tiles[5].is_mortgaged = true;
        state.players[0].cash = -300;
        let creditor_cash = state.players[1].cash;

        declare_bankruptcy(&mut state, 0, Some(1));

        let proceeds = 2 * (state.rules.house_cost / 2) + state.rules.hotel_cost / 2;
        assert_eq!(state.players[1].cash, creditor_cash - 300 + proceeds);
        for tile in [1, 3, 5] {
            assert_eq!(state.tiles[tile].owner, Some(1));
            assert!(!state.tiles[tile].is_mortgaged, "transferred unmortgaged");
            assert!(!state.tiles[tile].has_improvements());
            assert!(state.players[1].owns(tile));
        }
        let p = &state.players[0];
        assert!(p.is_bankrupt);
        assert_eq!(p.cash, 0);
        assert!(p.properties.is_empty());
    }

    #[test]
    fn test_bankruptcy_without_creditor_returns_to_bank() {
        let mut state = setup(3);
        give(&mut state, 0, 9);
        state.tiles[9].houses = 1;
        state.players[0].cash = -50;
        state.players[0].jail_free_cards = 2;
        state.players[0].in_jail = true;

        declare_bankruptcy(&mut state, 0, None);

        assert_eq!(state.tiles[9].owner, None);
        assert_eq!(state.tiles[9].houses, 0);
        let p = &state.players[0];
        assert_eq!(p.cash, 0);
        assert_eq!(p.jail_free_cards, 0);
        assert!(!p.in_jail);
    }

    #[test]
    fn test_bankruptcy_of_active_player_advances_turn() {
        let mut state = setup(3);
        state.players[0].cash = -1;
        let events = {
            declare_bankruptcy(&mut state, 0, None);
            state.take_events()
        };
        assert_eq!(state.current_player_id(), 1);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
        assert!(events.contains(&GameEvent::PlayerBankrupt { player: 0, creditor: None }));
    }

    #[test]
    fn test_last_bankruptcy_ends_game() {
        let mut state = setup(2);
        state.players[0].cash = -1;
        declare_bankruptcy(&mut state, 0, None);
        assert!(!state.running);
        assert_eq!(state.phase, TurnPhase::GameOver { winner: Some(1) });
    }

    #[test]
    fn test_solvent_player_untouched() {
        let mut state = setup(2);
        state.players[0].cash = 0;
        check_solvency(&mut state, 0, None);
        assert!(!state.players[0].is_bankrupt, "zero cash is not insolvent");
    }
}
