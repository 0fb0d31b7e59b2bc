use crate::board::{Money, PlayerId, Tile, TileId, TileKind, MAX_HOUSES};
use crate::game::error::ActionError;
use crate::game::events::GameEvent;
use crate::game::state::{GameState, TurnPhase};

/// Property management is allowed whenever the game runs and no step is mid-resolution
fn ensure_manageable(state: &GameState) -> Result<(), ActionError> {
    if !state.running {
        return Err(ActionError::NotRunning);
    }
    if state.phase.is_resolving() {
        return Err(ActionError::WrongPhase(state.phase));
    }
    Ok(())
}

/// Tile owned by the current player
fn owned_tile(state: &GameState, tile_id: TileId) -> Result<(PlayerId, &Tile), ActionError> {
    let tile = state.tile(tile_id).ok_or(ActionError::TileNotFound(tile_id))?;
    let player = state.current_player_id();
    if tile.owner != Some(player) {
        return Err(ActionError::NotOwner(tile.name.clone()));
    }
    Ok((player, tile))
}

fn ensure_funds(state: &GameState, player: PlayerId, needed: Money) -> Result<(), ActionError> {
    let available = state.players[player].cash;
    if available < needed {
        Err(ActionError::InsufficientFunds { needed, available })
    } else {
        Ok(())
    }
}

/// Resolve the pending buy offer. Declined or unaffordable offers go to auction.
pub fn decide_purchase(state: &mut GameState, confirmed: bool) -> Result<Vec<GameEvent>, ActionError> {
    if !state.running {
        return Err(ActionError::NotRunning);
    }
    let TurnPhase::AwaitingBuyDecision { tile_id } = state.phase else {
        return Err(ActionError::WrongPhase(state.phase));
    };

    let player = state.current_player_id();
    let price = state.tiles[tile_id].price;

    if !confirmed {
        state.emit(GameEvent::PurchaseDeclined { player, tile: tile_id });
        start_auction(state, tile_id);
    } else if state.players[player].cash < price {
        state.emit(GameEvent::PurchaseUnaffordable { player, tile: tile_id, price });
        start_auction(state, tile_id);
    } else {
        buy_tile(state, player, tile_id);
    }

    state.phase = TurnPhase::AwaitingEndTurn;
    Ok(state.take_events())
}

fn buy_tile(state: &mut GameState, player: PlayerId, tile_id: TileId) {
    let tile = &mut state.tiles[tile_id];
    let price = tile.price;
    tile.owner = Some(player);
    tile.houses = 0;
    tile.has_hotel = false;
    tile.is_mortgaged = false;

    let buyer = &mut state.players[player];
    buyer.deduct_cash(price);
    if !buyer.owns(tile_id) {
        buyer.properties.push(tile_id);
    }
    state.emit(GameEvent::PropertyBought { player, tile: tile_id, price });
}

/// Auction placeholder. Bidding is not implemented; the tile stays with the bank.
pub fn start_auction(state: &mut GameState, tile_id: TileId) {
    state.emit(GameEvent::AuctionSkipped { tile: tile_id });
}

/// Color group of a property tile, or why it cannot carry buildings
fn improvable_group(tile: &Tile) -> Result<String, ActionError> {
    match (&tile.kind, &tile.group) {
        (TileKind::Property, Some(group)) => Ok(group.clone()),
        _ => Err(ActionError::NotImprovable(tile.name.clone())),
    }
}

/// Build a house, or a hotel on top of four houses
pub fn build_house(state: &mut GameState, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_manageable(state)?;
    let (player, tile) = owned_tile(state, tile_id)?;
    let group = improvable_group(tile)?;

    if !state.owns_group(player, &group) {
        return Err(ActionError::IncompleteColorGroup(group));
    }
    if state.group_tiles(&group).any(|t| t.is_mortgaged) {
        return Err(ActionError::MortgagedInGroup(group));
    }
    if tile.has_hotel {
        return Err(ActionError::HotelAlreadyBuilt(tile.name.clone()));
    }
    let level = tile.improvement_level();
    if state.group_tiles(&group).any(|t| t.improvement_level() < level) {
        return Err(ActionError::UnevenBuilding);
    }

    let builds_hotel = tile.houses >= MAX_HOUSES;
    let cost = if builds_hotel {
        state.rules.hotel_cost
    } else {
        state.rules.house_cost
    };
    ensure_funds(state, player, cost)?;

    state.players[player].deduct_cash(cost);
    let tile = &mut state.tiles[tile_id];
    if builds_hotel {
        tile.houses = 0;
        tile.has_hotel = true;
        state.emit(GameEvent::HotelBuilt { player, tile: tile_id });
    } else {
        tile.houses += 1;
        let houses = tile.houses;
        state.emit(GameEvent::HouseBuilt { player, tile: tile_id, houses });
    }
    Ok(state.take_events())
}

/// Sell a house at half cost. Selling a hotel leaves four houses behind.
pub fn sell_house(state: &mut GameState, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_manageable(state)?;
    let (player, tile) = owned_tile(state, tile_id)?;
    let group = improvable_group(tile)?;

    if !tile.has_improvements() {
        return Err(ActionError::NoImprovements(tile.name.clone()));
    }
    let level = tile.improvement_level();
    if state.group_tiles(&group).any(|t| t.improvement_level() > level) {
        return Err(ActionError::UnevenBuilding);
    }

    let (house_cost, hotel_cost) = (state.rules.house_cost, state.rules.hotel_cost);
    let tile = &mut state.tiles[tile_id];
    let (event, refund) = if tile.has_hotel {
        tile.has_hotel = false;
        tile.houses = MAX_HOUSES;
        let refund = hotel_cost / 2;
        (GameEvent::HotelSold { player, tile: tile_id, refund }, refund)
    } else {
        tile.houses -= 1;
        let refund = house_cost / 2;
        (GameEvent::HouseSold { player, tile: tile_id, refund }, refund)
    };
    state.players[player].add_cash(refund);
    state.emit(event);
    Ok(state.take_events())
}

/// Pledge a property to the bank for cash. Its group must carry no buildings.
pub fn mortgage(state: &mut GameState, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_manageable(state)?;
    let (player, tile) = owned_tile(state, tile_id)?;

    if tile.is_mortgaged {
        return Err(ActionError::AlreadyMortgaged(tile.name.clone()));
    }
    if let (TileKind::Property, Some(group)) = (&tile.kind, &tile.group) {
        if state.group_tiles(group).any(|t| t.has_improvements()) {
            return Err(ActionError::ImprovementsInGroup(tile.name.clone()));
        }
    }

    let amount = state.rules.mortgage_value(tile.price);
    state.tiles[tile_id].is_mortgaged = true;
    state.players[player].add_cash(amount);
    state.emit(GameEvent::PropertyMortgaged { player, tile: tile_id, amount });
    Ok(state.take_events())
}

/// Repay a mortgage with ten percent interest
pub fn unmortgage(state: &mut GameState, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_manageable(state)?;
    let (player, tile) = owned_tile(state, tile_id)?;

    if !tile.is_mortgaged {
        return Err(ActionError::NotMortgaged(tile.name.clone()));
    }
    let cost = state.rules.unmortgage_cost(tile.price);
    ensure_funds(state, player, cost)?;

    state.players[player].deduct_cash(cost);
    state.tiles[tile_id].is_mortgaged = false;
    state.emit(GameEvent::PropertyUnmortgaged { player, tile: tile_id, cost });
    Ok(state.take_events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;
    use crate::card::CardDatabase;
    use crate::game::state::new_game;
    use crate::game::turns::apply_roll;
    use crate::rng::GameRng;

    fn setup() -> (GameState, GameRng) {
        let board = BoardConfig::builtin().expect("board");
        let cards = CardDatabase::builtin().expect("cards");
        let mut rng = GameRng::new(Some(5));
        let names = vec!["Rahim".to_string(), "Karim".to_string()];
        let state = new_game(&board, &cards, &names, &mut rng).expect("game should start");
        (state, rng)
    }

    fn give(state: &mut GameState, player: PlayerId, tile: TileId) {
        state.tiles[tile].owner = Some(player);
        state.players[player].properties.push(tile);
    }

    fn light_blue(state: &mut GameState) {
        for tile in [6, 8, 9] {
            give(state, 0, tile);
        }
    }

    #[test]
    fn test_buy_confirmed() {
        let (mut state, mut rng) = setup();
        apply_roll(&mut state, &mut rng, (4, 5)).expect("roll");
        let events = decide_purchase(&mut state, true).expect("purchase");
        assert_eq!(state.players[0].cash, 15000 - 1200);
        assert_eq!(state.tiles[9].owner, Some(0));
        assert!(state.players[0].owns(9));
        assert_eq!(state.phase, TurnPhase::AwaitingEndTurn);
        assert!(events.contains(&GameEvent::PropertyBought { player: 0, tile: 9, price: 1200 }));
    }

    #[test]
    fn test_buy_declined_goes_to_auction_stub() {
        let (mut state, mut rng) = setup();
        apply_roll(&mut state, &mut rng, (4, 5)).expect("roll");
        let events = decide_purchase(&mut state, false).expect("decline");
        assert_eq!(state.tiles[9].owner, None);
        assert_eq!(state.players[0].cash, 15000);
        assert!(events.contains(&GameEvent::AuctionSkipped { tile: 9 }));
        assert_eq!(state.phase, TurnPhase::AwaitingEndTurn);
    }

    #[test]
    fn test_buy_unaffordable_goes_to_auction_stub() {
        let (mut state, mut rng) = setup();
        state.players[0].cash = 1000;
        apply_roll(&mut state, &mut rng, (4, 5)).expect("roll");
        let events = decide_purchase(&mut state, true).expect("decision accepted");
        assert_eq!(state.tiles[9].owner, None);
        assert_eq!(state.players[0].cash, 1000);
        assert!(events.contains(&GameEvent::PurchaseUnaffordable { player: 0, tile: 9, price: 1200 }));
    }

    #[test]
    fn test_buy_without_offer_rejected() {
        let (mut state, _rng) = setup();
        assert_eq!(
            decide_purchase(&mut state, true),
            Err(ActionError::WrongPhase(TurnPhase::AwaitingRoll))
        );
    }

    #[test]
    fn test_build_requires_full_group() {
        let (mut state, _rng) = setup();
        give(&mut state, 0, 6);
        give(&mut state, 0, 8);
        assert_eq!(
            build_house(&mut state, 6),
            Err(ActionError::IncompleteColorGroup("light_blue".to_string()))
        );
    }

    #[test]
    fn test_build_rejects_non_property() {
        let (mut state, _rng) = setup();
        give(&mut state, 0, 5);
        assert!(matches!(build_house(&mut state, 5), Err(ActionError::NotImprovable(_))));
    }

    #[test]
    fn test_build_rejects_other_owner() {
        let (mut state, _rng) = setup();
        give(&mut state, 1, 9);
        assert!(matches!(build_house(&mut state, 9), Err(ActionError::NotOwner(_))));
        assert_eq!(build_house(&mut state, 99), Err(ActionError::TileNotFound(99)));
    }

    #[test]
    fn test_even_building() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        build_house(&mut state, 6).expect("first house");
        assert_eq!(build_house(&mut state, 6), Err(ActionError::UnevenBuilding));
        build_house(&mut state, 8).expect("second house");
        build_house(&mut state, 9).expect("third house");
        build_house(&mut state, 6).expect("level two");
        assert_eq!(state.tiles[6].houses, 2);
        assert_eq!(state.players[0].cash, 15000 - 4 * 1000);
    }

    #[test]
    fn test_build_blocked_by_mortgage_in_group() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        state.tiles[8].is_mortgaged = true;
        assert_eq!(
            build_house(&mut state, 6),
            Err(ActionError::MortgagedInGroup("light_blue".to_string()))
        );
    }

    #[test]
    fn test_hotel_replaces_four_houses() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        for tile in [6, 8, 9] {
            state.tiles[tile].houses = 4;
        }
        let cash = state.players[0].cash;
        let events = build_house(&mut state, 9).expect("hotel");
        let tile = &state.tiles[9];
        assert!(tile.has_hotel);
        assert_eq!(tile.houses, 0, "hotel consumes the houses");
        assert_eq!(state.players[0].cash, cash - 5000);
        assert_eq!(events, vec![GameEvent::HotelBuilt { player: 0, tile: 9 }]);
        assert!(matches!(build_house(&mut state, 9), Err(ActionError::HotelAlreadyBuilt(_))));
    }

    #[test]
    fn test_build_rejected_without_cash() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        state.players[0].cash = 999;
        assert_eq!(
            build_house(&mut state, 6),
            Err(ActionError::InsufficientFunds { needed: 1000, available: 999 })
        );
        assert_eq!(state.tiles[6].houses, 0);
    }

    #[test]
    fn test_sell_house_even_and_refund() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        state.tiles[6].houses = 1;
        state.tiles[8].houses = 2;
        state.tiles[9].houses = 2;
        assert_eq!(sell_house(&mut state, 6), Err(ActionError::UnevenBuilding));
        let cash = state.players[0].cash;
        sell_house(&mut state, 8).expect("sell");
        assert_eq!(state.tiles[8].houses, 1);
        assert_eq!(state.players[0].cash, cash + 500);
    }

    #[test]
    fn test_sell_hotel_returns_four_houses() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        state.tiles[6].has_hotel = true;
        state.tiles[8].has_hotel = true;
        state.tiles[9].has_hotel = true;
        let cash = state.players[0].cash;
        let events = sell_house(&mut state, 6).expect("sell hotel");
        assert!(!state.tiles[6].has_hotel);
        assert_eq!(state.tiles[6].houses, 4);
        assert_eq!(state.players[0].cash, cash + 2500);
        assert_eq!(events, vec![GameEvent::HotelSold { player: 0, tile: 6, refund: 2500 }]);
    }

    #[test]
    fn test_sell_without_buildings_rejected() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        assert!(matches!(sell_house(&mut state, 6), Err(ActionError::NoImprovements(_))));
    }

    #[test]
    fn test_mortgage_and_unmortgage() {
        let (mut state, _rng) = setup();
        give(&mut state, 0, 9);
        mortgage(&mut state, 9).expect("mortgage");
        assert!(state.tiles[9].is_mortgaged);
        assert_eq!(state.players[0].cash, 15000 + 600);
        assert!(matches!(mortgage(&mut state, 9), Err(ActionError::AlreadyMortgaged(_))));

        unmortgage(&mut state, 9).expect("unmortgage");
        assert!(!state.tiles[9].is_mortgaged);
        assert_eq!(state.players[0].cash, 15000 + 600 - 660);
        assert!(matches!(unmortgage(&mut state, 9), Err(ActionError::NotMortgaged(_))));
    }

    #[test]
    fn test_mortgage_blocked_by_buildings_in_group() {
        let (mut state, _rng) = setup();
        light_blue(&mut state);
        state.tiles[8].houses = 1;
        assert!(matches!(mortgage(&mut state, 6), Err(ActionError::ImprovementsInGroup(_))));
    }

    #[test]
    fn test_unmortgage_rejected_without_cash() {
        let (mut state, _rng) = setup();
        give(&mut state, 0, 39);
        state.tiles[39].is_mortgaged = true;
        state.players[0].cash = 100;
        let result = unmortgage(&mut state, 39);
        assert_eq!(result, Err(ActionError::InsufficientFunds { needed: 2200, available: 100 }));
        assert!(state.tiles[39].is_mortgaged);
    }

    #[test]
    fn test_mortgage_station() {
        let (mut state, _rng) = setup();
        give(&mut state, 0, 5);
        mortgage(&mut state, 5).expect("stations can be mortgaged");
        assert_eq!(state.players[0].cash, 15000 + 1000);
    }
}
