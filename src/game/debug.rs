//! Debug tools for manual testing. These bypass the normal rule checks.

use crate::board::{Money, PlayerId, TileId, TileKind, MAX_HOUSES};
use crate::card::DeckKind;
use crate::game::bankruptcy::{check_solvency, declare_bankruptcy};
use crate::game::cards::execute_card;
use crate::game::error::ActionError;
use crate::game::events::GameEvent;
use crate::game::landing::land_on_tile;
use crate::game::state::{GameState, TurnPhase};
use crate::game::turns::finish_step;
use crate::rng::GameRng;

fn ensure_idle(state: &GameState) -> Result<(), ActionError> {
    if !state.running {
        return Err(ActionError::NotRunning);
    }
    if state.phase.is_resolving() {
        return Err(ActionError::WrongPhase(state.phase));
    }
    Ok(())
}

/// Add (or with a negative amount, remove) cash
pub fn grant_cash(state: &mut GameState, player: PlayerId, amount: Money) -> Result<Vec<GameEvent>, ActionError> {
    ensure_idle(state)?;
    let p = state.players.get_mut(player).ok_or(ActionError::PlayerNotFound(player))?;
    if p.is_bankrupt {
        return Err(ActionError::PlayerBankrupt(player));
    }
    if amount >= 0 {
        p.add_cash(amount);
        state.emit(GameEvent::CashCollected { player, amount });
    } else {
        p.deduct_cash(-amount);
        state.emit(GameEvent::CashPaid { player, amount: -amount });
        check_solvency(state, player, None);
    }
    Ok(state.take_events())
}

/// Place the current player on a tile and resolve the landing. No GO payout.
pub fn teleport(state: &mut GameState, rng: &mut GameRng, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_idle(state)?;
    if tile_id >= state.board_len() {
        return Err(ActionError::TileNotFound(tile_id));
    }
    let player = state.current_player_id();
    let from = state.current_player().position;
    state.phase = TurnPhase::Moving;
    state.current_player_mut().position = tile_id;
    state.emit(GameEvent::PlayerMoved { player, from, to: tile_id });
    land_on_tile(state, rng, player);
    finish_step(state);
    Ok(state.take_events())
}

/// Resolve a random card from a deck for the current player without drawing it
pub fn force_card(state: &mut GameState, rng: &mut GameRng, deck: DeckKind) -> Result<Vec<GameEvent>, ActionError> {
    ensure_idle(state)?;
    let template = state.deck(deck).template();
    if template.is_empty() {
        state.emit(GameEvent::DeckExhausted { deck });
        return Ok(state.take_events());
    }
    let card = template[rng.random_range(template.len())].clone();

    let player = state.current_player_id();
    let resume = state.phase;
    state.phase = TurnPhase::ResolvingLanding;
    execute_card(state, rng, player, deck, &card);
    if state.phase == TurnPhase::ResolvingLanding {
        state.phase = resume;
    }
    finish_step(state);
    Ok(state.take_events())
}

/// Add a house (or a hotel on four houses) to an owned property, free of charge
pub fn add_improvement(state: &mut GameState, tile_id: TileId) -> Result<Vec<GameEvent>, ActionError> {
    ensure_idle(state)?;
    let tile = state.tiles.get_mut(tile_id).ok_or(ActionError::TileNotFound(tile_id))?;
    if tile.kind != TileKind::Property {
        return Err(ActionError::NotImprovable(tile.name.clone()));
    }
    let Some(player) = tile.owner else {
        return Err(ActionError::NotOwner(tile.name.clone()));
    };
    if tile.has_hotel {
        return Err(ActionError::HotelAlreadyBuilt(tile.name.clone()));
    }

    if tile.houses >= MAX_HOUSES {
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

/// Bankrupt the current player with no creditor
pub fn force_bankruptcy(state: &mut GameState) -> Result<Vec<GameEvent>, ActionError> {
    ensure_idle(state)?;
    let player = state.current_player_id();
    declare_bankruptcy(state, player, None);
    Ok(state.take_events())
}
