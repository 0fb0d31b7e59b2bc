use crate::board::{Money, PlayerId, TileId, TileKind};
use crate::card::{Card, CardAction, DeckKind};
use crate::game::bankruptcy::check_solvency;
use crate::game::events::GameEvent;
use crate::game::landing::{feed_jackpot, land_on_tile};
use crate::game::state::{GameState, TurnPhase};
use crate::game::turns::{collect_go_payout, move_player, send_to_jail};
use crate::rng::GameRng;

/// Draw from a deck and resolve the card for the landing player
pub(crate) fn resolve_card_landing(state: &mut GameState, rng: &mut GameRng, player: PlayerId, deck: DeckKind) {
    match state.deck_mut(deck).draw(rng) {
        Some(card) => execute_card(state, rng, player, deck, &card),
        None => state.emit(GameEvent::DeckExhausted { deck }),
    }
}

/// Announce and apply a card
pub(crate) fn execute_card(state: &mut GameState, rng: &mut GameRng, player: PlayerId, deck: DeckKind, card: &Card) {
    state.emit(GameEvent::CardDrawn {
        player,
        deck,
        text: card.text.clone(),
    });
    execute_card_action(state, rng, player, &card.action);
}

/// Apply a card's effect to a player
pub fn execute_card_action(state: &mut GameState, rng: &mut GameRng, player: PlayerId, action: &CardAction) {
    match action {
        CardAction::CollectMoney { amount } => {
            state.players[player].add_cash(*amount);
            state.emit(GameEvent::CashCollected { player, amount: *amount });
        }
        CardAction::PayMoney { amount } => {
            state.players[player].deduct_cash(*amount);
            state.emit(GameEvent::CashPaid { player, amount: *amount });
            feed_jackpot(state, *amount);
            check_solvency(state, player, None);
        }
        CardAction::MoveTo { tile_id } => move_to(state, rng, player, *tile_id),
        CardAction::MoveSteps { steps } => move_player(state, rng, player, *steps),
        CardAction::GoToJail => send_to_jail(state, player),
        CardAction::GetOutOfJailFree => {
            state.players[player].jail_free_cards += 1;
            state.emit(GameEvent::JailCardReceived { player });
        }
        CardAction::PropertyRepairs { house_cost, hotel_cost } => {
            let amount: Money = state
                .owned_tiles(player)
                .iter()
                .map(|t| {
                    let hotel = if t.has_hotel { *hotel_cost } else { 0 };
                    house_cost * t.houses as Money + hotel
                })
                .sum();
            state.players[player].deduct_cash(amount);
            state.emit(GameEvent::RepairsPaid { player, amount });
            check_solvency(state, player, None);
        }
        CardAction::AdvanceToNearestStation => {
            let from = state.players[player].position;
            match nearest_station_distance(state, from) {
                Some(steps) => move_player(state, rng, player, steps as i32),
                None => log::warn!("no station on the board, card has no effect"),
            }
        }
    }
}

/// Absolute jump. Pays GO when the jump wraps backwards, unless the target is jail.
fn move_to(state: &mut GameState, rng: &mut GameRng, player: PlayerId, tile_id: TileId) {
    if tile_id >= state.board_len() {
        log::warn!("card target {} is off the board", tile_id);
        return;
    }
    let from = state.players[player].position;
    state.phase = TurnPhase::Moving;
    state.players[player].position = tile_id;
    state.emit(GameEvent::PlayerMoved { player, from, to: tile_id });

    if tile_id < from && tile_id != state.jail_index {
        collect_go_payout(state, player);
    }

    land_on_tile(state, rng, player);
}

/// Forward distance to the closest station strictly ahead of a position
pub fn nearest_station_distance(state: &GameState, from: TileId) -> Option<usize> {
    let len = state.board_len();
    state
        .tiles
        .iter()
        .filter(|t| t.kind == TileKind::Station)
        .map(|t| (t.id + len - from % len) % len)
        .filter(|distance| *distance > 0)
        .min()
}
