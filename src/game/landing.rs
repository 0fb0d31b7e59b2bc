use crate::board::{Money, PlayerId, TileId, TileKind};
use crate::card::DeckKind;
use crate::game::bankruptcy::check_solvency;
use crate::game::cards::resolve_card_landing;
use crate::game::events::{GameEvent, RentWaiver};
use crate::game::state::{GameState, TurnPhase};
use crate::game::turns::send_to_jail;
use crate::rng::GameRng;

/// Multiplier on the dice sum for a landlord holding one utility
pub const UTILITY_MULTIPLIER_SINGLE: Money = 40;
/// Multiplier on the dice sum for a landlord holding two or more utilities
pub const UTILITY_MULTIPLIER_DOUBLE: Money = 100;

/// Resolve the effect of the tile a player now stands on
pub(crate) fn land_on_tile(state: &mut GameState, rng: &mut GameRng, player: PlayerId) {
    let tile_id = state.players[player].position;
    let Some(kind) = state.tile(tile_id).map(|t| t.kind) else {
        return;
    };

    state.phase = TurnPhase::ResolvingLanding;
    state.emit(GameEvent::TileLanded { player, tile: tile_id });

    match kind {
        TileKind::Property | TileKind::Station | TileKind::Utility => land_on_ownable(state, player, tile_id),
        TileKind::Tax => pay_tax(state, player, tile_id),
        TileKind::Event => resolve_card_landing(state, rng, player, DeckKind::Event),
        TileKind::LocalNews => resolve_card_landing(state, rng, player, DeckKind::LocalNews),
        TileKind::JailVisiting => state.emit(GameEvent::JustVisiting { player }),
        TileKind::GotoJail => send_to_jail(state, player),
        TileKind::FreeParking => collect_jackpot(state, player),
        TileKind::Go => {}
    }
}

fn land_on_ownable(state: &mut GameState, player: PlayerId, tile_id: TileId) {
    let tile = &state.tiles[tile_id];
    let (owner, price, mortgaged) = (tile.owner, tile.price, tile.is_mortgaged);

    match owner {
        None => {
            state.phase = TurnPhase::AwaitingBuyDecision { tile_id };
            state.emit(GameEvent::PurchaseOffered { player, tile: tile_id, price });
        }
        Some(owner) if owner == player => {
            state.emit(GameEvent::OwnProperty { player, tile: tile_id });
        }
        Some(owner) => {
            if state.players[owner].is_bankrupt {
                state.emit(GameEvent::RentWaived {
                    tile: tile_id,
                    reason: RentWaiver::OwnerBankrupt,
                });
                return;
            }
            if mortgaged {
                state.emit(GameEvent::RentWaived {
                    tile: tile_id,
                    reason: RentWaiver::Mortgaged,
                });
                return;
            }
            let amount = rent_for(state, tile_id);
            state.players[player].deduct_cash(amount);
            state.players[owner].add_cash(amount);
            state.emit(GameEvent::RentPaid {
                from: player,
                to: owner,
                tile: tile_id,
                amount,
            });
            check_solvency(state, player, Some(owner));
        }
    }
}

/// Rent owed to the landlord of a tile, ignoring mortgage and bankruptcy waivers.
/// Zero for unowned or non-ownable tiles.
pub fn rent_for(state: &GameState, tile_id: TileId) -> Money {
    let Some(tile) = state.tile(tile_id) else {
        return 0;
    };
    let Some(owner) = tile.owner else {
        return 0;
    };

    match tile.kind {
        TileKind::Property => {
            let rent = tile.scheduled_rent();
            let full_set = tile
                .group
                .as_deref()
                .map(|group| state.owns_group(owner, group))
                .unwrap_or(false);
            if !tile.has_improvements() && full_set {
                rent * 2
            } else {
                rent
            }
        }
        TileKind::Station => {
            let stations = state.count_owned(owner, TileKind::Station).max(1) as u32;
            tile.base_rent * (1 << (stations - 1))
        }
        TileKind::Utility => {
            let multiplier = if state.count_owned(owner, TileKind::Utility) >= 2 {
                UTILITY_MULTIPLIER_DOUBLE
            } else {
                UTILITY_MULTIPLIER_SINGLE
            };
            let (d1, d2) = state.dice;
            (d1 as Money + d2 as Money) * multiplier
        }
        _ => 0,
    }
}

/// What a non-owner would pay on landing right now, with waivers applied
pub fn rent_due(state: &GameState, tile_id: TileId) -> Money {
    let waived = state
        .tile(tile_id)
        .and_then(|t| t.owner.map(|owner| (t, owner)))
        .map(|(t, owner)| t.is_mortgaged || state.players.get(owner).map_or(true, |p| p.is_bankrupt))
        .unwrap_or(true);
    if waived {
        0
    } else {
        rent_for(state, tile_id)
    }
}

fn pay_tax(state: &mut GameState, player: PlayerId, tile_id: TileId) {
    let amount = state.tiles[tile_id].amount;
    state.players[player].deduct_cash(amount);
    state.emit(GameEvent::TaxPaid { player, tile: tile_id, amount });
    feed_jackpot(state, amount);
    check_solvency(state, player, None);
}

/// Route a payment to the bank into the free parking pot when the rule is on
pub(crate) fn feed_jackpot(state: &mut GameState, amount: Money) {
    if state.rules.free_parking_jackpot && amount > 0 {
        state.free_parking_pot += amount;
        let pot = state.free_parking_pot;
        state.emit(GameEvent::JackpotIncreased { amount, pot });
    }
}

fn collect_jackpot(state: &mut GameState, player: PlayerId) {
    if state.rules.free_parking_jackpot && state.free_parking_pot > 0 {
        let amount = std::mem::take(&mut state.free_parking_pot);
        state.players[player].add_cash(amount);
        state.emit(GameEvent::JackpotCollected { player, amount });
    } else {
        state.emit(GameEvent::FreeParkingEmpty { player });
    }
}
