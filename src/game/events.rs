use crate::board::{Money, PlayerId, TileId};
use crate::card::DeckKind;
use crate::game::state::GameState;

/// Why no rent was collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentWaiver {
    Mortgaged,
    OwnerBankrupt,
}

/// How a player left jail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    PaidFine,
    UsedCard,
    RolledDoubles,
    /// Third failed roll: fine debited regardless of cash
    ForcedFine,
}

/// Semantic notifications for the renderer, log and audio layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted { players: usize },
    TurnStarted { player: PlayerId, in_jail: bool },
    DiceRolled { player: PlayerId, dice: (u8, u8) },
    DoublesRolled { player: PlayerId, count: u8 },
    ThreeDoubles { player: PlayerId },
    JailDecisionRequired { player: PlayerId },
    PlayerMoved { player: PlayerId, from: TileId, to: TileId },
    PassedGo { player: PlayerId, amount: Money },
    TileLanded { player: PlayerId, tile: TileId },
    PurchaseOffered { player: PlayerId, tile: TileId, price: Money },
    PropertyBought { player: PlayerId, tile: TileId, price: Money },
    PurchaseDeclined { player: PlayerId, tile: TileId },
    PurchaseUnaffordable { player: PlayerId, tile: TileId, price: Money },
    /// Bidding is not implemented; the tile stays with the bank
    AuctionSkipped { tile: TileId },
    OwnProperty { player: PlayerId, tile: TileId },
    RentPaid { from: PlayerId, to: PlayerId, tile: TileId, amount: Money },
    RentWaived { tile: TileId, reason: RentWaiver },
    TaxPaid { player: PlayerId, tile: TileId, amount: Money },
    JackpotIncreased { amount: Money, pot: Money },
    JackpotCollected { player: PlayerId, amount: Money },
    FreeParkingEmpty { player: PlayerId },
    CardDrawn { player: PlayerId, deck: DeckKind, text: String },
    DeckExhausted { deck: DeckKind },
    CashCollected { player: PlayerId, amount: Money },
    CashPaid { player: PlayerId, amount: Money },
    RepairsPaid { player: PlayerId, amount: Money },
    JailCardReceived { player: PlayerId },
    PlayerJailed { player: PlayerId },
    JustVisiting { player: PlayerId },
    JailRollFailed { player: PlayerId, attempt: u8 },
    PlayerReleased { player: PlayerId, reason: ReleaseReason },
    HouseBuilt { player: PlayerId, tile: TileId, houses: u8 },
    HotelBuilt { player: PlayerId, tile: TileId },
    HouseSold { player: PlayerId, tile: TileId, refund: Money },
    HotelSold { player: PlayerId, tile: TileId, refund: Money },
    PropertyMortgaged { player: PlayerId, tile: TileId, amount: Money },
    PropertyUnmortgaged { player: PlayerId, tile: TileId, cost: Money },
    ImprovementsLiquidated { player: PlayerId, tile: TileId, amount: Money },
    PropertyTransferred { tile: TileId, from: PlayerId, to: Option<PlayerId> },
    CashTransferred { from: PlayerId, to: Option<PlayerId>, amount: Money },
    PlayerBankrupt { player: PlayerId, creditor: Option<PlayerId> },
    ExtraRoll { player: PlayerId },
    TurnEnded { player: PlayerId, next: PlayerId },
    GameOver { winner: Option<PlayerId> },
    JackpotToggled { enabled: bool },
}

impl GameEvent {
    /// Human-readable line for logs and the terminal front-end
    pub fn describe(&self, state: &GameState) -> String {
        let who = |id: &PlayerId| {
            state
                .players
                .get(*id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("Player {}", id + 1))
        };
        let tile = |id: &TileId| {
            state
                .tiles
                .get(*id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("tile {}", id))
        };
        let money = |amount: &Money| state.rules.money(*amount);

        match self {
            GameEvent::GameStarted { players } => format!("Game started with {} players.", players),
            GameEvent::TurnStarted { player, in_jail } => {
                if *in_jail {
                    format!("{}'s turn (in Thana).", who(player))
                } else {
                    format!("{}'s turn.", who(player))
                }
            }
            GameEvent::DiceRolled { player, dice } => {
                format!("{} rolled {} + {} = {}", who(player), dice.0, dice.1, dice.0 as u16 + dice.1 as u16)
            }
            GameEvent::DoublesRolled { player, count } => format!("{} rolled doubles ({} in a row).", who(player), count),
            GameEvent::ThreeDoubles { player } => format!("Three consecutive doubles! {} goes to Thana!", who(player)),
            GameEvent::JailDecisionRequired { player } => {
                format!("{} is in Thana and must pay, roll, or use a card.", who(player))
            }
            GameEvent::PlayerMoved { player, to, .. } => format!("{} moved to {}.", who(player), tile(to)),
            GameEvent::PassedGo { player, amount } => format!("{} passed GO and collected {}.", who(player), money(amount)),
            GameEvent::TileLanded { player, tile: t } => format!("{} landed on {}.", who(player), tile(t)),
            GameEvent::PurchaseOffered { player, tile: t, price } => {
                format!("{} may buy {} for {}.", who(player), tile(t), money(price))
            }
            GameEvent::PropertyBought { player, tile: t, price } => {
                format!("{} bought {} for {}.", who(player), tile(t), money(price))
            }
            GameEvent::PurchaseDeclined { player, tile: t } => format!("{} declined to buy {}.", who(player), tile(t)),
            GameEvent::PurchaseUnaffordable { player, tile: t, price } => {
                format!("{} cannot afford {} ({}).", who(player), tile(t), money(price))
            }
            GameEvent::AuctionSkipped { tile: t } => {
                format!("Auction for {} is not available; it stays with the bank.", tile(t))
            }
            GameEvent::OwnProperty { player, tile: t } => format!("{} owns {}.", who(player), tile(t)),
            GameEvent::RentPaid { from, to, tile: t, amount } => {
                format!("{} paid {} rent to {} for {}.", who(from), money(amount), who(to), tile(t))
            }
            GameEvent::RentWaived { tile: t, reason } => match reason {
                RentWaiver::Mortgaged => format!("{} is mortgaged, no rent collected.", tile(t)),
                RentWaiver::OwnerBankrupt => format!("Owner of {} is bankrupt, no rent collected.", tile(t)),
            },
            GameEvent::TaxPaid { player, tile: t, amount } => {
                format!("{} paid {} tax on {}.", who(player), money(amount), tile(t))
            }
            GameEvent::JackpotIncreased { amount, pot } => {
                format!("Free Parking pot increased by {} to {}.", money(amount), money(pot))
            }
            GameEvent::JackpotCollected { player, amount } => {
                format!("{} collected {} from Free Parking!", who(player), money(amount))
            }
            GameEvent::FreeParkingEmpty { player } => format!("{} rests at Free Parking. Nothing to collect.", who(player)),
            GameEvent::CardDrawn { player, deck, text } => format!("{} drew a {} card: \"{}\"", who(player), deck, text),
            GameEvent::DeckExhausted { deck } => format!("No {} cards left in the deck.", deck),
            GameEvent::CashCollected { player, amount } => format!("{} collected {}.", who(player), money(amount)),
            GameEvent::CashPaid { player, amount } => format!("{} paid {}.", who(player), money(amount)),
            GameEvent::RepairsPaid { player, amount } => {
                format!("{} paid {} for property repairs.", who(player), money(amount))
            }
            GameEvent::JailCardReceived { player } => format!("{} received a Get Out of Thana Free card.", who(player)),
            GameEvent::PlayerJailed { player } => format!("{} was sent to Thana!", who(player)),
            GameEvent::JustVisiting { player } => format!("{} is just visiting Thana.", who(player)),
            GameEvent::JailRollFailed { player, attempt } => {
                format!("{} failed to roll doubles (attempt {}).", who(player), attempt)
            }
            GameEvent::PlayerReleased { player, reason } => match reason {
                ReleaseReason::PaidFine => format!("{} paid the fine and left Thana.", who(player)),
                ReleaseReason::UsedCard => format!("{} used a Get Out of Thana Free card.", who(player)),
                ReleaseReason::RolledDoubles => format!("{} rolled doubles and left Thana.", who(player)),
                ReleaseReason::ForcedFine => {
                    format!("{} paid {} after three turns in Thana.", who(player), money(&state.rules.jail_fine))
                }
            },
            GameEvent::HouseBuilt { player, tile: t, houses } => {
                format!("{} built a house on {} ({} total).", who(player), tile(t), houses)
            }
            GameEvent::HotelBuilt { player, tile: t } => format!("{} built a hotel on {}.", who(player), tile(t)),
            GameEvent::HouseSold { player, tile: t, refund } => {
                format!("{} sold a house on {} for {}.", who(player), tile(t), money(refund))
            }
            GameEvent::HotelSold { player, tile: t, refund } => {
                format!("{} sold the hotel on {} for {}.", who(player), tile(t), money(refund))
            }
            GameEvent::PropertyMortgaged { player, tile: t, amount } => {
                format!("{} mortgaged {} for {}.", who(player), tile(t), money(amount))
            }
            GameEvent::PropertyUnmortgaged { player, tile: t, cost } => {
                format!("{} unmortgaged {} for {}.", who(player), tile(t), money(cost))
            }
            GameEvent::ImprovementsLiquidated { player, tile: t, amount } => {
                format!("{}'s buildings on {} sold for {}.", who(player), tile(t), money(amount))
            }
            GameEvent::PropertyTransferred { tile: t, to, .. } => match to {
                Some(to) => format!("{} transferred to {}.", tile(t), who(to)),
                None => format!("{} returned to the bank.", tile(t)),
            },
            GameEvent::CashTransferred { from, to, amount } => match to {
                Some(to) => format!("{}'s {} transferred to {}.", who(from), money(amount), who(to)),
                None => format!("{}'s {} lost to the bank.", who(from), money(amount)),
            },
            GameEvent::PlayerBankrupt { player, .. } => format!("{} is bankrupt.", who(player)),
            GameEvent::ExtraRoll { player } => format!("{} rolled doubles and gets an extra roll!", who(player)),
            GameEvent::TurnEnded { player, next } => format!("Turn ended for {}. Next: {}.", who(player), who(next)),
            GameEvent::GameOver { winner } => match winner {
                Some(w) => format!("Game over! {} wins!", who(w)),
                None => "Game over! No winner.".to_string(),
            },
            GameEvent::JackpotToggled { enabled } => {
                format!("Free Parking jackpot {}.", if *enabled { "enabled" } else { "disabled" })
            }
        }
    }
}
