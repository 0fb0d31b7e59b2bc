use crate::board::{Money, PlayerId, TileId};
use crate::game::state::TurnPhase;
use thiserror::Error;

/// A rejected user decision. State is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("The game is not running")]
    NotRunning,
    #[error("Action not allowed in phase {0:?}")]
    WrongPhase(TurnPhase),
    #[error("Tile {0} does not exist")]
    TileNotFound(TileId),
    #[error("Player {0} does not exist")]
    PlayerNotFound(PlayerId),
    #[error("Player {0} is bankrupt")]
    PlayerBankrupt(PlayerId),
    #[error("You do not own {0}")]
    NotOwner(String),
    #[error("{0} cannot be improved")]
    NotImprovable(String),
    #[error("You must own every property in the {0} group")]
    IncompleteColorGroup(String),
    #[error("A property in the {0} group is mortgaged")]
    MortgagedInGroup(String),
    #[error("Houses must be built and sold evenly across the group")]
    UnevenBuilding,
    #[error("{0} already has a hotel")]
    HotelAlreadyBuilt(String),
    #[error("{0} has no houses or hotel to sell")]
    NoImprovements(String),
    #[error("Sell every house and hotel in the group before mortgaging {0}")]
    ImprovementsInGroup(String),
    #[error("{0} is already mortgaged")]
    AlreadyMortgaged(String),
    #[error("{0} is not mortgaged")]
    NotMortgaged(String),
    #[error("Not enough cash: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },
    #[error("No Get Out of Thana Free card")]
    NoJailCard,
    #[error("Player is not in Thana")]
    NotInJail,
    #[error("Invalid dice {0:?}: each die must show 1 to 6")]
    InvalidDice((u8, u8)),
}

/// Failure to start a game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Player count must be between 2 and 6, got {0}")]
    InvalidPlayerCount(usize),
}
