pub mod bankruptcy;
pub mod cards;
pub mod debug;
pub mod error;
pub mod events;
pub mod landing;
pub mod player;
pub mod state;
pub mod transactions;
pub mod turns;

pub use cards::{execute_card_action, nearest_station_distance};
pub use error::{ActionError, SetupError};
pub use events::{GameEvent, ReleaseReason, RentWaiver};
pub use landing::{rent_due, rent_for};
pub use player::Player;
pub use state::{new_game, GameState, TurnPhase, MAX_PLAYERS, MIN_PLAYERS};
pub use transactions::{build_house, decide_purchase, mortgage, sell_house, start_auction, unmortgage};
pub use turns::{apply_jail_roll, apply_roll, end_turn, jail_action, roll_dice, JailAction};
