pub mod database;
pub mod deck;
pub mod types;

pub use database::{parse_deck, parse_deck_file, CardDatabase};
pub use deck::Deck;
pub use types::{Card, CardAction, DeckKind};
