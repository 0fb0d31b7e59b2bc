use crate::board::{BoardConfig, ConfigError};
use crate::card::deck::Deck;
use crate::card::types::{Card, CardAction, DeckKind};
use serde::Deserialize;

const BUILTIN_EVENT_CARDS: &str = include_str!("../../data/event_cards.json");
const BUILTIN_LOCAL_NEWS_CARDS: &str = include_str!("../../data/local_news_cards.json");

#[derive(Deserialize)]
struct DeckFile {
    cards: Vec<Card>,
}

/// Parse one deck file: `{ "cards": [...] }`
pub fn parse_deck(json: &str) -> Result<Vec<Card>, ConfigError> {
    let file: DeckFile = serde_json::from_str(json)?;
    Ok(file.cards)
}

pub fn parse_deck_file(path: &str) -> Result<Vec<Card>, ConfigError> {
    parse_deck(&std::fs::read_to_string(path)?)
}

/// Card definitions for both decks, loaded from JSON
#[derive(Debug, Clone)]
pub struct CardDatabase {
    event: Vec<Card>,
    local_news: Vec<Card>,
}

impl CardDatabase {
    pub fn new(event: Vec<Card>, local_news: Vec<Card>) -> Self {
        CardDatabase { event, local_news }
    }

    /// Load both decks from JSON files
    pub fn from_files(event_path: &str, local_news_path: &str) -> Result<Self, ConfigError> {
        Ok(CardDatabase::new(
            parse_deck_file(event_path)?,
            parse_deck_file(local_news_path)?,
        ))
    }

    pub fn from_json(event: &str, local_news: &str) -> Result<Self, ConfigError> {
        Ok(CardDatabase::new(parse_deck(event)?, parse_deck(local_news)?))
    }

    /// The decks shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_EVENT_CARDS, BUILTIN_LOCAL_NEWS_CARDS)
    }

    pub fn cards(&self, kind: DeckKind) -> &[Card] {
        match kind {
            DeckKind::Event => &self.event,
            DeckKind::LocalNews => &self.local_news,
        }
    }

    /// Build an unshuffled deck of the given kind
    pub fn deck(&self, kind: DeckKind) -> Deck {
        Deck::new(kind, self.cards(kind).to_vec())
    }

    pub fn card_count(&self) -> usize {
        self.event.len() + self.local_news.len()
    }

    /// Check card targets against a board
    pub fn validate(&self, board: &BoardConfig) -> Result<(), ConfigError> {
        for kind in [DeckKind::Event, DeckKind::LocalNews] {
            for card in self.cards(kind) {
                match card.action {
                    CardAction::MoveTo { tile_id } if tile_id >= board.len() => {
                        return Err(ConfigError::InvalidCard(format!(
                            "{} card '{}' moves to tile {} but the board has {} tiles",
                            kind,
                            card.text,
                            tile_id,
                            board.len()
                        )));
                    }
                    CardAction::CollectMoney { amount } | CardAction::PayMoney { amount } if amount < 0 => {
                        return Err(ConfigError::InvalidCard(format!(
                            "{} card '{}' has a negative amount",
                            kind, card.text
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
