use crate::board::{Money, TileId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two card decks on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    Event,
    LocalNews,
}

impl fmt::Display for DeckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckKind::Event => write!(f, "Event"),
            DeckKind::LocalNews => write!(f, "Local News"),
        }
    }
}

/// What a card does when resolved. Each variant carries exactly the
/// fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CardAction {
    CollectMoney { amount: Money },
    PayMoney { amount: Money },
    /// Jump to an absolute board position
    MoveTo { tile_id: TileId },
    /// Relative move; negative steps move backwards
    MoveSteps { steps: i32 },
    GoToJail,
    GetOutOfJailFree,
    PropertyRepairs { house_cost: Money, hotel_cost: Money },
    AdvanceToNearestStation,
}

/// A single event or local news card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
    #[serde(flatten)]
    pub action: CardAction,
}

impl Card {
    pub fn new(text: &str, action: CardAction) -> Self {
        Card {
            text: text.to_string(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_action_parses_from_flat_json() {
        let card: Card = serde_json::from_str(
            r#"{"text": "Flood repairs", "action": "property_repairs", "house_cost": 400, "hotel_cost": 1150}"#,
        )
        .expect("card should parse");
        assert_eq!(
            card.action,
            CardAction::PropertyRepairs {
                house_cost: 400,
                hotel_cost: 1150
            }
        );
    }

    #[test]
    fn test_unit_actions_parse() {
        let card: Card =
            serde_json::from_str(r#"{"text": "Go to Thana", "action": "go_to_jail"}"#).expect("card should parse");
        assert_eq!(card.action, CardAction::GoToJail);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"text": "?", "action": "teleport_home"}"#);
        assert!(result.is_err(), "unknown actions must fail to parse");
    }

    #[test]
    fn test_missing_action_field_is_rejected() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"text": "Collect", "action": "collect_money"}"#);
        assert!(result.is_err(), "collect_money without amount must fail");
    }
}
