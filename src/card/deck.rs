use crate::card::types::{Card, DeckKind};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

/// A card deck with an immutable template and a draw/discard pair.
/// Drawn cards go to the discard pile; when the draw pile runs out the
/// discard pile is shuffled back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    kind: DeckKind,
    template: Vec<Card>,
    draw_pile: Vec<Card>,
    discard: Vec<Card>,
}

impl Deck {
    pub fn new(kind: DeckKind, cards: Vec<Card>) -> Self {
        Deck {
            kind,
            draw_pile: cards.clone(),
            template: cards,
            discard: Vec::new(),
        }
    }

    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw_pile);
    }

    /// Restore the full template and shuffle it
    pub fn reset(&mut self, rng: &mut GameRng) {
        self.draw_pile = self.template.clone();
        self.discard.clear();
        self.shuffle(rng);
    }

    /// Draw the top card. Returns None only if the deck holds no cards at all.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<Card> {
        if self.draw_pile.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            log::debug!(
                "{} deck empty, reshuffling {} discarded cards",
                self.kind,
                self.discard.len()
            );
            self.draw_pile.append(&mut self.discard);
            self.shuffle(rng);
        }

        let card = self.draw_pile.remove(0);
        self.discard.push(card.clone());
        Some(card)
    }

    /// Cards left in the draw pile
    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn template(&self) -> &[Card] {
        &self.template
    }

    /// Cards in draw order
    pub fn cards(&self) -> &[Card] {
        &self.draw_pile
    }
}
