use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::types::EventCardKind;

pub type EventCardId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventCard {
    pub id: EventCardId,
    pub kind: EventCardKind,
    pub name: String,
    pub description: String,
    pub keepable: bool,
}

impl EventCard {
    pub fn new(id: EventCardId, kind: EventCardKind) -> Self {
        let (name, description) = match kind {
            EventCardKind::SwapAllCards => {
                ("Swap All Cards", "Trade your whole hand with another player.")
            }
            EventCardKind::BossBattlePass => (
                "Boss Battle Pass",
                "Keep this card. Use it to gain a token worth 99 energy.",
            ),
            EventCardKind::RandomDiscard => {
                ("Random Discard", "Discard one of your own cards face down.")
            }
            EventCardKind::NextPlayerDiscard => (
                "Next Player Discard",
                "You and the next player each discard one card.",
            ),
            EventCardKind::AllPlayersDraw => ("All Players Draw", "Every player draws a card."),
            EventCardKind::PrevPlayerDraw => (
                "Previous Player Draw",
                "You and the previous player each draw a card.",
            ),
            EventCardKind::AllPlayersDiscard => {
                ("All Players Discard", "Every player discards one card.")
            }
            EventCardKind::DiceBattleSteal => (
                "Dice Battle",
                "Challenge a player to a roll; the higher total steals a card.",
            ),
        };
        Self {
            id,
            kind,
            name: name.to_string(),
            description: description.to_string(),
            keepable: kind == EventCardKind::BossBattlePass,
        }
    }
}

/// One card of each kind, ids 1..=8 in declaration order.
pub fn standard_event_cards() -> Vec<EventCard> {
    EventCardKind::iter()
        .zip(1..)
        .map(|(kind, id)| EventCard::new(id, kind))
        .collect()
}

/// Face-down event pile. Cards drawn from it travel in players' hands until
/// they are played or discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCardDeck {
    cards: Vec<EventCard>,
}

impl EventCardDeck {
    pub fn new(cards: Vec<EventCard>) -> Self {
        Self { cards }
    }

    pub fn standard(rng: &mut impl rand::Rng) -> Self {
        let mut deck = Self::new(standard_event_cards());
        deck.shuffle(rng);
        deck
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        self.cards.shuffle(rng);
    }

    /// Ids offered face down on a treasure draw.
    pub fn card_ids(&self) -> Vec<EventCardId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn card(&self, id: EventCardId) -> Option<&EventCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn take(&mut self, id: EventCardId) -> Option<EventCard> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Returns a card to the pile and reshuffles.
    pub fn restore(&mut self, card: EventCard, rng: &mut impl rand::Rng) {
        self.cards.push(card);
        self.shuffle(rng);
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
