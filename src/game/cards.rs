use serde::{Deserialize, Serialize};

use crate::types::{CardEffect, CardKind};

use super::event_cards::EventCard;

pub type CardId = u32;

/// Value carried by the boss-pass token; enough to clear any standard boss.
pub const BOSS_PASS_VALUE: u8 = 99;

pub const STANDARD_DECK_SIZE: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub value: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<CardEffect>,
    #[serde(default)]
    pub description: String,
    /// Set when this hand card is an event card drawn from a treasure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventCard>,
}

impl Card {
    pub fn energy(id: CardId, value: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: CardKind::Energy,
            value,
            name: name.into(),
            effect: None,
            description: format!("Provides {value} energy."),
            event: None,
        }
    }

    pub fn spell(id: CardId, effect: CardEffect, value: u8) -> Self {
        let (name, description) = match effect {
            CardEffect::FixDice => ("Fix Dice", "Choose the total of your next roll."),
            CardEffect::ExtraTurn => ("Extra Turn", "Roll one more time this turn."),
            CardEffect::SwapPosition => ("Swap Position", "Trade places with another player."),
            CardEffect::SpellShield => ("Spell Shield", "Cancel a swap aimed at you."),
            CardEffect::BossPass => ("Boss Pass", "Counts as enough energy for any boss."),
        };
        Self {
            id,
            kind: CardKind::Spell,
            value,
            name: name.to_string(),
            effect: Some(effect),
            description: description.to_string(),
            event: None,
        }
    }

    pub fn boss_pass(id: CardId) -> Self {
        Self {
            id,
            kind: CardKind::Event,
            value: BOSS_PASS_VALUE,
            name: "Boss Pass".to_string(),
            effect: Some(CardEffect::BossPass),
            description: "Counts as enough energy for any boss.".to_string(),
            event: None,
        }
    }

    /// Hand card standing for an event card taken off the event pile.
    pub fn event(id: CardId, card: EventCard) -> Self {
        Self {
            id,
            kind: CardKind::Event,
            value: 0,
            name: card.name.clone(),
            effect: None,
            description: card.description.clone(),
            event: Some(card),
        }
    }

    /// Energy this card contributes when committed against a boss.
    pub fn energy_value(&self) -> u32 {
        match self.kind {
            CardKind::Energy | CardKind::Event => self.value as u32,
            CardKind::Spell => 0,
        }
    }

    pub fn is_spell(&self, effect: CardEffect) -> bool {
        self.kind == CardKind::Spell && self.effect == Some(effect)
    }

    pub fn is_event_card(&self) -> bool {
        self.event.is_some()
    }

    /// Event-kind cards are not part of the main deck; event cards go back to
    /// the event pile and tokens vanish.
    pub fn returns_to_deck(&self) -> bool {
        self.kind != CardKind::Event
    }
}

pub fn standard_deck_cards() -> Vec<Card> {
    const ENERGY: &[(&str, u8, usize)] = &[
        ("Cone", 1, 20),
        ("Fries", 3, 16),
        ("Cheeseburger", 6, 10),
        ("Salted-yolk burger", 6, 6),
    ];
    const SPELLS: &[(CardEffect, u8, usize)] = &[
        (CardEffect::FixDice, 3, 2),
        (CardEffect::ExtraTurn, 3, 2),
        (CardEffect::SwapPosition, 6, 2),
        (CardEffect::SpellShield, 4, 2),
    ];

    let mut cards = Vec::with_capacity(STANDARD_DECK_SIZE);
    let mut next_id: CardId = 1;
    for &(name, value, count) in ENERGY {
        for _ in 0..count {
            cards.push(Card::energy(next_id, value, name));
            next_id += 1;
        }
    }
    for &(effect, value, count) in SPELLS {
        for _ in 0..count {
            cards.push(Card::spell(next_id, effect, value));
            next_id += 1;
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn standard_deck_has_sixty_unique_ids() {
        let cards = standard_deck_cards();
        assert_eq!(cards.len(), STANDARD_DECK_SIZE);
        assert!(cards.iter().map(|c| c.id).all_unique());
        assert_eq!(cards.first().unwrap().id, 1);
        assert_eq!(cards.last().unwrap().id, 60);
    }

    #[test]
    fn spells_carry_no_energy() {
        let cards = standard_deck_cards();
        let spells = cards.iter().filter(|c| c.kind == CardKind::Spell).count();
        assert_eq!(spells, 8);
        assert!(
            cards
                .iter()
                .filter(|c| c.kind == CardKind::Spell)
                .all(|c| c.energy_value() == 0)
        );
        assert_eq!(Card::boss_pass(900).energy_value(), 99);
    }

    #[test]
    fn event_hand_cards_carry_no_energy() {
        let card = Card::event(1001, EventCard::new(5, crate::types::EventCardKind::AllPlayersDraw));
        assert!(card.is_event_card());
        assert_eq!(card.kind, CardKind::Event);
        assert_eq!(card.energy_value(), 0);
        assert!(!card.returns_to_deck());
        assert_eq!(card.name, "All Players Draw");
    }
}
