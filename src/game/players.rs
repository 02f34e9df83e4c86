use serde::{Deserialize, Serialize};

use super::cards::{Card, CardId};
use crate::types::{CardEffect, CardKind, Direction, PlayerId, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    position: usize,
    pub direction: Direction,
    hand: Vec<Card>,
    pub is_ai: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role, is_ai: bool) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            position: 0,
            direction: Direction::Forward,
            hand: Vec::new(),
            is_ai,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }

    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.id == id)?;
        Some(self.hand.remove(index))
    }

    pub fn has_card(&self, id: CardId) -> bool {
        self.hand.iter().any(|c| c.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == id)
    }

    pub fn take_hand(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.hand)
    }

    pub fn replace_hand(&mut self, hand: Vec<Card>) {
        self.hand = hand;
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.hand.iter().map(|c| c.id).collect()
    }

    /// Energy the whole hand could commit against a boss.
    pub fn total_energy(&self) -> u32 {
        self.hand.iter().map(Card::energy_value).sum()
    }

    pub fn spell(&self, effect: CardEffect) -> Option<&Card> {
        self.hand.iter().find(|c| c.is_spell(effect))
    }

    pub fn spells(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().filter(|c| c.kind == CardKind::Spell)
    }

    /// Event cards drawn from treasures and not yet played.
    pub fn event_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().filter(|c| c.is_event_card())
    }

    pub fn count_kind(&self, kind: CardKind) -> usize {
        self.hand.iter().filter(|c| c.kind == kind).count()
    }
}
