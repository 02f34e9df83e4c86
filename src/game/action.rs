use serde::{Deserialize, Serialize};
use strum::Display;

use super::cards::CardId;
use crate::types::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Roll,
    CastSpell,
    PlayEventCard,
    EndTurn,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameAction {
    pub player: PlayerId,
    pub action_type: ActionType,
    pub payload: ActionPayload,
}

impl GameAction {
    pub fn new(player: PlayerId, action_type: ActionType) -> Self {
        Self {
            player,
            action_type,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn roll(player: PlayerId) -> Self {
        Self::new(player, ActionType::Roll)
    }

    pub fn cast_spell(player: PlayerId, card: CardId) -> Self {
        Self::new(player, ActionType::CastSpell).with_payload(ActionPayload::Card(card))
    }

    pub fn play_event_card(player: PlayerId, card: CardId) -> Self {
        Self::new(player, ActionType::PlayEventCard).with_payload(ActionPayload::Card(card))
    }

    pub fn end_turn(player: PlayerId) -> Self {
        Self::new(player, ActionType::EndTurn)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ActionPayload {
    #[default]
    None,
    Card(CardId),
}
