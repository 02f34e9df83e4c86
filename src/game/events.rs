use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::CardId;
use super::dice::DiceResult;
use super::event_cards::EventCardId;
use crate::types::{EventKind, PlayerId, Role};

pub type EventId = Uuid;
pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPurpose {
    Discard,
    Steal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPurpose {
    SwapHands,
    DiceBattle,
}

/// What a published event asks for, or reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    RoleSelection {
        total_players: usize,
        ai_players: usize,
        available_roles: Vec<Role>,
    },
    DiceRoll {
        description: String,
    },
    BossBattle {
        position: usize,
        requirement: u32,
        energy_in_hand: u32,
    },
    BossDiscard {
        position: usize,
        requirement: u32,
        hand: Vec<CardId>,
    },
    FixDice {
        min: u8,
        max: u8,
    },
    SwapPosition {
        candidates: Vec<PlayerId>,
    },
    Shield {
        caster: PlayerId,
    },
    ExtraTurn {
        rolls_allowed: u32,
    },
    EventCardDraw {
        position: usize,
        offered: Vec<EventCardId>,
    },
    CardChoice {
        owner: PlayerId,
        cards: Vec<CardId>,
        hidden: bool,
        min: usize,
        max: usize,
        purpose: CardPurpose,
    },
    PlayerChoice {
        candidates: Vec<PlayerId>,
        can_cancel: bool,
        purpose: PlayerPurpose,
    },
    GameOver {
        winner: PlayerId,
    },
    TurnEnd {
        next_player: PlayerId,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::RoleSelection { .. } => EventKind::RoleSelection,
            EventPayload::DiceRoll { .. } => EventKind::DiceRoll,
            EventPayload::BossBattle { .. } => EventKind::BossBattlePlayCards,
            EventPayload::BossDiscard { .. } => EventKind::BossBattleDiscard,
            EventPayload::FixDice { .. } => EventKind::SpellFixDice,
            EventPayload::SwapPosition { .. } => EventKind::SpellSwapPosition,
            EventPayload::Shield { .. } => EventKind::SpellShield,
            EventPayload::ExtraTurn { .. } => EventKind::SpellExtraTurn,
            EventPayload::EventCardDraw { .. } => EventKind::EventCardDraw,
            EventPayload::CardChoice { .. } => EventKind::CardChoice,
            EventPayload::PlayerChoice { .. } => EventKind::PlayerChoice,
            EventPayload::GameOver { .. } => EventKind::GameOver,
            EventPayload::TurnEnd { .. } => EventKind::TurnEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub kind: EventKind,
    pub player: Option<PlayerId>,
    pub payload: EventPayload,
    pub timestamp: u64,
}

impl GameEvent {
    pub fn new(player: Option<PlayerId>, payload: EventPayload) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: Uuid::new_v4(),
            kind: payload.kind(),
            player,
            payload,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSelection {
    pub seat: usize,
    pub role: Role,
}

/// A collaborator's answer to a suspended event. Shapes that do not fit the
/// event being resolved are read as a decline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventResponse {
    Roles { selections: Vec<RoleSelection> },
    PlayCards { cards: Vec<CardId> },
    Retreat { card: Option<CardId> },
    DiceTotal { total: u8 },
    Dice { result: DiceResult },
    Player { player: Option<PlayerId> },
    Cards { cards: Vec<CardId> },
    EventCard { card: EventCardId },
    Confirm { accept: bool },
    Acknowledge,
}

impl EventResponse {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            EventResponse::Player { player } => *player,
            _ => None,
        }
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        match self {
            EventResponse::PlayCards { cards } | EventResponse::Cards { cards } => cards.clone(),
            EventResponse::Retreat { card } => card.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn flag(&self) -> bool {
        matches!(self, EventResponse::Confirm { accept: true })
    }

    pub fn number(&self) -> Option<u8> {
        match self {
            EventResponse::DiceTotal { total } => Some(*total),
            EventResponse::Dice { result } => Some(result.total),
            _ => None,
        }
    }

    pub fn event_card(&self) -> Option<EventCardId> {
        match self {
            EventResponse::EventCard { card } => Some(*card),
            _ => None,
        }
    }

    pub fn roles(&self) -> &[RoleSelection] {
        match self {
            EventResponse::Roles { selections } => selections,
            _ => &[],
        }
    }
}

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    callback: Box<dyn FnMut(&GameEvent)>,
}

/// Publish/subscribe queue plus the table of suspended continuations, keyed
/// by the id of the event that is waiting on an answer.
pub struct EventBus<C> {
    queue: VecDeque<GameEvent>,
    pending: HashMap<EventId, (GameEvent, C)>,
    order: VecDeque<EventId>,
    subscribers: Vec<Subscriber>,
    next_subscription: SubscriptionId,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashMap::new(),
            order: VecDeque::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("pending", &self.order)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notification and hands it to every subscriber of its kind.
    pub fn publish(&mut self, player: Option<PlayerId>, payload: EventPayload) -> EventId {
        let event = GameEvent::new(player, payload);
        let id = event.id;
        self.dispatch(&event);
        self.queue.push_back(event);
        id
    }

    /// Publishes an event and parks `continuation` until it is resolved.
    pub fn suspend(
        &mut self,
        player: Option<PlayerId>,
        payload: EventPayload,
        continuation: C,
    ) -> EventId {
        let event = GameEvent::new(player, payload);
        let id = event.id;
        debug!("suspending on {} {}", event.kind, id);
        self.dispatch(&event);
        self.queue.push_back(event.clone());
        self.pending.insert(id, (event, continuation));
        self.order.push_back(id);
        id
    }

    /// Removes and returns the continuation waiting on `id`, dropping the
    /// event from the notification queue as well. Unknown or already
    /// completed ids yield `None`.
    pub fn complete(&mut self, id: EventId) -> Option<C> {
        let (_, continuation) = self.pending.remove(&id)?;
        self.order.retain(|pending| *pending != id);
        self.queue.retain(|event| event.id != id);
        Some(continuation)
    }

    /// Oldest event still waiting on an answer.
    pub fn awaiting(&self) -> Option<&GameEvent> {
        self.order
            .front()
            .and_then(|id| self.pending.get(id))
            .map(|(event, _)| event)
    }

    pub fn is_suspended(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn is_pending(&self, id: EventId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn pending_event(&self) -> Option<&GameEvent> {
        self.queue.front()
    }

    pub fn remove_processed_event(&mut self) -> Option<GameEvent> {
        self.queue.pop_front()
    }

    pub fn queued(&self) -> impl Iterator<Item = &GameEvent> {
        self.queue.iter()
    }

    /// Drops queued notifications and suspended continuations. Subscribers stay.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
        self.order.clear();
    }

    fn dispatch(&mut self, event: &GameEvent) {
        for subscriber in self.subscribers.iter_mut().filter(|s| s.kind == event.kind) {
            (subscriber.callback)(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn turn_end(next_player: PlayerId) -> EventPayload {
        EventPayload::TurnEnd { next_player }
    }

    #[test]
    fn subscribers_only_hear_their_kind() {
        let mut bus: EventBus<()> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = bus.subscribe(EventKind::TurnEnd, move |event| {
            sink.borrow_mut().push(event.player);
        });

        bus.publish(Some(1), turn_end(2));
        bus.publish(None, EventPayload::GameOver { winner: 1 });
        assert_eq!(*seen.borrow(), vec![Some(1)]);

        assert!(bus.unsubscribe(subscription));
        assert!(!bus.unsubscribe(subscription));
        bus.publish(Some(2), turn_end(1));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn queue_is_first_in_first_out() {
        let mut bus: EventBus<()> = EventBus::new();
        let first = bus.publish(None, turn_end(1));
        let second = bus.publish(None, turn_end(2));

        assert_eq!(bus.pending_event().map(|e| e.id), Some(first));
        assert_eq!(bus.remove_processed_event().map(|e| e.id), Some(first));
        assert_eq!(bus.remove_processed_event().map(|e| e.id), Some(second));
        assert!(bus.remove_processed_event().is_none());
    }

    #[test]
    fn completing_twice_yields_nothing() {
        let mut bus: EventBus<&'static str> = EventBus::new();
        let id = bus.suspend(Some(1), EventPayload::FixDice { min: 2, max: 12 }, "fix");

        assert!(bus.is_suspended());
        assert_eq!(bus.awaiting().map(|e| e.kind), Some(EventKind::SpellFixDice));
        assert_eq!(bus.complete(id), Some("fix"));
        assert_eq!(bus.complete(id), None);
        assert_eq!(bus.complete(Uuid::new_v4()), None);
        assert!(!bus.is_suspended());
    }

    #[test]
    fn completed_events_leave_the_queue() {
        let mut bus: EventBus<()> = EventBus::new();
        let notice = bus.publish(None, turn_end(1));
        let id = bus.suspend(Some(1), EventPayload::FixDice { min: 2, max: 12 }, ());
        assert_eq!(bus.queued().count(), 2);

        bus.complete(id);
        assert_eq!(bus.queued().map(|e| e.id).collect::<Vec<_>>(), vec![notice]);
        assert_eq!(bus.remove_processed_event().map(|e| e.id), Some(notice));
        assert!(bus.pending_event().is_none());
    }

    #[test]
    fn lenient_accessors_default_on_mismatch() {
        let response = EventResponse::Acknowledge;
        assert_eq!(response.player_id(), None);
        assert!(response.card_ids().is_empty());
        assert!(!response.flag());
        assert_eq!(response.number(), None);

        let retreat = EventResponse::Retreat { card: Some(4) };
        assert_eq!(retreat.card_ids(), vec![4]);
    }

    #[test]
    fn responses_deserialize_from_tagged_json() {
        let json = r#"{"type":"cards","cards":[3,9]}"#;
        let response: EventResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.card_ids(), vec![3, 9]);
    }
}
