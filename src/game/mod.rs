pub mod action;
mod boss;
pub mod cards;
pub mod deck;
pub mod dice;
pub mod event_cards;
pub mod events;
pub mod game;
mod hooks;
pub mod players;
mod scripts;
pub mod snapshot;
pub mod spells;
pub mod state;

pub use action::{ActionPayload, ActionType, GameAction};
pub use cards::{BOSS_PASS_VALUE, Card, CardId, STANDARD_DECK_SIZE, standard_deck_cards};
pub use deck::CardDeck;
pub use dice::{Dice, DiceResult, ROLL_ANIMATION};
pub use event_cards::{EventCard, EventCardDeck, EventCardId, standard_event_cards};
pub use events::{
    CardPurpose, EventBus, EventId, EventPayload, EventResponse, GameEvent, PlayerPurpose,
    RoleSelection, SubscriptionId,
};
pub use game::Game;
pub use players::Player;
pub use snapshot::GameSnapshot;
pub use spells::SpellCast;
pub use state::{
    GameConfig, GameError, GamePhase, GameState, MAX_PLAYERS, MIN_PLAYERS, StepRecord, TurnPhase,
};
