use crate::game::action::GameAction;
use crate::game::events::{EventResponse, GameEvent};
use crate::game::state::GameState;

pub trait BasePlayer {
    /// Picks one of the legal turn actions, or `None` to stop playing.
    fn decide(&mut self, game: &GameState, actions: &[GameAction]) -> Option<GameAction>;

    /// Answers an event the engine is suspended on.
    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse;
}
