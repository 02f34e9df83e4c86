use log::{debug, info, warn};
use uuid::Uuid;

use crate::game::action::GameAction;
use crate::game::events::GameEvent;
use crate::game::{GameConfig, GameError, GameState};
use crate::players::BasePlayer;
use crate::types::PlayerId;

pub const TURNS_LIMIT: u32 = 1000;

/// Drives a [`GameState`] with one decision maker per seat.
pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self::from_state(GameState::new(config)?))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            seed: state.config.seed,
            id: Uuid::new_v4(),
            state,
        }
    }

    pub fn play<P: BasePlayer>(&mut self, seats: &mut [P]) -> Result<Option<PlayerId>, GameError> {
        if !self.state.is_started() {
            self.state.initialize()?;
        }
        while !self.state.is_over() && self.state.turn < TURNS_LIMIT {
            if !self.play_tick(seats)? {
                break;
            }
        }
        info!(
            "game {} finished after {} turns, winner {:?}",
            self.id,
            self.state.turn,
            self.winning_player()
        );
        Ok(self.winning_player())
    }

    /// Answers the oldest suspended event, or lets the current seat act.
    /// Returns `false` once nobody can move.
    pub fn play_tick<P: BasePlayer>(&mut self, seats: &mut [P]) -> Result<bool, GameError> {
        self.drain_notifications();

        if let Some(event) = self.state.awaiting_event().cloned() {
            let Some(player) = self.seat_for(&event).and_then(|seat| seats.get_mut(seat)) else {
                warn!("no seat can answer {} {}", event.kind, event.id);
                return Ok(false);
            };
            let response = player.respond(&self.state, &event);
            self.state.resolve(event.id, response)?;
            return Ok(true);
        }

        let actions = self.state.legal_actions();
        if actions.is_empty() {
            return Ok(false);
        }
        let Some(player) = seats.get_mut(self.state.current_player_index()) else {
            return Ok(false);
        };
        match player.decide(&self.state, &actions) {
            Some(action) => {
                self.execute(action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn execute(&mut self, action: GameAction) -> Result<(), GameError> {
        debug!(
            "player {} {} {:?}",
            action.player, action.action_type, action.payload
        );
        self.state.step(action)
    }

    pub fn winning_player(&self) -> Option<PlayerId> {
        self.state.winner().map(|p| p.id)
    }

    /// Events aimed at a player go to that player's seat. Table-wide events
    /// such as role selection go to seat 0, the first human seat whenever
    /// there is one, since autonomous seats are always seated last.
    fn seat_for(&self, event: &GameEvent) -> Option<usize> {
        match event.player {
            Some(id) => self.state.player_index(id),
            None => Some(0),
        }
    }

    fn drain_notifications(&mut self) {
        while let Some(event) = self.state.remove_processed_event() {
            debug!("event {} {} for {:?}", event.id, event.kind, event.player);
        }
    }
}
