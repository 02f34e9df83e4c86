use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Tile};

use super::players::Player;
use super::state::{GameConfig, GameError, GameState, MAX_PLAYERS, MIN_PLAYERS};

/// Persisted view of a game between turns. Dice, pending events, and deck
/// order are not kept; a restored game rebuilds them fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<Player>,
    #[serde(default)]
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Vec<Tile>>,
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self.players.clone(),
            current_player_index: self.current_player,
            game_started: self.started,
            game_over: self.over,
            winner: self.winner().cloned(),
            turn: self.turn,
            board: Some(self.board.tiles().to_vec()),
        }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(config: GameConfig, json: &str) -> Result<Self, GameError> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(config, snapshot)
    }

    /// Rebuilds a game from a snapshot. An unstarted snapshot yields a fresh
    /// game; otherwise both piles are rebuilt without the cards already in hand.
    pub fn from_snapshot(mut config: GameConfig, snapshot: GameSnapshot) -> Result<Self, GameError> {
        if snapshot.game_started {
            let count = snapshot.players.len();
            if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
                return Err(GameError::InvalidSnapshot(format!("{count} players")));
            }
            config.num_players = count;
            config.ai_players = snapshot.players.iter().filter(|p| p.is_ai).count();
        }
        let mut game = match snapshot.board {
            Some(tiles) => Self::with_board(config, Board::from_tiles(tiles)?)?,
            None => Self::new(config)?,
        };
        if !snapshot.game_started {
            return Ok(game);
        }

        let players = snapshot.players;
        if snapshot.current_player_index >= players.len() {
            return Err(GameError::InvalidSnapshot(format!(
                "current player index {} out of range",
                snapshot.current_player_index
            )));
        }
        let mut ids = HashSet::new();
        let mut cards = HashSet::new();
        for player in &players {
            if !ids.insert(player.id) {
                return Err(GameError::InvalidSnapshot(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
            if player.position() >= game.board.len() {
                return Err(GameError::InvalidSnapshot(format!(
                    "{} stands off the board at {}",
                    player.name,
                    player.position()
                )));
            }
            for card in player.hand() {
                if !cards.insert(card.id) {
                    return Err(GameError::InvalidSnapshot(format!(
                        "card {} held twice",
                        card.id
                    )));
                }
                match &card.event {
                    Some(event) => {
                        game.event_deck.take(event.id).ok_or_else(|| {
                            GameError::InvalidSnapshot(format!("unknown event card {}", event.id))
                        })?;
                    }
                    None => {
                        game.deck.take(card.id);
                    }
                }
                game.next_token_id = game.next_token_id.max(card.id);
            }
        }

        game.winner = match snapshot.winner {
            Some(winner) => Some(
                players
                    .iter()
                    .position(|p| p.id == winner.id)
                    .ok_or_else(|| GameError::InvalidSnapshot("winner is not seated".into()))?,
            ),
            None => None,
        };
        game.players = players;
        game.current_player = snapshot.current_player_index;
        game.started = true;
        game.over = snapshot.game_over;
        game.turn = snapshot.turn;
        info!(
            "restored game at turn {} with {} players",
            game.turn,
            game.players.len()
        );
        Ok(game)
    }
}
