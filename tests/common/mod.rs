#![allow(dead_code)]

use boss_trail::board::{Board, Tile};
use boss_trail::game::cards::Card;
use boss_trail::game::events::{EventResponse, RoleSelection};
use boss_trail::game::{GameConfig, GameState};
use boss_trail::types::{PlayerId, Role, TileKind};

pub fn plain_tiles(len: usize) -> Vec<Tile> {
    (0..len).map(Tile::empty).collect()
}

pub fn with_tile(mut tiles: Vec<Tile>, tile: Tile) -> Vec<Tile> {
    let position = tile.position;
    tiles[position] = tile;
    tiles
}

pub fn tile(position: usize, kind: TileKind) -> Tile {
    Tile::new(position, kind)
}

/// Starts a game on `tiles` with one seat per role, in order.
pub fn started_game(tiles: Vec<Tile>, roles: &[Role]) -> GameState {
    let config = GameConfig {
        num_players: roles.len(),
        seed: 7,
        ..GameConfig::default()
    };
    let board = Board::from_tiles(tiles).unwrap();
    let mut game = GameState::with_board(config, board).unwrap();
    let id = game.initialize().unwrap();
    let selections = roles
        .iter()
        .enumerate()
        .map(|(seat, role)| RoleSelection { seat, role: *role })
        .collect();
    game.resolve(id, EventResponse::Roles { selections }).unwrap();
    game
}

pub fn set_hand(game: &mut GameState, player: PlayerId, cards: Vec<Card>) {
    game.player_mut(player).unwrap().replace_hand(cards);
}

pub fn position(game: &GameState, player: PlayerId) -> usize {
    game.player(player).unwrap().position()
}
