//! Saving a game between turns and picking it back up.

mod common;

use boss_trail::board::Tile;
use boss_trail::game::cards::Card;
use boss_trail::game::events::EventResponse;
use boss_trail::game::{GameConfig, GameError, GameSnapshot, GameState};
use boss_trail::types::{Role, TileKind};

use common::*;

fn mid_game() -> GameState {
    let tiles = with_tile(plain_tiles(30), tile(3, TileKind::Treasure));
    let tiles = with_tile(tiles, Tile::boss(20, 8));
    let mut game = started_game(tiles, &[Role::Thief, Role::BigBird, Role::Pigsy]);
    game.player_mut(2).unwrap().set_position(12);
    game.process_steps(3).unwrap();
    let event = game.awaiting_event().unwrap().id;
    game.resolve(event, EventResponse::EventCard { card: 2 }).unwrap();
    game.roll_dice().unwrap();
    game
}

#[test]
fn json_round_trip_restores_the_table() {
    let game = mid_game();
    let json = game.to_json().unwrap();
    assert!(json.contains("\"currentPlayerIndex\""));
    assert!(json.contains("\"keepable\""), "held event cards travel in the hand");

    let restored = GameState::from_json(GameConfig::default(), &json).unwrap();
    assert_eq!(restored.players(), game.players());
    assert_eq!(restored.current_player_index(), game.current_player_index());
    assert_eq!(restored.turn, game.turn);
    assert_eq!(restored.board(), game.board());
    assert_eq!(restored.held_event_cards(1).len(), 1);
    assert_eq!(restored.event_deck().size(), 7);
    assert!(restored.is_started());
    assert!(!restored.is_over());

    for player in restored.players() {
        for card in player.hand() {
            assert!(!restored.deck().contains(card.id), "card {} dealt twice", card.id);
        }
    }
    assert_eq!(restored.config.num_players, 3);
}

#[test]
fn unstarted_snapshot_gives_a_fresh_game() {
    let snapshot = GameSnapshot {
        players: Vec::new(),
        current_player_index: 0,
        game_started: false,
        game_over: false,
        winner: None,
        turn: 0,
        board: None,
    };
    let game = GameState::from_snapshot(GameConfig::default(), snapshot).unwrap();
    assert!(!game.is_started());
    assert_eq!(game.board().len(), 81);
}

#[test]
fn broken_snapshots_are_rejected() {
    let game = mid_game();

    let mut snapshot = game.snapshot();
    snapshot.current_player_index = 9;
    assert!(matches!(
        GameState::from_snapshot(GameConfig::default(), snapshot),
        Err(GameError::InvalidSnapshot(_))
    ));

    let mut snapshot = game.snapshot();
    snapshot.players[1].add_card(Card::energy(4000, 1, "Cone"));
    snapshot.players[2].add_card(Card::energy(4000, 1, "Cone"));
    assert!(matches!(
        GameState::from_snapshot(GameConfig::default(), snapshot),
        Err(GameError::InvalidSnapshot(_))
    ));

    let mut snapshot = game.snapshot();
    let mut copy = snapshot.players[0].event_cards().next().cloned().unwrap();
    copy.id = 4001;
    snapshot.players[1].add_card(copy);
    assert!(matches!(
        GameState::from_snapshot(GameConfig::default(), snapshot),
        Err(GameError::InvalidSnapshot(_))
    ));

    let mut snapshot = game.snapshot();
    snapshot.players[0].set_position(99);
    assert!(matches!(
        GameState::from_snapshot(GameConfig::default(), snapshot),
        Err(GameError::InvalidSnapshot(_))
    ));

    assert!(matches!(
        GameState::from_json(GameConfig::default(), "{not json"),
        Err(GameError::Serialization(_))
    ));
}

#[test]
fn winner_survives_the_round_trip() {
    let mut game = started_game(plain_tiles(8), &[Role::Destiny, Role::SisterFour]);
    game.process_steps(9).unwrap();
    let restored = GameState::from_json(GameConfig::default(), &game.to_json().unwrap()).unwrap();
    assert!(restored.is_over());
    assert_eq!(restored.winner().map(|p| p.id), Some(1));
}
