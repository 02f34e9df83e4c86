//! Autonomous seats: the rule-based agent and the random player driving
//! whole games through the suspend/resume loop.

mod common;

use boss_trail::board::Tile;
use boss_trail::game::cards::Card;
use boss_trail::game::events::{EventPayload, EventResponse};
use boss_trail::game::game::TURNS_LIMIT;
use boss_trail::game::{Game, GameConfig};
use boss_trail::players::{Agent, BasePlayer, Decision, DecisionContext, DecisionKind, RandomPlayer};
use boss_trail::players::agent::{Choice, Urgency, cheapest_commit};
use boss_trail::types::{CardEffect, Role, TileKind};

use common::*;

fn finishes<P: BasePlayer>(seats: &mut [P], seed: u64) {
    let config = GameConfig {
        num_players: seats.len(),
        ai_players: seats.len(),
        seed,
        ..GameConfig::default()
    };
    let mut game = Game::new(config).unwrap();
    let winner = game.play(seats).unwrap();
    match winner {
        Some(id) => {
            assert!(game.state.is_over());
            let last = game.state.board().last_position();
            assert_eq!(game.state.player(id).unwrap().position(), last);
        }
        None => assert!(game.state.turn >= TURNS_LIMIT),
    }
}

#[test]
fn agents_play_full_games() {
    for seed in 0..5 {
        let mut seats: Vec<Agent> = (0..3).map(|i| Agent::new(seed * 10 + i)).collect();
        finishes(&mut seats, seed);
    }
}

#[test]
fn random_players_play_full_games() {
    for seed in 0..5 {
        let mut seats: Vec<RandomPlayer> = (0..4).map(|i| RandomPlayer::new(seed * 10 + i)).collect();
        finishes(&mut seats, seed);
    }
}

#[test]
fn agent_commits_the_cheapest_sufficient_cards() {
    let tiles = with_tile(plain_tiles(30), Tile::boss(2, 7));
    let mut game = started_game(tiles, &[Role::Destiny, Role::SisterFour]);
    set_hand(
        &mut game,
        1,
        vec![
            Card::energy(501, 6, "Cheeseburger"),
            Card::energy(502, 1, "Cone"),
            Card::energy(503, 3, "Fries"),
            Card::energy(504, 3, "Fries"),
            Card::spell(505, CardEffect::ExtraTurn, 3),
        ],
    );
    game.process_steps(2).unwrap();
    let event = game.awaiting_event().cloned().unwrap();

    let mut agent = Agent::new(1);
    let response = agent.respond(&game, &event);
    let EventResponse::PlayCards { mut cards } = response else {
        panic!("expected a commit, got {response:?}");
    };
    cards.sort();
    let energy: u32 = cards
        .iter()
        .map(|id| game.player(1).unwrap().card(*id).unwrap().energy_value())
        .sum();
    assert_eq!(energy, 7);
    assert!(!cards.contains(&505));

    game.resolve(event.id, EventResponse::PlayCards { cards }).unwrap();
    assert_eq!(position(&game, 1), 2);
}

#[test]
fn agent_retreats_with_its_cheapest_card_when_short() {
    let tiles = with_tile(plain_tiles(30), Tile::boss(2, 40));
    let mut game = started_game(tiles, &[Role::Destiny, Role::SisterFour]);
    set_hand(
        &mut game,
        1,
        vec![
            Card::energy(501, 6, "Cheeseburger"),
            Card::energy(502, 1, "Cone"),
        ],
    );
    game.process_steps(2).unwrap();
    let event = game.awaiting_event().cloned().unwrap();

    let response = Agent::new(1).respond(&game, &event);
    assert_eq!(response, EventResponse::Retreat { card: Some(502) });
}

#[test]
fn agent_swaps_only_with_someone_ahead() {
    let mut game = started_game(plain_tiles(60), &[Role::Destiny, Role::SisterFour, Role::Pigsy]);
    game.player_mut(1).unwrap().set_position(10);
    game.player_mut(2).unwrap().set_position(5);
    game.player_mut(3).unwrap().set_position(30);
    let mut agent = Agent::new(4);

    let context = DecisionContext::Players {
        candidates: vec![2, 3],
        purpose: None,
    };
    let decision = agent.decide(&game, 1, DecisionKind::ChoosePlayer, &context);
    assert_eq!(decision.choice, Choice::Player(3));

    let context = DecisionContext::Players {
        candidates: vec![2],
        purpose: None,
    };
    let decision = agent.decide(&game, 1, DecisionKind::ChoosePlayer, &context);
    assert_eq!(decision.choice, Choice::Nothing);
}

#[test]
fn agent_steers_fixed_dice_onto_the_finish() {
    let tiles = with_tile(plain_tiles(30), tile(25, TileKind::Reverse));
    let mut game = started_game(tiles, &[Role::Destiny, Role::SisterFour]);
    game.player_mut(1).unwrap().set_position(20);

    let Decision { choice, .. } = Agent::new(2).decide(
        &game,
        1,
        DecisionKind::ChooseDiceValue,
        &DecisionContext::DiceRange { min: 2, max: 12 },
    );
    let Choice::DiceValue(total) = choice else {
        panic!("expected a dice value, got {choice:?}");
    };
    assert!(total >= 9, "total {total} falls short of the finish");
}

#[test]
fn agent_avoids_a_boss_it_cannot_beat() {
    let tiles = with_tile(plain_tiles(60), Tile::boss(8, 50));
    let tiles = with_tile(tiles, tile(4, TileKind::Treasure));
    let mut game = started_game(tiles, &[Role::Destiny, Role::SisterFour]);

    let Decision { choice, .. } = Agent::new(2).decide(
        &game,
        1,
        DecisionKind::ChooseDiceValue,
        &DecisionContext::DiceRange { min: 2, max: 12 },
    );
    assert_eq!(choice, Choice::DiceValue(4));
    game.fix_next_roll(1, 4).unwrap();
    game.roll_dice().unwrap();
    assert_eq!(position(&game, 1), 4);
}

#[test]
fn assessment_tracks_the_race() {
    let mut game = started_game(plain_tiles(60), &[Role::Destiny, Role::SisterFour]);
    game.player_mut(1).unwrap().set_position(52);
    game.player_mut(2).unwrap().set_position(40);

    let agent = Agent::new(0);
    let me = agent.assess(&game, 1).unwrap();
    assert!(me.is_leading);
    assert_eq!(me.lead_distance, 12);
    assert_eq!(me.tiles_to_end, 8);
    assert_eq!(me.urgency, Urgency::High);
    assert_eq!(me.closest_opponent, Some(2));

    let them = agent.assess(&game, 2).unwrap();
    assert!(!them.is_leading);
    assert_eq!(them.urgency, Urgency::Medium);
    assert!(agent.assess(&game, 9).is_err());
}

#[test]
fn mismatched_context_yields_nothing() {
    let game = started_game(plain_tiles(20), &[Role::Destiny, Role::SisterFour]);
    let decision = Agent::new(0).decide(&game, 1, DecisionKind::BossBattle, &DecisionContext::None);
    assert_eq!(decision.choice, Choice::Nothing);
    assert_eq!(decision.confidence, 0.0);
}

#[test]
fn agent_fills_every_seat_with_a_distinct_role() {
    let config = GameConfig {
        num_players: 6,
        ai_players: 6,
        ..GameConfig::default()
    };
    let mut game = Game::new(config).unwrap();
    let id = game.state.initialize().unwrap();
    let event = game.state.awaiting_event().cloned().unwrap();
    assert!(matches!(event.payload, EventPayload::RoleSelection { .. }));

    let response = Agent::new(5).respond(&game.state, &event);
    game.state.resolve(id, response).unwrap();
    let mut roles: Vec<Role> = game.state.players().iter().map(|p| p.role).collect();
    roles.sort();
    roles.dedup();
    assert_eq!(roles.len(), 6);
    assert!(game.state.players().iter().all(|p| p.is_ai));
}

#[test]
fn subset_sum_handles_an_empty_hand() {
    assert_eq!(cheapest_commit(&[], 0), Some(Vec::new()));
    assert_eq!(cheapest_commit(&[], 1), None);
}
