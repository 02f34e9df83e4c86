//! Treasure tiles and the event card scripts they run.

mod common;

use boss_trail::game::action::{ActionType, GameAction};
use boss_trail::game::cards::Card;
use boss_trail::game::events::{CardPurpose, EventPayload, EventResponse, PlayerPurpose};
use boss_trail::board::Tile;
use boss_trail::game::{GameError, GameState};
use boss_trail::types::{CardEffect, CardKind, EventKind, Role, TileKind};

use common::*;

const SWAP_ALL_CARDS: u32 = 1;
const BOSS_BATTLE_PASS: u32 = 2;
const RANDOM_DISCARD: u32 = 3;
const NEXT_PLAYER_DISCARD: u32 = 4;
const ALL_PLAYERS_DRAW: u32 = 5;
const ALL_PLAYERS_DISCARD: u32 = 7;
const DICE_BATTLE_STEAL: u32 = 8;

fn on_treasure(roles: &[Role]) -> GameState {
    let tiles = with_tile(plain_tiles(20), tile(3, TileKind::Treasure));
    let mut game = started_game(tiles, roles);
    game.fix_next_roll(1, 3).unwrap();
    game.roll_dice().unwrap();
    game
}

fn open(game: &mut GameState, card: u32) {
    let event = game.awaiting_event().cloned().unwrap();
    assert_eq!(event.kind, EventKind::EventCardDraw);
    game.resolve(event.id, EventResponse::EventCard { card }).unwrap();
}

/// Hand card carrying event card `card`.
fn in_hand(game: &GameState, player: u32, card: u32) -> u32 {
    game.player(player)
        .unwrap()
        .event_cards()
        .find(|c| c.event.as_ref().is_some_and(|e| e.id == card))
        .map(|c| c.id)
        .unwrap()
}

fn open_and_play(game: &mut GameState, card: u32) {
    open(game, card);
    let id = in_hand(game, 1, card);
    assert!(game.play_event_card(1, id).unwrap());
}

/// Answers a discard prompt with the first card offered.
fn discard_first(game: &mut GameState) -> Option<u32> {
    let event = game.awaiting_event().cloned()?;
    let EventPayload::CardChoice { cards, .. } = &event.payload else {
        panic!("expected a card choice, got {:?}", event.payload);
    };
    game.resolve(event.id, EventResponse::Cards { cards: vec![cards[0]] })
        .unwrap();
    event.player
}

fn hand(game: &GameState, player: u32) -> usize {
    game.player(player).unwrap().hand_size()
}

#[test]
fn treasure_offers_every_event_card() {
    let game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    let event = game.awaiting_event().unwrap();
    match &event.payload {
        EventPayload::EventCardDraw { position, offered } => {
            assert_eq!(*position, 3);
            assert_eq!(offered.len(), 8);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn every_treasure_choice_adds_exactly_one_card() {
    let tiles = with_tile(plain_tiles(30), tile(7, TileKind::Treasure));
    for card in 1..=8 {
        let mut game = started_game(tiles.clone(), &[Role::Destiny, Role::SisterFour]);
        let before = hand(&game, 1);
        game.fix_next_roll(1, 7).unwrap();
        game.roll_dice().unwrap();
        open(&mut game, card);

        assert_eq!(position(&game, 1), 7, "card {card}");
        assert_eq!(hand(&game, 1), before + 1, "card {card}");
        assert_eq!(hand(&game, 2), 4, "card {card}");
        assert!(!game.is_suspended());
        assert_eq!(game.held_event_cards(1)[0].id, card);
    }
}

#[test]
fn all_players_draw_returns_the_card_to_the_pile() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour, Role::Pigsy]);
    open(&mut game, ALL_PLAYERS_DRAW);
    assert_eq!(game.event_deck().size(), 7);
    let id = in_hand(&game, 1, ALL_PLAYERS_DRAW);
    assert!(game.play_event_card(1, id).unwrap());

    for id in 1..=3 {
        assert_eq!(hand(&game, id), 5);
    }
    assert_eq!(game.event_deck().size(), 8);
    assert!(!game.is_suspended());
}

#[test]
fn unknown_choice_takes_the_top_card() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open(&mut game, 4242);
    assert_eq!(game.held_event_cards(1).len(), 1);
    assert_eq!(game.event_deck().size(), 7);
}

#[test]
fn boss_pass_is_kept_and_cashed_in_later() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open(&mut game, BOSS_BATTLE_PASS);

    assert_eq!(game.held_event_cards(1).len(), 1);
    assert_eq!(game.event_deck().size(), 7);
    let id = in_hand(&game, 1, BOSS_BATTLE_PASS);
    assert!(
        game.legal_actions()
            .contains(&GameAction::play_event_card(1, id))
    );

    assert!(game.play_event_card(1, id).unwrap());
    let token = game
        .player(1)
        .unwrap()
        .hand()
        .iter()
        .find(|c| c.effect == Some(CardEffect::BossPass))
        .cloned()
        .unwrap();
    assert_eq!(token.energy_value(), 99);
    assert_eq!(hand(&game, 1), 5);
    assert!(game.held_event_cards(1).is_empty());
    assert_eq!(game.event_deck().size(), 8);
    assert!(!game.play_event_card(1, id).unwrap());
}

#[test]
fn swap_all_cards_trades_hands() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    set_hand(&mut game, 2, vec![Card::energy(700, 6, "Cheeseburger")]);
    let mine = game.player(1).unwrap().card_ids();
    open_and_play(&mut game, SWAP_ALL_CARDS);

    let choice = game.awaiting_event().cloned().unwrap();
    assert!(matches!(
        choice.payload,
        EventPayload::PlayerChoice {
            purpose: PlayerPurpose::SwapHands,
            ..
        }
    ));
    game.resolve(choice.id, EventResponse::Player { player: Some(2) })
        .unwrap();

    assert_eq!(game.player(1).unwrap().card_ids(), vec![700]);
    assert_eq!(game.player(2).unwrap().card_ids(), mine);
}

#[test]
fn cancelled_swap_changes_nothing() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open_and_play(&mut game, SWAP_ALL_CARDS);
    let choice = game.awaiting_event().unwrap().id;
    game.resolve(choice, EventResponse::Player { player: None })
        .unwrap();
    assert_eq!(hand(&game, 1), 4);
    assert_eq!(hand(&game, 2), 4);
}

#[test]
fn random_discard_costs_one_card() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open_and_play(&mut game, RANDOM_DISCARD);
    let choice = game.awaiting_event().cloned().unwrap();
    let EventPayload::CardChoice {
        cards,
        hidden,
        purpose,
        ..
    } = &choice.payload
    else {
        panic!("expected a card choice");
    };
    assert!(*hidden);
    assert_eq!(*purpose, CardPurpose::Discard);
    let pick = cards[0];

    game.resolve(choice.id, EventResponse::Cards { cards: vec![pick] })
        .unwrap();
    assert_eq!(hand(&game, 1), 3);
    assert!(!game.player(1).unwrap().has_card(pick));
}

#[test]
fn next_player_discard_asks_both_seats() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour, Role::Pigsy]);
    open_and_play(&mut game, NEXT_PLAYER_DISCARD);

    assert_eq!(discard_first(&mut game), Some(1));
    assert_eq!(discard_first(&mut game), Some(2));
    assert!(!game.is_suspended());

    assert_eq!(hand(&game, 1), 3);
    assert_eq!(hand(&game, 2), 3);
    assert_eq!(hand(&game, 3), 4);
}

#[test]
fn all_players_discard_goes_round_the_table() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour, Role::Pigsy]);
    set_hand(&mut game, 2, Vec::new());
    open_and_play(&mut game, ALL_PLAYERS_DISCARD);

    let mut asked = Vec::new();
    while let Some(player) = discard_first(&mut game) {
        asked.push(Some(player));
    }
    assert_eq!(asked, vec![Some(1), Some(3)]);
    assert_eq!(hand(&game, 1), 3);
    assert_eq!(hand(&game, 3), 3);
}

#[test]
fn dice_battle_resolves_with_engine_rolls() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open_and_play(&mut game, DICE_BATTLE_STEAL);
    let before = hand(&game, 1) + hand(&game, 2);

    let target = game.awaiting_event().unwrap().id;
    game.resolve(target, EventResponse::Player { player: Some(2) })
        .unwrap();
    while let Some(event) = game.awaiting_event().cloned() {
        let response = match &event.payload {
            EventPayload::CardChoice { cards, .. } => EventResponse::Cards {
                cards: vec![cards[0]],
            },
            _ => EventResponse::Acknowledge,
        };
        game.resolve(event.id, response).unwrap();
    }

    assert_eq!(hand(&game, 1) + hand(&game, 2), before);
    assert!(hand(&game, 1) >= 4);
}

#[test]
fn thief_steals_before_drawing() {
    let tiles = with_tile(plain_tiles(20), tile(3, TileKind::Treasure));
    let mut game = started_game(tiles, &[Role::Thief, Role::SisterFour]);
    game.player_mut(2).unwrap().set_position(8);
    game.process_steps(3).unwrap();

    assert_eq!(hand(&game, 1), 5);
    assert_eq!(hand(&game, 2), 3);
    assert_eq!(
        game.awaiting_event().map(|e| e.kind),
        Some(EventKind::EventCardDraw)
    );
}

#[test]
fn declining_your_own_discard_ends_the_script() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open_and_play(&mut game, NEXT_PLAYER_DISCARD);
    let own = game.awaiting_event().unwrap().id;
    game.resolve(own, EventResponse::Acknowledge).unwrap();

    assert!(!game.is_suspended());
    assert_eq!(hand(&game, 1), 4);
    assert_eq!(hand(&game, 2), 4);
}

#[test]
fn event_cards_are_played_as_turn_actions() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open(&mut game, ALL_PLAYERS_DRAW);
    let play = game
        .legal_actions()
        .into_iter()
        .find(|a| a.action_type == ActionType::PlayEventCard)
        .unwrap();
    game.step(play).unwrap();

    assert_eq!(hand(&game, 1), 5);
    assert_eq!(hand(&game, 2), 5);
    assert_eq!(game.player(1).unwrap().count_kind(CardKind::Event), 0);
    assert!(
        game.legal_actions()
            .iter()
            .all(|a| a.action_type != ActionType::PlayEventCard)
    );
}

#[test]
fn only_the_holder_plays_on_their_own_turn() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open(&mut game, ALL_PLAYERS_DRAW);
    let id = in_hand(&game, 1, ALL_PLAYERS_DRAW);

    assert!(!game.play_event_card(2, id).is_ok_and(|played| played));
    game.next_turn().unwrap();
    assert!(matches!(
        game.play_event_card(1, id),
        Err(GameError::OutOfTurn { .. })
    ));
    assert_eq!(game.held_event_cards(1).len(), 1);
}

/// Treasure at 3 and a boss needing 50 at 5; player 1 opens the treasure
/// with an empty hand.
fn treasure_then_boss(card: u32) -> GameState {
    let tiles = with_tile(plain_tiles(20), tile(3, TileKind::Treasure));
    let tiles = with_tile(tiles, Tile::boss(5, 50));
    let mut game = started_game(tiles, &[Role::Destiny, Role::SisterFour]);
    set_hand(&mut game, 1, Vec::new());
    game.fix_next_roll(1, 3).unwrap();
    game.roll_dice().unwrap();
    open(&mut game, card);
    game.process_steps(2).unwrap();
    assert_eq!(
        game.awaiting_event().map(|e| e.kind),
        Some(EventKind::BossBattlePlayCards)
    );
    game
}

#[test]
fn boss_pass_can_be_played_in_its_holders_boss_battle() {
    let mut game = treasure_then_boss(BOSS_BATTLE_PASS);
    let pass = in_hand(&game, 1, BOSS_BATTLE_PASS);
    assert!(game.play_event_card(1, pass).unwrap());

    let token = game
        .player(1)
        .unwrap()
        .hand()
        .iter()
        .find(|c| c.effect == Some(CardEffect::BossPass))
        .map(|c| c.id)
        .unwrap();
    let battle = game.awaiting_event().unwrap().id;
    game.resolve(battle, EventResponse::PlayCards { cards: vec![token] })
        .unwrap();
    assert_eq!(position(&game, 1), 5);
    assert!(!game.is_suspended());
}

#[test]
fn other_event_cards_wait_until_the_battle_is_over() {
    let mut game = treasure_then_boss(ALL_PLAYERS_DRAW);
    let id = in_hand(&game, 1, ALL_PLAYERS_DRAW);
    assert!(matches!(
        game.play_event_card(1, id),
        Err(GameError::AwaitingEvent)
    ));
}

#[test]
fn discarded_event_cards_go_back_to_the_event_pile() {
    let mut game = treasure_then_boss(SWAP_ALL_CARDS);
    let id = in_hand(&game, 1, SWAP_ALL_CARDS);
    assert_eq!(game.event_deck().size(), 7);

    let battle = game.awaiting_event().unwrap().id;
    game.resolve(battle, EventResponse::Retreat { card: Some(id) })
        .unwrap();
    assert_eq!(position(&game, 1), 0);
    assert_eq!(hand(&game, 1), 0);
    assert_eq!(game.event_deck().size(), 8);
    assert!(!game.deck().contains(id));
}

#[test]
fn rolling_seven_on_the_standard_board_opens_a_treasure() {
    let mut game = GameState::new(boss_trail::game::GameConfig::default()).unwrap();
    let id = game.initialize().unwrap();
    game.resolve(id, EventResponse::Roles { selections: Vec::new() })
        .unwrap();
    assert_eq!(game.board().tile(7).map(|t| t.kind), Some(TileKind::Treasure));
    let before = hand(&game, 1);

    game.fix_next_roll(1, 7).unwrap();
    game.roll_dice().unwrap();
    open(&mut game, ALL_PLAYERS_DRAW);

    assert_eq!(position(&game, 1), 7);
    assert_eq!(hand(&game, 1), before + 1);
}

#[test]
fn held_cards_can_be_handed_back() {
    let mut game = on_treasure(&[Role::Destiny, Role::SisterFour]);
    open(&mut game, BOSS_BATTLE_PASS);
    assert_eq!(game.return_event_cards(1, &[BOSS_BATTLE_PASS]), 1);
    assert!(game.held_event_cards(1).is_empty());
    assert_eq!(game.event_deck().size(), 8);
    assert_eq!(hand(&game, 1), 4);
    assert_eq!(game.return_event_cards(1, &[BOSS_BATTLE_PASS]), 0);
}
