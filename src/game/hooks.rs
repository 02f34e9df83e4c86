use std::collections::HashMap;

use log::{debug, info};
use once_cell::sync::Lazy;
use rand::Rng;

use crate::board::Tile;
use crate::game::cards::CardId;
use crate::types::{HookKind, Role, TileKind};

use super::state::{Flow, GameError, GameState};

pub(crate) type HookFn = fn(&mut GameState, usize, &Tile) -> Result<Flow, GameError>;

const RESUPPLY_CARDS: usize = 2;

/// Per-role replacements for the default tile hooks. A missing entry, or a
/// `None` slot, falls back to the default behaviour for that tile kind.
#[derive(Clone, Copy, Default)]
pub(crate) struct RoleHandler {
    pub on_pass: Option<HookFn>,
    pub on_stay: Option<HookFn>,
}

static ROLE_HANDLERS: Lazy<HashMap<(Role, TileKind), RoleHandler>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        (Role::BigBird, TileKind::Resupply),
        RoleHandler {
            on_pass: None,
            on_stay: Some(big_bird_resupply),
        },
    );
    table.insert(
        (Role::Milkshake, TileKind::Resupply),
        RoleHandler {
            on_pass: Some(milkshake_resupply),
            on_stay: Some(milkshake_resupply),
        },
    );
    table.insert(
        (Role::Pigsy, TileKind::Reverse),
        RoleHandler {
            on_pass: None,
            on_stay: Some(pigsy_reverse),
        },
    );
    table.insert(
        (Role::Thief, TileKind::Treasure),
        RoleHandler {
            on_pass: None,
            on_stay: Some(thief_treasure),
        },
    );
    table
});

pub(crate) fn trigger(
    game: &mut GameState,
    player: usize,
    tile: &Tile,
    hook: HookKind,
) -> Result<Flow, GameError> {
    let role = game.players[player].role;
    let handler = ROLE_HANDLERS
        .get(&(role, tile.kind))
        .and_then(|handler| match hook {
            HookKind::Pass => handler.on_pass,
            HookKind::Stay => handler.on_stay,
        });
    match (handler, hook) {
        (Some(handler), _) => handler(game, player, tile),
        (None, HookKind::Pass) => on_pass(game, player, tile),
        (None, HookKind::Stay) => on_stay(game, player, tile),
    }
}

fn on_pass(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    match tile.kind {
        TileKind::Resupply => resupply(game, player, tile),
        TileKind::Boss => game.begin_boss_battle(player, tile),
        _ => Ok(Flow::Continue),
    }
}

fn on_stay(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    match tile.kind {
        TileKind::Empty => Ok(Flow::Continue),
        TileKind::Treasure => game.begin_treasure_draw(player, tile.position),
        TileKind::Resupply => resupply(game, player, tile),
        TileKind::Reverse => reverse(game, player, tile),
        TileKind::Boss => game.begin_boss_battle(player, tile),
        TileKind::Teleport => teleport(game, player, tile),
    }
}

fn resupply(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    let drawn = game.draw_into_hand(player, RESUPPLY_CARDS);
    debug!(
        "{} resupplied {drawn} cards at {}",
        game.players[player].name, tile.position
    );
    Ok(Flow::Continue)
}

fn reverse(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    let player = &mut game.players[player];
    player.reverse_direction();
    info!(
        "{} turned around at {}, now facing {}",
        player.name, tile.position, player.direction
    );
    Ok(Flow::Continue)
}

fn teleport(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    let target = game
        .board
        .next_teleport(tile.position)
        .unwrap_or_else(|| game.board.last_position());
    info!(
        "{} teleported from {} to {target}",
        game.players[player].name, tile.position
    );
    game.players[player].set_position(target);
    Ok(Flow::Continue)
}

fn big_bird_resupply(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    resupply(game, player, tile)?;
    game.enqueue_steps(player, 1);
    Ok(Flow::Continue)
}

fn milkshake_resupply(
    game: &mut GameState,
    player: usize,
    tile: &Tile,
) -> Result<Flow, GameError> {
    resupply(game, player, tile)?;
    game.draw_into_hand(player, 1);
    Ok(Flow::Continue)
}

fn pigsy_reverse(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    debug!(
        "{} ignores the reverse tile at {}",
        game.players[player].name, tile.position
    );
    Ok(Flow::Continue)
}

fn thief_treasure(game: &mut GameState, player: usize, tile: &Tile) -> Result<Flow, GameError> {
    steal_from_leader(game, player);
    on_stay(game, player, tile)
}

/// Takes a random card from the furthest-ahead opponent who has any.
fn steal_from_leader(game: &mut GameState, thief: usize) -> Option<CardId> {
    let leader = game
        .players
        .iter()
        .enumerate()
        .filter(|(index, p)| *index != thief && p.hand_size() > 0)
        .max_by_key(|(_, p)| p.position())
        .map(|(index, _)| index)?;
    let pick = game.rng.gen_range(0..game.players[leader].hand_size());
    let card_id = game.players[leader].hand()[pick].id;
    let card = game.players[leader].remove_card(card_id)?;
    info!(
        "{} stole {} from {}",
        game.players[thief].name, card.name, game.players[leader].name
    );
    game.players[thief].add_card(card);
    Some(card_id)
}
