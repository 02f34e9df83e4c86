use std::collections::{HashSet, VecDeque};

use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, BoardLayout};
use crate::players::agent;
use crate::types::{CardEffect, Direction, EventKind, HookKind, PlayerId, Role};

use super::{
    action::{ActionPayload, ActionType, GameAction},
    boss::BossBattle,
    cards::{Card, CardId},
    deck::CardDeck,
    dice::{Dice, DiceResult},
    event_cards::{EventCard, EventCardDeck, EventCardId},
    events::{EventBus, EventId, EventPayload, EventResponse, GameEvent, SubscriptionId},
    hooks,
    players::Player,
    scripts::ScriptStep,
};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
pub const STARTING_HAND: usize = 4;
const TOKEN_ID_BASE: CardId = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub ai_players: usize,
    pub layout: BoardLayout,
    pub starting_hand: usize,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            ai_players: 0,
            layout: BoardLayout::standard(),
            starting_hand: STARTING_HAND,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Rolling,
    Stepping,
    AwaitingEvent,
    TurnComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    AwaitingRoles,
    Playing(TurnPhase),
    Completed { winner: Option<PlayerId> },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("player count {0} is outside 2..=6")]
    InvalidPlayerCount(usize),
    #[error("{ai} autonomous seats requested for {players} players")]
    InvalidAiCount { ai: usize, players: usize },
    #[error("game has not started")]
    NotStarted,
    #[error("game already started")]
    AlreadyStarted,
    #[error("game already completed")]
    GameFinished,
    #[error("illegal roll: {0}")]
    IllegalRoll(&'static str),
    #[error("illegal action: {0}")]
    IllegalAction(&'static str),
    #[error("player {actual} acted during player {expected}'s turn")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("card {0} is not a castable spell")]
    NotASpell(CardId),
    #[error("an event is waiting for a response")]
    AwaitingEvent,
    #[error("a movement is still in progress")]
    MovementInProgress,
    #[error("cannot draw {requested} cards, only {available} left")]
    CannotDraw { requested: usize, available: usize },
    #[error("discard pile is empty")]
    EmptyDiscard,
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("snapshot encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One cell entered during a movement and the hook it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub player: PlayerId,
    pub position: usize,
    pub hook: HookKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Suspended(EventId),
}

/// Resume points for every event the engine can suspend on.
#[derive(Debug, Clone)]
pub(crate) enum Continuation {
    RoleSelection,
    TreasureDraw { player: usize, position: usize },
    BossCommit(BossBattle),
    BossRetreat(BossBattle),
    FixDice { player: usize, card: CardId },
    SwapTarget { player: usize, card: CardId },
    ShieldDecision { caster: usize, target: usize, card: CardId },
    Script(ScriptStep),
}

/// Queue of step deltas. Each delta is relative to the mover's facing at the
/// moment it starts, so a reversal mid-sequence turns the remainder around.
#[derive(Debug, Clone)]
pub(crate) struct Movement {
    pub player: usize,
    pub remaining: i32,
    pub queue: VecDeque<i32>,
    pub from_roll: bool,
}

#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub(crate) board: Board,
    pub(crate) players: Vec<Player>,
    pub(crate) current_player: usize,
    pub(crate) started: bool,
    pub(crate) over: bool,
    pub(crate) winner: Option<usize>,
    pub(crate) dice: Dice,
    pub(crate) deck: CardDeck,
    pub(crate) event_deck: EventCardDeck,
    pub(crate) events: EventBus<Continuation>,
    pub(crate) movement: Option<Movement>,
    pub(crate) fixed_roll: Option<(usize, u8)>,
    pub(crate) step_log: Vec<StepRecord>,
    pub(crate) next_token_id: CardId,
    pub turn: u32,
    pub(crate) rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = Board::generate(&config.layout, &mut rng)?;
        Self::assemble(config, board, rng)
    }

    /// Uses a prepared board instead of generating one from the layout.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, GameError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, board, rng)
    }

    fn assemble(config: GameConfig, board: Board, mut rng: StdRng) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(GameError::InvalidPlayerCount(config.num_players));
        }
        if config.ai_players > config.num_players {
            return Err(GameError::InvalidAiCount {
                ai: config.ai_players,
                players: config.num_players,
            });
        }
        let deck = CardDeck::standard(&mut rng);
        let event_deck = EventCardDeck::standard(&mut rng);
        Ok(Self {
            config,
            board,
            players: Vec::new(),
            current_player: 0,
            started: false,
            over: false,
            winner: None,
            dice: Dice::new(),
            deck,
            event_deck,
            events: EventBus::new(),
            movement: None,
            fixed_roll: None,
            step_log: Vec::new(),
            next_token_id: TOKEN_ID_BASE,
            turn: 0,
            rng,
        })
    }

    /// Publishes the role selection request. Calling it again while the
    /// request is outstanding returns the same event id.
    pub fn initialize(&mut self) -> Result<EventId, GameError> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        if let Some(event) = self
            .events
            .awaiting()
            .filter(|e| e.kind == EventKind::RoleSelection)
        {
            return Ok(event.id);
        }
        info!(
            "waiting for role selection: {} players, {} autonomous",
            self.config.num_players, self.config.ai_players
        );
        Ok(self.events.suspend(
            None,
            EventPayload::RoleSelection {
                total_players: self.config.num_players,
                ai_players: self.config.ai_players,
                available_roles: Role::ALL.to_vec(),
            },
            Continuation::RoleSelection,
        ))
    }

    fn finish_role_selection(&mut self, response: &EventResponse) -> Result<Flow, GameError> {
        let total = self.config.num_players;
        let first_ai_seat = total - self.config.ai_players;
        let mut roles: Vec<Option<Role>> = vec![None; total];
        let mut taken = HashSet::new();

        for selection in response.roles() {
            let free_seat = roles.get(selection.seat).is_some_and(Option::is_none);
            if free_seat && taken.insert(selection.role) {
                roles[selection.seat] = Some(selection.role);
            } else {
                warn!(
                    "ignoring role {} for seat {}",
                    selection.role, selection.seat
                );
            }
        }

        let mut players = Vec::with_capacity(total);
        for (seat, role) in roles.into_iter().enumerate() {
            let role = match role {
                Some(role) => role,
                None => {
                    let available: Vec<Role> = Role::ALL
                        .into_iter()
                        .filter(|r| !taken.contains(r))
                        .collect();
                    let role = agent::pick_role(&available, &mut self.rng)
                        .ok_or(GameError::IllegalAction("no roles left to assign"))?;
                    taken.insert(role);
                    role
                }
            };
            let id = seat as PlayerId + 1;
            players.push(Player::new(
                id,
                format!("Player {id}"),
                role,
                seat >= first_ai_seat,
            ));
        }

        for player in players.iter_mut() {
            let hand = self.deck.draw(self.config.starting_hand, &mut self.rng)?;
            player.add_cards(hand);
            info!("{} plays as {}", player.name, player.role);
        }

        self.players = players;
        self.current_player = 0;
        self.dice.reset();
        self.started = true;
        Ok(Flow::Continue)
    }

    /// Rolls for the current player and walks the result.
    pub fn roll_dice(&mut self) -> Result<DiceResult, GameError> {
        self.ensure_playing()?;
        self.ensure_idle()?;
        self.dice.begin_roll()?;

        let player = self.current_player;
        let result = match self.fixed_roll.take() {
            Some((owner, total)) if owner == player => self.dice.settle_with(DiceResult::fixed(total)),
            other => {
                self.fixed_roll = other;
                self.dice.settle(&mut self.rng)
            }
        };
        info!(
            "{} rolled {} + {} = {}",
            self.players[player].name, result.dice1, result.dice2, result.total
        );
        self.start_movement(player, result.total as i32, true)?;
        Ok(result)
    }

    /// Moves the current player. Positive steps follow the player's facing.
    /// While a movement is underway the steps are queued behind it.
    pub fn process_steps(&mut self, steps: i32) -> Result<(), GameError> {
        self.ensure_playing()?;
        if let Some(movement) = self.movement.as_mut() {
            movement.queue.push_back(steps);
            return Ok(());
        }
        self.ensure_idle()?;
        self.start_movement(self.current_player, steps, false)
    }

    /// Answers a suspended event. Unknown or already answered ids are ignored.
    pub fn resolve(&mut self, id: EventId, response: EventResponse) -> Result<GamePhase, GameError> {
        let Some(continuation) = self.events.complete(id) else {
            debug!("no continuation waiting on {id}");
            return Ok(self.phase());
        };
        if let Flow::Continue = self.resume(continuation, &response)? {
            self.advance_movement()?;
        }
        Ok(self.phase())
    }

    fn resume(
        &mut self,
        continuation: Continuation,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        match continuation {
            Continuation::RoleSelection => self.finish_role_selection(response),
            Continuation::TreasureDraw { player, position } => {
                self.finish_treasure_draw(player, position, response)
            }
            Continuation::BossCommit(battle) => self.finish_boss_commit(battle, response),
            Continuation::BossRetreat(battle) => self.finish_boss_retreat(battle, response),
            Continuation::FixDice { player, card } => self.finish_fix_dice(player, card, response),
            Continuation::SwapTarget { player, card } => {
                self.finish_swap_target(player, card, response)
            }
            Continuation::ShieldDecision {
                caster,
                target,
                card,
            } => self.finish_shield_decision(caster, target, card, response),
            Continuation::Script(step) => self.resume_script(step, response),
        }
    }

    /// Ends the current turn and hands the dice to the next seat.
    pub fn next_turn(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        self.ensure_idle()?;
        let previous = self.players[self.current_player].id;
        self.dice.reset();
        self.current_player = (self.current_player + 1) % self.players.len();
        self.turn += 1;
        let next = self.players[self.current_player].id;
        debug!("turn {} passes from player {previous} to player {next}", self.turn);
        self.events
            .publish(Some(previous), EventPayload::TurnEnd { next_player: next });
        Ok(())
    }

    pub fn legal_actions(&self) -> Vec<GameAction> {
        if !self.started || self.over || self.events.is_suspended() || self.movement.is_some() {
            return Vec::new();
        }
        let player = &self.players[self.current_player];
        let mut actions = Vec::new();
        if self.dice.can_roll() {
            actions.push(GameAction::roll(player.id));
        }
        for card in player.spells() {
            let castable = match card.effect {
                Some(CardEffect::FixDice) => self.dice.can_roll() && self.fixed_roll.is_none(),
                Some(CardEffect::ExtraTurn) | Some(CardEffect::SwapPosition) => true,
                _ => false,
            };
            if castable {
                actions.push(GameAction::cast_spell(player.id, card.id));
            }
        }
        for card in player.event_cards() {
            actions.push(GameAction::play_event_card(player.id, card.id));
        }
        if self.dice.roll_count() > 0 {
            actions.push(GameAction::end_turn(player.id));
        }
        actions
    }

    pub fn step(&mut self, action: GameAction) -> Result<(), GameError> {
        self.ensure_playing()?;
        let expected = self.players[self.current_player].id;
        if action.player != expected {
            return Err(GameError::OutOfTurn {
                expected,
                actual: action.player,
            });
        }
        match (action.action_type, action.payload) {
            (ActionType::Roll, _) => self.roll_dice().map(|_| ()),
            (ActionType::CastSpell, ActionPayload::Card(card)) => {
                self.cast_spell(action.player, card).map(|_| ())
            }
            (ActionType::PlayEventCard, ActionPayload::Card(card)) => {
                self.play_event_card(action.player, card).map(|_| ())
            }
            (ActionType::EndTurn, _) => self.next_turn(),
            _ => Err(GameError::IllegalAction("action is missing its card")),
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.over {
            return GamePhase::Completed {
                winner: self.winner().map(|p| p.id),
            };
        }
        if !self.started {
            return if self.events.is_suspended() {
                GamePhase::AwaitingRoles
            } else {
                GamePhase::NotStarted
            };
        }
        let turn = if self.events.is_suspended() {
            TurnPhase::AwaitingEvent
        } else if self.movement.is_some() {
            TurnPhase::Stepping
        } else if self.dice.can_roll() {
            TurnPhase::Rolling
        } else {
            TurnPhase::TurnComplete
        };
        GamePhase::Playing(turn)
    }

    /// Sets the total of `player`'s next roll, clamped to 2..=12.
    pub fn fix_next_roll(&mut self, player: PlayerId, total: u8) -> Result<(), GameError> {
        let index = self.player_index(player).ok_or(GameError::UnknownPlayer(player))?;
        self.fixed_roll = Some((index, total.clamp(2, 12)));
        Ok(())
    }

    pub(crate) fn start_movement(
        &mut self,
        player: usize,
        steps: i32,
        from_roll: bool,
    ) -> Result<(), GameError> {
        self.step_log.clear();
        self.movement = Some(Movement {
            player,
            remaining: steps * self.players[player].direction.sign(),
            queue: VecDeque::new(),
            from_roll,
        });
        self.advance_movement()
    }

    /// Appends steps to `player`'s running movement.
    pub(crate) fn enqueue_steps(&mut self, player: usize, steps: i32) {
        match self.movement.as_mut() {
            Some(movement) if movement.player == player => movement.queue.push_back(steps),
            _ => warn!("dropping {steps} queued steps, player {player} is not moving"),
        }
    }

    /// Walks the active movement cell by cell until it drains, suspends, or
    /// someone reaches the final tile.
    pub(crate) fn advance_movement(&mut self) -> Result<(), GameError> {
        let last = self.board.last_position();
        loop {
            if self.over || self.events.is_suspended() {
                return Ok(());
            }
            let Some(movement) = self.movement.as_mut() else {
                return Ok(());
            };
            let player = movement.player;
            if self.players[player].position() >= last {
                self.finish_movement();
                self.declare_winner(player);
                return Ok(());
            }
            if movement.remaining == 0 {
                match movement.queue.pop_front() {
                    Some(delta) => {
                        movement.remaining = delta * self.players[player].direction.sign();
                        continue;
                    }
                    None => {
                        self.finish_movement();
                        return Ok(());
                    }
                }
            }

            let from = self.players[player].position();
            let step = movement.remaining.signum();
            if step < 0 && from == 0 {
                movement.remaining = 0;
                continue;
            }
            let to = if step > 0 { from + 1 } else { from - 1 };
            movement.remaining -= step;
            if to >= last || (step < 0 && to == 0) {
                movement.remaining = 0;
            }
            let hook = if movement.remaining == 0 {
                HookKind::Stay
            } else {
                HookKind::Pass
            };

            self.players[player].set_position(to);
            let id = self.players[player].id;
            debug!("player {id} {hook} tile {to}");
            self.step_log.push(StepRecord {
                player: id,
                position: to,
                hook,
            });

            let Some(tile) = self.board.tile(to).cloned() else {
                continue;
            };
            if let Flow::Suspended(_) = hooks::trigger(self, player, &tile, hook)? {
                return Ok(());
            }
        }
    }

    fn finish_movement(&mut self) {
        if let Some(movement) = self.movement.take() {
            self.players[movement.player].direction = Direction::Forward;
            if movement.from_roll {
                self.dice.increment_roll_count();
            }
        }
    }

    fn declare_winner(&mut self, player: usize) {
        if self.over {
            return;
        }
        self.over = true;
        self.winner = Some(player);
        let id = self.players[player].id;
        info!("{} reached the final tile and wins", self.players[player].name);
        self.events
            .publish(Some(id), EventPayload::GameOver { winner: id });
    }

    pub(crate) fn suspend(
        &mut self,
        player: Option<usize>,
        payload: EventPayload,
        continuation: Continuation,
    ) -> Flow {
        let player = player.map(|index| self.players[index].id);
        Flow::Suspended(self.events.suspend(player, payload, continuation))
    }

    /// Draws up to `count` cards into `player`'s hand, returning how many arrived.
    pub(crate) fn draw_into_hand(&mut self, player: usize, count: usize) -> usize {
        let cards = self.deck.draw_up_to(count, &mut self.rng);
        let drawn = cards.len();
        if drawn < count {
            warn!("deck ran short: wanted {count}, drew {drawn}");
        }
        self.players[player].add_cards(cards);
        drawn
    }

    /// Removes a card from `player`'s hand. Deck cards go to the discard pile,
    /// event cards back to the event pile, tokens disappear.
    pub(crate) fn discard_from_hand(&mut self, player: usize, card: CardId) -> Option<Card> {
        let card = self.players[player].remove_card(card)?;
        if let Some(event) = &card.event {
            self.event_deck.restore(event.clone(), &mut self.rng);
        } else if card.returns_to_deck() {
            self.deck.discard(card.clone());
        }
        Some(card)
    }

    pub(crate) fn mint_token_id(&mut self) -> CardId {
        self.next_token_id += 1;
        self.next_token_id
    }

    pub(crate) fn other_players(&self, player: usize) -> Vec<PlayerId> {
        self.players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != player)
            .map(|(_, p)| p.id)
            .collect()
    }

    pub(crate) fn ensure_playing(&self) -> Result<(), GameError> {
        if self.over {
            return Err(GameError::GameFinished);
        }
        if !self.started {
            return Err(GameError::NotStarted);
        }
        Ok(())
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), GameError> {
        if self.events.is_suspended() {
            return Err(GameError::AwaitingEvent);
        }
        if self.movement.is_some() {
            return Err(GameError::MovementInProgress);
        }
        Ok(())
    }

    pub(crate) fn ensure_turn_of(&self, player: PlayerId) -> Result<usize, GameError> {
        self.ensure_playing()?;
        let expected = self.players[self.current_player].id;
        if player != expected {
            return Err(GameError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        Ok(self.current_player)
    }

    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player)
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|index| self.players.get(index))
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut CardDeck {
        &mut self.deck
    }

    pub fn event_deck(&self) -> &EventCardDeck {
        &self.event_deck
    }

    pub fn held_event_cards(&self, player: PlayerId) -> Vec<&EventCard> {
        self.player(player)
            .map(|p| p.event_cards().filter_map(|c| c.event.as_ref()).collect())
            .unwrap_or_default()
    }

    /// Puts the listed event cards from `player`'s hand back into the event
    /// pile. Ids the player does not hold are skipped.
    pub fn return_event_cards(&mut self, player: PlayerId, ids: &[EventCardId]) -> usize {
        let Some(index) = self.player_index(player) else {
            return 0;
        };
        let cards: Vec<CardId> = self.players[index]
            .event_cards()
            .filter(|c| c.event.as_ref().is_some_and(|e| ids.contains(&e.id)))
            .map(|c| c.id)
            .collect();
        cards
            .into_iter()
            .filter_map(|id| self.discard_from_hand(index, id))
            .count()
    }

    /// Cells entered by the most recent movement, in order.
    pub fn step_log(&self) -> &[StepRecord] {
        &self.step_log
    }

    pub fn is_suspended(&self) -> bool {
        self.events.is_suspended()
    }

    pub fn awaiting_event(&self) -> Option<&GameEvent> {
        self.events.awaiting()
    }

    pub fn pending_event(&self) -> Option<&GameEvent> {
        self.events.pending_event()
    }

    pub fn remove_processed_event(&mut self) -> Option<GameEvent> {
        self.events.remove_processed_event()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
