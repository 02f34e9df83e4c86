use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::types::{EventCardKind, EventKind, PlayerId};

use super::cards::{Card, CardId};
use super::dice::DiceResult;
use super::events::{CardPurpose, EventPayload, EventResponse, PlayerPurpose};
use super::state::{Continuation, Flow, GameError, GameState};

/// Resume points inside multi-stage event cards.
#[derive(Debug, Clone)]
pub(crate) enum ScriptStep {
    SwapHands {
        player: usize,
    },
    RandomDiscard {
        player: usize,
    },
    OwnDiscard {
        player: usize,
        next: usize,
    },
    NextDiscard {
        next: usize,
    },
    RoundDiscard {
        current: usize,
        rest: VecDeque<usize>,
    },
    BattleTarget {
        player: usize,
    },
    ChallengerRoll {
        player: usize,
        target: usize,
    },
    DefenderRoll {
        player: usize,
        target: usize,
        challenger: u8,
    },
    BattleSteal {
        player: usize,
        target: usize,
    },
}

impl GameState {
    pub(crate) fn begin_treasure_draw(
        &mut self,
        player: usize,
        position: usize,
    ) -> Result<Flow, GameError> {
        if self.event_deck.is_empty() {
            debug!("event deck is empty, treasure at {position} yields nothing");
            return Ok(Flow::Continue);
        }
        let payload = EventPayload::EventCardDraw {
            position,
            offered: self.event_deck.card_ids(),
        };
        Ok(self.suspend(
            Some(player),
            payload,
            Continuation::TreasureDraw { player, position },
        ))
    }

    /// The chosen event card goes into the player's hand. An unrecognised
    /// choice takes the top card of the event pile.
    pub(crate) fn finish_treasure_draw(
        &mut self,
        player: usize,
        position: usize,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        let chosen = response
            .event_card()
            .filter(|id| self.event_deck.card(*id).is_some())
            .or_else(|| self.event_deck.card_ids().last().copied());
        let Some(card) = chosen.and_then(|id| self.event_deck.take(id)) else {
            return Ok(Flow::Continue);
        };
        info!(
            "{} opened the treasure at {position}: {}",
            self.players[player].name, card.name
        );
        let id = self.mint_token_id();
        self.players[player].add_card(Card::event(id, card));
        Ok(Flow::Continue)
    }

    /// Plays an event card from `player`'s hand and returns it to the event
    /// pile. Allowed on the holder's own idle turn; a keepable card may also be
    /// played while the holder is answering a boss battle.
    pub fn play_event_card(&mut self, player: PlayerId, card: CardId) -> Result<bool, GameError> {
        let index = self
            .player_index(player)
            .ok_or(GameError::UnknownPlayer(player))?;
        let Some(event) = self.players[index].card(card).and_then(|c| c.event.clone()) else {
            debug!("player {player} holds no event card {card}");
            return Ok(false);
        };
        let facing_boss = self
            .events
            .awaiting()
            .is_some_and(|e| e.kind == EventKind::BossBattlePlayCards && e.player == Some(player));
        if event.keepable && facing_boss {
            self.ensure_playing()?;
        } else {
            self.ensure_turn_of(player)?;
            self.ensure_idle()?;
        }

        self.players[index].remove_card(card);
        info!("{} plays {}", self.players[index].name, event.name);
        let kind = event.kind;
        self.event_deck.restore(event, &mut self.rng);
        self.run_event_card(index, kind)?;
        Ok(true)
    }

    fn run_event_card(&mut self, player: usize, kind: EventCardKind) -> Result<Flow, GameError> {
        let count = self.players.len();
        match kind {
            EventCardKind::SwapAllCards => {
                let payload = EventPayload::PlayerChoice {
                    candidates: self.other_players(player),
                    can_cancel: true,
                    purpose: PlayerPurpose::SwapHands,
                };
                Ok(self.script(player, payload, ScriptStep::SwapHands { player }))
            }
            EventCardKind::BossBattlePass => {
                let id = self.mint_token_id();
                self.players[player].add_card(Card::boss_pass(id));
                info!("{} cashed in a boss pass", self.players[player].name);
                Ok(Flow::Continue)
            }
            EventCardKind::RandomDiscard => {
                if self.players[player].hand_size() == 0 {
                    return Ok(Flow::Continue);
                }
                Ok(self.prompt_discard(player, true, ScriptStep::RandomDiscard { player }))
            }
            EventCardKind::NextPlayerDiscard => {
                let next = (player + 1) % count;
                if self.players[player].hand_size() == 0 {
                    return Ok(self.next_player_discard(next));
                }
                Ok(self.prompt_discard(player, false, ScriptStep::OwnDiscard { player, next }))
            }
            EventCardKind::AllPlayersDraw => {
                for index in 0..count {
                    self.draw_into_hand(index, 1);
                }
                Ok(Flow::Continue)
            }
            EventCardKind::PrevPlayerDraw => {
                let previous = (player + count - 1) % count;
                self.draw_into_hand(player, 1);
                self.draw_into_hand(previous, 1);
                Ok(Flow::Continue)
            }
            EventCardKind::AllPlayersDiscard => {
                let order = (0..count).map(|offset| (player + offset) % count).collect();
                Ok(self.round_discard(order))
            }
            EventCardKind::DiceBattleSteal => {
                let payload = EventPayload::PlayerChoice {
                    candidates: self.other_players(player),
                    can_cancel: true,
                    purpose: PlayerPurpose::DiceBattle,
                };
                Ok(self.script(player, payload, ScriptStep::BattleTarget { player }))
            }
        }
    }

    pub(crate) fn resume_script(
        &mut self,
        step: ScriptStep,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        match step {
            ScriptStep::SwapHands { player } => {
                let Some(target) = self.chosen_opponent(player, response) else {
                    return Ok(Flow::Continue);
                };
                let mine = self.players[player].take_hand();
                let theirs = self.players[target].take_hand();
                self.players[player].replace_hand(theirs);
                self.players[target].replace_hand(mine);
                info!(
                    "{} swapped hands with {}",
                    self.players[player].name, self.players[target].name
                );
                Ok(Flow::Continue)
            }
            ScriptStep::RandomDiscard { player } => {
                self.discard_choice(player, response);
                Ok(Flow::Continue)
            }
            ScriptStep::OwnDiscard { player, next } => {
                if self.discard_choice(player, response).is_none() {
                    return Ok(Flow::Continue);
                }
                Ok(self.next_player_discard(next))
            }
            ScriptStep::NextDiscard { next } => {
                self.discard_choice(next, response);
                Ok(Flow::Continue)
            }
            ScriptStep::RoundDiscard { current, rest } => {
                self.discard_choice(current, response);
                Ok(self.round_discard(rest))
            }
            ScriptStep::BattleTarget { player } => {
                let Some(target) = self.chosen_opponent(player, response) else {
                    return Ok(Flow::Continue);
                };
                if self.players[target].hand_size() == 0 {
                    debug!("{} has nothing to steal", self.players[target].name);
                    return Ok(Flow::Continue);
                }
                Ok(self.prompt_roll(player, ScriptStep::ChallengerRoll { player, target }))
            }
            ScriptStep::ChallengerRoll { player, target } => {
                let roll = DiceResult::random(&mut self.rng);
                info!("{} rolls {}", self.players[player].name, roll.total);
                let step = ScriptStep::DefenderRoll {
                    player,
                    target,
                    challenger: roll.total,
                };
                Ok(self.prompt_roll(target, step))
            }
            ScriptStep::DefenderRoll {
                player,
                target,
                challenger,
            } => {
                let roll = DiceResult::random(&mut self.rng);
                info!("{} rolls {}", self.players[target].name, roll.total);
                if challenger <= roll.total || self.players[target].hand_size() == 0 {
                    return Ok(Flow::Continue);
                }
                let payload = EventPayload::CardChoice {
                    owner: self.players[target].id,
                    cards: self.players[target].card_ids(),
                    hidden: false,
                    min: 1,
                    max: 1,
                    purpose: CardPurpose::Steal,
                };
                Ok(self.script(player, payload, ScriptStep::BattleSteal { player, target }))
            }
            ScriptStep::BattleSteal { player, target } => {
                let stolen = self
                    .first_held(target, response)
                    .and_then(|id| self.players[target].remove_card(id));
                if let Some(card) = stolen {
                    info!(
                        "{} won the dice battle and took {} from {}",
                        self.players[player].name, card.name, self.players[target].name
                    );
                    self.players[player].add_card(card);
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn script(&mut self, player: usize, payload: EventPayload, step: ScriptStep) -> Flow {
        self.suspend(Some(player), payload, Continuation::Script(step))
    }

    fn prompt_discard(&mut self, player: usize, hidden: bool, step: ScriptStep) -> Flow {
        let payload = EventPayload::CardChoice {
            owner: self.players[player].id,
            cards: self.players[player].card_ids(),
            hidden,
            min: 1,
            max: 1,
            purpose: CardPurpose::Discard,
        };
        self.script(player, payload, step)
    }

    fn prompt_roll(&mut self, player: usize, step: ScriptStep) -> Flow {
        let payload = EventPayload::DiceRoll {
            description: format!("{} rolls for the dice battle", self.players[player].name),
        };
        self.script(player, payload, step)
    }

    fn next_player_discard(&mut self, next: usize) -> Flow {
        if self.players[next].hand_size() == 0 {
            return Flow::Continue;
        }
        self.prompt_discard(next, false, ScriptStep::NextDiscard { next })
    }

    fn round_discard(&mut self, mut order: VecDeque<usize>) -> Flow {
        while let Some(current) = order.pop_front() {
            if self.players[current].hand_size() > 0 {
                let step = ScriptStep::RoundDiscard {
                    current,
                    rest: order,
                };
                return self.prompt_discard(current, false, step);
            }
        }
        Flow::Continue
    }

    fn chosen_opponent(&self, player: usize, response: &EventResponse) -> Option<usize> {
        response
            .player_id()
            .and_then(|id| self.player_index(id))
            .filter(|index| *index != player)
    }

    fn first_held(&self, owner: usize, response: &EventResponse) -> Option<CardId> {
        response
            .card_ids()
            .into_iter()
            .find(|id| self.players[owner].has_card(*id))
    }

    /// Discards the first selected card `owner` actually holds. An empty or
    /// foreign selection is a decline.
    fn discard_choice(&mut self, owner: usize, response: &EventResponse) -> Option<Card> {
        let Some(id) = self.first_held(owner, response) else {
            warn!("{} declined to discard", self.players[owner].name);
            return None;
        };
        let card = self.discard_from_hand(owner, id)?;
        info!("{} discarded {}", self.players[owner].name, card.name);
        Some(card)
    }
}
