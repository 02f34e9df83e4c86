use log::{debug, info};

use crate::types::{CardEffect, CardKind, PlayerId};

use super::cards::CardId;
use super::dice::{MAX_TOTAL, MIN_TOTAL};
use super::events::{EventId, EventPayload, EventResponse};
use super::state::{Continuation, Flow, GameError, GameState};

/// Outcome of casting a spell from hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellCast {
    Applied,
    Pending(EventId),
    /// The caster holds no card with that id.
    Missing,
}

impl GameState {
    pub fn cast_spell(&mut self, player: PlayerId, card: CardId) -> Result<SpellCast, GameError> {
        let caster = self.ensure_turn_of(player)?;
        self.ensure_idle()?;
        let Some((kind, effect)) = self.players[caster].card(card).map(|c| (c.kind, c.effect))
        else {
            debug!("player {player} has no card {card}");
            return Ok(SpellCast::Missing);
        };
        if kind != CardKind::Spell {
            return Err(GameError::NotASpell(card));
        }

        match effect {
            Some(CardEffect::ExtraTurn) => {
                self.dice.set_max_rolls(self.dice.max_rolls() + 1);
                self.discard_from_hand(caster, card);
                info!("{} gains an extra roll", self.players[caster].name);
                self.events.publish(
                    Some(player),
                    EventPayload::ExtraTurn {
                        rolls_allowed: self.dice.max_rolls(),
                    },
                );
                Ok(SpellCast::Applied)
            }
            Some(CardEffect::FixDice) => {
                let payload = EventPayload::FixDice {
                    min: MIN_TOTAL,
                    max: MAX_TOTAL,
                };
                let continuation = Continuation::FixDice {
                    player: caster,
                    card,
                };
                Ok(self.pending(caster, payload, continuation))
            }
            Some(CardEffect::SwapPosition) => {
                let payload = EventPayload::SwapPosition {
                    candidates: self.other_players(caster),
                };
                let continuation = Continuation::SwapTarget {
                    player: caster,
                    card,
                };
                Ok(self.pending(caster, payload, continuation))
            }
            Some(CardEffect::SpellShield) => Err(GameError::IllegalAction(
                "spell shield is only played in answer to a swap",
            )),
            _ => Err(GameError::NotASpell(card)),
        }
    }

    fn pending(
        &mut self,
        caster: usize,
        payload: EventPayload,
        continuation: Continuation,
    ) -> SpellCast {
        match self.suspend(Some(caster), payload, continuation) {
            Flow::Suspended(id) => SpellCast::Pending(id),
            Flow::Continue => SpellCast::Applied,
        }
    }

    pub(crate) fn finish_fix_dice(
        &mut self,
        player: usize,
        card: CardId,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        let Some(total) = response.number() else {
            debug!("fix dice declined, card {card} stays in hand");
            return Ok(Flow::Continue);
        };
        if self.discard_from_hand(player, card).is_none() {
            return Ok(Flow::Continue);
        }
        let total = total.clamp(MIN_TOTAL, MAX_TOTAL);
        self.fixed_roll = Some((player, total));
        info!("{} fixed the next roll at {total}", self.players[player].name);
        Ok(Flow::Continue)
    }

    pub(crate) fn finish_swap_target(
        &mut self,
        caster: usize,
        card: CardId,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        let target = response
            .player_id()
            .and_then(|id| self.player_index(id))
            .filter(|index| *index != caster);
        let Some(target) = target else {
            debug!("swap cancelled, card {card} stays in hand");
            return Ok(Flow::Continue);
        };
        if !self.players[caster].has_card(card) {
            return Ok(Flow::Continue);
        }

        if self.players[target].spell(CardEffect::SpellShield).is_some() {
            let payload = EventPayload::Shield {
                caster: self.players[caster].id,
            };
            let continuation = Continuation::ShieldDecision {
                caster,
                target,
                card,
            };
            return Ok(self.suspend(Some(target), payload, continuation));
        }

        self.discard_from_hand(caster, card);
        self.swap_positions(caster, target);
        Ok(Flow::Continue)
    }

    pub(crate) fn finish_shield_decision(
        &mut self,
        caster: usize,
        target: usize,
        card: CardId,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        self.discard_from_hand(caster, card);
        let shield = self.players[target]
            .spell(CardEffect::SpellShield)
            .map(|c| c.id);
        match shield {
            Some(shield) if response.flag() => {
                self.discard_from_hand(target, shield);
                info!(
                    "{} shielded against {}'s swap",
                    self.players[target].name, self.players[caster].name
                );
            }
            _ => self.swap_positions(caster, target),
        }
        Ok(Flow::Continue)
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let first = self.players[a].position();
        let second = self.players[b].position();
        self.players[a].set_position(second);
        self.players[b].set_position(first);
        info!(
            "{} and {} swapped places ({first} <-> {second})",
            self.players[a].name, self.players[b].name
        );
    }
}
