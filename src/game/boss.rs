use itertools::Itertools;
use log::{info, warn};

use crate::board::Tile;
use crate::types::HookKind;

use super::cards::CardId;
use super::events::{EventPayload, EventResponse};
use super::state::{Continuation, Flow, GameError, GameState, StepRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BossBattle {
    pub player: usize,
    pub position: usize,
    pub requirement: u32,
}

impl GameState {
    pub(crate) fn begin_boss_battle(
        &mut self,
        player: usize,
        tile: &Tile,
    ) -> Result<Flow, GameError> {
        let Some(requirement) = tile.boss_requirement.filter(|r| *r > 0) else {
            return Ok(Flow::Continue);
        };
        let battle = BossBattle {
            player,
            position: tile.position,
            requirement,
        };
        info!(
            "{} faces the boss at {} ({} energy needed)",
            self.players[player].name, tile.position, requirement
        );
        let payload = EventPayload::BossBattle {
            position: tile.position,
            requirement,
            energy_in_hand: self.players[player].total_energy(),
        };
        Ok(self.suspend(Some(player), payload, Continuation::BossCommit(battle)))
    }

    pub(crate) fn finish_boss_commit(
        &mut self,
        battle: BossBattle,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        if let EventResponse::Retreat { card } = response {
            return self.retreat(battle, *card);
        }

        let player = &self.players[battle.player];
        let committed: Vec<CardId> = response
            .card_ids()
            .into_iter()
            .unique()
            .filter(|id| player.has_card(*id))
            .collect();
        let energy: u32 = committed
            .iter()
            .filter_map(|id| player.card(*id))
            .map(|c| c.energy_value())
            .sum();

        if energy < battle.requirement {
            warn!(
                "{} committed {energy} of {} energy at {}",
                player.name, battle.requirement, battle.position
            );
            return Ok(self.prompt_retreat(battle));
        }

        for id in committed {
            self.discard_from_hand(battle.player, id);
        }
        info!(
            "{} defeated the boss at {} with {energy} energy",
            self.players[battle.player].name, battle.position
        );
        Ok(Flow::Continue)
    }

    pub(crate) fn finish_boss_retreat(
        &mut self,
        battle: BossBattle,
        response: &EventResponse,
    ) -> Result<Flow, GameError> {
        self.retreat(battle, response.card_ids().first().copied())
    }

    fn prompt_retreat(&mut self, battle: BossBattle) -> Flow {
        let payload = EventPayload::BossDiscard {
            position: battle.position,
            requirement: battle.requirement,
            hand: self.players[battle.player].card_ids(),
        };
        self.suspend(Some(battle.player), payload, Continuation::BossRetreat(battle))
    }

    /// Pays one card and falls back to the previous boss, or the start.
    /// With an empty hand the retreat is free; otherwise a card the player
    /// does not hold sends the discard prompt back out.
    fn retreat(&mut self, battle: BossBattle, card: Option<CardId>) -> Result<Flow, GameError> {
        let hand_empty = self.players[battle.player].hand_size() == 0;
        match card {
            Some(id) if self.players[battle.player].has_card(id) => {
                self.discard_from_hand(battle.player, id);
            }
            _ if hand_empty => {}
            _ => {
                warn!("retreat needs a card from {}'s hand", self.players[battle.player].name);
                return Ok(self.prompt_retreat(battle));
            }
        }

        let fallback = self.board.previous_boss(battle.position).unwrap_or(0);
        let distance = battle.position - fallback;
        self.players[battle.player].set_position(fallback);
        info!(
            "{} retreated from {} to {fallback}",
            self.players[battle.player].name, battle.position
        );

        let mut cut_short = false;
        if let Some(movement) = self
            .movement
            .as_mut()
            .filter(|m| m.player == battle.player)
        {
            let left = movement.remaining.unsigned_abs() as usize;
            movement.remaining = if left > distance {
                movement.remaining.signum() * (left - distance) as i32
            } else {
                0
            };
            cut_short = movement.remaining == 0;
        }

        // A retreat from a pass ends the cut step on the fallback cell. The
        // stay is logged but the cell's hook does not fire.
        let on_pass = self.step_log.last().is_some_and(|r| r.hook == HookKind::Pass);
        if cut_short && on_pass {
            self.step_log.push(StepRecord {
                player: self.players[battle.player].id,
                position: fallback,
                hook: HookKind::Stay,
            });
        }
        Ok(Flow::Continue)
    }
}
