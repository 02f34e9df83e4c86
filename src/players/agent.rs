use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::game::action::{ActionPayload, ActionType, GameAction};
use crate::game::cards::{Card, CardId};
use crate::game::event_cards::EventCardId;
use crate::game::events::{CardPurpose, EventPayload, EventResponse, GameEvent, PlayerPurpose, RoleSelection};
use crate::game::players::Player;
use crate::game::state::GameState;
use crate::players::BasePlayer;
use crate::types::{CardEffect, CardKind, EventCardKind, PlayerId, Role, TileKind};

const HIGH_URGENCY_TILES: usize = 10;
const MEDIUM_URGENCY_TILES: usize = 20;
const SWAP_MIN_GAIN: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),
    #[error("{0} decision received a context it cannot read")]
    ContextMismatch(DecisionKind),
    #[error("no candidates for {0}")]
    NoCandidates(DecisionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DecisionKind {
    ShouldRoll,
    ChooseSpell,
    ChoosePlayer,
    ChooseCards,
    ChooseDiceValue,
    ChooseTile,
    BossBattle,
    ChooseRole,
    UseShield,
    ChooseEventCard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionContext {
    None,
    Spells {
        candidates: Vec<CardId>,
    },
    /// `purpose` is `None` for the swap-position spell.
    Players {
        candidates: Vec<PlayerId>,
        purpose: Option<PlayerPurpose>,
    },
    Cards {
        owner: PlayerId,
        candidates: Vec<CardId>,
        count: usize,
        purpose: CardPurpose,
    },
    DiceRange {
        min: u8,
        max: u8,
    },
    Tiles {
        candidates: Vec<usize>,
    },
    Boss {
        requirement: u32,
    },
    Roles {
        available: Vec<Role>,
    },
    Shield {
        caster: PlayerId,
    },
    EventCards {
        offered: Vec<EventCardId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    Roll(bool),
    Spell(Option<CardId>),
    Player(PlayerId),
    Cards(Vec<CardId>),
    DiceValue(u8),
    Tile(usize),
    Commit(Vec<CardId>),
    Retreat(Option<CardId>),
    Role(Role),
    Flag(bool),
    EventCard(EventCardId),
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    pub choice: Choice,
    pub confidence: f32,
    pub rationale: String,
}

impl Decision {
    fn new(kind: DecisionKind, choice: Choice, confidence: f32, rationale: impl Into<String>) -> Self {
        Self {
            kind,
            choice,
            confidence,
            rationale: rationale.into(),
        }
    }

    fn nothing(kind: DecisionKind, rationale: impl Into<String>) -> Self {
        Self::new(kind, Choice::Nothing, 0.0, rationale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub is_leading: bool,
    pub lead_distance: i64,
    pub tiles_to_end: usize,
    pub urgency: Urgency,
    pub card_advantage: f64,
    pub closest_opponent: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Strategy {
    Aggressive,
    Defensive,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub aggressive: f64,
    pub defensive: f64,
    pub balanced: f64,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            aggressive: 0.3,
            defensive: 0.3,
            balanced: 0.4,
        }
    }
}

impl StrategyWeights {
    fn pick(&self, rng: &mut impl Rng) -> Strategy {
        let roll = rng.gen_range(0.0..self.aggressive + self.defensive + self.balanced);
        if roll < self.aggressive {
            Strategy::Aggressive
        } else if roll < self.aggressive + self.defensive {
            Strategy::Defensive
        } else {
            Strategy::Balanced
        }
    }
}

/// Fills a seat the role selection left open.
pub fn pick_role(available: &[Role], rng: &mut impl Rng) -> Option<Role> {
    available.choose(rng).copied()
}

/// Rule-based decision maker for autonomous seats.
#[derive(Debug, Clone)]
pub struct Agent {
    weights: StrategyWeights,
    rng: StdRng,
}

impl Agent {
    pub fn new(seed: u64) -> Self {
        Self {
            weights: StrategyWeights::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn weights(&self) -> &StrategyWeights {
        &self.weights
    }

    /// Never fails: anything the agent cannot work out becomes `Choice::Nothing`.
    pub fn decide(
        &mut self,
        game: &GameState,
        player: PlayerId,
        kind: DecisionKind,
        context: &DecisionContext,
    ) -> Decision {
        match self.try_decide(game, player, kind, context) {
            Ok(decision) => {
                debug!(
                    "agent for player {player}: {kind} -> {:?} ({})",
                    decision.choice, decision.rationale
                );
                decision
            }
            Err(err) => {
                warn!("agent for player {player} gave up on {kind}: {err}");
                Decision::nothing(kind, err.to_string())
            }
        }
    }

    pub fn assess(&self, game: &GameState, player: PlayerId) -> Result<Assessment, AgentError> {
        let me = game.player(player).ok_or(AgentError::UnknownPlayer(player))?;
        let rival = game
            .players()
            .iter()
            .filter(|p| p.id != player)
            .max_by_key(|p| p.position());
        let lead_distance = rival
            .map(|r| me.position() as i64 - r.position() as i64)
            .unwrap_or(0);
        let tiles_to_end = game.board().len().saturating_sub(me.position());
        let urgency = if tiles_to_end <= HIGH_URGENCY_TILES {
            Urgency::High
        } else if tiles_to_end <= MEDIUM_URGENCY_TILES {
            Urgency::Medium
        } else {
            Urgency::Low
        };
        let card_advantage =
            me.count_kind(CardKind::Spell) as f64 + 0.5 * me.count_kind(CardKind::Energy) as f64;
        Ok(Assessment {
            is_leading: lead_distance > 0,
            lead_distance,
            tiles_to_end,
            urgency,
            card_advantage,
            closest_opponent: rival.map(|r| r.id),
        })
    }

    fn adjust_weights(&mut self, assessment: &Assessment) {
        self.weights = if assessment.urgency == Urgency::High {
            StrategyWeights {
                aggressive: 0.6,
                defensive: 0.1,
                balanced: 0.3,
            }
        } else if assessment.is_leading {
            StrategyWeights {
                aggressive: 0.2,
                defensive: 0.5,
                balanced: 0.3,
            }
        } else {
            StrategyWeights::default()
        };
    }

    fn try_decide(
        &mut self,
        game: &GameState,
        player: PlayerId,
        kind: DecisionKind,
        context: &DecisionContext,
    ) -> Result<Decision, AgentError> {
        if let (DecisionKind::ChooseRole, DecisionContext::Roles { available }) = (kind, context) {
            let role = pick_role(available, &mut self.rng).ok_or(AgentError::NoCandidates(kind))?;
            return Ok(Decision::new(kind, Choice::Role(role), 0.5, "any free role"));
        }

        let assessment = self.assess(game, player)?;
        self.adjust_weights(&assessment);
        let me = game.player(player).ok_or(AgentError::UnknownPlayer(player))?;

        match (kind, context) {
            (DecisionKind::ShouldRoll, _) => Ok(if game.dice().can_roll() {
                Decision::new(kind, Choice::Roll(true), 0.9, "rolls remain this turn")
            } else {
                Decision::new(kind, Choice::Roll(false), 1.0, "no rolls left")
            }),
            (DecisionKind::ChooseSpell, DecisionContext::Spells { candidates }) => {
                Ok(self.choose_spell(game, me, &assessment, candidates))
            }
            (DecisionKind::ChoosePlayer, DecisionContext::Players { candidates, purpose }) => {
                Ok(choose_player(game, me, candidates, *purpose))
            }
            (
                DecisionKind::ChooseCards,
                DecisionContext::Cards {
                    owner,
                    candidates,
                    count,
                    purpose,
                },
            ) => choose_cards(game, *owner, candidates, *count, *purpose),
            (DecisionKind::ChooseDiceValue, DecisionContext::DiceRange { min, max }) => {
                Ok(choose_dice_value(game, me, &assessment, *min, *max))
            }
            (DecisionKind::ChooseTile, DecisionContext::Tiles { candidates }) => {
                let tile = if assessment.is_leading {
                    candidates.iter().min()
                } else {
                    candidates.iter().max()
                };
                let tile = *tile.ok_or(AgentError::NoCandidates(kind))?;
                Ok(Decision::new(kind, Choice::Tile(tile), 0.6, "tile by standing"))
            }
            (DecisionKind::BossBattle, DecisionContext::Boss { requirement }) => {
                Ok(boss_battle(me, *requirement))
            }
            (DecisionKind::UseShield, DecisionContext::Shield { caster }) => {
                let caster_position = game.player(*caster).map(|p| p.position()).unwrap_or(0);
                let worse = caster_position < me.position();
                let rationale = if worse {
                    "the swap would set us back"
                } else {
                    "the swap helps us"
                };
                Ok(Decision::new(kind, Choice::Flag(worse), 0.9, rationale))
            }
            (DecisionKind::ChooseEventCard, DecisionContext::EventCards { offered }) => {
                let card = *offered
                    .choose(&mut self.rng)
                    .ok_or(AgentError::NoCandidates(kind))?;
                Ok(Decision::new(kind, Choice::EventCard(card), 0.3, "face-down draw"))
            }
            _ => Err(AgentError::ContextMismatch(kind)),
        }
    }

    fn choose_spell(
        &mut self,
        game: &GameState,
        me: &Player,
        assessment: &Assessment,
        candidates: &[CardId],
    ) -> Decision {
        let kind = DecisionKind::ChooseSpell;
        let strategy = self.weights.pick(&mut self.rng);
        let leader_gap = game
            .players()
            .iter()
            .filter(|p| p.id != me.id)
            .map(|p| p.position().saturating_sub(me.position()))
            .max()
            .unwrap_or(0);

        for &id in candidates {
            let Some(effect) = me.card(id).and_then(|c| c.effect) else {
                continue;
            };
            match effect {
                CardEffect::SwapPosition if leader_gap >= SWAP_MIN_GAIN => {
                    return Decision::new(kind, Choice::Spell(Some(id)), 0.8, "an opponent is well ahead");
                }
                CardEffect::ExtraTurn
                    if strategy == Strategy::Aggressive || assessment.urgency == Urgency::High =>
                {
                    return Decision::new(kind, Choice::Spell(Some(id)), 0.7, "push for more movement");
                }
                CardEffect::FixDice
                    if strategy != Strategy::Defensive && assessment.urgency != Urgency::Low =>
                {
                    return Decision::new(kind, Choice::Spell(Some(id)), 0.6, "steer the landing tile");
                }
                _ => {}
            }
        }
        Decision::new(kind, Choice::Spell(None), 0.5, format!("holding spells ({strategy})"))
    }

    fn role_selection(&mut self, game: &GameState, total: usize, available: &[Role]) -> EventResponse {
        let mut remaining = available.to_vec();
        let mut selections = Vec::with_capacity(total);
        for seat in 0..total {
            let context = DecisionContext::Roles {
                available: remaining.clone(),
            };
            if let Choice::Role(role) = self.decide(game, 0, DecisionKind::ChooseRole, &context).choice {
                remaining.retain(|r| *r != role);
                selections.push(RoleSelection { seat, role });
            }
        }
        EventResponse::Roles { selections }
    }
}

fn choose_player(
    game: &GameState,
    me: &Player,
    candidates: &[PlayerId],
    purpose: Option<PlayerPurpose>,
) -> Decision {
    let kind = DecisionKind::ChoosePlayer;
    let opponents = candidates.iter().filter_map(|id| game.player(*id));
    let pick = match purpose {
        None => opponents
            .filter(|p| p.position() > me.position())
            .max_by_key(|p| p.position()),
        Some(PlayerPurpose::SwapHands) => opponents
            .filter(|p| p.total_energy() > me.total_energy())
            .max_by_key(|p| p.total_energy()),
        Some(PlayerPurpose::DiceBattle) => opponents
            .filter(|p| p.hand_size() > 0)
            .max_by_key(|p| p.hand_size()),
    };
    match pick {
        Some(p) => Decision::new(kind, Choice::Player(p.id), 0.8, format!("target {}", p.name)),
        None => Decision::nothing(kind, "no opponent worth targeting"),
    }
}

fn choose_cards(
    game: &GameState,
    owner: PlayerId,
    candidates: &[CardId],
    count: usize,
    purpose: CardPurpose,
) -> Result<Decision, AgentError> {
    let kind = DecisionKind::ChooseCards;
    let holder = game.player(owner).ok_or(AgentError::UnknownPlayer(owner))?;
    let mut cards: Vec<&Card> = candidates.iter().filter_map(|id| holder.card(*id)).collect();
    if cards.is_empty() {
        return Err(AgentError::NoCandidates(kind));
    }
    cards.sort_by_key(|c| (c.energy_value().max(c.value as u32), c.id));
    let picked: Vec<CardId> = match purpose {
        CardPurpose::Discard => cards.iter().take(count).map(|c| c.id).collect(),
        CardPurpose::Steal => cards.iter().rev().take(count).map(|c| c.id).collect(),
    };
    Ok(Decision::new(kind, Choice::Cards(picked), 0.7, format!("{purpose:?} by value")))
}

fn choose_dice_value(game: &GameState, me: &Player, assessment: &Assessment, min: u8, max: u8) -> Decision {
    let kind = DecisionKind::ChooseDiceValue;
    let board = game.board();
    let energy = me.total_energy();
    let progress_weight = if assessment.is_leading { 0.05 } else { 0.2 };

    let score = |total: u8| -> f64 {
        let landing = (me.position() + total as usize).min(board.last_position());
        if landing == board.last_position() && board.tile(landing).is_none_or(|t| !t.is_boss()) {
            return 100.0;
        }
        let blocked = (me.position() + 1..landing)
            .filter_map(|p| board.tile(p))
            .any(|t| t.is_boss() && t.boss_requirement.unwrap_or(0) > energy);
        let tile_score = match board.tile(landing).map(|t| (t.kind, t.boss_requirement)) {
            Some((TileKind::Treasure, _)) => 3.0,
            Some((TileKind::Resupply, _)) => 2.0,
            Some((TileKind::Teleport, _)) => 4.0,
            Some((TileKind::Reverse, _)) if me.role != Role::Pigsy => -3.0,
            Some((TileKind::Boss, requirement)) if requirement.unwrap_or(0) > energy => -5.0,
            Some((TileKind::Boss, _)) => 1.0,
            _ => 0.0,
        };
        let penalty = if blocked { -5.0 } else { 0.0 };
        tile_score + penalty + progress_weight * total as f64
    };

    let best = (min..=max)
        .map(|total| (total, score(total)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match best {
        Some((total, value)) => Decision::new(
            kind,
            Choice::DiceValue(total),
            0.8,
            format!("total {total} scores {value:.1}"),
        ),
        None => Decision::nothing(kind, "empty dice range"),
    }
}

fn boss_battle(me: &Player, requirement: u32) -> Decision {
    let kind = DecisionKind::BossBattle;
    let valued: Vec<(CardId, u32)> = me
        .hand()
        .iter()
        .map(|c| (c.id, c.energy_value()))
        .filter(|(_, v)| *v > 0)
        .collect();
    if let Some(commit) = cheapest_commit(&valued, requirement) {
        return Decision::new(kind, Choice::Commit(commit), 0.9, "enough energy to pass");
    }
    let cheapest = me
        .hand()
        .iter()
        .min_by_key(|c| (c.energy_value().max(c.value as u32), c.id))
        .map(|c| c.id);
    Decision::new(kind, Choice::Retreat(cheapest), 0.6, "retreat with the cheapest card")
}

/// Smallest achievable sum at or above `requirement`, via 0/1 subset-sum.
pub fn cheapest_commit(cards: &[(CardId, u32)], requirement: u32) -> Option<Vec<CardId>> {
    let total: u32 = cards.iter().map(|(_, v)| v).sum();
    if total < requirement {
        return None;
    }
    let cap = total as usize;
    let mut reach: Vec<Option<(usize, usize)>> = vec![None; cap + 1];
    reach[0] = Some((0, usize::MAX));
    for (index, &(_, value)) in cards.iter().enumerate() {
        let value = value as usize;
        if value == 0 {
            continue;
        }
        for sum in (value..=cap).rev() {
            if reach[sum].is_none() && reach[sum - value].is_some() {
                reach[sum] = Some((sum - value, index));
            }
        }
    }
    let target = (requirement as usize..=cap).find(|s| reach[*s].is_some())?;
    let mut chosen = Vec::new();
    let mut sum = target;
    while sum > 0 {
        let (previous, index) = reach[sum]?;
        chosen.push(cards[index].0);
        sum = previous;
    }
    Some(chosen)
}

fn response_for(decision: Decision, event: &GameEvent) -> EventResponse {
    match (decision.choice, &event.payload) {
        (Choice::Commit(cards), _) => EventResponse::PlayCards { cards },
        (Choice::Retreat(card), _) => EventResponse::Retreat { card },
        (Choice::Cards(cards), EventPayload::BossDiscard { .. }) => EventResponse::Retreat {
            card: cards.first().copied(),
        },
        (Choice::Cards(cards), _) => EventResponse::Cards { cards },
        (Choice::DiceValue(total), _) => EventResponse::DiceTotal { total },
        (Choice::Player(player), _) => EventResponse::Player {
            player: Some(player),
        },
        (Choice::Flag(accept), _) => EventResponse::Confirm { accept },
        (Choice::EventCard(card), _) => EventResponse::EventCard { card },
        (Choice::Nothing, EventPayload::SwapPosition { .. } | EventPayload::PlayerChoice { .. }) => {
            EventResponse::Player { player: None }
        }
        (Choice::Nothing, EventPayload::BossDiscard { .. }) => EventResponse::Retreat { card: None },
        _ => EventResponse::Acknowledge,
    }
}

/// Event cards that help the holder more than the rest of the table.
fn worth_playing(game: &GameState, me: &Player, card: &Card) -> bool {
    let Some(event) = &card.event else {
        return false;
    };
    match event.kind {
        EventCardKind::BossBattlePass
        | EventCardKind::AllPlayersDraw
        | EventCardKind::PrevPlayerDraw
        | EventCardKind::DiceBattleSteal => true,
        EventCardKind::SwapAllCards => game
            .players()
            .iter()
            .any(|p| p.id != me.id && p.hand_size() >= me.hand_size()),
        EventCardKind::RandomDiscard
        | EventCardKind::NextPlayerDiscard
        | EventCardKind::AllPlayersDiscard => false,
    }
}

impl BasePlayer for Agent {
    fn decide(&mut self, game: &GameState, actions: &[GameAction]) -> Option<GameAction> {
        let player = actions.first()?.player;
        if let Some(me) = game.player(player) {
            let playable = actions.iter().find(|a| match (a.action_type, a.payload) {
                (ActionType::PlayEventCard, ActionPayload::Card(id)) => {
                    me.card(id).is_some_and(|card| worth_playing(game, me, card))
                }
                _ => false,
            });
            if let Some(action) = playable {
                return Some(action.clone());
            }
        }

        let spells: Vec<CardId> = actions
            .iter()
            .filter_map(|a| match (a.action_type, a.payload) {
                (ActionType::CastSpell, ActionPayload::Card(id)) => Some(id),
                _ => None,
            })
            .collect();
        if !spells.is_empty() {
            let context = DecisionContext::Spells { candidates: spells };
            let decision = Agent::decide(self, game, player, DecisionKind::ChooseSpell, &context);
            if let Choice::Spell(Some(card)) = decision.choice {
                return Some(GameAction::cast_spell(player, card));
            }
        }

        let roll = Agent::decide(self, game, player, DecisionKind::ShouldRoll, &DecisionContext::None);
        let wants_roll = matches!(roll.choice, Choice::Roll(true));
        let preferred = if wants_roll { ActionType::Roll } else { ActionType::EndTurn };
        actions
            .iter()
            .find(|a| a.action_type == preferred)
            .or_else(|| actions.iter().find(|a| a.action_type == ActionType::EndTurn))
            .or_else(|| actions.first())
            .cloned()
    }

    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse {
        let player = event.player.unwrap_or(0);
        let (kind, context) = match &event.payload {
            EventPayload::RoleSelection {
                total_players,
                available_roles,
                ..
            } => return self.role_selection(game, *total_players, available_roles),
            EventPayload::BossBattle { requirement, .. } => (
                DecisionKind::BossBattle,
                DecisionContext::Boss {
                    requirement: *requirement,
                },
            ),
            EventPayload::BossDiscard { hand, .. } => (
                DecisionKind::ChooseCards,
                DecisionContext::Cards {
                    owner: player,
                    candidates: hand.clone(),
                    count: 1,
                    purpose: CardPurpose::Discard,
                },
            ),
            EventPayload::FixDice { min, max } => (
                DecisionKind::ChooseDiceValue,
                DecisionContext::DiceRange {
                    min: *min,
                    max: *max,
                },
            ),
            EventPayload::SwapPosition { candidates } => (
                DecisionKind::ChoosePlayer,
                DecisionContext::Players {
                    candidates: candidates.clone(),
                    purpose: None,
                },
            ),
            EventPayload::Shield { caster } => {
                (DecisionKind::UseShield, DecisionContext::Shield { caster: *caster })
            }
            EventPayload::EventCardDraw { offered, .. } => (
                DecisionKind::ChooseEventCard,
                DecisionContext::EventCards {
                    offered: offered.clone(),
                },
            ),
            EventPayload::CardChoice {
                owner,
                cards,
                max,
                purpose,
                ..
            } => (
                DecisionKind::ChooseCards,
                DecisionContext::Cards {
                    owner: *owner,
                    candidates: cards.clone(),
                    count: *max,
                    purpose: *purpose,
                },
            ),
            EventPayload::PlayerChoice {
                candidates,
                purpose,
                ..
            } => (
                DecisionKind::ChoosePlayer,
                DecisionContext::Players {
                    candidates: candidates.clone(),
                    purpose: Some(*purpose),
                },
            ),
            EventPayload::DiceRoll { .. }
            | EventPayload::ExtraTurn { .. }
            | EventPayload::GameOver { .. }
            | EventPayload::TurnEnd { .. } => return EventResponse::Acknowledge,
        };
        let decision = Agent::decide(self, game, player, kind, &context);
        response_for(decision, event)
    }
}
