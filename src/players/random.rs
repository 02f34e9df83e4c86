use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::game::action::GameAction;
use crate::game::events::{EventPayload, EventResponse, GameEvent, RoleSelection};
use crate::game::state::GameState;
use crate::players::BasePlayer;

/// Picks uniformly among legal moves. Boss battles still commit the whole
/// hand when it is enough, since anything else would only ever retreat.
#[derive(Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl BasePlayer for RandomPlayer {
    fn decide(&mut self, _game: &GameState, actions: &[GameAction]) -> Option<GameAction> {
        actions.choose(&mut self.rng).cloned()
    }

    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse {
        let rng = &mut self.rng;
        match &event.payload {
            EventPayload::RoleSelection {
                total_players,
                available_roles,
                ..
            } => {
                let mut roles = available_roles.clone();
                roles.shuffle(rng);
                let selections = roles
                    .into_iter()
                    .take(*total_players)
                    .enumerate()
                    .map(|(seat, role)| RoleSelection { seat, role })
                    .collect();
                EventResponse::Roles { selections }
            }
            EventPayload::BossBattle {
                requirement,
                energy_in_hand,
                ..
            } => {
                let hand = event
                    .player
                    .and_then(|id| game.player(id))
                    .map(|p| p.card_ids())
                    .unwrap_or_default();
                if energy_in_hand >= requirement {
                    EventResponse::PlayCards { cards: hand }
                } else {
                    EventResponse::Retreat {
                        card: hand.choose(rng).copied(),
                    }
                }
            }
            EventPayload::BossDiscard { hand, .. } => EventResponse::Retreat {
                card: hand.choose(rng).copied(),
            },
            EventPayload::FixDice { min, max } => EventResponse::DiceTotal {
                total: rng.gen_range(*min..=*max),
            },
            EventPayload::SwapPosition { candidates } => EventResponse::Player {
                player: candidates.choose(rng).copied(),
            },
            EventPayload::Shield { .. } => EventResponse::Confirm { accept: rng.gen_bool(0.5) },
            EventPayload::EventCardDraw { offered, .. } => match offered.choose(rng) {
                Some(card) => EventResponse::EventCard { card: *card },
                None => EventResponse::Acknowledge,
            },
            EventPayload::CardChoice { cards, min, max, .. } => {
                let count = rng.gen_range(*min..=(*max).max(*min));
                EventResponse::Cards {
                    cards: cards.iter().copied().choose_multiple(rng, count),
                }
            }
            EventPayload::PlayerChoice { candidates, .. } => EventResponse::Player {
                player: candidates.choose(rng).copied(),
            },
            EventPayload::DiceRoll { .. }
            | EventPayload::ExtraTurn { .. }
            | EventPayload::GameOver { .. }
            | EventPayload::TurnEnd { .. } => EventResponse::Acknowledge,
        }
    }
}
