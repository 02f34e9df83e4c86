use std::io::{self, BufRead, Write};

use crate::game::action::{ActionPayload, GameAction};
use crate::game::events::{EventPayload, EventResponse, GameEvent, RoleSelection};
use crate::game::state::GameState;
use crate::players::BasePlayer;
use crate::types::PlayerId;

/// Seat driven from stdin. Answers only its own events; role selection
/// picks for its seat and leaves the rest to the engine.
#[derive(Clone)]
pub struct HumanPlayer {
    pub id: PlayerId,
}

impl HumanPlayer {
    pub fn new(id: PlayerId) -> Self {
        Self { id }
    }

    fn seat(&self) -> usize {
        self.id.saturating_sub(1) as usize
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt} ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Comma or space separated numbers; anything unparsable is skipped.
pub fn parse_ids(line: &str) -> Vec<u32> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn pick_index(prompt: &str, len: usize) -> Option<usize> {
    loop {
        let line = read_line(prompt)?;
        if line.is_empty() {
            return None;
        }
        match line.parse::<usize>() {
            Ok(i) if i < len => return Some(i),
            _ => println!("enter a number between 0 and {}", len.saturating_sub(1)),
        }
    }
}

fn print_board(game: &GameState) {
    println!("{}", "-".repeat(60));
    for player in game.players() {
        println!(
            "{:<10} {:<11} at {:>3}/{} facing {:<8} hand {:>2} energy {:>3}",
            player.name,
            player.role.to_string(),
            player.position(),
            game.board().last_position(),
            player.direction.to_string(),
            player.hand_size(),
            player.total_energy()
        );
    }
}

fn print_hand(game: &GameState, player: PlayerId) {
    if let Some(me) = game.player(player) {
        for card in me.hand() {
            println!("  [{}] {} ({})", card.id, card.name, card.description);
        }
    }
}

impl BasePlayer for HumanPlayer {
    fn decide(&mut self, game: &GameState, actions: &[GameAction]) -> Option<GameAction> {
        if actions.is_empty() {
            return None;
        }
        print_board(game);
        print_hand(game, self.id);
        for (i, action) in actions.iter().enumerate() {
            let detail = match action.payload {
                ActionPayload::Card(id) => game
                    .player(self.id)
                    .and_then(|p| p.card(id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                ActionPayload::None => String::new(),
            };
            println!("  {i}: {} {detail}", action.action_type);
        }
        let index = pick_index("action>", actions.len())?;
        actions.get(index).cloned()
    }

    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse {
        match &event.payload {
            EventPayload::RoleSelection {
                available_roles, ..
            } => {
                for (i, role) in available_roles.iter().enumerate() {
                    println!("  {i}: {role} - {}", role.description());
                }
                let selections = pick_index("role>", available_roles.len())
                    .map(|i| RoleSelection {
                        seat: self.seat(),
                        role: available_roles[i],
                    })
                    .into_iter()
                    .collect();
                EventResponse::Roles { selections }
            }
            EventPayload::BossBattle {
                position,
                requirement,
                energy_in_hand,
            } => {
                println!("boss at {position} needs {requirement} energy, you hold {energy_in_hand}");
                print_hand(game, self.id);
                let line = read_line("cards to commit (blank to retreat)>").unwrap_or_default();
                let cards = parse_ids(&line);
                if cards.is_empty() {
                    EventResponse::Retreat { card: None }
                } else {
                    EventResponse::PlayCards { cards }
                }
            }
            EventPayload::BossDiscard { hand, .. } => {
                println!("retreating: discard one of {hand:?}");
                print_hand(game, self.id);
                let line = read_line("card>").unwrap_or_default();
                EventResponse::Retreat {
                    card: parse_ids(&line).first().copied(),
                }
            }
            EventPayload::FixDice { min, max } => {
                let line = read_line(&format!("dice total {min}..={max}>")).unwrap_or_default();
                match line.parse() {
                    Ok(total) => EventResponse::DiceTotal { total },
                    Err(_) => EventResponse::Acknowledge,
                }
            }
            EventPayload::SwapPosition { candidates }
            | EventPayload::PlayerChoice { candidates, .. } => {
                for id in candidates {
                    if let Some(p) = game.player(*id) {
                        println!("  [{id}] {} at {}", p.name, p.position());
                    }
                }
                let line = read_line("player (blank to cancel)>").unwrap_or_default();
                EventResponse::Player {
                    player: parse_ids(&line).first().copied(),
                }
            }
            EventPayload::Shield { caster } => {
                let line = read_line(&format!("player {caster} swaps with you, shield? [y/N]>"))
                    .unwrap_or_default();
                EventResponse::Confirm {
                    accept: line.eq_ignore_ascii_case("y"),
                }
            }
            EventPayload::EventCardDraw { offered, .. } => {
                println!("{} face-down event cards", offered.len());
                match pick_index("card>", offered.len()) {
                    Some(i) => EventResponse::EventCard { card: offered[i] },
                    None => EventResponse::Acknowledge,
                }
            }
            EventPayload::CardChoice {
                owner,
                cards,
                hidden,
                min,
                max,
                ..
            } => {
                if *hidden {
                    println!("{} hidden cards of player {owner}: choose by position", cards.len());
                    let line = read_line(&format!("{min}..={max} positions>")).unwrap_or_default();
                    let cards = parse_ids(&line)
                        .into_iter()
                        .filter_map(|i| cards.get(i as usize).copied())
                        .collect();
                    EventResponse::Cards { cards }
                } else {
                    print_hand(game, *owner);
                    let line = read_line(&format!("{min}..={max} cards>")).unwrap_or_default();
                    EventResponse::Cards {
                        cards: parse_ids(&line),
                    }
                }
            }
            EventPayload::DiceRoll { description } => {
                println!("{description}");
                EventResponse::Acknowledge
            }
            EventPayload::GameOver { winner } => {
                println!("player {winner} wins");
                EventResponse::Acknowledge
            }
            EventPayload::ExtraTurn { .. } | EventPayload::TurnEnd { .. } => {
                EventResponse::Acknowledge
            }
        }
    }
}
