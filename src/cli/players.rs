use crate::game::action::GameAction;
use crate::game::events::{EventResponse, GameEvent};
use crate::game::state::GameState;
use crate::players::{Agent, BasePlayer, RandomPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Chooses actions and answers at random.",
    },
    CliPlayer {
        code: "A",
        name: "Agent",
        description: "Rule-based agent weighing standing, urgency, and hand. First param is SEED.",
    },
];

#[derive(Clone)]
pub enum PlayerInstance {
    Random(RandomPlayer),
    Agent(Agent),
}

impl PlayerInstance {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerInstance::Random(_) => "Random",
            PlayerInstance::Agent(_) => "Agent",
        }
    }
}

impl BasePlayer for PlayerInstance {
    fn decide(&mut self, game: &GameState, actions: &[GameAction]) -> Option<GameAction> {
        match self {
            PlayerInstance::Random(p) => p.decide(game, actions),
            PlayerInstance::Agent(p) => BasePlayer::decide(p, game, actions),
        }
    }

    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse {
        match self {
            PlayerInstance::Random(p) => p.respond(game, event),
            PlayerInstance::Agent(p) => p.respond(game, event),
        }
    }
}

/// `seed` seeds the player's own rng unless a param overrides it.
pub fn create_player(code: &str, seed: u64, params: Vec<&str>) -> Option<PlayerInstance> {
    let seed = params
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(seed);
    match code {
        "R" => Some(PlayerInstance::Random(RandomPlayer::new(seed))),
        "A" => Some(PlayerInstance::Agent(Agent::new(seed))),
        _ => None,
    }
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}
