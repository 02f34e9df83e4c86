use clap::Parser;
use boss_trail::cli::players::PlayerInstance;
use boss_trail::cli::{HumanPlayer, create_player, print_player_help};
use boss_trail::game::action::GameAction;
use boss_trail::game::events::{EventResponse, GameEvent};
use boss_trail::game::game::TURNS_LIMIT;
use boss_trail::game::{Game, GameConfig, GameState};
use boss_trail::players::BasePlayer;

enum Seat {
    Human(HumanPlayer),
    Bot(PlayerInstance),
}

impl BasePlayer for Seat {
    fn decide(&mut self, game: &GameState, actions: &[GameAction]) -> Option<GameAction> {
        match self {
            Seat::Human(p) => p.decide(game, actions),
            Seat::Bot(p) => p.decide(game, actions),
        }
    }

    fn respond(&mut self, game: &GameState, event: &GameEvent) -> EventResponse {
        match self {
            Seat::Human(p) => p.respond(game, event),
            Seat::Bot(p) => p.respond(game, event),
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(name = "boss-trail-play")]
#[command(about = "Race to the end of the trail against bots")]
struct Args {
    /// Bot player code (R=Random, A=Agent)
    #[arg(short = 'b', long, default_value = "A")]
    bot: String,

    /// Number of bots seated after you
    #[arg(short = 'n', long, default_value_t = 1)]
    bots: usize,

    /// Bot-specific parameters (comma-separated)
    #[arg(long, default_value = "")]
    bot_params: String,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Cards dealt to each player at the start
    #[arg(long, default_value_t = 4)]
    starting_hand: usize,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let bot_params: Vec<&str> = if args.bot_params.is_empty() {
        Vec::new()
    } else {
        args.bot_params.split(',').collect()
    };

    let mut seats = vec![Seat::Human(HumanPlayer::new(1))];
    for i in 0..args.bots {
        match create_player(&args.bot, args.seed + i as u64, bot_params.clone()) {
            Some(player) => seats.push(Seat::Bot(player)),
            None => {
                eprintln!("Error: Unknown bot code '{}'", args.bot);
                eprintln!("Use --help-players to see available codes");
                std::process::exit(1);
            }
        }
    }

    let config = GameConfig {
        num_players: seats.len(),
        ai_players: args.bots,
        starting_hand: args.starting_hand,
        seed: args.seed,
        ..GameConfig::default()
    };
    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    println!("Starting game: you are Player 1 against {} bot(s)", args.bots);
    println!("{}", "=".repeat(80));

    let winner = match game.play(&mut seats) {
        Ok(winner) => winner,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    println!("\n{}", "=".repeat(80));
    match winner {
        Some(1) => println!("YOU WIN!"),
        Some(id) => println!("Player {id} wins. Better luck next time!"),
        None if game.state.turn >= TURNS_LIMIT => {
            println!("Game reached turn limit. No winner declared.")
        }
        None => println!("Game stopped without a winner."),
    }
    println!("{}", "=".repeat(80));

    for player in game.state.players() {
        let label = if player.id == 1 { "YOU" } else { "BOT" };
        println!(
            "{label} {} ({}): position {}, {} cards, {} energy",
            player.name,
            player.role,
            player.position(),
            player.hand_size(),
            player.total_energy()
        );
    }
    println!("\nTotal Turns: {}", game.state.turn);
}
