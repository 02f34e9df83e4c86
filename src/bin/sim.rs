use std::thread;
use std::time::Instant;

use boss_trail::cli::players::PlayerInstance;
use boss_trail::cli::{GameStats, StatisticsAccumulator, create_player, print_player_help};
use boss_trail::game::{Game, GameConfig, MAX_PLAYERS, MIN_PLAYERS};
use clap::Parser;
use log::error;

#[derive(Debug, Parser, Clone)]
#[command(name = "boss-trail-sim")]
#[command(about = "Simulate games between different player strategies")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g., A,A,R)
    /// Use ':' to set player-specific params (e.g., A:7 for a seed)
    #[arg(long, default_value = "A,A")]
    players: String,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Cards dealt to each player at the start
    #[arg(long, default_value_t = 4)]
    starting_hand: usize,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn seat_players(keys: &[String], seed: u64) -> Option<Vec<PlayerInstance>> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let mut parts = key.split(':');
            let code = parts.next().unwrap_or_default();
            create_player(code, seed.wrapping_add(i as u64), parts.collect())
        })
        .collect()
}

fn run_game(args: &Args, keys: &[String], game_idx: u64, stats: &mut StatisticsAccumulator) {
    let seed = args.seed + game_idx;
    let Some(mut seats) = seat_players(keys, seed) else {
        return;
    };
    let config = GameConfig {
        num_players: seats.len(),
        ai_players: seats.len(),
        starting_hand: args.starting_hand,
        seed,
        ..GameConfig::default()
    };

    let start = Instant::now();
    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(err) => {
            error!("game {game_idx} could not start: {err}");
            return;
        }
    };
    let winner = match game.play(&mut seats) {
        Ok(winner) => winner,
        Err(err) => {
            error!("game {game_idx} aborted: {err}");
            None
        }
    };
    let duration = start.elapsed();
    stats.after(&game, duration);

    if !args.quiet && (game_idx < 10 || game_idx + 10 >= args.num as u64) {
        let seating = game
            .state
            .players()
            .iter()
            .map(|p| format!("{}", p.role))
            .collect::<Vec<_>>()
            .join(",");
        let winner = winner
            .map(|id| id.to_string())
            .unwrap_or_else(|| "None".to_string());
        println!(
            "Game {:>4}: Roles=[{}], Winner={:>4}, Turns={:>4}, Duration={:?}",
            game_idx + 1,
            seating,
            winner,
            game.state.turn,
            duration
        );
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let keys: Vec<String> = args.players.split(',').map(str::to_string).collect();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&keys.len()) {
        eprintln!("Error: Must specify {MIN_PLAYERS}-{MAX_PLAYERS} players");
        std::process::exit(1);
    }
    let Some(players) = seat_players(&keys, args.seed) else {
        eprintln!("Error: Unknown player code in '{}'", args.players);
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    };

    let mut stats = StatisticsAccumulator::new();
    let workers = args.workers.max(1);
    let games_per_worker = args.num as usize / workers;
    let remainder = args.num as usize % workers;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let args = &args;
                let keys = &keys;
                let num_games = games_per_worker + usize::from(worker_id < remainder);
                let start_idx = worker_id * games_per_worker + worker_id.min(remainder);
                scope.spawn(move || {
                    let mut local = StatisticsAccumulator::new();
                    for local_idx in 0..num_games {
                        run_game(args, keys, (start_idx + local_idx) as u64, &mut local);
                    }
                    local.stats
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(worker_stats) => stats.stats.merge(worker_stats),
                Err(_) => error!("a simulation worker panicked"),
            }
        }
    });

    if !args.quiet {
        print_summary(&stats.stats, &players);
    }
}

fn print_summary(stats: &GameStats, players: &[PlayerInstance]) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!("{:<20} {:<10} {:<12} {:<12}", "Player", "Wins", "Win Rate", "Avg Position");
    println!("{}", "-".repeat(56));
    for (seat, player) in players.iter().enumerate() {
        let id = seat as u32 + 1;
        println!(
            "{:<20} {:<10} {:<11.1}% {:<12.2}",
            format!("{} (Player {id})", player.label()),
            stats.wins.get(&id).copied().unwrap_or(0),
            stats.win_rate(id),
            stats.get_avg_position(id)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Unfinished: {}", stats.unfinished);
    println!("  Avg Turns: {:.2}", stats.get_avg_turns());
    println!("  Avg Steps: {:.2}", stats.get_avg_steps());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
