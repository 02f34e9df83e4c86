use std::collections::HashMap;
use std::time::Duration;

use crate::game::game::Game;
use crate::types::PlayerId;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<PlayerId, u32>,
    pub positions_by_player: HashMap<PlayerId, Vec<usize>>,
    pub games: u32,
    pub unfinished: u32,
    pub total_steps: u64,
    pub total_turns: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += game.state.turn as u64;
        self.total_steps += game.state.step_log().len() as u64;

        match game.winning_player() {
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => self.unfinished += 1,
        }

        for player in game.state.players() {
            self.positions_by_player
                .entry(player.id)
                .or_default()
                .push(player.position());
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (player, wins) in other.wins {
            *self.wins.entry(player).or_insert(0) += wins;
        }
        for (player, positions) in other.positions_by_player {
            self.positions_by_player
                .entry(player)
                .or_default()
                .extend(positions);
        }
        self.games += other.games;
        self.unfinished += other.unfinished;
        self.total_steps += other.total_steps;
        self.total_turns += other.total_turns;
        self.total_duration += other.total_duration;
    }

    pub fn get_avg_steps(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_steps as f64 / self.games as f64
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }

    pub fn get_avg_position(&self, player: PlayerId) -> f64 {
        match self.positions_by_player.get(&player) {
            Some(positions) if !positions.is_empty() => {
                positions.iter().sum::<usize>() as f64 / positions.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(&player).copied().unwrap_or(0) as f64 / self.games as f64 * 100.0
    }
}

#[derive(Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}
