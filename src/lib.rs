#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod game;
pub mod players;
pub mod types;

pub use board::{Board, BoardLayout, Tile};
pub use game::{Game, GameConfig, GameError, GameState};
pub use types::{Direction, PlayerId, Role, TileKind};
