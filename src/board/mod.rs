use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::TileKind;

pub const STANDARD_TOTAL_TILES: usize = 81;
pub const BOSS_POSITIONS: [usize; 6] = [20, 32, 44, 56, 68, 80];
pub const BOSS_REQUIREMENTS: [u32; 6] = [8, 12, 12, 14, 18, 20];

const TREASURE_MODULUS: usize = 7;
const REVERSE_MODULUS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board needs at least 2 tiles, got {0}")]
    TooSmall(usize),
    #[error("tile positions must run 0..{expected} without gaps, found {found} at index {index}")]
    NonContiguous {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("{kind} at position {position} lies outside a board of {total} tiles")]
    OutOfRange {
        kind: TileKind,
        position: usize,
        total: usize,
    },
    #[error("boss at position {0} has no energy requirement")]
    MissingRequirement(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: usize,
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_requirement: Option<u32>,
}

impl Tile {
    pub fn new(position: usize, kind: TileKind) -> Self {
        Self {
            position,
            kind,
            boss_requirement: None,
        }
    }

    pub fn empty(position: usize) -> Self {
        Self::new(position, TileKind::Empty)
    }

    pub fn boss(position: usize, requirement: u32) -> Self {
        Self {
            position,
            kind: TileKind::Boss,
            boss_requirement: Some(requirement),
        }
    }

    pub fn is_special(&self) -> bool {
        self.kind != TileKind::Empty
    }

    pub fn is_boss(&self) -> bool {
        self.kind == TileKind::Boss
    }

    pub fn description(&self) -> String {
        match self.kind {
            TileKind::Empty => "Nothing here.".to_string(),
            TileKind::Treasure => "Stop here to draw an event card.".to_string(),
            TileKind::Resupply => "Draw two cards when passing or stopping.".to_string(),
            TileKind::Reverse => "Stopping here reverses your direction.".to_string(),
            TileKind::Boss => format!(
                "A boss blocks the road: {} energy to pass.",
                self.boss_requirement.unwrap_or(0)
            ),
            TileKind::Teleport => "Stopping here jumps to the next teleport ahead.".to_string(),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.boss_requirement {
            Some(requirement) => write!(f, "{}:{}({})", self.position, self.kind, requirement),
            None => write!(f, "{}:{}", self.position, self.kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossSpec {
    pub position: usize,
    pub requirement: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub total_tiles: usize,
    pub bosses: Vec<BossSpec>,
    #[serde(default)]
    pub teleports: Vec<usize>,
}

impl BoardLayout {
    pub fn standard() -> Self {
        Self {
            total_tiles: STANDARD_TOTAL_TILES,
            bosses: BOSS_POSITIONS
                .iter()
                .zip(BOSS_REQUIREMENTS.iter())
                .map(|(&position, &requirement)| BossSpec {
                    position,
                    requirement,
                })
                .collect(),
            teleports: Vec::new(),
        }
    }

    pub fn with_teleports(mut self, teleports: Vec<usize>) -> Self {
        self.teleports = teleports;
        self
    }

    fn validate(&self) -> Result<(), BoardError> {
        if self.total_tiles < 2 {
            return Err(BoardError::TooSmall(self.total_tiles));
        }
        let bosses = self.bosses.iter().map(|b| (TileKind::Boss, b.position));
        let teleports = self.teleports.iter().map(|&p| (TileKind::Teleport, p));
        for (kind, position) in bosses.chain(teleports) {
            if position >= self.total_tiles {
                return Err(BoardError::OutOfRange {
                    kind,
                    position,
                    total: self.total_tiles,
                });
            }
        }
        Ok(())
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Lays out bosses, one resupply per gap between consecutive bosses, optional
    /// teleports, and then fills the remaining cells by position arithmetic.
    pub fn generate(layout: &BoardLayout, rng: &mut impl Rng) -> Result<Self, BoardError> {
        layout.validate()?;

        let mut tiles: Vec<Tile> = (0..layout.total_tiles).map(Tile::empty).collect();
        let mut claimed = BTreeSet::new();

        let mut bosses = layout.bosses.clone();
        bosses.sort_by_key(|b| b.position);
        for boss in &bosses {
            tiles[boss.position] = Tile::boss(boss.position, boss.requirement);
            claimed.insert(boss.position);
        }

        for pair in bosses.windows(2) {
            let (current, next) = (pair[0].position, pair[1].position);
            if next <= current + 1 {
                continue;
            }
            let high = (next - 2).max(current + 1);
            let position = rng.gen_range(current + 1..=high);
            if claimed.insert(position) {
                tiles[position] = Tile::new(position, TileKind::Resupply);
            }
        }

        for &position in &layout.teleports {
            if claimed.insert(position) {
                tiles[position] = Tile::new(position, TileKind::Teleport);
            }
        }

        for position in 1..layout.total_tiles {
            if claimed.contains(&position) {
                continue;
            }
            if position % TREASURE_MODULUS == 0 {
                tiles[position] = Tile::new(position, TileKind::Treasure);
            } else if position % REVERSE_MODULUS == 0 {
                tiles[position] = Tile::new(position, TileKind::Reverse);
            }
        }

        Ok(Self { tiles })
    }

    pub fn standard(rng: &mut impl Rng) -> Result<Self, BoardError> {
        Self::generate(&BoardLayout::standard(), rng)
    }

    /// Builds a board from explicit tiles. Positions must cover `0..len` exactly.
    pub fn from_tiles(mut tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if tiles.len() < 2 {
            return Err(BoardError::TooSmall(tiles.len()));
        }
        tiles.sort_by_key(|t| t.position);
        for (index, tile) in tiles.iter().enumerate() {
            if tile.position != index {
                return Err(BoardError::NonContiguous {
                    index,
                    expected: tiles.len(),
                    found: tile.position,
                });
            }
            if tile.is_boss() && tile.boss_requirement.is_none() {
                return Err(BoardError::MissingRequirement(tile.position));
            }
        }
        Ok(Self { tiles })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, position: usize) -> Option<&Tile> {
        self.tiles.get(position)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn last_position(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    pub fn boss_positions(&self) -> Vec<usize> {
        self.tiles
            .iter()
            .filter(|t| t.is_boss())
            .map(|t| t.position)
            .collect()
    }

    /// Nearest boss strictly behind `position`.
    pub fn previous_boss(&self, position: usize) -> Option<usize> {
        self.tiles[..position.min(self.tiles.len())]
            .iter()
            .rev()
            .find(|t| t.is_boss())
            .map(|t| t.position)
    }

    /// Nearest boss strictly ahead of `position`.
    pub fn next_boss(&self, position: usize) -> Option<&Tile> {
        self.tiles
            .iter()
            .skip(position + 1)
            .find(|t| t.is_boss())
    }

    pub fn next_teleport(&self, position: usize) -> Option<usize> {
        self.tiles
            .iter()
            .skip(position + 1)
            .find(|t| t.kind == TileKind::Teleport)
            .map(|t| t.position)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn standard_board_has_bosses_at_fixed_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::standard(&mut rng).unwrap();

        assert_eq!(board.len(), STANDARD_TOTAL_TILES);
        assert_eq!(board.boss_positions(), BOSS_POSITIONS.to_vec());
        for (position, requirement) in BOSS_POSITIONS.iter().zip(BOSS_REQUIREMENTS) {
            assert_eq!(board.tile(*position).unwrap().boss_requirement, Some(requirement));
        }
        assert_eq!(board.tile(0).unwrap().kind, TileKind::Empty);
        assert_eq!(board.tile(7).unwrap().kind, TileKind::Treasure);
        assert_eq!(board.tile(9).unwrap().kind, TileKind::Reverse);
    }

    #[test]
    fn previous_boss_looks_strictly_behind() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::standard(&mut rng).unwrap();

        assert_eq!(board.previous_boss(20), None);
        assert_eq!(board.previous_boss(32), Some(20));
        assert_eq!(board.previous_boss(33), Some(32));
        assert_eq!(board.previous_boss(80), Some(68));
    }

    #[test]
    fn teleports_are_claimed_before_arithmetic_fill() {
        let layout = BoardLayout::standard().with_teleports(vec![14, 50]);
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::generate(&layout, &mut rng).unwrap();

        assert_eq!(board.tile(14).unwrap().kind, TileKind::Teleport);
        assert_eq!(board.next_teleport(0), Some(14));
        assert_eq!(board.next_teleport(14), Some(50));
        assert_eq!(board.next_teleport(50), None);
    }

    #[test]
    fn layout_rejects_out_of_range_boss() {
        let layout = BoardLayout {
            total_tiles: 10,
            bosses: vec![BossSpec {
                position: 12,
                requirement: 3,
            }],
            teleports: Vec::new(),
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Board::generate(&layout, &mut rng),
            Err(BoardError::OutOfRange { position: 12, .. })
        ));
    }

    #[test]
    fn from_tiles_requires_contiguous_positions() {
        let tiles = vec![Tile::empty(0), Tile::empty(2)];
        assert!(matches!(
            Board::from_tiles(tiles),
            Err(BoardError::NonContiguous { index: 1, .. })
        ));

        let shuffled = vec![Tile::empty(1), Tile::empty(0), Tile::boss(2, 4)];
        let board = Board::from_tiles(shuffled).unwrap();
        assert_eq!(board.last_position(), 2);
    }

    proptest! {
        #[test]
        fn every_gap_between_bosses_has_a_resupply(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::standard(&mut rng).unwrap();
            for pair in BOSS_POSITIONS.windows(2) {
                let found = (pair[0] + 1..=pair[1] - 2)
                    .any(|p| board.tile(p).unwrap().kind == TileKind::Resupply);
                prop_assert!(found, "no resupply between {} and {}", pair[0], pair[1]);
            }
            prop_assert_eq!(board.count(TileKind::Resupply), BOSS_POSITIONS.len() - 1);
        }

        #[test]
        fn arithmetic_fill_skips_claimed_cells(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::standard(&mut rng).unwrap();
            for tile in board.tiles() {
                match tile.kind {
                    TileKind::Treasure => prop_assert_eq!(tile.position % 7, 0),
                    TileKind::Reverse => {
                        prop_assert_eq!(tile.position % 9, 0);
                        prop_assert_ne!(tile.position % 7, 0);
                    }
                    TileKind::Empty if tile.position > 0 => {
                        prop_assert_ne!(tile.position % 7, 0);
                        prop_assert_ne!(tile.position % 9, 0);
                    }
                    _ => {}
                }
            }
        }
    }
}
