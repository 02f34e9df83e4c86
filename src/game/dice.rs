use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameError;

/// How long a front end should animate a roll. The engine itself never waits.
pub const ROLL_ANIMATION: Duration = Duration::from_millis(1000);

pub const MIN_TOTAL: u8 = 2;
pub const MAX_TOTAL: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceResult {
    pub dice1: u8,
    pub dice2: u8,
    pub total: u8,
}

impl DiceResult {
    pub fn new(dice1: u8, dice2: u8) -> Self {
        Self {
            dice1,
            dice2,
            total: dice1 + dice2,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.gen_range(1..=6), rng.gen_range(1..=6))
    }

    /// A pair of faces summing to `total`, clamped to 2..=12.
    pub fn fixed(total: u8) -> Self {
        let total = total.clamp(MIN_TOTAL, MAX_TOTAL);
        Self::new(total.div_ceil(2), total / 2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dice {
    result: Option<DiceResult>,
    rolling: bool,
    roll_count: u32,
    max_rolls: u32,
}

impl Default for Dice {
    fn default() -> Self {
        Self {
            result: None,
            rolling: false,
            roll_count: 0,
            max_rolls: 1,
        }
    }
}

impl Dice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_roll(&self) -> bool {
        !self.rolling && self.roll_count < self.max_rolls
    }

    pub fn begin_roll(&mut self) -> Result<(), GameError> {
        if self.rolling {
            return Err(GameError::IllegalRoll("dice are already rolling"));
        }
        if self.roll_count >= self.max_rolls {
            return Err(GameError::IllegalRoll("no rolls left this turn"));
        }
        self.rolling = true;
        Ok(())
    }

    pub fn settle(&mut self, rng: &mut impl Rng) -> DiceResult {
        self.settle_with(DiceResult::random(rng))
    }

    pub fn settle_with(&mut self, result: DiceResult) -> DiceResult {
        self.rolling = false;
        self.result = Some(result);
        result
    }

    /// Rolls without advancing the roll count; the count moves once the
    /// resulting movement has finished.
    pub fn roll(&mut self, rng: &mut impl Rng) -> Result<DiceResult, GameError> {
        self.begin_roll()?;
        Ok(self.settle(rng))
    }

    pub fn result(&self) -> Option<DiceResult> {
        self.result
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn roll_count(&self) -> u32 {
        self.roll_count
    }

    pub fn max_rolls(&self) -> u32 {
        self.max_rolls
    }

    pub fn increment_roll_count(&mut self) {
        self.roll_count += 1;
    }

    pub fn reset_roll_count(&mut self) {
        self.roll_count = 0;
    }

    pub fn set_max_rolls(&mut self, max_rolls: u32) {
        self.max_rolls = max_rolls;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
