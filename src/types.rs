use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub type PlayerId = u32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Destiny,
    SisterFour,
    Pigsy,
    BigBird,
    Thief,
    Milkshake,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Destiny,
        Role::SisterFour,
        Role::Pigsy,
        Role::BigBird,
        Role::Thief,
        Role::Milkshake,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Role::Destiny => "Carries the mandate of heaven.",
            Role::SisterFour => "A strategist who reads the road ahead.",
            Role::Pigsy => "Strong enough to break through reversal tiles.",
            Role::BigBird => "Flies one extra tile after every resupply stop.",
            Role::Thief => "Lifts a card from the leader when opening a treasure.",
            Role::Milkshake => "Restores an extra card at every resupply.",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn flipped(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Empty,
    Treasure,
    Resupply,
    Reverse,
    Boss,
    Teleport,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Energy,
    Spell,
    Event,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardEffect {
    FixDice,
    ExtraTurn,
    SwapPosition,
    SpellShield,
    BossPass,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventCardKind {
    SwapAllCards,
    BossBattlePass,
    RandomDiscard,
    NextPlayerDiscard,
    AllPlayersDraw,
    PrevPlayerDraw,
    AllPlayersDiscard,
    DiceBattleSteal,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    RoleSelection,
    DiceRoll,
    BossBattlePlayCards,
    BossBattleDiscard,
    SpellFixDice,
    SpellSwapPosition,
    SpellShield,
    SpellExtraTurn,
    EventCardDraw,
    CardChoice,
    PlayerChoice,
    GameOver,
    TurnEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Pass,
    Stay,
}
