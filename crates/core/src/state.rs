use crate::{DuelConfig, DuelEvent, ZONE_SLOTS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Draw,
    Standby,
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Draw,
        Phase::Standby,
        Phase::Main1,
        Phase::Battle,
        Phase::Main2,
        Phase::End,
    ];

    pub fn next(self) -> Self {
        match self {
            Phase::Draw => Phase::Standby,
            Phase::Standby => Phase::Main1,
            Phase::Main1 => Phase::Battle,
            Phase::Battle => Phase::Main2,
            Phase::Main2 => Phase::End,
            Phase::End => Phase::Draw,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Draw => "DRAW",
            Phase::Standby => "STANDBY",
            Phase::Main1 => "MAIN1",
            Phase::Battle => "BATTLE",
            Phase::Main2 => "MAIN2",
            Phase::End => "END",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Bot,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Bot,
            Side::Bot => Side::Player,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Bot => "bot",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = DuelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "player" => Ok(Side::Player),
            "bot" => Ok(Side::Bot),
            other => Err(DuelError::UnknownSide(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DuelError {
    #[error("duel id must not be empty")]
    EmptyDuelId,
    #[error("{side} deck has {size} cards, {required} needed for the opening hand")]
    DeckTooSmall {
        side: Side,
        size: usize,
        required: usize,
    },
    #[error("unknown side: {0}")]
    UnknownSide(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub user_id: u64,
    pub name: String,
}

impl Participant {
    pub fn new(user_id: u64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSide {
    pub participant: Participant,
    pub deck: Vec<String>,
    #[serde(default)]
    pub hand: Vec<String>,
    #[serde(default)]
    pub graveyard: Vec<String>,
    #[serde(default)]
    pub monster_zone: [Option<String>; ZONE_SLOTS],
    #[serde(default)]
    pub spell_trap_zone: [Option<String>; ZONE_SLOTS],
    pub life_points: i64,
}

impl PlayerSide {
    pub fn new(participant: Participant, deck: Vec<String>, life_points: i64) -> Self {
        Self {
            participant,
            deck,
            hand: Vec::new(),
            graveyard: Vec::new(),
            monster_zone: Default::default(),
            spell_trap_zone: Default::default(),
            life_points,
        }
    }

    pub fn name(&self) -> &str {
        &self.participant.name
    }
}

/// Everything needed to open a duel. Decks are expected to be shuffled
/// already; the front of each deck is dealt first.
#[derive(Debug, Clone)]
pub struct DuelSeed {
    pub duel_id: String,
    pub channel_id: u64,
    pub player: Participant,
    pub bot: Participant,
    pub player_deck: Vec<String>,
    pub bot_deck: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuelState {
    duel_id: String,
    pub channel_id: u64,
    pub player: PlayerSide,
    pub bot: PlayerSide,
    pub turn: u32,
    pub active: Side,
    pub phase: Phase,
    #[serde(default)]
    pub log: Vec<String>,
}

impl DuelState {
    pub fn new(seed: DuelSeed, config: &DuelConfig) -> Result<Self, DuelError> {
        if seed.duel_id.trim().is_empty() {
            return Err(DuelError::EmptyDuelId);
        }
        let required = config.opening_hand;
        for (side, deck) in [(Side::Player, &seed.player_deck), (Side::Bot, &seed.bot_deck)] {
            if deck.len() < required {
                return Err(DuelError::DeckTooSmall {
                    side,
                    size: deck.len(),
                    required,
                });
            }
        }

        let mut state = Self {
            duel_id: seed.duel_id,
            channel_id: seed.channel_id,
            player: PlayerSide::new(seed.player, seed.player_deck, config.starting_life_points),
            bot: PlayerSide::new(seed.bot, seed.bot_deck, config.starting_life_points),
            turn: 1,
            active: Side::Player,
            phase: Phase::Draw,
            log: Vec::new(),
        };
        state.record(DuelEvent::Created);
        for side in [&mut state.player, &mut state.bot] {
            side.hand.extend(side.deck.drain(..required));
        }
        state.record(DuelEvent::OpeningHands { count: required });
        tracing::debug!(duel = %state.duel_id, "duel opened");
        Ok(state)
    }

    pub fn duel_id(&self) -> &str {
        &self.duel_id
    }

    pub fn side(&self, side: Side) -> &PlayerSide {
        match side {
            Side::Player => &self.player,
            Side::Bot => &self.bot,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut PlayerSide {
        match side {
            Side::Player => &mut self.player,
            Side::Bot => &mut self.bot,
        }
    }

    pub fn record(&mut self, event: DuelEvent) {
        self.log.push(event.to_string());
    }

    pub fn log_tail(&self, count: usize) -> &[String] {
        let start = self.log.len().saturating_sub(count);
        &self.log[start..]
    }
}
