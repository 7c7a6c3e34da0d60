use serde::{Deserialize, Serialize};

pub const DEFAULT_LIFE_POINTS: i64 = 8000;
pub const DEFAULT_OPENING_HAND: usize = 5;
pub const ZONE_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelConfig {
    #[serde(default = "default_opening_hand")]
    pub opening_hand: usize,
    #[serde(default = "default_life_points")]
    pub starting_life_points: i64,
}

fn default_opening_hand() -> usize {
    DEFAULT_OPENING_HAND
}

fn default_life_points() -> i64 {
    DEFAULT_LIFE_POINTS
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            opening_hand: DEFAULT_OPENING_HAND,
            starting_life_points: DEFAULT_LIFE_POINTS,
        }
    }
}
