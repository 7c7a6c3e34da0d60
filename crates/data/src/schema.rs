use serde::{Deserialize, Serialize};

pub use duelist_core::DuelConfig;

/// On-disk deck list: `{"name": "...", "cards": ["id", ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub name: Option<String>,
    pub cards: Vec<String>,
}
