use duelist_core::DuelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("config error: {0}")]
    Config(String),
    #[error("data error: {0}")]
    Data(String),
    #[error("duel error: {0}")]
    Duel(#[from] DuelError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http error: {0}")]
    Http(String),
    #[error("missing or invalid authorization")]
    Unauthorized,
    #[error("duel {0} already exists")]
    DuplicateDuel(String),
    #[error("duel {0} not found")]
    DuelNotFound(String),
    #[error("user {user_id} is not the player of duel {duel_id}")]
    NotYourDuel { duel_id: String, user_id: u64 },
    #[error("duel {duel_id} changed: expected version {expected}, found {found}")]
    StaleDuel {
        duel_id: String,
        expected: u64,
        found: u64,
    },
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

impl From<anyhow::Error> for BotError {
    fn from(value: anyhow::Error) -> Self {
        Self::Data(format!("{value:#}"))
    }
}
