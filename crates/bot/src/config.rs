use crate::BotError;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:7878";
pub const DEFAULT_LOG_TAIL: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub bind: String,
    pub assets_dir: PathBuf,
    pub player_deck: String,
    pub bot_deck: String,
    pub bot_name: String,
    pub log_tail: usize,
    /// When set, every request must carry `Authorization: Bot <token>`.
    pub token: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            assets_dir: PathBuf::from("assets"),
            player_deck: "k9".to_string(),
            bot_deck: "maliss".to_string(),
            bot_name: "Bot".to_string(),
            log_tail: DEFAULT_LOG_TAIL,
            token: None,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BotError> {
        let mut config = Self::default();
        if let Some(bind) = lookup("DUELIST_BIND") {
            config.bind = bind;
        }
        if let Some(dir) = lookup("DUELIST_ASSETS") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(deck) = lookup("DUELIST_PLAYER_DECK") {
            config.player_deck = deck;
        }
        if let Some(deck) = lookup("DUELIST_BOT_DECK") {
            config.bot_deck = deck;
        }
        if let Some(name) = lookup("DUELIST_BOT_NAME") {
            config.bot_name = name;
        }
        if let Some(tail) = lookup("DUELIST_LOG_TAIL") {
            config.log_tail = tail
                .parse()
                .map_err(|_| BotError::Config(format!("DUELIST_LOG_TAIL is not a count: {tail}")))?;
        }
        config.token = lookup("DUELIST_TOKEN").filter(|token| !token.trim().is_empty());
        if config.player_deck.is_empty() || config.bot_deck.is_empty() {
            return Err(BotError::Config("deck names must not be empty".to_string()));
        }
        Ok(config)
    }
}
