use crate::schema::{DeckList, DuelConfig};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const DECKS_DIR: &str = "decks";
const DUEL_CONFIG_FILE: &str = "duel.json";
const DECK_EXTENSION: &str = "json";

pub fn load_deck_list(path: &Path) -> anyhow::Result<DeckList> {
    let list: DeckList = load_json(path)?;
    if list.cards.is_empty() {
        bail!("deck {} has no cards", path.display());
    }
    if let Some(index) = list.cards.iter().position(|card| card.trim().is_empty()) {
        bail!("deck {} has a blank card id at index {index}", path.display());
    }
    Ok(list)
}

pub fn load_deck(path: &Path) -> anyhow::Result<Vec<String>> {
    Ok(load_deck_list(path)?.cards)
}

pub fn deck_path(assets_dir: &Path, name: &str) -> PathBuf {
    assets_dir
        .join(DECKS_DIR)
        .join(format!("{name}.{DECK_EXTENSION}"))
}

pub fn load_named_deck(assets_dir: &Path, name: &str) -> anyhow::Result<Vec<String>> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        bail!("invalid deck name {name:?}");
    }
    load_deck(&deck_path(assets_dir, name)).with_context(|| format!("load deck {name}"))
}

pub fn list_decks(assets_dir: &Path) -> anyhow::Result<Vec<String>> {
    let dir = assets_dir.join(DECKS_DIR);
    let entries = fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(DECK_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

pub fn load_duel_config(assets_dir: &Path) -> anyhow::Result<DuelConfig> {
    let path = assets_dir.join(DUEL_CONFIG_FILE);
    let config: DuelConfig = if path.exists() {
        load_json(&path)?
    } else {
        DuelConfig::default()
    };
    if config.opening_hand == 0 {
        bail!("{}: opening_hand must be at least 1", path.display());
    }
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
