use crate::BotError;
use duelist_core::DuelState;
use serde::Serialize;
use std::collections::HashMap;

/// A duel as stored by the registry. `version` goes up by one on every
/// replacement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDuel {
    pub version: u64,
    pub state: DuelState,
}

/// Process-lifetime store of duels keyed by duel id. Duels are never removed.
#[derive(Debug, Default)]
pub struct DuelRegistry {
    duels: HashMap<String, StoredDuel>,
}

impl DuelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.duels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duels.is_empty()
    }

    pub fn contains(&self, duel_id: &str) -> bool {
        self.duels.contains_key(duel_id)
    }

    /// Stores a new duel at version 1. An existing id is left untouched.
    pub fn insert(&mut self, state: DuelState) -> Result<&StoredDuel, BotError> {
        let duel_id = state.duel_id().to_string();
        if self.duels.contains_key(&duel_id) {
            return Err(BotError::DuplicateDuel(duel_id));
        }
        Ok(self
            .duels
            .entry(duel_id)
            .or_insert(StoredDuel { version: 1, state }))
    }

    pub fn get(&self, duel_id: &str) -> Option<&StoredDuel> {
        self.duels.get(duel_id)
    }

    pub fn replace_if_version(
        &mut self,
        duel_id: &str,
        expected: u64,
        state: DuelState,
    ) -> Result<&StoredDuel, BotError> {
        let entry = self
            .duels
            .get_mut(duel_id)
            .ok_or_else(|| BotError::DuelNotFound(duel_id.to_string()))?;
        if entry.version != expected {
            return Err(BotError::StaleDuel {
                duel_id: duel_id.to_string(),
                expected,
                found: entry.version,
            });
        }
        entry.version += 1;
        entry.state = state;
        Ok(entry)
    }

    /// Reads the current snapshot, lets `f` derive the next state from it, and
    /// stores the result. Nothing is stored when `f` fails.
    pub fn update<F>(&mut self, duel_id: &str, f: F) -> Result<&StoredDuel, BotError>
    where
        F: FnOnce(&DuelState) -> Result<DuelState, BotError>,
    {
        let current = self
            .duels
            .get(duel_id)
            .ok_or_else(|| BotError::DuelNotFound(duel_id.to_string()))?;
        let version = current.version;
        let next = f(&current.state)?;
        self.replace_if_version(duel_id, version, next)
    }
}
