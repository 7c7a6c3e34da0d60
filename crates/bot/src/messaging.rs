use crate::BotError;
use serde::Serialize;
use std::collections::HashMap;

/// Private channel to a single user.
pub trait DirectMessenger {
    fn send(&mut self, user_id: u64, text: &str) -> Result<(), BotError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectMessage {
    pub user_id: u64,
    pub text: String,
}

/// In-process mailbox; clients poll and drain their own messages.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: HashMap<u64, Vec<DirectMessage>>,
    max_per_user: Option<usize>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_per_user: usize) -> Self {
        Self {
            pending: HashMap::new(),
            max_per_user: Some(max_per_user),
        }
    }

    pub fn pending(&self, user_id: u64) -> &[DirectMessage] {
        self.pending
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn drain(&mut self, user_id: u64) -> Vec<DirectMessage> {
        self.pending.remove(&user_id).unwrap_or_default()
    }
}

impl DirectMessenger for Outbox {
    fn send(&mut self, user_id: u64, text: &str) -> Result<(), BotError> {
        let queue = self.pending.entry(user_id).or_default();
        if let Some(limit) = self.max_per_user {
            if queue.len() >= limit {
                return Err(BotError::Delivery(format!(
                    "mailbox of user {user_id} is full"
                )));
            }
        }
        queue.push(DirectMessage {
            user_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
