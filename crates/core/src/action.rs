use crate::{DuelError, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionKind {
    DrawStep,
    EndPhase,
    /// Any kind the engine does not know. Applying it only logs.
    Unrecognized(String),
}

impl ActionKind {
    pub fn from_keyword(value: &str) -> Self {
        match value {
            "DRAW_STEP" => ActionKind::DrawStep,
            "END_PHASE" => ActionKind::EndPhase,
            other => ActionKind::Unrecognized(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            ActionKind::DrawStep => "DRAW_STEP",
            ActionKind::EndPhase => "END_PHASE",
            ActionKind::Unrecognized(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub actor: Side,
    #[serde(default)]
    pub card: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind, actor: Side) -> Self {
        Self {
            kind,
            actor,
            card: None,
        }
    }

    pub fn draw_step(actor: Side) -> Self {
        Self::new(ActionKind::DrawStep, actor)
    }

    pub fn end_phase(actor: Side) -> Self {
        Self::new(ActionKind::EndPhase, actor)
    }

    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card = Some(card.into());
        self
    }

    /// Builds an action from wire strings. Unknown kinds are kept as
    /// `Unrecognized`; an unknown actor is an error.
    pub fn parse(kind: &str, actor: &str, card: Option<String>) -> Result<Self, DuelError> {
        Ok(Self {
            kind: ActionKind::from_keyword(kind),
            actor: actor.parse()?,
            card,
        })
    }
}
