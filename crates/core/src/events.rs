use crate::{Phase, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One narrative line of the duel log. `Display` gives the text shown to
/// players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DuelEvent {
    Created,
    OpeningHands { count: usize },
    PhaseChanged { from: Phase, to: Phase },
    TurnStarted { turn: u32, active: Side },
    DrawRejected { phase: Phase },
    CardsDrawn { side: Side, count: usize },
    DeckOut { name: String },
    UnknownAction,
}

impl fmt::Display for DuelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelEvent::Created => f.write_str("Duel créé. Pioche de départ..."),
            DuelEvent::OpeningHands { count } => write!(f, "Chaque joueur pioche {count}."),
            DuelEvent::PhaseChanged { from, to } => write!(f, "Phase: {from} -> {to}"),
            DuelEvent::TurnStarted { turn, active } => {
                write!(f, "Tour {turn}. Joueur actif: {active}")
            }
            DuelEvent::DrawRejected { .. } => f.write_str("Impossible : pas en DRAW."),
            DuelEvent::CardsDrawn { side, count } => {
                let noun = if *count == 1 { "carte" } else { "cartes" };
                write!(f, "{side} pioche {count} {noun}.")
            }
            DuelEvent::DeckOut { name } => {
                write!(f, "{name} n'a plus de cartes : défaite (deck out).")
            }
            DuelEvent::UnknownAction => f.write_str("Action inconnue."),
        }
    }
}
