use crate::StoredDuel;
use duelist_core::{DuelState, Phase, PlayerSide, Side};
use serde::Serialize;

pub const DRAW_BUTTON: &str = "draw";
pub const END_PHASE_BUTTON: &str = "end_phase";
const CUSTOM_ID_PREFIX: &str = "duel";

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;
const BUTTON_PRIMARY: u8 = 1;
const BUTTON_SECONDARY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelButton {
    Draw,
    EndPhase,
}

impl DuelButton {
    fn key(self) -> &'static str {
        match self {
            DuelButton::Draw => DRAW_BUTTON,
            DuelButton::EndPhase => END_PHASE_BUTTON,
        }
    }

    pub fn custom_id(self, duel_id: &str) -> String {
        format!("{CUSTOM_ID_PREFIX}:{}:{duel_id}", self.key())
    }

    /// Splits `duel:<button>:<duel id>` back into its parts.
    pub fn parse_custom_id(custom_id: &str) -> Option<(DuelButton, &str)> {
        let mut parts = custom_id.splitn(3, ':');
        if parts.next()? != CUSTOM_ID_PREFIX {
            return None;
        }
        let button = match parts.next()? {
            DRAW_BUTTON => DuelButton::Draw,
            END_PHASE_BUTTON => DuelButton::EndPhase,
            _ => return None,
        };
        let duel_id = parts.next().filter(|id| !id.is_empty())?;
        Some((button, duel_id))
    }
}

pub fn render_duel_embed(state: &DuelState, log_tail: usize) -> Embed {
    let tail = state.log_tail(log_tail);
    let log = if tail.is_empty() {
        "—".to_string()
    } else {
        tail.join("\n")
    };
    let field = |name: &str, value: String, inline: bool| EmbedField {
        name: name.to_string(),
        value,
        inline,
    };
    Embed {
        title: format!("Duel #{}", state.duel_id()),
        fields: vec![
            field("Tour / Phase", format!("{} / {}", state.turn, state.phase), true),
            field("Actif", state.active.to_string(), true),
            field(
                "LP",
                format!(
                    "{}: {}\n{}: {}",
                    state.player.name(),
                    state.player.life_points,
                    state.bot.name(),
                    state.bot.life_points
                ),
                false,
            ),
            field(
                "Main (joueur)",
                format!("{} cartes (détails en DM)", state.player.hand.len()),
                true,
            ),
            field("Main (bot)", format!("{} cartes", state.bot.hand.len()), true),
            field("Log", log, false),
        ],
    }
}

pub fn duel_buttons(duel_id: &str) -> Vec<ActionRow> {
    vec![ActionRow {
        kind: COMPONENT_ACTION_ROW,
        components: vec![
            Button {
                kind: COMPONENT_BUTTON,
                style: BUTTON_PRIMARY,
                label: "Draw (actif)".to_string(),
                custom_id: DuelButton::Draw.custom_id(duel_id),
            },
            Button {
                kind: COMPONENT_BUTTON,
                style: BUTTON_SECONDARY,
                label: "End Phase".to_string(),
                custom_id: DuelButton::EndPhase.custom_id(duel_id),
            },
        ],
    }]
}

pub fn hand_message(prefix: &str, hand: &[String]) -> String {
    format!("{prefix}{}", hand.join(", "))
}

/// Public snapshot of a duel. Card ids stay private: hands and decks are
/// reported as counts, like the embed does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelView {
    pub duel_id: String,
    pub version: u64,
    pub channel_id: u64,
    pub turn: u32,
    pub active: Side,
    pub phase: Phase,
    pub player: SideView,
    pub bot: SideView,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideView {
    pub name: String,
    pub life_points: i64,
    pub hand_count: usize,
    pub deck_count: usize,
    pub graveyard_count: usize,
}

impl SideView {
    fn of(side: &PlayerSide) -> Self {
        Self {
            name: side.name().to_string(),
            life_points: side.life_points,
            hand_count: side.hand.len(),
            deck_count: side.deck.len(),
            graveyard_count: side.graveyard.len(),
        }
    }
}

pub fn duel_view(stored: &StoredDuel, log_tail: usize) -> DuelView {
    let state = &stored.state;
    DuelView {
        duel_id: state.duel_id().to_string(),
        version: stored.version,
        channel_id: state.channel_id,
        turn: state.turn,
        active: state.active,
        phase: state.phase,
        player: SideView::of(&state.player),
        bot: SideView::of(&state.bot),
        log: state.log_tail(log_tail).to_vec(),
    }
}
