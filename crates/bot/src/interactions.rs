use crate::render::{duel_buttons, hand_message, render_duel_embed, ActionRow, DuelButton, Embed};
use crate::{BotConfig, BotError, DirectMessenger, DuelRegistry};
use duelist_core::{
    apply_action, shuffle_deck, Action, DuelConfig, DuelSeed, DuelState, Participant, RngState,
    Side,
};
use duelist_data::load_named_deck;
use serde::{Deserialize, Serialize};
use uuid::Builder;

pub const INTERACTION_PING: u8 = 1;
pub const INTERACTION_COMMAND: u8 = 2;
pub const INTERACTION_COMPONENT: u8 = 3;

pub const RESPONSE_PONG: u8 = 1;
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
pub const RESPONSE_UPDATE_MESSAGE: u8 = 7;

pub const FLAG_EPHEMERAL: u32 = 1 << 6;

pub const DUEL_START_COMMAND: &str = "duel_start";
const DUEL_ID_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    /// Snowflake as a string. Missing or non-numeric ids are stored as
    /// channel `0`.
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub member: Option<Member>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_id: Option<String>,
}

impl Interaction {
    /// Guild interactions carry the user inside `member`, direct ones at the
    /// top level.
    fn invoker(&self) -> Option<(&User, Option<&str>)> {
        if let Some(member) = &self.member {
            return Some((&member.user, member.nick.as_deref()));
        }
        self.user.as_ref().map(|user| (user, None))
    }

    fn channel(&self) -> u64 {
        match self.channel_id.as_deref().map(str::parse::<u64>) {
            Some(Ok(id)) => id,
            _ => {
                tracing::debug!(channel_id = ?self.channel_id, "no usable channel id, using 0");
                0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: u64,
    pub display_name: String,
}

fn resolve_invoker(interaction: &Interaction) -> Option<Invoker> {
    let (user, nick) = interaction.invoker()?;
    let user_id = user.id.parse().ok()?;
    let display_name = nick
        .or(user.global_name.as_deref())
        .unwrap_or(&user.username)
        .to_string();
    Some(Invoker {
        user_id,
        display_name,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(ResponseData {
                content: Some(text.into()),
                flags: Some(FLAG_EPHEMERAL),
                ..ResponseData::default()
            }),
        }
    }

    fn duel_message(kind: u8, state: &DuelState, log_tail: usize) -> Self {
        Self {
            kind,
            data: Some(ResponseData {
                embeds: vec![render_duel_embed(state, log_tail)],
                components: duel_buttons(state.duel_id()),
                ..ResponseData::default()
            }),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| data.flags)
            .is_some_and(|flags| flags & FLAG_EPHEMERAL != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: u8,
}

pub fn command_manifest() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: DUEL_START_COMMAND,
        description: "Démarre un duel contre le bot",
        kind: 1,
    }]
}

/// Everything a request needs: settings, the duel store, the shared
/// shuffle source and the DM channel.
pub struct DuelBot<M> {
    config: BotConfig,
    duel_config: DuelConfig,
    registry: DuelRegistry,
    rng: RngState,
    messenger: M,
}

impl<M: DirectMessenger> DuelBot<M> {
    pub fn new(config: BotConfig, duel_config: DuelConfig, rng: RngState, messenger: M) -> Self {
        Self {
            config,
            duel_config,
            registry: DuelRegistry::new(),
            rng,
            messenger,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &DuelRegistry {
        &self.registry
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn messenger_mut(&mut self) -> &mut M {
        &mut self.messenger
    }

    pub fn handle(&mut self, interaction: &Interaction) -> InteractionResponse {
        match interaction.kind {
            INTERACTION_PING => InteractionResponse::pong(),
            INTERACTION_COMMAND => self.handle_command(interaction),
            INTERACTION_COMPONENT => self.handle_component(interaction),
            other => {
                tracing::warn!(kind = other, "unsupported interaction type");
                InteractionResponse::ephemeral("Interaction non prise en charge.")
            }
        }
    }

    fn handle_command(&mut self, interaction: &Interaction) -> InteractionResponse {
        let name = interaction
            .data
            .as_ref()
            .and_then(|data| data.name.as_deref());
        if name != Some(DUEL_START_COMMAND) {
            tracing::warn!(command = ?name, "unknown command");
            return InteractionResponse::ephemeral("Commande inconnue.");
        }
        let Some(invoker) = resolve_invoker(interaction) else {
            return InteractionResponse::ephemeral("Utilisateur inconnu.");
        };
        match self.start_duel(&invoker, interaction.channel()) {
            Ok(state) => {
                let text = hand_message("Ta main de départ: ", &state.player.hand);
                self.deliver(invoker.user_id, &text);
                InteractionResponse::duel_message(
                    RESPONSE_CHANNEL_MESSAGE,
                    &state,
                    self.config.log_tail,
                )
            }
            Err(err) => {
                tracing::error!(error = %err, "duel start failed");
                InteractionResponse::ephemeral("Impossible de démarrer le duel.")
            }
        }
    }

    pub fn start_duel(
        &mut self,
        invoker: &Invoker,
        channel_id: u64,
    ) -> Result<DuelState, BotError> {
        let assets = &self.config.assets_dir;
        let player_deck = load_named_deck(assets, &self.config.player_deck)?;
        let bot_deck = load_named_deck(assets, &self.config.bot_deck)?;
        let duel_id = self.next_duel_id();
        let seed = DuelSeed {
            duel_id,
            channel_id,
            player: Participant::new(invoker.user_id, invoker.display_name.clone()),
            bot: Participant::new(0, self.config.bot_name.clone()),
            player_deck: shuffle_deck(&player_deck, &mut self.rng),
            bot_deck: shuffle_deck(&bot_deck, &mut self.rng),
        };
        let state = DuelState::new(seed, &self.duel_config)?;
        let stored = self.registry.insert(state)?;
        tracing::info!(
            duel = %stored.state.duel_id(),
            user = invoker.user_id,
            channel = channel_id,
            "duel started"
        );
        Ok(stored.state.clone())
    }

    fn next_duel_id(&mut self) -> String {
        loop {
            let mut bytes = [0u8; 16];
            bytes[..8].copy_from_slice(&self.rng.next_u64().to_le_bytes());
            bytes[8..].copy_from_slice(&self.rng.next_u64().to_le_bytes());
            let uuid = Builder::from_random_bytes(bytes).into_uuid();
            let mut id = uuid.simple().to_string();
            id.truncate(DUEL_ID_LEN);
            if !self.registry.contains(&id) {
                return id;
            }
        }
    }

    fn handle_component(&mut self, interaction: &Interaction) -> InteractionResponse {
        let custom_id = interaction
            .data
            .as_ref()
            .and_then(|data| data.custom_id.as_deref())
            .unwrap_or_default();
        let Some((button, duel_id)) = DuelButton::parse_custom_id(custom_id) else {
            tracing::warn!(custom_id, "unknown component");
            return InteractionResponse::ephemeral("Bouton inconnu.");
        };
        let Some(invoker) = resolve_invoker(interaction) else {
            return InteractionResponse::ephemeral("Utilisateur inconnu.");
        };
        match self.press(button, duel_id, invoker.user_id) {
            Ok(state) => {
                if button == DuelButton::Draw {
                    let prefix = format!("Ta main ({}): ", state.player.hand.len());
                    let text = hand_message(&prefix, &state.player.hand);
                    self.deliver(invoker.user_id, &text);
                }
                InteractionResponse::duel_message(
                    RESPONSE_UPDATE_MESSAGE,
                    &state,
                    self.config.log_tail,
                )
            }
            Err(BotError::DuelNotFound(_)) => InteractionResponse::ephemeral("Duel introuvable."),
            Err(BotError::NotYourDuel { .. }) => {
                InteractionResponse::ephemeral("Tu n'es pas le joueur de ce duel.")
            }
            Err(err) => {
                tracing::error!(error = %err, duel = duel_id, "button press failed");
                InteractionResponse::ephemeral("Action impossible, réessaie.")
            }
        }
    }

    /// Validates the presser against the duel and applies the button's action
    /// on the player's behalf.
    pub fn press(
        &mut self,
        button: DuelButton,
        duel_id: &str,
        user_id: u64,
    ) -> Result<DuelState, BotError> {
        let action = match button {
            DuelButton::Draw => Action::draw_step(Side::Player),
            DuelButton::EndPhase => Action::end_phase(Side::Player),
        };
        let stored = self.registry.update(duel_id, |state| {
            if state.player.participant.user_id != user_id {
                return Err(BotError::NotYourDuel {
                    duel_id: duel_id.to_string(),
                    user_id,
                });
            }
            Ok(apply_action(state.clone(), &action))
        })?;
        tracing::info!(
            duel = duel_id,
            kind = action.kind.keyword(),
            version = stored.version,
            turn = stored.state.turn,
            phase = %stored.state.phase,
            "action applied"
        );
        Ok(stored.state.clone())
    }

    fn deliver(&mut self, user_id: u64, text: &str) {
        if let Err(err) = self.messenger.send(user_id, text) {
            tracing::warn!(user = user_id, error = %err, "direct message not delivered");
        }
    }
}
