use duelist_bot::{
    render::DuelButton, route, AppState, BotConfig, BotError, DirectMessenger, DuelBot,
    Interaction, InteractionResponse, Outbox, RESPONSE_CHANNEL_MESSAGE, RESPONSE_PONG,
    RESPONSE_UPDATE_MESSAGE,
};
use duelist_core::{DuelConfig, Phase, RngState, Side};
use serde_json::{json, Value};
use std::path::PathBuf;
use tiny_http::Method;

const ALICE: u64 = 80351110224678912;
const MALLORY: u64 = 41771983423143937;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

fn test_config() -> BotConfig {
    BotConfig {
        assets_dir: assets_root(),
        ..BotConfig::default()
    }
}

fn new_bot() -> DuelBot<Outbox> {
    DuelBot::new(
        test_config(),
        DuelConfig::default(),
        RngState::from_seed(0xD0E1),
        Outbox::new(),
    )
}

fn interaction(value: Value) -> Interaction {
    serde_json::from_value(value).expect("interaction json")
}

fn command(user_id: u64, name: &str) -> Interaction {
    interaction(json!({
        "type": 2,
        "channel_id": "1234",
        "member": {
            "nick": null,
            "user": {"id": user_id.to_string(), "username": "alice", "global_name": "Alice"}
        },
        "data": {"name": name}
    }))
}

fn press(user_id: u64, custom_id: &str) -> Interaction {
    interaction(json!({
        "type": 3,
        "channel_id": "1234",
        "user": {"id": user_id.to_string(), "username": "someone"},
        "data": {"custom_id": custom_id}
    }))
}

fn content(response: &InteractionResponse) -> Option<&str> {
    response.data.as_ref()?.content.as_deref()
}

fn started_duel_id(bot: &mut DuelBot<Outbox>) -> String {
    let response = bot.handle(&command(ALICE, "duel_start"));
    assert_eq!(response.kind, RESPONSE_CHANNEL_MESSAGE);
    let data = response.data.expect("data");
    let title = &data.embeds[0].title;
    title.trim_start_matches("Duel #").to_string()
}

#[test]
fn ping_gets_pong() {
    let mut bot = new_bot();
    let response = bot.handle(&interaction(json!({"type": 1})));
    assert_eq!(response, InteractionResponse::pong());
    assert_eq!(response.kind, RESPONSE_PONG);
}

#[test]
fn duel_start_posts_embed_and_dms_hand() {
    let mut bot = new_bot();
    let response = bot.handle(&command(ALICE, "duel_start"));
    assert!(!response.is_ephemeral());
    let data = response.data.expect("data");
    let embed = &data.embeds[0];
    let duel_id = embed.title.trim_start_matches("Duel #");
    assert_eq!(duel_id.len(), 8);
    assert!(duel_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(embed.field("Tour / Phase"), Some("1 / DRAW"));
    assert_eq!(embed.field("LP"), Some("Alice: 8000\nBot: 8000"));
    assert_eq!(data.components[0].components.len(), 2);
    assert_eq!(
        data.components[0].components[0].custom_id,
        DuelButton::Draw.custom_id(duel_id)
    );

    let stored = bot.registry().get(duel_id).expect("stored duel");
    assert_eq!(stored.version, 1);
    assert_eq!(stored.state.channel_id, 1234);
    assert_eq!(stored.state.player.participant.user_id, ALICE);
    assert_eq!(stored.state.bot.participant.user_id, 0);
    assert_eq!(stored.state.player.deck.len(), 35);

    let dms = bot.messenger().pending(ALICE);
    assert_eq!(dms.len(), 1);
    assert_eq!(
        dms[0].text,
        format!("Ta main de départ: {}", stored.state.player.hand.join(", "))
    );
}

#[test]
fn nickname_wins_over_global_name() {
    let mut bot = new_bot();
    let response = bot.handle(&interaction(json!({
        "type": 2,
        "member": {
            "nick": "Yugi",
            "user": {"id": ALICE.to_string(), "username": "alice", "global_name": "Alice"}
        },
        "data": {"name": "duel_start"}
    })));
    let data = response.data.expect("data");
    assert_eq!(data.embeds[0].field("LP"), Some("Yugi: 8000\nBot: 8000"));
}

#[test]
fn unusable_channel_id_falls_back_to_zero() {
    let mut bot = new_bot();
    for channel in [json!(null), json!("general")] {
        let response = bot.handle(&interaction(json!({
            "type": 2,
            "channel_id": channel,
            "user": {"id": ALICE.to_string(), "username": "alice"},
            "data": {"name": "duel_start"}
        })));
        let data = response.data.expect("data");
        let duel_id = data.embeds[0].title.trim_start_matches("Duel #");
        let stored = bot.registry().get(duel_id).expect("stored");
        assert_eq!(stored.state.channel_id, 0);
    }
}

#[test]
fn each_start_gets_its_own_duel() {
    let mut bot = new_bot();
    let first = started_duel_id(&mut bot);
    let second = started_duel_id(&mut bot);
    assert_ne!(first, second);
    assert_eq!(bot.registry().len(), 2);
}

#[test]
fn draw_button_updates_message_in_place() {
    let mut bot = new_bot();
    let duel_id = started_duel_id(&mut bot);
    bot.messenger_mut().drain(ALICE);

    let response = bot.handle(&press(ALICE, &DuelButton::Draw.custom_id(&duel_id)));
    assert_eq!(response.kind, RESPONSE_UPDATE_MESSAGE);
    let data = response.data.expect("data");
    assert_eq!(data.embeds[0].field("Main (joueur)"), Some("6 cartes (détails en DM)"));
    assert!(data.embeds[0]
        .field("Log")
        .expect("log")
        .ends_with("player pioche 1 carte."));

    let stored = bot.registry().get(&duel_id).expect("stored");
    assert_eq!(stored.version, 2);
    assert_eq!(stored.state.player.hand.len(), 6);
    let dms = bot.messenger().pending(ALICE);
    assert_eq!(dms.len(), 1);
    assert!(dms[0].text.starts_with("Ta main (6): "));
}

#[test]
fn end_phase_button_cycles_turn_without_dm() {
    let mut bot = new_bot();
    let duel_id = started_duel_id(&mut bot);
    bot.messenger_mut().drain(ALICE);
    let custom_id = DuelButton::EndPhase.custom_id(&duel_id);
    for _ in 0..6 {
        let response = bot.handle(&press(ALICE, &custom_id));
        assert_eq!(response.kind, RESPONSE_UPDATE_MESSAGE);
    }
    let stored = bot.registry().get(&duel_id).expect("stored");
    assert_eq!(stored.state.turn, 2);
    assert_eq!(stored.state.active, Side::Bot);
    assert_eq!(stored.state.phase, Phase::Draw);
    assert_eq!(stored.version, 7);
    assert!(bot.messenger().pending(ALICE).is_empty());
}

#[test]
fn unknown_duel_is_reported_privately() {
    let mut bot = new_bot();
    let response = bot.handle(&press(ALICE, "duel:draw:deadbeef"));
    assert!(response.is_ephemeral());
    assert_eq!(content(&response), Some("Duel introuvable."));
}

#[test]
fn other_users_cannot_press() {
    let mut bot = new_bot();
    let duel_id = started_duel_id(&mut bot);
    let response = bot.handle(&press(MALLORY, &DuelButton::Draw.custom_id(&duel_id)));
    assert!(response.is_ephemeral());
    assert_eq!(content(&response), Some("Tu n'es pas le joueur de ce duel."));
    let stored = bot.registry().get(&duel_id).expect("stored");
    assert_eq!(stored.version, 1);
    assert_eq!(stored.state.player.hand.len(), 5);
    assert!(matches!(
        bot.press(DuelButton::Draw, &duel_id, MALLORY),
        Err(BotError::NotYourDuel { user_id: MALLORY, .. })
    ));
}

#[test]
fn unknown_command_and_button() {
    let mut bot = new_bot();
    let response = bot.handle(&command(ALICE, "duel_stop"));
    assert_eq!(content(&response), Some("Commande inconnue."));
    let response = bot.handle(&press(ALICE, "duel:surrender:abc"));
    assert_eq!(content(&response), Some("Bouton inconnu."));
    assert!(bot.registry().is_empty());
}

#[test]
fn missing_deck_fails_softly() {
    let mut config = test_config();
    config.player_deck = "does-not-exist".to_string();
    let mut bot = DuelBot::new(
        config,
        DuelConfig::default(),
        RngState::from_seed(1),
        Outbox::new(),
    );
    let response = bot.handle(&command(ALICE, "duel_start"));
    assert!(response.is_ephemeral());
    assert_eq!(content(&response), Some("Impossible de démarrer le duel."));
    assert!(bot.registry().is_empty());
}

struct DeadLetter;

impl DirectMessenger for DeadLetter {
    fn send(&mut self, _user_id: u64, _text: &str) -> Result<(), BotError> {
        Err(BotError::Delivery("dms closed".to_string()))
    }
}

#[test]
fn failed_dm_does_not_fail_interaction() {
    let mut bot = DuelBot::new(
        test_config(),
        DuelConfig::default(),
        RngState::from_seed(2),
        DeadLetter,
    );
    let response = bot.handle(&command(ALICE, "duel_start"));
    assert_eq!(response.kind, RESPONSE_CHANNEL_MESSAGE);
    assert_eq!(bot.registry().len(), 1);
}

fn app_state(token: Option<&str>) -> AppState {
    let mut config = test_config();
    config.token = token.map(str::to_string);
    AppState {
        bot: DuelBot::new(config, DuelConfig::default(), RngState::from_seed(3), Outbox::new()),
    }
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

const TOKEN: &str = "Bot hunter2";

fn start_over_http(state: &mut AppState, authorization: Option<&str>) -> String {
    let start = json!({
        "type": 2,
        "channel_id": "77",
        "user": {"id": ALICE.to_string(), "username": "alice"},
        "data": {"name": "duel_start"}
    })
    .to_string();
    let reply = route(state, &Method::Post, "/interactions", authorization, &start);
    assert_eq!(reply.status, 200);
    let response = body_json(&reply.body);
    assert_eq!(response["type"], 4);
    let title = response["data"]["embeds"][0]["title"].as_str().expect("title");
    title.trim_start_matches("Duel #").to_string()
}

#[test]
fn http_flow_start_press_and_poll() {
    let mut state = app_state(Some("hunter2"));
    let duel_id = start_over_http(&mut state, Some(TOKEN));

    let press_body = json!({
        "type": 3,
        "user": {"id": ALICE.to_string(), "username": "alice"},
        "data": {"custom_id": format!("duel:end_phase:{duel_id}")}
    })
    .to_string();
    let reply = route(&mut state, &Method::Post, "/interactions", Some(TOKEN), &press_body);
    assert_eq!(body_json(&reply.body)["type"], 7);

    let url = format!("/api/duels/{duel_id}");
    let reply = route(&mut state, &Method::Get, &url, Some(TOKEN), "");
    assert_eq!(reply.status, 200);
    let snapshot = body_json(&reply.body);
    assert_eq!(snapshot["version"], 2);
    assert_eq!(snapshot["phase"], "STANDBY");
    assert_eq!(snapshot["player"]["hand_count"], 5);
    assert_eq!(snapshot["player"]["deck_count"], 35);

    let url = format!("/api/dm/{ALICE}");
    let reply = route(&mut state, &Method::Get, &url, Some(TOKEN), "");
    let dms = body_json(&reply.body);
    assert_eq!(dms.as_array().map(Vec::len), Some(1));
    let reply = route(&mut state, &Method::Get, &url, Some(TOKEN), "");
    assert_eq!(body_json(&reply.body).as_array().map(Vec::len), Some(0));
}

#[test]
fn anonymous_snapshot_keeps_cards_hidden() {
    let mut state = app_state(None);
    let duel_id = start_over_http(&mut state, None);
    let hand = state
        .bot
        .registry()
        .get(&duel_id)
        .expect("stored")
        .state
        .player
        .hand
        .clone();

    let reply = route(&mut state, &Method::Get, &format!("/api/duels/{duel_id}"), None, "");
    assert_eq!(reply.status, 200);
    let snapshot = body_json(&reply.body);
    for side in ["player", "bot"] {
        assert!(snapshot[side].get("hand").is_none(), "{side} hand");
        assert!(snapshot[side].get("deck").is_none(), "{side} deck");
        assert_eq!(snapshot[side]["hand_count"], 5);
    }
    assert!(snapshot.get("state").is_none());
    let text = String::from_utf8(reply.body).expect("utf-8");
    assert!(hand.iter().all(|card| !text.contains(&format!("\"{card}\""))));
}

#[test]
fn mailbox_needs_a_configured_token() {
    let mut state = app_state(None);
    start_over_http(&mut state, None);
    let url = format!("/api/dm/{ALICE}");
    let reply = route(&mut state, &Method::Get, &url, None, "");
    assert_eq!(reply.status, 403);
    assert!(reply.body.is_empty());
    assert_eq!(state.bot.messenger().pending(ALICE).len(), 1);
}

#[test]
fn http_errors() {
    let mut state = app_state(None);
    assert_eq!(route(&mut state, &Method::Get, "/api/duels/nope", None, "").status, 404);
    assert_eq!(route(&mut state, &Method::Get, "/api/dm/alice", None, "").status, 403);
    assert_eq!(route(&mut state, &Method::Get, "/nowhere", None, "").status, 404);
    assert_eq!(route(&mut state, &Method::Post, "/interactions", None, "{not json").status, 400);

    let mut guarded = app_state(Some("hunter2"));
    let reply = route(&mut guarded, &Method::Get, "/api/dm/alice", Some(TOKEN), "");
    assert_eq!(reply.status, 400);
}

#[test]
fn http_command_manifest() {
    let mut state = app_state(None);
    let reply = route(&mut state, &Method::Get, "/commands", None, "");
    let manifest = body_json(&reply.body);
    assert_eq!(manifest[0]["name"], "duel_start");
    assert_eq!(manifest[0]["description"], "Démarre un duel contre le bot");
}

#[test]
fn http_token_guard() {
    let mut state = app_state(Some("hunter2"));
    let ping = json!({"type": 1}).to_string();
    assert_eq!(route(&mut state, &Method::Post, "/interactions", None, &ping).status, 401);
    let reply = route(&mut state, &Method::Post, "/interactions", Some("Bot hunter2"), &ping);
    assert_eq!(reply.status, 200);
    assert_eq!(body_json(&reply.body)["type"], 1);
}
