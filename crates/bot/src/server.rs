use crate::render::duel_view;
use crate::{command_manifest, BotConfig, BotError, DuelBot, Interaction, Outbox};
use duelist_core::RngState;
use duelist_data::load_duel_config;
use serde::Serialize;
use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};
use tiny_http::{Header, Method, Response, Server, StatusCode};

const MAX_PENDING_DMS: usize = 50;

pub struct AppState {
    pub bot: DuelBot<Outbox>,
}

impl AppState {
    pub fn new(config: BotConfig) -> Result<Self, BotError> {
        let duel_config = load_duel_config(&config.assets_dir)?;
        let rng = RngState::from_entropy();
        tracing::info!(
            seed = rng.seed(),
            assets = %config.assets_dir.display(),
            "bot state ready"
        );
        Ok(Self {
            bot: DuelBot::new(config, duel_config, rng, Outbox::with_limit(MAX_PENDING_DMS)),
        })
    }
}

/// A response before it is written to the socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    fn json<T: Serialize>(value: &T) -> Result<Self, BotError> {
        Ok(Self {
            status: 200,
            body: serde_json::to_vec_pretty(value)?,
        })
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    fn is_json(&self) -> bool {
        !self.body.is_empty()
    }
}

pub fn run(config: BotConfig) -> Result<(), BotError> {
    let server = Server::http(&config.bind).map_err(|err| BotError::Http(err.to_string()))?;
    tracing::info!(bind = %config.bind, "duel bot listening");
    let state = Arc::new(Mutex::new(AppState::new(config)?));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            tracing::error!(error = %err, "request error");
        }
    }
    Ok(())
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), BotError> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Authorization"))
        .map(|header| header.value.as_str().to_string());
    let body = if method == Method::Post {
        match read_body(request.as_reader()) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "unreadable request body");
                return respond(request, Reply::empty(400));
            }
        }
    } else {
        String::new()
    };
    let reply = {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        route(&mut guard, &method, &url, authorization.as_deref(), &body)
    };
    tracing::debug!(method = %method, url = %url, status = reply.status, "handled request");
    respond(request, reply)
}

/// Reads the whole body as UTF-8 text.
fn read_body<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    Ok(body)
}

fn respond(request: tiny_http::Request, reply: Reply) -> Result<(), BotError> {
    let status = StatusCode(reply.status);
    if !reply.is_json() {
        request.respond(Response::empty(status))?;
        return Ok(());
    }
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| BotError::Http("invalid header".to_string()))?;
    request.respond(
        Response::from_data(reply.body)
            .with_status_code(status)
            .with_header(header),
    )?;
    Ok(())
}

/// Dispatches one request against the shared state. Kept free of socket
/// types so it can be driven directly.
pub fn route(
    state: &mut AppState,
    method: &Method,
    url: &str,
    authorization: Option<&str>,
    body: &str,
) -> Reply {
    if let Err(err) = authorize(state.bot.config(), authorization) {
        tracing::warn!(url, error = %err, "rejected request");
        return Reply::empty(401);
    }
    let path = url.split('?').next().unwrap_or(url);
    let result = match (method, path) {
        (&Method::Post, "/interactions") => handle_interaction(state, body),
        (&Method::Get, "/commands") => Reply::json(&command_manifest()),
        (&Method::Get, path) if path.starts_with("/api/duels/") => {
            let duel_id = &path["/api/duels/".len()..];
            let log_tail = state.bot.config().log_tail;
            match state.bot.registry().get(duel_id) {
                Some(stored) => Reply::json(&duel_view(stored, log_tail)),
                None => Ok(Reply::empty(404)),
            }
        }
        // Mailboxes hold hand contents; only a token-holding relay may drain them.
        (&Method::Get, path) if path.starts_with("/api/dm/") => {
            if state.bot.config().token.is_none() {
                tracing::warn!(url, "mailbox access refused, no token configured");
                Ok(Reply::empty(403))
            } else {
                match path["/api/dm/".len()..].parse::<u64>() {
                    Ok(user_id) => Reply::json(&state.bot.messenger_mut().drain(user_id)),
                    Err(_) => Ok(Reply::empty(400)),
                }
            }
        }
        _ => Ok(Reply::empty(404)),
    };
    result.unwrap_or_else(|err| {
        tracing::error!(url, error = %err, "request failed");
        match err {
            BotError::Json(_) => Reply::empty(400),
            _ => Reply::empty(500),
        }
    })
}

fn authorize(config: &BotConfig, authorization: Option<&str>) -> Result<(), BotError> {
    let Some(token) = config.token.as_deref() else {
        return Ok(());
    };
    match authorization.and_then(|value| value.strip_prefix("Bot ")) {
        Some(given) if given == token => Ok(()),
        _ => Err(BotError::Unauthorized),
    }
}

fn handle_interaction(state: &mut AppState, body: &str) -> Result<Reply, BotError> {
    let interaction: Interaction = serde_json::from_str(body)?;
    let response = state.bot.handle(&interaction);
    Reply::json(&response)
}
