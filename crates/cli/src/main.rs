use anyhow::{bail, Context};
use duelist_bot::render::{hand_message, render_duel_embed};
use duelist_bot::DEFAULT_LOG_TAIL;
use duelist_core::{
    apply_action, shuffle_deck, Action, DuelSeed, DuelState, Participant, RngState, Side,
};
use duelist_data::{list_decks, load_duel_config, load_named_deck};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const CLI_USER_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    assets: PathBuf,
    player_deck: String,
    bot_deck: String,
    name: String,
    seed: Option<u64>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            player_deck: "k9".to_string(),
            bot_deck: "maliss".to_string(),
            name: "Joueur".to_string(),
            seed: None,
        }
    }
}

fn parse_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--assets" | "--decks" => options.assets = PathBuf::from(value(arg.as_str())?),
            "--player" => options.player_deck = value(arg.as_str())?,
            "--bot" => options.bot_deck = value(arg.as_str())?,
            "--name" => options.name = value(arg.as_str())?,
            "--seed" => {
                let raw = value(arg.as_str())?;
                options.seed = Some(
                    raw.parse()
                        .with_context(|| format!("--seed expects a number, got {raw}"))?,
                );
            }
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Draw,
    EndPhase,
    Raw { kind: String, actor: String },
    Hand,
    State,
    Log,
    Json,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let command = match head {
        "d" | "draw" => Command::Draw,
        "e" | "end" => Command::EndPhase,
        "h" | "hand" => Command::Hand,
        "s" | "state" => Command::State,
        "l" | "log" => Command::Log,
        "json" => Command::Json,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "raw" => {
            let kind = words
                .next()
                .ok_or_else(|| "usage: raw <KIND> [player|bot]".to_string())?;
            Command::Raw {
                kind: kind.to_string(),
                actor: words.next().unwrap_or("player").to_string(),
            }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(command)
}

struct Session {
    state: DuelState,
    log_tail: usize,
}

impl Session {
    fn state(&self) -> &DuelState {
        &self.state
    }

    fn apply(&mut self, action: Action) {
        self.state = apply_action(self.state.clone(), &action);
    }

    /// Runs one command and returns the text to print, or `None` to quit.
    fn execute(&mut self, command: Command) -> Result<Option<String>, String> {
        let text = match command {
            Command::Draw => {
                self.apply(Action::draw_step(Side::Player));
                let hand = &self.state().player.hand;
                format!(
                    "{}\n{}",
                    self.summary(),
                    hand_message(&format!("Ta main ({}): ", hand.len()), hand)
                )
            }
            Command::EndPhase => {
                self.apply(Action::end_phase(Side::Player));
                self.summary()
            }
            Command::Raw { kind, actor } => {
                let action = Action::parse(&kind, &actor, None).map_err(|err| err.to_string())?;
                self.apply(action);
                self.summary()
            }
            Command::Hand => hand_message("Ta main: ", &self.state().player.hand),
            Command::State => self.summary(),
            Command::Log => self.state().log.join("\n"),
            Command::Json => {
                serde_json::to_string_pretty(self.state()).map_err(|err| err.to_string())?
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(text))
    }

    fn summary(&self) -> String {
        let embed = render_duel_embed(self.state(), self.log_tail);
        let mut out = format!("== {} ==", embed.title);
        for field in &embed.fields {
            if field.value.contains('\n') {
                let value = field.value.replace('\n', "\n  ");
                out.push_str(&format!("\n{}:\n  {}", field.name, value));
            } else {
                out.push_str(&format!("\n{}: {}", field.name, field.value));
            }
        }
        out
    }
}

const HELP: &str = "commands: d|draw, e|end, h|hand, s|state, l|log, json, raw <KIND> [player|bot], q|quit";

fn start_session(options: &CliOptions) -> anyhow::Result<Session> {
    let decks = list_decks(&options.assets)?;
    for name in [&options.player_deck, &options.bot_deck] {
        if !decks.contains(name) {
            bail!("unknown deck {name}; available: {}", decks.join(", "));
        }
    }
    let config = load_duel_config(&options.assets)?;
    let mut rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    tracing::info!(seed = rng.seed(), "shuffling decks");
    let player_deck = load_named_deck(&options.assets, &options.player_deck)?;
    let bot_deck = load_named_deck(&options.assets, &options.bot_deck)?;
    let seed = DuelSeed {
        duel_id: format!("{:08x}", rng.next_u64() as u32),
        channel_id: 0,
        player: Participant::new(CLI_USER_ID, options.name.clone()),
        bot: Participant::new(0, "Bot"),
        player_deck: shuffle_deck(&player_deck, &mut rng),
        bot_deck: shuffle_deck(&bot_deck, &mut rng),
    };
    let state = DuelState::new(seed, &config)?;
    Ok(Session {
        state,
        log_tail: DEFAULT_LOG_TAIL,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args)?;
    let mut session = start_session(&options)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", session.summary())?;
    writeln!(
        stdout,
        "{}",
        hand_message("Ta main de départ: ", &session.state().player.hand)
    )?;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let result = parse_command(&line).and_then(|command| session.execute(command));
        match result {
            Ok(Some(text)) => writeln!(stdout, "{text}")?,
            Ok(None) => break,
            Err(err) => writeln!(stdout, "error: {err}")?,
        }
    }
    Ok(())
}
