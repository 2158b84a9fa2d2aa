use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use dicebot::{DEFAULT_MAX_DICE, DiceBot, JsonFileStore, MemoryStore, Mode, Store};
use tracing_subscriber::EnvFilter;
use tyche::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "dicebot", version, about = "Tabletop RPG dice bot")]
struct Args {
    /// Gateway WebSocket URL, e.g. `wss://chat.example.net/ws`.
    #[arg(long, env = "TYCHE_URL")]
    url: String,

    /// Bot account, e.g. `dicebot@example.net`.
    #[arg(long, env = "TYCHE_JID")]
    jid: Jid,

    #[arg(long, env = "TYCHE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Resource, also used as the room nickname.
    #[arg(long, env = "TYCHE_RESOURCE", default_value = BotConfig::DEFAULT_RESOURCE)]
    resource: String,

    /// Rooms to join on connect, comma-separated.
    #[arg(long, env = "TYCHE_ROOMS", value_delimiter = ',')]
    rooms: Vec<Jid>,

    /// JSON file for accounts and aliases. Kept in memory if omitted.
    #[arg(long, env = "TYCHE_STORE")]
    store: Option<PathBuf>,

    /// Game mode at startup.
    #[arg(long, env = "TYCHE_MODE", default_value = "nwod")]
    mode: Mode,

    /// Forget conversations idle this long. Never, if omitted.
    #[arg(long, env = "TYCHE_IDLE_TIMEOUT_SECS")]
    idle_timeout_secs: Option<u64>,

    /// Largest dice pool a roll may ask for.
    #[arg(long, env = "TYCHE_MAX_DICE", default_value_t = DEFAULT_MAX_DICE)]
    max_dice: u32,

    /// Log filter, e.g. `info` or `dicebot=debug,tyche=debug`. Overrides
    /// `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_store(path: Option<PathBuf>) -> Result<Box<dyn Store>> {
    Ok(match path {
        Some(path) => {
            let store = JsonFileStore::open(&path)
                .with_context(|| format!("opening store {}", path.display()))?;
            Box::new(store)
        }
        None => {
            tracing::warn!("no store configured, accounts will be lost at exit");
            Box::new(MemoryStore::new())
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let store = open_store(args.store)?;
    let bot = DiceBot::new(store)
        .mode(args.mode)
        .max_dice(args.max_dice)
        .rooms(args.rooms);

    let config = BotConfig::new(args.jid, args.password).resource(args.resource);
    let conversations = ConversationConfig {
        idle_timeout: args.idle_timeout_secs.map(Duration::from_secs),
    };

    tracing::info!(url = %args.url, account = %config.full_jid(), mode = %args.mode, "connecting");
    let bot = BotBuilder::new(config)
        .conversation_config(conversations)
        .connect(&args.url, bot)
        .await
        .with_context(|| format!("connecting to {}", args.url))?;

    bot.run_until_ctrl_c().await?;
    tracing::info!("bye");
    Ok(())
}
