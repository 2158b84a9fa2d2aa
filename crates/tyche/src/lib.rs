//! # Tyche
//!
//! A room-aware chat bot framework with regex command routing.
//!
//! Applications implement a single [`BotLogic`] trait: they register
//! commands on a [`Router`] and may hook connect and periodic events. The
//! framework handles the connection, authentication, per-counterpart
//! conversations, room joins with nickname-collision retry, keep-alives,
//! and turning handler failures into replies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tyche::prelude::*;
//!
//! #[derive(Default)]
//! struct Echo;
//!
//! impl BotLogic for Echo {
//!     fn register(router: &mut Router<Handler<Self>>) -> Result<(), RouterError> {
//!         router.register(r"[Ee]cho\b", "echo TEXT: say it back.", |_, _, cmd| {
//!             Ok(Some(cmd.args().to_string()))
//!         })
//!     }
//! }
//!
//! # async fn run() -> Result<(), TycheError> {
//! let jid: Jid = "echo@example.net".parse()?;
//! let bot = BotBuilder::new(BotConfig::new(jid, "secret"))
//!     .connect("ws://127.0.0.1:5280/ws", Echo)
//!     .await?;
//! bot.run_until_ctrl_c().await
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! tyche-transport     bytes over WebSocket (or in memory)
//! tyche-protocol      Jid, Message, Presence, Frame, Codec
//! tyche-conversation  one reply channel per counterpart
//! tyche-room          join / retry / leave state machine
//! tyche-tick          keep-alive and periodic ticks
//! tyche (this)        router, dispatch, run loop
//! ```

mod bot;
mod builtins;
mod command;
mod config;
mod dispatch;
mod error;
mod logic;
mod router;

pub use bot::{Bot, BotBuilder};
pub use command::{Command, Context};
pub use config::BotConfig;
pub use dispatch::BotCore;
pub use error::{CommandError, RouterError, TycheError};
pub use logic::{BotLogic, Handler, Reply};
pub use router::{HelpIndex, Route, Router};

pub use tyche_conversation as conversation;
pub use tyche_dice as dice;
pub use tyche_protocol as protocol;
pub use tyche_room as room;
pub use tyche_tick as tick;
pub use tyche_transport as transport;

/// Everything an application usually needs.
pub mod prelude {
    pub use crate::{
        Bot, BotBuilder, BotConfig, BotCore, BotLogic, Command, CommandError, Context, Handler,
        HelpIndex, Reply, Router, RouterError, TycheError,
    };
    pub use tyche_conversation::ConversationConfig;
    pub use tyche_protocol::{Codec, Frame, JsonCodec, Jid, Message, MessageKind, Presence, Stanza};
    pub use tyche_room::RoomConfig;
    pub use tyche_tick::TickConfig;
    pub use tyche_transport::{Connection, MemoryConnection};
}
