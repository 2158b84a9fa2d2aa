//! The synchronous heart of the bot.
//!
//! [`BotCore`] owns every piece of bot state and turns one inbound stanza
//! or one tick into zero or more outbound stanzas on its outgoing
//! channel. It never awaits, so it can be driven directly by tests and by
//! the async run loop in [`Bot`](crate::Bot) alike.

use std::panic::{self, AssertUnwindSafe};

use tokio::sync::mpsc;
use tyche_conversation::{ConversationConfig, ConversationKind, ConversationRegistry};
use tyche_protocol::{Message, MessageKind, Presence, PresenceKind, Stanza};
use tyche_room::{JoinOutcome, RoomConfig, RoomManager};
use tyche_tick::TickInfo;

use crate::{
    BotConfig, BotLogic, Command, CommandError, Context, Handler, Router, RouterError, builtins,
};

/// Bot state plus the application logic, driven one event at a time.
pub struct BotCore<L: BotLogic> {
    logic: L,
    router: Router<Handler<L>>,
    conversations: ConversationRegistry,
    rooms: RoomManager,
    config: BotConfig,
    outgoing: mpsc::UnboundedSender<Stanza>,
}

impl<L: BotLogic> BotCore<L> {
    /// Builds the command table and returns the core with the receiving
    /// end of its outgoing channel.
    ///
    /// # Errors
    /// Returns [`RouterError`] if any command pattern fails to compile.
    pub fn new(
        logic: L,
        config: BotConfig,
        conversation_config: ConversationConfig,
        room_config: RoomConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Stanza>), RouterError> {
        let mut router = Router::new();
        builtins::register::<L>(&mut router)?;
        L::register(&mut router)?;
        tracing::debug!(commands = router.len(), "command table built");

        let (conversations, rx) = ConversationRegistry::new(conversation_config);
        let outgoing = conversations.outgoing();
        let core = Self {
            logic,
            router,
            conversations,
            rooms: RoomManager::new(room_config),
            config,
            outgoing,
        };
        Ok((core, rx))
    }

    /// Announces the bot and runs the application's connect hook.
    pub fn on_connect(&mut self) {
        self.send(Presence::available());
        let mut ctx = Context::new(&mut self.rooms, &self.outgoing, &self.config, &self.router);
        self.logic.on_connect(&mut ctx);
    }

    /// Routes one inbound stanza.
    pub fn handle_stanza(&mut self, stanza: Stanza) {
        match stanza {
            Stanza::Message(msg) => self.handle_message(&msg),
            Stanza::Presence(presence) => self.handle_presence(&presence),
        }
    }

    /// Runs the chores due on this tick.
    pub fn on_tick(&mut self, info: &TickInfo) {
        if info.keepalive {
            tracing::debug!(tick = info.tick, "sending keep-alive presence");
            self.send(Presence::available());
        }
        if info.periodic {
            let mut ctx =
                Context::new(&mut self.rooms, &self.outgoing, &self.config, &self.router);
            self.logic.periodic(&mut ctx);
            let evicted = self.conversations.evict_idle();
            if !evicted.is_empty() {
                tracing::debug!(count = evicted.len(), "idle conversations evicted");
            }
        }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn conversations(&self) -> &ConversationRegistry {
        &self.conversations
    }

    pub fn router(&self) -> &Router<Handler<L>> {
        &self.router
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    fn handle_message(&mut self, msg: &Message) {
        if msg.kind == MessageKind::Error {
            tracing::debug!(from = ?msg.from, "bounced message ignored");
            return;
        }

        if let Some(room) = msg.invite_room() {
            tracing::info!(%room, from = ?msg.from, "invited to room");
            let mut ctx =
                Context::new(&mut self.rooms, &self.outgoing, &self.config, &self.router);
            if let Err(e) = ctx.join(&room) {
                tracing::debug!(%room, error = %e, "invite not followed");
            }
            return;
        }

        let Some(from) = &msg.from else {
            return;
        };
        if msg.kind == MessageKind::GroupChat && self.rooms.is_own_echo(from) {
            tracing::trace!(%from, "own groupchat echo dropped");
            return;
        }
        if msg.body.is_none() {
            return;
        }

        let kind = ConversationKind::for_message(msg);
        let convo = self.conversations.get_or_create(from, kind);
        let mut ctx = Context::new(&mut self.rooms, &self.outgoing, &self.config, &self.router);
        let logic = &mut self.logic;
        let router = &self.router;
        if let Err(e) = convo.deliver(msg, |m| dispatch(logic, router, &mut ctx, m)) {
            tracing::warn!(%from, error = %e, "reply not sent");
        }
    }

    // -----------------------------------------------------------------------
    // Presence
    // -----------------------------------------------------------------------

    fn handle_presence(&mut self, presence: &Presence) {
        match self.rooms.handle_presence(presence) {
            JoinOutcome::Retry(next) => self.send(next),
            JoinOutcome::Joined { room, nickname } => {
                tracing::debug!(%room, nickname, "join complete");
            }
            JoinOutcome::NotPending => {
                if presence.kind != PresenceKind::Subscribe {
                    return;
                }
                let Some(from) = &presence.from else {
                    return;
                };
                tracing::info!(%from, "accepting subscription");
                let convo = self
                    .conversations
                    .get_or_create(from, ConversationKind::Presence);
                let result = convo.deliver_presence(presence, |p| {
                    let Some(who) = p.from.as_ref().map(|j| j.bare()) else {
                        return Vec::new();
                    };
                    vec![
                        Presence::to(who.clone(), PresenceKind::Subscribed).into(),
                        Presence::to(who, PresenceKind::Subscribe).into(),
                    ]
                });
                if let Err(e) = result {
                    tracing::warn!(%from, error = %e, "subscription reply not sent");
                }
            }
        }
    }

    fn send(&self, stanza: impl Into<Stanza>) {
        if self.outgoing.send(stanza.into()).is_err() {
            tracing::warn!("outgoing channel closed, stanza dropped");
        }
    }
}

/// Finds and runs the handler for a message body.
///
/// This is the fault boundary: an error or a panic inside the handler
/// becomes a reply and never reaches the event loop.
fn dispatch<L: BotLogic>(
    logic: &mut L,
    router: &Router<Handler<L>>,
    ctx: &mut Context<'_>,
    msg: &Message,
) -> Option<String> {
    let line = msg.body.as_deref()?.trim();
    let route = router.lookup(line)?;
    let cmd = Command::new(msg.clone(), line, route.args(line));
    let handler = *route.handler();

    match panic::catch_unwind(AssertUnwindSafe(|| handler(logic, ctx, &cmd))) {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            tracing::debug!(pattern = route.pattern(), error = %e, "command failed");
            Some(e.to_string())
        }
        Err(_) => {
            tracing::error!(pattern = route.pattern(), line, "command handler panicked");
            Some(CommandError::fault("internal error").to_string())
        }
    }
}
