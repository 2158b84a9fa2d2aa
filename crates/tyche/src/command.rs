//! What a command handler sees: the command itself and a [`Context`]
//! for acting on the bot.

use tokio::sync::mpsc;
use tyche_protocol::{Jid, Message, MessageKind, Stanza};
use tyche_room::{RoomError, RoomManager};

use crate::{BotConfig, HelpIndex};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A matched command line.
#[derive(Debug, Clone)]
pub struct Command {
    message: Message,
    line: String,
    args: String,
}

impl Command {
    pub fn new(message: Message, line: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            message,
            line: line.into(),
            args: args.into(),
        }
    }

    /// The message the command arrived in.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The whole trimmed command line, command word included.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Everything after the command word, trimmed.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Full sender address. For groupchat this is `room@service/nick`.
    pub fn sender(&self) -> Option<&Jid> {
        self.message.from.as_ref()
    }

    pub fn is_groupchat(&self) -> bool {
        self.message.kind == MessageKind::GroupChat
    }

    /// The room a groupchat command came from.
    pub fn room(&self) -> Option<Jid> {
        if self.is_groupchat() {
            self.sender().map(Jid::bare)
        } else {
            None
        }
    }

    /// How the sender is known as a player: room nickname in groupchat,
    /// bare address in direct chat.
    pub fn player_key(&self) -> Option<String> {
        let from = self.sender()?;
        if self.is_groupchat() {
            from.resource().map(str::to_string)
        } else {
            Some(from.bare().to_string())
        }
    }

    /// Where a private reply to the sender goes. In a room that is the
    /// occupant address, which the room relays privately.
    pub fn private_target(&self) -> Option<Jid> {
        self.sender().cloned()
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The bot, as seen from inside a handler or hook.
///
/// Everything sent through a context goes onto the same outgoing channel
/// conversation replies use, and is written to the connection by the run
/// loop in order.
pub struct Context<'a> {
    rooms: &'a mut RoomManager,
    outgoing: &'a mpsc::UnboundedSender<Stanza>,
    config: &'a BotConfig,
    help: &'a dyn HelpIndex,
}

impl<'a> Context<'a> {
    pub fn new(
        rooms: &'a mut RoomManager,
        outgoing: &'a mpsc::UnboundedSender<Stanza>,
        config: &'a BotConfig,
        help: &'a dyn HelpIndex,
    ) -> Self {
        Self {
            rooms,
            outgoing,
            config,
            help,
        }
    }

    /// Queues a stanza for the connection.
    pub fn send(&self, stanza: impl Into<Stanza>) {
        if self.outgoing.send(stanza.into()).is_err() {
            tracing::warn!("outgoing channel closed, stanza dropped");
        }
    }

    /// Sends `body` to `to` as a private chat message.
    pub fn send_private(&self, to: Jid, body: impl Into<String>) {
        self.send(Message::chat(to, body));
    }

    /// Starts joining `room` under the configured nickname.
    pub fn join(&mut self, room: &Jid) -> Result<(), RoomError> {
        let presence = self.rooms.request_join(room, &self.config.nickname)?;
        self.send(presence);
        Ok(())
    }

    /// Leaves `room`, sending the farewell presence.
    pub fn leave(&mut self, room: &Jid) -> Result<(), RoomError> {
        let presence = self.rooms.leave(room)?;
        self.send(presence);
        Ok(())
    }

    pub fn rooms(&self) -> &RoomManager {
        self.rooms
    }

    /// The bot's bare account address.
    pub fn bot_jid(&self) -> &Jid {
        &self.config.jid
    }

    /// The nickname requested on join.
    pub fn nickname(&self) -> &str {
        &self.config.nickname
    }

    pub fn help(&self) -> &dyn HelpIndex {
        self.help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Router;
    use tyche_protocol::{Presence, PresenceKind};

    fn jid(s: &str) -> Jid {
        s.parse().unwrap()
    }

    fn message(from: &str, kind: MessageKind) -> Message {
        Message {
            from: Some(jid(from)),
            to: jid("tyche@example.net/Tyche"),
            kind,
            body: Some("deal 2".into()),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_player_key_in_room_is_nickname() {
        let cmd = Command::new(
            message("ooc@rooms.example.net/Kit", MessageKind::GroupChat),
            "deal 2",
            "2",
        );
        assert_eq!(cmd.player_key().as_deref(), Some("Kit"));
        assert_eq!(cmd.room(), Some(jid("ooc@rooms.example.net")));
        assert_eq!(cmd.private_target(), Some(jid("ooc@rooms.example.net/Kit")));
    }

    #[test]
    fn test_player_key_in_chat_is_bare_address() {
        let cmd = Command::new(message("kit@example.net/phone", MessageKind::Chat), "deal 2", "2");
        assert_eq!(cmd.player_key().as_deref(), Some("kit@example.net"));
        assert_eq!(cmd.room(), None);
    }

    #[test]
    fn test_context_join_and_leave_queue_presences() {
        let mut rooms = RoomManager::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let config = BotConfig::new(jid("tyche@example.net"), "pw");
        let router: Router<()> = Router::new();
        let mut ctx = Context::new(&mut rooms, &tx, &config, &router);

        ctx.join(&jid("ooc@rooms.example.net")).unwrap();
        let Ok(Stanza::Presence(join)) = rx.try_recv() else {
            panic!("expected a join presence");
        };
        assert_eq!(join.to, Some(jid("ooc@rooms.example.net/Tyche")));

        assert!(matches!(
            ctx.leave(&jid("ooc@rooms.example.net")),
            Err(RoomError::NotJoined(_))
        ));
        assert!(rx.try_recv().is_err());
        drop(ctx);

        rooms.handle_presence(&Presence {
            from: Some(jid("ooc@rooms.example.net/Tyche")),
            ..Presence::default()
        });
        let mut ctx = Context::new(&mut rooms, &tx, &config, &router);
        ctx.leave(&jid("ooc@rooms.example.net")).unwrap();
        let Ok(Stanza::Presence(leave)) = rx.try_recv() else {
            panic!("expected a leave presence");
        };
        assert_eq!(leave.kind, PresenceKind::Unavailable);
    }
}
