//! A single ongoing exchange with one user or one room.

use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tyche_protocol::{Jid, Message, MessageKind, Presence, Stanza};

use crate::ConversationError;

// ---------------------------------------------------------------------------
// ConversationConfig
// ---------------------------------------------------------------------------

/// Configuration for the conversation registry.
#[derive(Debug, Clone, Default)]
pub struct ConversationConfig {
    /// Evict conversations that have been quiet for this long.
    ///
    /// Default: `None`, which keeps every conversation for the life of
    /// the process. The registry then grows by one entry per distinct
    /// counterpart ever seen; long-running bots on busy servers should
    /// set a timeout.
    pub idle_timeout: Option<Duration>,
}

// ---------------------------------------------------------------------------
// ConversationKind
// ---------------------------------------------------------------------------

/// What sort of counterpart a conversation is with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    /// One-to-one with a single user.
    Direct,
    /// A multi-user room.
    Group,
    /// Presence traffic only (subscription requests).
    Presence,
}

impl ConversationKind {
    /// Picks the kind for an inbound message.
    pub fn for_message(msg: &Message) -> Self {
        match msg.kind {
            MessageKind::GroupChat => Self::Group,
            _ => Self::Direct,
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Group => write!(f, "group"),
            Self::Presence => write!(f, "presence"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One counterpart's conversation with the bot.
///
/// Inbound events are delivered one at a time through [`deliver`] and
/// [`deliver_presence`]; the caller supplies the reaction, and whatever
/// it produces goes out on this conversation's outgoing channel.
///
/// [`deliver`]: Conversation::deliver
/// [`deliver_presence`]: Conversation::deliver_presence
#[derive(Debug)]
pub struct Conversation {
    identity: Jid,
    kind: ConversationKind,
    outgoing: mpsc::UnboundedSender<Stanza>,
    created: Instant,
    last_active: Instant,
    delivered: u64,
}

impl Conversation {
    pub(crate) fn new(
        identity: Jid,
        kind: ConversationKind,
        outgoing: mpsc::UnboundedSender<Stanza>,
    ) -> Self {
        let now = Instant::now();
        Self {
            identity,
            kind,
            outgoing,
            created: now,
            last_active: now,
            delivered: 0,
        }
    }

    /// The bare address this conversation is keyed by.
    pub fn identity(&self) -> &Jid {
        &self.identity
    }

    /// Direct, group, or presence.
    pub fn kind(&self) -> ConversationKind {
        self.kind
    }

    /// How many inbound events have been delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// How long since the conversation was created.
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }

    /// How long since the last inbound event.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    /// Delivers an inbound message and sends back whatever `react`
    /// returns.
    ///
    /// Groupchat replies go to the bare room with type groupchat;
    /// anything else is answered privately, as chat, to the sender's full
    /// address. Returns `true` if a reply was sent.
    pub fn deliver<F>(&mut self, msg: &Message, react: F) -> Result<bool, ConversationError>
    where
        F: FnOnce(&Message) -> Option<String>,
    {
        self.touch();

        let Some(text) = react(msg) else {
            return Ok(false);
        };
        let Some(reply) = reply_to(msg, text) else {
            tracing::debug!(identity = %self.identity, "reply dropped, message had no sender");
            return Ok(false);
        };
        self.send(reply)?;
        Ok(true)
    }

    /// Delivers an inbound presence and sends every stanza `react`
    /// returns, in order.
    pub fn deliver_presence<F>(
        &mut self,
        presence: &Presence,
        react: F,
    ) -> Result<usize, ConversationError>
    where
        F: FnOnce(&Presence) -> Vec<Stanza>,
    {
        self.touch();
        let out = react(presence);
        let count = out.len();
        for stanza in out {
            self.send(stanza)?;
        }
        Ok(count)
    }

    /// Queues a stanza on the outgoing channel.
    pub fn send(&self, stanza: impl Into<Stanza>) -> Result<(), ConversationError> {
        self.outgoing
            .send(stanza.into())
            .map_err(|_| ConversationError::ChannelClosed(self.identity.clone()))
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
        self.delivered += 1;
    }
}

/// Builds the reply to `msg` carrying `text`.
fn reply_to(msg: &Message, text: String) -> Option<Message> {
    let from = msg.from.as_ref()?;
    Some(match msg.kind {
        MessageKind::GroupChat => Message::new(from.bare(), MessageKind::GroupChat, text),
        _ => Message::chat(from.clone(), text),
    })
}
