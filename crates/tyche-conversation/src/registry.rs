//! The conversation registry: one [`Conversation`] per counterpart.
//!
//! Like the rest of the bot's state, the registry is owned by the single
//! task running the event loop and mutated in place, so it needs no
//! locking.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tyche_protocol::{Jid, Stanza};

use crate::{Conversation, ConversationConfig, ConversationError, ConversationKind};

/// Tracks every conversation the bot is having.
///
/// ## Lifecycle
///
/// ```text
/// first inbound event ──→ get_or_create() ──→ deliver() ...
///                                                │
///                          (idle_timeout set)    ▼
///                                          evict_idle() ──→ gone
/// ```
///
/// Lookups are keyed by the bare address of the counterpart, so a user
/// writing from two devices shares one conversation, and all occupants of
/// a room share the room's.
pub struct ConversationRegistry {
    conversations: HashMap<Jid, Conversation>,
    outgoing: mpsc::UnboundedSender<Stanza>,
    config: ConversationConfig,
}

impl ConversationRegistry {
    /// Creates an empty registry and the receiving end of the outgoing
    /// channel every conversation will reply on.
    pub fn new(config: ConversationConfig) -> (Self, mpsc::UnboundedReceiver<Stanza>) {
        let (outgoing, rx) = mpsc::unbounded_channel();
        let registry = Self {
            conversations: HashMap::new(),
            outgoing,
            config,
        };
        (registry, rx)
    }

    /// Returns the conversation for `identity`, creating it if needed.
    ///
    /// Idempotent: calling it twice for the same bare address returns the
    /// same conversation. `kind` only applies on creation.
    pub fn get_or_create(&mut self, identity: &Jid, kind: ConversationKind) -> &mut Conversation {
        let key = identity.bare();
        let outgoing = &self.outgoing;
        self.conversations.entry(key).or_insert_with_key(|key| {
            tracing::debug!(identity = %key, %kind, "conversation created");
            Conversation::new(key.clone(), kind, outgoing.clone())
        })
    }

    /// Looks up a conversation without creating one.
    pub fn get(&self, identity: &Jid) -> Option<&Conversation> {
        self.conversations.get(&identity.bare())
    }

    /// Removes a conversation.
    ///
    /// # Errors
    /// Returns [`ConversationError::NotFound`] if there is none for
    /// `identity`.
    pub fn remove(&mut self, identity: &Jid) -> Result<Conversation, ConversationError> {
        let key = identity.bare();
        self.conversations
            .remove(&key)
            .ok_or(ConversationError::NotFound(key))
    }

    /// Drops every conversation that has been idle for longer than the
    /// configured timeout and returns their identities.
    ///
    /// Does nothing when no timeout is configured.
    pub fn evict_idle(&mut self) -> Vec<Jid> {
        let Some(timeout) = self.config.idle_timeout else {
            return Vec::new();
        };

        let mut evicted = Vec::new();
        self.conversations.retain(|identity, convo| {
            if convo.idle_for() >= timeout {
                tracing::debug!(%identity, "conversation evicted (idle)");
                evicted.push(identity.clone());
                false
            } else {
                true
            }
        });
        evicted
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Returns `true` if there are no conversations.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// A sender for stanzas that don't belong to any conversation
    /// (join requests, invites, keep-alives).
    pub fn outgoing(&self) -> mpsc::UnboundedSender<Stanza> {
        self.outgoing.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn jid(s: &str) -> Jid {
        s.parse().unwrap()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig::default());

        reg.get_or_create(&jid("kit@example.net/laptop"), ConversationKind::Direct);
        reg.get_or_create(&jid("kit@example.net/phone"), ConversationKind::Direct);

        assert_eq!(reg.len(), 1);
        let convo = reg.get(&jid("kit@example.net")).expect("should exist");
        assert_eq!(convo.identity(), &jid("kit@example.net"));
    }

    #[test]
    fn test_kind_fixed_at_creation() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig::default());
        reg.get_or_create(&jid("kit@example.net"), ConversationKind::Presence);
        let convo = reg.get_or_create(&jid("kit@example.net"), ConversationKind::Direct);
        assert_eq!(convo.kind(), ConversationKind::Presence);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig::default());
        let result = reg.remove(&jid("nobody@example.net"));
        assert!(matches!(result, Err(ConversationError::NotFound(_))));
    }

    #[test]
    fn test_remove_existing() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig::default());
        reg.get_or_create(&jid("ooc@rooms.example.net"), ConversationKind::Group);
        let removed = reg.remove(&jid("ooc@rooms.example.net/Kit")).unwrap();
        assert_eq!(removed.kind(), ConversationKind::Group);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_evict_idle_without_timeout_keeps_everything() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig::default());
        reg.get_or_create(&jid("a@example.net"), ConversationKind::Direct);
        reg.get_or_create(&jid("b@example.net"), ConversationKind::Direct);

        assert!(reg.evict_idle().is_empty());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_evict_idle_zero_timeout_drops_all() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig {
            idle_timeout: Some(Duration::ZERO),
        });
        reg.get_or_create(&jid("a@example.net"), ConversationKind::Direct);
        reg.get_or_create(&jid("b@example.net"), ConversationKind::Direct);

        let mut evicted = reg.evict_idle();
        evicted.sort();
        assert_eq!(evicted, vec![jid("a@example.net"), jid("b@example.net")]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_evict_idle_long_timeout_keeps_fresh() {
        let (mut reg, _rx) = ConversationRegistry::new(ConversationConfig {
            idle_timeout: Some(Duration::from_secs(3600)),
        });
        reg.get_or_create(&jid("a@example.net"), ConversationKind::Direct);
        assert!(reg.evict_idle().is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_all_conversations_share_outgoing_channel() {
        let (mut reg, mut rx) = ConversationRegistry::new(ConversationConfig::default());
        reg.get_or_create(&jid("a@example.net"), ConversationKind::Direct)
            .send(tyche_protocol::Presence::available())
            .unwrap();
        reg.get_or_create(&jid("b@example.net"), ConversationKind::Direct)
            .send(tyche_protocol::Presence::available())
            .unwrap();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }
}
