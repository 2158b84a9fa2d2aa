//! Stanzas and the frames that carry them.
//!
//! A [`Stanza`] is one unit of chat traffic: a [`Message`] or a
//! [`Presence`]. On the wire every stanza travels inside a [`Frame`],
//! which also carries the authentication exchange that opens a session
//! with the chat gateway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Jid;

/// Namespace of the `<x/>` child a room attaches to mediated invites.
pub const NS_MUC_USER: &str = "http://jabber.org/protocol/muc#user";

/// Namespace of a direct room invitation.
pub const NS_CONFERENCE: &str = "jabber:x:conference";

/// Presence error code signalling a nickname collision in a room.
pub const CONFLICT_CODE: u16 = 409;

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// The transport-level type of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A standalone message with no conversation semantics.
    #[default]
    Normal,
    /// A one-to-one chat message.
    Chat,
    /// A message to or from a multi-user room.
    GroupChat,
    /// A broadcast alert.
    Headline,
    /// A bounced message.
    Error,
}

/// A structured child element attached to a stanza.
///
/// Only enough of the element is kept to recognise extensions by
/// namespace and read their attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    /// Element name, e.g. `"x"`.
    pub name: String,
    /// XML namespace, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Attributes other than the namespace declaration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl Element {
    /// Builds a direct room invitation for `room`.
    pub fn conference_invite(room: &Jid) -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert("jid".to_string(), room.to_string());
        Self {
            name: "x".to_string(),
            namespace: Some(NS_CONFERENCE.to_string()),
            attrs,
        }
    }

    /// Returns `true` if this element is declared in `ns`.
    pub fn is_in(&self, ns: &str) -> bool {
        self.namespace.as_deref() == Some(ns)
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender. Filled in by the server on inbound traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Jid>,
    /// Recipient.
    pub to: Jid,
    /// Transport-level type.
    #[serde(default)]
    pub kind: MessageKind,
    /// Text body. Absent for chat-state notifications and invites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Extension elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Message {
    /// Builds an outbound message with a body.
    pub fn new(to: Jid, kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            from: None,
            to,
            kind,
            body: Some(body.into()),
            children: Vec::new(),
        }
    }

    /// Builds a one-to-one chat message.
    pub fn chat(to: Jid, body: impl Into<String>) -> Self {
        Self::new(to, MessageKind::Chat, body)
    }

    /// Builds a direct invitation to `room`, addressed to `to`.
    pub fn invite(to: Jid, room: &Jid) -> Self {
        Self {
            from: None,
            to,
            kind: MessageKind::Normal,
            body: None,
            children: vec![Element::conference_invite(room)],
        }
    }

    /// If this message is a room invitation, returns the room it invites
    /// to.
    ///
    /// A direct invitation names the room in its `jid` attribute; a
    /// mediated one arrives from the room itself.
    pub fn invite_room(&self) -> Option<Jid> {
        for child in &self.children {
            if child.is_in(NS_CONFERENCE) {
                if let Some(room) =
                    child.attrs.get("jid").and_then(|j| j.parse::<Jid>().ok())
                {
                    return Some(room.bare());
                }
                return self.from.as_ref().map(Jid::bare);
            }
            if child.is_in(NS_MUC_USER) {
                return self.from.as_ref().map(Jid::bare);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// The type of a presence stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceKind {
    /// Online (the type attribute is absent on the wire).
    #[default]
    Available,
    /// Going offline, or leaving a room.
    Unavailable,
    /// Asking to see the recipient's presence.
    Subscribe,
    /// Granting a subscription.
    Subscribed,
    /// Withdrawing a subscription request.
    Unsubscribe,
    /// Revoking a subscription.
    Unsubscribed,
    /// Asking the server for current presence.
    Probe,
    /// An error bounced back, e.g. a nickname conflict.
    Error,
}

/// A presence stanza: availability, subscription, or room membership.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presence {
    /// Sender. Filled in by the server on inbound traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Jid>,
    /// Recipient. Absent for broadcast presence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Jid>,
    /// Presence type.
    #[serde(default)]
    pub kind: PresenceKind,
    /// Human-readable status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error code for `kind == Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl Presence {
    /// A broadcast "I'm available" presence.
    pub fn available() -> Self {
        Self::default()
    }

    /// A presence of `kind` addressed to `to`.
    pub fn to(to: Jid, kind: PresenceKind) -> Self {
        Self {
            to: Some(to),
            kind,
            ..Self::default()
        }
    }

    /// Returns `true` if this is a nickname-conflict error.
    pub fn is_conflict(&self) -> bool {
        self.kind == PresenceKind::Error && self.error_code == Some(CONFLICT_CODE)
    }
}

// ---------------------------------------------------------------------------
// Stanza and Frame
// ---------------------------------------------------------------------------

/// One unit of chat traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stanza", rename_all = "lowercase")]
pub enum Stanza {
    /// A message.
    Message(Message),
    /// A presence.
    Presence(Presence),
}

impl From<Message> for Stanza {
    fn from(msg: Message) -> Self {
        Self::Message(msg)
    }
}

impl From<Presence> for Stanza {
    fn from(presence: Presence) -> Self {
        Self::Presence(presence)
    }
}

/// The top-level wire unit exchanged with the chat gateway.
///
/// ```text
/// bot → gateway   Auth { account, secret, resource }
/// gateway → bot   AuthResult { ok, reason }
/// both ways       Stanza(...)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Frame {
    /// Opens the session.
    Auth {
        /// Bare account address.
        account: String,
        /// Account password.
        secret: String,
        /// Resource to bind.
        resource: String,
    },
    /// Answers [`Frame::Auth`].
    AuthResult {
        /// Whether the credentials were accepted.
        ok: bool,
        /// Why not, if rejected.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Chat traffic.
    Stanza(Stanza),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jid(s: &str) -> Jid {
        s.parse().unwrap()
    }

    #[test]
    fn test_message_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MessageKind::GroupChat).unwrap();
        assert_eq!(json, r#""groupchat""#);
    }

    #[test]
    fn test_muc_user_invite_comes_from_room() {
        let msg = Message {
            from: Some(jid("ooc@rooms.example.net")),
            to: jid("tyche@example.net"),
            kind: MessageKind::Normal,
            body: None,
            children: vec![Element {
                name: "x".into(),
                namespace: Some(NS_MUC_USER.into()),
                attrs: BTreeMap::new(),
            }],
        };
        assert_eq!(msg.invite_room(), Some(jid("ooc@rooms.example.net")));
    }

    #[test]
    fn test_conference_invite_names_room_in_attribute() {
        let mut msg = Message::invite(jid("tyche@example.net"), &jid("game@rooms.example.net"));
        msg.from = Some(jid("kit@example.net/home"));
        assert_eq!(msg.invite_room(), Some(jid("game@rooms.example.net")));
    }

    #[test]
    fn test_plain_message_is_not_an_invite() {
        let msg = Message::chat(jid("kit@example.net"), "roll 3d6");
        assert_eq!(msg.invite_room(), None);
    }

    #[test]
    fn test_conflict_detection() {
        let mut p = Presence::to(jid("ooc@rooms.example.net/Tyche"), PresenceKind::Error);
        assert!(!p.is_conflict());
        p.error_code = Some(CONFLICT_CODE);
        assert!(p.is_conflict());
        p.kind = PresenceKind::Available;
        assert!(!p.is_conflict());
    }

    #[test]
    fn test_frame_json_shape() {
        let frame = Frame::Stanza(Stanza::Message(Message::chat(
            jid("kit@example.net"),
            "hi",
        )));
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "Stanza");
        assert_eq!(value["data"]["stanza"], "message");
        assert_eq!(value["data"]["to"], "kit@example.net");
        assert_eq!(value["data"]["kind"], "chat");
        assert_eq!(value["data"]["body"], "hi");
    }

    #[test]
    fn test_inbound_presence_defaults() {
        let json = r#"{"type":"Stanza","data":{"stanza":"presence","from":"ooc@rooms.example.net/Tyche"}}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        let Frame::Stanza(Stanza::Presence(p)) = frame else {
            panic!("expected presence");
        };
        assert_eq!(p.kind, PresenceKind::Available);
        assert_eq!(p.to, None);
    }
}
