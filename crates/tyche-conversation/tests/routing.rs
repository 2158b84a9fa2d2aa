//! Integration tests for conversation routing through the public API.

use tyche_conversation::{ConversationConfig, ConversationKind, ConversationRegistry};
use tyche_protocol::{Jid, Message, MessageKind, Stanza};

fn jid(s: &str) -> Jid {
    s.parse().unwrap()
}

fn inbound(from: &str, kind: MessageKind, body: &str) -> Message {
    Message {
        from: Some(jid(from)),
        to: jid("tyche@example.net/Tyche"),
        kind,
        body: Some(body.into()),
        children: Vec::new(),
    }
}

/// Delivers `msg` to its sender's conversation, echoing the body.
fn echo(reg: &mut ConversationRegistry, msg: &Message) -> bool {
    let from = msg.from.clone().unwrap();
    reg.get_or_create(&from, ConversationKind::for_message(msg))
        .deliver(msg, |m| m.body.clone())
        .unwrap()
}

#[test]
fn test_room_occupants_share_the_room_conversation() {
    let (mut reg, mut rx) = ConversationRegistry::new(ConversationConfig::default());

    echo(&mut reg, &inbound("ooc@rooms.example.net/Kit", MessageKind::GroupChat, "a"));
    echo(&mut reg, &inbound("ooc@rooms.example.net/Ash", MessageKind::GroupChat, "b"));

    assert_eq!(reg.len(), 1);
    let convo = reg.get(&jid("ooc@rooms.example.net")).unwrap();
    assert_eq!(convo.kind(), ConversationKind::Group);
    assert_eq!(convo.delivered(), 2);

    for expected in ["a", "b"] {
        let Ok(Stanza::Message(reply)) = rx.try_recv() else {
            panic!("expected a reply");
        };
        assert_eq!(reply.to, jid("ooc@rooms.example.net"));
        assert_eq!(reply.body.as_deref(), Some(expected));
    }
}

#[test]
fn test_replies_keep_arrival_order_across_conversations() {
    let (mut reg, mut rx) = ConversationRegistry::new(ConversationConfig::default());

    echo(&mut reg, &inbound("kit@example.net/laptop", MessageKind::Chat, "1"));
    echo(&mut reg, &inbound("ooc@rooms.example.net/Ash", MessageKind::GroupChat, "2"));
    echo(&mut reg, &inbound("kit@example.net/laptop", MessageKind::Chat, "3"));

    let bodies: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|s| match s {
            Stanza::Message(m) => m.body.unwrap_or_default(),
            Stanza::Presence(_) => panic!("unexpected presence"),
        })
        .collect();
    assert_eq!(bodies, vec!["1", "2", "3"]);
    assert_eq!(reg.len(), 2);
}

#[test]
fn test_sender_without_address_gets_no_reply() {
    let (mut reg, mut rx) = ConversationRegistry::new(ConversationConfig::default());
    let mut msg = inbound("kit@example.net/laptop", MessageKind::Chat, "hi");
    let convo = reg.get_or_create(&jid("kit@example.net"), ConversationKind::Direct);
    msg.from = None;

    let sent = convo.deliver(&msg, |_| Some("hello".into())).unwrap();
    assert!(!sent);
    assert!(rx.try_recv().is_err());
}
