//! Integration tests for the join/leave protocol.

use proptest::prelude::*;
use tyche_protocol::{Jid, Presence, PresenceKind};
use tyche_room::{JoinOutcome, JoinState, RoomConfig, RoomManager};

fn jid(s: &str) -> Jid {
    s.parse().unwrap()
}

fn conflict(room: &str, nickname: &str) -> Presence {
    Presence {
        from: Some(jid(room).with_resource(nickname)),
        kind: PresenceKind::Error,
        error_code: Some(409),
        ..Presence::default()
    }
}

fn welcome(room: &str, nickname: &str) -> Presence {
    Presence {
        from: Some(jid(room).with_resource(nickname)),
        ..Presence::default()
    }
}

/// Runs a full join against a room that reports `collisions` conflicts
/// before accepting, and returns the assigned nickname.
fn join_through_collisions(mgr: &mut RoomManager, room: &str, nickname: &str, collisions: usize) -> String {
    let mut sent = mgr.request_join(&jid(room), nickname).expect("join should start");
    for _ in 0..collisions {
        let requested = sent.to.as_ref().and_then(|to| to.resource()).unwrap().to_string();
        match mgr.handle_presence(&conflict(room, &requested)) {
            JoinOutcome::Retry(next) => sent = next,
            other => panic!("expected retry, got {other:?}"),
        }
    }
    let requested = sent.to.as_ref().and_then(|to| to.resource()).unwrap().to_string();
    match mgr.handle_presence(&welcome(room, &requested)) {
        JoinOutcome::Joined { nickname, .. } => nickname,
        other => panic!("expected joined, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn test_n_conflicts_append_n_suffixes(collisions in 0usize..12) {
        let mut mgr = RoomManager::default();
        let nickname = join_through_collisions(&mut mgr, "ooc@rooms.example.net", "Tyche", collisions);
        prop_assert_eq!(nickname, format!("Tyche{}", "_".repeat(collisions)));
    }
}

#[test]
fn test_custom_suffix() {
    let mut mgr = RoomManager::new(RoomConfig {
        collision_suffix: '~',
        ..RoomConfig::default()
    });
    let nickname = join_through_collisions(&mut mgr, "ooc@rooms.example.net", "Tyche", 2);
    assert_eq!(nickname, "Tyche~~");
}

#[test]
fn test_joins_in_two_rooms_progress_independently() {
    let mut mgr = RoomManager::default();
    mgr.request_join(&jid("a@rooms.example.net"), "Tyche").unwrap();
    mgr.request_join(&jid("b@rooms.example.net"), "Tyche").unwrap();

    // Room b answers first, with a conflict; room a is unaffected.
    assert!(matches!(
        mgr.handle_presence(&conflict("b@rooms.example.net", "Tyche")),
        JoinOutcome::Retry(_)
    ));
    assert_eq!(
        mgr.state(&jid("a@rooms.example.net")),
        JoinState::AwaitingResponse { nickname: "Tyche".into() }
    );

    mgr.handle_presence(&welcome("a@rooms.example.net", "Tyche"));
    mgr.handle_presence(&welcome("b@rooms.example.net", "Tyche_"));

    assert_eq!(mgr.nickname(&jid("a@rooms.example.net")), Some("Tyche"));
    assert_eq!(mgr.nickname(&jid("b@rooms.example.net")), Some("Tyche_"));
}

#[test]
fn test_rejoin_after_leave() {
    let mut mgr = RoomManager::default();
    join_through_collisions(&mut mgr, "ooc@rooms.example.net", "Tyche", 1);
    mgr.leave(&jid("ooc@rooms.example.net")).unwrap();

    let nickname = join_through_collisions(&mut mgr, "ooc@rooms.example.net", "Tyche", 0);
    assert_eq!(nickname, "Tyche");
}

#[test]
fn test_presence_after_join_is_not_pending() {
    let mut mgr = RoomManager::default();
    join_through_collisions(&mut mgr, "ooc@rooms.example.net", "Tyche", 0);
    assert_eq!(
        mgr.handle_presence(&welcome("ooc@rooms.example.net", "Kit")),
        JoinOutcome::NotPending
    );
}
