//! Room manager: drives joins, records memberships, builds leave presences.

use std::collections::HashMap;

use tyche_protocol::{Jid, Presence, PresenceKind};

use crate::{JoinState, RoomConfig, RoomError};

/// What an inbound presence meant to the join protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No join is pending for the presence's room; the caller should
    /// handle it some other way.
    NotPending,

    /// The nickname collided. Send this presence to try again.
    Retry(Presence),

    /// The room let the bot in.
    Joined { room: Jid, nickname: String },
}

/// Tracks the bot's standing in every room it has tried to join.
///
/// Owned by the event-loop task; nothing here blocks or locks. A join is
/// a suspended exchange held as a [`JoinState::AwaitingResponse`] value,
/// resumed by [`handle_presence`](RoomManager::handle_presence) when the
/// room answers.
pub struct RoomManager {
    /// Keyed by bare room address. Rooms absent from the map are idle.
    rooms: HashMap<Jid, JoinState>,
    config: RoomConfig,
}

impl RoomManager {
    /// Creates a manager with no rooms.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Starts joining `room` as `nickname` and returns the presence to
    /// send.
    ///
    /// # Errors
    /// - [`RoomError::InvalidRoom`] if `room` has no node part
    /// - [`RoomError::AlreadyJoined`] if the bot is already in the room
    /// - [`RoomError::AlreadyJoining`] if a request is outstanding
    pub fn request_join(&mut self, room: &Jid, nickname: &str) -> Result<Presence, RoomError> {
        let room = room.bare();
        if room.node().is_none() {
            return Err(RoomError::InvalidRoom(room));
        }

        match self.rooms.get(&room) {
            Some(JoinState::Joined { .. }) => return Err(RoomError::AlreadyJoined(room)),
            Some(JoinState::AwaitingResponse { .. }) => {
                return Err(RoomError::AlreadyJoining(room));
            }
            Some(JoinState::Idle) | None => {}
        }

        tracing::info!(%room, nickname, "requesting room join");
        let presence = join_presence(&room, nickname);
        self.rooms.insert(
            room,
            JoinState::AwaitingResponse {
                nickname: nickname.to_string(),
            },
        );
        Ok(presence)
    }

    /// Feeds an inbound presence to the join protocol.
    ///
    /// For a room with a pending join, a conflict error grows the
    /// nickname by the collision suffix and yields a retry; any other
    /// presence from that room completes the join.
    pub fn handle_presence(&mut self, presence: &Presence) -> JoinOutcome {
        let Some(from) = &presence.from else {
            return JoinOutcome::NotPending;
        };
        let room = from.bare();

        let Some(state) = self.rooms.get_mut(&room) else {
            return JoinOutcome::NotPending;
        };
        let JoinState::AwaitingResponse { nickname } = state else {
            return JoinOutcome::NotPending;
        };

        if presence.is_conflict() {
            nickname.push(self.config.collision_suffix);
            tracing::info!(%room, nickname = %nickname, "nickname taken, retrying");
            return JoinOutcome::Retry(join_presence(&room, nickname));
        }

        let nickname = std::mem::take(nickname);
        *state = JoinState::Joined {
            nickname: nickname.clone(),
        };
        tracing::info!(%room, nickname, "joined room");
        JoinOutcome::Joined { room, nickname }
    }

    /// Leaves `room` and returns the unavailable presence to send.
    ///
    /// # Errors
    /// Returns [`RoomError::NotJoined`] if the bot has no membership in
    /// the room (including while a join is still pending).
    pub fn leave(&mut self, room: &Jid) -> Result<Presence, RoomError> {
        let room = room.bare();
        let nickname = match self.rooms.get(&room) {
            Some(JoinState::Joined { nickname }) => nickname.clone(),
            _ => return Err(RoomError::NotJoined(room)),
        };
        self.rooms.remove(&room);

        tracing::info!(%room, nickname, "leaving room");
        Ok(Presence {
            status: Some(self.config.farewell.clone()),
            ..Presence::to(room.with_resource(&nickname), PresenceKind::Unavailable)
        })
    }

    /// Current state for `room`.
    pub fn state(&self, room: &Jid) -> JoinState {
        self.rooms.get(&room.bare()).cloned().unwrap_or_default()
    }

    /// The nickname the bot was assigned in `room`, once joined.
    pub fn nickname(&self, room: &Jid) -> Option<&str> {
        match self.rooms.get(&room.bare()) {
            Some(JoinState::Joined { nickname }) => Some(nickname),
            _ => None,
        }
    }

    /// Returns `true` while a join for `room` is waiting on the server.
    pub fn is_pending(&self, room: &Jid) -> bool {
        self.rooms
            .get(&room.bare())
            .is_some_and(JoinState::is_pending)
    }

    /// Returns `true` if `from` is the bot itself speaking in a room it
    /// has joined, i.e. the occupant resource equals the bot's assigned
    /// nickname there.
    pub fn is_own_echo(&self, from: &Jid) -> bool {
        match (from.resource(), self.nickname(from)) {
            (Some(resource), Some(nickname)) => resource == nickname,
            _ => false,
        }
    }

    /// Every joined room with its assigned nickname, sorted by room.
    pub fn joined_rooms(&self) -> Vec<(&Jid, &str)> {
        let mut joined: Vec<_> = self
            .rooms
            .iter()
            .filter_map(|(room, state)| match state {
                JoinState::Joined { nickname } => Some((room, nickname.as_str())),
                _ => None,
            })
            .collect();
        joined.sort();
        joined
    }

    /// The configuration in use.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

fn join_presence(room: &Jid, nickname: &str) -> Presence {
    Presence::to(room.with_resource(nickname), PresenceKind::Available)
}
