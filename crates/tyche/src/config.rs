//! Account settings for a bot.

use tyche_protocol::Jid;

/// Who the bot logs in as, and what it calls itself in rooms.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bare account address.
    pub jid: Jid,
    pub password: String,
    /// Resource bound at login.
    pub resource: String,
    /// Nickname requested when joining rooms. Defaults to the resource.
    pub nickname: String,
}

impl BotConfig {
    pub const DEFAULT_RESOURCE: &'static str = "Tyche";

    /// Config for `jid` with the default resource and nickname.
    pub fn new(jid: Jid, password: impl Into<String>) -> Self {
        Self {
            jid: jid.bare(),
            password: password.into(),
            resource: Self::DEFAULT_RESOURCE.to_string(),
            nickname: Self::DEFAULT_RESOURCE.to_string(),
        }
    }

    /// Sets the resource and, with it, the nickname.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self.nickname = self.resource.clone();
        self
    }

    /// Overrides the room nickname only.
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// The full address the bot speaks from.
    pub fn full_jid(&self) -> Jid {
        self.jid.with_resource(&self.resource)
    }
}
