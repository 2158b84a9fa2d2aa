//! Error types for the conversation layer.

use tyche_protocol::Jid;

/// Errors that can occur while tracking conversations.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    /// No conversation exists for the given identity.
    #[error("no conversation with {0}")]
    NotFound(Jid),

    /// The receiving end of the outgoing channel is gone, which means
    /// the bot's run loop has stopped.
    #[error("outgoing channel closed while replying to {0}")]
    ChannelClosed(Jid),
}
