//! `Bot` builder and run loop.
//!
//! This is the entry point for running a Tyche bot. It ties together all
//! the layers: transport → protocol → conversations/rooms → application.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tyche_protocol::{Codec, Frame, JsonCodec, ProtocolError, Stanza};
use tyche_conversation::ConversationConfig;
use tyche_room::RoomConfig;
use tyche_tick::{TickConfig, TickScheduler};
use tyche_transport::{Connection, WebSocketConnection};

use crate::{BotConfig, BotCore, BotLogic, TycheError};

/// How long to wait for the server to answer the credentials.
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for configuring and connecting a bot.
///
/// # Example
///
/// ```rust,ignore
/// use tyche::prelude::*;
///
/// let bot = BotBuilder::new(BotConfig::new(jid, password))
///     .tick_config(TickConfig::default())
///     .connect("wss://chat.example.net/ws", MyLogic::default())
///     .await?;
/// bot.run_until_ctrl_c().await
/// ```
pub struct BotBuilder {
    config: BotConfig,
    conversation_config: ConversationConfig,
    room_config: RoomConfig,
    tick_config: TickConfig,
}

impl BotBuilder {
    /// Creates a builder with default layer settings.
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            conversation_config: ConversationConfig::default(),
            room_config: RoomConfig::default(),
            tick_config: TickConfig::default(),
        }
    }

    /// Sets the conversation configuration.
    pub fn conversation_config(mut self, config: ConversationConfig) -> Self {
        self.conversation_config = config;
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the tick configuration.
    pub fn tick_config(mut self, config: TickConfig) -> Self {
        self.tick_config = config;
        self
    }

    /// Connects to a WebSocket gateway speaking JSON frames and logs in.
    ///
    /// # Errors
    /// Fails with a transport error if the gateway can't be reached and
    /// with [`TycheError::AuthFailed`] if it refuses the credentials.
    pub async fn connect<L: BotLogic>(
        self,
        url: &str,
        logic: L,
    ) -> Result<Bot<WebSocketConnection, JsonCodec, L>, TycheError> {
        let conn = WebSocketConnection::connect(url).await?;
        self.with_connection(conn, JsonCodec, logic).await
    }

    /// Logs in over an already-open connection.
    pub async fn with_connection<C, K, L>(
        self,
        conn: C,
        codec: K,
        logic: L,
    ) -> Result<Bot<C, K, L>, TycheError>
    where
        C: Connection,
        K: Codec,
        L: BotLogic,
    {
        authenticate(&conn, &codec, &self.config).await?;

        let (core, outgoing) = BotCore::new(
            logic,
            self.config,
            self.conversation_config,
            self.room_config,
        )?;
        Ok(Bot {
            conn,
            codec,
            core,
            outgoing,
            tick: TickScheduler::new(self.tick_config),
        })
    }
}

/// Sends the credentials and waits for the verdict.
async fn authenticate<C: Connection, K: Codec>(
    conn: &C,
    codec: &K,
    config: &BotConfig,
) -> Result<(), TycheError> {
    let conn_id = conn.id();
    let auth = Frame::Auth {
        account: config.jid.to_string(),
        secret: config.password.clone(),
        resource: config.resource.clone(),
    };
    conn.send(&codec.encode(&auth)?).await?;

    let data = match tokio::time::timeout(AUTH_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(TycheError::AuthFailed(
                "connection closed before auth result".into(),
            ));
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(TycheError::AuthFailed("timed out".into())),
    };

    match codec.decode::<Frame>(&data)? {
        Frame::AuthResult { ok: true, .. } => {
            tracing::info!(%conn_id, account = %config.jid, "authenticated");
            Ok(())
        }
        Frame::AuthResult { ok: false, reason } => {
            let reason = reason.unwrap_or_else(|| "rejected".to_string());
            tracing::warn!(%conn_id, account = %config.jid, %reason, "authentication refused");
            Err(TycheError::AuthFailed(reason))
        }
        _ => Err(ProtocolError::InvalidMessage("expected AuthResult".into()).into()),
    }
}

/// A logged-in bot.
///
/// Call [`run()`](Self::run) to start serving.
pub struct Bot<C: Connection, K: Codec, L: BotLogic> {
    conn: C,
    codec: K,
    core: BotCore<L>,
    outgoing: mpsc::UnboundedReceiver<Stanza>,
    tick: TickScheduler,
}

impl<C, K, L> Bot<C, K, L>
where
    C: Connection,
    K: Codec,
    L: BotLogic,
{
    /// The state the bot is serving from.
    pub fn core(&self) -> &BotCore<L> {
        &self.core
    }

    /// Serves until `shutdown` completes or the server closes the
    /// connection.
    ///
    /// Inbound stanzas, idle ticks and outgoing stanzas are all handled on
    /// this one task; handlers run to completion before the next event is
    /// looked at. Stanzas queued when the loop stops are flushed before
    /// the connection is closed.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<(), TycheError> {
        let conn_id = self.conn.id();
        tracing::info!(%conn_id, "bot running");
        tokio::pin!(shutdown);

        self.core.on_connect();

        let result = loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    tracing::info!(%conn_id, "shutdown requested");
                    break Ok(());
                }

                Some(stanza) = self.outgoing.recv() => {
                    if let Err(e) = self.write(stanza).await {
                        break Err(e);
                    }
                }

                inbound = self.conn.recv() => match inbound {
                    Ok(Some(data)) => self.read(&data),
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed by server");
                        break Ok(());
                    }
                    Err(e) => {
                        tracing::warn!(%conn_id, error = %e, "receive failed");
                        break Err(e.into());
                    }
                },

                info = self.tick.wait_for_tick() => self.core.on_tick(&info),
            }
        };

        while let Ok(stanza) = self.outgoing.try_recv() {
            if let Err(e) = self.write(stanza).await {
                tracing::debug!(%conn_id, error = %e, "stanza lost at shutdown");
                break;
            }
        }
        if let Err(e) = self.conn.close().await {
            tracing::debug!(%conn_id, error = %e, "close failed");
        }
        result
    }

    /// Serves until Ctrl-C.
    pub async fn run_until_ctrl_c(self) -> Result<(), TycheError> {
        self.run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "can't listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    fn read(&mut self, data: &[u8]) {
        match self.codec.decode::<Frame>(data) {
            Ok(Frame::Stanza(stanza)) => self.core.handle_stanza(stanza),
            Ok(_) => tracing::debug!("non-stanza frame ignored"),
            Err(e) => tracing::debug!(error = %e, "failed to decode frame"),
        }
    }

    async fn write(&self, stanza: Stanza) -> Result<(), TycheError> {
        let bytes = self.codec.encode(&Frame::Stanza(stanza))?;
        self.conn.send(&bytes).await?;
        Ok(())
    }
}
