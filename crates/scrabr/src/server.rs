//! `ScrabrServer` builder and accept loop.
//!
//! Ties the layers together: WebSocket → protocol → room manager → room
//! actors.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use scrabr_protocol::{Codec, JsonCodec, PlayerId};
use scrabr_room::{RoomConfig, RoomManager, SharedRooms};
use scrabr_rules::DictionaryOracle;
use tokio::net::TcpListener;

use crate::ScrabrError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<D: DictionaryOracle, C: Codec> {
    pub(crate) rooms: SharedRooms<D>,
    pub(crate) codec: C,
    /// Reference point for envelope timestamps.
    pub(crate) started: Instant,
    next_player: AtomicU64,
}

impl<D: DictionaryOracle, C: Codec> ServerState<D, C> {
    /// Hands out the id for a new connection. Ids are never reused while
    /// the process lives.
    pub(crate) fn next_player_id(&self) -> PlayerId {
        PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed))
    }

    /// Milliseconds since the server started.
    pub(crate) fn timestamp(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Builder for configuring and starting a Scrabr server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ScrabrServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig { max_players: 4, ..RoomConfig::default() })
///     .build(WordList::load("words.txt")?)
///     .await?;
/// server.run().await
/// ```
pub struct ScrabrServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl ScrabrServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets player limits and channel sizing for every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server around `oracle`.
    ///
    /// Frames are encoded with [`JsonCodec`].
    pub async fn build<D: DictionaryOracle>(
        self,
        oracle: D,
    ) -> Result<ScrabrServer<D, JsonCodec>, ScrabrError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening for WebSocket connections");

        let state = Arc::new(ServerState {
            rooms: SharedRooms::new(RoomManager::new(Arc::new(oracle), self.room_config)),
            codec: JsonCodec,
            started: Instant::now(),
            next_player: AtomicU64::new(1),
        });

        Ok(ScrabrServer { listener, state })
    }
}

impl Default for ScrabrServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Scrabr server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrabrServer<D: DictionaryOracle, C: Codec> {
    listener: TcpListener,
    state: Arc<ServerState<D, C>>,
}

impl<D, C> ScrabrServer<D, C>
where
    D: DictionaryOracle,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each TCP connection is upgraded to a WebSocket and handed to its own
    /// handler task.
    pub async fn run(self) -> Result<(), ScrabrError> {
        tracing::info!("scrabr server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let ws = match tokio_tungstenite::accept_async(stream).await {
                            Ok(ws) => ws,
                            Err(e) => {
                                tracing::debug!(%addr, error = %e, "websocket upgrade failed");
                                return;
                            }
                        };
                        tracing::debug!(%addr, "accepted WebSocket connection");
                        if let Err(e) = handle_connection(ws, state).await {
                            tracing::debug!(%addr, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
