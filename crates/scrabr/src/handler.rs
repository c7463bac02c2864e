//! Per-connection handler: outbound pump and request routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Assign a `PlayerId` and spawn the writer, which drains the player's
//!      event channel into the socket
//!   2. Loop: decode client envelopes and route them to the room manager or
//!      to the player's room actor
//!   3. On close, take the player out of their room

use std::fmt::Display;
use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use scrabr_protocol::{
    ClientEvent, Codec, Envelope, PlacedTile, PlayerId, RoomCode, ServerEvent,
    placements_from_wire,
};
use scrabr_room::{PlayerSender, RoomError, RoomHandle};
use scrabr_rules::{DictionaryOracle, Placement, Variant};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::ScrabrError;
use crate::server::ServerState;

type WsStream = WebSocketStream<TcpStream>;

/// Drop guard that takes a player out of their room when the handler exits.
///
/// `Drop` is synchronous, so the leave runs in a fire-and-forget task.
struct SeatGuard<D: DictionaryOracle, C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<D, C>>,
}

impl<D: DictionaryOracle, C: Codec> Drop for SeatGuard<D, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            match state.rooms.leave_room(player_id).await {
                Ok(()) | Err(RoomError::NotSeated(_)) => {}
                Err(e) => tracing::debug!(%player_id, error = %e, "leave on disconnect failed"),
            }
        });
    }
}

/// Handles a single connection from upgrade to close.
pub(crate) async fn handle_connection<D, C>(
    ws: WsStream,
    state: Arc<ServerState<D, C>>,
) -> Result<(), ScrabrError>
where
    D: DictionaryOracle,
    C: Codec,
{
    let player_id = state.next_player_id();
    tracing::info!(%player_id, "player connected");

    let (sink, mut stream) = ws.split();
    let (outbox, events) = mpsc::unbounded_channel();

    let writer_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = write_loop(sink, events, writer_state).await {
            tracing::debug!(%player_id, error = %e, "writer stopped");
        }
    });

    let _guard = SeatGuard {
        player_id,
        state: Arc::clone(&state),
    };
    let mut pending_check: Option<JoinHandle<()>> = None;

    while let Some(frame) = stream.next().await {
        let decoded: Result<Envelope<ClientEvent>, _> = match frame {
            Ok(Message::Text(text)) => state.codec.decode(text.as_bytes()),
            Ok(Message::Binary(data)) => state.codec.decode(&data),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/raw frames
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let envelope = match decoded {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                send_error(&outbox, format_args!("invalid message: {e}"));
                continue;
            }
        };

        dispatch(&state, player_id, envelope.event, &outbox, &mut pending_check).await;
    }

    if let Some(check) = pending_check.take() {
        check.abort();
    }
    tracing::info!(%player_id, "player disconnected");
    // _guard drops here → the player leaves their room.
    Ok(())
}

/// Drains the player's event channel into the socket, one envelope per
/// frame. Ends once every sender is gone.
async fn write_loop<D, C>(
    mut sink: SplitSink<WsStream, Message>,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<D, C>>,
) -> Result<(), ScrabrError>
where
    D: DictionaryOracle,
    C: Codec,
{
    let mut seq: u64 = 1;
    while let Some(event) = events.recv().await {
        let envelope = Envelope::new(next_seq(&mut seq), state.timestamp(), event);
        let bytes = state.codec.encode(&envelope)?;
        let frame = match String::from_utf8(bytes) {
            Ok(text) => Message::text(text),
            Err(e) => Message::binary(e.into_bytes()),
        };
        sink.send(frame).await?;
    }
    sink.close().await?;
    Ok(())
}

/// Routes one client event.
///
/// Failures inside a room are reported by the room actor itself. This only
/// reports what never reached a room: manager refusals, stale room codes
/// and unreadable tiles.
async fn dispatch<D, C>(
    state: &Arc<ServerState<D, C>>,
    player_id: PlayerId,
    event: ClientEvent,
    outbox: &PlayerSender,
    pending_check: &mut Option<JoinHandle<()>>,
) where
    D: DictionaryOracle,
    C: Codec,
{
    match event {
        ClientEvent::CreateRoom { name, blitz } => {
            let result = state
                .rooms
                .create_and_join(player_id, name, Variant::from_blitz(blitz), outbox.clone())
                .await;
            if let Err(e) = result {
                send_error(outbox, &e);
            }
        }

        ClientEvent::JoinRoom { room, name } => {
            let result = state
                .rooms
                .join_room(player_id, &room, name, outbox.clone())
                .await;
            if let Err(e) = result {
                send_error(outbox, &e);
            }
        }

        ClientEvent::ToggleReady { room } => {
            if let Some(handle) = route(state, player_id, &room, outbox).await {
                settle(player_id, handle.toggle_ready(player_id).await, outbox);
            }
        }

        ClientEvent::CheckPlay { room, tiles } => {
            let Some(handle) = route(state, player_id, &room, outbox).await else {
                return;
            };
            let Some(placements) = read_tiles(&handle, player_id, &tiles, outbox).await else {
                return;
            };
            // A newer check supersedes the one still in flight.
            if let Some(previous) = pending_check.take() {
                previous.abort();
            }
            let outbox = outbox.clone();
            *pending_check = Some(tokio::spawn(async move {
                settle(player_id, handle.check_play(player_id, placements).await, &outbox);
            }));
        }

        ClientEvent::Play { room, tiles } => {
            let Some(handle) = route(state, player_id, &room, outbox).await else {
                return;
            };
            if let Some(placements) = read_tiles(&handle, player_id, &tiles, outbox).await {
                settle(player_id, handle.play(player_id, placements).await, outbox);
            }
        }

        ClientEvent::Skip { room } => {
            if let Some(handle) = route(state, player_id, &room, outbox).await {
                settle(player_id, handle.skip(player_id).await, outbox);
            }
        }

        ClientEvent::Leave => {
            if let Some(previous) = pending_check.take() {
                previous.abort();
            }
            if let Err(e) = state.rooms.leave_room(player_id).await {
                tracing::debug!(%player_id, error = %e, "leave room failed");
            }
        }
    }
}

/// Looks up the room a request names. A stale code gets the player a
/// snapshot of the room they are actually in, or an error if they are in
/// none.
async fn route<D, C>(
    state: &Arc<ServerState<D, C>>,
    player_id: PlayerId,
    room: &RoomCode,
    outbox: &PlayerSender,
) -> Option<RoomHandle>
where
    D: DictionaryOracle,
    C: Codec,
{
    let (seated, err) = {
        let rooms = state.rooms.lock().await;
        match rooms.route(player_id, room) {
            Ok(handle) => return Some(handle),
            Err(e) => (rooms.player_room(player_id).and_then(|code| rooms.room(code)), e),
        }
    };
    tracing::debug!(%player_id, room = %room, error = %err, "stale room code");
    resync(seated, player_id, &err, outbox).await;
    None
}

/// Converts wire tiles. Coordinates off the board mean the client's view
/// is out of date, so it gets a fresh snapshot instead.
async fn read_tiles(
    handle: &RoomHandle,
    player_id: PlayerId,
    tiles: &[PlacedTile],
    outbox: &PlayerSender,
) -> Option<Vec<Placement>> {
    match placements_from_wire(tiles) {
        Ok(placements) => Some(placements),
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "malformed tiles");
            resync(Some(handle.clone()), player_id, &RoomError::from(e), outbox).await;
            None
        }
    }
}

/// Sends the player their current view of `room`, or `err` if there is no
/// room to show.
async fn resync(
    room: Option<RoomHandle>,
    player_id: PlayerId,
    err: &RoomError,
    outbox: &PlayerSender,
) {
    let Some(handle) = room else {
        send_error(outbox, err);
        return;
    };
    match handle.view(player_id).await {
        Ok(view) => {
            let _ = outbox.send(ServerEvent::GameState(view));
        }
        Err(e) => send_error(outbox, &e),
    }
}

/// Logs the outcome of a room command. The room has already told the
/// player what went wrong unless the room itself is gone.
fn settle(player_id: PlayerId, result: Result<(), RoomError>, outbox: &PlayerSender) {
    match result {
        Ok(()) => {}
        Err(e @ RoomError::Unavailable(_)) => send_error(outbox, &e),
        Err(e) => tracing::debug!(%player_id, error = %e, "request refused"),
    }
}

/// Queues a `ServerEvent::Error` for the player.
fn send_error(outbox: &PlayerSender, message: impl Display) {
    let _ = outbox.send(ServerEvent::Error {
        message: message.to_string(),
    });
}

/// Increments and returns the next sequence number.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}
