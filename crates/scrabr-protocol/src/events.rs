//! Client and server events, and the envelope both travel in.

use scrabr_rules::ScoredWord;
use serde::{Deserialize, Serialize};

use crate::{PlacedTile, PlayerId, RoomCode, RoomView, Standing};

/// Everything a client can ask for.
///
/// Internally tagged: `{"type": "Play", "room": "AB12CD", "tiles": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Open a new room and join it as its first player.
    CreateRoom {
        name: String,
        #[serde(default)]
        blitz: bool,
    },

    JoinRoom { room: RoomCode, name: String },

    /// Flip this player's ready flag. The game starts once everyone is ready.
    ToggleReady { room: RoomCode },

    /// Price a tentative play without committing it.
    CheckPlay {
        room: RoomCode,
        tiles: Vec<PlacedTile>,
    },

    /// Commit a play. Only the turn holder may do this.
    Play {
        room: RoomCode,
        tiles: Vec<PlacedTile>,
    },

    /// Pass the turn without placing tiles.
    Skip { room: RoomCode },

    /// Leave the current room. Closing the socket does the same.
    Leave,
}

impl ClientEvent {
    /// The room this event targets, if it names one.
    pub fn room(&self) -> Option<&RoomCode> {
        match self {
            Self::JoinRoom { room, .. }
            | Self::ToggleReady { room }
            | Self::CheckPlay { room, .. }
            | Self::Play { room, .. }
            | Self::Skip { room } => Some(room),
            Self::CreateRoom { .. } | Self::Leave => None,
        }
    }
}

/// Everything the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Sent once after a successful create or join.
    RoomJoined { room: RoomCode, player_id: PlayerId },

    /// The room as the receiving player may see it. Broadcast after every
    /// state change, and sent alone to a player whose request was stale.
    GameState(RoomView),

    /// The last play broke a rule. The player may fix it and retry.
    PlayRejected,

    /// Result of a check: the words a tentative play would form and their
    /// total.
    PlayPriced { words: Vec<ScoredWord>, total: u32 },

    /// The bag ran dry. Carries the final scores before the room resets.
    GameOver {
        winner: Option<PlayerId>,
        standings: Vec<Standing>,
    },

    /// A request that could not be served at all (unknown room, full room,
    /// unreadable frame).
    Error { message: String },
}

/// Every frame on the socket is one envelope.
///
/// `seq` counts frames per direction per connection. `timestamp` is
/// milliseconds since the sender started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub timestamp: u64,
    pub event: T,
}

impl<T> Envelope<T> {
    pub fn new(seq: u64, timestamp: u64, event: T) -> Self {
        Self {
            seq,
            timestamp,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use scrabr_rules::{Board, Position, Variant};

    use super::*;
    use crate::{PlayerView, RoomPhase};

    fn code() -> RoomCode {
        RoomCode::parse("AB12CD").unwrap()
    }

    #[test]
    fn test_client_event_json_shape() {
        let event = ClientEvent::Play {
            room: code(),
            tiles: vec![PlacedTile::new(7, 7, 'a')],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Play");
        assert_eq!(json["room"], "AB12CD");
        assert_eq!(json["tiles"][0]["row"], 7);
        assert_eq!(json["tiles"][0]["letter"], "a");
    }

    #[test]
    fn test_create_room_blitz_defaults_to_false() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"CreateRoom","name":"Ana"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::CreateRoom {
                name: "Ana".into(),
                blitz: false
            }
        );
    }

    #[test]
    fn test_client_event_room() {
        assert_eq!(ClientEvent::Skip { room: code() }.room(), Some(&code()));
        assert_eq!(ClientEvent::Leave.room(), None);
    }

    #[test]
    fn test_unknown_client_event_is_rejected() {
        let result: Result<ClientEvent, _> = serde_json::from_str(r#"{"type":"Shuffle"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_game_state_flattens_view_under_tag() {
        let view = RoomView {
            code: code(),
            phase: RoomPhase::Lobby,
            variant: Variant::Blitz,
            board: Board::empty(),
            players: vec![PlayerView {
                id: PlayerId(1),
                name: "Ana".into(),
                ready: true,
                score: 0,
                rack_size: 0,
            }],
            turn: None,
            winner: None,
            words_created: vec![],
            remaining_tiles: 65,
            rack: vec![],
        };
        let json = serde_json::to_value(ServerEvent::GameState(view.clone())).unwrap();
        assert_eq!(json["type"], "GameState");
        assert_eq!(json["code"], "AB12CD");
        assert_eq!(json["variant"], "blitz");
        assert_eq!(json["players"][0]["name"], "Ana");
        assert!(json["board"]["cells"][7][7].is_null());

        let back: ServerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ServerEvent::GameState(view));
    }

    #[test]
    fn test_play_priced_json_shape() {
        let event = ServerEvent::PlayPriced {
            words: vec![ScoredWord {
                word: "mar".into(),
                positions: vec![Position::CENTER],
                score: 3,
            }],
            total: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PlayPriced");
        assert_eq!(json["words"][0]["word"], "mar");
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn test_play_rejected_is_a_bare_tag() {
        let json = serde_json::to_string(&ServerEvent::PlayRejected).unwrap();
        assert_eq!(json, r#"{"type":"PlayRejected"}"#);
    }

    #[test]
    fn test_envelope_wraps_event() {
        let envelope = Envelope::new(3, 1500, ClientEvent::Leave);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["seq"], 3);
        assert_eq!(json["event"]["type"], "Leave");
    }
}
