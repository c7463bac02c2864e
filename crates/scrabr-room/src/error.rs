//! Error types for the room layer.

use scrabr_protocol::{PlayerId, RoomCode, RoomPhase};
use scrabr_rules::{PlayError, PoolError};

/// Errors from room operations.
///
/// Callers answer these in three ways. Desync errors get the player a
/// fresh snapshot, rule violations get a `PlayRejected`, and the rest are
/// reported as plain errors.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The roster is at its cap.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The player already sits in a room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player is not in this room.
    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomCode),

    /// The player is not in any room.
    #[error("player {0} is not in any room")]
    NotSeated(PlayerId),

    /// The operation is not allowed in the room's current phase.
    #[error("not allowed while the room is in {0}")]
    WrongPhase(RoomPhase),

    /// Someone other than the turn holder tried to play.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The proposed play was refused by the rules.
    #[error(transparent)]
    Play(#[from] PlayError),

    /// An internal invariant broke while applying a command. The command
    /// is dropped and the room carries on with its previous state.
    #[error("internal error: {0}")]
    Internal(#[from] PoolError),

    /// The room actor has stopped or its channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl RoomError {
    /// The player acted on an outdated picture of the room.
    pub fn is_desync(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::NotInRoom(..)
            | Self::NotSeated(_)
            | Self::WrongPhase(_)
            | Self::NotYourTurn(_) => true,
            Self::Play(err) => err.is_desync(),
            _ => false,
        }
    }

    /// The player broke a game rule and may retry.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, Self::Play(err) if !err.is_desync())
    }
}

#[cfg(test)]
mod tests {
    use scrabr_rules::Position;

    use super::*;

    #[test]
    fn test_classification() {
        let code = RoomCode::parse("AAAAAA").unwrap();
        assert!(RoomError::NotYourTurn(PlayerId(1)).is_desync());
        assert!(RoomError::WrongPhase(RoomPhase::Lobby).is_desync());
        assert!(RoomError::Play(PlayError::CellOccupied(Position::CENTER)).is_desync());
        assert!(RoomError::Play(PlayError::CenterNotCovered).is_rule_violation());
        assert!(!RoomError::Play(PlayError::CenterNotCovered).is_desync());

        let full = RoomError::RoomFull(code);
        assert!(!full.is_desync());
        assert!(!full.is_rule_violation());
        assert!(!RoomError::Internal(PoolError::Exhausted).is_desync());
    }
}
