//! Error types for the rules layer.

use crate::{Letter, Position};

/// Reasons a proposed play is refused.
///
/// Two families live here. Desync errors mean the client acted on a stale
/// picture of the board and should simply be re-sent the current state.
/// Everything else is a rule violation the player can correct and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    /// A target cell already holds a tile.
    #[error("cell {0} is already occupied")]
    CellOccupied(Position),

    /// The same cell appears twice in one play.
    #[error("cell {0} is targeted more than once")]
    DuplicateCell(Position),

    /// A coordinate or symbol outside the board or tile set.
    #[error("malformed tile: {0}")]
    Malformed(String),

    /// An occupied cell has no occupied orthogonal neighbour.
    #[error("tile at {0} has no neighbouring tile")]
    LooseTile(Position),

    /// The first move does not cover the centre cell.
    #[error("first move must cover the centre cell")]
    CenterNotCovered,

    /// Newly placed tiles are not joined to the tiles already on the board.
    #[error("tile at {0} is not connected to the board")]
    Disconnected(Position),

    /// The play uses a letter the player does not hold (counted per tile).
    #[error("letter '{0}' is not on the rack")]
    LetterNotOnRack(Letter),

    /// The first move must form exactly one word.
    #[error("first move must form exactly one word, formed {0}")]
    FirstMoveWordCount(usize),

    /// A formed word is not in the dictionary (for blanks: no substitution is).
    #[error("'{0}' is not a valid word")]
    UnknownWord(String),
}

impl PlayError {
    /// Returns `true` if the client is out of sync with the board rather
    /// than breaking a rule.
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::CellOccupied(_) | Self::DuplicateCell(_) | Self::Malformed(_)
        )
    }
}

/// Errors from the letter pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A draw was attempted with no tiles left. Callers check the remaining
    /// total first, so this indicates a bug in the caller.
    #[error("letter pool is exhausted")]
    Exhausted,
}
