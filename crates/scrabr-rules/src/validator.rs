//! Placement legality: which cells a play may fill, and which words it forms.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{Board, BoardWord, Letter, PlayError, Position, Rack, extract_words};

/// One tile a player puts down this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub letter: Letter,
}

impl Placement {
    pub fn new(position: Position, letter: Letter) -> Self {
        Self { position, letter }
    }
}

/// A play that passed every placement rule. Spelling is still unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPlay {
    /// The board with the play applied.
    pub board: Board,
    /// Words that include at least one newly placed tile, rows first.
    pub new_words: Vec<BoardWord>,
    pub first_move: bool,
    /// Rack letters the play uses, one per placement.
    pub consumed: Vec<Letter>,
}

/// Checks a proposed play against the board and the player's rack.
///
/// Failures come back in a fixed order: stale targets first (occupied or
/// repeated cells), then isolated tiles and centre coverage on the applied
/// board, then connection to existing tiles, then rack ownership, and
/// finally the first-move word count.
pub fn validate_play(
    board: &Board,
    rack: &Rack,
    placements: &[Placement],
) -> Result<ValidatedPlay, PlayError> {
    let mut targets = HashSet::with_capacity(placements.len());
    for placement in placements {
        if board.is_occupied(placement.position) {
            return Err(PlayError::CellOccupied(placement.position));
        }
        if !targets.insert(placement.position) {
            return Err(PlayError::DuplicateCell(placement.position));
        }
    }

    let first_move = board.is_first_move();
    let mut scratch = board.clone();
    for placement in placements {
        scratch.place(placement.position, placement.letter);
    }

    check_no_loose_tiles(&scratch)?;
    if first_move && !scratch.is_occupied(Position::CENTER) {
        return Err(PlayError::CenterNotCovered);
    }
    check_connected(board, &scratch, placements, first_move)?;

    let consumed: Vec<Letter> = placements.iter().map(|p| p.letter).collect();
    rack.check_letters(&consumed)?;

    let placed: Vec<Position> = placements.iter().map(|p| p.position).collect();
    let new_words: Vec<BoardWord> = extract_words(&scratch)
        .into_iter()
        .filter(|w| w.touches(&placed))
        .collect();
    if first_move && new_words.len() != 1 {
        return Err(PlayError::FirstMoveWordCount(new_words.len()));
    }

    Ok(ValidatedPlay {
        board: scratch,
        new_words,
        first_move,
        consumed,
    })
}

/// Every occupied cell needs an occupied orthogonal neighbour.
fn check_no_loose_tiles(board: &Board) -> Result<(), PlayError> {
    for (pos, _) in board.occupied() {
        if !pos.neighbors().any(|n| board.is_occupied(n)) {
            return Err(PlayError::LooseTile(pos));
        }
    }
    Ok(())
}

/// Flood-fills the applied board from the tiles that were already there (or
/// from the centre on the first move) and fails on any new tile not reached.
fn check_connected(
    before: &Board,
    after: &Board,
    placements: &[Placement],
    first_move: bool,
) -> Result<(), PlayError> {
    let mut queue: VecDeque<Position> = if first_move {
        VecDeque::from([Position::CENTER])
    } else {
        before.occupied().map(|(pos, _)| pos).collect()
    };
    let mut reached: HashSet<Position> = queue.iter().copied().collect();

    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors() {
            if after.is_occupied(next) && reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    match placements.iter().find(|p| !reached.contains(&p.position)) {
        Some(stray) => Err(PlayError::Disconnected(stray.position)),
        None => Ok(()),
    }
}
