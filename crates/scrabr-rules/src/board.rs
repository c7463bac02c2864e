//! The 15×15 board and its static bonus overlay.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::Letter;

/// Board width and height.
pub const BOARD_SIZE: usize = 15;

/// A cell coordinate, always inside the board.
///
/// The fields are private so every `Position` goes through
/// [`Position::new`], deserialized ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Unchecked wire form of a [`Position`].
#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    col: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col)
            .ok_or_else(|| format!("({}, {}) is off the board", raw.row, raw.col))
    }
}

impl Position {
    /// The centre cell the first move must cover.
    pub const CENTER: Position = Position { row: 7, col: 7 };

    /// Returns the position, or `None` if it falls outside the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Orthogonal neighbours that lie on the board.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        let (row, col) = (self.row as isize, self.col as isize);
        [(-1, 0), (0, 1), (1, 0), (0, -1)]
            .into_iter()
            .filter_map(move |(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                if r < 0 || c < 0 {
                    return None;
                }
                Position::new(r as usize, c as usize)
            })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The grid of placed tiles.
///
/// A cell goes from empty to a letter only through an accepted play, and
/// only a whole-game reset (a fresh `Board`) empties it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Letter>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Returns a board with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, pos: Position) -> Option<Letter> {
        self.cells[pos.row()][pos.col()]
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Returns `true` if no tile has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.occupied().next().is_none()
    }

    /// The first move is the one made while the centre cell is empty.
    pub fn is_first_move(&self) -> bool {
        !self.is_occupied(Position::CENTER)
    }

    /// All occupied cells, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Letter)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| {
                cell.map(|letter| {
                    (
                        Position {
                            row: r as u8,
                            col: c as u8,
                        },
                        letter,
                    )
                })
            })
        })
    }

    /// Writes a letter into a cell. Only the validator and tests place
    /// tiles; the room commits a whole validated board at once.
    pub(crate) fn place(&mut self, pos: Position, letter: Letter) {
        self.cells[pos.row()][pos.col()] = Some(letter);
    }

    /// One row as cells, left to right.
    pub(crate) fn row(&self, row: usize) -> [Option<Letter>; BOARD_SIZE] {
        self.cells[row]
    }

    /// One column as cells, top to bottom.
    pub(crate) fn column(&self, col: usize) -> [Option<Letter>; BOARD_SIZE] {
        std::array::from_fn(|row| self.cells[row][col])
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.map_or('.', Letter::as_char))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl Board {
    /// Builds a board with `word` laid out from `start`, horizontally or
    /// vertically.
    pub(crate) fn with_word(mut self, start: Position, across: bool, word: &str) -> Self {
        for (i, c) in word.chars().enumerate() {
            let pos = if across {
                Position::new(start.row(), start.col() + i)
            } else {
                Position::new(start.row() + i, start.col())
            }
            .expect("word fits on the board");
            self.place(pos, Letter::new(c).expect("tile letter"));
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Bonus overlay
// ---------------------------------------------------------------------------

/// A cell's score modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bonus {
    None,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
    /// The centre cell. Marks where the game starts; no multiplier.
    Start,
}

impl Bonus {
    /// Factor applied to the letter on this cell.
    pub fn letter_multiplier(self) -> u32 {
        match self {
            Self::DoubleLetter => 2,
            Self::TripleLetter => 3,
            _ => 1,
        }
    }

    /// Factor applied to the whole word crossing this cell.
    pub fn word_multiplier(self) -> u32 {
        match self {
            Self::DoubleWord => 2,
            Self::TripleWord => 3,
            _ => 1,
        }
    }
}

/// The fixed grid of multipliers, symmetric about the centre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusOverlay {
    cells: [[Bonus; BOARD_SIZE]; BOARD_SIZE],
}

impl BonusOverlay {
    pub fn get(&self, pos: Position) -> Bonus {
        self.cells[pos.row()][pos.col()]
    }

    fn build() -> Self {
        const TRIPLE_WORD: &[(usize, usize)] = &[
            (0, 0), (0, 7), (0, 14),
            (7, 0), (7, 14),
            (14, 0), (14, 7), (14, 14),
        ];
        const DOUBLE_WORD: &[(usize, usize)] = &[
            (1, 1), (2, 2), (3, 3), (4, 4),
            (1, 13), (2, 12), (3, 11), (4, 10),
            (13, 1), (12, 2), (11, 3), (10, 4),
            (13, 13), (12, 12), (11, 11), (10, 10),
        ];
        const TRIPLE_LETTER: &[(usize, usize)] = &[
            (1, 5), (1, 9),
            (5, 1), (5, 5), (5, 9), (5, 13),
            (9, 1), (9, 5), (9, 9), (9, 13),
            (13, 5), (13, 9),
        ];
        const DOUBLE_LETTER: &[(usize, usize)] = &[
            (0, 3), (0, 11),
            (2, 6), (2, 8),
            (3, 0), (3, 7), (3, 14),
            (6, 2), (6, 6), (6, 8), (6, 12),
            (7, 3), (7, 11),
            (8, 2), (8, 6), (8, 8), (8, 12),
            (11, 0), (11, 7), (11, 14),
            (12, 6), (12, 8),
            (14, 3), (14, 11),
        ];

        let mut cells = [[Bonus::None; BOARD_SIZE]; BOARD_SIZE];
        for (coords, bonus) in [
            (TRIPLE_WORD, Bonus::TripleWord),
            (DOUBLE_WORD, Bonus::DoubleWord),
            (TRIPLE_LETTER, Bonus::TripleLetter),
            (DOUBLE_LETTER, Bonus::DoubleLetter),
        ] {
            for &(row, col) in coords {
                cells[row][col] = bonus;
            }
        }
        cells[Position::CENTER.row()][Position::CENTER.col()] = Bonus::Start;
        Self { cells }
    }
}

static BONUS_OVERLAY: LazyLock<BonusOverlay> = LazyLock::new(BonusOverlay::build);

/// The process-wide bonus overlay, built on first use.
pub fn bonus_overlay() -> &'static BonusOverlay {
    &BONUS_OVERLAY
}
