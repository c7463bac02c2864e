//! Word extraction: every maximal run of two or more tiles in a row or
//! column.

use serde::{Deserialize, Serialize};

use crate::{BOARD_SIZE, Board, Letter, Position};

/// A run of tiles read off the board, with the cell of each letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWord {
    pub word: String,
    pub positions: Vec<Position>,
}

impl BoardWord {
    /// Returns `true` if any of the word's cells is in `cells`.
    pub fn touches(&self, cells: &[Position]) -> bool {
        self.positions.iter().any(|p| cells.contains(p))
    }

    /// Returns `true` if every cell of the word is in `cells`.
    pub fn lies_within(&self, cells: &[Position]) -> bool {
        self.positions.iter().all(|p| cells.contains(p))
    }

    pub fn has_blank(&self) -> bool {
        self.word.contains(Letter::BLANK.as_char())
    }
}

/// Scans rows (top to bottom) then columns (left to right) and returns
/// every run of at least two adjacent tiles.
pub fn extract_words(board: &Board) -> Vec<BoardWord> {
    let mut words = Vec::new();
    for row in 0..BOARD_SIZE {
        collect_runs(&board.row(row), |i| Position::new(row, i), &mut words);
    }
    for col in 0..BOARD_SIZE {
        collect_runs(&board.column(col), |i| Position::new(i, col), &mut words);
    }
    words
}

fn collect_runs(
    line: &[Option<Letter>; BOARD_SIZE],
    position_of: impl Fn(usize) -> Option<Position>,
    out: &mut Vec<BoardWord>,
) {
    let mut run = BoardWord {
        word: String::new(),
        positions: Vec::new(),
    };
    // A trailing `None` closes a run that reaches the board edge.
    for (i, cell) in line.iter().copied().chain([None]).enumerate() {
        match (cell, position_of(i)) {
            (Some(letter), Some(pos)) => {
                run.word.push(letter.as_char());
                run.positions.push(pos);
            }
            _ => {
                if run.positions.len() > 1 {
                    out.push(std::mem::replace(
                        &mut run,
                        BoardWord {
                            word: String::new(),
                            positions: Vec::new(),
                        },
                    ));
                } else {
                    run.word.clear();
                    run.positions.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn words_of(board: &Board) -> Vec<String> {
        extract_words(board).into_iter().map(|w| w.word).collect()
    }

    #[test]
    fn test_empty_board_has_no_words() {
        assert!(extract_words(&Board::empty()).is_empty());
    }

    #[test]
    fn test_single_letters_are_not_words() {
        let board = Board::empty()
            .with_word(pos(3, 3), true, "a")
            .with_word(pos(9, 9), true, "e");
        assert!(extract_words(&board).is_empty());
    }

    #[test]
    fn test_horizontal_word_with_positions() {
        let board = Board::empty().with_word(pos(7, 6), true, "cat");
        let words = extract_words(&board);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "cat");
        assert_eq!(words[0].positions, vec![pos(7, 6), pos(7, 7), pos(7, 8)]);
    }

    #[test]
    fn test_rows_come_before_columns() {
        // "mar" across row 7, "mesa" down column 7 sharing the m.
        let board = Board::empty()
            .with_word(pos(7, 7), true, "mar")
            .with_word(pos(7, 7), false, "mesa");
        assert_eq!(words_of(&board), vec!["mar", "mesa"]);
    }

    #[test]
    fn test_two_runs_in_one_row_are_separate() {
        let board = Board::empty()
            .with_word(pos(0, 0), true, "ao")
            .with_word(pos(0, 3), true, "os");
        let words = extract_words(&board);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].positions, vec![pos(0, 3), pos(0, 4)]);
    }

    #[test]
    fn test_repeated_word_in_row_gets_its_own_positions() {
        let board = Board::empty()
            .with_word(pos(2, 0), true, "ai")
            .with_word(pos(2, 5), true, "ai");
        let words = extract_words(&board);
        assert_eq!(words[0].positions[0], pos(2, 0));
        assert_eq!(words[1].positions[0], pos(2, 5));
    }

    #[test]
    fn test_run_touching_board_edge() {
        let board = Board::empty().with_word(pos(14, 12), true, "mas");
        let words = extract_words(&board);
        assert_eq!(words[0].positions.last(), Some(&pos(14, 14)));
    }

    #[test]
    fn test_blank_counts_as_a_letter() {
        let board = Board::empty().with_word(pos(7, 7), true, "c_t");
        let words = extract_words(&board);
        assert_eq!(words[0].word, "c_t");
        assert!(words[0].has_blank());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let board = Board::empty()
            .with_word(pos(7, 5), true, "casa")
            .with_word(pos(5, 6), false, "mar");
        assert_eq!(extract_words(&board), extract_words(&board));
    }
}
